//! Deterministic per-seat RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each seat gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (seat * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive seat IDs uniformly across the seed space.  Every
//! seat thread owns its RNG outright, so sampled delays never depend on thread
//! interleaving and no synchronisation is needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::SeatId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-seat deterministic RNG.
///
/// Created once per seat at simulation start and moved into that seat's
/// thread.  The type is `Send` but not `Sync`.
pub struct SeatRng(SmallRng);

impl SeatRng {
    /// Seed deterministically from the run's global seed and a seat ID.
    pub fn new(global_seed: u64, seat: SeatId) -> Self {
        let seed = global_seed ^ (seat.0 as u64).wrapping_mul(MIXING_CONSTANT);
        SeatRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
