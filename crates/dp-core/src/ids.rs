//! Seat identifier.
//!
//! A `SeatId` is the zero-based slot of a philosopher in the ring.  The inner
//! integer is `pub` so tests and builders can write `SeatId(2)` directly, but
//! callers should prefer [`SeatId::index`] for slice indexing and
//! [`SeatId::position`] for anything shown to a human.

use std::fmt;

/// Zero-based index of a seat in the ring.  Max ~4.3 billion seats.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatId(pub u32);

impl SeatId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// One-based position around the table (`1..=N`), as printed in activity
    /// lines.
    #[inline]
    pub fn position(self) -> u64 {
        self.0 as u64 + 1
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}

impl From<SeatId> for usize {
    #[inline(always)]
    fn from(id: SeatId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for SeatId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<SeatId, Self::Error> {
        u32::try_from(n).map(SeatId)
    }
}
