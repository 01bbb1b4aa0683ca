//! The `TimingSource` trait — where think and eat durations come from.

use std::time::Duration;

use dp_core::{DelayConfig, DpResult, SeatId, SeatRng};

/// Pluggable think/eat duration source.
///
/// Each seat thread calls these with its own [`SeatRng`], so sampling is
/// deterministic per seat no matter how threads interleave.  Implementations
/// are shared by all seat threads and therefore must be `Send + Sync`; state
/// that varies per seat belongs in the RNG, not in the source.
pub trait TimingSource: Send + Sync + 'static {
    /// How long `seat` thinks before turning hungry.
    fn think_delay(&self, seat: SeatId, rng: &mut SeatRng) -> Duration;

    /// How long `seat` eats once it holds both forks.
    fn eat_delay(&self, seat: SeatId, rng: &mut SeatRng) -> Duration;
}

/// Uniform random delays drawn from a validated [`DelayConfig`].
#[derive(Clone, Debug)]
pub struct UniformDelays {
    config: DelayConfig,
}

impl UniformDelays {
    /// Validate `config` up front so a bad range fails before any seat runs.
    pub fn new(config: DelayConfig) -> DpResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DelayConfig {
        &self.config
    }
}

impl TimingSource for UniformDelays {
    fn think_delay(&self, _seat: SeatId, rng: &mut SeatRng) -> Duration {
        self.config.think_delay(rng)
    }

    fn eat_delay(&self, _seat: SeatId, rng: &mut SeatRng) -> Duration {
        self.config.eat_delay(rng)
    }
}

/// The same think and eat duration for every seat, every cycle.
///
/// Useful in tests where the schedule has to be predictable.
#[derive(Copy, Clone, Debug)]
pub struct FixedDelays {
    pub think: Duration,
    pub eat:   Duration,
}

impl TimingSource for FixedDelays {
    fn think_delay(&self, _seat: SeatId, _rng: &mut SeatRng) -> Duration {
        self.think
    }

    fn eat_delay(&self, _seat: SeatId, _rng: &mut SeatRng) -> Duration {
        self.eat
    }
}
