//! Think/eat duration configuration.
//!
//! Durations are sampled uniformly from `[min_delay_secs, max_delay_secs]`.
//! Eating additionally takes `eat_extra_secs`, so with the defaults a meal
//! lasts 0.8–1.3 s while thinking lasts 0.5–1.0 s.

use std::time::Duration;

use crate::{DpError, DpResult, SeatRng};

/// Randomised delay bounds, in seconds.
///
/// Typically built from CLI flags or loaded from JSON by the application and
/// handed to a timing source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DelayConfig {
    /// Lower bound of every sampled delay.  Default: 0.5.
    pub min_delay_secs: f64,
    /// Upper bound of every sampled delay.  Default: 1.0.
    pub max_delay_secs: f64,
    /// Fixed addend applied to eat durations only.  Default: 0.3.
    pub eat_extra_secs: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 0.5,
            max_delay_secs: 1.0,
            eat_extra_secs: 0.3,
        }
    }
}

impl DelayConfig {
    /// Check that every bound is a finite, non-negative number, that the
    /// range is not inverted, and that the longest meal fits in a `Duration`.
    pub fn validate(&self) -> DpResult<()> {
        for (name, value) in [
            ("min_delay_secs", self.min_delay_secs),
            ("max_delay_secs", self.max_delay_secs),
            ("eat_extra_secs", self.eat_extra_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DpError::Config(format!(
                    "{name} must be a finite, non-negative number of seconds (got {value})"
                )));
            }
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(DpError::Config(format!(
                "min_delay_secs ({}) exceeds max_delay_secs ({})",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        let longest = self.max_delay_secs + self.eat_extra_secs;
        if Duration::try_from_secs_f64(longest).is_err() {
            return Err(DpError::Config(format!(
                "max_delay_secs + eat_extra_secs ({longest}) is too long to sleep for"
            )));
        }
        Ok(())
    }

    /// Sample one thinking duration.
    ///
    /// Assumes the config passed [`validate`](Self::validate); an unvalidated
    /// bound too large for a `Duration` saturates to `Duration::MAX`.
    pub fn think_delay(&self, rng: &mut SeatRng) -> Duration {
        secs(self.sample_secs(rng))
    }

    /// Sample one eating duration (`think`-style sample plus `eat_extra_secs`).
    pub fn eat_delay(&self, rng: &mut SeatRng) -> Duration {
        secs(self.sample_secs(rng) + self.eat_extra_secs)
    }

    fn sample_secs(&self, rng: &mut SeatRng) -> f64 {
        let (lo, hi) = (self.min_delay_secs, self.max_delay_secs);
        if hi <= lo { lo } else { rng.gen_range(lo..=hi) }
    }
}

// Only an unvalidated config can fail to convert.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}
