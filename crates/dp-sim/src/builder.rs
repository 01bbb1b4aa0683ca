//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use dp_table::Table;

use crate::{NoopObserver, PhaseObserver, Sim, SimResult, TimingSource};

/// Seed used when [`SimBuilder::seed`] is not called.
pub const DEFAULT_SEED: u64 = 42;

/// Fluent builder for [`Sim<T, O>`].
///
/// # Required inputs
///
/// - seat count, at least [`dp_table::MIN_SEATS`]
/// - `T: TimingSource`, e.g. [`UniformDelays`][crate::UniformDelays]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                    |
/// |-----------------|----------------------------|
/// | `.seed(s)`      | [`DEFAULT_SEED`]           |
/// | `.observer(o)`  | [`NoopObserver`]           |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(5, UniformDelays::new(DelayConfig::default())?)
///     .seed(7)
///     .observer(ActivityLog)
///     .build()?;
/// ```
pub struct SimBuilder<T: TimingSource, O: PhaseObserver = NoopObserver> {
    seats:    usize,
    seed:     u64,
    timing:   T,
    observer: O,
}

impl<T: TimingSource> SimBuilder<T> {
    /// Create a builder for `seats` philosophers sharing `timing`.
    pub fn new(seats: usize, timing: T) -> Self {
        Self {
            seats,
            seed: DEFAULT_SEED,
            timing,
            observer: NoopObserver,
        }
    }
}

impl<T: TimingSource, O: PhaseObserver> SimBuilder<T, O> {
    /// Global seed for the per-seat delay RNGs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the observer.
    pub fn observer<P: PhaseObserver>(self, observer: P) -> SimBuilder<T, P> {
        SimBuilder {
            seats:  self.seats,
            seed:   self.seed,
            timing: self.timing,
            observer,
        }
    }

    /// Validate the seat count and lay the table.  No thread is started.
    pub fn build(self) -> SimResult<Sim<T, O>> {
        let table = Arc::new(Table::new(self.seats)?);
        Ok(Sim {
            table,
            timing:   Arc::new(self.timing),
            observer: Arc::new(self.observer),
            seed:     self.seed,
        })
    }
}
