//! The `Sim` struct, its running handle, and the per-seat agent loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dp_core::{DpResult, Phase, SeatId, SeatRng};
use dp_table::{SeatHandle, Table, WaitOutcome};
use tracing::{debug, warn};

use crate::{Activity, PhaseObserver, Shutdown, SimError, SimResult, TimingSource};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// A laid table that has not started yet.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TimingSource, O: PhaseObserver> {
    pub(crate) table:    Arc<Table>,
    pub(crate) timing:   Arc<T>,
    pub(crate) observer: Arc<O>,
    pub(crate) seed:     u64,
}

impl<T: TimingSource, O: PhaseObserver> Sim<T, O> {
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn observer(&self) -> &Arc<O> {
        &self.observer
    }

    /// Claim every seat, then spawn one named thread per seat running the
    /// agent loop.  The threads run until the returned handle (or one of its
    /// [`Stopper`]s) is told to stop.
    ///
    /// If a spawn fails, the seats already running are stopped and joined
    /// before the error is returned.
    pub fn start(self) -> SimResult<SimHandle<O>> {
        let seats = self.table.claim_all()?;
        let stopper = Stopper {
            shutdown: Arc::new(Shutdown::new()),
            table:    Arc::clone(&self.table),
        };

        self.observer.on_start(self.table.len());

        let mut threads = Vec::with_capacity(seats.len());
        for seat in seats {
            let id = seat.id();
            let rng = SeatRng::new(self.seed, id);
            let timing = Arc::clone(&self.timing);
            let observer = Arc::clone(&self.observer);
            let seat_stopper = stopper.clone();

            let spawned = thread::Builder::new()
                .name(format!("seat-{}", id.position()))
                .spawn(move || dine(seat, rng, &*timing, &*observer, &seat_stopper));

            match spawned {
                Ok(handle) => threads.push((id, handle)),
                Err(source) => {
                    stopper.stop();
                    for (_, handle) in threads {
                        let _ = handle.join();
                    }
                    return Err(SimError::Spawn { seat: id, source });
                }
            }
        }

        Ok(SimHandle {
            table:    self.table,
            observer: self.observer,
            stopper,
            threads,
        })
    }

    /// Start, let the table run for `duration`, stop, and join.
    pub fn run_for(self, duration: Duration) -> SimResult<SimReport> {
        let handle = self.start()?;
        thread::sleep(duration);
        handle.stop();
        handle.join()
    }
}

// ── Stopper ───────────────────────────────────────────────────────────────────

/// Cloneable stop trigger, suitable for signal handlers and timers.
#[derive(Clone)]
pub struct Stopper {
    shutdown: Arc<Shutdown>,
    table:    Arc<Table>,
}

impl Stopper {
    /// Cut every think/eat sleep short and release every hungry seat blocked
    /// on its gate.  Idempotent.
    pub fn stop(&self) {
        self.shutdown.trigger();
        self.table.close();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

// ── SimHandle ─────────────────────────────────────────────────────────────────

/// A running table.
///
/// Dropping the handle without [`join`](Self::join) stops every seat, but
/// does not wait for the seat threads to exit.
pub struct SimHandle<O: PhaseObserver> {
    table:    Arc<Table>,
    observer: Arc<O>,
    stopper:  Stopper,
    threads:  Vec<(SeatId, JoinHandle<SimResult<u64>>)>,
}

impl<O: PhaseObserver> SimHandle<O> {
    /// The live table, e.g. for taking snapshots while seats run.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn observer(&self) -> &Arc<O> {
        &self.observer
    }

    pub fn stopper(&self) -> Stopper {
        self.stopper.clone()
    }

    /// Ask every seat to stop.  Does not wait; see [`join`](Self::join).
    pub fn stop(&self) {
        self.stopper.stop();
    }

    /// Wait for every seat thread to exit and collect per-seat meal counts.
    ///
    /// Blocks until someone calls [`stop`](Self::stop) (or a seat fails, which
    /// stops the rest).  Returns the first seat error, if any.
    pub fn join(mut self) -> SimResult<SimReport> {
        let mut meals = vec![0; self.table.len()];
        let mut first_error = None;

        for (seat, handle) in std::mem::take(&mut self.threads) {
            match handle.join() {
                Ok(Ok(count)) => meals[seat.index()] = count,
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    first_error.get_or_insert(SimError::SeatPanicked(seat));
                }
            }
        }

        let report = SimReport { meals };
        self.observer.on_stop(&report);
        match first_error {
            Some(e) => Err(e),
            None    => Ok(report),
        }
    }
}

impl<O: PhaseObserver> Drop for SimHandle<O> {
    fn drop(&mut self) {
        if !self.threads.is_empty() {
            debug!("sim handle dropped before join, stopping table");
        }
        self.stopper.stop();
    }
}

// ── SimReport ─────────────────────────────────────────────────────────────────

/// Completed meals per seat after a run, indexed by `SeatId`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SimReport {
    pub meals: Vec<u64>,
}

impl SimReport {
    pub fn total_meals(&self) -> u64 {
        self.meals.iter().sum()
    }

    pub fn min_meals(&self) -> u64 {
        self.meals.iter().copied().min().unwrap_or(0)
    }

    pub fn max_meals(&self) -> u64 {
        self.meals.iter().copied().max().unwrap_or(0)
    }

    /// Seats that never ate.
    pub fn starved(&self) -> Vec<SeatId> {
        self.meals
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m == 0)
            .map(|(i, _)| SeatId(i as u32))
            .collect()
    }
}

// ── Agent loop ────────────────────────────────────────────────────────────────

/// Stops the whole table if a seat thread unwinds, so its neighbours are not
/// left waiting on a seat that will never release.
struct StopOnPanic<'a>(&'a Stopper);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.stop();
        }
    }
}

/// Body of one seat thread.  Returns the number of completed meals.
fn dine<T: TimingSource, O: PhaseObserver>(
    mut seat: SeatHandle,
    mut rng:  SeatRng,
    timing:   &T,
    observer: &O,
    stopper:  &Stopper,
) -> SimResult<u64> {
    let _guard = StopOnPanic(stopper);
    let id = seat.id();
    let mut meals = 0;

    let result = cycle(&mut seat, &mut rng, timing, observer, &stopper.shutdown, &mut meals);
    match &result {
        Ok(())   => debug!(seat = %id, meals, "seat stopped"),
        Err(e) => {
            warn!(seat = %id, error = %e, "seat stopped abnormally, stopping table");
            stopper.stop();
        }
    }
    observer.on_seat_stopped(id, meals);
    result.map(|()| meals).map_err(SimError::from)
}

/// Think → Hungry → Eating → Thinking until `shutdown` fires.
fn cycle<T: TimingSource, O: PhaseObserver>(
    seat:     &mut SeatHandle,
    rng:      &mut SeatRng,
    timing:   &T,
    observer: &O,
    shutdown: &Shutdown,
    meals:    &mut u64,
) -> DpResult<()> {
    let id = seat.id();
    loop {
        let think = timing.think_delay(id, rng);
        observer.on_activity(&Activity { seat: id, phase: Phase::Thinking, duration: Some(think) });
        if !shutdown.sleep(think) {
            return Ok(());
        }

        seat.become_hungry()?;
        observer.on_activity(&Activity { seat: id, phase: Phase::Hungry, duration: None });
        if seat.wait_to_eat()? == WaitOutcome::Closed {
            return Ok(());
        }

        let eat = timing.eat_delay(id, rng);
        observer.on_activity(&Activity { seat: id, phase: Phase::Eating, duration: Some(eat) });
        let full_meal = shutdown.sleep(eat);
        // Forks go back even when the meal was cut short.
        seat.finish_eating()?;
        *meals += 1;
        if !full_meal {
            return Ok(());
        }
    }
}
