//! Observer hooks for activity logging and data collection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dp_core::{Phase, SeatId};
use tracing::{debug, info};

use crate::SimReport;

/// One activity line: a seat entered `phase`, for `duration` if the phase has
/// a planned length (thinking and eating do, hunger does not).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Activity {
    pub seat:     SeatId,
    pub phase:    Phase,
    pub duration: Option<Duration>,
}

impl fmt::Display for Activity {
    /// `3 is thinking for 0.71s`, `\t3 is hungry`, `\t\t3 is eating for 1.02s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = match self.phase {
            Phase::Thinking => "",
            Phase::Hungry   => "\t",
            Phase::Eating   => "\t\t",
        };
        write!(f, "{indent}{} is {}", self.seat, self.phase)?;
        if let Some(d) = self.duration {
            write!(f, " for {:.2}s", d.as_secs_f64())?;
        }
        Ok(())
    }
}

/// Callbacks invoked by the seat threads.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Seat threads call the hooks concurrently,
/// after the corresponding phase change has been committed and without holding
/// any table lock, so observers may be slow without affecting correctness.
/// Per seat, calls arrive in program order.
///
/// # Example: hunger counter
///
/// ```rust,ignore
/// struct HungerCounter(AtomicUsize);
///
/// impl PhaseObserver for HungerCounter {
///     fn on_activity(&self, a: &Activity) {
///         if a.phase == Phase::Hungry {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait PhaseObserver: Send + Sync + 'static {
    /// Called once from [`Sim::start`][crate::Sim::start] before any seat
    /// thread is spawned.
    fn on_start(&self, _seats: usize) {}

    /// Called by a seat thread each time it enters a phase.
    fn on_activity(&self, _activity: &Activity) {}

    /// Called by a seat thread as its last action.
    fn on_seat_stopped(&self, _seat: SeatId, _meals: u64) {}

    /// Called once after every seat thread has been joined.
    fn on_stop(&self, _report: &SimReport) {}
}

/// A [`PhaseObserver`] that does nothing.
pub struct NoopObserver;

impl PhaseObserver for NoopObserver {}

/// Fan every callback out to two observers, left first.
impl<A: PhaseObserver, B: PhaseObserver> PhaseObserver for (A, B) {
    fn on_start(&self, seats: usize) {
        self.0.on_start(seats);
        self.1.on_start(seats);
    }

    fn on_activity(&self, activity: &Activity) {
        self.0.on_activity(activity);
        self.1.on_activity(activity);
    }

    fn on_seat_stopped(&self, seat: SeatId, meals: u64) {
        self.0.on_seat_stopped(seat, meals);
        self.1.on_seat_stopped(seat, meals);
    }

    fn on_stop(&self, report: &SimReport) {
        self.0.on_stop(report);
        self.1.on_stop(report);
    }
}

// ── ActivityLog ───────────────────────────────────────────────────────────────

/// Emits every [`Activity`] as an `info` event, formatted like the classic
/// console output.
pub struct ActivityLog;

impl PhaseObserver for ActivityLog {
    fn on_start(&self, seats: usize) {
        info!(seats, "philosophers sit down");
    }

    fn on_activity(&self, activity: &Activity) {
        info!(
            seat = activity.seat.position(),
            phase = %activity.phase,
            "{activity}"
        );
    }

    fn on_seat_stopped(&self, seat: SeatId, meals: u64) {
        debug!(seat = seat.position(), meals, "seat left the table");
    }

    fn on_stop(&self, report: &SimReport) {
        info!(
            meals = report.total_meals(),
            min = report.min_meals(),
            max = report.max_meals(),
            "table closed"
        );
    }
}

// ── MealTally ─────────────────────────────────────────────────────────────────

/// Live per-seat meal counters, readable while the table is running.
///
/// A meal is counted when the seat starts eating.
pub struct MealTally {
    meals: Vec<AtomicU64>,
}

impl MealTally {
    pub fn new(seats: usize) -> Self {
        Self { meals: (0..seats).map(|_| AtomicU64::new(0)).collect() }
    }

    /// Meals started by `seat` so far (0 for seats outside the tally).
    pub fn meals(&self, seat: SeatId) -> u64 {
        self.meals
            .get(seat.index())
            .map_or(0, |m| m.load(Ordering::Relaxed))
    }

    /// Current counts for every seat, indexed by `SeatId`.
    pub fn counts(&self) -> Vec<u64> {
        self.meals.iter().map(|m| m.load(Ordering::Relaxed)).collect()
    }

    /// `true` once every seat has eaten at least once.
    pub fn everyone_ate(&self) -> bool {
        self.meals.iter().all(|m| m.load(Ordering::Relaxed) > 0)
    }
}

impl PhaseObserver for MealTally {
    fn on_activity(&self, activity: &Activity) {
        if activity.phase == Phase::Eating {
            if let Some(m) = self.meals.get(activity.seat.index()) {
                m.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
