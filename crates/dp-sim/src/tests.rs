//! Integration tests for dp-sim.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use dp_core::{DelayConfig, DpError, Phase, SeatId, SeatRng};
use parking_lot::Mutex;

use crate::{
    Activity, FixedDelays, MealTally, NoopObserver, PhaseObserver, Shutdown, SimBuilder,
    SimError, SimReport, TimingSource, UniformDelays,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const PATIENCE: Duration = Duration::from_secs(10);

/// Millisecond-scale random delays so many cycles fit in a short test.
fn quick_delays() -> UniformDelays {
    UniformDelays::new(DelayConfig {
        min_delay_secs: 0.001,
        max_delay_secs: 0.004,
        eat_extra_secs: 0.001,
    })
    .unwrap()
}

/// Poll `done` every few milliseconds until it holds or `PATIENCE` runs out.
fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + PATIENCE;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    done()
}

/// Records every activity, per seat, in the order each seat reported it.
struct Trace {
    seats: Vec<Mutex<Vec<Phase>>>,
}

impl Trace {
    fn new(n: usize) -> Self {
        Self { seats: (0..n).map(|_| Mutex::new(Vec::new())).collect() }
    }

    fn phases(&self, seat: SeatId) -> Vec<Phase> {
        self.seats[seat.index()].lock().clone()
    }
}

impl PhaseObserver for Trace {
    fn on_activity(&self, activity: &Activity) {
        self.seats[activity.seat.index()].lock().push(activity.phase);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn too_few_seats_fails_at_build() {
        let timing = FixedDelays { think: Duration::ZERO, eat: Duration::ZERO };
        let result = SimBuilder::new(2, timing).build();
        assert!(matches!(
            result,
            Err(SimError::Table(DpError::TooFewSeats { got: 2, min: 3 }))
        ));
    }

    #[test]
    fn bad_delay_config_fails_before_build() {
        let cfg = DelayConfig { min_delay_secs: 1.0, max_delay_secs: 0.5, eat_extra_secs: 0.0 };
        assert!(matches!(UniformDelays::new(cfg), Err(DpError::Config(_))));
    }

    #[test]
    fn build_lays_a_thinking_table() {
        let sim = SimBuilder::new(6, quick_delays()).seed(9).build().unwrap();
        assert_eq!(sim.table().len(), 6);
        assert_eq!(sim.table().snapshot().count(Phase::Thinking), 6);
    }

    #[test]
    fn seats_cannot_be_claimed_before_start() {
        let sim = SimBuilder::new(3, quick_delays()).build().unwrap();
        let _stolen = sim.table().claim(SeatId(1)).unwrap();
        assert!(matches!(
            sim.start(),
            Err(SimError::Table(DpError::SeatClaimed(SeatId(1))))
        ));
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timing_tests {
    use super::*;

    #[test]
    fn fixed_delays_ignore_rng() {
        let timing = FixedDelays { think: Duration::from_millis(3), eat: Duration::from_millis(7) };
        let mut rng = SeatRng::new(0, SeatId(0));
        assert_eq!(timing.think_delay(SeatId(0), &mut rng), Duration::from_millis(3));
        assert_eq!(timing.eat_delay(SeatId(4), &mut rng), Duration::from_millis(7));
    }

    #[test]
    fn uniform_delays_stay_in_config_range() {
        let timing = UniformDelays::new(DelayConfig::default()).unwrap();
        let mut rng = SeatRng::new(1, SeatId(2));
        for _ in 0..200 {
            let think = timing.think_delay(SeatId(2), &mut rng);
            let eat = timing.eat_delay(SeatId(2), &mut rng);
            assert!(think >= Duration::from_millis(500) && think <= Duration::from_secs(1));
            assert!(eat >= Duration::from_millis(800) && eat <= Duration::from_millis(1300));
        }
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shutdown_tests {
    use super::*;

    #[test]
    fn untriggered_sleep_runs_to_completion() {
        let shutdown = Shutdown::new();
        let t0 = Instant::now();
        assert!(shutdown.sleep(Duration::from_millis(20)));
        assert!(t0.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn triggered_sleep_returns_at_once() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());
        let t0 = Instant::now();
        assert!(!shutdown.sleep(Duration::from_secs(60)));
        assert!(t0.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn trigger_cuts_long_sleep_short() {
        let shutdown = Arc::new(Shutdown::new());
        let sleeper = {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || shutdown.sleep(Duration::from_secs(60)))
        };
        thread::sleep(Duration::from_millis(50));
        let t0 = Instant::now();
        shutdown.trigger();
        assert!(!sleeper.join().unwrap());
        assert!(t0.elapsed() < Duration::from_secs(5));
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn activity_lines_match_console_format() {
        let thinking = Activity {
            seat:     SeatId(2),
            phase:    Phase::Thinking,
            duration: Some(Duration::from_millis(710)),
        };
        let hungry = Activity { seat: SeatId(2), phase: Phase::Hungry, duration: None };
        let eating = Activity {
            seat:     SeatId(0),
            phase:    Phase::Eating,
            duration: Some(Duration::from_millis(1020)),
        };
        assert_eq!(thinking.to_string(), "3 is thinking for 0.71s");
        assert_eq!(hungry.to_string(), "\t3 is hungry");
        assert_eq!(eating.to_string(), "\t\t1 is eating for 1.02s");
    }

    #[test]
    fn meal_tally_counts_only_eating() {
        let tally = MealTally::new(3);
        for phase in [Phase::Thinking, Phase::Hungry, Phase::Eating, Phase::Eating] {
            tally.on_activity(&Activity { seat: SeatId(1), phase, duration: None });
        }
        assert_eq!(tally.counts(), vec![0, 2, 0]);
        assert_eq!(tally.meals(SeatId(1)), 2);
        assert_eq!(tally.meals(SeatId(9)), 0);
        assert!(!tally.everyone_ate());
    }

    #[test]
    fn pair_fans_out_to_both() {
        let pair = (MealTally::new(3), Trace::new(3));
        let eating = Activity { seat: SeatId(0), phase: Phase::Eating, duration: None };
        pair.on_activity(&eating);
        assert_eq!(pair.0.meals(SeatId(0)), 1);
        assert_eq!(pair.1.phases(SeatId(0)), vec![Phase::Eating]);
    }

    #[test]
    fn report_statistics() {
        let report = SimReport { meals: vec![4, 0, 7] };
        assert_eq!(report.total_meals(), 11);
        assert_eq!(report.min_meals(), 0);
        assert_eq!(report.max_meals(), 7);
        assert_eq!(report.starved(), vec![SeatId(1)]);
    }
}

// ── Running tables ────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    /// Every seat of every ring size eats at least once.
    #[test]
    fn no_deadlock_for_several_ring_sizes() {
        for n in [3, 4, 5, 7, 10] {
            let handle = SimBuilder::new(n, quick_delays())
                .seed(n as u64)
                .observer(MealTally::new(n))
                .build()
                .unwrap()
                .start()
                .unwrap();
            let tally = Arc::clone(handle.observer());
            let everyone_ate = wait_until(|| tally.everyone_ate());
            handle.stop();
            let report = handle.join().unwrap();
            assert!(everyone_ate, "n={n}: starved seats {:?}", report.starved());
            assert!(report.starved().is_empty());
        }
    }

    /// No sampled instant shows two neighbours eating.
    #[test]
    fn sampled_snapshots_never_show_adjacent_eaters() {
        let handle = SimBuilder::new(5, quick_delays()).build().unwrap().start().unwrap();
        let table = Arc::clone(handle.table());

        let mut saw_eating = false;
        let deadline = Instant::now() + Duration::from_millis(400);
        while Instant::now() < deadline {
            let snap = table.snapshot();
            assert_eq!(snap.conflict(), None, "conflict in {snap}");
            assert!(snap.eaters().len() <= 2, "five seats fit at most two eaters: {snap}");
            saw_eating |= !snap.eaters().is_empty();
            thread::yield_now();
        }

        handle.stop();
        handle.join().unwrap();
        assert!(saw_eating, "sampling never caught anyone eating");
    }

    /// Each seat reports Thinking, Hungry, Eating, Thinking, … with nothing
    /// skipped or repeated.
    #[test]
    fn phase_sequences_follow_the_cycle() {
        let n = 5;
        let handle = SimBuilder::new(n, quick_delays())
            .observer(Trace::new(n))
            .build()
            .unwrap()
            .start()
            .unwrap();
        thread::sleep(Duration::from_millis(300));
        handle.stop();
        let trace = Arc::clone(handle.observer());
        handle.join().unwrap();

        for seat in (0..n as u32).map(SeatId) {
            let phases = trace.phases(seat);
            assert_eq!(phases.first(), Some(&Phase::Thinking), "seat {seat}");
            for pair in phases.windows(2) {
                assert_eq!(pair[1], pair[0].next(), "seat {seat}: {phases:?}");
            }
        }
    }

    #[test]
    fn report_matches_meal_tally() {
        let handle = SimBuilder::new(4, quick_delays())
            .observer(MealTally::new(4))
            .build()
            .unwrap()
            .start()
            .unwrap();
        let tally = Arc::clone(handle.observer());
        assert!(wait_until(|| tally.everyone_ate()));
        handle.stop();
        let report = handle.join().unwrap();
        assert_eq!(report.meals, tally.counts());
    }

    /// Thirty-second meals and hungry seats blocked behind them must not delay
    /// shutdown; every seat that was eating puts its forks back.
    #[test]
    fn stop_interrupts_meals_and_blocked_seats() {
        let timing = FixedDelays { think: Duration::ZERO, eat: Duration::from_secs(30) };
        let handle = SimBuilder::new(5, timing).build().unwrap().start().unwrap();
        let table = Arc::clone(handle.table());
        assert!(wait_until(|| table.snapshot().count(Phase::Eating) >= 1));
        thread::sleep(Duration::from_millis(50));

        let stopper = handle.stopper();
        let t0 = Instant::now();
        stopper.stop();
        stopper.stop();
        assert!(stopper.is_stopped());
        let report = handle.join().unwrap();

        assert!(t0.elapsed() < Duration::from_secs(5), "stop took {:?}", t0.elapsed());
        assert!(report.total_meals() >= 1);
        assert!(table.is_closed());
        assert_eq!(table.snapshot().count(Phase::Eating), 0);
    }

    #[test]
    fn dropping_the_handle_stops_every_seat() {
        let timing = FixedDelays { think: Duration::ZERO, eat: Duration::from_secs(30) };
        let handle = SimBuilder::new(5, timing).build().unwrap().start().unwrap();
        let table = Arc::clone(handle.table());
        let stopper = handle.stopper();
        assert!(wait_until(|| table.snapshot().count(Phase::Eating) >= 1));

        drop(handle);

        assert!(stopper.is_stopped());
        assert!(table.is_closed());
        assert!(wait_until(|| table.snapshot().count(Phase::Eating) == 0));
    }

    #[test]
    fn run_for_returns_report() {
        let report = SimBuilder::new(3, quick_delays())
            .build()
            .unwrap()
            .run_for(Duration::from_millis(200))
            .unwrap();
        assert_eq!(report.meals.len(), 3);
        assert!(report.total_meals() > 0);
    }

    /// Observer that panics the first time seat 1 starts eating.
    struct PanicOnFirstMeal(AtomicBool);

    impl PhaseObserver for PanicOnFirstMeal {
        fn on_activity(&self, a: &Activity) {
            if a.seat == SeatId(0)
                && a.phase == Phase::Eating
                && !self.0.swap(true, Ordering::SeqCst)
            {
                panic!("observer failure");
            }
        }
    }

    #[test]
    fn panicking_seat_stops_the_table() {
        let handle = SimBuilder::new(5, quick_delays())
            .observer(PanicOnFirstMeal(AtomicBool::new(false)))
            .build()
            .unwrap()
            .start()
            .unwrap();
        let stopper = handle.stopper();
        assert!(wait_until(|| stopper.is_stopped()));
        assert!(matches!(handle.join(), Err(SimError::SeatPanicked(SeatId(0)))));
    }

    #[test]
    fn noop_observer_runs() {
        let handle = SimBuilder::new(3, quick_delays())
            .observer(NoopObserver)
            .build()
            .unwrap()
            .start()
            .unwrap();
        handle.stop();
        assert_eq!(handle.join().unwrap().meals.len(), 3);
    }
}
