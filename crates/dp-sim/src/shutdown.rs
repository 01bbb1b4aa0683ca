//! Stop flag with an interruptible sleep.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Shared "please stop" flag.
///
/// Seat threads do their think/eat delays through [`Shutdown::sleep`] so a
/// stop request ends the delay at once instead of after up to a full meal.
#[derive(Default)]
pub struct Shutdown {
    stopped: Mutex<bool>,
    cond:    Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every sleeper.  Idempotent.
    pub fn trigger(&self) {
        let mut stopped = self.stopped.lock();
        *stopped = true;
        self.cond.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.stopped.lock()
    }

    /// Sleep for `duration` unless the flag is raised first.
    ///
    /// Returns `true` if the full duration elapsed, `false` if the sleep was
    /// cut short (or the flag was already up).
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        let mut stopped = self.stopped.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut stopped, deadline).timed_out() {
                        return !*stopped;
                    }
                }
                None => self.cond.wait(&mut stopped),
            }
        }
        false
    }
}
