//! `Gate` — a per-seat binary wake signal.
//!
//! # Why not a semaphore
//!
//! A hungry seat only ever needs to know "something changed next to you,
//! look again".  Two neighbours finishing back to back carry no more
//! information than one, so the gate holds at most one pending pass:
//!
//! - [`signal`](Gate::signal) leaves a pass (idempotent while one is pending).
//! - [`wait`](Gate::wait) blocks until a pass is available, then consumes it.
//!
//! A pass left *before* the owner starts waiting is kept, which closes the
//! window between a failed eligibility check and the call to `wait`: a
//! neighbour that finishes inside that window is never missed.
//!
//! [`close`](Gate::close) is the shutdown path.  It releases the current
//! waiter and makes every later `wait` return immediately.

use parking_lot::{Condvar, Mutex};

/// Why [`Gate::wait`] returned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GateWait {
    /// A pass was consumed; the owner should re-check eligibility.
    Signalled,
    /// The gate was closed for shutdown.
    Closed,
}

#[derive(Default)]
struct GateState {
    pending: bool,
    closed:  bool,
}

/// Single-slot wake/notify signal owned by one seat.
#[derive(Default)]
pub struct Gate {
    state: Mutex<GateState>,
    cond:  Condvar,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave a pass for the owner and wake it if it is waiting.
    pub fn signal(&self) {
        let mut state = self.state.lock();
        state.pending = true;
        // Only the owning seat ever waits on its gate.
        self.cond.notify_one();
    }

    /// Block until a pass is available or the gate is closed.
    ///
    /// A closed gate wins over a pending pass.
    pub fn wait(&self) -> GateWait {
        let mut state = self.state.lock();
        while !state.pending && !state.closed {
            self.cond.wait(&mut state);
        }
        if state.closed {
            return GateWait::Closed;
        }
        state.pending = false;
        GateWait::Signalled
    }

    /// Drop a stale pass without blocking.  Returns whether one was pending.
    pub fn clear(&self) -> bool {
        std::mem::take(&mut self.state.lock().pending)
    }

    /// `true` while a pass is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Release the waiter and every future `wait` call.  Irreversible.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.cond.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
