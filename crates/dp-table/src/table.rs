//! `Table` (shared per-seat state) and `SeatHandle` (the only writer of one
//! seat's phase).
//!
//! # Locking discipline
//!
//! Every seat's phase lives behind its own mutex.  Code that needs more than
//! one phase at a time locks them in ascending `SeatId` order:
//!
//! - [`SeatHandle::try_eat`] locks `{left, self, right}`.
//! - [`Table::snapshot`] locks every seat.
//!
//! Single-seat locks are taken on their own and released before any other
//! lock is requested, so no cycle of waiting threads can form.
//!
//! # Single writer
//!
//! A phase is only ever written through the [`SeatHandle`] for that seat, and
//! [`Table::claim`] hands out at most one handle per seat.  Neighbours only
//! *read* each other's phases and *signal* each other's gates.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dp_core::{DpError, DpResult, Phase, SeatId};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::{Gate, GateWait, Ring, Snapshot, can_eat};

// ── Seat ──────────────────────────────────────────────────────────────────────

struct Seat {
    phase:   Mutex<Phase>,
    gate:    Gate,
    claimed: AtomicBool,
}

impl Seat {
    fn new() -> Self {
        Self {
            phase:   Mutex::new(Phase::Thinking),
            gate:    Gate::new(),
            claimed: AtomicBool::new(false),
        }
    }
}

/// The three guards held while a seat checks and commits `Hungry → Eating`.
struct Neighborhood<'a> {
    left:  MutexGuard<'a, Phase>,
    me:    MutexGuard<'a, Phase>,
    right: MutexGuard<'a, Phase>,
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// All seats of one ring.  Every seat starts `Thinking`.
///
/// Shared between seat threads as `Arc<Table>`; mutation goes through
/// [`SeatHandle`]s obtained from [`Table::claim`].
pub struct Table {
    ring:  Ring,
    seats: Vec<Seat>,
}

/// How [`SeatHandle::wait_to_eat`] ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WaitOutcome {
    /// The seat is now `Eating`.
    Eating,
    /// The table was closed while the seat was still `Hungry`.
    Closed,
}

impl Table {
    /// Build a table of `len` thinking seats.  Fails for rings under
    /// [`MIN_SEATS`](crate::MIN_SEATS).
    pub fn new(len: usize) -> DpResult<Self> {
        let ring = Ring::new(len)?;
        let seats = ring.seats().map(|_| Seat::new()).collect();
        Ok(Self { ring, seats })
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Current phase of one seat.
    ///
    /// # Panics
    /// Panics if `seat` is outside the ring.
    pub fn phase(&self, seat: SeatId) -> Phase {
        *self.seats[seat.index()].phase.lock()
    }

    /// Read every phase at a single consistent instant.
    pub fn snapshot(&self) -> Snapshot {
        let guards: Vec<MutexGuard<'_, Phase>> =
            self.seats.iter().map(|s| s.phase.lock()).collect();
        let phases = guards.iter().map(|g| **g).collect();
        Snapshot::new(self.ring, phases)
    }

    /// Take the single-writer handle for `seat`.
    ///
    /// Each seat can be claimed once for the lifetime of the table.
    pub fn claim(self: &Arc<Self>, seat: SeatId) -> DpResult<SeatHandle> {
        if !self.ring.contains(seat) {
            return Err(DpError::Config(format!(
                "seat {seat} is outside a ring of {} seats",
                self.ring.len()
            )));
        }
        if self.seats[seat.index()].claimed.swap(true, Ordering::AcqRel) {
            return Err(DpError::SeatClaimed(seat));
        }
        Ok(SeatHandle { table: Arc::clone(self), seat })
    }

    /// Claim every seat, in ascending order.
    pub fn claim_all(self: &Arc<Self>) -> DpResult<Vec<SeatHandle>> {
        self.ring.seats().map(|seat| self.claim(seat)).collect()
    }

    /// Close every gate: hungry seats blocked in
    /// [`SeatHandle::wait_to_eat`] return [`WaitOutcome::Closed`], and so do
    /// all later waits.
    pub fn close(&self) {
        debug!(seats = self.len(), "closing table");
        for seat in &self.seats {
            seat.gate.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.seats.iter().all(|s| s.gate.is_closed())
    }

    /// `true` if `seat` has an unconsumed wake pass.
    pub fn has_pending_wake(&self, seat: SeatId) -> bool {
        self.seats[seat.index()].gate.is_pending()
    }

    fn gate(&self, seat: SeatId) -> &Gate {
        &self.seats[seat.index()].gate
    }

    fn lock_neighborhood(&self, seat: SeatId) -> Neighborhood<'_> {
        let [left, right] = self.ring.neighbors(seat);
        let mut order = [(left, 0usize), (seat, 1), (right, 2)];
        order.sort_unstable_by_key(|&(id, _)| id);

        let mut slots: [Option<MutexGuard<'_, Phase>>; 3] = [None, None, None];
        for (id, slot) in order {
            slots[slot] = Some(self.seats[id.index()].phase.lock());
        }
        let [Some(left), Some(me), Some(right)] = slots else {
            unreachable!("ring of >= 3 seats gives three distinct slots");
        };
        Neighborhood { left, me, right }
    }
}

// ── SeatHandle ────────────────────────────────────────────────────────────────

/// Exclusive driver of one seat's phase.
///
/// Not `Clone`: whoever holds the handle is the seat's only writer.  Methods
/// that would skip a step of the `Thinking → Hungry → Eating` cycle return
/// [`DpError::IllegalTransition`] and leave the phase untouched.
pub struct SeatHandle {
    table: Arc<Table>,
    seat:  SeatId,
}

impl SeatHandle {
    pub fn id(&self) -> SeatId {
        self.seat
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn phase(&self) -> Phase {
        self.table.phase(self.seat)
    }

    /// `Thinking → Hungry`.  Also drops any wake pass left over from before
    /// the seat asked for forks.
    pub fn become_hungry(&mut self) -> DpResult<()> {
        self.transition(Phase::Thinking, Phase::Hungry)?;
        self.table.gate(self.seat).clear();
        Ok(())
    }

    /// Check eligibility and, if it holds, commit `Hungry → Eating` while
    /// still holding the locks the check read.
    ///
    /// Returns `Ok(false)` when a neighbour is eating.
    pub fn try_eat(&mut self) -> DpResult<bool> {
        let mut hood = self.table.lock_neighborhood(self.seat);
        if *hood.me != Phase::Hungry {
            return Err(DpError::IllegalTransition {
                seat: self.seat,
                from: *hood.me,
                to:   Phase::Eating,
            });
        }
        let (left, right) = (*hood.left, *hood.right);
        if !can_eat(*hood.me, left, right) {
            trace!(seat = %self.seat, %left, %right, "neighbour eating, not eligible");
            return Ok(false);
        }
        *hood.me = Phase::Eating;
        Ok(true)
    }

    /// Block until this hungry seat is eating or the table closes.
    ///
    /// The seat checks immediately; after each failed check it sleeps on its
    /// gate and checks again when a neighbour signals.  Both the first check
    /// and every re-check go through [`try_eat`](Self::try_eat).
    pub fn wait_to_eat(&mut self) -> DpResult<WaitOutcome> {
        loop {
            if self.try_eat()? {
                return Ok(WaitOutcome::Eating);
            }
            match self.table.gate(self.seat).wait() {
                GateWait::Signalled => debug!(seat = %self.seat, "woken by neighbour"),
                GateWait::Closed    => return Ok(WaitOutcome::Closed),
            }
        }
    }

    /// `Eating → Thinking`, then wake both neighbours so they re-check.
    pub fn finish_eating(&mut self) -> DpResult<()> {
        self.transition(Phase::Eating, Phase::Thinking)?;
        for neighbor in self.table.ring.neighbors(self.seat) {
            self.table.gate(neighbor).signal();
        }
        Ok(())
    }

    fn transition(&self, from: Phase, to: Phase) -> DpResult<()> {
        let mut phase = self.table.seats[self.seat.index()].phase.lock();
        if *phase != from {
            return Err(DpError::IllegalTransition { seat: self.seat, from: *phase, to });
        }
        *phase = to;
        Ok(())
    }
}

impl std::fmt::Debug for SeatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatHandle").field("seat", &self.seat).finish()
    }
}
