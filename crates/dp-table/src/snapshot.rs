//! Point-in-time view of every seat's phase.

use std::fmt;

use dp_core::{Phase, SeatId};

use crate::Ring;

/// Phases of all seats as read under all seat locks at once.
///
/// Produced by [`Table::snapshot`](crate::Table::snapshot).  Because every
/// lock was held during the read, no seat can be caught halfway through a
/// transition.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    ring:   Ring,
    phases: Vec<Phase>,
}

impl Snapshot {
    pub(crate) fn new(ring: Ring, phases: Vec<Phase>) -> Self {
        debug_assert_eq!(ring.len(), phases.len());
        Self { ring, phases }
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Phases indexed by `SeatId`.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, seat: SeatId) -> Phase {
        self.phases[seat.index()]
    }

    /// Seats currently eating, ascending.
    pub fn eaters(&self) -> Vec<SeatId> {
        self.ring.seats().filter(|&s| self.phase(s).is_eating()).collect()
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.phases.iter().filter(|&&p| p == phase).count()
    }

    /// First pair of adjacent seats that are both eating, if any.
    ///
    /// A correct table never produces one.
    pub fn conflict(&self) -> Option<(SeatId, SeatId)> {
        self.ring.seats().find_map(|seat| {
            let right = self.ring.right(seat);
            (self.phase(seat).is_eating() && self.phase(right).is_eating()).then_some((seat, right))
        })
    }
}

impl fmt::Display for Snapshot {
    /// Compact form, one symbol per seat: `T H E T H`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phase) in self.phases.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", phase.symbol())?;
        }
        Ok(())
    }
}
