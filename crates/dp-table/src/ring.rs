//! Circular seat adjacency.
//!
//! Neighbours are pure index arithmetic: seat `i` sits between
//! `(i - 1) mod N` (left) and `(i + 1) mod N` (right).  Nothing is linked, so
//! there are no back-references to keep alive and nothing to re-point after
//! construction.

use dp_core::{DpError, DpResult, SeatId};

/// Smallest ring where every seat has two *distinct* neighbours.
pub const MIN_SEATS: usize = 3;

/// Immutable ring of `len` seats.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Ring {
    len: usize,
}

impl Ring {
    /// Build a ring of `len` seats.
    ///
    /// Fails with [`DpError::TooFewSeats`] below [`MIN_SEATS`]: with two seats
    /// both neighbours would be the same seat, and with one the seat would be
    /// its own neighbour.
    pub fn new(len: usize) -> DpResult<Self> {
        if len < MIN_SEATS {
            return Err(DpError::TooFewSeats { got: len, min: MIN_SEATS });
        }
        if u32::try_from(len).is_err() {
            return Err(DpError::TooManySeats(len));
        }
        Ok(Self { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; a constructed ring holds at least [`MIN_SEATS`].
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if `seat` is a slot of this ring.
    #[inline]
    pub fn contains(&self, seat: SeatId) -> bool {
        seat.index() < self.len
    }

    /// Predecessor of `seat`; `left(0)` wraps to the last seat.
    #[inline]
    pub fn left(&self, seat: SeatId) -> SeatId {
        SeatId(((seat.index() + self.len - 1) % self.len) as u32)
    }

    /// Successor of `seat`; the last seat's right neighbour is seat 0.
    #[inline]
    pub fn right(&self, seat: SeatId) -> SeatId {
        SeatId(((seat.index() + 1) % self.len) as u32)
    }

    /// `[left, right]`.
    #[inline]
    pub fn neighbors(&self, seat: SeatId) -> [SeatId; 2] {
        [self.left(seat), self.right(seat)]
    }

    /// `true` if `a` and `b` share a fork.
    pub fn are_adjacent(&self, a: SeatId, b: SeatId) -> bool {
        a != b && (self.right(a) == b || self.left(a) == b)
    }

    /// Every seat in ascending order.
    pub fn seats(&self) -> impl Iterator<Item = SeatId> {
        (0..self.len as u32).map(SeatId)
    }
}
