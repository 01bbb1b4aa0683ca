//! The eating eligibility check.

use dp_core::Phase;

/// May a seat in phase `me`, sitting between `left` and `right`, start eating?
///
/// True iff the seat is hungry and neither neighbour holds the shared fork.
/// The predicate alone does not prevent two neighbours from both starting to
/// eat; [`SeatHandle::try_eat`](crate::SeatHandle::try_eat) evaluates it and
/// commits the transition under the same three locks.
#[inline]
pub fn can_eat(me: Phase, left: Phase, right: Phase) -> bool {
    me == Phase::Hungry && !left.is_eating() && !right.is_eating()
}
