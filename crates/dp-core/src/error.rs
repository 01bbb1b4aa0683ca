//! Table error type.
//!
//! Every variant is a construction-time or programming-error precondition.
//! A running table has no recoverable failure modes: a seat that can never
//! eat simply stays blocked.

use thiserror::Error;

use crate::{Phase, SeatId};

/// The top-level error type for `dp-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DpError {
    #[error("a ring needs at least {min} seats, got {got}")]
    TooFewSeats { got: usize, min: usize },

    #[error("{0} seats do not fit in a 32-bit seat id")]
    TooManySeats(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("seat {0} is already claimed by another driver")]
    SeatClaimed(SeatId),

    #[error("seat {seat} cannot move from {from} to {to}")]
    IllegalTransition { seat: SeatId, from: Phase, to: Phase },
}

/// Shorthand result type for all `dp-*` crates.
pub type DpResult<T> = Result<T, DpError>;
