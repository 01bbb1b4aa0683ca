use dp_core::{DpError, SeatId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Table(#[from] DpError),

    #[error("failed to spawn thread for seat {seat}: {source}")]
    Spawn {
        seat:   SeatId,
        #[source]
        source: std::io::Error,
    },

    #[error("seat {0} thread panicked")]
    SeatPanicked(SeatId),
}

pub type SimResult<T> = Result<T, SimError>;
