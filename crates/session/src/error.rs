use chess_core::{MoveRequest, Rejected};
use thiserror::Error;

use crate::session::Mode;

/// Everything a session operation can refuse. None of these are fatal: the
/// session is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("illegal move {request}")]
    IllegalMove { request: MoveRequest },
    #[error("{operation} is not available in {mode:?} mode")]
    InvalidOperationForMode {
        operation: &'static str,
        mode: Mode,
    },
    #[error("no game in progress")]
    GameNotActive,
    #[error("it is the computer's turn")]
    NotHumanTurn,
    #[error("computer move {ticket} was cancelled or already played")]
    StaleComputerMove { ticket: u64 },
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("session driver has shut down")]
    Closed,
}

impl From<Rejected> for SessionError {
    fn from(value: Rejected) -> Self {
        match value {
            Rejected::IllegalMove { request } => SessionError::IllegalMove { request },
        }
    }
}
