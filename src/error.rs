//! Rejection taxonomy for the session coordinator.
//!
//! Every variant ends up as a single `ERROR` message to the connection that
//! sent the offending command.

use thiserror::Error;

use crate::game::MoveError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("it is not your turn")]
    OutOfTurn,
    #[error("the game is already over")]
    AlreadyTerminal,
    #[error("malformed command: {0}")]
    Protocol(String),
    #[error("could not save the game: {0}")]
    Storage(String),
}

impl From<MoveError> for ServerError {
    fn from(error: MoveError) -> Self {
        match error {
            MoveError::GameOver => ServerError::AlreadyTerminal,
            other => ServerError::InvalidMove(other.to_string()),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(error: StoreError) -> Self {
        ServerError::Storage(error.to_string())
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
