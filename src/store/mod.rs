//! Contracts for the collaborators that own credentials and game records.
//!
//! Registration, game creation and durable storage live outside this crate.
//! The coordinator only needs to look credentials up and read and write
//! whole game records.

use thiserror::Error;

use crate::models::{GameId, GameRecord};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("game {0} does not exist")]
    MissingGame(GameId),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Resolves auth tokens to identities.
pub trait CredentialStore: Send + Sync {
    fn lookup_credential(&self, token: &str) -> Option<String>;
}

/// Reads and writes authoritative game records.
pub trait GameStore: Send + Sync {
    fn lookup_game(&self, game_id: GameId) -> Option<GameRecord>;

    fn save_game(&self, record: &GameRecord) -> Result<(), StoreError>;
}
