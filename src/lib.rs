//! Authoritative server for live two-player chess games with observers.
//!
//! The `game` module is the rule engine: board storage, pseudo-legal move
//! generation and the game state machine. The `websocket` module binds live
//! connections to games, enforces turn order and broadcasts every accepted
//! change to all connections watching that game. Credentials and game records
//! come from the collaborators declared in `store`.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod store;
pub mod websocket;

pub use error::{ServerError, ServerResult};
