use serde::{Deserialize, Serialize};

use crate::game::{Color, GameState};

pub type GameId = u32;

/// The authoritative record of one game, as kept by the game store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_identity: Option<String>,
    pub black_identity: Option<String>,
    pub game_name: String,
    pub state: GameState,
}

impl GameRecord {
    /// A new game with empty seats and the standard starting position.
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        GameRecord {
            game_id,
            white_identity: None,
            black_identity: None,
            game_name: game_name.into(),
            state: GameState::new(),
        }
    }

    pub fn identity_for(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_identity.as_deref(),
            Color::Black => self.black_identity.as_deref(),
        }
    }

    /// The seat held by `identity`, or `None` for an observer.
    pub fn seat_of(&self, identity: &str) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.identity_for(color) == Some(identity))
    }

    /// Empties every seat `identity` holds. Returns the seats that were cleared.
    pub fn vacate(&mut self, identity: &str) -> Vec<Color> {
        let mut cleared = Vec::new();
        if self.white_identity.as_deref() == Some(identity) {
            self.white_identity = None;
            cleared.push(Color::White);
        }
        if self.black_identity.as_deref() == Some(identity) {
            self.black_identity = None;
            cleared.push(Color::Black);
        }
        cleared
    }
}
