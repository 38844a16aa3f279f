use dashmap::DashMap;
use log::info;

use crate::config::SeedData;
use crate::models::{GameId, GameRecord};
use crate::store::{CredentialStore, GameStore, StoreError};

/// Process-local credential and game store.
#[derive(Default)]
pub struct MemoryStore {
    credentials: DashMap<String, String>,
    games: DashMap<GameId, GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let store = MemoryStore::new();
        for (token, identity) in seed.credentials {
            store.insert_credential(token, identity);
        }
        for game in seed.games {
            let mut record = GameRecord::new(game.game_id, game.game_name);
            record.white_identity = game.white_identity;
            record.black_identity = game.black_identity;
            store.insert_game(record);
        }
        info!(
            "Seeded store with {} credentials and {} games",
            store.credentials.len(),
            store.games.len()
        );
        store
    }

    pub fn insert_credential(&self, token: impl Into<String>, identity: impl Into<String>) {
        self.credentials.insert(token.into(), identity.into());
    }

    pub fn insert_game(&self, record: GameRecord) {
        self.games.insert(record.game_id, record);
    }
}

impl CredentialStore for MemoryStore {
    fn lookup_credential(&self, token: &str) -> Option<String> {
        self.credentials.get(token).map(|identity| identity.value().clone())
    }
}

impl GameStore for MemoryStore {
    fn lookup_game(&self, game_id: GameId) -> Option<GameRecord> {
        self.games.get(&game_id).map(|record| record.value().clone())
    }

    // Games are created elsewhere; saving only replaces existing records.
    fn save_game(&self, record: &GameRecord) -> Result<(), StoreError> {
        match self.games.get_mut(&record.game_id) {
            Some(mut slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::MissingGame(record.game_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedGame;
    use std::collections::HashMap;

    #[test]
    fn lookups() {
        let store = MemoryStore::new();
        store.insert_credential("tok", "alice");
        store.insert_game(GameRecord::new(1, "first"));

        assert_eq!(Some("alice".to_string()), store.lookup_credential("tok"));
        assert_eq!(None, store.lookup_credential("nope"));
        assert_eq!("first", store.lookup_game(1).unwrap().game_name);
        assert!(store.lookup_game(2).is_none());
    }

    #[test]
    fn save_replaces_existing_and_rejects_unknown() {
        let store = MemoryStore::new();
        store.insert_game(GameRecord::new(1, "first"));

        let mut record = store.lookup_game(1).unwrap();
        record.white_identity = Some("alice".to_string());
        store.save_game(&record).unwrap();
        assert_eq!(record, store.lookup_game(1).unwrap());

        let stray = GameRecord::new(9, "stray");
        assert_eq!(Err(StoreError::MissingGame(9)), store.save_game(&stray));
    }

    #[test]
    fn seeding() {
        let seed = SeedData {
            credentials: HashMap::from([("t1".to_string(), "alice".to_string())]),
            games: vec![SeedGame {
                game_id: 5,
                game_name: "seeded".to_string(),
                white_identity: Some("alice".to_string()),
                black_identity: None,
            }],
        };
        let store = MemoryStore::from_seed(seed);
        assert_eq!(Some("alice".to_string()), store.lookup_credential("t1"));
        let record = store.lookup_game(5).unwrap();
        assert_eq!(Some("alice".to_string()), record.white_identity);
        assert_eq!(None, record.black_identity);
    }
}
