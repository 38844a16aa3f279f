//! Table of live connections and the games they are bound to.

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{GameId, ServerMessage};

pub type ConnectionId = String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not deliver to connection: {0}")]
pub struct DeliveryError(pub String);

/// Outbound half of a live connection.
pub trait Outbox: Send + Sync {
    fn send(&self, text: String) -> Result<(), DeliveryError>;

    fn close(&self);
}

/// The (identity, game) pair a connection participates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub identity: String,
    pub game_id: GameId,
}

struct SessionEntry {
    outbox: Arc<dyn Outbox>,
    binding: Option<Binding>,
}

/// Every open connection, bound or not.
#[derive(Default)]
pub struct SessionTable {
    sessions: DashMap<ConnectionId, SessionEntry>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly opened, unbound connection.
    pub fn register(&self, id: ConnectionId, outbox: Arc<dyn Outbox>) {
        self.sessions.insert(id, SessionEntry { outbox, binding: None });
    }

    /// Forgets a connection entirely, returning the binding it held.
    pub fn remove(&self, id: &str) -> Option<Binding> {
        self.sessions.remove(id).and_then(|(_, entry)| entry.binding)
    }

    pub fn binding(&self, id: &str) -> Option<Binding> {
        self.sessions.get(id).and_then(|entry| entry.binding.clone())
    }

    /// Binds a registered connection. Returns false if the connection is unknown.
    pub fn bind(&self, id: &str, binding: Binding) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.binding = Some(binding);
                true
            }
            None => false,
        }
    }

    pub fn unbind(&self, id: &str) -> Option<Binding> {
        self.sessions.get_mut(id).and_then(|mut entry| entry.binding.take())
    }

    /// Connections currently bound to `game_id`.
    pub fn bound_to(&self, game_id: GameId) -> Vec<ConnectionId> {
        self.sessions
            .iter()
            .filter(|entry| entry.binding.as_ref().map(|b| b.game_id) == Some(game_id))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn outbox(&self, id: &str) -> Option<Arc<dyn Outbox>> {
        self.sessions.get(id).map(|entry| entry.outbox.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// One message addressed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub recipient: ConnectionId,
    pub message: ServerMessage,
}

/// Everything a handled command sends, in order, plus whether the
/// requesting connection should be closed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub deliveries: Vec<Delivery>,
    pub close: Option<ConnectionId>,
}

impl Outcome {
    pub fn reply(recipient: &str, message: ServerMessage) -> Self {
        let mut outcome = Outcome::default();
        outcome.send(recipient, message);
        outcome
    }

    pub fn send(&mut self, recipient: &str, message: ServerMessage) {
        self.deliveries.push(Delivery {
            recipient: recipient.to_string(),
            message,
        });
    }
}
