//! Binds connections to games and routes their commands.
//!
//! The coordinator owns no sockets. Connections reach it through the
//! [`Outbox`] they registered with, and every command is turned into an
//! [`Outcome`] (the ordered messages it produces) before anything is sent.

use dashmap::DashMap;
use log::{error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ServerError;
use crate::models::{ClientCommand, CommandKind, GameId, ServerMessage};
use crate::store::{CredentialStore, GameStore};
use crate::websocket::sessions::{ConnectionId, Outbox, Outcome, SessionTable};

pub struct Coordinator {
    pub(crate) sessions: Arc<SessionTable>,
    pub(crate) credentials: Arc<dyn CredentialStore>,
    pub(crate) games: Arc<dyn GameStore>,
    game_locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl Coordinator {
    pub fn new(
        sessions: Arc<SessionTable>,
        credentials: Arc<dyn CredentialStore>,
        games: Arc<dyn GameStore>,
    ) -> Self {
        Coordinator {
            sessions,
            credentials,
            games,
            game_locks: DashMap::new(),
        }
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Registers a newly opened connection as unbound.
    pub fn open(&self, id: &str, outbox: Arc<dyn Outbox>) {
        self.sessions.register(id.to_string(), outbox);
        info!("WebSocket connection started: {}", id);
        info!("Total active sessions: {}", self.sessions.len());
    }

    /// Evicts a connection whose transport has closed. The game record is
    /// left untouched.
    pub fn close(&self, id: &str) {
        match self.sessions.remove(id) {
            Some(binding) => info!(
                "Connection {} closed while bound to game {} as {}",
                id, binding.game_id, binding.identity
            ),
            None => info!("WebSocket connection closed: {}", id),
        }
        info!("Total active sessions: {}", self.sessions.len());
    }

    /// Parses one inbound text frame, handles it and delivers the results.
    ///
    /// The mutex of the target game is held from lookup until the last
    /// message is handed to the outboxes, so commands on one game are
    /// applied and announced one at a time.
    pub fn dispatch(&self, id: &str, text: &str) {
        info!("Received message from {}: {}", id, text);
        let command = match serde_json::from_str::<ClientCommand>(text) {
            Ok(command) => command,
            Err(e) => {
                warn!("Error parsing client message: {}", e);
                let error = ServerError::Protocol(format!("invalid message format: {}", e));
                self.deliver(Outcome::reply(id, ServerMessage::error(&error)));
                return;
            }
        };

        let game_id = self.target_game(id, &command);
        let lock = game_id.map(|game_id| self.game_lock(game_id));
        {
            let _guard = lock
                .as_ref()
                .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));
            let outcome = self.handle(id, &command);
            self.deliver(outcome);
        }
        drop(lock);
        if let Some(game_id) = game_id {
            self.release_game_lock(game_id);
        }
    }

    /// Runs one command against the current bindings and game records.
    ///
    /// Rejections become a single `ERROR` message to `id`; nothing else is
    /// touched. Callers must serialize commands on the same game.
    pub fn handle(&self, id: &str, command: &ClientCommand) -> Outcome {
        let result = command
            .command_type
            .parse::<CommandKind>()
            .and_then(|kind| {
                info!("Processing {} from {}", kind, id);
                match kind {
                    CommandKind::Connect => self.handle_connect(id, command),
                    CommandKind::MakeMove => self.handle_move(id, command),
                    CommandKind::Resign => self.handle_resign(id, command),
                    CommandKind::Leave => self.handle_leave(id, command),
                }
            });

        result.unwrap_or_else(|e| {
            match &e {
                ServerError::Storage(_) => error!("Command from {} failed: {}", id, e),
                _ => warn!("Rejected command from {}: {}", id, e),
            }
            Outcome::reply(id, ServerMessage::error(&e))
        })
    }

    /// Sends every delivery of `outcome`, best effort per recipient.
    pub fn deliver(&self, outcome: Outcome) {
        for delivery in outcome.deliveries {
            let outbox = match self.sessions.outbox(&delivery.recipient) {
                Some(outbox) => outbox,
                None => {
                    info!("Connection {} not found in sessions", delivery.recipient);
                    continue;
                }
            };
            match serde_json::to_string(&delivery.message) {
                Ok(text) => {
                    if let Err(e) = outbox.send(text) {
                        warn!("Failed to send to {}: {}", delivery.recipient, e);
                    }
                }
                Err(e) => warn!("Failed to serialize message for {}: {}", delivery.recipient, e),
            }
        }

        if let Some(id) = outcome.close {
            if let Some(outbox) = self.sessions.outbox(&id) {
                info!("Closing connection {}", id);
                outbox.close();
            }
        }
    }

    /// Adds `message` for every connection bound to `game_id`, except
    /// `exclude`.
    pub(crate) fn broadcast(&self, outcome: &mut Outcome, game_id: GameId, message: ServerMessage, exclude: Option<&str>) {
        let recipients: Vec<ConnectionId> = self
            .sessions
            .bound_to(game_id)
            .into_iter()
            .filter(|id| Some(id.as_str()) != exclude)
            .collect();
        info!(
            "Broadcasting {:?} to {} connections of game {}",
            message.server_message_type,
            recipients.len(),
            game_id
        );
        for recipient in recipients {
            outcome.send(&recipient, message.clone());
        }
    }

    // Connect targets the game it names, if that game exists; everything
    // else acts on the game the connection is already bound to. Unbound
    // non-connect commands are rejected without touching a game.
    fn target_game(&self, id: &str, command: &ClientCommand) -> Option<GameId> {
        if command.command_type == CommandKind::Connect.to_string() {
            return command
                .game_id
                .filter(|&game_id| self.games.lookup_game(game_id).is_some());
        }
        self.sessions.binding(id).map(|binding| binding.game_id)
    }

    fn game_lock(&self, game_id: GameId) -> Arc<Mutex<()>> {
        self.game_locks.entry(game_id).or_default().clone()
    }

    // Drops the lock of `game_id` once no dispatch holds or waits on it.
    fn release_game_lock(&self, game_id: GameId) {
        self.game_locks
            .remove_if(&game_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
