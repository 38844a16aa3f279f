use log::info;

use crate::error::{ServerError, ServerResult};
use crate::game::utils::{describe_move, outcome_notice, seat_label};
use crate::models::{ClientCommand, GameRecord, ServerMessage};
use crate::websocket::coordinator::Coordinator;
use crate::websocket::sessions::{Binding, Outcome};

impl Coordinator {
    pub(crate) fn handle_connect(&self, id: &str, command: &ClientCommand) -> ServerResult<Outcome> {
        let token = command
            .auth_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServerError::Unauthorized("an auth token is required to connect".to_string()))?;
        let game_id = command
            .game_id
            .ok_or_else(|| ServerError::Protocol("a gameID is required to connect".to_string()))?;

        let identity = self
            .credentials
            .lookup_credential(token)
            .ok_or_else(|| ServerError::Unauthorized("invalid auth token".to_string()))?;
        let record = self
            .games
            .lookup_game(game_id)
            .ok_or_else(|| ServerError::NotFound(format!("game {}", game_id)))?;

        let previous = self.sessions.binding(id);
        let binding = Binding {
            identity: identity.clone(),
            game_id,
        };
        if !self.sessions.bind(id, binding) {
            return Err(ServerError::Protocol(format!("connection {} is not registered", id)));
        }
        info!("User {} connected to game {} ({})", identity, game_id, record.game_name);

        let seat = seat_label(record.seat_of(&identity));
        let mut outcome = Outcome::reply(id, ServerMessage::load_game(record));
        if let Some(previous) = previous.filter(|previous| previous.game_id != game_id) {
            info!(
                "Connection {} moved from game {} to game {}",
                id, previous.game_id, game_id
            );
            self.broadcast(
                &mut outcome,
                previous.game_id,
                ServerMessage::notification(format!("{} moved to another game", previous.identity)),
                None,
            );
        }
        self.broadcast(
            &mut outcome,
            game_id,
            ServerMessage::notification(format!("{} joined the game {}", identity, seat)),
            Some(id),
        );
        Ok(outcome)
    }

    pub(crate) fn handle_move(&self, id: &str, command: &ClientCommand) -> ServerResult<Outcome> {
        let binding = self.bound_session(id, command)?;
        let chess_move = command
            .chess_move
            .ok_or_else(|| ServerError::Protocol("MAKE_MOVE requires a move".to_string()))?;
        let mut record = self.load_record(&binding)?;

        if record.state.is_over() {
            return Err(ServerError::AlreadyTerminal);
        }
        let mover = record.state.turn();
        if record.identity_for(mover) != Some(binding.identity.as_str()) {
            return Err(ServerError::OutOfTurn);
        }

        let board = record.state.board();
        let piece = board
            .piece_at(chess_move.start)
            .ok_or_else(|| ServerError::InvalidMove(format!("there is no piece on {}", chess_move.start)))?;
        let captured = board.piece_at(chess_move.end);

        record.state = record.state.apply_move(&chess_move)?;
        self.games.save_game(&record)?;
        info!("Game {}: {} played {}", record.game_id, binding.identity, chess_move);

        let description = describe_move(&binding.identity, piece, &chess_move, captured);
        let notice = outcome_notice(&record.state, record.identity_for(mover.opponent()));

        // The mover gets the state too, so every client ends on the same view.
        let mut outcome = Outcome::default();
        self.broadcast(&mut outcome, record.game_id, ServerMessage::load_game(record.clone()), None);
        self.broadcast(&mut outcome, record.game_id, ServerMessage::notification(description), None);
        if let Some(notice) = notice {
            self.broadcast(&mut outcome, record.game_id, ServerMessage::notification(notice), None);
        }
        Ok(outcome)
    }

    pub(crate) fn handle_resign(&self, id: &str, command: &ClientCommand) -> ServerResult<Outcome> {
        let binding = self.bound_session(id, command)?;
        let mut record = self.load_record(&binding)?;

        if record.state.is_over() {
            return Err(ServerError::AlreadyTerminal);
        }
        let seat = record
            .seat_of(&binding.identity)
            .ok_or_else(|| ServerError::Unauthorized("observers cannot resign".to_string()))?;

        record.state.resign()?;
        self.games.save_game(&record)?;
        info!("Game {}: {} resigned as {}", record.game_id, binding.identity, seat);

        let mut outcome = Outcome::default();
        self.broadcast(
            &mut outcome,
            record.game_id,
            ServerMessage::notification(format!(
                "{} ({}) resigned, {} wins",
                binding.identity,
                seat,
                seat.opponent()
            )),
            None,
        );
        Ok(outcome)
    }

    pub(crate) fn handle_leave(&self, id: &str, command: &ClientCommand) -> ServerResult<Outcome> {
        let binding = self.bound_session(id, command)?;
        let mut record = self.games.lookup_game(binding.game_id);
        let vacated = record
            .as_mut()
            .map(|record| record.vacate(&binding.identity))
            .unwrap_or_default();

        let text = match (vacated.first(), record) {
            (Some(seat), Some(record)) => {
                self.games.save_game(&record)?;
                format!("{} left the game, giving up the {} seat", binding.identity, seat)
            }
            _ => format!("{} stopped observing the game", binding.identity),
        };
        // A refused save above leaves the binding in place.
        self.sessions.unbind(id);
        info!("Connection {} left game {}: {}", id, binding.game_id, text);

        let mut outcome = Outcome::default();
        self.broadcast(&mut outcome, binding.game_id, ServerMessage::notification(text), None);
        outcome.close = Some(id.to_string());
        Ok(outcome)
    }

    // The binding of `id`, after checking the command agrees with it.
    fn bound_session(&self, id: &str, command: &ClientCommand) -> ServerResult<Binding> {
        let binding = self
            .sessions
            .binding(id)
            .ok_or_else(|| ServerError::Unauthorized("connect to a game first".to_string()))?;

        if let Some(game_id) = command.game_id {
            if game_id != binding.game_id {
                return Err(ServerError::Protocol(format!(
                    "this connection is bound to game {}, not {}",
                    binding.game_id, game_id
                )));
            }
        }
        if let Some(token) = command.auth_token.as_deref() {
            if self.credentials.lookup_credential(token).as_deref() != Some(binding.identity.as_str()) {
                return Err(ServerError::Unauthorized("auth token does not match this connection".to_string()));
            }
        }
        Ok(binding)
    }

    fn load_record(&self, binding: &Binding) -> ServerResult<GameRecord> {
        self.games
            .lookup_game(binding.game_id)
            .ok_or_else(|| ServerError::NotFound(format!("game {}", binding.game_id)))
    }
}
