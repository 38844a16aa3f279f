use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ServerError;
use crate::game::ChessMove;
use crate::models::game_record::{GameId, GameRecord};

/// Command sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientCommand {
    pub command_type: String,
    pub auth_token: Option<String>,
    #[serde(rename = "gameID")]
    pub game_id: Option<GameId>,
    #[serde(rename = "move")]
    pub chess_move: Option<ChessMove>,
}

/// The closed set of commands a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Connect,
    MakeMove,
    Resign,
    Leave,
}

impl FromStr for CommandKind {
    type Err = ServerError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "CONNECT" => Ok(CommandKind::Connect),
            "MAKE_MOVE" => Ok(CommandKind::MakeMove),
            "RESIGN" => Ok(CommandKind::Resign),
            "LEAVE" => Ok(CommandKind::Leave),
            other => Err(ServerError::Protocol(format!("unknown command type {}", other))),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            CommandKind::Connect => "CONNECT",
            CommandKind::MakeMove => "MAKE_MOVE",
            CommandKind::Resign => "RESIGN",
            CommandKind::Leave => "LEAVE",
        };
        write!(f, "{}", tag)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessageType {
    LoadGame,
    Notification,
    Error,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    pub server_message_type: ServerMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameRecord>,
}

impl ServerMessage {
    pub fn load_game(record: GameRecord) -> Self {
        ServerMessage {
            server_message_type: ServerMessageType::LoadGame,
            message: None,
            game: Some(record),
        }
    }

    pub fn notification(text: impl Into<String>) -> Self {
        ServerMessage {
            server_message_type: ServerMessageType::Notification,
            message: Some(text.into()),
            game: None,
        }
    }

    pub fn error(error: &ServerError) -> Self {
        ServerMessage {
            server_message_type: ServerMessageType::Error,
            message: Some(format!("Error: {}", error)),
            game: None,
        }
    }
}

/// Serialized frame queued for delivery to one websocket actor
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChessWebSocketMessage(pub String);

/// Asks a websocket actor to close its connection
#[derive(Message)]
#[rtype(result = "()")]
pub struct CloseConnection;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PieceType, Position};

    #[test]
    fn parses_move_command() {
        let json = r#"{
            "commandType": "MAKE_MOVE",
            "authToken": "tok",
            "gameID": 12,
            "move": {"start": {"row": 7, "col": 3}, "end": {"row": 8, "col": 3}, "promotion": "KNIGHT"}
        }"#;
        let command: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(Ok(CommandKind::MakeMove), command.command_type.parse());
        assert_eq!(Some(12), command.game_id);
        let chess_move = command.chess_move.unwrap();
        assert_eq!(Position::new(7, 3).unwrap(), chess_move.start);
        assert_eq!(Some(PieceType::Knight), chess_move.promotion);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let command: ClientCommand = serde_json::from_str(r#"{"commandType":"LEAVE"}"#).unwrap();
        assert_eq!(None, command.auth_token);
        assert_eq!(None, command.game_id);
        assert_eq!(None, command.chess_move);
    }

    #[test]
    fn unknown_tag_is_protocol_error() {
        assert!(matches!("DANCE".parse::<CommandKind>(), Err(ServerError::Protocol(_))));
    }

    #[test]
    fn server_message_shapes() {
        let json = serde_json::to_value(ServerMessage::error(&ServerError::OutOfTurn)).unwrap();
        assert_eq!("ERROR", json["serverMessageType"]);
        assert_eq!("Error: it is not your turn", json["message"]);
        assert!(json.get("game").is_none());

        let json = serde_json::to_value(ServerMessage::load_game(GameRecord::new(1, "g"))).unwrap();
        assert_eq!("LOAD_GAME", json["serverMessageType"]);
        assert_eq!(1, json["game"]["gameID"]);
        assert!(json.get("message").is_none());
    }
}
