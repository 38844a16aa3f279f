use crate::game::board::{Color, Piece};
use crate::game::moves::ChessMove;
use crate::game::rules::{GameState, GameStatus};

/// Human-readable description of a move for notifications.
pub fn describe_move(identity: &str, piece: Piece, chess_move: &ChessMove, captured: Option<Piece>) -> String {
    let mut text = format!(
        "{} ({}) moved {} from {} to {}",
        identity, piece.color, piece.kind, chess_move.start, chess_move.end
    );
    if let Some(victim) = captured {
        text.push_str(&format!(", capturing a {}", victim.kind));
    }
    if let Some(promotion) = chess_move.promotion {
        text.push_str(&format!(", promoting to a {}", promotion));
    }
    text
}

/// Announcement that follows a move, if the move changed the game's outlook.
pub fn outcome_notice(state: &GameState, defender_identity: Option<&str>) -> Option<String> {
    let loser = state.turn();
    let who = defender_identity.map(|name| format!("{} ({})", name, loser)).unwrap_or_else(|| loser.to_string());
    match state.status() {
        GameStatus::Checkmate => Some(format!("Checkmate! {} loses, {} wins", who, loser.opponent())),
        GameStatus::Stalemate => Some("Stalemate! The game is a draw".to_string()),
        GameStatus::InProgress if state.is_in_check(loser) => Some(format!("{} is in check", who)),
        _ => None,
    }
}

pub fn seat_label(seat: Option<Color>) -> String {
    match seat {
        Some(color) => format!("as {}", color),
        None => "as an observer".to_string(),
    }
}
