pub mod board;
pub mod moves;
pub mod rules;
pub mod utils;

pub use board::{Board, Color, Piece, PieceType, Position};
pub use moves::{pseudo_legal_moves, ChessMove};
pub use rules::{GameState, GameStatus, MoveError};
