//! The game state machine: legal move filtering, move application and
//! detection of check, checkmate and stalemate.
//!
//! `GameState` is a value. [`GameState::apply_move`] never touches `self`;
//! it returns the successor state, so speculative moves are tried on
//! independent copies of the board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::board::{Board, Color, Piece, Position};
use crate::game::moves::{pseudo_legal_moves, ChessMove};

/// Whether the game still accepts moves, and why not if it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    Checkmate,
    Stalemate,
    Resigned,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Reasons the engine refuses a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("there is no piece on {0}")]
    NoPiece(Position),
    #[error("the piece on {square} belongs to {owner}, but it is {turn}'s turn")]
    NotYourPiece {
        square: Position,
        owner: Color,
        turn: Color,
    },
    #[error("{0} is not a legal move")]
    Illegal(ChessMove),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Color,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// A fresh game: standard arrangement, white to move.
    pub fn new() -> Self {
        GameState::from_board(Board::starting(), Color::White)
    }

    /// A game in progress on an arbitrary board.
    pub fn from_board(board: Board, turn: Color) -> Self {
        GameState {
            board,
            turn,
            status: GameStatus::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Legal moves of the piece on `origin`.
    ///
    /// Empty when the square is empty or holds a piece of the side not to
    /// move.
    pub fn legal_moves(&self, origin: Position) -> Vec<ChessMove> {
        match self.board.piece_at(origin) {
            Some(piece) if piece.color == self.turn => safe_moves(&self.board, origin, piece.color),
            _ => Vec::new(),
        }
    }

    /// Returns the state after `chess_move`, or why the move is refused.
    ///
    /// The successor has the other side to move, and is marked terminal if
    /// that side is now checkmated or stalemated.
    pub fn apply_move(&self, chess_move: &ChessMove) -> Result<GameState, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let piece = self
            .board
            .piece_at(chess_move.start)
            .ok_or(MoveError::NoPiece(chess_move.start))?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourPiece {
                square: chess_move.start,
                owner: piece.color,
                turn: self.turn,
            });
        }
        if !self.legal_moves(chess_move.start).contains(chess_move) {
            return Err(MoveError::Illegal(*chess_move));
        }

        let mut next = GameState::from_board(self.board.clone(), self.turn.opponent());
        execute(&mut next.board, chess_move);
        if next.is_in_checkmate(next.turn) {
            next.status = GameStatus::Checkmate;
        } else if next.is_in_stalemate(next.turn) {
            next.status = GameStatus::Stalemate;
        }
        Ok(next)
    }

    /// In-place form of [`GameState::apply_move`].
    pub fn make_move(&mut self, chess_move: &ChessMove) -> Result<(), MoveError> {
        *self = self.apply_move(chess_move)?;
        Ok(())
    }

    /// Records a resignation, ending the game.
    pub fn resign(&mut self) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        self.status = GameStatus::Resigned;
        Ok(())
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    /// In check, and no pseudo-legal move of any `color` piece gets the king
    /// out of it.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !has_safe_move(&self.board, color)
    }

    /// `color` is to move, is not in check, and has no legal move at all.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        self.turn == color && !self.is_in_check(color) && !has_safe_move(&self.board, color)
    }
}

// Relocates the moving piece, promoting it if the move says so. Legality is
// the caller's business.
fn execute(board: &mut Board, chess_move: &ChessMove) {
    let moving = board.piece_at(chess_move.start);
    let placed = moving.map(|piece| match chess_move.promotion {
        Some(kind) => Piece::new(piece.color, kind),
        None => piece,
    });
    board.set_piece(chess_move.end, placed);
    board.set_piece(chess_move.start, None);
}

fn king_attacked(board: &Board, color: Color) -> bool {
    let king = match board.find_king(color) {
        Some(king) => king,
        None => return false,
    };
    board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(position, _)| pseudo_legal_moves(board, position).iter().any(|m| m.end == king))
}

fn leaves_king_safe(board: &Board, chess_move: &ChessMove, color: Color) -> bool {
    let mut scratch = board.clone();
    execute(&mut scratch, chess_move);
    !king_attacked(&scratch, color)
}

fn safe_moves(board: &Board, origin: Position, color: Color) -> Vec<ChessMove> {
    pseudo_legal_moves(board, origin)
        .into_iter()
        .filter(|m| leaves_king_safe(board, m, color))
        .collect()
}

fn has_safe_move(board: &Board, color: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .any(|(position, _)| {
            pseudo_legal_moves(board, position)
                .iter()
                .any(|m| leaves_king_safe(board, m, color))
        })
}
