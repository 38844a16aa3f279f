//! Board representation: squares, sides, pieces and the 8x8 grid.
//!
//! The board only stores pieces. It knows nothing about how they move or
//! whose turn it is; see [`crate::game::moves`] and [`crate::game::rules`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// One side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step for this side.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row this side's pawns start on.
    pub fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Farthest row from this side, where its pawns promote.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => BOARD_SIZE,
            Color::Black => 1,
        }
    }

    fn back_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => BOARD_SIZE,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Pieces a pawn may become on the far rank, in generation order.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
    ];
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PieceType::King => "king",
            PieceType::Queen => "queen",
            PieceType::Rook => "rook",
            PieceType::Bishop => "bishop",
            PieceType::Knight => "knight",
            PieceType::Pawn => "pawn",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }
}

/// A square on the board, addressed by 1-based row and column.
///
/// Rows count from white's side (row 1) to black's side (row 8); columns
/// count from the a-file (1) to the h-file (8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: i64,
    col: i64,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let row = u8::try_from(raw.row).ok();
        let col = u8::try_from(raw.col).ok();
        row.zip(col)
            .and_then(|(row, col)| Position::new(row, col))
            .ok_or_else(|| format!("square ({}, {}) is off the board", raw.row, raw.col))
    }
}

impl Position {
    /// Creates a position, or `None` when either coordinate is outside 1..=8.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if !(1..=BOARD_SIZE).contains(&row) || !(1..=BOARD_SIZE).contains(&col) {
            return None;
        }
        Some(Position { row, col })
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `rows` up and `cols` right of this one, if it is on the board.
    pub fn offset(self, rows: i8, cols: i8) -> Option<Position> {
        let row = self.row as i8 + rows;
        let col = self.col as i8 + cols;
        if row < 1 || col < 1 {
            return None;
        }
        Position::new(row as u8, col as u8)
    }

    /// Every square, row by row starting at row 1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |col| Position { row, col }))
    }

    fn index(self) -> (usize, usize) {
        (self.row as usize - 1, self.col as usize - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col - 1) as char, self.row)
    }
}

/// Fixed 8x8 grid of optional pieces.
///
/// `Clone` produces a fully independent copy; nothing inside the grid is
/// shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Board {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// A board in the standard starting arrangement.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        board.reset();
        board
    }

    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        let (row, col) = position.index();
        self.squares[row][col]
    }

    /// Puts `piece` on `position`, or clears the square when `piece` is `None`.
    pub fn set_piece(&mut self, position: Position, piece: Option<Piece>) {
        let (row, col) = position.index();
        self.squares[row][col] = piece;
    }

    /// Clears the board and sets up the standard starting arrangement.
    pub fn reset(&mut self) {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        self.squares = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for color in Color::ALL {
            for (col, kind) in (1..=BOARD_SIZE).zip(BACK_RANK) {
                self.place(color.back_row(), col, Piece::new(color, kind));
                self.place(color.pawn_home_row(), col, Piece::new(color, PieceType::Pawn));
            }
        }
    }

    fn place(&mut self, row: u8, col: u8, piece: Piece) {
        if let Some(position) = Position::new(row, col) {
            self.set_piece(position, Some(piece));
        }
    }

    /// All occupied squares with their pieces, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |position| self.piece_at(position).map(|piece| (position, piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.color == color && piece.kind == PieceType::King)
            .map(|(position, _)| position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn position_bounds() {
        assert!(Position::new(0, 4).is_none());
        assert!(Position::new(9, 4).is_none());
        assert!(Position::new(4, 9).is_none());
        assert_eq!(Some(pos(8, 8)), Position::new(8, 8));
        assert_eq!(None, pos(1, 1).offset(-1, 0));
        assert_eq!(None, pos(8, 8).offset(0, 1));
        assert_eq!(Some(pos(3, 2)), pos(1, 1).offset(2, 1));
    }

    #[test]
    fn position_display() {
        assert_eq!("a1", pos(1, 1).to_string());
        assert_eq!("e4", pos(4, 5).to_string());
        assert_eq!("h8", pos(8, 8).to_string());
    }

    #[test]
    fn position_rejects_off_board_json() {
        assert!(serde_json::from_str::<Position>(r#"{"row":0,"col":3}"#).is_err());
        assert!(serde_json::from_str::<Position>(r#"{"row":3,"col":-1}"#).is_err());
        assert_eq!(
            pos(2, 5),
            serde_json::from_str::<Position>(r#"{"row":2,"col":5}"#).unwrap()
        );
    }

    #[test]
    fn starting_arrangement() {
        let board = Board::starting();
        assert_eq!(32, board.pieces().count());
        for col in 1..=8 {
            assert_eq!(Some(Piece::new(Color::White, PieceType::Pawn)), board.piece_at(pos(2, col)));
            assert_eq!(Some(Piece::new(Color::Black, PieceType::Pawn)), board.piece_at(pos(7, col)));
        }
        assert_eq!(Some(Piece::new(Color::White, PieceType::Queen)), board.piece_at(pos(1, 4)));
        assert_eq!(Some(Piece::new(Color::Black, PieceType::King)), board.piece_at(pos(8, 5)));
        assert_eq!(Some(Piece::new(Color::Black, PieceType::Knight)), board.piece_at(pos(8, 7)));
        assert_eq!(Some(pos(1, 5)), board.find_king(Color::White));
        assert_eq!(None, board.piece_at(pos(4, 4)));
    }

    #[test]
    fn reset_clears_previous_pieces() {
        let mut board = Board::empty();
        board.set_piece(pos(5, 5), Some(Piece::new(Color::White, PieceType::Queen)));
        board.reset();
        assert_eq!(None, board.piece_at(pos(5, 5)));
        assert_eq!(Board::starting(), board);
    }

    #[test]
    fn clone_does_not_alias() {
        let original = Board::starting();
        let mut copy = original.clone();
        copy.set_piece(pos(2, 1), None);
        assert!(original.piece_at(pos(2, 1)).is_some());
        assert!(copy.piece_at(pos(2, 1)).is_none());
    }
}
