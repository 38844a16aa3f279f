//! Pseudo-legal move generation.
//!
//! Moves produced here respect each piece's movement pattern and the board's
//! occupancy, but not whether the mover's own king ends up attacked. That
//! filtering lives in [`crate::game::rules`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::board::{Board, Color, PieceType, Position};

/// A move from one square to another, optionally promoting a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

impl ChessMove {
    pub fn new(start: Position, end: Position) -> Self {
        ChessMove {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, promotion: PieceType) -> Self {
        ChessMove {
            start,
            end,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion)?;
        }
        Ok(())
    }
}

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// All pseudo-legal moves of the piece standing on `origin`.
///
/// Returns an empty list when the square is empty.
pub fn pseudo_legal_moves(board: &Board, origin: Position) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    let piece = match board.piece_at(origin) {
        Some(piece) => piece,
        None => return moves,
    };

    match piece.kind {
        PieceType::Pawn => pawn_moves(board, origin, piece.color, &mut moves),
        PieceType::Rook => slide(board, origin, piece.color, &ORTHOGONAL, &mut moves),
        PieceType::Bishop => slide(board, origin, piece.color, &DIAGONAL, &mut moves),
        PieceType::Queen => {
            slide(board, origin, piece.color, &ORTHOGONAL, &mut moves);
            slide(board, origin, piece.color, &DIAGONAL, &mut moves);
        }
        PieceType::Knight => step(board, origin, piece.color, &KNIGHT_JUMPS, &mut moves),
        PieceType::King => step(board, origin, piece.color, &KING_STEPS, &mut moves),
    }
    moves
}

fn pawn_moves(board: &Board, origin: Position, color: Color, moves: &mut Vec<ChessMove>) {
    let forward = color.forward();

    if let Some(one) = origin.offset(forward, 0) {
        if board.piece_at(one).is_none() {
            push_pawn_move(origin, one, color, moves);

            if origin.row() == color.pawn_home_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.piece_at(two).is_none() {
                        moves.push(ChessMove::new(origin, two));
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        if let Some(target) = origin.offset(forward, side) {
            match board.piece_at(target) {
                Some(victim) if victim.color != color => push_pawn_move(origin, target, color, moves),
                _ => {}
            }
        }
    }
}

// A pawn landing on the far rank yields one move per promotion choice.
fn push_pawn_move(origin: Position, target: Position, color: Color, moves: &mut Vec<ChessMove>) {
    if target.row() == color.promotion_row() {
        moves.extend(
            PieceType::PROMOTIONS
                .iter()
                .map(|&kind| ChessMove::promoting(origin, target, kind)),
        );
    } else {
        moves.push(ChessMove::new(origin, target));
    }
}

fn slide(board: &Board, origin: Position, color: Color, directions: &[(i8, i8)], moves: &mut Vec<ChessMove>) {
    for &(rows, cols) in directions {
        let mut cursor = origin.offset(rows, cols);
        while let Some(target) = cursor {
            match board.piece_at(target) {
                None => moves.push(ChessMove::new(origin, target)),
                Some(blocker) => {
                    if blocker.color != color {
                        moves.push(ChessMove::new(origin, target));
                    }
                    break;
                }
            }
            cursor = target.offset(rows, cols);
        }
    }
}

fn step(board: &Board, origin: Position, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<ChessMove>) {
    for &(rows, cols) in offsets {
        if let Some(target) = origin.offset(rows, cols) {
            match board.piece_at(target) {
                Some(occupant) if occupant.color == color => {}
                _ => moves.push(ChessMove::new(origin, target)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Piece;
    use std::collections::HashSet;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn destinations(moves: &[ChessMove]) -> HashSet<Position> {
        moves.iter().map(|m| m.end).collect()
    }

    fn lone(piece: Piece, at: Position) -> Board {
        let mut board = Board::empty();
        board.set_piece(at, Some(piece));
        board
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(pseudo_legal_moves(&Board::empty(), pos(4, 4)).is_empty());
    }

    #[test]
    fn pawn_single_and_double_step_from_home() {
        let board = Board::starting();
        let moves = pseudo_legal_moves(&board, pos(2, 5));
        assert_eq!(destinations(&moves), HashSet::from([pos(3, 5), pos(4, 5)]));

        let moves = pseudo_legal_moves(&board, pos(7, 4));
        assert_eq!(destinations(&moves), HashSet::from([pos(6, 4), pos(5, 4)]));
    }

    #[test]
    fn pawn_blocked_and_no_double_step_off_home() {
        let mut board = lone(Piece::new(Color::White, PieceType::Pawn), pos(2, 1));
        board.set_piece(pos(3, 1), Some(Piece::new(Color::Black, PieceType::Knight)));
        assert!(pseudo_legal_moves(&board, pos(2, 1)).is_empty());

        // Blocked on the second square only.
        let mut board = lone(Piece::new(Color::White, PieceType::Pawn), pos(2, 1));
        board.set_piece(pos(4, 1), Some(Piece::new(Color::Black, PieceType::Knight)));
        assert_eq!(destinations(&pseudo_legal_moves(&board, pos(2, 1))), HashSet::from([pos(3, 1)]));

        let board = lone(Piece::new(Color::White, PieceType::Pawn), pos(3, 1));
        assert_eq!(destinations(&pseudo_legal_moves(&board, pos(3, 1))), HashSet::from([pos(4, 1)]));
    }

    #[test]
    fn pawn_captures_only_opponents_diagonally() {
        let mut board = lone(Piece::new(Color::Black, PieceType::Pawn), pos(5, 4));
        board.set_piece(pos(4, 3), Some(Piece::new(Color::White, PieceType::Rook)));
        board.set_piece(pos(4, 5), Some(Piece::new(Color::Black, PieceType::Rook)));
        assert_eq!(
            destinations(&pseudo_legal_moves(&board, pos(5, 4))),
            HashSet::from([pos(4, 4), pos(4, 3)])
        );
    }

    #[test]
    fn pawn_promotion_emits_four_choices() {
        let mut board = lone(Piece::new(Color::White, PieceType::Pawn), pos(7, 2));
        board.set_piece(pos(8, 3), Some(Piece::new(Color::Black, PieceType::Bishop)));
        let moves = pseudo_legal_moves(&board, pos(7, 2));
        assert_eq!(8, moves.len());
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        for kind in PieceType::PROMOTIONS {
            assert!(moves.contains(&ChessMove::promoting(pos(7, 2), pos(8, 2), kind)));
            assert!(moves.contains(&ChessMove::promoting(pos(7, 2), pos(8, 3), kind)));
        }

        let board = lone(Piece::new(Color::Black, PieceType::Pawn), pos(2, 8));
        let moves = pseudo_legal_moves(&board, pos(2, 8));
        assert_eq!(4, moves.len());
        assert!(moves.iter().all(|m| m.end == pos(1, 8)));
    }

    #[test]
    fn rook_stops_at_blockers() {
        let mut board = lone(Piece::new(Color::White, PieceType::Rook), pos(4, 4));
        board.set_piece(pos(6, 4), Some(Piece::new(Color::Black, PieceType::Pawn)));
        board.set_piece(pos(4, 2), Some(Piece::new(Color::White, PieceType::Pawn)));
        let targets = destinations(&pseudo_legal_moves(&board, pos(4, 4)));

        assert!(targets.contains(&pos(5, 4)));
        assert!(targets.contains(&pos(6, 4)));
        assert!(!targets.contains(&pos(7, 4)));
        assert!(targets.contains(&pos(4, 3)));
        assert!(!targets.contains(&pos(4, 2)));
        assert!(!targets.contains(&pos(4, 1)));
        assert!(targets.contains(&pos(1, 4)));
        assert!(targets.contains(&pos(4, 8)));
        assert_eq!(2 + 1 + 3 + 4, targets.len());
    }

    #[test]
    fn bishop_slides_diagonally() {
        let board = lone(Piece::new(Color::Black, PieceType::Bishop), pos(1, 1));
        let targets = destinations(&pseudo_legal_moves(&board, pos(1, 1)));
        assert_eq!(7, targets.len());
        assert!(targets.contains(&pos(8, 8)));
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let board = lone(Piece::new(Color::White, PieceType::Queen), pos(4, 4));
        assert_eq!(27, pseudo_legal_moves(&board, pos(4, 4)).len());
    }

    #[test]
    fn knight_jumps_and_respects_own_pieces() {
        let board = lone(Piece::new(Color::White, PieceType::Knight), pos(4, 4));
        assert_eq!(8, pseudo_legal_moves(&board, pos(4, 4)).len());

        let board = Board::starting();
        let targets = destinations(&pseudo_legal_moves(&board, pos(1, 2)));
        assert_eq!(targets, HashSet::from([pos(3, 1), pos(3, 3)]));
    }

    #[test]
    fn king_steps_one_square() {
        let board = lone(Piece::new(Color::White, PieceType::King), pos(1, 1));
        let targets = destinations(&pseudo_legal_moves(&board, pos(1, 1)));
        assert_eq!(targets, HashSet::from([pos(1, 2), pos(2, 1), pos(2, 2)]));

        // No castling from the starting position.
        assert!(pseudo_legal_moves(&Board::starting(), pos(1, 5)).is_empty());
    }

    #[test]
    fn move_json_shape() {
        let json = r#"{"start":{"row":7,"col":1},"end":{"row":8,"col":1},"promotion":"QUEEN"}"#;
        let parsed: ChessMove = serde_json::from_str(json).unwrap();
        assert_eq!(ChessMove::promoting(pos(7, 1), pos(8, 1), PieceType::Queen), parsed);

        let plain = serde_json::to_string(&ChessMove::new(pos(2, 5), pos(4, 5))).unwrap();
        assert_eq!(r#"{"start":{"row":2,"col":5},"end":{"row":4,"col":5}}"#, plain);
    }
}
