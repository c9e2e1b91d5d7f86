//! Pluggable board evaluation.
//!
//! Search delegates static scoring to `BoardScorer`, so heuristics can be
//! swapped without touching the search itself. Scores are in centipawns from
//! the point of view of the colour being optimised.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, PieceKind};

pub trait BoardScorer: Send + Sync {
    fn score(&self, board: &Board, perspective: Color) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    /// Both sides always hold exactly one king, so it carries no value.
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    fn signed(piece: &Piece, perspective: Color, value: i32) -> i32 {
        if piece.color == perspective {
            value
        } else {
            -value
        }
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &Board, perspective: Color) -> i32 {
        board
            .pieces()
            .map(|piece| Self::signed(&piece, perspective, Self::piece_value(piece.kind)))
            .sum()
    }
}

// Piece-square tables in centipawns, written from White's side with rank 1
// in the first row.

const PAWN_PST: [i16; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

const KNIGHT_PST: [i16; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

const BISHOP_PST: [i16; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

const ROOK_PST: [i16; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

const QUEEN_PST: [i16; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  5,  5,  5,  5,  5,  0,-10,
     0,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

const KING_PST: [i16; 64] = [
    20, 30, 10,  0,  0, 10, 30, 20,
    20, 20,  0,  0,  0,  0, 20, 20,
   -10,-20,-20,-20,-20,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
];

/// Material plus piece-square bonuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    /// Bonus for `piece` standing where it stands. Black reads the tables
    /// with the ranks mirrored.
    pub fn square_bonus(piece: &Piece) -> i32 {
        let row = piece.square.row as usize;
        let col = piece.square.col as usize;
        let rank_from_own_side = match piece.color {
            Color::White => 7 - row,
            Color::Black => row,
        };
        let index = rank_from_own_side * 8 + col;
        let table = match piece.kind {
            PieceKind::Pawn => &PAWN_PST,
            PieceKind::Knight => &KNIGHT_PST,
            PieceKind::Bishop => &BISHOP_PST,
            PieceKind::Rook => &ROOK_PST,
            PieceKind::Queen => &QUEEN_PST,
            PieceKind::King => &KING_PST,
        };
        i32::from(table[index])
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, board: &Board, perspective: Color) -> i32 {
        board
            .pieces()
            .map(|piece| {
                let value = MaterialScorer::piece_value(piece.kind) + Self::square_bonus(&piece);
                MaterialScorer::signed(&piece, perspective, value)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer, PieceSquareScorer};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::Color;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_is_balanced() {
        let board = Board::starting_position();
        assert_eq!(MaterialScorer.score(&board, Color::White), 0);
        assert_eq!(PieceSquareScorer.score(&board, Color::White), 0);
        assert_eq!(PieceSquareScorer.score(&board, Color::Black), 0);
    }

    #[test]
    fn extra_queen_favours_its_owner() {
        let board = parse_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialScorer.score(&board, Color::White), 900);
        assert_eq!(MaterialScorer.score(&board, Color::Black), -900);
        assert!(PieceSquareScorer.score(&board, Color::White) > 800);
    }

    #[test]
    fn advanced_pawns_score_higher() {
        let home = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let advanced = parse_fen("4k3/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(
            PieceSquareScorer.score(&advanced, Color::White) > PieceSquareScorer.score(&home, Color::White)
        );
    }
}
