//! King-safety and attack detection.
//!
//! `is_square_attacked` looks outward from the target square: contact
//! threats on the eight neighbours, then knight jumps, then the first
//! occupant along each of the eight rays. Any hit short-circuits.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::king_moves::KING_OFFSETS;
use crate::moves::knight_moves::knight_targets;
use crate::moves::queen_moves::{is_diagonal, QUEEN_DIRECTIONS};
use crate::moves::rays::ray;

#[inline]
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.king(color).map(|king| king.square)
}

/// A side without a king is never in check.
#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.reverse())
}

#[inline]
pub fn is_king_safe(board: &Board, color: Color) -> bool {
    !is_king_in_check(board, color)
}

pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    is_contact_threat(board, square, attacker_color)
        || is_knight_threat(board, square, attacker_color)
        || is_ray_threat(board, square, attacker_color)
}

/// Enemy king anywhere adjacent, or an enemy pawn diagonally in front of the
/// square from the pawn's point of view.
fn is_contact_threat(board: &Board, square: Square, attacker_color: Color) -> bool {
    // A pawn attacks against its own direction of travel, seen from the target.
    let pawn_row = -attacker_color.pawn_direction();
    KING_OFFSETS.iter().any(|&(d_row, d_col)| {
        let Some(neighbour) = square.offset(d_row, d_col) else {
            return false;
        };
        match board.piece_at(neighbour) {
            Some(piece) if piece.color == attacker_color => match piece.kind {
                PieceKind::King => true,
                PieceKind::Pawn => d_row == pawn_row && d_col != 0,
                _ => false,
            },
            _ => false,
        }
    })
}

fn is_knight_threat(board: &Board, square: Square, attacker_color: Color) -> bool {
    knight_targets(square).any(|from| {
        matches!(
            board.piece_at(from),
            Some(piece) if piece.color == attacker_color && piece.kind == PieceKind::Knight
        )
    })
}

fn is_ray_threat(board: &Board, square: Square, attacker_color: Color) -> bool {
    QUEEN_DIRECTIONS.iter().any(|&direction| {
        let Some(first) = ray(square, direction).find_map(|sq| board.piece_at(sq)) else {
            return false;
        };
        if first.color != attacker_color {
            return false;
        }
        if is_diagonal(direction) {
            first.kind.slides_diagonally()
        } else {
            first.kind.slides_orthogonally()
        }
    })
}
