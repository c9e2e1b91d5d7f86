//! Traversal helpers shared by the per-piece generators.
//!
//! Two shapes cover every piece: directional traversal walks a ray until the
//! first occupant (rook, bishop, queen), spectrum traversal tries each delta
//! once (king, knight). Kings are never offered as capture targets.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};
use crate::moves::chess_move::{Move, MoveKind};
use crate::moves::rays::ray;

/// What a piece of the moving colour may do on `to`, if anything.
pub fn target_kind(board: &Board, mover: &Piece, to: Square) -> Option<MoveKind> {
    match board.piece_at(to) {
        None => Some(MoveKind::Regular),
        Some(occupant) if occupant.color != mover.color && occupant.kind != PieceKind::King => {
            Some(MoveKind::Attacking { victim: occupant })
        }
        Some(_) => None,
    }
}

#[inline]
pub fn push_move(out: &mut Vec<Move>, board: &Board, kind: MoveKind, piece: Piece, to: Square) {
    if let Some(mv) = Move::new(board, kind, piece, to) {
        out.push(mv);
    }
}

/// Slide along each direction, stopping at (and possibly capturing) the
/// first occupied tile.
pub fn directional_moves(board: &Board, piece: &Piece, directions: &[(i8, i8)], out: &mut Vec<Move>) {
    for &direction in directions {
        for to in ray(piece.square, direction) {
            match board.piece_at(to) {
                None => push_move(out, board, MoveKind::Regular, *piece, to),
                Some(_) => {
                    if let Some(kind) = target_kind(board, piece, to) {
                        push_move(out, board, kind, *piece, to);
                    }
                    break;
                }
            }
        }
    }
}

/// Try each delta independently.
pub fn spectrum_moves(board: &Board, piece: &Piece, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(d_row, d_col) in offsets {
        let Some(to) = piece.square.offset(d_row, d_col) else {
            continue;
        };
        if let Some(kind) = target_kind(board, piece, to) {
            push_move(out, board, kind, *piece, to);
        }
    }
}
