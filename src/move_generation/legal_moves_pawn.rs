//! Pawn pushes, captures and en passant.
//!
//! Promotion is not a move kind: a push or capture onto the last rank is
//! generated once, and the caller swaps the pawn with `Board::promote`.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind};
use crate::move_generation::legal_move_shared::{push_move, target_kind};
use crate::moves::chess_move::{Move, MoveKind};
use crate::moves::pawn_moves::{pawn_attacks, pawn_push_offset};

pub fn generate_pawn_moves(board: &Board, pawn: &Piece, out: &mut Vec<Move>) {
    let (d_row, d_col) = pawn_push_offset(pawn.color);

    if let Some(one_step) = pawn.square.offset(d_row, d_col) {
        if board.tile(one_step).is_empty() {
            push_move(out, board, MoveKind::Regular, *pawn, one_step);

            if pawn.square.row == pawn.color.pawn_start_row() {
                if let Some(two_step) = one_step.offset(d_row, d_col) {
                    if board.tile(two_step).is_empty() {
                        push_move(out, board, MoveKind::Regular, *pawn, two_step);
                    }
                }
            }
        }
    }

    for to in pawn_attacks(pawn.color, pawn.square) {
        if board.tile(to).is_empty() {
            continue;
        }
        if let Some(kind @ MoveKind::Attacking { .. }) = target_kind(board, pawn, to) {
            push_move(out, board, kind, *pawn, to);
        }
    }

    generate_en_passant(board, pawn, out);
}

/// Only the pawn recorded as last moved, and only from the rank beside its
/// double advance, can be taken in passing.
fn generate_en_passant(board: &Board, pawn: &Piece, out: &mut Vec<Move>) {
    let Some(ep) = board.en_passant() else {
        return;
    };
    if pawn.square.row != pawn.color.en_passant_row() {
        return;
    }
    let Some(victim) = board.last_moved() else {
        return;
    };
    if victim.kind != PieceKind::Pawn || victim.color == pawn.color || victim.square != ep.victim {
        return;
    }
    if !pawn_attacks(pawn.color, pawn.square).any(|to| to == ep.target) {
        return;
    }
    push_move(out, board, MoveKind::EnPassant { victim }, *pawn, ep.target);
}
