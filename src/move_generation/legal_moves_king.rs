use crate::game_state::board::Board;
use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::{Piece, Square};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{push_move, spectrum_moves};
use crate::moves::chess_move::{Move, MoveKind};
use crate::moves::king_moves::KING_OFFSETS;

pub fn generate_king_moves(board: &Board, king: &Piece, out: &mut Vec<Move>) {
    spectrum_moves(board, king, &KING_OFFSETS, out);
    generate_castling_moves(board, king, out);
}

fn generate_castling_moves(board: &Board, king: &Piece, out: &mut Vec<Move>) {
    let Some(flags) = king.castling else {
        return;
    };
    if !king.is_king_at_home() || !flags.any() {
        return;
    }

    let enemy = king.color.reverse();

    // Cannot castle out of check.
    if is_square_attacked(board, king.square, enemy) {
        return;
    }

    if flags.kingside {
        try_castle(board, king, KINGSIDE_ROOK_COL, true, out);
    }
    if flags.queenside {
        try_castle(board, king, QUEENSIDE_ROOK_COL, false, out);
    }
}

/// The king travels two files towards the rook, which lands on the square
/// the king crossed. Every square between king and rook must be empty; the
/// two the king touches must not be attacked.
fn try_castle(board: &Board, king: &Piece, rook_col: u8, kingside: bool, out: &mut Vec<Move>) {
    let row = king.square.row;
    let Some(rook) = board.piece_at(Square { row, col: rook_col }) else {
        return;
    };
    if rook.color != king.color || !rook.is_castling_rook(kingside) {
        return;
    }

    let (low, high) = if kingside {
        (king.square.col + 1, rook_col)
    } else {
        (rook_col + 1, king.square.col)
    };
    if (low..high).any(|col| !board.tile(Square { row, col }).is_empty()) {
        return;
    }

    let step: i8 = if kingside { 1 } else { -1 };
    let (Some(crossed), Some(landing)) = (
        king.square.offset(0, step),
        king.square.offset(0, 2 * step),
    ) else {
        return;
    };
    let enemy = king.color.reverse();
    if is_square_attacked(board, crossed, enemy) || is_square_attacked(board, landing, enemy) {
        return;
    }

    push_move(
        out,
        board,
        MoveKind::Castling {
            rook,
            rook_to: crossed,
        },
        *king,
        landing,
    );
}
