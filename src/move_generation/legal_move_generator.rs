//! Full legal move generation pipeline.
//!
//! Generates every pseudo-legal move piece by piece, then keeps a move only
//! if the mover's king is safe on the board it produces. Each move already
//! carries that board, so the filter never replays anything.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, PieceKind};
use crate::move_generation::legal_move_checks::is_king_safe;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::chess_move::Move;

/// Moves of one piece, ignoring king safety.
pub fn pseudo_legal_moves_for(board: &Board, piece: &Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, piece, out),
        PieceKind::Knight => generate_knight_moves(board, piece, out),
        PieceKind::Bishop => generate_bishop_moves(board, piece, out),
        PieceKind::Rook => generate_rook_moves(board, piece, out),
        PieceKind::Queen => generate_queen_moves(board, piece, out),
        PieceKind::King => generate_king_moves(board, piece, out),
    }
}

pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    for piece in board.pieces_of(color) {
        pseudo_legal_moves_for(board, &piece, &mut pseudo);
    }
    pseudo
}

/// Every move `color` may play on `board`, whether or not it is `color`'s
/// turn on that board.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = pseudo_legal_moves(board, color);
    moves.retain(|mv| is_king_safe(mv.board_after(), color));
    moves
}

pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|piece| {
        let mut moves = Vec::new();
        pseudo_legal_moves_for(board, &piece, &mut moves);
        moves.iter().any(|mv| is_king_safe(mv.board_after(), color))
    })
}
