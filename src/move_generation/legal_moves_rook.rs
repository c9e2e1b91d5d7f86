use crate::game_state::board::Board;
use crate::game_state::chess_types::Piece;
use crate::move_generation::legal_move_shared::directional_moves;
use crate::moves::chess_move::Move;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn generate_rook_moves(board: &Board, rook: &Piece, out: &mut Vec<Move>) {
    directional_moves(board, rook, &ROOK_DIRECTIONS, out);
}
