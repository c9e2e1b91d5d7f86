use crate::game_state::board::Board;
use crate::game_state::chess_types::Piece;
use crate::move_generation::legal_move_shared::spectrum_moves;
use crate::moves::chess_move::Move;
use crate::moves::knight_moves::KNIGHT_OFFSETS;

pub fn generate_knight_moves(board: &Board, knight: &Piece, out: &mut Vec<Move>) {
    spectrum_moves(board, knight, &KNIGHT_OFFSETS, out);
}
