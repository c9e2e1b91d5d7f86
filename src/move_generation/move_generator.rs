use crate::errors::{MoveGenResult, MoveGenerationError};
use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;

/// Legal moves for the side to move on a board.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, board: &Board) -> MoveGenResult<Vec<Move>>;
}

/// Generator backed by the exhaustive king-safety filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, board: &Board) -> MoveGenResult<Vec<Move>> {
        let side = board.turn();
        if board.king(side).is_none() {
            return Err(MoveGenerationError::MissingKing { color: side });
        }
        Ok(legal_moves(board, side))
    }
}
