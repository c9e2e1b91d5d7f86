//! Long algebraic move text (`e2e4`, `e7e8q`).
//!
//! Text is parsed into a request first and then resolved against the legal
//! moves of the side to move, so castling and en passant need no special
//! notation: `e1g1` is castling when the king stands on e1.

use crate::errors::{MoveGenResult, MoveGenerationError};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(text: &str) -> MoveGenResult<MoveRequest> {
    let text = text.trim();
    let invalid = || MoveGenerationError::InvalidMoveText(text.to_owned());
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&text[0..2]).map_err(|_| invalid())?;
    let to = algebraic_to_square(&text[2..4]).map_err(|_| invalid())?;
    let promotion = match text[4..].chars().next() {
        Some(ch) => Some(char_to_promotion(ch)?),
        None => None,
    };

    Ok(MoveRequest { from, to, promotion })
}

pub fn char_to_promotion(ch: char) -> MoveGenResult<PieceKind> {
    match ch.to_ascii_lowercase() {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(MoveGenerationError::InvalidPromotion(ch)),
    }
}

/// The legal move matching `request` for the side to move.
pub fn resolve_move(board: &Board, request: &MoveRequest) -> MoveGenResult<Move> {
    let mv = legal_moves(board, board.turn())
        .into_iter()
        .find(|mv| mv.from() == request.from && mv.to() == request.to)
        .ok_or_else(|| MoveGenerationError::NoSuchMove(format!("{}{}", request.from, request.to)))?;

    if request.promotion.is_some() && !mv.reaches_promotion_rank() {
        return Err(MoveGenerationError::InvalidMoveText(format!(
            "{mv} does not promote"
        )));
    }
    Ok(mv)
}

pub fn move_to_long_algebraic(mv: &Move, promotion: Option<PieceKind>) -> String {
    match promotion {
        Some(kind) if mv.reaches_promotion_rank() => format!("{mv}{}", kind.fen_char()),
        _ => mv.to_string(),
    }
}
