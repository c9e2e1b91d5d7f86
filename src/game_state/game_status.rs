//! Position classification.
//!
//! `evaluate_game_state` is a pure function of the two players, the board,
//! the halfmove clock and (optionally) the position history. Outcomes are
//! tested in a fixed order so that, for example, a checkmate delivered on the
//! fiftieth halfmove is still a checkmate.

use std::collections::HashMap;
use std::fmt;

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{FIFTY_MOVE_LIMIT, REPETITION_LIMIT};
use crate::game_state::chess_types::{Color, Piece, PieceKind};
use crate::game_state::player::Player;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Normal,
    Check,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
    /// The side to move has no king, as on a board still being set up.
    Empty,
}

impl GameState {
    /// True for every outcome that ends the game.
    pub const fn is_game_over(self) -> bool {
        matches!(
            self,
            GameState::Checkmate
                | GameState::Stalemate
                | GameState::InsufficientMaterial
                | GameState::FiftyMoveRule
                | GameState::ThreefoldRepetition
        )
    }

    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameState::Stalemate
                | GameState::InsufficientMaterial
                | GameState::FiftyMoveRule
                | GameState::ThreefoldRepetition
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameState::Normal => "normal",
            GameState::Check => "check",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
            GameState::InsufficientMaterial => "draw by insufficient material",
            GameState::FiftyMoveRule => "draw by the fifty-move rule",
            GameState::ThreefoldRepetition => "draw by threefold repetition",
            GameState::Empty => "empty board",
        };
        f.write_str(text)
    }
}

/// Classify `board` from the point of view of `mover`, the side about to
/// play. Repetition is only considered when `positions` is supplied.
pub fn evaluate_game_state(
    mover: &Player,
    opponent: &Player,
    board: &Board,
    halfmoves: u32,
    positions: Option<&HashMap<String, u32>>,
) -> GameState {
    classify(mover.color(), opponent.color(), board, halfmoves, positions)
}

/// Same classification keyed by colours only.
pub fn classify(
    mover: Color,
    opponent: Color,
    board: &Board,
    halfmoves: u32,
    positions: Option<&HashMap<String, u32>>,
) -> GameState {
    if board.king(mover).is_none() {
        return GameState::Empty;
    }

    let in_check = is_king_in_check(board, mover);
    let can_move = has_legal_move(board, mover);

    if in_check && !can_move {
        return GameState::Checkmate;
    }
    if !can_move {
        return GameState::Stalemate;
    }
    if is_insufficient_material(board, mover, opponent) {
        return GameState::InsufficientMaterial;
    }
    if halfmoves >= FIFTY_MOVE_LIMIT {
        return GameState::FiftyMoveRule;
    }
    if positions.is_some_and(|map| map.values().any(|&count| count >= REPETITION_LIMIT)) {
        return GameState::ThreefoldRepetition;
    }
    if in_check {
        return GameState::Check;
    }
    GameState::Normal
}

/// K v K, K v K+N, K v K+B, and K+B v K+B with both bishops on the same
/// shade.
pub fn is_insufficient_material(board: &Board, first: Color, second: Color) -> bool {
    let minors = |color: Color| -> Option<Vec<Piece>> {
        let mut out = Vec::new();
        for piece in board.pieces_of(color) {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => out.push(piece),
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return None,
            }
        }
        Some(out)
    };

    let (Some(a), Some(b)) = (minors(first), minors(second)) else {
        return false;
    };

    match (a.as_slice(), b.as_slice()) {
        ([], []) | ([_], []) | ([], [_]) => true,
        ([x], [y]) => {
            x.kind == PieceKind::Bishop
                && y.kind == PieceKind::Bishop
                && board.tile(x.square).color() == board.tile(y.square).color()
        }
        _ => false,
    }
}
