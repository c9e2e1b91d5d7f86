//! Side-of-the-board bookkeeping for one colour.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    /// Moves chosen by the background search.
    Computer,
}

#[derive(Debug, Clone)]
pub struct Player {
    color: Color,
    kind: PlayerKind,
    active_pieces: Vec<Piece>,
    captured_pieces: Vec<Piece>,
    legal_moves: Vec<Move>,
}

impl Player {
    pub fn new(color: Color, kind: PlayerKind) -> Self {
        Self {
            color,
            kind,
            active_pieces: Vec::new(),
            captured_pieces: Vec::new(),
            legal_moves: Vec::new(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_computer(&self) -> bool {
        self.kind == PlayerKind::Computer
    }

    /// Recompute active pieces and legal moves for `board`.
    pub fn refresh(&mut self, board: &Board) {
        self.active_pieces = board.pieces_of(self.color).collect();
        self.legal_moves = legal_moves(board, self.color);
    }

    pub fn active_pieces(&self) -> &[Piece] {
        &self.active_pieces
    }

    /// Enemy pieces this player has taken, in capture order.
    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured_pieces
    }

    pub fn record_capture(&mut self, piece: Piece) {
        self.captured_pieces.push(piece);
    }

    pub fn set_captured_pieces(&mut self, pieces: Vec<Piece>) {
        self.captured_pieces = pieces;
    }

    /// Legal moves as of the last `refresh`.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn is_in_check(&self, board: &Board) -> bool {
        is_king_in_check(board, self.color)
    }
}
