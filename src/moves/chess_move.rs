//! Move model.
//!
//! A `Move` carries the moving piece as it stood before the move, its
//! destination, the kind-specific payload (victim, castling rook), and the
//! board the move produces. The resulting board is computed eagerly when the
//! move is built so the king-safety filter and the search can inspect it
//! without replaying the move.

use std::fmt;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Quiet move onto an empty tile.
    Regular,
    /// Capture of the piece on the destination tile.
    Attacking { victim: Piece },
    /// King move of two files; the rook jumps to `rook_to`.
    Castling { rook: Piece, rook_to: Square },
    /// Pawn capture of the pawn beside it; `victim.square` differs from the
    /// destination.
    EnPassant { victim: Piece },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    kind: MoveKind,
    piece: Piece,
    to: Square,
    board_after: Board,
}

impl Move {
    /// Build a move against `board`. Returns `None` when the move does not fit
    /// the board (piece missing from its square, wrong victim, occupied
    /// destination for a quiet move).
    pub fn new(board: &Board, kind: MoveKind, piece: Piece, to: Square) -> Option<Self> {
        let board_after = board.transition(&kind, piece, to)?;
        Some(Self {
            kind,
            piece,
            to,
            board_after,
        })
    }

    #[inline]
    pub fn kind(&self) -> &MoveKind {
        &self.kind
    }

    /// The mover as it stood before the move.
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn from(&self) -> Square {
        self.piece.square
    }

    #[inline]
    pub fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub fn board_after(&self) -> &Board {
        &self.board_after
    }

    pub fn into_board_after(self) -> Board {
        self.board_after
    }

    pub fn captured(&self) -> Option<Piece> {
        match self.kind {
            MoveKind::Attacking { victim } | MoveKind::EnPassant { victim } => Some(victim),
            MoveKind::Regular | MoveKind::Castling { .. } => None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    /// Resets the fifty-move counter.
    #[inline]
    pub fn is_irreversible(&self) -> bool {
        self.is_capture() || self.piece.kind == PieceKind::Pawn
    }

    /// A pawn reaching its promotion rank; the caller picks the new piece.
    #[inline]
    pub fn reaches_promotion_rank(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.to.row == self.piece.color.promotion_row()
    }

    /// Board after the move with the pawn promoted to `kind` when the move
    /// reaches the promotion rank. Other moves return `board_after` as is.
    pub fn board_after_promoting(&self, kind: PieceKind) -> Board {
        if !self.reaches_promotion_rank() {
            return self.board_after.clone();
        }
        let promoted = Piece::new(kind, self.piece.color, self.to);
        self.board_after.promote(promoted)
    }
}

impl fmt::Display for Move {
    /// Coordinate notation, e.g. `e2e4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to)
    }
}
