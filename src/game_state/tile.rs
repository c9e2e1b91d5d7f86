use crate::game_state::chess_types::{Color, Piece, Square};

/// One cell of the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub square: Square,
    pub piece: Option<Piece>,
}

impl Tile {
    pub const fn empty(square: Square) -> Self {
        Self {
            square,
            piece: None,
        }
    }

    /// New tile holding `piece`, with the piece's square normalised to this tile.
    pub fn occupied(square: Square, mut piece: Piece) -> Self {
        piece.square = square;
        Self {
            square,
            piece: Some(piece),
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.square.shade()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}
