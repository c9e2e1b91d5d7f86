//! Pawn move deltas.
//!
//! Row 0 is rank 8, so White pawns advance towards lower rows.

use crate::game_state::chess_types::{Color, Square};

/// Row/column delta of a single forward step.
#[inline]
pub const fn pawn_push_offset(color: Color) -> (i8, i8) {
    (color.pawn_direction(), 0)
}

/// Diagonal capture deltas for a pawn of `color`.
#[inline]
pub const fn pawn_attack_offsets(color: Color) -> [(i8, i8); 2] {
    let d_row = color.pawn_direction();
    [(d_row, -1), (d_row, 1)]
}

/// Squares a pawn of `color` on `square` attacks.
pub fn pawn_attacks(color: Color, square: Square) -> impl Iterator<Item = Square> {
    pawn_attack_offsets(color)
        .into_iter()
        .filter_map(move |(d_row, d_col)| square.offset(d_row, d_col))
}
