//! Knight move deltas.
//!
//! Knights use spectrum traversal: each offset is tried on its own and an
//! off-board or blocked target has no effect on the others.

use crate::game_state::chess_types::Square;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[inline]
pub fn knight_targets(square: Square) -> impl Iterator<Item = Square> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(move |&(d_row, d_col)| square.offset(d_row, d_col))
}
