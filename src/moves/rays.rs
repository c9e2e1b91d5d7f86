//! Ray walking shared by the sliding pieces.

use crate::game_state::chess_types::Square;

/// Squares reached by repeatedly stepping `direction` from `from`, nearest
/// first, excluding `from` and stopping at the board edge.
pub fn ray(from: Square, direction: (i8, i8)) -> impl Iterator<Item = Square> {
    let (d_row, d_col) = direction;
    std::iter::successors(from.offset(d_row, d_col), move |sq| sq.offset(d_row, d_col))
}
