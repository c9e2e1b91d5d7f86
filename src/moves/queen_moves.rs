use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

/// Orthogonal directions first, then diagonals.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    ROOK_DIRECTIONS[0],
    ROOK_DIRECTIONS[1],
    ROOK_DIRECTIONS[2],
    ROOK_DIRECTIONS[3],
    BISHOP_DIRECTIONS[0],
    BISHOP_DIRECTIONS[1],
    BISHOP_DIRECTIONS[2],
    BISHOP_DIRECTIONS[3],
];

#[inline]
pub const fn is_diagonal(direction: (i8, i8)) -> bool {
    direction.0 != 0 && direction.1 != 0
}

#[cfg(test)]
mod tests {
    use super::{is_diagonal, QUEEN_DIRECTIONS};

    #[test]
    fn half_of_queen_directions_are_diagonal() {
        let diagonal = QUEEN_DIRECTIONS.iter().filter(|d| is_diagonal(**d)).count();
        assert_eq!(diagonal, 4);
    }
}
