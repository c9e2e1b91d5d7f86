//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the internal
//! row/column layout where row 0 is rank 8 and column 0 is file a.

use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    Ok(Square {
        row: b'8' - rank,
        col: file - b'a',
    })
}

#[cfg(test)]
mod tests {
    use super::algebraic_to_square;
    use crate::game_state::chess_types::Square;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(
            algebraic_to_square("a8").expect("a8 should parse"),
            Square { row: 0, col: 0 }
        );
        assert_eq!(
            algebraic_to_square("h1").expect("h1 should parse"),
            Square { row: 7, col: 7 }
        );
        assert_eq!(
            algebraic_to_square("e4").expect("e4 should parse").to_string(),
            "e4"
        );
    }

    #[test]
    fn rejects_malformed_squares() {
        assert!(algebraic_to_square("i1").is_err());
        assert!(algebraic_to_square("a9").is_err());
        assert!(algebraic_to_square("a").is_err());
        assert!(algebraic_to_square("a10").is_err());
    }
}
