//! Board-to-FEN serialization with clocks.

use crate::game_state::board::Board;

/// Full six-field FEN for `board` with the given clocks.
pub fn generate_fen(board: &Board, halfmove_clock: u32, fullmove_number: u32) -> String {
    format!("{board} {halfmove_clock} {fullmove_number}")
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::board::Board;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen_record;

    #[test]
    fn starting_position_round_trips() {
        assert_eq!(generate_fen(&Board::starting_position(), 0, 1), STARTING_POSITION_FEN);
    }

    #[test]
    fn parsed_positions_serialize_back_unchanged() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
            "r3k3/8/8/8/8/8/8/4K2R b Kq - 7 19",
        ] {
            let record = parse_fen_record(fen).expect("FEN should parse");
            assert_eq!(
                generate_fen(&record.board, record.halfmove_clock, record.fullmove_number),
                fen
            );
        }
    }
}
