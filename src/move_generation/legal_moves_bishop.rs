use crate::game_state::board::Board;
use crate::game_state::chess_types::Piece;
use crate::move_generation::legal_move_shared::directional_moves;
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::chess_move::Move;

pub fn generate_bishop_moves(board: &Board, bishop: &Piece, out: &mut Vec<Move>) {
    directional_moves(board, bishop, &BISHOP_DIRECTIONS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_bishop_moves;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn bishop_stops_at_blockers_and_skips_the_enemy_king() {
        let board = parse_fen("7k/8/8/8/8/2p5/8/B3K3 w - - 0 1").expect("FEN should parse");
        let bishop = board
            .piece_at(algebraic_to_square("a1").expect("a1"))
            .expect("bishop on a1");
        let mut moves = Vec::new();
        generate_bishop_moves(&board, &bishop, &mut moves);
        let names: Vec<String> = moves.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["a1b2", "a1c3"]);
        assert!(moves[1].is_capture());
    }
}
