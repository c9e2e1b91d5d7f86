use crate::game_state::board::Board;
use crate::game_state::chess_types::Piece;
use crate::move_generation::legal_move_shared::directional_moves;
use crate::moves::chess_move::Move;
use crate::moves::queen_moves::QUEEN_DIRECTIONS;

pub fn generate_queen_moves(board: &Board, queen: &Piece, out: &mut Vec<Move>) {
    directional_moves(board, queen, &QUEEN_DIRECTIONS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_queen_moves;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn centralised_queen_covers_both_orientations() {
        let board = parse_fen("k7/8/8/8/3Q4/8/8/7K w - - 0 1").expect("FEN should parse");
        let queen = board
            .piece_at(algebraic_to_square("d4").expect("d4"))
            .expect("queen on d4");
        let mut moves = Vec::new();
        generate_queen_moves(&board, &queen, &mut moves);
        assert_eq!(moves.len(), 27);
    }
}
