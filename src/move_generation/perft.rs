//! Perft: leaf counts of the legal-move tree, used to verify the rules.
//!
//! Each promotion choice counts as its own move, matching the published
//! reference numbers.

use crate::errors::MoveGenResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::PieceKind;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn record_leaf(&mut self, mv: &Move, board_after: &Board) {
        self.nodes += 1;
        if mv.is_capture() {
            self.captures += 1;
        }
        match mv.kind() {
            MoveKind::EnPassant { .. } => self.en_passant += 1,
            MoveKind::Castling { .. } => self.castles += 1,
            MoveKind::Regular | MoveKind::Attacking { .. } => {}
        }
        if mv.reaches_promotion_rank() {
            self.promotions += 1;
        }
        if is_king_in_check(board_after, mv.piece().color.reverse()) {
            self.checks += 1;
        }
    }
}

/// Boards a move leads to: one per promotion choice, otherwise just one.
pub fn expand_promotions(mv: &Move) -> Vec<Board> {
    if mv.reaches_promotion_rank() {
        PieceKind::PROMOTIONS
            .iter()
            .map(|&kind| mv.board_after_promoting(kind))
            .collect()
    } else {
        vec![mv.board_after().clone()]
    }
}

pub fn perft<G: MoveGenerator + ?Sized>(generator: &G, board: &Board, depth: u8) -> MoveGenResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(generator, board, depth, &mut total)?;
    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    board: &Board,
    depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    let moves = generator.generate_legal_moves(board)?;

    for mv in &moves {
        for child in expand_promotions(mv) {
            if depth == 1 {
                counts.record_leaf(mv, &child);
            } else {
                perft_recurse(generator, &child, depth - 1, counts)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{perft, PerftCounts};
    use crate::game_state::board::Board;
    use crate::move_generation::move_generator::LegalMoveGenerator;
    use crate::utils::fen_parser::parse_fen;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&LegalMoveGenerator, &Board::starting_position(), 0).expect("perft should run");
        assert_eq!(counts.nodes, 1);
    }

    #[test]
    fn starting_position_node_counts() {
        let board = Board::starting_position();
        let expected = [20, 400, 8902];
        for (depth, nodes) in expected.into_iter().enumerate() {
            let counts = perft(&LegalMoveGenerator, &board, depth as u8 + 1).expect("perft should run");
            assert_eq!(counts.nodes, nodes, "depth {}", depth + 1);
        }

        let depth_three = perft(&LegalMoveGenerator, &board, 3).expect("perft should run");
        assert_eq!(depth_three.captures, 34);
        assert_eq!(depth_three.checks, 12);
    }

    #[test]
    fn kiwipete_exercises_castling_and_en_passant() {
        let board = parse_fen(KIWIPETE).expect("kiwipete FEN should parse");

        let depth_one = perft(&LegalMoveGenerator, &board, 1).expect("perft should run");
        assert_eq!(
            depth_one,
            PerftCounts {
                nodes: 48,
                captures: 8,
                en_passant: 0,
                castles: 2,
                promotions: 0,
                checks: 0,
            }
        );

        let depth_two = perft(&LegalMoveGenerator, &board, 2).expect("perft should run");
        assert_eq!(depth_two.nodes, 2039);
        assert_eq!(depth_two.captures, 351);
        assert_eq!(depth_two.en_passant, 1);
        assert_eq!(depth_two.castles, 91);
        assert_eq!(depth_two.checks, 3);
    }

    #[test]
    fn endgame_position_node_counts() {
        let board = parse_fen(ENDGAME).expect("endgame FEN should parse");
        let expected = [14, 191, 2812];
        for (depth, nodes) in expected.into_iter().enumerate() {
            let counts = perft(&LegalMoveGenerator, &board, depth as u8 + 1).expect("perft should run");
            assert_eq!(counts.nodes, nodes, "depth {}", depth + 1);
        }
    }

    #[test]
    fn promotions_count_every_choice() {
        let board = parse_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let counts = perft(&LegalMoveGenerator, &board, 1).expect("perft should run");
        // 4 promotions on b8, 5 king moves.
        assert_eq!(counts.nodes, 9);
        assert_eq!(counts.promotions, 4);
    }
}
