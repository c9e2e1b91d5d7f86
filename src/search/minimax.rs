//! Fixed-depth minimax with alpha-beta pruning.
//!
//! Every score is taken from the point of view of `color_to_optimize`: the
//! maximizing plies belong to that colour, the minimizing plies to its
//! opponent. Mates are scored so that a quicker mate is preferred, and
//! stalemate is worth zero. Pawns reaching the last rank are searched as
//! queen promotions.
//!
//! Root moves that tie on score are picked at random. Seed the generator
//! with `Minimax::with_seed` for reproducible choices.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::player::Player;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};

pub const MATE_SCORE: i32 = 30_000;
const INFINITY: i32 = MATE_SCORE + 1_000;

/// Best move plus the numbers worth logging.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
}

pub struct Minimax<S: BoardScorer = PieceSquareScorer> {
    scorer: S,
    rng: StdRng,
    nodes: u64,
}

impl Minimax<PieceSquareScorer> {
    pub fn new() -> Self {
        Self::with_scorer(PieceSquareScorer, StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_scorer(PieceSquareScorer, StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for Minimax<PieceSquareScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BoardScorer> Minimax<S> {
    pub fn with_scorer(scorer: S, rng: StdRng) -> Self {
        Self {
            scorer,
            rng,
            nodes: 0,
        }
    }

    /// Best move for the side to move on `board`, or `None` when it has no
    /// legal move. `maximizing` says whether the side to move is the one
    /// being optimised.
    pub fn root(
        &mut self,
        depth: u8,
        board: &Board,
        white: &Player,
        black: &Player,
        maximizing: bool,
        color_to_optimize: Color,
    ) -> Option<Move> {
        self.search_root(depth, board, white, black, maximizing, color_to_optimize)
            .best_move
    }

    pub fn search_root(
        &mut self,
        depth: u8,
        board: &Board,
        white: &Player,
        black: &Player,
        maximizing: bool,
        color_to_optimize: Color,
    ) -> SearchResult {
        self.nodes = 0;
        let depth = depth.max(1);

        let mut mover = match board.turn() {
            Color::White => white.clone(),
            Color::Black => black.clone(),
        };
        mover.refresh(board);
        let mut moves = mover.legal_moves().to_vec();
        order_moves(&mut moves);

        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_moves: Vec<Move> = Vec::new();

        for mv in moves {
            let child = child_board(&mv);
            // Window one point wider than the best so far, so an equal score
            // is exact and counts as a genuine tie.
            let score = if maximizing {
                self.search(&child, depth - 1, best_score.saturating_sub(1), INFINITY, false, color_to_optimize, 1)
            } else {
                self.search(&child, depth - 1, -INFINITY, best_score.saturating_add(1), true, color_to_optimize, 1)
            };

            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improves {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }

        let best_move = best_moves.choose(&mut self.rng).cloned();
        debug!(
            depth,
            nodes = self.nodes,
            score = best_score,
            ties = best_moves.len(),
            best = ?best_move.as_ref().map(ToString::to_string),
            "minimax root finished"
        );

        SearchResult {
            best_move,
            score: best_score,
            nodes: self.nodes,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        color_to_optimize: Color,
        ply: i32,
    ) -> i32 {
        self.nodes += 1;
        let side = board.turn();
        let mut moves = legal_moves(board, side);

        if moves.is_empty() {
            if is_king_in_check(board, side) {
                let mate = MATE_SCORE - ply;
                return if side == color_to_optimize { -mate } else { mate };
            }
            return 0;
        }
        if depth == 0 {
            return self.scorer.score(board, color_to_optimize);
        }

        order_moves(&mut moves);

        if maximizing {
            let mut best = -INFINITY;
            for mv in &moves {
                let score = self.search(&child_board(mv), depth - 1, alpha, beta, false, color_to_optimize, ply + 1);
                best = best.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for mv in &moves {
                let score = self.search(&child_board(mv), depth - 1, alpha, beta, true, color_to_optimize, ply + 1);
                best = best.min(score);
                beta = beta.min(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        }
    }
}

fn child_board(mv: &Move) -> Board {
    mv.board_after_promoting(PieceKind::Queen)
}

/// Captures first; cheap and good enough for pruning at these depths.
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| !mv.is_capture());
}
