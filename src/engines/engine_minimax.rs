use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::errors::{EngineError, MoveGenerationError};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::game_state::player::{Player, PlayerKind};
use crate::search::minimax::Minimax;

pub const DEFAULT_DEPTH: u8 = 3;
pub const MAX_DEPTH: u8 = 6;

/// Fixed-depth minimax behind the `Engine` trait.
pub struct MinimaxEngine {
    depth: u8,
    search: Minimax,
}

impl MinimaxEngine {
    pub fn new(depth: u8, seed: Option<u64>) -> Self {
        Self {
            depth: depth.clamp(1, MAX_DEPTH),
            search: Minimax::from_seed_option(seed),
        }
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, None)
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "tile_chess minimax"
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let invalid = || EngineError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };
        if name.eq_ignore_ascii_case("Depth") {
            let parsed = value.trim().parse::<u8>().map_err(|_| invalid())?;
            if !(1..=MAX_DEPTH).contains(&parsed) {
                return Err(invalid());
            }
            self.depth = parsed;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Seed") {
            let parsed = value.trim().parse::<u64>().map_err(|_| invalid())?;
            self.search = Minimax::with_seed(parsed);
            return Ok(());
        }
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, board: &Board, params: &GoParams) -> Result<EngineOutput, EngineError> {
        let side = board.turn();
        if board.king(side).is_none() {
            return Err(MoveGenerationError::MissingKing { color: side }.into());
        }

        let depth = params.depth.unwrap_or(self.depth).clamp(1, MAX_DEPTH);
        let optimize = params.color_to_optimize.unwrap_or(side);
        let white = Player::new(Color::White, player_kind(Color::White, optimize));
        let black = Player::new(Color::Black, player_kind(Color::Black, optimize));

        let result = self
            .search
            .search_root(depth, board, &white, &black, side == optimize, optimize);

        let mut out = EngineOutput {
            best_move: result.best_move,
            score: result.score,
            nodes: result.nodes,
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {depth} nodes {} score cp {}",
            result.nodes, result.score
        ));
        if let Some(mv) = &out.best_move {
            out.info_lines.push(format!("bestmove {mv}"));
        }
        Ok(out)
    }
}

fn player_kind(color: Color, optimize: Color) -> PlayerKind {
    if color == optimize {
        PlayerKind::Computer
    } else {
        PlayerKind::Human
    }
}
