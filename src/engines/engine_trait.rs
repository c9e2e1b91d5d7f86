//! Engine abstraction used by the search worker.
//!
//! Defines the request and result payloads so move choosers can be swapped
//! behind a single trait.

use crate::errors::EngineError;
use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    /// Overrides the engine's configured depth.
    pub depth: Option<u8>,
    /// Side whose score is maximised; the side to move when `None`.
    pub color_to_optimize: Option<Color>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), EngineError> {
        Ok(())
    }

    fn choose_move(&mut self, board: &Board, params: &GoParams) -> Result<EngineOutput, EngineError>;
}
