//! Session configuration.
//!
//! Filled from command-line arguments by the binary; `Default` gives a game
//! against the computer with the human playing White.

use crate::engines::engine_minimax::{DEFAULT_DEPTH, MAX_DEPTH};
use crate::game_state::chess_types::Color;
use crate::game_state::player::PlayerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentKind {
    Computer,
    /// Both sides entered at the same terminal.
    Human,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub search_depth: u8,
    pub hint_depth: u8,
    pub human_color: Color,
    pub opponent: OpponentKind,
    /// Fixes the search's tie-breaking for reproducible games.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_DEPTH,
            hint_depth: DEFAULT_DEPTH,
            human_color: Color::White,
            opponent: OpponentKind::Computer,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Depths outside `1..=MAX_DEPTH` are clamped.
    pub fn normalized(mut self) -> Self {
        self.search_depth = self.search_depth.clamp(1, MAX_DEPTH);
        self.hint_depth = self.hint_depth.clamp(1, MAX_DEPTH);
        self
    }

    pub fn player_kind(&self, color: Color) -> PlayerKind {
        match self.opponent {
            OpponentKind::Computer if color != self.human_color => PlayerKind::Computer,
            _ => PlayerKind::Human,
        }
    }
}
