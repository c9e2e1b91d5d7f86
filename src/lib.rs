//! Crate root module declarations for the tile_chess rules engine.
//!
//! Exposes the immutable board model, move generation, game-state
//! evaluation, FEN handling, the minimax search with its background worker,
//! and the session and terminal layers built on top of them.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_status;
    pub mod player;
    pub mod tile;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod chess_move;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rays;
    pub mod rook_moves;
}

pub mod move_generation {
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod minimax;
    pub mod threading;
}

pub mod engines {
    pub mod engine_minimax;
    pub mod engine_trait;
}

pub mod session {
    pub mod config;
    pub mod game_session;
}

pub mod frontend {
    pub mod terminal;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod fen_validator;
    pub mod long_algebraic;
    pub mod render_game_state;
}
