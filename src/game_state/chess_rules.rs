//! Canonical chess-rule constants.
//!
//! This module stores static rule-related literals such as the standard
//! starting position FEN and the row/column layout shared by board setup,
//! move generation and FEN validation.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// Row holding Black's back rank (rank 8).
pub const BLACK_BACK_ROW: u8 = 0;
/// Row holding White's back rank (rank 1).
pub const WHITE_BACK_ROW: u8 = 7;

/// Column of both kings in the initial array.
pub const KING_HOME_COL: u8 = 4;
/// Column of the queenside rook.
pub const QUEENSIDE_ROOK_COL: u8 = 0;
/// Column of the kingside rook.
pub const KINGSIDE_ROOK_COL: u8 = 7;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_LIMIT: u32 = 50;

/// Largest fullmove number a FEN record may carry. A game can add only a
/// few thousand moves under the fifty-move rule, so the counter stays far
/// from `u32::MAX`.
pub const MAX_FULLMOVE_NUMBER: u32 = 100_000;

/// Number of identical positions that ends the game by repetition.
pub const REPETITION_LIMIT: u32 = 3;
