//! Error types for the rules engine and the game session.
//!
//! FEN problems come in two layers that callers must be able to tell apart:
//! `FenError` means the text is not a well-formed FEN record at all, while
//! `PlayabilityError` means the record parses but describes a position that
//! cannot be played from (already decided, impossible check, false castling
//! claim). `LoadError` keeps that distinction at the session boundary.
//!
//! Invalid move inputs are not errors: board transitions degrade to an
//! unchanged board instead.

use thiserror::Error;

use crate::game_state::chess_types::Color;
use crate::game_state::game_status::GameState;

/// Structural FEN failures, detected before any board is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 6 space-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("board field must have 8 ranks, found {found}")]
    RankCount { found: usize },

    #[error("rank {rank} covers {width} files instead of 8")]
    RankWidth { rank: usize, width: usize },

    #[error("rank {rank} has two empty-square counts in a row")]
    AdjacentEmptyRuns { rank: usize },

    #[error("invalid character '{0}' in board field")]
    InvalidPieceChar(char),

    #[error("pawn on back rank at {square}")]
    PawnOnBackRank { square: String },

    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: usize },

    #[error("{color} has {found} pawns")]
    TooManyPawns { color: Color, found: usize },

    #[error("{color} has {found} pieces")]
    TooManyPieces { color: Color, found: usize },

    #[error("{color} has more promoted pieces than missing pawns")]
    TooManyPromotedPieces { color: Color },

    #[error("invalid side-to-move field: {0}")]
    InvalidTurn(String),

    #[error("invalid castling field: {0}")]
    InvalidCastling(String),

    #[error("invalid en-passant field: {0}")]
    InvalidEnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Well-formed FEN describing a position that cannot be played from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayabilityError {
    #[error("malformed FEN: {0}")]
    Malformed(#[from] FenError),

    #[error("both kings are in check")]
    BothInCheck,

    #[error("{color} is in check but it is not {color}'s move")]
    WrongSideInCheck { color: Color },

    #[error("position is already decided: {0}")]
    AlreadyDecided(GameState),

    #[error("castling right '{right}' has no unmoved king and rook to back it")]
    CastlingMismatch { right: char },

    #[error("en-passant square {square} does not follow a double pawn advance")]
    EnPassantMismatch { square: String },
}

/// Loading a saved game. A failed load leaves the session untouched.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read game file: {0}")]
    Io(#[from] std::io::Error),

    #[error("game file is not valid FEN: {0}")]
    Unparsable(FenError),

    #[error("game file parses but is not playable: {0}")]
    Unplayable(PlayabilityError),
}

impl From<PlayabilityError> for LoadError {
    fn from(err: PlayabilityError) -> Self {
        match err {
            PlayabilityError::Malformed(fen) => LoadError::Unparsable(fen),
            other => LoadError::Unplayable(other),
        }
    }
}

impl From<FenError> for LoadError {
    fn from(err: FenError) -> Self {
        LoadError::Unparsable(err)
    }
}

/// Failures resolving a move request against a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveGenerationError {
    #[error("{color} has no king on the board")]
    MissingKing { color: Color },

    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    #[error("no legal move {0} in this position")]
    NoSuchMove(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown engine option: {0}")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option {name}")]
    InvalidOptionValue { name: String, value: String },

    #[error(transparent)]
    Move(#[from] MoveGenerationError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a search is already running")]
    SearchInFlight,

    #[error(transparent)]
    Move(#[from] MoveGenerationError),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("game is over: {0}")]
    GameOver(GameState),

    #[error("search worker stopped without a result")]
    WorkerLost,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("could not write game file: {0}")]
    Save(#[source] std::io::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
