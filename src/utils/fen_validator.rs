//! Two-phase FEN validation.
//!
//! Structural validation decides whether a string is a well-formed FEN
//! record with believable material. Playability then builds the position in
//! isolation (fresh players, no session state) and rejects positions that
//! are impossible or already finished.

use crate::errors::{FenError, PlayabilityError};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{FIFTY_MOVE_LIMIT, MAX_FULLMOVE_NUMBER};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_status::evaluate_game_state;
use crate::game_state::player::{Player, PlayerKind};
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::fen_parser::{castling_claim, parse_fen_record, FenRecord};

const CASTLING_ORDER: &str = "KQkq";
const MAX_PAWNS: usize = 8;
const MAX_PIECES: usize = 16;

pub fn is_valid_fen(fen: &str) -> bool {
    validate_fen(fen).is_ok()
}

pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    structural_record(fen).map(|_| ())
}

pub fn is_playable(fen: &str, human: Color) -> bool {
    check_playable(fen, human).is_ok()
}

/// Parse and validate `fen`, returning the position when it can be played
/// from. `human` decides which side the throwaway players treat as human.
pub fn check_playable(fen: &str, human: Color) -> Result<FenRecord, PlayabilityError> {
    let record = structural_record(fen)?;
    let board = &record.board;
    let fields: Vec<&str> = fen.split(' ').collect();

    let player_for = |color: Color| {
        let kind = if color == human {
            PlayerKind::Human
        } else {
            PlayerKind::Computer
        };
        let mut player = Player::new(color, kind);
        player.refresh(board);
        player
    };
    let mover = player_for(board.turn());
    let opponent = player_for(board.turn().reverse());

    let mover_in_check = mover.is_in_check(board);
    let opponent_in_check = opponent.is_in_check(board);
    if mover_in_check && opponent_in_check {
        return Err(PlayabilityError::BothInCheck);
    }
    if opponent_in_check {
        return Err(PlayabilityError::WrongSideInCheck {
            color: opponent.color(),
        });
    }

    let state = evaluate_game_state(&mover, &opponent, board, record.halfmove_clock, None);
    if state.is_game_over() {
        return Err(PlayabilityError::AlreadyDecided(state));
    }

    check_castling_claims(fields[2], board)?;
    check_en_passant_claim(fields[3], board)?;

    Ok(record)
}

fn structural_record(fen: &str) -> Result<FenRecord, FenError> {
    let record = parse_fen_record(fen)?;
    let fields: Vec<&str> = fen.split(' ').collect();

    check_material(&record.board)?;
    check_castling_field(fields[2])?;
    check_en_passant_field(fields[3])?;

    if record.halfmove_clock > FIFTY_MOVE_LIMIT {
        return Err(FenError::InvalidHalfmoveClock(fields[4].to_owned()));
    }
    if !(1..=MAX_FULLMOVE_NUMBER).contains(&record.fullmove_number) {
        return Err(FenError::InvalidFullmoveNumber(fields[5].to_owned()));
    }

    Ok(record)
}

/// Counts are taken per colour; pieces beyond the starting set must be
/// explainable by promotions of missing pawns.
fn check_material(board: &Board) -> Result<(), FenError> {
    if let Some(pawn) = board
        .pieces()
        .find(|p| p.kind == PieceKind::Pawn && (p.square.row == 0 || p.square.row == 7))
    {
        return Err(FenError::PawnOnBackRank {
            square: pawn.square.to_string(),
        });
    }

    for color in [Color::White, Color::Black] {
        let mut counts = [0usize; 6];
        for piece in board.pieces_of(color) {
            counts[piece.kind.index()] += 1;
        }
        let count = |kind: PieceKind| counts[kind.index()];

        let kings = count(PieceKind::King);
        if kings != 1 {
            return Err(FenError::KingCount { color, found: kings });
        }
        let pawns = count(PieceKind::Pawn);
        if pawns > MAX_PAWNS {
            return Err(FenError::TooManyPawns { color, found: pawns });
        }
        let total: usize = counts.iter().sum();
        if total > MAX_PIECES {
            return Err(FenError::TooManyPieces { color, found: total });
        }

        let promoted = count(PieceKind::Queen).saturating_sub(1)
            + count(PieceKind::Rook).saturating_sub(2)
            + count(PieceKind::Bishop).saturating_sub(2)
            + count(PieceKind::Knight).saturating_sub(2);
        if promoted > MAX_PAWNS - pawns {
            return Err(FenError::TooManyPromotedPieces { color });
        }
    }

    Ok(())
}

/// `-` or a non-empty subsequence of `KQkq`, in that order.
fn check_castling_field(field: &str) -> Result<(), FenError> {
    if field == "-" {
        return Ok(());
    }
    let mut next = 0usize;
    for ch in field.chars() {
        let Some(pos) = CASTLING_ORDER[next..].find(ch) else {
            return Err(FenError::InvalidCastling(field.to_owned()));
        };
        next += pos + 1;
    }
    Ok(())
}

fn check_en_passant_field(field: &str) -> Result<(), FenError> {
    if field == "-" {
        return Ok(());
    }
    let valid = algebraic_to_square(field).is_ok() && (field.ends_with('3') || field.ends_with('6'));
    if valid {
        Ok(())
    } else {
        Err(FenError::InvalidEnPassant(field.to_owned()))
    }
}

/// Every claimed right must survive the builder's re-derivation, which only
/// keeps rights backed by an unmoved king on e1/e8 and rook on the corner.
fn check_castling_claims(field: &str, board: &Board) -> Result<(), PlayabilityError> {
    if field == "-" {
        return Ok(());
    }
    for ch in field.chars() {
        let Some((color, kingside)) = castling_claim(ch) else {
            continue;
        };
        let rights = board.castling_rights(color);
        let held = if kingside { rights.kingside } else { rights.queenside };
        if !held {
            return Err(PlayabilityError::CastlingMismatch { right: ch });
        }
    }
    Ok(())
}

/// The target must sit directly behind a pawn of the side that just moved,
/// on the square that pawn skipped, with its start square now empty.
fn check_en_passant_claim(field: &str, board: &Board) -> Result<(), PlayabilityError> {
    if field == "-" {
        return Ok(());
    }
    let mismatch = || PlayabilityError::EnPassantMismatch {
        square: field.to_owned(),
    };

    let ep = board.en_passant().ok_or_else(mismatch)?;
    let advanced = board.turn().reverse();
    let expected_row = advanced.pawn_start_row() as i8 + advanced.pawn_direction();
    if ep.target.row as i8 != expected_row {
        return Err(mismatch());
    }

    let pawn = board.last_moved().ok_or_else(mismatch)?;
    if pawn.kind != PieceKind::Pawn || pawn.color != advanced || pawn.square != ep.victim {
        return Err(mismatch());
    }

    let start = ep
        .target
        .offset(-advanced.pawn_direction(), 0)
        .ok_or_else(mismatch)?;
    if !board.tile(ep.target).is_empty() || !board.tile(start).is_empty() {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_playable, is_playable, is_valid_fen, validate_fen};
    use crate::errors::{FenError, PlayabilityError};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_status::GameState;

    #[test]
    fn accepts_standard_positions() {
        assert!(is_valid_fen(STARTING_POSITION_FEN));
        assert!(is_playable(STARTING_POSITION_FEN, Color::White));
        assert!(is_playable(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            Color::Black
        ));
        assert!(is_playable(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
            Color::White
        ));
    }

    #[test]
    fn rejects_bad_rank_widths() {
        assert_eq!(
            validate_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::RankWidth { rank: 7, width: 7 })
        );
        assert_eq!(
            validate_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPieceChar('9'))
        );
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w KQkq - 0 1"));
    }

    #[test]
    fn rejects_out_of_order_castling() {
        assert!(matches!(
            validate_fen("r3k2r/8/8/8/8/8/8/R3K2R w qQKk - 0 1"),
            Err(FenError::InvalidCastling(_))
        ));
        assert!(matches!(
            validate_fen("r3k2r/8/8/8/8/8/8/R3K2R w KK - 0 1"),
            Err(FenError::InvalidCastling(_))
        ));
        assert!(is_valid_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1"));
    }

    #[test]
    fn rejects_clock_limits() {
        assert!(matches!(
            validate_fen("4k3/8/8/8/8/8/8/4K2R w - - 51 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            validate_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(is_valid_fen("4k3/8/8/8/8/8/8/4K2R w - - 50 1"));
    }

    #[test]
    fn rejects_fullmove_numbers_past_the_cap() {
        assert!(matches!(
            validate_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 4294967295"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(!is_playable("4k3/8/8/8/8/8/4P3/4K3 b - - 0 100001", Color::White));
        assert!(is_playable("4k3/8/8/8/8/8/4P3/4K3 b - - 0 100000", Color::White));
    }

    #[test]
    fn rejects_pawns_on_back_ranks() {
        assert!(matches!(
            validate_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank { .. })
        ));
        assert!(matches!(
            validate_fen("4k3/8/8/8/8/8/8/4K2p w - - 0 1"),
            Err(FenError::PawnOnBackRank { .. })
        ));
    }

    #[test]
    fn counts_material_per_colour() {
        assert_eq!(
            validate_fen("4k3/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::KingCount {
                color: Color::White,
                found: 0
            })
        );
        assert!(matches!(
            validate_fen("4k3/pppppppp/p7/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::TooManyPawns { color: Color::Black, found: 9 })
        ));
        assert!(matches!(
            validate_fen("QQQ1k3/8/8/8/8/8/PPPPPPP1/4K3 w - - 0 1"),
            Err(FenError::TooManyPromotedPieces { color: Color::White })
        ));
        assert!(is_valid_fen("QQ2k3/8/8/8/8/8/PPPPPPP1/4K3 b - - 0 1"));
    }

    #[test]
    fn rejects_en_passant_off_ranks_three_and_six() {
        assert!(matches!(
            validate_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
    }

    #[test]
    fn unplayable_check_configurations() {
        assert_eq!(
            check_playable("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::WrongSideInCheck { color: Color::Black })
        );
        assert_eq!(
            check_playable("4k3/4R3/8/8/8/8/4r3/4K3 w - - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::BothInCheck)
        );
        assert!(is_playable("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1", Color::White));
    }

    #[test]
    fn finished_positions_are_not_playable() {
        assert_eq!(
            check_playable("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::AlreadyDecided(GameState::Checkmate))
        );
        assert_eq!(
            check_playable("k7/8/1Q6/8/8/8/8/7K b - - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::AlreadyDecided(GameState::Stalemate))
        );
        assert_eq!(
            check_playable("4k3/8/8/8/8/8/8/4K3 w - - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::AlreadyDecided(GameState::InsufficientMaterial))
        );
    }

    #[test]
    fn castling_claims_must_be_backed() {
        assert_eq!(
            check_playable("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1", Color::White).map(|_| ()),
            Err(PlayabilityError::CastlingMismatch { right: 'Q' })
        );
        assert!(is_playable("4k3/8/8/8/8/8/8/4K2R w K - 0 1", Color::White));
    }

    #[test]
    fn en_passant_claims_must_follow_a_double_advance() {
        assert!(matches!(
            check_playable("4k3/8/8/8/4P3/8/8/4K3 b - e6 0 1", Color::White),
            Err(PlayabilityError::EnPassantMismatch { .. })
        ));
        assert!(matches!(
            check_playable("4k3/8/8/8/8/8/4P3/4K3 b - e3 0 1", Color::White),
            Err(PlayabilityError::EnPassantMismatch { .. })
        ));
        assert!(is_playable("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1", Color::White));
    }

    #[test]
    fn loose_fen_spellings_are_invalid() {
        assert!(!is_valid_fen("4k3/8/8/8/8/8/8/3K13 w - - 0 1"));
        assert!(!is_valid_fen("4k3/8/8/8/8/8/8/4K3 w - - +5 1"));
        assert!(!is_valid_fen("4k3/8/8/8/8/8/8/4K3  w - - 0 1"));
        assert!(!is_playable("4k3/8/8/8/8/8/8/3K13 w - - 0 1", Color::White));
    }

    #[test]
    fn malformed_text_is_reported_as_such() {
        assert!(matches!(
            check_playable("not a fen", Color::White),
            Err(PlayabilityError::Malformed(FenError::FieldCount { found: 3 }))
        ));
    }
}
