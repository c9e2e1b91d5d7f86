//! FEN-to-Board parser.
//!
//! Builds a `Board` from a Forsyth-Edwards Notation record: piece placement,
//! side to move, castling payloads on the kings and rooks, and the
//! en-passant record (with the double-advanced pawn as the last-moved piece).
//! Only the shape of the record is checked here; the counting rules and clock
//! ranges live in `fen_validator`.

use crate::errors::FenError;
use crate::game_state::board::{Board, BoardBuilder, EnPassant};
use crate::game_state::chess_rules::{BOARD_SIZE, KINGSIDE_ROOK_COL, KING_HOME_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::{CastlingFlags, Color, Piece, PieceKind, Square};
use crate::utils::algebraic::algebraic_to_square;

/// A parsed FEN record: the board plus its two clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    pub board: Board,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

pub fn parse_fen(fen: &str) -> Result<Board, FenError> {
    parse_fen_record(fen).map(|record| record.board)
}

pub fn parse_fen_record(fen: &str) -> Result<FenRecord, FenError> {
    let fields: Vec<&str> = fen.split(' ').collect();
    let [board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields[..]
    else {
        return Err(FenError::FieldCount {
            found: fields.len(),
        });
    };

    let mut builder = BoardBuilder::new();
    parse_placement(board_part, &mut builder)?;
    let turn = parse_side_to_move(side_part)?;
    builder.set_turn(turn);
    apply_castling_rights(castling_part, &mut builder)?;
    apply_en_passant(en_passant_part, turn, &mut builder)?;

    let halfmove_clock = parse_counter(halfmove_part)
        .ok_or_else(|| FenError::InvalidHalfmoveClock(halfmove_part.to_owned()))?;
    let fullmove_number = parse_counter(fullmove_part)
        .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove_part.to_owned()))?;

    Ok(FenRecord {
        board: builder.build(),
        halfmove_clock,
        fullmove_number,
    })
}

/// ASCII digits only; `u32::from_str` alone would also take a leading `+`.
fn parse_counter(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Piece placement only. Ranks must each cover exactly 8 files.
pub(crate) fn parse_placement(board_part: &str, builder: &mut BoardBuilder) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != BOARD_SIZE as usize {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    for (row, rank_str) in ranks.iter().enumerate() {
        let mut width = 0usize;
        let mut after_run = false;
        for ch in rank_str.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPieceChar(ch));
                }
                if after_run {
                    return Err(FenError::AdjacentEmptyRuns {
                        rank: BOARD_SIZE as usize - row,
                    });
                }
                after_run = true;
                width += run as usize;
                continue;
            }
            after_run = false;

            let square = Square::new(row as u8, width as u8);
            let piece = match square {
                Some(square) => Piece::from_fen_char(ch, square).ok_or(FenError::InvalidPieceChar(ch))?,
                None => {
                    if PieceKind::from_fen_char(ch).is_none() {
                        return Err(FenError::InvalidPieceChar(ch));
                    }
                    width += 1;
                    continue;
                }
            };
            builder.set_piece(piece);
            width += 1;
        }

        if width != BOARD_SIZE as usize {
            return Err(FenError::RankWidth {
                rank: BOARD_SIZE as usize - row,
                width,
            });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::InvalidTurn(side_part.to_owned())),
    }
}

/// Hand the claimed rights to the king on e1/e8 and the matching corner
/// rooks. Claims with no king or rook to carry them are dropped when the
/// builder re-derives rights.
fn apply_castling_rights(castling_part: &str, builder: &mut BoardBuilder) -> Result<(), FenError> {
    if castling_part == "-" {
        return Ok(());
    }

    let mut claimed = [CastlingFlags::default(); 2];
    for ch in castling_part.chars() {
        let (color, kingside) = castling_claim(ch)
            .ok_or_else(|| FenError::InvalidCastling(castling_part.to_owned()))?;
        let flags = &mut claimed[color.index()];
        if kingside {
            flags.kingside = true;
        } else {
            flags.queenside = true;
        }
    }

    for color in [Color::White, Color::Black] {
        let flags = claimed[color.index()];
        if !flags.any() {
            continue;
        }
        let row = color.back_row();
        let king_square = Square { row, col: KING_HOME_COL };
        if let Some(king) = builder.piece_at(king_square).filter(|p| p.is_king() && p.color == color) {
            builder.set_piece(king.with_castling(flags));
        }
        for (wanted, col, rook_flags) in [
            (
                flags.kingside,
                KINGSIDE_ROOK_COL,
                CastlingFlags {
                    kingside: true,
                    queenside: false,
                },
            ),
            (
                flags.queenside,
                QUEENSIDE_ROOK_COL,
                CastlingFlags {
                    kingside: false,
                    queenside: true,
                },
            ),
        ] {
            if !wanted {
                continue;
            }
            let corner = Square { row, col };
            if let Some(rook) = builder
                .piece_at(corner)
                .filter(|p| p.kind == PieceKind::Rook && p.color == color)
            {
                builder.set_piece(rook.with_castling(rook_flags));
            }
        }
    }

    Ok(())
}

/// `(colour, kingside)` for a castling letter.
pub(crate) fn castling_claim(ch: char) -> Option<(Color, bool)> {
    match ch {
        'K' => Some((Color::White, true)),
        'Q' => Some((Color::White, false)),
        'k' => Some((Color::Black, true)),
        'q' => Some((Color::Black, false)),
        _ => None,
    }
}

/// The pawn that double-advanced belongs to the side that just moved; it
/// stands one row past the target in its own direction of travel.
fn apply_en_passant(en_passant_part: &str, turn: Color, builder: &mut BoardBuilder) -> Result<(), FenError> {
    if en_passant_part == "-" {
        return Ok(());
    }

    let target = algebraic_to_square(en_passant_part)
        .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))?;
    let advanced = turn.reverse();
    let victim = target
        .offset(advanced.pawn_direction(), 0)
        .ok_or_else(|| FenError::InvalidEnPassant(en_passant_part.to_owned()))?;

    builder.set_en_passant(Some(EnPassant { target, victim }));
    let pawn = builder
        .piece_at(victim)
        .filter(|p| p.kind == PieceKind::Pawn && p.color == advanced);
    builder.set_last_moved(pawn);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_fen, parse_fen_record};
    use crate::errors::FenError;
    use crate::game_state::board::{Board, EnPassant};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn parse_starting_fen_matches_built_board() {
        let record = parse_fen_record(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(record.board, Board::starting_position());
        assert_eq!(record.halfmove_clock, 0);
        assert_eq!(record.fullmove_number, 1);
    }

    #[test]
    fn castling_claims_need_a_king_and_rook_to_stick() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1").expect("FEN should parse");
        assert_eq!(board.castling_field(), "K");
    }

    #[test]
    fn en_passant_field_records_the_double_advanced_pawn() {
        let board = parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
            .expect("FEN should parse");
        let e3 = algebraic_to_square("e3").expect("e3");
        let e4 = algebraic_to_square("e4").expect("e4");
        assert_eq!(board.en_passant(), Some(EnPassant { target: e3, victim: e4 }));
        let last = board.last_moved().expect("e4 pawn recorded as last moved");
        assert_eq!((last.kind, last.color, last.square), (PieceKind::Pawn, Color::White, e4));
    }

    #[test]
    fn rejects_structural_errors() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::FieldCount { found: 5 })
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RankCount { found: 7 })
        );
        assert_eq!(
            parse_fen("7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RankWidth { rank: 8, width: 7 })
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidTurn("x".to_owned()))
        );
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w X - 0 1"),
            Err(FenError::InvalidCastling(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - z9 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
    }

    #[test]
    fn fields_and_runs_must_be_written_canonically() {
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/8/3K13 w - - 0 1"),
            Err(FenError::AdjacentEmptyRuns { rank: 1 })
        );
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w - - +5 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 +1"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/8/4K3  w - - 0 1"),
            Err(FenError::FieldCount { found: 7 })
        );
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/8/4K3\tw - - 0 1"),
            Err(FenError::FieldCount { found: 5 })
        );
        assert!(parse_fen("4k3/8/8/8/8/8/8/3K4 w - - 0 1").is_ok());
    }
}
