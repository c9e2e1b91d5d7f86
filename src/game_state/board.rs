//! Immutable board snapshots and the builder that produces them.
//!
//! A `Board` is never edited in place. Every transition (a move, a capture,
//! castling, en passant, promotion) copies the tiles into a `BoardBuilder`,
//! applies the edits and builds a brand-new `Board`. The builder re-derives
//! castling rights from the king and rook snapshots on every build so a
//! captured or displaced rook drops the matching right.
//!
//! The en-passant record and the last-moved piece are part of the value:
//! they are set by whichever transition produced the board and are cleared by
//! every other transition, so an en-passant capture is only ever available on
//! the ply right after the double advance.

use std::fmt;

use crate::game_state::chess_rules::{
    BOARD_SIZE, KINGSIDE_ROOK_COL, KING_HOME_COL, QUEENSIDE_ROOK_COL,
};
use crate::game_state::chess_types::{CastlingFlags, Color, Piece, PieceKind, Square};
use crate::game_state::tile::Tile;
use crate::moves::chess_move::{Move, MoveKind};

/// En-passant record left behind by a two-square pawn advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnPassant {
    /// Square the capturing pawn lands on (the one the pawn skipped).
    pub target: Square,
    /// Square of the pawn that may be captured.
    pub victim: Square,
}

type Grid = [[Tile; BOARD_SIZE as usize]; BOARD_SIZE as usize];

fn empty_grid() -> Grid {
    let mut grid = [[Tile::empty(Square { row: 0, col: 0 }); BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for square in Square::all() {
        grid[square.row as usize][square.col as usize] = Tile::empty(square);
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: Grid,
    turn: Color,
    en_passant: Option<EnPassant>,
    last_moved: Option<Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Board with no pieces, White to move.
    pub fn empty() -> Self {
        Self {
            tiles: empty_grid(),
            turn: Color::White,
            en_passant: None,
            last_moved: None,
        }
    }

    /// Standard initial array with full castling rights.
    pub fn starting_position() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut builder = BoardBuilder::new();
        for color in [Color::White, Color::Black] {
            let back_row = color.back_row();
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                let square = Square {
                    row: back_row,
                    col: col as u8,
                };
                let mut piece = Piece::new(kind, color, square);
                match (kind, square.col) {
                    (PieceKind::King, _) => piece = piece.with_castling(CastlingFlags::BOTH),
                    (PieceKind::Rook, KINGSIDE_ROOK_COL) => {
                        piece = piece.with_castling(CastlingFlags {
                            kingside: true,
                            queenside: false,
                        })
                    }
                    (PieceKind::Rook, QUEENSIDE_ROOK_COL) => {
                        piece = piece.with_castling(CastlingFlags {
                            kingside: false,
                            queenside: true,
                        })
                    }
                    _ => {}
                }
                builder.set_piece(piece);
            }
            for col in 0..BOARD_SIZE {
                let square = Square {
                    row: color.pawn_start_row(),
                    col,
                };
                builder.set_piece(Piece::new(PieceKind::Pawn, color, square));
            }
        }
        builder.set_turn(Color::White);
        builder.build()
    }

    /// Start a builder seeded with a deep copy of this board.
    pub fn to_builder(&self) -> BoardBuilder {
        BoardBuilder {
            tiles: self.tiles,
            turn: self.turn,
            en_passant: self.en_passant,
            last_moved: self.last_moved,
        }
    }

    #[inline]
    pub fn tile(&self, square: Square) -> &Tile {
        &self.tiles[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }
        self.tile(square).piece
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    #[inline]
    pub fn last_moved(&self) -> Option<Piece> {
        self.last_moved
    }

    /// Rows of tiles, row 0 (rank 8) first.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile; BOARD_SIZE as usize]> {
        self.tiles.iter()
    }

    /// All pieces in FEN order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.tiles.iter().flatten().filter_map(|tile| tile.piece)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn king(&self, color: Color) -> Option<Piece> {
        self.pieces_of(color).find(Piece::is_king)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Castling rights currently held by `color`'s king.
    pub fn castling_rights(&self, color: Color) -> CastlingFlags {
        self.king(color)
            .and_then(|king| king.castling)
            .unwrap_or_default()
    }

    /// FEN castling field (`KQkq` subset or `-`).
    pub fn castling_field(&self) -> String {
        let white = self.castling_rights(Color::White);
        let black = self.castling_rights(Color::Black);
        let mut out = String::new();
        if white.kingside {
            out.push('K');
        }
        if white.queenside {
            out.push('Q');
        }
        if black.kingside {
            out.push('k');
        }
        if black.queenside {
            out.push('q');
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// FEN piece-placement field.
    pub fn placement_field(&self) -> String {
        let mut out = String::new();
        for (row_idx, row) in self.tiles.iter().enumerate() {
            let mut empty_count = 0u8;
            for tile in row {
                match tile.piece {
                    Some(piece) => {
                        if empty_count > 0 {
                            out.push(char::from(b'0' + empty_count));
                            empty_count = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push(char::from(b'0' + empty_count));
            }
            if row_idx + 1 < BOARD_SIZE as usize {
                out.push('/');
            }
        }
        out
    }

    /// Apply any move kind. A move that does not fit this board yields an
    /// unchanged copy.
    pub fn apply(&self, mv: &Move) -> Board {
        match mv.kind() {
            MoveKind::Regular => self.move_piece(mv),
            MoveKind::Attacking { .. } => self.attack(mv),
            MoveKind::Castling { .. } => self.castle(mv),
            MoveKind::EnPassant { .. } => self.en_passant_capture(mv),
        }
    }

    /// Quiet move onto an empty tile.
    pub fn move_piece(&self, mv: &Move) -> Board {
        match mv.kind() {
            MoveKind::Regular => self.transition_or_same(mv),
            _ => self.clone(),
        }
    }

    /// Capture of the piece on the destination tile.
    pub fn attack(&self, mv: &Move) -> Board {
        match mv.kind() {
            MoveKind::Attacking { .. } => self.transition_or_same(mv),
            _ => self.clone(),
        }
    }

    pub fn castle(&self, mv: &Move) -> Board {
        match mv.kind() {
            MoveKind::Castling { .. } => self.transition_or_same(mv),
            _ => self.clone(),
        }
    }

    pub fn en_passant_capture(&self, mv: &Move) -> Board {
        match mv.kind() {
            MoveKind::EnPassant { .. } => self.transition_or_same(mv),
            _ => self.clone(),
        }
    }

    fn transition_or_same(&self, mv: &Move) -> Board {
        self.transition(mv.kind(), mv.piece(), mv.to())
            .unwrap_or_else(|| self.clone())
    }

    /// Replace a pawn standing on its promotion rank with `piece`.
    ///
    /// Returns an unchanged copy when `piece` is a pawn or king, is off the
    /// board, is not on the promotion rank for its colour, or does not stand
    /// where a pawn of its colour stands. The turn is preserved.
    pub fn promote(&self, piece: Piece) -> Board {
        if matches!(piece.kind, PieceKind::Pawn | PieceKind::King) {
            return self.clone();
        }
        if !piece.square.is_valid() || piece.square.row != piece.color.promotion_row() {
            return self.clone();
        }
        let Some(pawn) = self.piece_at(piece.square) else {
            return self.clone();
        };
        if pawn.kind != PieceKind::Pawn || pawn.color != piece.color {
            return self.clone();
        }

        let promoted = pawn.promoted(piece.kind);
        let mut builder = self.to_builder();
        builder.set_piece(promoted);
        if self.last_moved.map(|p| p.square) == Some(promoted.square) {
            builder.set_last_moved(Some(promoted));
        }
        builder.build()
    }

    /// Board after `piece` makes a move of `kind` to `to`, or `None` when the
    /// move does not fit this board.
    pub(crate) fn transition(&self, kind: &MoveKind, piece: Piece, to: Square) -> Option<Board> {
        if !to.is_valid() || self.piece_at(piece.square) != Some(piece) {
            return None;
        }

        let mut builder = self.to_builder();
        builder.set_en_passant(None);
        let moved = piece.moved_to(to);

        match kind {
            MoveKind::Regular => {
                if !self.tile(to).is_empty() {
                    return None;
                }
                builder.clear(piece.square).set_piece(moved);
                let advance = to.row.abs_diff(piece.square.row);
                if piece.kind == PieceKind::Pawn && advance == 2 && to.col == piece.square.col {
                    let target = Square {
                        row: (to.row + piece.square.row) / 2,
                        col: to.col,
                    };
                    builder.set_en_passant(Some(EnPassant { target, victim: to }));
                }
            }
            MoveKind::Attacking { victim } => {
                if self.piece_at(to) != Some(*victim) || victim.color == piece.color {
                    return None;
                }
                builder.clear(piece.square).set_piece(moved);
            }
            MoveKind::Castling { rook, rook_to } => {
                if piece.kind != PieceKind::King
                    || self.piece_at(rook.square) != Some(*rook)
                    || rook.color != piece.color
                {
                    return None;
                }
                builder
                    .clear(piece.square)
                    .clear(rook.square)
                    .set_piece(moved)
                    .set_piece(rook.moved_to(*rook_to));
            }
            MoveKind::EnPassant { victim } => {
                if self.piece_at(victim.square) != Some(*victim)
                    || victim.kind != PieceKind::Pawn
                    || !self.tile(to).is_empty()
                {
                    return None;
                }
                builder
                    .clear(piece.square)
                    .clear(victim.square)
                    .set_piece(moved);
            }
        }

        builder
            .set_turn(piece.color.reverse())
            .set_last_moved(Some(moved));
        Some(builder.build())
    }
}

impl fmt::Display for Board {
    /// FEN without the clocks: placement, turn, castling, en passant.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let en_passant = match self.en_passant {
            Some(ep) => ep.target.to_string(),
            None => "-".to_owned(),
        };
        write!(
            f,
            "{} {} {} {}",
            self.placement_field(),
            self.turn.fen_char(),
            self.castling_field(),
            en_passant
        )
    }
}

/// Mutable staging area for a new `Board`.
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    tiles: Grid,
    turn: Color,
    en_passant: Option<EnPassant>,
    last_moved: Option<Piece>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self {
            tiles: empty_grid(),
            turn: Color::White,
            en_passant: None,
            last_moved: None,
        }
    }

    /// Place `piece` on its own square, replacing whatever stood there.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        if piece.square.is_valid() {
            let square = piece.square;
            self.tiles[square.row as usize][square.col as usize] = Tile::occupied(square, piece);
        }
        self
    }

    pub fn clear(&mut self, square: Square) -> &mut Self {
        if square.is_valid() {
            self.tiles[square.row as usize][square.col as usize] = Tile::empty(square);
        }
        self
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }
        self.tiles[square.row as usize][square.col as usize].piece
    }

    pub fn set_turn(&mut self, turn: Color) -> &mut Self {
        self.turn = turn;
        self
    }

    pub fn set_en_passant(&mut self, en_passant: Option<EnPassant>) -> &mut Self {
        self.en_passant = en_passant;
        self
    }

    pub fn set_last_moved(&mut self, piece: Option<Piece>) -> &mut Self {
        self.last_moved = piece;
        self
    }

    pub fn build(&self) -> Board {
        let mut tiles = self.tiles;
        for color in [Color::White, Color::Black] {
            refresh_castling_rights(&mut tiles, color);
        }
        Board {
            tiles,
            turn: self.turn,
            en_passant: self.en_passant,
            last_moved: self.last_moved,
        }
    }
}

/// A king keeps a castling right only while it is unmoved on its home square,
/// held the right before, and an eligible unmoved rook stands on the corner.
fn refresh_castling_rights(tiles: &mut Grid, color: Color) {
    let back_row = color.back_row() as usize;
    let Some(king) = tiles[back_row][KING_HOME_COL as usize]
        .piece
        .filter(|p| p.color == color && p.is_king_at_home())
    else {
        return;
    };
    let previous = king.castling.unwrap_or_default();

    let rook_ready = |col: u8, kingside: bool| {
        matches!(
            tiles[back_row][col as usize].piece,
            Some(rook) if rook.color == color && rook.is_castling_rook(kingside)
        )
    };
    let flags = CastlingFlags {
        kingside: previous.kingside && rook_ready(KINGSIDE_ROOK_COL, true),
        queenside: previous.queenside && rook_ready(QUEENSIDE_ROOK_COL, false),
    };

    if let Some(king) = tiles[back_row][KING_HOME_COL as usize].piece.as_mut() {
        king.castling = Some(flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::moves::chess_move::Move;

    fn sq(name: &str) -> Square {
        crate::utils::algebraic::algebraic_to_square(name).expect("test square should parse")
    }

    #[test]
    fn starting_position_serializes_to_standard_fen() {
        let board = Board::starting_position();
        let expected: Vec<&str> = STARTING_POSITION_FEN.split(' ').take(4).collect();
        assert_eq!(board.to_string(), expected.join(" "));
        assert_eq!(board.piece_count(), 32);
    }

    #[test]
    fn empty_board_has_no_pieces_and_no_rights() {
        let board = Board::empty();
        assert_eq!(board.to_string(), "8/8/8/8/8/8/8/8 w - -");
    }

    #[test]
    fn double_pawn_push_records_en_passant_and_flips_turn() {
        let board = Board::starting_position();
        let pawn = board.piece_at(sq("e2")).expect("pawn on e2");
        let mv = Move::new(&board, MoveKind::Regular, pawn, sq("e4")).expect("e2e4 fits");
        let next = board.apply(&mv);

        assert_eq!(next.turn(), Color::Black);
        assert_eq!(
            next.en_passant(),
            Some(EnPassant {
                target: sq("e3"),
                victim: sq("e4")
            })
        );
        assert_eq!(next.piece_at(sq("e2")), None);
        assert_eq!(next.piece_at(sq("e4")).map(|p| p.move_count), Some(1));
        assert_eq!(
            next.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3"
        );
    }

    #[test]
    fn moving_a_rook_drops_only_that_castling_right() {
        let board = crate::utils::fen_parser::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("castling FEN should parse");
        let rook = board.piece_at(sq("h1")).expect("rook on h1");
        let mv = Move::new(&board, MoveKind::Regular, rook, sq("h4")).expect("rook lift fits");
        let next = board.apply(&mv);
        assert_eq!(next.castling_field(), "Qkq");
    }

    #[test]
    fn capturing_a_rook_drops_the_opponents_right() {
        let board = crate::utils::fen_parser::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("castling FEN should parse");
        let rook = board.piece_at(sq("a1")).expect("rook on a1");
        let victim = board.piece_at(sq("a8")).expect("rook on a8");
        let mv = Move::new(&board, MoveKind::Attacking { victim }, rook, sq("a8"))
            .expect("rook capture fits");
        let next = board.attack(&mv);
        assert_eq!(next.castling_field(), "Kk");
    }

    #[test]
    fn mismatched_move_kind_is_a_no_op() {
        let board = Board::starting_position();
        let pawn = board.piece_at(sq("d2")).expect("pawn on d2");
        let mv = Move::new(&board, MoveKind::Regular, pawn, sq("d3")).expect("d2d3 fits");
        assert_eq!(board.attack(&mv), board);
        assert_eq!(board.castle(&mv), board);
    }

    #[test]
    fn stale_move_on_another_board_is_a_no_op() {
        let board = Board::starting_position();
        let pawn = board.piece_at(sq("d2")).expect("pawn on d2");
        let mv = Move::new(&board, MoveKind::Regular, pawn, sq("d4")).expect("d2d4 fits");
        let after = board.apply(&mv);
        assert_eq!(after.apply(&mv), after);
    }

    #[test]
    fn promote_rejects_invalid_requests() {
        let board = crate::utils::fen_parser::parse_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
            .expect("promotion FEN should parse");
        let pawn = board.piece_at(sq("a7")).expect("pawn on a7");
        let mv = Move::new(&board, MoveKind::Regular, pawn, sq("a8")).expect("a7a8 fits");
        let arrived = board.apply(&mv);

        let on_a8 = sq("a8");
        let queen = Piece::new(PieceKind::Queen, Color::White, on_a8);
        let promoted = arrived.promote(queen);
        assert_eq!(promoted.piece_at(on_a8).map(|p| p.kind), Some(PieceKind::Queen));
        assert_eq!(promoted.turn(), arrived.turn());

        assert_eq!(arrived.promote(Piece::new(PieceKind::King, Color::White, on_a8)), arrived);
        assert_eq!(arrived.promote(Piece::new(PieceKind::Pawn, Color::White, on_a8)), arrived);
        assert_eq!(arrived.promote(Piece::new(PieceKind::Queen, Color::Black, on_a8)), arrived);
        assert_eq!(
            arrived.promote(Piece::new(PieceKind::Queen, Color::White, sq("b8"))),
            arrived
        );
        let off_board = Piece::new(PieceKind::Rook, Color::White, Square { row: 9, col: 0 });
        assert_eq!(arrived.promote(off_board), arrived);
    }
}
