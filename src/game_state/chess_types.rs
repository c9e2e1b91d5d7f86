//! Core value types shared by the board, move generation and search.
//!
//! Everything here is a small `Copy` value. Pieces are snapshots: moving a
//! piece produces a new `Piece` with an updated square and move count, there
//! is no identity that survives across boards.

use std::fmt;

use crate::game_state::chess_rules::{
    BLACK_BACK_ROW, BOARD_SIZE, KINGSIDE_ROOK_COL, KING_HOME_COL, QUEENSIDE_ROOK_COL,
    WHITE_BACK_ROW,
};

/// Side colour. Also used for tile shading (light tiles are `White`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn advance. Row 0 is rank 8, so White moves up.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => WHITE_BACK_ROW,
            Color::Black => BLACK_BACK_ROW,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The opponent's back rank, where this colour's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        self.reverse().back_row()
    }

    /// Row a pawn of this colour must stand on to capture en passant.
    #[inline]
    pub const fn en_passant_row(self) -> u8 {
        match self {
            Color::White => 3,
            Color::Black => 4,
        }
    }

    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

/// Piece kind (colour is represented separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    #[inline]
    pub const fn slides_orthogonally(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }
}

/// Board coordinate. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Returns `None` when either coordinate is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Shift by a row/column delta, `None` if the result leaves the board.
    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Shade of the tile at this square.
    #[inline]
    pub const fn shade(self) -> Color {
        if (self.row + self.col) % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Iterate all 64 squares in FEN order (row 0 first, column 0 first).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col);
        let rank = char::from(b'8' - self.row);
        write!(f, "{file}{rank}")
    }
}

/// Castling payload carried by kings and rooks.
///
/// On a king the flags say which sides are still available. On a rook exactly
/// one flag is set and names the side the rook castles on; a rook that has
/// lost eligibility carries no flags at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CastlingFlags {
    pub kingside: bool,
    pub queenside: bool,
}

impl CastlingFlags {
    pub const BOTH: CastlingFlags = CastlingFlags {
        kingside: true,
        queenside: true,
    };

    #[inline]
    pub const fn any(self) -> bool {
        self.kingside || self.queenside
    }
}

/// A piece snapshot on a specific square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub move_count: u16,
    pub castling: Option<CastlingFlags>,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            move_count: 0,
            castling: None,
        }
    }

    /// Build a piece from a FEN letter (uppercase is White).
    pub fn from_fen_char(ch: char, square: Square) -> Option<Self> {
        let kind = PieceKind::from_fen_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self::new(kind, color, square))
    }

    pub fn fen_char(&self) -> char {
        let ch = self.kind.fen_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub const fn with_castling(mut self, flags: CastlingFlags) -> Self {
        self.castling = Some(flags);
        self
    }

    /// Snapshot after moving to `square`. A moved king or rook loses its
    /// castling payload.
    pub const fn moved_to(mut self, square: Square) -> Self {
        self.square = square;
        self.move_count = self.move_count.saturating_add(1);
        self.castling = None;
        self
    }

    /// Same square and history, different kind (used for promotion).
    pub const fn promoted(mut self, kind: PieceKind) -> Self {
        self.kind = kind;
        self.castling = None;
        self
    }

    #[inline]
    pub const fn has_never_moved(&self) -> bool {
        self.move_count == 0
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// King still on e1/e8 and never moved.
    pub fn is_king_at_home(&self) -> bool {
        self.kind == PieceKind::King
            && self.has_never_moved()
            && self.square.row == self.color.back_row()
            && self.square.col == KING_HOME_COL
    }

    /// Rook that still qualifies as a castling partner for the given side.
    pub fn is_castling_rook(&self, kingside: bool) -> bool {
        let home_col = if kingside {
            KINGSIDE_ROOK_COL
        } else {
            QUEENSIDE_ROOK_COL
        };
        let serves_side = match self.castling {
            Some(flags) if kingside => flags.kingside,
            Some(flags) => flags.queenside,
            None => false,
        };
        self.kind == PieceKind::Rook
            && self.has_never_moved()
            && self.square.row == self.color.back_row()
            && self.square.col == home_col
            && serves_side
    }
}
