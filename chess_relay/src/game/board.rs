//! Board representation.
//!
//! The board is a flat sequence of 64 optional piece descriptors in
//! row-major order with index 0 at the top-left (a8 in algebraic terms).
//! That traversal order is part of the rules-engine contract and is pinned
//! by tests; every renderer and rules implementation must agree on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of squares on the board.
pub const BOARD_SIZE: usize = 64;

/// Squares per row.
pub const BOARD_WIDTH: usize = 8;

/// Side to move.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The opposing side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            _ => Err(ParseError::InvalidColor(s.to_string())),
        }
    }
}

/// Error parsing a square or color from text.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("invalid square '{0}': expected algebraic notation like 'e2' or an index 0-63")]
    InvalidSquare(String),
    #[error("invalid color '{0}': expected 'white' or 'black'")]
    InvalidColor(String),
}

/// A validated board index in `0..64`.
///
/// Index 0 is the top-left square (a8); indices increase left-to-right,
/// top-to-bottom, so a1 is index 56 and h1 is index 63.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Square(u8);

impl Square {
    /// Validate a raw index. Returns `None` when outside `0..64`.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < BOARD_SIZE).then(|| Self(index as u8))
    }

    /// The raw row-major index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row from the top, `0..8`.
    #[must_use]
    pub const fn row(self) -> usize {
        self.0 as usize / BOARD_WIDTH
    }

    /// Column from the left, `0..8`.
    #[must_use]
    pub const fn col(self) -> usize {
        self.0 as usize % BOARD_WIDTH
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        let rank = BOARD_WIDTH - self.row();
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = ParseError;

    /// Parses algebraic notation ("e2") or a raw index ("52").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::new(index).ok_or_else(|| ParseError::InvalidSquare(s.to_string()));
        }
        let bytes = s.as_bytes();
        if bytes.len() == 2 {
            let file = bytes[0].to_ascii_lowercase();
            let rank = bytes[1];
            if (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank) {
                let col = (file - b'a') as usize;
                let row = BOARD_WIDTH - (rank - b'0') as usize;
                return Ok(Self((row * BOARD_WIDTH + col) as u8));
            }
        }
        Err(ParseError::InvalidSquare(s.to_string()))
    }
}

/// Piece kind. The core never interprets these beyond identity; they exist
/// so rules engines and renderers share one vocabulary.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A piece descriptor: color plus kind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Single-character glyph: uppercase for white, lowercase for black.
    #[must_use]
    pub fn glyph(self) -> char {
        let letter = self.kind.letter();
        match self.color {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }
}

/// The board: 64 optional pieces in pinned row-major order.
///
/// A value type the core copies and passes through; only rules engines
/// interpret its contents.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Board(Vec<Option<Piece>>);

impl Board {
    /// An empty board.
    #[must_use]
    pub fn empty() -> Self {
        Self(vec![None; BOARD_SIZE])
    }

    /// The canonical initial chess layout: black's back rank on row 0,
    /// white's on row 7.
    #[must_use]
    pub fn initial() -> Self {
        use PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut squares = vec![None; BOARD_SIZE];
        for (col, kind) in back_rank.into_iter().enumerate() {
            squares[col] = Some(Piece::new(Color::Black, kind));
            squares[BOARD_WIDTH + col] = Some(Piece::new(Color::Black, Pawn));
            squares[6 * BOARD_WIDTH + col] = Some(Piece::new(Color::White, Pawn));
            squares[7 * BOARD_WIDTH + col] = Some(Piece::new(Color::White, kind));
        }
        Self(squares)
    }

    /// Piece at a square, if any.
    #[must_use]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.0[square.index()]
    }

    /// Replace the piece at a square, returning the previous occupant.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.0[square.index()], piece)
    }

    /// Iterate all squares with their occupants in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, piece)| (Square(i as u8), *piece))
    }

    /// Whether any piece of the given color and kind is on the board.
    #[must_use]
    pub fn contains(&self, color: Color, kind: PieceKind) -> bool {
        self.0
            .iter()
            .flatten()
            .any(|p| p.color == color && p.kind == kind)
    }

    /// Total piece count.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.0.iter().flatten().count()
    }
}

impl fmt::Display for Board {
    /// Renders rows top to bottom, matching the pinned row-major order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            for col in 0..BOARD_WIDTH {
                let cell = match self.0[row * BOARD_WIDTH + col] {
                    Some(piece) => piece.glyph(),
                    None => '.',
                };
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
