//! Core game model: board representation and authoritative state.

pub mod board;
pub mod state;

pub use board::{BOARD_SIZE, BOARD_WIDTH, Board, Color, ParseError, Piece, PieceKind, Square};
pub use state::{GameState, GameStatus, Move, Outcome};
