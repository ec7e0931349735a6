//! Authoritative game state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::board::{Board, Color, Square};

/// How a concluded game ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Color),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(color) => write!(f, "{color} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Whether the game accepts further moves.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Concluded(Outcome),
}

impl GameStatus {
    #[must_use]
    pub const fn is_concluded(self) -> bool {
        matches!(self, Self::Concluded(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Concluded(outcome) => write!(f, "concluded: {outcome}"),
        }
    }
}

/// A candidate move: immutable, constructed per request.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub actor: Color,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}->{}", self.actor, self.from, self.to)
    }
}

/// The single authoritative record per game identifier.
///
/// `version` increases strictly with every committed mutation and drives
/// optimistic concurrency in the store; the board held here is always the
/// result of the last committed move.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameState {
    pub status: GameStatus,
    pub turn: Color,
    pub board: Board,
    pub version: u64,
}

impl GameState {
    /// The canonical initial state: white to move, version at baseline.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            status: GameStatus::InProgress,
            turn: Color::White,
            board: Board::initial(),
            version: 0,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
