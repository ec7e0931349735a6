//! Rules-engine capability boundary.
//!
//! The controller delegates "is this move legal" and "is this position
//! terminal" here and never inspects board contents itself. Any compliant
//! implementation is substitutable: full chess rules, a different board
//! game, or a scripted stub for pure state-machine testing.

mod capture;

pub use capture::CaptureRules;

use async_trait::async_trait;
use thiserror::Error;

use crate::game::{Board, Color, Move, Outcome, Square};

/// Errors surfaced by a rules engine.
///
/// `Unavailable` models an unreachable remote implementation; the
/// controller treats it as a transport failure and does not retry.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("rules engine unreachable: {0}")]
    Unavailable(String),

    #[error("rules engine rejected the board: {0}")]
    InvalidBoard(String),
}

/// Terminal classification of a board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Terminal {
    InProgress,
    Winner(Color),
    Draw,
}

impl Terminal {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The outcome, when terminal.
    #[must_use]
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::InProgress => None,
            Self::Winner(color) => Some(Outcome::Winner(color)),
            Self::Draw => Some(Outcome::Draw),
        }
    }
}

/// Capability set consumed by the controller.
///
/// Calls may cross a network boundary, so every operation is fallible and
/// async; timeouts are the caller's responsibility.
#[async_trait]
pub trait RulesEngine: Send + Sync {
    /// All legal `(from, to)` pairs for the acting color.
    async fn legal_moves(
        &self,
        board: &Board,
        actor: Color,
    ) -> Result<Vec<(Square, Square)>, RulesError>;

    /// Apply a move, producing the successor board.
    async fn apply(&self, board: &Board, mv: &Move) -> Result<Board, RulesError>;

    /// Classify whether the board is terminal.
    async fn classify_terminal(&self, board: &Board) -> Result<Terminal, RulesError>;
}
