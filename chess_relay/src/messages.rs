//! Wire types shared by the server and its clients.

use serde::{Deserialize, Serialize};

use crate::game::{Board, Color, GameState, GameStatus};

/// Full-state snapshot pushed to viewers: once on subscribe and once per
/// change signal. Viewers never receive diffs.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub version: u64,
}

impl From<GameState> for Snapshot {
    fn from(state: GameState) -> Self {
        Self {
            board: state.board,
            turn: state.turn,
            status: state.status,
            version: state.version,
        }
    }
}

/// Request body for applying a move.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MoveRequest {
    pub player: Color,
    pub from_index: usize,
    pub to_index: usize,
}

/// Response for an accepted move.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MoveAccepted {
    pub success: bool,
    pub message: String,
    pub state: GameState,
}

/// Machine-readable failure surfaced to requesters: a stable reason code
/// plus a human-readable message.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub reason: String,
    pub message: String,
}
