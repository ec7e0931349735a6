//! Game state API handlers.
//!
//! # Examples
//!
//! Get the current state:
//! ```bash
//! curl http://localhost:8000/api/v1/games/lobby
//! ```
//!
//! Apply a move (e2 -> e4 in row-major indices):
//! ```bash
//! curl -X POST http://localhost:8000/api/v1/games/lobby/move \
//!   -H "Content-Type: application/json" \
//!   -d '{"player": "white", "from_index": 52, "to_index": 36}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chess_relay::{
    controller::MoveError,
    game::GameState,
    messages::{ErrorBody, MoveAccepted, MoveRequest},
};
use log::{info, warn};

use super::AppState;

type ApiError = (StatusCode, Json<ErrorBody>);

fn move_error_response(err: &MoveError) -> ApiError {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if matches!(err, MoveError::Contention) {
        StatusCode::CONFLICT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ErrorBody {
            reason: err.reason().to_string(),
            message: err.to_string(),
        }),
    )
}

fn store_error_response(err: &chess_relay::store::StoreError) -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorBody {
            reason: "store_unavailable".to_string(),
            message: err.to_string(),
        }),
    )
}

/// Get the authoritative state of a game.
///
/// Always succeeds with the persisted state, or the canonical initial state
/// for a game that has never been touched.
///
/// # Errors
///
/// - `503 Service Unavailable`: state store unreachable
pub async fn get_state(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    state
        .store
        .load(&game_id)
        .await
        .map(Json)
        .map_err(|e| store_error_response(&e))
}

/// Apply a move to a game.
///
/// Request body: `{ "player": "white", "from_index": 52, "to_index": 36 }`.
///
/// # Response
///
/// Returns `200 OK` with the committed state:
/// ```json
/// { "success": true, "message": "Move accepted.", "state": { ... } }
/// ```
///
/// # Errors
///
/// Failures carry a stable reason code plus a human-readable message:
/// - `400 Bad Request`: `game_over`, `wrong_turn`, `out_of_range`,
///   `illegal_move`
/// - `409 Conflict`: `contention` (safe to resubmit)
/// - `503 Service Unavailable`: `store_unavailable`, `rules_unavailable`
pub async fn apply_move(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveAccepted>, ApiError> {
    match state
        .controller
        .apply_move(&game_id, request.player, request.from_index, request.to_index)
        .await
    {
        Ok(committed) => {
            info!(
                "game {game_id}: {} moved {} -> {} (version {})",
                request.player, request.from_index, request.to_index, committed.version
            );
            Ok(Json(MoveAccepted {
                success: true,
                message: "Move accepted.".to_string(),
                state: committed,
            }))
        }
        Err(err) => {
            warn!(
                "game {game_id}: rejected move by {}: {err}",
                request.player
            );
            Err(move_error_response(&err))
        }
    }
}

/// Reset a game to the canonical initial state.
///
/// Unconditional; viewers are always notified.
///
/// # Errors
///
/// - `503 Service Unavailable`: state store unreachable
pub async fn reset(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    match state.controller.reset(&game_id).await {
        Ok(fresh) => {
            info!("game {game_id}: reset");
            Ok(Json(fresh))
        }
        Err(err) => Err(store_error_response(&err)),
    }
}
