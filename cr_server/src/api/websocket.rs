//! WebSocket gateway for live viewer connections.
//!
//! Viewers are passive: the server pushes a full `{ board, turn, status }`
//! snapshot once on subscribe and once per change signal, and re-pulls
//! canonical state from the store for every push. The gateway holds no copy
//! of game truth between pulls, so its freshness window is bounded only by
//! notification latency.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{game_id}`
//! 2. Server subscribes to the game's change signals, then pushes the
//!    current snapshot
//! 3. Each signal triggers one pull and one push; bursts of signals may
//!    coalesce into a single pull (last state wins)
//! 4. Each connection runs in its own task; a slow or dead viewer never
//!    blocks delivery to others
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8000/ws/lobby');
//! ws.onmessage = (event) => renderBoard(JSON.parse(event.data));
//! ```

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use chess_relay::messages::Snapshot;
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use log::{debug, error, info, warn};
use tokio::sync::broadcast;

use super::AppState;

/// Upgrade an HTTP connection to a viewer WebSocket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, game_id, state))
}

/// Handle an established viewer connection until it closes.
async fn handle_socket(socket: WebSocket, game_id: String, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the initial pull so a commit landing in between
    // still triggers a refresh rather than being missed.
    let mut signals = state.notifier.subscribe(&game_id);

    info!("viewer connected: game={game_id}");

    if push_snapshot(&mut sender, &state, &game_id).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            signal = signals.recv() => {
                match signal {
                    // A lagged receiver missed coalesced signals; one pull
                    // of current truth covers them all.
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if push_snapshot(&mut sender, &state, &game_id).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("viewer socket error: game={game_id}: {e}");
                        break;
                    }
                    // Viewers are read-only; any other inbound frame is
                    // ignored.
                    Some(Ok(other)) => {
                        debug!("ignoring inbound frame from viewer: {other:?}");
                    }
                }
            }
        }
    }

    info!("viewer disconnected: game={game_id}");
}

/// Pull canonical state and push a full snapshot to this viewer.
///
/// Errors only end this viewer's connection; commits are never rolled back
/// on notification failure.
async fn push_snapshot(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
    game_id: &str,
) -> Result<(), ()> {
    let game = match state.store.load(game_id).await {
        Ok(game) => game,
        Err(e) => {
            error!("failed to pull state for viewer: game={game_id}: {e}");
            return Err(());
        }
    };

    let snapshot = Snapshot::from(game);
    let json = match serde_json::to_string(&snapshot) {
        Ok(json) => json,
        Err(e) => {
            error!("failed to serialize snapshot: game={game_id}: {e}");
            return Err(());
        }
    };

    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}
