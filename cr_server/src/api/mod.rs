//! HTTP/WebSocket API for the relay server.
//!
//! # Architecture
//!
//! - **Axum**: Async web framework for HTTP/WebSocket
//! - **Tower**: CORS middleware
//! - **Controller**: All mutation goes through the move-application state
//!   machine; handlers never touch the store directly except for reads
//!
//! # Endpoints Overview
//!
//! - `GET  /health` - Server health status
//! - `GET  /api/v1/games/{game_id}` - Current authoritative state
//! - `POST /api/v1/games/{game_id}/move` - Apply a move
//! - `POST /api/v1/games/{game_id}/reset` - Reset to the initial state
//! - `GET  /ws/{game_id}` - Live snapshot stream for viewers

pub mod games;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chess_relay::{controller::GameController, notify::ChangeNotifier, store::StateStore};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket
/// connections. Cloned per request; cheap due to the Arc wrappers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<GameController>,
    pub store: Arc<dyn StateStore>,
    pub notifier: ChangeNotifier,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/games/{game_id}", get(games::get_state))
        .route("/games/{game_id}/move", post(games::apply_move))
        .route("/games/{game_id}/reset", post(games::reset));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws/{game_id}", get(websocket::websocket_handler))
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Probes the store with a read; returns `503 Service Unavailable` when the
/// backend cannot be reached.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store.load("__health__").await.is_ok();

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
