//! Board-game state relay server.
//!
//! Serves the authoritative game state over HTTP and fans out full-state
//! snapshots to passive viewers over WebSocket.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use chess_relay::{
    controller::GameController,
    notify::ChangeNotifier,
    rules::CaptureRules,
    store::{MemoryStore, PgStateStore, StateStore},
};
use cr_server::{
    api::{self, AppState},
    config::{ServerConfig, StoreBackend},
    logging,
};
use pico_args::Arguments;

const HELP: &str = "\
Run a board-game state relay server

USAGE:
  cr_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --store      BACKEND     State store: memory|postgres  [default: env STORE_BACKEND or memory]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  STORE_BACKEND            'memory' or 'postgres'
  DATABASE_URL             PostgreSQL connection string (postgres backend)
  RUST_LOG                 Log filter (e.g., info, debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let store_override: Option<String> = pargs.opt_value_from_str("--store")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, store_override)?;
    config.validate()?;

    let store: Arc<dyn StateStore> = match &config.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory state store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres(database) => {
            tracing::info!("Connecting to state store database");
            let store = PgStateStore::connect(database)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
            tracing::info!("Database connected successfully");
            Arc::new(store)
        }
    };

    let notifier = ChangeNotifier::new();
    let controller = Arc::new(GameController::new(
        store.clone(),
        Arc::new(CaptureRules),
        notifier.clone(),
    ));

    let app = api::create_router(AppState {
        controller,
        store,
        notifier,
    });

    tracing::info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
