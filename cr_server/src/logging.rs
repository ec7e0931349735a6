//! Structured logging configuration.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset: server at info, noisy
/// dependencies capped at warn.
fn default_filter() -> EnvFilter {
    EnvFilter::new("info,sqlx=warn,hyper=warn")
}

/// Initialize structured logging.
///
/// Log levels are configurable via the `RUST_LOG` env var; library `log`
/// records are picked up through the tracing bridge.
///
/// # Example
///
/// ```no_run
/// use cr_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}
