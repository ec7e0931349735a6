//! Relay server: HTTP/WebSocket surface over the `chess_relay` core.

pub mod api;
pub mod config;
pub mod logging;
