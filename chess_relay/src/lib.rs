//! # Chess Relay
//!
//! A server-authoritative, turn-based board-game state engine with real-time
//! synchronization to passive viewers.
//!
//! The library separates "is this move legal" from "is this move allowed
//! right now": legality and terminal classification are delegated to a
//! pluggable [`rules::RulesEngine`], while turn enforcement, optimistic
//! commit, and change fan-out live in the core.
//!
//! ## Core Modules
//!
//! - [`game`]: Board representation, squares, colors, and game state
//! - [`rules`]: The rules-engine capability boundary
//! - [`store`]: Versioned state stores with compare-and-swap commit
//! - [`controller`]: Move application state machine
//! - [`notify`]: Per-game change-signal fan-out
//! - [`messages`]: Wire types shared by server and clients
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chess_relay::{
//!     controller::GameController,
//!     game::Color,
//!     notify::ChangeNotifier,
//!     rules::CaptureRules,
//!     store::MemoryStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = GameController::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(CaptureRules),
//!     ChangeNotifier::new(),
//! );
//!
//! // e2 -> e4 in row-major indices
//! let state = controller.apply_move("lobby", Color::White, 52, 36).await?;
//! assert_eq!(state.version, 1);
//! # Ok(())
//! # }
//! ```

/// Board representation and game state.
pub mod game;
pub use game::{Board, Color, GameState, GameStatus, Move, Outcome, Piece, PieceKind, Square};

/// Rules-engine capability boundary.
pub mod rules;
pub use rules::{CaptureRules, RulesEngine, RulesError, Terminal};

/// Versioned state stores.
pub mod store;
pub use store::{MemoryStore, StateStore, StoreError};

/// Move application state machine.
pub mod controller;
pub use controller::{GameController, MoveError};

/// Change-signal fan-out.
pub mod notify;
pub use notify::{ChangeNotifier, Signal};

/// Wire types shared by server and clients.
pub mod messages;
pub use messages::Snapshot;
