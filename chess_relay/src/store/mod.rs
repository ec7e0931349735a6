//! Versioned state stores.
//!
//! The store is the only shared mutable resource in the system. All
//! mutation goes through [`StateStore::commit`], a compare-and-swap on the
//! state version; no direct overwrite API exists, which closes the
//! lost-update race between concurrent move attempts.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{DatabaseConfig, PgStateStore};

use async_trait::async_trait;
use thiserror::Error;

use crate::game::GameState;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored version did not match the expected version. Storage was
    /// not mutated; callers re-read and retry.
    #[error("version conflict: expected {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },

    /// The backing store could not be reached. Fatal to the current call.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Holds the single authoritative [`GameState`] per game identifier.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Persisted state, or the canonical initial state when no record
    /// exists. Absence is never an error.
    async fn load(&self, game_id: &str) -> StoreResult<GameState>;

    /// Atomically replace the stored state, but only if the currently
    /// stored version equals `expected_version`. On mismatch returns
    /// [`StoreError::Conflict`] without mutating storage. Returns the
    /// committed state.
    async fn commit(
        &self,
        game_id: &str,
        expected_version: u64,
        new_state: GameState,
    ) -> StoreResult<GameState>;

    /// Unconditionally write the canonical initial state, version back to
    /// its baseline.
    async fn reset(&self, game_id: &str) -> StoreResult<GameState>;
}
