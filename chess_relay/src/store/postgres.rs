//! PostgreSQL-backed state store.
//!
//! Persists each game as a single serialized document keyed by game
//! identifier, with the version held in its own column so compare-and-swap
//! is one conditional `UPDATE`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{StateStore, StoreError, StoreResult};
use crate::game::GameState;

/// Database connection configuration.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Configuration for `database_url` with pool defaults.
    #[must_use]
    pub fn new(database_url: String) -> Self {
        Self {
            database_url,
            max_connections: 20,
            min_connections: 1,
            connection_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        }
    }
}

/// Store backed by a `game_states` table.
pub struct PgStateStore {
    pool: PgPool,
}

impl PgStateStore {
    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and ensure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect: {e}")))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS game_states (
                game_id  TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                version  BIGINT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn stored_version(&self, game_id: &str) -> StoreResult<u64> {
        let row = sqlx::query("SELECT version FROM game_states WHERE game_id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(row.map_or(0, |r| r.get::<i64, _>("version") as u64))
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn encode(state: &GameState) -> StoreResult<String> {
    serde_json::to_string(state)
        .map_err(|e| StoreError::Unavailable(format!("failed to encode state: {e}")))
}

#[async_trait]
impl StateStore for PgStateStore {
    async fn load(&self, game_id: &str) -> StoreResult<GameState> {
        let row = sqlx::query("SELECT document FROM game_states WHERE game_id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        match row {
            Some(row) => {
                let document: String = row.get("document");
                serde_json::from_str(&document)
                    .map_err(|e| StoreError::Unavailable(format!("corrupt state document: {e}")))
            }
            None => Ok(GameState::initial()),
        }
    }

    async fn commit(
        &self,
        game_id: &str,
        expected_version: u64,
        new_state: GameState,
    ) -> StoreResult<GameState> {
        let document = encode(&new_state)?;

        let updated = sqlx::query(
            "UPDATE game_states SET document = $1, version = $2
             WHERE game_id = $3 AND version = $4",
        )
        .bind(&document)
        .bind(new_state.version as i64)
        .bind(game_id)
        .bind(expected_version as i64)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if updated.rows_affected() == 1 {
            return Ok(new_state);
        }

        // No row matched. At the baseline version the record may simply not
        // exist yet; an insert-if-absent keeps the commit atomic.
        if expected_version == 0 {
            let inserted = sqlx::query(
                "INSERT INTO game_states (game_id, document, version)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (game_id) DO NOTHING",
            )
            .bind(game_id)
            .bind(&document)
            .bind(new_state.version as i64)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

            if inserted.rows_affected() == 1 {
                return Ok(new_state);
            }
        }

        Err(StoreError::Conflict {
            expected: expected_version,
            found: self.stored_version(game_id).await?,
        })
    }

    async fn reset(&self, game_id: &str) -> StoreResult<GameState> {
        let fresh = GameState::initial();
        let document = encode(&fresh)?;

        sqlx::query(
            "INSERT INTO game_states (game_id, document, version)
             VALUES ($1, $2, $3)
             ON CONFLICT (game_id)
             DO UPDATE SET document = EXCLUDED.document, version = EXCLUDED.version",
        )
        .bind(game_id)
        .bind(&document)
        .bind(fresh.version as i64)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(fresh)
    }
}
