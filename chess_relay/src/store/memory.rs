//! In-memory state store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{StateStore, StoreError, StoreResult};
use crate::game::GameState;

/// In-process store backed by a mutexed map.
///
/// The compare-and-swap in [`StateStore::commit`] happens inside a single
/// lock scope, so commits are atomic with respect to each other. This is
/// the default backend and the test backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<String, GameState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, game_id: &str) -> StoreResult<GameState> {
        let games = self.games.lock().await;
        Ok(games.get(game_id).cloned().unwrap_or_default())
    }

    async fn commit(
        &self,
        game_id: &str,
        expected_version: u64,
        new_state: GameState,
    ) -> StoreResult<GameState> {
        let mut games = self.games.lock().await;
        let found = games.get(game_id).map_or(0, |state| state.version);
        if found != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                found,
            });
        }
        games.insert(game_id.to_string(), new_state.clone());
        Ok(new_state)
    }

    async fn reset(&self, game_id: &str) -> StoreResult<GameState> {
        let fresh = GameState::initial();
        let mut games = self.games.lock().await;
        games.insert(game_id.to_string(), fresh.clone());
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Color, GameStatus};

    #[tokio::test]
    async fn test_load_absent_returns_initial() {
        let store = MemoryStore::new();
        let state = store.load("fresh").await.unwrap();
        assert_eq!(state, GameState::initial());
    }

    #[tokio::test]
    async fn test_commit_checks_expected_version() {
        let store = MemoryStore::new();

        let mut first = GameState::initial();
        first.version = 1;
        first.turn = Color::Black;
        store.commit("g", 0, first.clone()).await.unwrap();

        // A second writer holding the stale version loses.
        let mut stale = GameState::initial();
        stale.version = 1;
        let err = store.commit("g", 0, stale).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                expected: 0,
                found: 1
            }
        ));

        // Storage was not mutated by the losing commit.
        assert_eq!(store.load("g").await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_reset_restores_baseline() {
        let store = MemoryStore::new();
        let mut state = GameState::initial();
        state.version = 5;
        state.status = GameStatus::Concluded(crate::game::Outcome::Draw);
        store.commit("g", 0, state).await.unwrap();

        let fresh = store.reset("g").await.unwrap();
        assert_eq!(fresh, GameState::initial());
        assert_eq!(store.load("g").await.unwrap().version, 0);
    }
}
