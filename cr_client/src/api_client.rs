//! HTTP API client for the relay server.

use anyhow::{Context, Result};
use chess_relay::{
    game::{Color, GameState},
    messages::{ErrorBody, MoveAccepted, MoveRequest},
};

/// API client for communicating with the relay server.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

/// A move rejection the caller may recover from (for example by prompting
/// for a different move).
#[derive(Debug)]
pub struct MoveRejected {
    pub reason: String,
    pub message: String,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the authoritative state of a game.
    pub async fn get_state(&self, game_id: &str) -> Result<GameState> {
        let response = self
            .client
            .get(format!("{}/api/v1/games/{game_id}", self.base_url))
            .send()
            .await
            .context("Failed to send state request")?;

        if !response.status().is_success() {
            anyhow::bail!("State request failed: {}", response.status());
        }

        response
            .json::<GameState>()
            .await
            .context("Failed to parse game state")
    }

    /// Submit a move. Returns the committed state, or the server's
    /// rejection when the move was refused.
    pub async fn post_move(
        &self,
        game_id: &str,
        player: Color,
        from_index: usize,
        to_index: usize,
    ) -> Result<Result<GameState, MoveRejected>> {
        let request = MoveRequest {
            player,
            from_index,
            to_index,
        };

        let response = self
            .client
            .post(format!("{}/api/v1/games/{game_id}/move", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send move request")?;

        if response.status().is_success() {
            let accepted = response
                .json::<MoveAccepted>()
                .await
                .context("Failed to parse move response")?;
            return Ok(Ok(accepted.state));
        }

        let error = response
            .json::<ErrorBody>()
            .await
            .context("Failed to parse move rejection")?;
        Ok(Err(MoveRejected {
            reason: error.reason,
            message: error.message,
        }))
    }

    /// Reset the game to the canonical initial state.
    pub async fn reset(&self, game_id: &str) -> Result<GameState> {
        let response = self
            .client
            .post(format!("{}/api/v1/games/{game_id}/reset", self.base_url))
            .send()
            .await
            .context("Failed to send reset request")?;

        if !response.status().is_success() {
            anyhow::bail!("Reset failed: {}", response.status());
        }

        response
            .json::<GameState>()
            .await
            .context("Failed to parse reset response")
    }
}
