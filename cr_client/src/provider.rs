//! Move providers.
//!
//! A provider supplies `(from, to)` candidate moves for the local player.
//! Provider latency (waiting on a human, or a remote suggestion service)
//! sits entirely outside the server's move pipeline, so it never holds any
//! store-level exclusivity.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chess_relay::{game::Square, messages::Snapshot};
use serde::{Deserialize, Serialize};

/// Source of candidate moves for the local player.
#[async_trait]
pub trait MoveProvider: Send {
    /// Produce the next `(from_index, to_index)` candidate for the given
    /// snapshot. May block indefinitely (for example on user input).
    async fn next_move(&mut self, snapshot: &Snapshot) -> Result<(usize, usize)>;
}

/// Prompts the local user on stdin. Accepts algebraic notation ("e2") or a
/// raw index ("52").
pub struct InteractiveProvider;

impl InteractiveProvider {
    async fn prompt_square(label: &str) -> Result<Square> {
        loop {
            let label = label.to_string();
            let line = tokio::task::spawn_blocking(move || {
                use std::io::Write;
                print!("{label}: ");
                std::io::stdout().flush().ok();
                let mut input = String::new();
                std::io::stdin()
                    .read_line(&mut input)
                    .map(|_| input)
            })
            .await
            .context("stdin task failed")?
            .context("failed to read stdin")?;

            match line.trim().parse::<Square>() {
                Ok(square) => return Ok(square),
                Err(e) => println!("{e}"),
            }
        }
    }
}

#[async_trait]
impl MoveProvider for InteractiveProvider {
    async fn next_move(&mut self, _snapshot: &Snapshot) -> Result<(usize, usize)> {
        let from = Self::prompt_square("Your turn! Move FROM (e.g. e2 or 52)").await?;
        let to = Self::prompt_square("Move TO (e.g. e4 or 36)").await?;
        Ok((from.index(), to.index()))
    }
}

#[derive(Serialize)]
struct SuggestionRequest<'a> {
    board: &'a chess_relay::game::Board,
    player_turn: chess_relay::game::Color,
}

#[derive(Deserialize)]
struct SuggestionResponse {
    from_index: usize,
    to_index: usize,
}

/// Queries a remote move-suggestion service.
///
/// The endpoint and API key are sourced from `SUGGESTION_URL` and
/// `SUGGESTION_API_KEY`; the key is never embedded in source.
pub struct SuggestionProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl SuggestionProvider {
    /// Build from environment variables.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUGGESTION_URL")
            .context("SUGGESTION_URL must be set for the suggestion provider")?;
        let api_key = std::env::var("SUGGESTION_API_KEY")
            .context("SUGGESTION_API_KEY must be set for the suggestion provider")?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        })
    }
}

#[async_trait]
impl MoveProvider for SuggestionProvider {
    async fn next_move(&mut self, snapshot: &Snapshot) -> Result<(usize, usize)> {
        let request = SuggestionRequest {
            board: &snapshot.board,
            player_turn: snapshot.turn,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach suggestion service")?;

        if !response.status().is_success() {
            anyhow::bail!("Suggestion service returned {}", response.status());
        }

        let suggestion: SuggestionResponse = response
            .json()
            .await
            .context("Failed to parse suggestion")?;
        Ok((suggestion.from_index, suggestion.to_index))
    }
}
