//! Move application state machine.
//!
//! The controller orchestrates validation, rules delegation, turn
//! switching, termination, and the optimistic commit against the store. It
//! holds no game state of its own: every attempt starts from a fresh load,
//! and contention is resolved by compare-and-swap plus bounded retry rather
//! than a lock held across caller latency.

use std::sync::Arc;

use thiserror::Error;

use crate::game::{Color, GameState, GameStatus, Move, Square};
use crate::notify::ChangeNotifier;
use crate::rules::{RulesEngine, RulesError};
use crate::store::{StateStore, StoreError};

/// Bound on optimistic-commit retries. Contention is expected to be rare
/// (a single actor per turn), so a small bound suffices.
pub const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Why a move was not applied.
///
/// The first four variants are validation errors: caller mistakes that
/// leave stored state untouched and are surfaced verbatim. `Contention` is
/// transient and safe to resubmit. Store and rules failures are transport
/// errors, fatal to the current call and not retried here.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("game is over; reset to start a new game")]
    GameOver,

    #[error("it is not {0}'s turn")]
    WrongTurn(Color),

    #[error("square index out of range; must be between 0 and 63")]
    OutOfRange,

    #[error("move is not legal for the current board")]
    IllegalMove,

    #[error("commit contention after {MAX_COMMIT_ATTEMPTS} attempts; resubmit the move")]
    Contention,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl MoveError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::GameOver => "game_over",
            Self::WrongTurn(_) => "wrong_turn",
            Self::OutOfRange => "out_of_range",
            Self::IllegalMove => "illegal_move",
            Self::Contention => "contention",
            Self::Store(_) => "store_unavailable",
            Self::Rules(_) => "rules_unavailable",
        }
    }

    /// Whether this is a caller error rather than a transient or transport
    /// failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::GameOver | Self::WrongTurn(_) | Self::OutOfRange | Self::IllegalMove
        )
    }
}

/// Orchestrates move application against injected collaborators.
///
/// Construct once with explicit handles and share via `Arc`; there is no
/// ambient global store or notifier.
pub struct GameController {
    store: Arc<dyn StateStore>,
    rules: Arc<dyn RulesEngine>,
    notifier: ChangeNotifier,
}

impl GameController {
    #[must_use]
    pub fn new(
        store: Arc<dyn StateStore>,
        rules: Arc<dyn RulesEngine>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            store,
            rules,
            notifier,
        }
    }

    /// The store handle, for read-only snapshot pulls.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// The shared notifier, for subscribing viewers.
    #[must_use]
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Validate and apply a move, committing the successor state.
    ///
    /// Checks run in a fixed order so rejections are deterministic: game
    /// over, then turn, then square range, then legality. A stale duplicate
    /// of an already-applied move therefore always fails with `WrongTurn`.
    /// On commit conflict the whole pipeline re-runs from a fresh load, up
    /// to [`MAX_COMMIT_ATTEMPTS`] times; each retry revalidates against the
    /// updated state. A rejected call never mutates stored state.
    pub async fn apply_move(
        &self,
        game_id: &str,
        actor: Color,
        from_index: usize,
        to_index: usize,
    ) -> Result<GameState, MoveError> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let state = self.store.load(game_id).await?;

            if state.status.is_concluded() {
                return Err(MoveError::GameOver);
            }
            if actor != state.turn {
                return Err(MoveError::WrongTurn(actor));
            }
            let (from, to) = match (Square::new(from_index), Square::new(to_index)) {
                (Some(from), Some(to)) => (from, to),
                _ => return Err(MoveError::OutOfRange),
            };

            let legal = self.rules.legal_moves(&state.board, actor).await?;
            if !legal.contains(&(from, to)) {
                return Err(MoveError::IllegalMove);
            }

            let mv = Move { from, to, actor };
            let board = self.rules.apply(&state.board, &mv).await?;
            let terminal = self.rules.classify_terminal(&board).await?;

            let candidate = GameState {
                status: match terminal.outcome() {
                    Some(outcome) => GameStatus::Concluded(outcome),
                    None => GameStatus::InProgress,
                },
                // The turn only switches while the game continues; a
                // terminal state keeps the mover on record.
                turn: if terminal.is_terminal() {
                    state.turn
                } else {
                    state.turn.opposite()
                },
                board,
                version: state.version + 1,
            };

            match self.store.commit(game_id, state.version, candidate).await {
                Ok(committed) => {
                    let delivered = self.notifier.publish(game_id);
                    log::debug!(
                        "game {game_id}: committed {mv} at version {}, notified {delivered} viewer(s)",
                        committed.version
                    );
                    return Ok(committed);
                }
                Err(StoreError::Conflict { expected, found }) => {
                    log::debug!(
                        "game {game_id}: commit attempt {attempt} conflicted \
                         (expected {expected}, found {found}); re-reading"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(MoveError::Contention)
    }

    /// Replace the game with the canonical initial state. Resets are always
    /// observable: the notifier fires unconditionally.
    pub async fn reset(&self, game_id: &str) -> Result<GameState, StoreError> {
        let fresh = self.store.reset(game_id).await?;
        let delivered = self.notifier.publish(game_id);
        log::info!("game {game_id}: reset, notified {delivered} viewer(s)");
        Ok(fresh)
    }
}
