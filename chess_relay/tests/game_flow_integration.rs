//! Integration tests for the move-application state machine.
//!
//! Exercises the controller against the in-memory store with both the
//! built-in capture rules and scripted rules stubs, covering turn
//! enforcement, rejection idempotence, termination, contention, and reset.

use std::sync::Arc;

use async_trait::async_trait;
use chess_relay::{
    controller::{GameController, MoveError},
    game::{Board, Color, GameState, GameStatus, Move, Outcome, Square},
    notify::ChangeNotifier,
    rules::{CaptureRules, RulesEngine, RulesError, Terminal},
    store::{MemoryStore, StateStore, StoreError},
};

const E2: usize = 52;
const E4: usize = 36;
const D2: usize = 51;
const D4: usize = 35;

fn capture_controller() -> (GameController, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let controller = GameController::new(store.clone(), Arc::new(CaptureRules), ChangeNotifier::new());
    (controller, store)
}

/// Rules stub that declares every move legal and every resulting board a
/// win for the mover. Lets tests drive termination without board logic.
struct DecisiveRules;

#[async_trait]
impl RulesEngine for DecisiveRules {
    async fn legal_moves(
        &self,
        _board: &Board,
        _actor: Color,
    ) -> Result<Vec<(Square, Square)>, RulesError> {
        let squares: Vec<Square> = (0..64).map(|i| Square::new(i).unwrap()).collect();
        let mut moves = Vec::new();
        for &from in &squares {
            for &to in &squares {
                if from != to {
                    moves.push((from, to));
                }
            }
        }
        Ok(moves)
    }

    async fn apply(&self, board: &Board, _mv: &Move) -> Result<Board, RulesError> {
        Ok(board.clone())
    }

    async fn classify_terminal(&self, _board: &Board) -> Result<Terminal, RulesError> {
        Ok(Terminal::Winner(Color::White))
    }
}

/// Rules stub standing in for an unreachable remote engine.
struct UnreachableRules;

#[async_trait]
impl RulesEngine for UnreachableRules {
    async fn legal_moves(
        &self,
        _board: &Board,
        _actor: Color,
    ) -> Result<Vec<(Square, Square)>, RulesError> {
        Err(RulesError::Unavailable("connection refused".to_string()))
    }

    async fn apply(&self, _board: &Board, _mv: &Move) -> Result<Board, RulesError> {
        Err(RulesError::Unavailable("connection refused".to_string()))
    }

    async fn classify_terminal(&self, _board: &Board) -> Result<Terminal, RulesError> {
        Err(RulesError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_opening_move_switches_turn_and_bumps_version() {
    let (controller, _) = capture_controller();

    let state = controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap();

    assert_eq!(state.turn, Color::Black);
    assert_eq!(state.version, 1);
    assert_eq!(state.status, GameStatus::InProgress);
    assert!(state.board.get(Square::new(E2).unwrap()).is_none());
    assert!(state.board.get(Square::new(E4).unwrap()).is_some());
}

#[tokio::test]
async fn test_duplicate_move_fails_wrong_turn_deterministically() {
    let (controller, _) = capture_controller();
    controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap();

    // e2 is now empty AND the turn has switched; turn is checked first, so
    // the resubmitted move must fail WrongTurn, never IllegalMove.
    let err = controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap_err();
    assert!(matches!(err, MoveError::WrongTurn(Color::White)));
    assert_eq!(err.reason(), "wrong_turn");
}

#[tokio::test]
async fn test_black_cannot_move_from_emptied_square() {
    let (controller, _) = capture_controller();
    controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap();

    let err = controller
        .apply_move("g", Color::Black, E2, E4)
        .await
        .unwrap_err();
    assert!(matches!(err, MoveError::IllegalMove));
}

#[tokio::test]
async fn test_turn_alternates_across_legal_sequence() {
    let (controller, _) = capture_controller();

    // White e2e4, black e7e5, white d2d4.
    let e7 = 12;
    let e5 = 28;
    let plies = [
        (Color::White, E2, E4),
        (Color::Black, e7, e5),
        (Color::White, D2, D4),
    ];

    let mut expected_version = 0;
    for (actor, from, to) in plies {
        let state = controller.apply_move("g", actor, from, to).await.unwrap();
        expected_version += 1;
        assert_eq!(state.version, expected_version);
        assert_eq!(state.turn, actor.opposite());
    }
}

#[tokio::test]
async fn test_rejections_leave_state_untouched() {
    let (controller, store) = capture_controller();
    controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap();
    let before = store.load("g").await.unwrap();

    // Wrong turn.
    assert!(matches!(
        controller.apply_move("g", Color::White, D2, D4).await,
        Err(MoveError::WrongTurn(_))
    ));
    // Out of range.
    assert!(matches!(
        controller.apply_move("g", Color::Black, 64, 0).await,
        Err(MoveError::OutOfRange)
    ));
    // Illegal: black moving onto its own piece.
    assert!(matches!(
        controller.apply_move("g", Color::Black, 0, 1).await,
        Err(MoveError::IllegalMove)
    ));

    let after = store.load("g").await.unwrap();
    assert_eq!(after, before, "rejected calls must not mutate stored state");
}

#[tokio::test]
async fn test_range_is_checked_after_turn() {
    let (controller, _) = capture_controller();

    // Out-of-range squares from the wrong actor: turn check wins.
    let err = controller
        .apply_move("g", Color::Black, 99, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, MoveError::WrongTurn(Color::Black)));

    let err = controller
        .apply_move("g", Color::White, 99, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, MoveError::OutOfRange));
}

#[tokio::test]
async fn test_terminal_move_concludes_and_keeps_turn() {
    let store = Arc::new(MemoryStore::new());
    let controller =
        GameController::new(store.clone(), Arc::new(DecisiveRules), ChangeNotifier::new());

    let state = controller
        .apply_move("g", Color::White, 0, 1)
        .await
        .unwrap();
    assert_eq!(
        state.status,
        GameStatus::Concluded(Outcome::Winner(Color::White))
    );
    // The turn does not switch on a terminal commit.
    assert_eq!(state.turn, Color::White);

    // No further moves accepted, for either side, until reset.
    for actor in [Color::White, Color::Black] {
        let err = controller.apply_move("g", actor, 0, 1).await.unwrap_err();
        assert!(matches!(err, MoveError::GameOver));
    }

    let fresh = controller.reset("g").await.unwrap();
    assert_eq!(fresh, GameState::initial());
    assert!(controller.apply_move("g", Color::White, 0, 1).await.is_ok());
}

#[tokio::test]
async fn test_rules_transport_failure_is_fatal_and_clean() {
    let store = Arc::new(MemoryStore::new());
    let controller = GameController::new(
        store.clone(),
        Arc::new(UnreachableRules),
        ChangeNotifier::new(),
    );

    let err = controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "rules_unavailable");
    assert!(!err.is_validation());
    assert_eq!(store.load("g").await.unwrap(), GameState::initial());
}

#[tokio::test]
async fn test_concurrent_moves_commit_exactly_once() {
    let (controller, store) = capture_controller();
    let controller = Arc::new(controller);

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.apply_move("g", Color::White, E2, E4).await })
    };
    let second = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.apply_move("g", Color::White, D2, D4).await })
    };

    let (first, second) = (first.await.unwrap(), second.await.unwrap());
    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent move may commit");

    // The loser saw either raw contention or a fresh validation outcome
    // against the committed state (it is black's turn now).
    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(
        loser.unwrap_err(),
        MoveError::Contention | MoveError::WrongTurn(_)
    ));

    assert_eq!(store.load("g").await.unwrap().version, 1);
}

#[tokio::test]
async fn test_stale_commit_conflicts_without_mutating() {
    let store = MemoryStore::new();
    let loaded = store.load("g").await.unwrap();

    let mut winner = loaded.clone();
    winner.version = 1;
    winner.turn = Color::Black;
    store.commit("g", loaded.version, winner.clone()).await.unwrap();

    let mut stale = loaded.clone();
    stale.version = 1;
    let err = store.commit("g", loaded.version, stale).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));
    assert_eq!(store.load("g").await.unwrap(), winner);
}

#[tokio::test]
async fn test_commit_publishes_signal_and_rejection_does_not() {
    let (controller, _) = capture_controller();
    let mut signals = controller.notifier().subscribe("g");

    controller
        .apply_move("g", Color::White, E2, E4)
        .await
        .unwrap();
    assert!(signals.try_recv().is_ok());

    let _ = controller.apply_move("g", Color::White, E2, E4).await;
    assert!(signals.try_recv().is_err(), "rejections must not signal");

    controller.reset("g").await.unwrap();
    assert!(signals.try_recv().is_ok(), "resets are always observable");
}

#[tokio::test]
async fn test_games_are_isolated() {
    let (controller, store) = capture_controller();

    controller
        .apply_move("a", Color::White, E2, E4)
        .await
        .unwrap();

    assert_eq!(store.load("b").await.unwrap(), GameState::initial());
    assert_eq!(store.load("a").await.unwrap().version, 1);
}
