//! Property tests for the board contract and the turn-alternation
//! invariant under random legal play.

use std::sync::Arc;

use chess_relay::{
    controller::GameController,
    game::{GameStatus, Square},
    notify::ChangeNotifier,
    rules::{CaptureRules, RulesEngine},
    store::{MemoryStore, StateStore},
};
use proptest::prelude::*;

proptest! {
    /// Every valid index survives the algebraic round trip.
    #[test]
    fn prop_square_algebraic_roundtrip(index in 0..64usize) {
        let square = Square::new(index).unwrap();
        let parsed: Square = square.to_string().parse().unwrap();
        prop_assert_eq!(parsed.index(), index);
    }

    /// Indices outside the board are always rejected.
    #[test]
    fn prop_out_of_range_index_rejected(index in 64..1024usize) {
        prop_assert!(Square::new(index).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Under any sequence of random legal moves, the turn alternates
    /// strictly and the version increments by one per commit, until the
    /// game concludes and every further move is rejected.
    #[test]
    fn prop_turn_alternates_under_random_play(seeds in proptest::collection::vec(any::<u32>(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let store = Arc::new(MemoryStore::new());
            let controller = GameController::new(
                store.clone(),
                Arc::new(CaptureRules),
                ChangeNotifier::new(),
            );

            for seed in seeds {
                let state = store.load("g").await.unwrap();
                if state.status.is_concluded() {
                    // Terminal: any move from either side must be rejected.
                    let err = controller
                        .apply_move("g", state.turn, 0, 1)
                        .await
                        .unwrap_err();
                    assert_eq!(err.reason(), "game_over");
                    break;
                }

                let legal = CaptureRules
                    .legal_moves(&state.board, state.turn)
                    .await
                    .unwrap();
                let (from, to) = legal[seed as usize % legal.len()];

                let committed = controller
                    .apply_move("g", state.turn, from.index(), to.index())
                    .await
                    .unwrap();

                assert_eq!(committed.version, state.version + 1);
                if committed.status == GameStatus::InProgress {
                    assert_eq!(committed.turn, state.turn.opposite());
                }

                // The opposite color is always out of turn while the game
                // continues.
                if committed.status == GameStatus::InProgress {
                    let err = controller
                        .apply_move("g", committed.turn.opposite(), 0, 1)
                        .await
                        .unwrap_err();
                    assert_eq!(err.reason(), "wrong_turn");
                }
            }
        });
    }
}
