//! Property-based tests for command handling.
//!
//! Arbitrary command vectors must either apply cleanly or leave the state
//! untouched, and no sequence of commands and round ticks may break the
//! board invariants.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use generals::game::invariants::check_invariants;
use generals::game::{Clash, END_TURN, clash, end_round};
use generals::tournament::generate_match;
use generals::{GameState, MatchConfig, execute_command};

fn match_state(seed: u64) -> GameState {
    let mut state = generate_match(seed, &MatchConfig::default()).unwrap();
    state.coins = [400, 400];
    state
}

/// Command code plus a short parameter list biased toward legal ranges.
fn command() -> impl Strategy<Value = (i64, Vec<i64>)> {
    (1i64..=END_TURN, prop::collection::vec(-2i64..16, 0..6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A rejected command leaves board, Generals, coins and replay unchanged.
    #[test]
    fn prop_rejection_has_no_side_effects(
        seed in any::<u64>(),
        player in 0u8..2,
        (code, params) in command(),
    ) {
        let mut state = match_state(seed);
        let board = state.board.clone();
        let generals = state.generals().to_vec();
        let coins = state.coins;
        let replay_len = state.replay.len();

        if execute_command(&mut state, player, code, &params).is_err() {
            prop_assert_eq!(&state.board, &board);
            prop_assert_eq!(state.generals(), generals.as_slice());
            prop_assert_eq!(state.coins, coins);
            prop_assert_eq!(state.replay.len(), replay_len);
        }
    }

    /// Interleaved commands and ticks never break the invariants.
    #[test]
    fn prop_invariants_hold(
        seed in any::<u64>(),
        turns in prop::collection::vec(prop::collection::vec(command(), 0..8), 1..12),
    ) {
        let mut state = match_state(seed);
        for (i, commands) in turns.iter().enumerate() {
            let player = u8::try_from(i % 2).unwrap();
            for (code, params) in commands {
                let _ = execute_command(&mut state, player, *code, params);
                let violations = check_invariants(&state);
                prop_assert!(violations.is_empty(), "{:?}", violations);
            }
            if player == 1 {
                end_round(&mut state);
                let violations = check_invariants(&state);
                prop_assert!(violations.is_empty(), "{:?}", violations);
            }
        }
    }

    /// Survivors never outnumber the side they came from.
    #[test]
    fn prop_clash_survivors_bounded(
        attackers in 1u32..10_000,
        defenders in 0u32..10_000,
        halves in 2u32..7,
    ) {
        let attack = f64::from(halves) / 2.0;
        match clash(attackers, attack, defenders, 1.0) {
            Clash::Captured(left) => prop_assert!((1..=attackers).contains(&left)),
            Clash::Repelled(left) => prop_assert!((1..=defenders).contains(&left)),
            Clash::Stalemate => {}
        }
    }
}
