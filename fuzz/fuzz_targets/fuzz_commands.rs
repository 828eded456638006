#![no_main]

//! Command dispatcher fuzzer.
//!
//! Feeds arbitrary command vectors for both seats into a generated match,
//! interleaved with round ticks, and checks that:
//! 1. Rejected commands leave the state untouched
//! 2. Board and General invariants hold after every step

use arbitrary::Arbitrary;
use generals::game::invariants::check_invariants;
use generals::game::end_round;
use generals::tournament::generate_match;
use generals::{MatchConfig, execute_command};
use libfuzzer_sys::fuzz_target;

/// One fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone)]
struct FuzzCommand {
    /// Command code, mostly 1..=8.
    code: u8,
    /// Raw parameters, wrapped into the board range below.
    params: Vec<i8>,
}

/// Structured input for a short match.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    /// Map seed.
    seed: u64,
    /// Starting coin for both seats.
    coins: u16,
    /// Command lists, alternating seats.
    turns: Vec<Vec<FuzzCommand>>,
}

fuzz_target!(|input: MatchInput| {
    let config = MatchConfig {
        record_replay: false,
        ..MatchConfig::default()
    };
    let Ok(mut state) = generate_match(input.seed, &config) else {
        return;
    };
    state.coins = [u32::from(input.coins); 2];

    for (turn, commands) in input.turns.iter().take(40).enumerate() {
        let player = u8::from(turn % 2 == 1);
        for cmd in commands.iter().take(16) {
            let code = i64::from(cmd.code % 10);
            let params: Vec<i64> = cmd.params.iter().take(6).map(|&p| i64::from(p) % 17).collect();

            let board = state.board.clone();
            let generals = state.generals().to_vec();
            let coins = state.coins;
            if execute_command(&mut state, player, code, &params).is_err() {
                assert_eq!(state.board, board, "rejected {code} {params:?} changed the board");
                assert_eq!(state.generals(), generals.as_slice());
                assert_eq!(state.coins, coins);
            }

            let violations = check_invariants(&state);
            assert!(violations.is_empty(), "after {code} {params:?}: {violations:?}");
        }
        if player == 1 {
            end_round(&mut state);
            let violations = check_invariants(&state);
            assert!(violations.is_empty(), "after tick: {violations:?}");
        }
    }
});
