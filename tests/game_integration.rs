//! End-to-end tests for command dispatch and full matches.
//!
//! These drive the engine through raw command vectors, the same surface bots
//! and replay producers see, and check that whole matches stay deterministic.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use generals::game::invariants::check_invariants;
use generals::game::{Buff, END_TURN, end_round, evaluate};
use generals::tournament::{DecidedBy, GreedyPolicy, IdlePolicy, RandomPolicy, generate_match};
use generals::{
    ActionError, Board, Coord, GameState, GeneralKind, MatchConfig, PlayerId, execute_command,
    run_match,
};

fn state() -> GameState {
    GameState::new(Board::new(15, 15).unwrap())
}

fn own(s: &mut GameState, coord: Coord, player: PlayerId, army: u32) {
    let cell = s.board.get_mut(coord).unwrap();
    cell.owner = Some(player);
    cell.army = army;
}

fn army_at(s: &GameState, row: u16, col: u16) -> (Option<PlayerId>, u32) {
    let cell = s.board.get(Coord::new(row, col)).unwrap();
    (cell.owner, cell.army)
}

#[test]
fn test_buffed_capture_through_dispatcher() {
    let mut s = state();
    own(&mut s, Coord::new(5, 5), 0, 5);
    let id = s.add_general(GeneralKind::Sub, Some(0), Coord::new(5, 5)).unwrap();
    s.general_mut(id).unwrap().durations[Buff::Command.slot()] = 10;
    own(&mut s, Coord::new(5, 6), 1, 1);

    execute_command(&mut s, 0, 1, &[5, 5, 4, 5]).unwrap();

    assert_eq!(army_at(&s, 5, 6), (Some(0), 4));
    assert_eq!(army_at(&s, 5, 5), (Some(0), 1));
}

#[test]
fn test_oversized_move_is_clamped() {
    let mut s = state();
    own(&mut s, Coord::new(3, 3), 0, 10);
    execute_command(&mut s, 0, 1, &[3, 3, 2, 50]).unwrap();
    assert_eq!(army_at(&s, 4, 3), (Some(0), 9));
    assert_eq!(army_at(&s, 3, 3), (Some(0), 1));
}

#[test]
fn test_rejected_vectors_change_nothing() {
    let mut s = state();
    own(&mut s, Coord::new(3, 3), 0, 10);
    let sub = s.add_general(GeneralKind::Sub, Some(0), Coord::new(3, 3)).unwrap();
    own(&mut s, Coord::new(9, 9), 1, 10);
    s.coins = [10, 10];
    let board = s.board.clone();
    let generals = s.generals().to_vec();

    let cases: [(i64, Vec<i64>); 8] = [
        (1, vec![9, 9, 1, 3]),
        (1, vec![3, 3, 7, 3]),
        (2, vec![99, 4, 4]),
        (3, vec![i64::from(sub), 1]),
        (4, vec![i64::from(sub), 1, 3, 9]),
        (5, vec![4]),
        (6, vec![4, 1, 1]),
        (7, vec![3, 3]),
    ];
    for (code, params) in cases {
        assert!(
            execute_command(&mut s, 0, code, &params).is_err(),
            "command {code} {params:?} should be rejected"
        );
    }
    assert_eq!(
        execute_command(&mut s, 0, 42, &[]),
        Err(ActionError::UnknownCommand(42))
    );

    assert_eq!(s.board, board);
    assert_eq!(s.generals(), generals.as_slice());
    assert_eq!(s.coins, [10, 10]);
    assert!(s.replay.is_empty());
}

#[test]
fn test_capturing_main_ends_match() {
    let mut s = GameState::new(Board::new(5, 5).unwrap());
    own(&mut s, Coord::new(0, 0), 0, 1);
    s.add_general(GeneralKind::Main, Some(0), Coord::new(0, 0)).unwrap();
    own(&mut s, Coord::new(2, 2), 1, 1);
    let main = s.add_general(GeneralKind::Main, Some(1), Coord::new(2, 2)).unwrap();
    own(&mut s, Coord::new(2, 1), 0, 10);
    assert_eq!(evaluate(&s), None);

    execute_command(&mut s, 0, 1, &[2, 1, 4, 9]).unwrap();

    assert_eq!(army_at(&s, 2, 2), (Some(0), 8));
    assert_eq!(s.general(main).unwrap().owner, Some(0));
    assert_eq!(evaluate(&s), Some(0));
}

#[test]
fn test_super_weapon_unlock_cooldown_and_stun() {
    let mut s = state();
    s.coins = [1000, 0];
    own(&mut s, Coord::new(4, 4), 1, 6);

    execute_command(&mut s, 0, 5, &[4]).unwrap();
    assert_eq!(s.weapon_cooldowns[0], Some(10));
    assert_eq!(
        execute_command(&mut s, 0, 6, &[4, 4, 4]),
        Err(ActionError::WeaponCoolingDown)
    );

    for _ in 0..10 {
        end_round(&mut s);
    }
    assert_eq!(s.weapon_cooldowns[0], Some(0));

    execute_command(&mut s, 0, 6, &[4, 4, 4]).unwrap();
    assert_eq!(s.weapon_cooldowns[0], Some(50));
    assert_eq!(
        execute_command(&mut s, 1, 1, &[4, 4, 1, 2]),
        Err(ActionError::Stunned)
    );
}

#[test]
fn test_call_general_then_level_mobility() {
    let mut s = state();
    s.coins = [200, 0];
    own(&mut s, Coord::new(6, 6), 0, 3);
    let id = s.next_general_id();

    execute_command(&mut s, 0, 7, &[6, 6]).unwrap();
    let general = s.general(id).unwrap();
    assert_eq!((general.kind, general.owner), (GeneralKind::Sub, Some(0)));
    assert_eq!(s.coins[0], 150);

    execute_command(&mut s, 0, 3, &[i64::from(id), 3]).unwrap();
    let general = s.general(id).unwrap();
    assert_eq!((general.mobility, general.rest_move), (2, 2));
    assert_eq!(s.coins[0], 130);
    assert!(check_invariants(&s).is_empty());
}

#[test]
fn test_end_turn_is_accepted_noop() {
    let mut s = state();
    let board = s.board.clone();
    execute_command(&mut s, 0, END_TURN, &[]).unwrap();
    assert_eq!(s.board, board);
}

#[test]
fn test_generated_map_is_consistent() {
    let config = MatchConfig::default();
    for seed in 0..20 {
        let s = generate_match(seed, &config).unwrap();
        assert!(check_invariants(&s).is_empty(), "seed {seed}");
        assert!(s.has_main(0) && s.has_main(1), "seed {seed}");
    }
}

#[test]
fn test_greedy_match_is_deterministic() {
    let config = MatchConfig {
        max_rounds: 120,
        ..MatchConfig::default()
    };
    let play = |seed| {
        let (mut a, mut b) = (GreedyPolicy, GreedyPolicy);
        run_match(seed, [&mut a, &mut b], &config).unwrap()
    };

    let first = play(7);
    let second = play(7);
    assert_eq!(first.winner, second.winner);
    assert_eq!(first.rounds, second.rounds);
    assert_eq!(first.players, second.players);
    assert_eq!(
        serde_json::to_string(&first.replay).unwrap(),
        serde_json::to_string(&second.replay).unwrap()
    );
}

#[test]
fn test_random_bots_never_break_invariants() {
    let config = MatchConfig {
        max_rounds: 80,
        ..MatchConfig::default()
    };
    for seed in 0..5 {
        let mut a = RandomPolicy::new(seed);
        let mut b = RandomPolicy::new(seed ^ 0xff);
        let result = run_match(seed, [&mut a, &mut b], &config).unwrap();
        assert!(result.rounds <= config.max_rounds + 1);
        assert!(result.winner < 2);
    }
}

#[test]
fn test_greedy_outgrows_idle() {
    let config = MatchConfig {
        max_rounds: 60,
        ..MatchConfig::default()
    };
    let mut greedy = GreedyPolicy;
    let mut idle = IdlePolicy;
    let result = run_match(3, [&mut greedy, &mut idle], &config).unwrap();
    assert_eq!(result.decided_by, DecidedBy::Tiebreak);
    assert!(result.players[0].cells > result.players[1].cells);
    assert_eq!(result.players[1].rejected, 0);
}
