//! Replay files written by a real match and read back from disk.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;

use generals::replay::{ReplayError, ReplayLine, load_replay, render_summary, save_replay, summarize};
use generals::tournament::{GreedyPolicy, IdlePolicy};
use generals::{MatchConfig, MatchResult, run_match};

fn recorded_match(rounds: u32) -> MatchResult {
    let config = MatchConfig {
        max_rounds: rounds,
        ..MatchConfig::default()
    };
    let (mut greedy, mut idle) = (GreedyPolicy, IdlePolicy);
    run_match(11, [&mut greedy, &mut idle], &config).unwrap()
}

#[test]
fn test_saved_replay_loads_identically() {
    let result = recorded_match(30);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.jsonl");

    save_replay(&path, &result.replay).unwrap();
    let loaded = load_replay(&path).unwrap();

    assert_eq!(loaded.len(), result.replay.len());
    assert_eq!(
        serde_json::to_string(&loaded).unwrap(),
        serde_json::to_string(&result.replay).unwrap()
    );
    assert!(matches!(loaded.last(), Some(ReplayLine::End(_))));
}

#[test]
fn test_summary_matches_match_result() {
    let result = recorded_match(30);
    let summary = summarize(&result.replay);

    assert_eq!(summary.winner, Some(result.winner));
    assert_eq!(summary.rounds, result.rounds);
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.board_cells, 15 * 15);
    for seat in 0..2 {
        assert_eq!(summary.cells[seat], result.players[seat].cells, "seat {seat}");
    }
    assert!(render_summary(&summary).contains("Winner"));
}

#[test]
fn test_one_line_per_record() {
    let result = recorded_match(5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.jsonl");
    save_replay(&path, &result.replay).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), result.replay.len());
    assert!(text.lines().all(|l| l.starts_with('{') && l.ends_with('}')));
}

#[test]
fn test_bad_files_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let empty = dir.path().join("empty.jsonl");
    fs::write(&empty, "\n\n").unwrap();
    assert!(matches!(load_replay(&empty), Err(ReplayError::Empty)));

    let broken = dir.path().join("broken.jsonl");
    let first = serde_json::to_string(&recorded_match(1).replay[0]).unwrap();
    fs::write(&broken, format!("{first}\nnot json\n")).unwrap();
    assert!(matches!(
        load_replay(&broken),
        Err(ReplayError::Json { line: 2, .. })
    ));

    let missing = dir.path().join("missing.jsonl");
    assert!(matches!(load_replay(&missing), Err(ReplayError::Io(_))));
}
