//! Plain-text summary of a recorded match.
//!
//! Ownership is rebuilt from the cell deltas, starting with the initial
//! record's full board listing.

#![allow(clippy::format_push_string)]

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::game::{Coord, NUM_PLAYERS, Terrain};
use crate::replay::{END_ACTION, ReplayLine, ReplayRecord, TICK_ACTION};

/// Aggregates rebuilt from a replay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Board size from the terrain string, if an initial record was present.
    pub board_cells: usize,
    /// Bog cells in the initial terrain.
    pub bogs: usize,
    /// Mountain cells in the initial terrain.
    pub mountains: usize,
    /// Last round seen.
    pub rounds: u32,
    /// Winner from the end record.
    pub winner: Option<u8>,
    /// Cells owned at the end, per player.
    pub cells: [u32; NUM_PLAYERS],
    /// Army on owned cells at the end, per player.
    pub army: [u64; NUM_PLAYERS],
    /// Coins in the last record.
    pub coins: [u32; NUM_PLAYERS],
    /// Living Generals per player in the last record.
    pub generals: [u32; NUM_PLAYERS],
    /// Accepted commands per player, keyed by command code.
    pub actions: [BTreeMap<i64, u32>; NUM_PLAYERS],
    /// Round-tick records seen.
    pub ticks: u32,
}

/// Rebuild end-of-match aggregates from replay lines.
#[must_use]
pub fn summarize(lines: &[ReplayLine]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let mut board: BTreeMap<Coord, (i8, u32)> = BTreeMap::new();
    let mut last: Option<&ReplayRecord> = None;

    for line in lines {
        summary.rounds = summary.rounds.max(line.round());
        match line {
            ReplayLine::Record(record) => {
                if let Some(terrain) = record.terrain() {
                    summary.board_cells = terrain.len();
                    summary.bogs = terrain.iter().filter(|&&t| t == Terrain::Bog).count();
                    summary.mountains = terrain.iter().filter(|&&t| t == Terrain::Mountain).count();
                }
                for delta in &record.cells {
                    board.insert(delta.coord(), (delta.1, delta.2));
                }
                match (record.player, record.action.first()) {
                    (-1, Some(&TICK_ACTION)) if record.round > 0 => summary.ticks += 1,
                    (p @ 0..=1, Some(&code)) => {
                        let seat = usize::try_from(p).unwrap_or_default();
                        *summary.actions[seat].entry(code).or_insert(0) += 1;
                    }
                    _ => {}
                }
                last = Some(record);
            }
            ReplayLine::End(end) => {
                if end.action.first() == Some(&END_ACTION) {
                    summary.winner = u8::try_from(end.player).ok();
                }
            }
        }
    }

    for &(owner, army) in board.values() {
        if let Ok(seat) = usize::try_from(owner) {
            if seat < NUM_PLAYERS {
                summary.cells[seat] += 1;
                summary.army[seat] += u64::from(army);
            }
        }
    }

    if let Some(record) = last {
        summary.coins = record.coins;
        for g in record.generals.iter().filter(|g| g.alive == 1) {
            if let Ok(seat) = usize::try_from(g.player) {
                if seat < NUM_PLAYERS {
                    summary.generals[seat] += 1;
                }
            }
        }
    }

    summary
}

fn action_name(code: i64) -> &'static str {
    match code {
        1 => "army moves",
        2 => "general moves",
        3 => "level ups",
        4 => "skills",
        5 => "tech",
        6 => "super-weapons",
        7 => "generals called",
        _ => "other",
    }
}

/// Render a summary as text.
#[must_use]
pub fn render_summary(summary: &ReplaySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== REPLAY SUMMARY ===");
    if summary.board_cells > 0 {
        let _ = writeln!(
            out,
            "Board cells: {} ({} bog, {} mountain)",
            summary.board_cells, summary.bogs, summary.mountains
        );
    }
    let _ = writeln!(out, "Rounds: {} ({} ticks)", summary.rounds, summary.ticks);
    match summary.winner {
        Some(w) => out.push_str(&format!("Winner: Player {w}\n")),
        None => out.push_str("Winner: undecided\n"),
    }
    out.push('\n');

    for seat in 0..NUM_PLAYERS {
        let _ = writeln!(out, "PLAYER {seat}:");
        let _ = writeln!(
            out,
            "- Cells: {}  Army: {}  Coins: {}  Generals: {}",
            summary.cells[seat], summary.army[seat], summary.coins[seat], summary.generals[seat]
        );
        if summary.actions[seat].is_empty() {
            out.push_str("- No accepted actions\n");
        }
        for (code, count) in &summary.actions[seat] {
            let _ = writeln!(out, "- {}: {count}", action_name(*code));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{CellDelta, EndRecord};

    fn record(round: u32, player: i8, action: Vec<i64>, cells: Vec<CellDelta>) -> ReplayLine {
        ReplayLine::Record(ReplayRecord {
            round,
            player,
            action,
            cells,
            generals: Vec::new(),
            weapons: Vec::new(),
            weapon_cds: [-1, -1],
            tech_level: [[1, 0, 0, 0]; 2],
            coins: [40, 41],
            cell_type: None,
        })
    }

    #[test]
    fn test_summary_applies_deltas_in_order() {
        let lines = vec![
            record(0, -1, vec![8], vec![CellDelta([0, 0], 0, 3), CellDelta([0, 1], -1, 0)]),
            record(1, 0, vec![1, 0, 0, 4, 2], vec![CellDelta([0, 0], 0, 1), CellDelta([0, 1], 0, 2)]),
            record(1, -1, vec![8], vec![CellDelta([0, 1], 1, 4)]),
            ReplayLine::End(EndRecord::new(1, 1)),
        ];
        let summary = summarize(&lines);
        assert_eq!(summary.winner, Some(1));
        assert_eq!(summary.cells, [1, 1]);
        assert_eq!(summary.army, [1, 4]);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.actions[0].get(&1), Some(&1));
        assert_eq!(summary.coins, [40, 41]);

        let text = render_summary(&summary);
        assert!(text.contains("Winner: Player 1"));
        assert!(text.contains("army moves: 1"));
    }

    #[test]
    fn test_summary_counts_initial_terrain() {
        let mut first = record(0, -1, vec![8], Vec::new());
        if let ReplayLine::Record(r) = &mut first {
            r.cell_type = Some("0120210".to_string());
        }
        let summary = summarize(&[first, record(1, -1, vec![8], Vec::new())]);
        assert_eq!(summary.board_cells, 7);
        assert_eq!((summary.bogs, summary.mountains), (2, 2));
        assert!(render_summary(&summary).contains("Board cells: 7 (2 bog, 2 mountain)"));
    }
}
