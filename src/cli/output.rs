//! Output formatting utilities for CLI.

// Averages divide integer totals
#![allow(clippy::cast_precision_loss)]

use generals::tournament::{DecidedBy, MatchResult, PlayerStats};
use serde::Serialize;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    seed: u64,
    /// Winning seat.
    winner: u8,
    /// How the winner was decided.
    decided_by: DecidedBy,
    /// Round the match ended in.
    rounds: u32,
    /// Per-seat results.
    players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Seat (0 or 1).
    seat: usize,
    /// Bot name.
    bot: String,
    /// Final statistics.
    #[serde(flatten)]
    stats: PlayerStats,
}

impl JsonMatchResult {
    /// Create from a `MatchResult`.
    pub(super) fn from_match_result(result: &MatchResult, bot_names: &[String]) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            decided_by: result.decided_by,
            rounds: result.rounds,
            players: result
                .players
                .iter()
                .enumerate()
                .map(|(seat, stats)| JsonPlayerResult {
                    seat,
                    bot: bot_names.get(seat).cloned().unwrap_or_default(),
                    stats: *stats,
                })
                .collect(),
        }
    }
}

fn decided_label(decided_by: DecidedBy) -> &'static str {
    match decided_by {
        DecidedBy::Elimination => "elimination",
        DecidedBy::Tiebreak => "tiebreak",
        DecidedBy::Forfeit => "forfeit",
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", result.seed));
    let name = bot_names
        .get(usize::from(result.winner))
        .map_or("Unknown", String::as_str);
    output.push_str(&format!(
        "  Winner: Player {} ({name}) by {}\n",
        result.winner,
        decided_label(result.decided_by)
    ));
    output.push_str(&format!("  Rounds: {}\n\n", result.rounds));

    for (seat, stats) in result.players.iter().enumerate() {
        let name = bot_names.get(seat).map_or("Unknown", String::as_str);
        output.push_str(&format!(
            "  Player {seat} ({name}): army {}, cells {}, coins {}, generals {}",
            stats.army, stats.cells, stats.coins, stats.generals
        ));
        if stats.rejected > 0 {
            output.push_str(&format!(" [{} rejected commands]", stats.rejected));
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default, Clone)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per seat.
    pub(super) wins: [u64; 2],
    /// Games decided by elimination.
    eliminations: u64,
    /// Games decided by forfeit.
    forfeits: u64,
    /// Total final army per seat.
    total_army: [u64; 2],
    /// Total final cells per seat.
    total_cells: [u64; 2],
    /// Total rejected commands per seat.
    total_rejected: [u64; 2],
    /// Total rounds across all games.
    total_rounds: u64,
}

impl TournamentStats {
    /// Create empty stats.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_rounds += u64::from(result.rounds);
        self.wins[usize::from(result.winner)] += 1;
        match result.decided_by {
            DecidedBy::Elimination => self.eliminations += 1,
            DecidedBy::Forfeit => self.forfeits += 1,
            DecidedBy::Tiebreak => {}
        }
        for (seat, stats) in result.players.iter().enumerate() {
            self.total_army[seat] += stats.army;
            self.total_cells[seat] += u64::from(stats.cells);
            self.total_rejected[seat] += u64::from(stats.rejected);
        }
    }

    /// Merge another thread's stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.eliminations += other.eliminations;
        self.forfeits += other.forfeits;
        self.total_rounds += other.total_rounds;
        for seat in 0..2 {
            self.wins[seat] += other.wins[seat];
            self.total_army[seat] += other.total_army[seat];
            self.total_cells[seat] += other.total_cells[seat];
            self.total_rejected[seat] += other.total_rejected[seat];
        }
    }

    fn average(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    /// Get win rate for a seat (0.0-1.0).
    pub(super) fn win_rate(&self, seat: usize) -> f64 {
        self.average(self.wins[seat])
    }

    /// Average final army for a seat.
    pub(super) fn avg_army(&self, seat: usize) -> f64 {
        self.average(self.total_army[seat])
    }

    /// Average final cell count for a seat.
    pub(super) fn avg_cells(&self, seat: usize) -> f64 {
        self.average(self.total_cells[seat])
    }

    /// Average rejected commands per game for a seat.
    pub(super) fn avg_rejected(&self, seat: usize) -> f64 {
        self.average(self.total_rejected[seat])
    }

    /// Get average game length.
    pub(super) fn avg_rounds(&self) -> f64 {
        self.average(self.total_rounds)
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Games decided by elimination.
    eliminations: u64,
    /// Games decided by forfeit.
    forfeits: u64,
    /// Average game length in rounds.
    avg_rounds: f64,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Seat (0 or 1).
    seat: usize,
    /// Bot name.
    bot: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final army.
    avg_army: f64,
    /// Average final cells.
    avg_cells: f64,
    /// Average rejected commands.
    avg_rejected: f64,
}

impl JsonTournamentResult {
    /// Create from stats and bot names.
    pub(super) fn from_stats(stats: &TournamentStats, bot_names: &[String]) -> Self {
        let players = (0..2)
            .map(|seat| JsonTournamentPlayer {
                seat,
                bot: bot_names.get(seat).cloned().unwrap_or_default(),
                wins: stats.wins[seat],
                win_rate: stats.win_rate(seat),
                avg_army: stats.avg_army(seat),
                avg_cells: stats.avg_cells(seat),
                avg_rejected: stats.avg_rejected(seat),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            eliminations: stats.eliminations,
            forfeits: stats.forfeits,
            avg_rounds: stats.avg_rounds(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (seat, name) in bot_names.iter().enumerate().take(2) {
        output.push_str(&format!(
            "  Player {seat} ({name}): {:.1}% ({} wins)\n",
            stats.win_rate(seat) * 100.0,
            stats.wins[seat]
        ));
    }
    output.push_str(&format!(
        "  Eliminations: {}, forfeits: {}\n\n",
        stats.eliminations, stats.forfeits
    ));

    output.push_str("Average Final Position:\n");
    for (seat, name) in bot_names.iter().enumerate().take(2) {
        output.push_str(&format!(
            "  Player {seat} ({name}): army {:.1}, cells {:.1}, rejected {:.1}\n",
            stats.avg_army(seat),
            stats.avg_cells(seat),
            stats.avg_rejected(seat)
        ));
    }

    output.push_str(&format!("\nAverage Game Length: {:.0} rounds\n", stats.avg_rounds()));

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("seat,bot,wins,win_rate,avg_army,avg_cells,avg_rejected\n");

    for (seat, name) in bot_names.iter().enumerate().take(2) {
        output.push_str(&format!(
            "{seat},{name},{},{:.4},{:.2},{:.2},{:.2}\n",
            stats.wins[seat],
            stats.win_rate(seat),
            stats.avg_army(seat),
            stats.avg_cells(seat),
            stats.avg_rejected(seat)
        ));
    }

    output
}
