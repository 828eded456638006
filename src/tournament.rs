//! Match runner.
//!
//! Provides a pure function interface: `(seed, policies, config) -> MatchResult`
//!
//! The runner handles:
//! - Deterministic map generation
//! - Collecting each seat's command list from its [`Policy`]
//! - Sequential command application and per-command win checks
//! - Round ticks and the final tiebreak

mod bots;
mod mapgen;

pub use bots::{GreedyPolicy, IdlePolicy, RandomPolicy, ScriptedPolicy};
pub use mapgen::{MapGenError, generate_match};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::invariants::assert_invariants;
use crate::game::rules::{DEFAULT_COLS, DEFAULT_ROWS, INITIAL_COINS, ROUND_CAP};
use crate::game::victory::sole_survivor;
use crate::game::{
    END_TURN, GameState, NUM_PLAYERS, PlayerId, end_round, evaluate, execute_command,
    force_tiebreak, opponent,
};
use crate::replay::{EndRecord, ReplayLine};

/// Source of commands for one seat.
pub trait Policy {
    /// Display name.
    fn name(&self) -> &str;

    /// Commands for this turn as `[code, params...]` vectors.
    ///
    /// Processing stops at the first `[8]`; illegal commands are skipped.
    fn plan_turn(&mut self, round: u32, seat: PlayerId, state: &GameState) -> Vec<Vec<i64>>;
}

/// Configuration for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Board rows.
    pub rows: u16,
    /// Board columns.
    pub cols: u16,
    /// Rounds played before the forced tiebreak.
    pub max_rounds: u32,
    /// Starting coin per player.
    pub initial_coins: u32,
    /// Unclaimed Sub Generals placed at the start.
    pub sub_generals: u32,
    /// Unclaimed Farmers placed at the start.
    pub farmers: u32,
    /// An illegal command loses the match instead of being skipped.
    pub forfeit_on_illegal: bool,
    /// Keep replay records in the result.
    pub record_replay: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            max_rounds: ROUND_CAP,
            initial_coins: INITIAL_COINS,
            sub_generals: 4,
            farmers: 8,
            forfeit_on_illegal: false,
            record_replay: true,
        }
    }
}

/// Error loading a [`MatchConfig`].
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// File path.
        path: String,
        /// Error details.
        message: String,
    },
    /// The TOML is malformed or has wrong field types.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "Failed to read config {path}: {message}"),
            Self::Parse(e) => write!(f, "Failed to parse config TOML: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl MatchConfig {
    /// Parse a config from TOML. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

/// How the winner was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecidedBy {
    /// The loser has no Main General left.
    Elimination,
    /// Army, cells, then coin after the last round.
    Tiebreak,
    /// The loser issued an illegal command in strict mode.
    Forfeit,
}

/// Final statistics of one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    /// Total army on owned cells.
    pub army: u64,
    /// Owned cells.
    pub cells: u32,
    /// Coin balance.
    pub coins: u32,
    /// Generals owned.
    pub generals: u32,
    /// Commands rejected as illegal.
    pub rejected: u32,
}

/// Final result of a match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The seed used for this match.
    pub seed: u64,
    /// Winning seat.
    pub winner: PlayerId,
    /// How the match was decided.
    pub decided_by: DecidedBy,
    /// Round the match ended in.
    pub rounds: u32,
    /// Per-seat statistics.
    pub players: [PlayerStats; NUM_PLAYERS],
    /// Replay lines, empty when recording is disabled.
    pub replay: Vec<ReplayLine>,
}

/// Error type for match setup.
#[derive(Debug)]
pub enum MatchError {
    /// Map generation failed.
    MapGeneration(MapGenError),
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapGeneration(e) => write!(f, "Map generation failed: {e}"),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<MapGenError> for MatchError {
    fn from(e: MapGenError) -> Self {
        Self::MapGeneration(e)
    }
}

/// Play one seat's turn. Returns a decided outcome, if any.
fn play_turn(
    state: &mut GameState,
    seat: PlayerId,
    commands: &[Vec<i64>],
    config: &MatchConfig,
    rejected: &mut [u32; NUM_PLAYERS],
) -> Option<(PlayerId, DecidedBy)> {
    for raw in commands {
        let Some((&code, params)) = raw.split_first() else {
            continue;
        };
        if code == END_TURN {
            break;
        }
        if execute_command(state, seat, code, params).is_err() {
            rejected[usize::from(seat)] += 1;
            if config.forfeit_on_illegal {
                return Some((opponent(seat), DecidedBy::Forfeit));
            }
            continue;
        }
        assert_invariants(state);
        if let Some(winner) = sole_survivor(state) {
            return Some((winner, DecidedBy::Elimination));
        }
    }
    None
}

fn player_stats(state: &GameState, seat: PlayerId, rejected: u32) -> PlayerStats {
    #[allow(clippy::cast_possible_truncation)]
    let generals = state
        .generals()
        .iter()
        .filter(|g| g.owner == Some(seat))
        .count() as u32;
    PlayerStats {
        army: state.board.total_army(seat),
        cells: state.board.count_cells(seat),
        coins: state.coins[usize::from(seat)],
        generals,
        rejected,
    }
}

/// Run a complete match with the given seed and policies.
///
/// Each round seat 0 then seat 1 submits a command list; the round tick runs
/// after both. The winner is checked after every applied command and after
/// every tick. When `max_rounds` runs out the tiebreak decides.
///
/// # Determinism
///
/// Given the same seed, config and deterministic policies, this function
/// always produces the same `MatchResult`.
///
/// # Errors
///
/// Returns an error if map generation fails.
pub fn run_match(
    seed: u64,
    mut policies: [&mut dyn Policy; NUM_PLAYERS],
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    let mut state = generate_match(seed, config)?;
    let mut rejected = [0u32; NUM_PLAYERS];
    let mut outcome = None;

    'rounds: for round in 1..=config.max_rounds {
        for (seat, policy) in (0..).zip(policies.iter_mut()) {
            let commands = policy.plan_turn(round, seat, &state);
            outcome = play_turn(&mut state, seat, &commands, config, &mut rejected);
            if outcome.is_some() {
                break 'rounds;
            }
        }
        end_round(&mut state);
        assert_invariants(&state);
        if let Some(winner) = evaluate(&state) {
            let decided_by = if sole_survivor(&state).is_some() {
                DecidedBy::Elimination
            } else {
                DecidedBy::Tiebreak
            };
            outcome = Some((winner, decided_by));
            break;
        }
    }

    let (winner, decided_by) =
        outcome.unwrap_or_else(|| (force_tiebreak(&state), DecidedBy::Tiebreak));
    state.winner = Some(winner);
    state
        .replay
        .push(ReplayLine::End(EndRecord::new(state.round, winner)));
    debug!(seed, ?rejected, "match finished");
    info!(seed, winner, ?decided_by, round = state.round, "match decided");

    Ok(MatchResult {
        seed,
        winner,
        decided_by,
        rounds: state.round,
        players: [
            player_stats(&state, 0, rejected[0]),
            player_stats(&state, 1, rejected[1]),
        ],
        replay: state.replay.take(),
    })
}
