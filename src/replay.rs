//! Replay log.
//!
//! Every successful mutation appends one [`ReplayRecord`]: the acting seat,
//! the command vector, the cells it touched and a snapshot of Generals,
//! weapons, cooldowns, tech and coins. A match starts with an initial record
//! (round 0) that lists every cell plus the terrain string, and ends with an
//! [`EndRecord`] naming the winner.
//!
//! Records are written as JSON Lines. Key names follow the viewer format, so
//! fields are renamed explicitly.

mod text;

pub use text::{ReplaySummary, render_summary, summarize};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{Coord, GameState, General, GeneralId, PlayerId, Terrain};

/// Action code of round-tick records and the initial record.
pub const TICK_ACTION: i64 = 8;
/// Action code of the end-of-match record.
pub const END_ACTION: i64 = 9;

/// Seat as written to replays: `-1` for none.
fn seat(player: Option<PlayerId>) -> i8 {
    player.map_or(-1, |p| i8::try_from(p).unwrap_or(-1))
}

/// `[[row, col], owner, army]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDelta(pub [u16; 2], pub i8, pub u32);

impl CellDelta {
    /// Coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.0[0], self.0[1])
    }

    /// Owner, `None` when neutral.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        PlayerId::try_from(self.1).ok()
    }
}

/// General snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSnapshot {
    /// General id.
    #[serde(rename = "Id")]
    pub id: GeneralId,
    /// Owner seat or `-1`.
    #[serde(rename = "Player")]
    pub player: i8,
    /// 1 = Main, 2 = Sub, 3 = Farmer.
    #[serde(rename = "Type")]
    pub kind: u8,
    /// `[row, col]`.
    #[serde(rename = "Position")]
    pub position: [u16; 2],
    /// Display tiers of production, defense and mobility.
    #[serde(rename = "Level")]
    pub level: [u32; 3],
    /// Skill cooldowns.
    #[serde(rename = "Skill_cd")]
    pub skill_cd: [u32; 5],
    /// Aura durations.
    #[serde(rename = "Skill_rest")]
    pub skill_rest: [u32; 3],
    /// 0 once destroyed.
    #[serde(rename = "Alive")]
    pub alive: u8,
}

impl GeneralSnapshot {
    /// Snapshot of a living General.
    #[must_use]
    pub fn of(general: &General) -> Self {
        Self {
            id: general.id,
            player: seat(general.owner),
            kind: general.kind.replay_type(),
            position: general.position.to_pair(),
            level: general.level_tiers(),
            skill_cd: general.cooldowns,
            skill_rest: general.durations,
            alive: 1,
        }
    }
}

/// Active weapon snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSnapshot {
    /// 1 = area damage, 2 = attack buff, 3 = teleport, 4 = stun.
    #[serde(rename = "Type")]
    pub kind: u8,
    /// Owner seat.
    #[serde(rename = "Player")]
    pub player: i8,
    /// Anchor `[row, col]`.
    #[serde(rename = "Position")]
    pub position: [u16; 2],
    /// Remaining rounds.
    #[serde(rename = "Rest")]
    pub rest: u32,
}

/// One mutation or round tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Round the record belongs to.
    #[serde(rename = "Round")]
    pub round: u32,
    /// Acting seat, `-1` for round ticks.
    #[serde(rename = "Player")]
    pub player: i8,
    /// Command vector that produced the record.
    #[serde(rename = "Action")]
    pub action: Vec<i64>,
    /// Cells whose owner or army changed.
    #[serde(rename = "Cells")]
    pub cells: Vec<CellDelta>,
    /// Every General, plus Generals destroyed by this action.
    #[serde(rename = "Generals")]
    pub generals: Vec<GeneralSnapshot>,
    /// Active super-weapons.
    #[serde(rename = "Weapons")]
    pub weapons: Vec<WeaponSnapshot>,
    /// Super-weapon cooldowns, `-1` while locked.
    #[serde(rename = "Weapon_cds")]
    pub weapon_cds: [i64; 2],
    /// Tech tiers per player.
    #[serde(rename = "Tech_level")]
    pub tech_level: [[u32; 4]; 2],
    /// Coin per player.
    #[serde(rename = "Coins")]
    pub coins: [u32; 2],
    /// Terrain digits, initial record only.
    #[serde(rename = "Cell_type", default, skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<String>,
}

impl ReplayRecord {
    /// Snapshot the state after a mutation.
    #[must_use]
    pub fn capture(
        state: &GameState,
        player: Option<PlayerId>,
        action: Vec<i64>,
        cells: &[Coord],
    ) -> Self {
        let cells = cells
            .iter()
            .filter_map(|&coord| {
                let cell = state.board.get(coord)?;
                Some(CellDelta(coord.to_pair(), seat(cell.owner), cell.army))
            })
            .collect();

        let generals = state.generals().iter().map(GeneralSnapshot::of).collect();

        let weapons = state
            .weapons
            .iter()
            .map(|w| WeaponSnapshot {
                kind: w.kind.replay_type(),
                player: seat(Some(w.owner)),
                position: w.position.to_pair(),
                rest: w.rest,
            })
            .collect();

        let weapon_cds = state
            .weapon_cooldowns
            .map(|cd| cd.map_or(-1, i64::from));

        Self {
            round: state.round,
            player: seat(player),
            action,
            cells,
            generals,
            weapons,
            weapon_cds,
            tech_level: state.tech.map(|t| t.replay_levels()),
            coins: state.coins,
            cell_type: None,
        }
    }

    /// Round-0 record listing every cell and the terrain string.
    #[must_use]
    pub fn initial(state: &GameState) -> Self {
        let all: Vec<Coord> = state.board.coords().collect();
        let mut record = Self::capture(state, None, vec![TICK_ACTION], &all);
        record.round = 0;
        record.cell_type = Some(state.board.terrain_string());
        record
    }

    /// Add snapshots of Generals removed by the action, flagged as dead.
    pub fn mark_destroyed(&mut self, destroyed: impl IntoIterator<Item = GeneralSnapshot>) {
        for mut snapshot in destroyed {
            snapshot.alive = 0;
            self.generals.push(snapshot);
        }
        self.generals.sort_by_key(|g| g.id);
    }

    /// Terrain parsed from `Cell_type`, if this is an initial record.
    #[must_use]
    pub fn terrain(&self) -> Option<Vec<Terrain>> {
        self.cell_type
            .as_deref()
            .map(|s| s.chars().filter_map(Terrain::from_digit).collect())
    }
}

/// Final line of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndRecord {
    /// Round the match ended in.
    #[serde(rename = "Round")]
    pub round: u32,
    /// Winning seat.
    #[serde(rename = "Player")]
    pub player: i8,
    /// Always `[9]`.
    #[serde(rename = "Action")]
    pub action: Vec<i64>,
}

impl EndRecord {
    /// End record for a decided match.
    #[must_use]
    pub fn new(round: u32, winner: PlayerId) -> Self {
        Self {
            round,
            player: seat(Some(winner)),
            action: vec![END_ACTION],
        }
    }
}

/// One line of a replay file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayLine {
    /// Mutation, tick or initial record.
    Record(ReplayRecord),
    /// End of match.
    End(EndRecord),
}

impl ReplayLine {
    /// Round of the line.
    #[must_use]
    pub const fn round(&self) -> u32 {
        match self {
            Self::Record(r) => r.round,
            Self::End(e) => e.round,
        }
    }
}

/// In-memory append-only replay buffer.
#[derive(Debug, Clone)]
pub struct ReplayLog {
    enabled: bool,
    lines: Vec<ReplayLine>,
}

impl Default for ReplayLog {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReplayLog {
    /// Create a log. A disabled log drops every record.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    /// Whether records are kept.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a line if recording is enabled.
    pub fn push(&mut self, line: ReplayLine) {
        if self.enabled {
            self.lines.push(line);
        }
    }

    /// Recorded lines.
    #[must_use]
    pub fn lines(&self) -> &[ReplayLine] {
        &self.lines
    }

    /// Most recent mutable record, used to patch in destroyed Generals.
    pub fn last_record_mut(&mut self) -> Option<&mut ReplayRecord> {
        match self.lines.last_mut() {
            Some(ReplayLine::Record(record)) => Some(record),
            _ => None,
        }
    }

    /// Number of recorded lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drain the log.
    pub fn take(&mut self) -> Vec<ReplayLine> {
        std::mem::take(&mut self.lines)
    }
}

/// Error type for replay I/O.
#[derive(Debug)]
pub enum ReplayError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// A line could not be encoded or decoded.
    Json {
        /// 1-based line number (0 when writing).
        line: usize,
        /// Parser message.
        message: String,
    },
    /// The file holds no records.
    Empty,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "replay I/O error: {e}"),
            Self::Json { line, message } => write!(f, "replay line {line}: {message}"),
            Self::Empty => write!(f, "replay is empty"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Streams replay lines as JSON Lines.
#[derive(Debug)]
pub struct ReplayWriter<W: Write> {
    inner: W,
}

impl<W: Write> ReplayWriter<W> {
    /// Wrap a writer.
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one line.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn write_line(&mut self, line: &ReplayLine) -> Result<(), ReplayError> {
        serde_json::to_writer(&mut self.inner, line).map_err(|e| ReplayError::Json {
            line: 0,
            message: e.to_string(),
        })?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    /// Write every line and flush.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn write_all(&mut self, lines: &[ReplayLine]) -> Result<(), ReplayError> {
        for line in lines {
            self.write_line(line)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Unwrap the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Save a replay to a file.
///
/// # Errors
///
/// Fails when the file cannot be created or written.
pub fn save_replay(path: &Path, lines: &[ReplayLine]) -> Result<(), ReplayError> {
    let file = File::create(path)?;
    ReplayWriter::new(BufWriter::new(file)).write_all(lines)
}

/// Parse JSON Lines into replay lines. Blank lines are skipped.
///
/// # Errors
///
/// Fails on I/O errors, malformed lines, or an empty input.
pub fn read_replay<R: BufRead>(reader: R) -> Result<Vec<ReplayLine>, ReplayError> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = serde_json::from_str(&line).map_err(|e| ReplayError::Json {
            line: idx + 1,
            message: e.to_string(),
        })?;
        lines.push(parsed);
    }
    if lines.is_empty() {
        return Err(ReplayError::Empty);
    }
    Ok(lines)
}

/// Load a replay file.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed.
pub fn load_replay(path: &Path) -> Result<Vec<ReplayLine>, ReplayError> {
    read_replay(BufReader::new(File::open(path)?))
}
