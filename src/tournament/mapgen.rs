//! Deterministic map generation for matches.

// Map generation uses intentional casts for RNG operations
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::game::{Board, Coord, GameState, GeneralKind, NUM_PLAYERS, PlayerId, Terrain};
use crate::replay::{ReplayLine, ReplayLog, ReplayRecord};
use crate::tournament::MatchConfig;

/// Share of cells turned into bog.
const BOG_SHARE: f64 = 0.10;
/// Share of cells turned into mountain.
const MOUNTAIN_SHARE: f64 = 0.10;
/// Starting army range of unclaimed Sub Generals.
const SUB_ARMY: (u32, u32) = (10, 20);
/// Starting army range of unclaimed Farmers.
const FARMER_ARMY: (u32, u32) = (3, 5);

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    pub(crate) const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random u32 in [0, max).
    pub(crate) fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }

    /// Generate random u32 in [low, high].
    fn range_inclusive(&mut self, (low, high): (u32, u32)) -> u32 {
        low + self.next_u32(high - low + 1)
    }

    /// Generate random f64 in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u32(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Error type for map generation.
#[derive(Debug, Clone)]
pub struct MapGenError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for MapGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Map generation error: {}", self.reason)
    }
}

impl std::error::Error for MapGenError {}

/// Generate the opening state of a match.
///
/// Terrain is rolled per cell; Mains, Subs and Farmers are then placed on
/// distinct plain cells. The initial replay record is written when the
/// config asks for a replay.
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or there are not enough
/// plain cells for every General.
pub fn generate_match(seed: u64, config: &MatchConfig) -> Result<GameState, MapGenError> {
    let mut rng = Rng::new(seed);

    let mut board = Board::new(config.rows, config.cols).ok_or_else(|| MapGenError {
        reason: format!("Invalid board dimensions {}x{}", config.rows, config.cols),
    })?;
    generate_terrain(&mut board, &mut rng);

    let mut plains: Vec<Coord> = board
        .iter()
        .filter(|(_, cell)| cell.terrain == Terrain::Plain)
        .map(|(coord, _)| coord)
        .collect();
    let needed = NUM_PLAYERS + config.sub_generals as usize + config.farmers as usize;
    if plains.len() < needed {
        return Err(MapGenError {
            reason: format!(
                "Need {needed} plain cells for generals, only {} available",
                plains.len()
            ),
        });
    }
    rng.shuffle(&mut plains);

    let mut state = GameState::new(board);
    state.coins = [config.initial_coins; NUM_PLAYERS];
    state.replay = ReplayLog::new(config.record_replay);

    let mut spots = plains.into_iter();
    for player in 0..NUM_PLAYERS as PlayerId {
        let coord = next_spot(&mut spots)?;
        place(&mut state, GeneralKind::Main, Some(player), coord, 0)?;
    }
    for _ in 0..config.sub_generals {
        let coord = next_spot(&mut spots)?;
        let army = rng.range_inclusive(SUB_ARMY);
        place(&mut state, GeneralKind::Sub, None, coord, army)?;
    }
    for _ in 0..config.farmers {
        let coord = next_spot(&mut spots)?;
        let army = rng.range_inclusive(FARMER_ARMY);
        place(&mut state, GeneralKind::Farmer, None, coord, army)?;
    }

    if state.replay.is_enabled() {
        let initial = ReplayRecord::initial(&state);
        state.replay.push(ReplayLine::Record(initial));
    }
    Ok(state)
}

/// Roll bog and mountain cells.
fn generate_terrain(board: &mut Board, rng: &mut Rng) {
    for coord in board.coords() {
        let noise = rng.next_f64();
        let terrain = if noise < BOG_SHARE {
            Terrain::Bog
        } else if noise < BOG_SHARE + MOUNTAIN_SHARE {
            Terrain::Mountain
        } else {
            Terrain::Plain
        };
        if let Some(cell) = board.get_mut(coord) {
            cell.terrain = terrain;
        }
    }
}

fn next_spot(spots: &mut impl Iterator<Item = Coord>) -> Result<Coord, MapGenError> {
    spots.next().ok_or_else(|| MapGenError {
        reason: "Ran out of plain cells".to_string(),
    })
}

fn place(
    state: &mut GameState,
    kind: GeneralKind,
    owner: Option<PlayerId>,
    coord: Coord,
    army: u32,
) -> Result<(), MapGenError> {
    state.add_general(kind, owner, coord).ok_or_else(|| MapGenError {
        reason: format!("Cannot place general at {coord:?}"),
    })?;
    if let Some(cell) = state.board.get_mut(coord) {
        cell.owner = owner;
        cell.army = army;
    }
    Ok(())
}
