//! Game state management.

use crate::error::{ActionError, ActionResult};
use crate::game::rules::{BASE_MOVE_STEPS, INITIAL_COINS};
use crate::game::{
    Board, Cell, Coord, General, GeneralId, GeneralKind, NUM_PLAYERS, PlayerId, SuperWeapon,
};
use crate::replay::{ReplayLine, ReplayLog, ReplayRecord};

/// Global tech tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechTrack {
    /// Army moves per round.
    Movement,
    /// Crossing mountains.
    Climbing,
    /// No bog drain.
    BogImmunity,
    /// Super-weapon access.
    SuperWeapon,
}

impl TechTrack {
    /// Decode a tech sub-code (1..=4).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Movement),
            2 => Some(Self::Climbing),
            3 => Some(Self::BogImmunity),
            4 => Some(Self::SuperWeapon),
            _ => None,
        }
    }

    /// Sub-code of this track.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Movement => 1,
            Self::Climbing => 2,
            Self::BogImmunity => 3,
            Self::SuperWeapon => 4,
        }
    }
}

/// Tech progress of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechLevels {
    /// Army moves granted per round.
    pub movement: u32,
    /// Mountains are passable.
    pub climbing: bool,
    /// Bog cells do not drain army.
    pub bog_immunity: bool,
    /// Super-weapons are available.
    pub super_weapon: bool,
}

impl Default for TechLevels {
    fn default() -> Self {
        Self {
            movement: BASE_MOVE_STEPS,
            climbing: false,
            bog_immunity: false,
            super_weapon: false,
        }
    }
}

impl TechLevels {
    /// Tech tiers as reported in replays. Movement 2/3/5 shows as 1/2/3.
    #[must_use]
    pub const fn replay_levels(&self) -> [u32; 4] {
        [
            self.movement.div_ceil(2),
            self.climbing as u32,
            self.bog_immunity as u32,
            self.super_weapon as u32,
        ]
    }
}

/// Complete world state of one match.
///
/// Cell and General cross-references are ids and coordinates only: a cell
/// names the General standing on it, and the General stores the cell's
/// coordinate.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The board.
    pub board: Board,
    /// Generals sorted by id.
    generals: Vec<General>,
    /// Current round, starting at 1.
    pub round: u32,
    /// Coin balance per player.
    pub coins: [u32; NUM_PLAYERS],
    /// Tech progress per player.
    pub tech: [TechLevels; NUM_PLAYERS],
    /// Army moves left this round per player.
    pub rest_move_step: [u32; NUM_PLAYERS],
    /// Super-weapon cooldown per player, `None` while locked.
    pub weapon_cooldowns: [Option<u32>; NUM_PLAYERS],
    /// Active super-weapon effects in activation order.
    pub weapons: Vec<SuperWeapon>,
    next_general_id: GeneralId,
    /// Decided winner, if any.
    pub winner: Option<PlayerId>,
    /// Mutation log.
    pub replay: ReplayLog,
}

impl GameState {
    /// Create a fresh state around a board. No Generals are placed.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            generals: Vec::new(),
            round: 1,
            coins: [INITIAL_COINS; NUM_PLAYERS],
            tech: [TechLevels::default(); NUM_PLAYERS],
            rest_move_step: [BASE_MOVE_STEPS; NUM_PLAYERS],
            weapon_cooldowns: [None; NUM_PLAYERS],
            weapons: Vec::new(),
            next_general_id: 0,
            winner: None,
            replay: ReplayLog::default(),
        }
    }

    /// All Generals in id order.
    #[must_use]
    pub fn generals(&self) -> &[General] {
        &self.generals
    }

    /// Mutable access to every General.
    pub fn generals_mut(&mut self) -> &mut [General] {
        &mut self.generals
    }

    /// Look up a General by id.
    #[must_use]
    pub fn general(&self, id: GeneralId) -> Option<&General> {
        self.generals
            .binary_search_by_key(&id, |g| g.id)
            .ok()
            .map(|idx| &self.generals[idx])
    }

    /// Look up a General by id, mutably.
    #[must_use]
    pub fn general_mut(&mut self, id: GeneralId) -> Option<&mut General> {
        self.generals
            .binary_search_by_key(&id, |g| g.id)
            .ok()
            .map(|idx| &mut self.generals[idx])
    }

    /// General standing on a cell.
    #[must_use]
    pub fn general_at(&self, coord: Coord) -> Option<&General> {
        let id = self.board.get(coord)?.general?;
        self.general(id)
    }

    /// General standing on a cell, mutably.
    #[must_use]
    pub fn general_at_mut(&mut self, coord: Coord) -> Option<&mut General> {
        let id = self.board.get(coord)?.general?;
        self.general_mut(id)
    }

    /// Resolve a raw id from a command vector to the General's cell.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownGeneral`] when no such General exists.
    pub fn position_of(&self, raw_id: i64) -> Result<Coord, ActionError> {
        GeneralId::try_from(raw_id)
            .ok()
            .and_then(|id| self.general(id))
            .map(|g| g.position)
            .ok_or(ActionError::UnknownGeneral(raw_id))
    }

    /// Place a new General on an in-bounds cell that has none.
    ///
    /// Ids are handed out in increasing order, which keeps the list sorted.
    pub fn add_general(
        &mut self,
        kind: GeneralKind,
        owner: Option<PlayerId>,
        position: Coord,
    ) -> Option<GeneralId> {
        let cell = self.board.get_mut(position)?;
        if cell.general.is_some() {
            return None;
        }
        let id = self.next_general_id;
        cell.general = Some(id);
        self.generals.push(General::new(id, kind, owner, position));
        self.next_general_id += 1;
        Some(id)
    }

    /// Remove a General from the match and detach it from its cell.
    pub fn remove_general(&mut self, id: GeneralId) -> Option<General> {
        let idx = self.generals.binary_search_by_key(&id, |g| g.id).ok()?;
        let general = self.generals.remove(idx);
        if let Some(cell) = self.board.get_mut(general.position) {
            if cell.general == Some(id) {
                cell.general = None;
            }
        }
        Some(general)
    }

    /// Move a General's cell reference to `to`. The caller checks legality.
    pub fn relocate_general(&mut self, id: GeneralId, to: Coord) {
        let Some(from) = self.general(id).map(|g| g.position) else {
            return;
        };
        if let Some(cell) = self.board.get_mut(from) {
            cell.general = None;
        }
        if let Some(cell) = self.board.get_mut(to) {
            cell.general = Some(id);
        }
        if let Some(general) = self.general_mut(id) {
            general.position = to;
        }
    }

    /// Id the next spawned General will receive.
    #[must_use]
    pub const fn next_general_id(&self) -> GeneralId {
        self.next_general_id
    }

    /// Whether `player` currently owns a Main General.
    #[must_use]
    pub fn has_main(&self, player: PlayerId) -> bool {
        self.generals
            .iter()
            .any(|g| g.kind == GeneralKind::Main && g.owner == Some(player))
    }

    /// Cell at `coord` or [`ActionError::OutOfBounds`].
    ///
    /// # Errors
    ///
    /// Fails when the coordinate is off the board.
    pub fn cell(&self, coord: Coord) -> Result<&Cell, ActionError> {
        self.board.get(coord).ok_or(ActionError::OutOfBounds)
    }

    /// Check that `player` can pay `cost`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InsufficientCoin`] when the balance is short.
    pub fn ensure_coins(&self, player: PlayerId, cost: u32) -> ActionResult {
        if self.coins[usize::from(player)] < cost {
            return Err(ActionError::InsufficientCoin);
        }
        Ok(())
    }

    /// Deduct coin after [`Self::ensure_coins`] passed.
    pub fn spend(&mut self, player: PlayerId, cost: u32) {
        let balance = &mut self.coins[usize::from(player)];
        debug_assert!(*balance >= cost, "spend {cost} from balance {balance}");
        *balance -= cost;
    }

    /// Append a replay record for a mutation.
    pub fn record(&mut self, player: Option<PlayerId>, action: Vec<i64>, cells: &[Coord]) {
        if self.replay.is_enabled() {
            let record = ReplayRecord::capture(self, player, action, cells);
            self.replay.push(ReplayLine::Record(record));
        }
    }
}

/// Check that a seat is 0 or 1.
///
/// # Errors
///
/// Returns [`ActionError::InvalidPlayer`] for any other value.
pub fn check_player(player: PlayerId) -> ActionResult {
    if usize::from(player) < NUM_PLAYERS {
        Ok(())
    } else {
        Err(ActionError::InvalidPlayer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Board::new(5, 5).unwrap())
    }

    #[test]
    fn test_initial_values() {
        let s = state();
        assert_eq!(s.round, 1);
        assert_eq!(s.coins, [40, 40]);
        assert_eq!(s.rest_move_step, [2, 2]);
        assert_eq!(s.weapon_cooldowns, [None, None]);
        assert_eq!(s.winner, None);
        assert_eq!(s.tech[0].replay_levels(), [1, 0, 0, 0]);
    }

    #[test]
    fn test_add_and_lookup_general() {
        let mut s = state();
        let a = s.add_general(GeneralKind::Main, Some(0), Coord::new(1, 1)).unwrap();
        let b = s.add_general(GeneralKind::Farmer, None, Coord::new(2, 2)).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(s.general_at(Coord::new(2, 2)).unwrap().id, b);
        assert_eq!(s.position_of(0), Ok(Coord::new(1, 1)));
        assert_eq!(s.position_of(9), Err(ActionError::UnknownGeneral(9)));
        assert_eq!(s.position_of(-1), Err(ActionError::UnknownGeneral(-1)));
        // occupied or off-board cells refuse a second General
        assert!(s.add_general(GeneralKind::Sub, None, Coord::new(1, 1)).is_none());
        assert!(s.add_general(GeneralKind::Sub, None, Coord::new(9, 9)).is_none());
    }

    #[test]
    fn test_remove_general_clears_cell() {
        let mut s = state();
        let id = s.add_general(GeneralKind::Sub, None, Coord::new(3, 3)).unwrap();
        assert!(s.remove_general(id).is_some());
        assert!(s.board.get(Coord::new(3, 3)).unwrap().general.is_none());
        assert!(s.general(id).is_none());
        // ids keep increasing after removal
        let next = s.add_general(GeneralKind::Sub, None, Coord::new(3, 3)).unwrap();
        assert_eq!(next, id + 1);
    }

    #[test]
    fn test_relocate_general() {
        let mut s = state();
        let id = s.add_general(GeneralKind::Sub, Some(1), Coord::new(0, 0)).unwrap();
        s.relocate_general(id, Coord::new(0, 2));
        assert!(s.board.get(Coord::new(0, 0)).unwrap().general.is_none());
        assert_eq!(s.board.get(Coord::new(0, 2)).unwrap().general, Some(id));
        assert_eq!(s.general(id).unwrap().position, Coord::new(0, 2));
    }

    #[test]
    fn test_has_main_follows_owner() {
        let mut s = state();
        let id = s.add_general(GeneralKind::Main, Some(0), Coord::new(1, 1)).unwrap();
        assert!(s.has_main(0));
        assert!(!s.has_main(1));
        s.general_mut(id).unwrap().owner = Some(1);
        assert!(!s.has_main(0));
        assert!(s.has_main(1));
    }

    #[test]
    fn test_check_player() {
        assert!(check_player(0).is_ok());
        assert!(check_player(1).is_ok());
        assert_eq!(check_player(2), Err(ActionError::InvalidPlayer));
    }

    #[test]
    fn test_spend_after_ensure() {
        let mut s = state();
        s.ensure_coins(1, 40).unwrap();
        s.spend(1, 15);
        s.spend(1, 25);
        assert_eq!(s.coins, [40, 0]);
        assert_eq!(s.ensure_coins(1, 1), Err(ActionError::InsufficientCoin));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "spend 41 from balance 40")]
    fn test_overspend_panics_in_debug() {
        let mut s = state();
        s.spend(0, 41);
    }

    #[test]
    fn test_tech_codes() {
        for code in 1..=4 {
            assert_eq!(TechTrack::from_code(code).unwrap().code(), code);
        }
        assert!(TechTrack::from_code(0).is_none());
    }
}
