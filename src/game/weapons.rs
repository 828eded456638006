//! Super-weapons and stun checks.
//!
//! All four weapons share one per-player cooldown. It is `None` until the
//! super-weapon tech is bought, then counts down each round; a weapon can
//! fire only while it reads zero.

use crate::error::{ActionError, ActionResult};
use crate::game::rules::{GARRISON, weapon};
use crate::game::state::check_player;
use crate::game::{Coord, GameState, GeneralKind, PlayerId};
use crate::replay::GeneralSnapshot;

/// Super-weapon kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    /// Wipes a 3x3 area, then drains it each round.
    AreaDamage,
    /// Triples attack and defense of nearby friendly cells.
    AttackBuff,
    /// Moves an army anywhere; locks the landing cell.
    Teleport,
    /// Freezes enemy actions around the anchor.
    Stun,
}

impl WeaponKind {
    /// Decode a weapon sub-code (1..=4).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::AreaDamage),
            2 => Some(Self::AttackBuff),
            3 => Some(Self::Teleport),
            4 => Some(Self::Stun),
            _ => None,
        }
    }

    /// Sub-code, also the replay `Type`.
    #[must_use]
    pub const fn replay_type(self) -> u8 {
        match self {
            Self::AreaDamage => 1,
            Self::AttackBuff => 2,
            Self::Teleport => 3,
            Self::Stun => 4,
        }
    }

    /// Rounds the weapon stays registered.
    #[must_use]
    pub const fn lifetime(self) -> u32 {
        match self {
            Self::AreaDamage => weapon::AREA_DAMAGE_LIFETIME,
            Self::AttackBuff => weapon::ATTACK_BUFF_LIFETIME,
            Self::Teleport => weapon::TELEPORT_LIFETIME,
            Self::Stun => weapon::STUN_LIFETIME,
        }
    }
}

/// An active super-weapon effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperWeapon {
    /// Kind.
    pub kind: WeaponKind,
    /// Seat that fired it.
    pub owner: PlayerId,
    /// Anchor cell.
    pub position: Coord,
    /// Total lifetime.
    pub duration: u32,
    /// Rounds left.
    pub rest: u32,
}

impl SuperWeapon {
    /// Fresh effect with its full lifetime.
    #[must_use]
    pub const fn new(kind: WeaponKind, owner: PlayerId, position: Coord) -> Self {
        let duration = kind.lifetime();
        Self {
            kind,
            owner,
            position,
            duration,
            rest: duration,
        }
    }
}

/// Whether `player` is blocked from acting on `coord`.
///
/// A player's own live teleport locks its landing cell, and any live enemy
/// stun field freezes the cells within one step of its anchor.
#[must_use]
pub fn is_stunned(state: &GameState, player: PlayerId, coord: Coord) -> bool {
    state.weapons.iter().filter(|w| w.rest > 0).any(|w| match w.kind {
        WeaponKind::Teleport => w.owner == player && w.position == coord,
        WeaponKind::Stun => w.owner != player && w.position.chebyshev(coord) <= 1,
        WeaponKind::AreaDamage | WeaponKind::AttackBuff => false,
    })
}

/// Fail with [`ActionError::Stunned`] if any of `coords` is stunned for `player`.
///
/// # Errors
///
/// Returns [`ActionError::Stunned`] on the first frozen cell.
pub fn ensure_not_stunned(state: &GameState, player: PlayerId, coords: &[Coord]) -> ActionResult {
    if coords.iter().any(|&c| is_stunned(state, player, c)) {
        return Err(ActionError::Stunned);
    }
    Ok(())
}

fn ensure_ready(state: &GameState, player: PlayerId) -> ActionResult {
    check_player(player)?;
    if !state.tech[usize::from(player)].super_weapon {
        return Err(ActionError::WeaponLocked);
    }
    match state.weapon_cooldowns[usize::from(player)] {
        None => Err(ActionError::WeaponLocked),
        Some(0) => Ok(()),
        Some(_) => Err(ActionError::WeaponCoolingDown),
    }
}

fn arm(state: &mut GameState, player: PlayerId, kind: WeaponKind, anchor: Coord) {
    state.weapons.push(SuperWeapon::new(kind, player, anchor));
    state.weapon_cooldowns[usize::from(player)] = Some(weapon::REUSE_COOLDOWN);
}

fn action(kind: WeaponKind, target: Coord) -> Vec<i64> {
    vec![
        6,
        i64::from(kind.replay_type()),
        i64::from(target.row),
        i64::from(target.col),
    ]
}

/// Area damage on the 3x3 block around `target`.
///
/// Main General cells lose half their army. Every other cell is wiped and
/// neutralized, and any General on it is destroyed.
///
/// # Errors
///
/// Fails when the target is off the board or the weapon is not ready.
pub fn area_damage(state: &mut GameState, player: PlayerId, target: Coord) -> ActionResult {
    ensure_ready(state, player)?;
    state.cell(target)?;

    arm(state, player, WeaponKind::AreaDamage, target);

    let area: Vec<Coord> = state.board.area(target, weapon::AREA_RADIUS).collect();
    let mut destroyed = Vec::new();
    for &coord in &area {
        let is_main = state
            .general_at(coord)
            .is_some_and(|g| g.kind == GeneralKind::Main);
        if is_main {
            if let Some(cell) = state.board.get_mut(coord) {
                cell.army /= 2;
            }
            continue;
        }
        if let Some(id) = state.board.get(coord).and_then(|c| c.general) {
            if let Some(general) = state.remove_general(id) {
                destroyed.push(general);
            }
        }
        if let Some(cell) = state.board.get_mut(coord) {
            cell.army = 0;
            cell.owner = None;
        }
    }

    state.record(Some(player), action(WeaponKind::AreaDamage, target), &area);
    if let Some(record) = state.replay.last_record_mut() {
        record.mark_destroyed(destroyed.iter().map(GeneralSnapshot::of));
    }
    Ok(())
}

/// Attack buff anchored at `target`.
///
/// # Errors
///
/// Fails when the target is off the board or the weapon is not ready.
pub fn attack_buff(state: &mut GameState, player: PlayerId, target: Coord) -> ActionResult {
    ensure_ready(state, player)?;
    state.cell(target)?;
    arm(state, player, WeaponKind::AttackBuff, target);
    state.record(Some(player), action(WeaponKind::AttackBuff, target), &[]);
    Ok(())
}

/// Stun field anchored at `target`.
///
/// # Errors
///
/// Fails when the target is off the board or the weapon is not ready.
pub fn stun(state: &mut GameState, player: PlayerId, target: Coord) -> ActionResult {
    ensure_ready(state, player)?;
    state.cell(target)?;
    arm(state, player, WeaponKind::Stun, target);
    state.record(Some(player), action(WeaponKind::Stun, target), &[]);
    Ok(())
}

/// Teleport all but one unit from `origin` to `destination`.
///
/// The destination's previous army is replaced, not fought. The landing cell
/// is locked for the teleporting player while the effect lasts.
///
/// # Errors
///
/// Fails when either cell is off the board, the origin is not owned, the
/// destination holds a General, the origin has fewer than two units, or the
/// weapon is not ready.
pub fn teleport(
    state: &mut GameState,
    player: PlayerId,
    origin: Coord,
    destination: Coord,
) -> ActionResult {
    check_player(player)?;
    let from = *state.cell(origin)?;
    let to = *state.cell(destination)?;
    ensure_ready(state, player)?;
    if from.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    if to.general.is_some() {
        return Err(ActionError::GeneralOccupied);
    }
    if from.army <= GARRISON {
        return Err(ActionError::InsufficientArmy);
    }

    let moved = from.army - GARRISON;
    arm(state, player, WeaponKind::Teleport, destination);
    if let Some(cell) = state.board.get_mut(origin) {
        cell.army = GARRISON;
    }
    if let Some(cell) = state.board.get_mut(destination) {
        cell.army = moved;
        cell.owner = Some(player);
    }

    let act = vec![
        6,
        i64::from(WeaponKind::Teleport.replay_type()),
        i64::from(destination.row),
        i64::from(destination.col),
        i64::from(origin.row),
        i64::from(origin.col),
    ];
    state.record(Some(player), act, &[origin, destination]);
    Ok(())
}
