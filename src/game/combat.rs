//! Combat math.
//!
//! A cell's attack and defense start at 1.0 and are scaled by every aura in
//! its 5x5 neighbourhood, by the defense level of a General standing on it,
//! and at most once by a friendly attack-buff super-weapon.

use std::cmp::Ordering;

use crate::game::rules::{ATTACK_BUFF_BONUS, AURA_BONUS, AURA_RADIUS, WEAKEN_PENALTY};
use crate::game::{Buff, Coord, GameState, PlayerId, WeaponKind};

/// Which side of a fight a multiplier is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Attack,
    Defense,
}

fn multiplier(state: &GameState, coord: Coord, side: Side) -> f64 {
    let Some(cell) = state.board.get(coord) else {
        return 1.0;
    };
    let mut value = 1.0;

    let friendly_buff = match side {
        Side::Attack => Buff::Command,
        Side::Defense => Buff::Defense,
    };
    for near in state.board.area(coord, AURA_RADIUS) {
        let Some(general) = state.general_at(near) else {
            continue;
        };
        let near_owner = state.board.get(near).and_then(|c| c.owner);
        if near_owner == cell.owner {
            if general.has_buff(friendly_buff) {
                value *= AURA_BONUS;
            }
        } else if general.has_buff(Buff::Weaken) {
            value *= WEAKEN_PENALTY;
        }
    }

    if side == Side::Defense {
        if let Some(general) = state.general_at(coord) {
            value *= general.defense.factor();
        }
    }

    let buffed = state.weapons.iter().any(|w| {
        w.kind == WeaponKind::AttackBuff
            && Some(w.owner) == cell.owner
            && w.position.chebyshev(coord) <= 1
    });
    if buffed {
        value *= ATTACK_BUFF_BONUS;
    }

    value
}

/// Attack multiplier of armies leaving `coord`.
#[must_use]
pub fn attack_multiplier(state: &GameState, coord: Coord) -> f64 {
    multiplier(state, coord, Side::Attack)
}

/// Defense multiplier of armies holding `coord`.
#[must_use]
pub fn defense_multiplier(state: &GameState, coord: Coord) -> f64 {
    multiplier(state, coord, Side::Defense)
}

/// Outcome of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clash {
    /// Attacker takes the cell with this much army left.
    Captured(u32),
    /// Defender holds with this much army left.
    Repelled(u32),
    /// Both sides are wiped out.
    Stalemate,
}

/// Signed combat value `amount * attack - defenders * defense`.
#[must_use]
pub fn combat_value(amount: u32, attack: f64, defenders: u32, defense: f64) -> f64 {
    f64::from(amount) * attack - f64::from(defenders) * defense
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_army(value: f64) -> u32 {
    value.ceil() as u32
}

/// Resolve an attack of `amount` units into `defenders` units.
///
/// Survivors are scaled back by the winner's multiplier and rounded up.
#[must_use]
pub fn clash(amount: u32, attack: f64, defenders: u32, defense: f64) -> Clash {
    let vs = combat_value(amount, attack, defenders, defense);
    match vs.partial_cmp(&0.0) {
        Some(Ordering::Greater) => Clash::Captured(ceil_army(vs / attack)),
        Some(Ordering::Less) => Clash::Repelled(ceil_army(-vs / defense)),
        _ => Clash::Stalemate,
    }
}

/// Apply an attack from `origin` into a cell not owned by `player`.
///
/// The caller has already removed `amount` from the origin and checked
/// legality. Multipliers are read before anything changes.
pub(crate) fn resolve_attack(
    state: &mut GameState,
    player: PlayerId,
    origin: Coord,
    target: Coord,
    amount: u32,
) {
    let attack = attack_multiplier(state, origin);
    let defense = defense_multiplier(state, target);
    let defenders = state.board.get(target).map_or(0, |c| c.army);
    let outcome = clash(amount, attack, defenders, defense);

    let captured_general = match outcome {
        Clash::Captured(_) => state.board.get(target).and_then(|c| c.general),
        Clash::Repelled(_) | Clash::Stalemate => None,
    };
    if let Some(cell) = state.board.get_mut(target) {
        match outcome {
            Clash::Captured(left) => {
                cell.owner = Some(player);
                cell.army = left;
            }
            Clash::Repelled(left) => cell.army = left,
            Clash::Stalemate => {
                cell.army = 0;
                cell.neutralize_if_empty();
            }
        }
    }
    if let Some(general) = captured_general.and_then(|id| state.general_mut(id)) {
        general.owner = Some(player);
    }
}
