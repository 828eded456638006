//! End-of-round processing.
//!
//! Runs once after both seats have acted. Order matters and is fixed:
//! per-cell production, growth and bog drain in row-major order; then
//! recurring area damage; then every timer; then the tick record.

use std::collections::BTreeSet;

use tracing::trace;

use crate::game::rules::{BOG_DRAIN, GROWTH_INTERVAL, weapon};
use crate::game::{Coord, GameState, GeneralKind, Terrain, WeaponKind};
use crate::replay::TICK_ACTION;

/// Per-cell production, growth and bog drain.
fn produce(state: &mut GameState, changed: &mut BTreeSet<Coord>) {
    let growth = state.round % GROWTH_INTERVAL == 0;
    for coord in state.board.coords() {
        if let Some(general) = state.general_at_mut(coord) {
            general.rest_move = general.mobility;
            let (kind, owner, production) = (general.kind, general.owner, general.production);
            match (kind, owner) {
                (GeneralKind::Main, _) | (GeneralKind::Sub, Some(_)) => {
                    if let Some(cell) = state.board.get_mut(coord) {
                        cell.army += production;
                    }
                    changed.insert(coord);
                }
                (GeneralKind::Farmer, Some(owner)) => {
                    state.coins[usize::from(owner)] += production;
                }
                (GeneralKind::Sub | GeneralKind::Farmer, None) => {}
            }
        }

        let Some(cell) = state.board.get_mut(coord) else {
            continue;
        };
        let Some(owner) = cell.owner else {
            continue;
        };
        if growth {
            cell.army += 1;
            changed.insert(coord);
        }
        if cell.terrain == Terrain::Bog
            && cell.army > 0
            && !state.tech[usize::from(owner)].bog_immunity
        {
            cell.army -= BOG_DRAIN;
            cell.neutralize_if_empty();
            changed.insert(coord);
        }
    }
}

/// Recurring damage from every active area-damage effect.
fn burn(state: &mut GameState, changed: &mut BTreeSet<Coord>) {
    let centers: Vec<Coord> = state
        .weapons
        .iter()
        .filter(|w| w.kind == WeaponKind::AreaDamage)
        .map(|w| w.position)
        .collect();
    for center in centers {
        for coord in state.board.area(center, weapon::AREA_RADIUS) {
            let Some(cell) = state.board.get_mut(coord) else {
                continue;
            };
            if cell.army > 0 {
                cell.army = cell.army.saturating_sub(weapon::AREA_DAMAGE_TICK);
                cell.neutralize_if_empty();
                changed.insert(coord);
            }
        }
    }
}

/// Count down every timer and restore per-round movement.
fn tick_timers(state: &mut GameState) {
    for cd in state.weapon_cooldowns.iter_mut().flatten() {
        *cd = cd.saturating_sub(1);
    }
    for w in &mut state.weapons {
        w.rest = w.rest.saturating_sub(1);
    }
    for general in state.generals_mut() {
        general.tick();
    }
    state.rest_move_step = state.tech.map(|t| t.movement);
}

/// Advance the world by one round.
///
/// Emits a tick record listing every cell whose army or owner the pass
/// touched, drops expired super-weapons, and increments the round counter.
pub fn end_round(state: &mut GameState) {
    let mut changed = BTreeSet::new();
    produce(state, &mut changed);
    burn(state, &mut changed);
    tick_timers(state);

    let cells: Vec<Coord> = changed.into_iter().collect();
    trace!(round = state.round, changed = cells.len(), "round ended");
    state.record(None, vec![TICK_ACTION], &cells);

    state.weapons.retain(|w| w.rest > 0);
    state.round += 1;
}
