//! Coin sinks: General stat upgrades, global tech, and calling new Generals.

use crate::error::{ActionError, ActionResult};
use crate::game::rules::{
    CALL_GENERAL_COST, defense_upgrade, mobility_upgrade, movement_upgrade, production_upgrade,
    tech, weapon,
};
use crate::game::state::check_player;
use crate::game::weapons::ensure_not_stunned;
use crate::game::{Coord, GameState, GeneralKind, PlayerId, Stat, TechTrack};

/// Raise one stat of the General on `origin` by one tier.
///
/// Mobility upgrades also grant the extra movement for the current round.
///
/// # Errors
///
/// Fails when the cell is off the board or not owned, has no General, is
/// stunned, the stat is at its ceiling (or is Farmer mobility), or the
/// player cannot pay.
pub fn level_up(state: &mut GameState, player: PlayerId, origin: Coord, stat: Stat) -> ActionResult {
    check_player(player)?;
    let cell = state.cell(origin)?;
    if cell.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    let general = state.general_at(origin).ok_or(ActionError::NoGeneral)?;
    let (id, kind) = (general.id, general.kind);
    ensure_not_stunned(state, player, &[origin])?;

    let cost = match stat {
        Stat::Production => production_upgrade(kind, general.production).map(|t| t.cost),
        Stat::Defense => defense_upgrade(kind, general.defense).map(|t| t.cost),
        Stat::Mobility if kind == GeneralKind::Farmer => {
            return Err(ActionError::NotUpgradable);
        }
        Stat::Mobility => mobility_upgrade(kind, general.mobility).map(|t| t.cost),
    }
    .ok_or(ActionError::MaxTier)?;
    state.ensure_coins(player, cost)?;

    if let Some(general) = state.general_mut(id) {
        match stat {
            Stat::Production => {
                if let Some(t) = production_upgrade(kind, general.production) {
                    general.production = t.to;
                }
            }
            Stat::Defense => {
                if let Some(t) = defense_upgrade(kind, general.defense) {
                    general.defense = t.to;
                }
            }
            Stat::Mobility => {
                if let Some(t) = mobility_upgrade(kind, general.mobility) {
                    general.rest_move += t.to - t.from;
                    general.mobility = t.to;
                }
            }
        }
    }
    state.spend(player, cost);
    state.record(Some(player), vec![3, i64::from(id), stat.code()], &[]);
    Ok(())
}

/// Buy the next level of a global tech track.
///
/// Movement upgrades take effect this round. Unlocking super-weapons starts
/// their cooldown at ten rounds.
///
/// # Errors
///
/// Fails when the track is maxed or the player cannot pay.
pub fn upgrade_tech(state: &mut GameState, player: PlayerId, track: TechTrack) -> ActionResult {
    check_player(player)?;
    let seat = usize::from(player);
    let levels = state.tech[seat];
    let cost = match track {
        TechTrack::Movement => movement_upgrade(levels.movement).map(|t| t.cost),
        TechTrack::Climbing => (!levels.climbing).then_some(tech::CLIMBING_COST),
        TechTrack::BogImmunity => (!levels.bog_immunity).then_some(tech::BOG_IMMUNITY_COST),
        TechTrack::SuperWeapon => (!levels.super_weapon).then_some(tech::SUPER_WEAPON_COST),
    }
    .ok_or(ActionError::MaxTier)?;
    state.ensure_coins(player, cost)?;

    match track {
        TechTrack::Movement => {
            if let Some(t) = movement_upgrade(levels.movement) {
                state.tech[seat].movement = t.to;
                state.rest_move_step[seat] += t.to - t.from;
            }
        }
        TechTrack::Climbing => state.tech[seat].climbing = true,
        TechTrack::BogImmunity => state.tech[seat].bog_immunity = true,
        TechTrack::SuperWeapon => {
            state.tech[seat].super_weapon = true;
            state.weapon_cooldowns[seat] = Some(weapon::START_COOLDOWN);
        }
    }
    state.spend(player, cost);
    state.record(Some(player), vec![5, track.code()], &[]);
    Ok(())
}

/// Spawn a new Sub General on an owned, empty cell for 50 coin.
///
/// # Errors
///
/// Fails when the cell is off the board or not owned, already holds a
/// General, is stunned, or the player cannot pay.
pub fn call_general(state: &mut GameState, player: PlayerId, coord: Coord) -> ActionResult {
    check_player(player)?;
    state.ensure_coins(player, CALL_GENERAL_COST)?;
    let cell = state.cell(coord)?;
    if cell.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    if cell.general.is_some() {
        return Err(ActionError::GeneralOccupied);
    }
    ensure_not_stunned(state, player, &[coord])?;

    state
        .add_general(GeneralKind::Sub, Some(player), coord)
        .ok_or(ActionError::GeneralOccupied)?;
    state.spend(player, CALL_GENERAL_COST);
    state.record(
        Some(player),
        vec![7, i64::from(coord.row), i64::from(coord.col)],
        &[],
    );
    Ok(())
}
