//! General skills.
//!
//! Each skill owns one cooldown slot on the General. Rush and breakthrough
//! target a cell within two steps; the three auras start a ten-round timer
//! read by combat math.

use crate::error::{ActionError, ActionResult};
use crate::game::combat::{attack_multiplier, combat_value, defense_multiplier, resolve_attack};
use crate::game::rules::{GARRISON, skill};
use crate::game::state::check_player;
use crate::game::weapons::ensure_not_stunned;
use crate::game::{Coord, GameState, PlayerId, SkillKind};

impl SkillKind {
    /// Coin cost.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Rush => skill::RUSH_COST,
            Self::Breakthrough => skill::BREAKTHROUGH_COST,
            Self::Command | Self::Defense | Self::Weaken => skill::AURA_COST,
        }
    }

    /// Cooldown set after use.
    #[must_use]
    pub const fn cooldown(self) -> u32 {
        match self {
            Self::Rush => skill::RUSH_COOLDOWN,
            Self::Breakthrough => skill::BREAKTHROUGH_COOLDOWN,
            Self::Command | Self::Defense | Self::Weaken => skill::AURA_COOLDOWN,
        }
    }
}

/// Rush legality beyond the shared checks.
fn check_rush(state: &GameState, player: PlayerId, origin: Coord, target: Coord) -> ActionResult {
    let from = state.cell(origin)?;
    let to = state.cell(target)?;
    if to.general.is_some() {
        return Err(ActionError::GeneralOccupied);
    }
    if from.army <= GARRISON {
        return Err(ActionError::InsufficientArmy);
    }
    if to.owner.is_some_and(|owner| owner != player) {
        let vs = combat_value(
            from.army - GARRISON,
            attack_multiplier(state, origin),
            to.army,
            defense_multiplier(state, target),
        );
        if vs <= 0.0 {
            return Err(ActionError::CombatNotFavorable);
        }
    }
    Ok(())
}

fn rush(state: &mut GameState, player: PlayerId, origin: Coord, target: Coord) {
    let amount = state.board.get(origin).map_or(0, |c| c.army - GARRISON);
    let target_owner = state.board.get(target).and_then(|c| c.owner);
    match target_owner {
        Some(owner) if owner != player => resolve_attack(state, player, origin, target, amount),
        _ => {
            if let Some(cell) = state.board.get_mut(target) {
                cell.army += amount;
                cell.owner = Some(player);
            }
        }
    }
    if let Some(cell) = state.board.get_mut(origin) {
        cell.army -= amount;
    }
    if let Some(id) = state.board.get(origin).and_then(|c| c.general) {
        state.relocate_general(id, target);
    }
}

fn breakthrough(state: &mut GameState, target: Coord) {
    if let Some(cell) = state.board.get_mut(target) {
        cell.army = cell.army.saturating_sub(skill::BREAKTHROUGH_DAMAGE);
        cell.neutralize_if_empty();
    }
}

/// Activate `skill` with the General on `origin`.
///
/// Rush moves all but one unit into the target (fighting if it is enemy
/// held) and the General follows. Breakthrough removes 20 army from the
/// target. The aura skills start a timer on the General.
///
/// # Errors
///
/// Fails on bad coordinates, ownership, a missing General, a stun, a missing
/// or too-distant target for rush and breakthrough, insufficient coin, an
/// active cooldown, or a failed rush precondition.
pub fn activate_skill(
    state: &mut GameState,
    player: PlayerId,
    origin: Coord,
    skill_kind: SkillKind,
    target: Option<Coord>,
) -> ActionResult {
    check_player(player)?;
    let from = state.cell(origin)?;
    let target = if skill_kind.needs_target() {
        let target = target.ok_or(ActionError::MissingTarget)?;
        state.cell(target)?;
        if origin.chebyshev(target) > skill::RANGE {
            return Err(ActionError::OutOfRange);
        }
        Some(target)
    } else {
        None
    };
    if from.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    let general = state.general_at(origin).ok_or(ActionError::NoGeneral)?;
    let id = general.id;
    let cooling = general.cooldowns[skill_kind.slot()] > 0;
    let mut touched = vec![origin];
    touched.extend(target);
    ensure_not_stunned(state, player, &touched)?;
    if let (SkillKind::Rush, Some(target)) = (skill_kind, target) {
        check_rush(state, player, origin, target)?;
    }
    state.ensure_coins(player, skill_kind.cost())?;
    if cooling {
        return Err(ActionError::SkillCoolingDown);
    }

    let mut action = vec![4, i64::from(id), skill_kind.code()];
    let cells = match (skill_kind, target) {
        (SkillKind::Rush, Some(target)) => {
            rush(state, player, origin, target);
            vec![origin, target]
        }
        (SkillKind::Breakthrough, Some(target)) => {
            breakthrough(state, target);
            vec![target]
        }
        _ => Vec::new(),
    };
    if let Some(target) = target {
        action.extend([i64::from(target.row), i64::from(target.col)]);
    }

    if let Some(general) = state.general_mut(id) {
        general.cooldowns[skill_kind.slot()] = skill_kind.cooldown();
        if let Some(buff) = skill_kind.buff() {
            general.durations[buff.slot()] = skill::AURA_DURATION;
        }
    }
    state.spend(player, skill_kind.cost());
    state.record(Some(player), action, &cells);
    Ok(())
}
