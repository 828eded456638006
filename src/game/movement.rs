//! Army and General movement.

use std::collections::VecDeque;

use crate::error::{ActionError, ActionResult};
use crate::game::combat::resolve_attack;
use crate::game::rules::GARRISON;
use crate::game::state::check_player;
use crate::game::weapons::ensure_not_stunned;
use crate::game::{Coord, Direction, GameState, PlayerId, Terrain};

/// Whether `player` may enter `coord` given its terrain.
fn passable(state: &GameState, player: PlayerId, coord: Coord) -> bool {
    state.board.get(coord).is_some_and(|cell| {
        cell.terrain != Terrain::Mountain || state.tech[usize::from(player)].climbing
    })
}

/// Move `amount` units from `origin` one step in `direction`.
///
/// `amount` is clamped so that one unit stays behind. Moving into an owned
/// cell merges armies; any other destination is attacked.
///
/// # Errors
///
/// Fails when the origin is off the board or not owned, holds a single unit,
/// the player has no moves left, `amount` is not positive, either end is
/// stunned, the destination is off the board, or it is a mountain without
/// climbing tech.
pub fn army_move(
    state: &mut GameState,
    player: PlayerId,
    origin: Coord,
    direction: Direction,
    amount: i64,
) -> ActionResult {
    check_player(player)?;
    let from = *state.cell(origin)?;
    if from.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    if state.rest_move_step[usize::from(player)] == 0 {
        return Err(ActionError::NoMovesLeft);
    }
    if from.army <= GARRISON {
        return Err(ActionError::InsufficientArmy);
    }
    if amount <= 0 {
        return Err(ActionError::InvalidAmount);
    }
    let destination = origin
        .step(direction)
        .filter(|c| state.board.in_bounds(*c))
        .ok_or(ActionError::OutOfBounds)?;
    ensure_not_stunned(state, player, &[origin, destination])?;
    if !passable(state, player, destination) {
        return Err(ActionError::MountainBlocked);
    }

    let available = from.army - GARRISON;
    let amount = u32::try_from(amount).map_or(available, |a| a.min(available));

    let target_owner = state.cell(destination)?.owner;
    if target_owner == Some(player) {
        if let Some(cell) = state.board.get_mut(destination) {
            cell.army += amount;
        }
    } else {
        resolve_attack(state, player, origin, destination, amount);
    }
    if let Some(cell) = state.board.get_mut(origin) {
        cell.army -= amount;
    }
    state.rest_move_step[usize::from(player)] -= 1;

    let act = vec![
        1,
        i64::from(origin.row),
        i64::from(origin.col),
        direction.code(),
        i64::from(amount),
    ];
    state.record(Some(player), act, &[origin, destination]);
    Ok(())
}

/// Check that the General on `origin` can walk to `destination` this round.
///
/// Reachability is a breadth-first search over owned, General-free cells
/// (mountains only with climbing tech), cut off at the General's remaining
/// movement budget.
///
/// # Errors
///
/// Fails on bad coordinates or ownership, a missing General, an occupied
/// destination, a stun on either end, or when the destination is out of
/// reach.
pub fn check_general_movement(
    state: &GameState,
    player: PlayerId,
    origin: Coord,
    destination: Coord,
) -> ActionResult {
    check_player(player)?;
    let from = state.cell(origin)?;
    let to = state.cell(destination)?;
    if from.owner != Some(player) {
        return Err(ActionError::NotOwner);
    }
    let general = state.general_at(origin).ok_or(ActionError::NoGeneral)?;
    if to.general.is_some() {
        return Err(ActionError::GeneralOccupied);
    }
    ensure_not_stunned(state, player, &[origin, destination])?;

    let budget = general.rest_move;
    let cols = usize::from(state.board.cols());
    let index = |c: Coord| usize::from(c.row) * cols + usize::from(c.col);
    let mut steps: Vec<Option<u32>> = vec![None; state.board.cells().len()];
    let mut queue = VecDeque::new();
    steps[index(origin)] = Some(0);
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        let depth = steps[index(current)].unwrap_or(0);
        if depth > budget {
            break;
        }
        if current == destination {
            return Ok(());
        }
        for next in state.board.neighbors(current) {
            if steps[index(next)].is_some() || !passable(state, player, next) {
                continue;
            }
            let Some(cell) = state.board.get(next) else {
                continue;
            };
            if cell.owner != Some(player) || cell.general.is_some() {
                continue;
            }
            steps[index(next)] = Some(depth + 1);
            queue.push_back(next);
        }
    }
    Err(ActionError::Unreachable)
}

/// Walk the General on `origin` to `destination`.
///
/// The General's budget is charged the Manhattan distance. If the origin is
/// left with no army it turns neutral.
///
/// # Errors
///
/// Same as [`check_general_movement`].
pub fn general_move(
    state: &mut GameState,
    player: PlayerId,
    origin: Coord,
    destination: Coord,
) -> ActionResult {
    check_general_movement(state, player, origin, destination)?;
    let Some(id) = state.board.get(origin).and_then(|c| c.general) else {
        return Err(ActionError::NoGeneral);
    };

    state.relocate_general(id, destination);
    if let Some(general) = state.general_mut(id) {
        general.rest_move = general.rest_move.saturating_sub(origin.manhattan(destination));
    }
    if let Some(cell) = state.board.get_mut(origin) {
        cell.neutralize_if_empty();
    }

    let act = vec![
        2,
        i64::from(id),
        i64::from(destination.row),
        i64::from(destination.col),
    ];
    state.record(Some(player), act, &[]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Buff, GeneralKind, SuperWeapon, WeaponKind};

    fn state() -> GameState {
        GameState::new(Board::new(15, 15).unwrap())
    }

    fn own(s: &mut GameState, coord: Coord, player: PlayerId, army: u32) {
        let cell = s.board.get_mut(coord).unwrap();
        cell.owner = Some(player);
        cell.army = army;
    }

    #[test]
    fn test_move_clamps_amount() {
        let mut s = state();
        own(&mut s, Coord::new(3, 3), 0, 10);
        army_move(&mut s, 0, Coord::new(3, 3), Direction::Right, 50).unwrap();
        assert_eq!(s.board.get(Coord::new(3, 3)).unwrap().army, 1);
        let dest = s.board.get(Coord::new(3, 4)).unwrap();
        assert_eq!((dest.owner, dest.army), (Some(0), 9));
        assert_eq!(s.rest_move_step[0], 1);
    }

    #[test]
    fn test_move_merges_into_own_cell() {
        let mut s = state();
        own(&mut s, Coord::new(3, 3), 0, 5);
        own(&mut s, Coord::new(2, 3), 0, 2);
        army_move(&mut s, 0, Coord::new(3, 3), Direction::Up, 3).unwrap();
        assert_eq!(s.board.get(Coord::new(2, 3)).unwrap().army, 5);
        assert_eq!(s.board.get(Coord::new(3, 3)).unwrap().army, 2);
    }

    #[test]
    fn test_move_rejections_leave_state_untouched() {
        let mut s = state();
        own(&mut s, Coord::new(0, 0), 0, 1);
        own(&mut s, Coord::new(5, 5), 0, 6);
        own(&mut s, Coord::new(7, 7), 1, 6);
        let before = s.board.clone();

        assert_eq!(
            army_move(&mut s, 0, Coord::new(0, 0), Direction::Down, 1),
            Err(ActionError::InsufficientArmy)
        );
        assert_eq!(
            army_move(&mut s, 0, Coord::new(7, 7), Direction::Down, 1),
            Err(ActionError::NotOwner)
        );
        assert_eq!(
            army_move(&mut s, 0, Coord::new(5, 5), Direction::Down, 0),
            Err(ActionError::InvalidAmount)
        );
        assert_eq!(
            army_move(&mut s, 0, Coord::new(15, 5), Direction::Down, 1),
            Err(ActionError::OutOfBounds)
        );
        s.board.get_mut(Coord::new(5, 6)).unwrap().terrain = Terrain::Mountain;
        assert_eq!(
            army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 2),
            Err(ActionError::MountainBlocked)
        );
        s.rest_move_step[0] = 0;
        assert_eq!(
            army_move(&mut s, 0, Coord::new(5, 5), Direction::Left, 2),
            Err(ActionError::NoMovesLeft)
        );
        assert_eq!(
            army_move(&mut s, 2, Coord::new(5, 5), Direction::Left, 2),
            Err(ActionError::InvalidPlayer)
        );
        s.board.get_mut(Coord::new(5, 6)).unwrap().terrain = Terrain::Plain;
        assert_eq!(s.board, before);
        assert!(s.replay.is_empty());
    }

    #[test]
    fn test_move_off_edge_rejected() {
        let mut s = state();
        own(&mut s, Coord::new(0, 4), 0, 4);
        assert_eq!(
            army_move(&mut s, 0, Coord::new(0, 4), Direction::Up, 1),
            Err(ActionError::OutOfBounds)
        );
        own(&mut s, Coord::new(14, 14), 0, 4);
        assert_eq!(
            army_move(&mut s, 0, Coord::new(14, 14), Direction::Right, 1),
            Err(ActionError::OutOfBounds)
        );
    }

    #[test]
    fn test_climbing_allows_mountain() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 4);
        s.board.get_mut(Coord::new(5, 6)).unwrap().terrain = Terrain::Mountain;
        s.tech[0].climbing = true;
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 2).unwrap();
        assert_eq!(s.board.get(Coord::new(5, 6)).unwrap().owner, Some(0));
    }

    #[test]
    fn test_buffed_capture_rounds_up() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 6);
        let id = s.add_general(GeneralKind::Sub, Some(0), Coord::new(5, 5)).unwrap();
        s.general_mut(id).unwrap().durations[Buff::Command.slot()] = 10;
        own(&mut s, Coord::new(5, 6), 1, 1);
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 5).unwrap();
        let dest = s.board.get(Coord::new(5, 6)).unwrap();
        // vs = 5 * 1.5 - 1 * 1.0 = 6.5, ceil(6.5 / 1.5) = 5
        assert_eq!((dest.owner, dest.army), (Some(0), 5));
    }

    #[test]
    fn test_capture_vs_five_at_one_and_half_attack() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 5);
        let id = s.add_general(GeneralKind::Sub, Some(0), Coord::new(5, 5)).unwrap();
        s.general_mut(id).unwrap().durations[Buff::Command.slot()] = 10;
        own(&mut s, Coord::new(5, 6), 1, 1);
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 5).unwrap();
        let dest = s.board.get(Coord::new(5, 6)).unwrap();
        // 4 units move: vs = 4 * 1.5 - 1 = 5, ceil(5 / 1.5) = 4
        assert_eq!((dest.owner, dest.army), (Some(0), 4));
    }

    #[test]
    fn test_capture_flips_general_owner() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 8);
        own(&mut s, Coord::new(5, 6), 1, 1);
        let farmer = s.add_general(GeneralKind::Farmer, Some(1), Coord::new(5, 6)).unwrap();
        s.general_mut(farmer).unwrap().defense = crate::game::DefenseLevel::TWO;
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 7).unwrap();
        let dest = s.board.get(Coord::new(5, 6)).unwrap();
        // vs = 7 - 1 * 2 = 5
        assert_eq!((dest.owner, dest.army), (Some(0), 5));
        assert_eq!(s.general(farmer).unwrap().owner, Some(0));
    }

    #[test]
    fn test_failed_attack_keeps_defender() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 4);
        own(&mut s, Coord::new(5, 6), 1, 10);
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 3).unwrap();
        let dest = s.board.get(Coord::new(5, 6)).unwrap();
        assert_eq!((dest.owner, dest.army), (Some(1), 7));
        assert_eq!(s.board.get(Coord::new(5, 5)).unwrap().army, 1);
    }

    #[test]
    fn test_stun_blocks_move() {
        let mut s = state();
        own(&mut s, Coord::new(5, 5), 0, 4);
        s.weapons.push(SuperWeapon::new(WeaponKind::Stun, 1, Coord::new(5, 7)));
        assert_eq!(
            army_move(&mut s, 0, Coord::new(5, 5), Direction::Right, 1),
            Err(ActionError::Stunned)
        );
        army_move(&mut s, 0, Coord::new(5, 5), Direction::Left, 1).unwrap();
    }

    fn walkway(s: &mut GameState, len: u16) -> Coord {
        for col in 0..len {
            own(s, Coord::new(4, col), 0, 1);
        }
        s.add_general(GeneralKind::Sub, Some(0), Coord::new(4, 0)).unwrap();
        Coord::new(4, 0)
    }

    #[test]
    fn test_general_reach_matches_budget() {
        let mut s = state();
        let origin = walkway(&mut s, 5);
        s.general_at_mut(origin).unwrap().rest_move = 2;
        assert!(check_general_movement(&s, 0, origin, Coord::new(4, 2)).is_ok());
        assert_eq!(
            check_general_movement(&s, 0, origin, Coord::new(4, 3)),
            Err(ActionError::Unreachable)
        );
    }

    #[test]
    fn test_general_blocked_by_mountain_and_enemy_cells() {
        let mut s = state();
        let origin = walkway(&mut s, 4);
        s.general_at_mut(origin).unwrap().rest_move = 4;
        s.board.get_mut(Coord::new(4, 1)).unwrap().terrain = Terrain::Mountain;
        assert_eq!(
            check_general_movement(&s, 0, origin, Coord::new(4, 3)),
            Err(ActionError::Unreachable)
        );
        s.tech[0].climbing = true;
        assert!(check_general_movement(&s, 0, origin, Coord::new(4, 3)).is_ok());
        s.board.get_mut(Coord::new(4, 2)).unwrap().owner = Some(1);
        assert_eq!(
            check_general_movement(&s, 0, origin, Coord::new(4, 3)),
            Err(ActionError::Unreachable)
        );
    }

    #[test]
    fn test_general_move_charges_distance() {
        let mut s = state();
        let origin = walkway(&mut s, 3);
        s.general_at_mut(origin).unwrap().rest_move = 2;
        s.board.get_mut(origin).unwrap().army = 0;
        general_move(&mut s, 0, origin, Coord::new(4, 2)).unwrap();
        let g = s.general_at(Coord::new(4, 2)).unwrap();
        assert_eq!(g.rest_move, 0);
        assert_eq!(g.position, Coord::new(4, 2));
        // empty origin goes neutral once the General leaves
        assert_eq!(s.board.get(origin).unwrap().owner, None);
        assert!(s.board.get(origin).unwrap().general.is_none());
    }

    #[test]
    fn test_general_move_rejections() {
        let mut s = state();
        let origin = walkway(&mut s, 3);
        s.add_general(GeneralKind::Farmer, Some(0), Coord::new(4, 2)).unwrap();
        assert_eq!(
            general_move(&mut s, 0, origin, Coord::new(4, 2)),
            Err(ActionError::GeneralOccupied)
        );
        assert_eq!(
            general_move(&mut s, 0, Coord::new(4, 1), Coord::new(4, 0)),
            Err(ActionError::NoGeneral)
        );
        assert_eq!(
            general_move(&mut s, 1, origin, Coord::new(4, 1)),
            Err(ActionError::NotOwner)
        );
    }
}
