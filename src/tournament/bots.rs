//! Built-in baseline policies.

use crate::game::{
    Coord, Direction, GameState, GeneralKind, PlayerId, Terrain, attack_multiplier,
    combat_value, defense_multiplier,
};
use crate::protocol::{ProtocolError, parse_commands};
use crate::tournament::Policy;
use crate::tournament::mapgen::Rng;

const END: [i64; 1] = [8];

fn end_turn() -> Vec<Vec<i64>> {
    vec![END.to_vec()]
}

fn move_army(origin: Coord, direction: Direction, amount: u32) -> Vec<i64> {
    vec![
        1,
        i64::from(origin.row),
        i64::from(origin.col),
        direction.code(),
        i64::from(amount),
    ]
}

fn main_position(state: &GameState, seat: PlayerId) -> Option<Coord> {
    state
        .generals()
        .iter()
        .find(|g| g.kind == GeneralKind::Main && g.owner == Some(seat))
        .map(|g| g.position)
}

/// Ends every turn without acting.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn name(&self) -> &str {
        "idle"
    }

    fn plan_turn(&mut self, _round: u32, _seat: PlayerId, _state: &GameState) -> Vec<Vec<i64>> {
        end_turn()
    }
}

/// Adjacent-capture baseline.
///
/// Sends up to three units from the Main General's cell into the neighbour
/// with the best winning combat value. Falls back to an empty neutral cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn plan_turn(&mut self, _round: u32, seat: PlayerId, state: &GameState) -> Vec<Vec<i64>> {
        let Some(origin) = main_position(state, seat) else {
            return end_turn();
        };
        let army = state.board.get(origin).map_or(0, |c| c.army);
        if army <= 1 || state.rest_move_step[usize::from(seat)] == 0 {
            return end_turn();
        }

        let climbing = state.tech[usize::from(seat)].climbing;
        let attack = attack_multiplier(state, origin);
        let mut best: Option<(Direction, u32)> = None;
        let mut best_value = 0.0;
        for direction in Direction::ALL {
            let Some(target) = origin.step(direction) else {
                continue;
            };
            let Some(cell) = state.board.get(target) else {
                continue;
            };
            if cell.terrain == Terrain::Mountain && !climbing {
                continue;
            }
            if cell.owner != Some(seat) {
                let defense = defense_multiplier(state, target);
                for amount in 1..=(army - 1).min(3) {
                    let value = combat_value(amount, attack, cell.army, defense);
                    if value > best_value {
                        best_value = value;
                        best = Some((direction, amount));
                    }
                }
            }
            if cell.owner.is_none() && cell.army == 0 && best.is_none() {
                best = Some((direction, 1));
                best_value = 1.0;
            }
        }

        let mut commands = Vec::new();
        if let Some((direction, amount)) = best {
            commands.push(move_army(origin, direction, amount));
        }
        commands.push(END.to_vec());
        commands
    }
}

/// Moves one unit from the Main General's cell in a seeded random direction.
#[derive(Debug, Clone, Copy)]
pub struct RandomPolicy {
    rng: Rng,
}

impl RandomPolicy {
    /// Create a policy with its own seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn plan_turn(&mut self, _round: u32, seat: PlayerId, state: &GameState) -> Vec<Vec<i64>> {
        let Some(origin) = main_position(state, seat) else {
            return end_turn();
        };
        let army = state.board.get(origin).map_or(0, |c| c.army);
        if army <= 1 || state.rest_move_step[usize::from(seat)] == 0 {
            return end_turn();
        }
        let direction = Direction::ALL[self.rng.next_u32(4) as usize];
        vec![move_army(origin, direction, 1), END.to_vec()]
    }
}

/// Replays fixed command lists, one per round.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    name: String,
    turns: Vec<Vec<Vec<i64>>>,
}

impl ScriptedPolicy {
    /// Create a policy from per-round command lists.
    #[must_use]
    pub fn new(name: impl Into<String>, turns: Vec<Vec<Vec<i64>>>) -> Self {
        Self {
            name: name.into(),
            turns,
        }
    }

    /// Parse command text where a line `8` closes each round's list.
    ///
    /// # Errors
    ///
    /// Fails on non-integer tokens.
    pub fn from_text(name: impl Into<String>, text: &str) -> Result<Self, ProtocolError> {
        let mut turns = vec![Vec::new()];
        for command in parse_commands(text)? {
            if command == END {
                turns.push(Vec::new());
            } else if let Some(current) = turns.last_mut() {
                current.push(command);
            }
        }
        if turns.last().is_some_and(Vec::is_empty) {
            turns.pop();
        }
        Ok(Self::new(name, turns))
    }

    /// Number of scripted rounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan_turn(&mut self, round: u32, _seat: PlayerId, _state: &GameState) -> Vec<Vec<i64>> {
        let idx = round.saturating_sub(1) as usize;
        self.turns.get(idx).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn state_with_main(army: u32) -> GameState {
        let mut s = GameState::new(Board::new(5, 5).unwrap());
        let cell = s.board.get_mut(Coord::new(2, 2)).unwrap();
        cell.owner = Some(0);
        cell.army = army;
        s.add_general(GeneralKind::Main, Some(0), Coord::new(2, 2)).unwrap();
        s
    }

    #[test]
    fn test_idle_ends_turn() {
        let s = state_with_main(5);
        assert_eq!(IdlePolicy.plan_turn(1, 0, &s), vec![vec![8]]);
    }

    #[test]
    fn test_greedy_picks_weakest_enemy() {
        let mut s = state_with_main(6);
        let up = s.board.get_mut(Coord::new(1, 2)).unwrap();
        up.owner = Some(1);
        up.army = 1;
        let right = s.board.get_mut(Coord::new(2, 3)).unwrap();
        right.army = 4;
        for coord in [Coord::new(3, 2), Coord::new(2, 1)] {
            let own = s.board.get_mut(coord).unwrap();
            own.owner = Some(0);
            own.army = 1;
        }
        let plan = GreedyPolicy.plan_turn(1, 0, &s);
        assert_eq!(plan, vec![vec![1, 2, 2, 1, 3], vec![8]]);
    }

    #[test]
    fn test_greedy_without_army_ends_turn() {
        let s = state_with_main(1);
        assert_eq!(GreedyPolicy.plan_turn(1, 0, &s), vec![vec![8]]);
        assert_eq!(GreedyPolicy.plan_turn(1, 1, &s), vec![vec![8]]);
    }

    #[test]
    fn test_random_is_seeded() {
        let s = state_with_main(3);
        let mut a = RandomPolicy::new(11);
        let mut b = RandomPolicy::new(11);
        for round in 1..10 {
            let plan = a.plan_turn(round, 0, &s);
            assert_eq!(plan, b.plan_turn(round, 0, &s));
            assert_eq!(plan.len(), 2);
            assert_eq!(plan[0][4], 1);
        }
    }

    #[test]
    fn test_script_split_by_end_turn() {
        let text = "1 0 0 4 1\n5 1\n8\n\n8\n7 2 2\n";
        let mut script = ScriptedPolicy::from_text("s", text).unwrap();
        let s = state_with_main(1);
        assert_eq!(script.len(), 3);
        assert_eq!(script.plan_turn(1, 0, &s), vec![vec![1, 0, 0, 4, 1], vec![5, 1]]);
        assert!(script.plan_turn(2, 0, &s).is_empty());
        assert_eq!(script.plan_turn(3, 0, &s), vec![vec![7, 2, 2]]);
        assert!(script.plan_turn(4, 0, &s).is_empty());
    }
}
