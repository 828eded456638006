//! Generals and their per-kind stats.

use crate::game::{Coord, PlayerId};

/// Stable General identifier, assigned in creation order.
pub type GeneralId = u32;

/// Number of skill slots (cooldown vector length).
pub(crate) const SKILL_SLOTS: usize = 5;

/// Number of timed buff slots (duration vector length).
pub(crate) const BUFF_SLOTS: usize = 3;

/// The three General kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralKind {
    /// Losing it loses the match. Never unowned.
    Main,
    /// Capturable support General that produces army.
    Sub,
    /// Economy unit that produces coin.
    Farmer,
}

impl GeneralKind {
    /// Replay type code (1 = Main, 2 = Sub, 3 = Farmer).
    #[must_use]
    pub const fn replay_type(self) -> u8 {
        match self {
            Self::Main => 1,
            Self::Sub => 2,
            Self::Farmer => 3,
        }
    }
}

/// Defense level stored in half steps so that 1.5 is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefenseLevel(u8);

impl DefenseLevel {
    /// Level 1.
    pub const ONE: Self = Self(2);
    /// Level 1.5, Farmer only.
    pub const ONE_AND_HALF: Self = Self(3);
    /// Level 2.
    pub const TWO: Self = Self(4);
    /// Level 3.
    pub const THREE: Self = Self(6);

    /// Defense multiplier.
    #[must_use]
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Level in half steps.
    #[must_use]
    pub const fn halves(self) -> u8 {
        self.0
    }
}

/// Stat track addressed by the level-up command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// Per-round army or coin yield.
    Production,
    /// Defense multiplier.
    Defense,
    /// Movement budget per round.
    Mobility,
}

impl Stat {
    /// Decode a level-up sub-code (1 = production, 2 = defense, 3 = mobility).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Production),
            2 => Some(Self::Defense),
            3 => Some(Self::Mobility),
            _ => None,
        }
    }

    /// Sub-code of this stat.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Production => 1,
            Self::Defense => 2,
            Self::Mobility => 3,
        }
    }
}

/// General skills, one per cooldown slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillKind {
    /// Charge into a cell up to two away, bringing the army along.
    Rush,
    /// Strip 20 army from a cell up to two away.
    Breakthrough,
    /// Attack aura for friendly cells nearby.
    Command,
    /// Defense aura for friendly cells nearby.
    Defense,
    /// Weakening aura against enemy cells nearby.
    Weaken,
}

impl SkillKind {
    /// Decode a skill sub-code (1..=5).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Rush),
            2 => Some(Self::Breakthrough),
            3 => Some(Self::Command),
            4 => Some(Self::Defense),
            5 => Some(Self::Weaken),
            _ => None,
        }
    }

    /// Sub-code of this skill.
    #[must_use]
    pub const fn code(self) -> i64 {
        self.slot() as i64 + 1
    }

    /// Cooldown slot index.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Rush => 0,
            Self::Breakthrough => 1,
            Self::Command => 2,
            Self::Defense => 3,
            Self::Weaken => 4,
        }
    }

    /// Whether the skill needs a target cell.
    #[must_use]
    pub const fn needs_target(self) -> bool {
        matches!(self, Self::Rush | Self::Breakthrough)
    }

    /// Timed buff started by this skill, if any.
    #[must_use]
    pub const fn buff(self) -> Option<Buff> {
        match self {
            Self::Command => Some(Buff::Command),
            Self::Defense => Some(Buff::Defense),
            Self::Weaken => Some(Buff::Weaken),
            Self::Rush | Self::Breakthrough => None,
        }
    }
}

/// Timed aura slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buff {
    /// x1.5 attack on friendly cells nearby.
    Command,
    /// x1.5 defense on friendly cells nearby.
    Defense,
    /// x0.75 attack and defense on enemy cells nearby.
    Weaken,
}

impl Buff {
    /// Duration slot index.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Command => 0,
            Self::Defense => 1,
            Self::Weaken => 2,
        }
    }
}

/// A General on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct General {
    /// Unique id.
    pub id: GeneralId,
    /// Kind tag.
    pub kind: GeneralKind,
    /// Owning seat, `None` for unclaimed Sub and Farmer Generals.
    pub owner: Option<PlayerId>,
    /// Cell this General stands on.
    pub position: Coord,
    /// Army (or coin, for Farmers) produced per round.
    pub production: u32,
    /// Defense multiplier of the General's cell.
    pub defense: DefenseLevel,
    /// Movement budget restored each round.
    pub mobility: u32,
    /// Movement left this round.
    pub rest_move: u32,
    /// Rounds until each skill is ready again.
    pub cooldowns: [u32; SKILL_SLOTS],
    /// Rounds left on each timed aura.
    pub durations: [u32; BUFF_SLOTS],
}

impl General {
    /// Create a General with all stats at level 1.
    #[must_use]
    pub const fn new(
        id: GeneralId,
        kind: GeneralKind,
        owner: Option<PlayerId>,
        position: Coord,
    ) -> Self {
        Self {
            id,
            kind,
            owner,
            position,
            production: 1,
            defense: DefenseLevel::ONE,
            mobility: 1,
            rest_move: 1,
            cooldowns: [0; SKILL_SLOTS],
            durations: [0; BUFF_SLOTS],
        }
    }

    /// Whether a timed aura is running.
    #[must_use]
    pub const fn has_buff(&self, buff: Buff) -> bool {
        self.durations[buff.slot()] > 0
    }

    /// Count down cooldowns and aura durations by one round.
    pub fn tick(&mut self) {
        for cd in &mut self.cooldowns {
            *cd = cd.saturating_sub(1);
        }
        for rest in &mut self.durations {
            *rest = rest.saturating_sub(1);
        }
    }

    /// Display tiers `[production, defense, mobility]` used by replays.
    #[must_use]
    pub const fn level_tiers(&self) -> [u32; 3] {
        let defense = match self.kind {
            GeneralKind::Farmer => match self.defense.halves() {
                0..=2 => 1,
                3 => 2,
                4 => 3,
                _ => 4,
            },
            GeneralKind::Main | GeneralKind::Sub => self.defense.halves() as u32 / 2,
        };
        [self.production / 2 + 1, defense, self.mobility / 2 + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_general_defaults() {
        let g = General::new(0, GeneralKind::Sub, None, Coord::new(1, 1));
        assert_eq!(g.production, 1);
        assert_eq!(g.defense, DefenseLevel::ONE);
        assert_eq!(g.mobility, 1);
        assert_eq!(g.rest_move, 1);
        assert_eq!(g.cooldowns, [0; SKILL_SLOTS]);
    }

    #[test]
    fn test_defense_factor() {
        assert!((DefenseLevel::ONE_AND_HALF.factor() - 1.5).abs() < f64::EPSILON);
        assert!((DefenseLevel::THREE.factor() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut g = General::new(0, GeneralKind::Main, Some(0), Coord::new(0, 0));
        g.cooldowns = [2, 0, 1, 0, 5];
        g.durations = [1, 0, 3];
        g.tick();
        assert_eq!(g.cooldowns, [1, 0, 0, 0, 4]);
        assert_eq!(g.durations, [0, 0, 2]);
        assert!(!g.has_buff(Buff::Command));
        assert!(g.has_buff(Buff::Weaken));
    }

    #[test]
    fn test_level_tiers() {
        let mut farmer = General::new(0, GeneralKind::Farmer, None, Coord::new(0, 0));
        assert_eq!(farmer.level_tiers(), [1, 1, 1]);
        farmer.production = 4;
        farmer.defense = DefenseLevel::ONE_AND_HALF;
        assert_eq!(farmer.level_tiers(), [3, 2, 1]);
        farmer.defense = DefenseLevel::THREE;
        assert_eq!(farmer.level_tiers()[1], 4);

        let mut sub = General::new(1, GeneralKind::Sub, Some(1), Coord::new(0, 0));
        sub.defense = DefenseLevel::TWO;
        sub.mobility = 4;
        assert_eq!(sub.level_tiers(), [1, 2, 3]);
    }

    #[test]
    fn test_skill_codes() {
        for code in 1..=5 {
            let skill = SkillKind::from_code(code).unwrap();
            assert_eq!(skill.code(), code);
        }
        assert!(SkillKind::Rush.needs_target());
        assert!(!SkillKind::Weaken.needs_target());
        assert_eq!(SkillKind::Defense.buff(), Some(Buff::Defense));
    }
}
