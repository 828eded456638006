//! Balance constants and upgrade tables.

use crate::game::{DefenseLevel, GeneralKind};

/// Default board height.
pub const DEFAULT_ROWS: u16 = 15;
/// Default board width.
pub const DEFAULT_COLS: u16 = 15;

/// Coin each player starts with.
pub const INITIAL_COINS: u32 = 40;
/// Army moves per round before any movement tech.
pub const BASE_MOVE_STEPS: u32 = 2;

/// Last round that can end undecided; past it the tiebreak applies.
pub const ROUND_CAP: u32 = 500;
/// Every this many rounds each owned cell gains one army.
pub const GROWTH_INTERVAL: u32 = 10;
/// Army lost per round on a bog cell without immunity.
pub const BOG_DRAIN: u32 = 1;

/// Army kept on a cell after moving out of it.
pub const GARRISON: u32 = 1;

/// Radius of the aura scan in combat math.
pub const AURA_RADIUS: u16 = 2;
/// Attack or defense bonus from a friendly aura.
pub const AURA_BONUS: f64 = 1.5;
/// Attack and defense penalty from an enemy weaken aura.
pub const WEAKEN_PENALTY: f64 = 0.75;
/// Attack-buff super-weapon multiplier.
pub const ATTACK_BUFF_BONUS: f64 = 3.0;

/// Skill prices and timings.
pub mod skill {
    /// Rush cost.
    pub const RUSH_COST: u32 = 20;
    /// Rush cooldown.
    pub const RUSH_COOLDOWN: u32 = 5;
    /// Breakthrough cost.
    pub const BREAKTHROUGH_COST: u32 = 15;
    /// Breakthrough cooldown.
    pub const BREAKTHROUGH_COOLDOWN: u32 = 10;
    /// Army removed by a breakthrough.
    pub const BREAKTHROUGH_DAMAGE: u32 = 20;
    /// Cost of each of the three aura skills.
    pub const AURA_COST: u32 = 30;
    /// Cooldown of each aura skill.
    pub const AURA_COOLDOWN: u32 = 10;
    /// Rounds an aura lasts.
    pub const AURA_DURATION: u32 = 10;
    /// Chebyshev reach of the targeted skills.
    pub const RANGE: u16 = 2;
}

/// Super-weapon timings.
pub mod weapon {
    /// Cooldown granted when super-weapons are unlocked.
    pub const START_COOLDOWN: u32 = 10;
    /// Cooldown after any activation.
    pub const REUSE_COOLDOWN: u32 = 50;
    /// Area-damage record lifetime.
    pub const AREA_DAMAGE_LIFETIME: u32 = 5;
    /// Attack-buff lifetime.
    pub const ATTACK_BUFF_LIFETIME: u32 = 5;
    /// Teleport lockout lifetime.
    pub const TELEPORT_LIFETIME: u32 = 2;
    /// Stun field lifetime.
    pub const STUN_LIFETIME: u32 = 10;
    /// Army lost each round under an area-damage record.
    pub const AREA_DAMAGE_TICK: u32 = 3;
    /// Radius of area damage.
    pub const AREA_RADIUS: u16 = 1;
}

/// Global tech prices.
pub mod tech {
    /// Movement tech tiers: (from steps, to steps, cost).
    pub const MOVEMENT: [(u32, u32, u32); 2] = [(2, 3, 80), (3, 5, 150)];
    /// Climbing unlock cost.
    pub const CLIMBING_COST: u32 = 90;
    /// Bog immunity unlock cost.
    pub const BOG_IMMUNITY_COST: u32 = 75;
    /// Super-weapon unlock cost.
    pub const SUPER_WEAPON_COST: u32 = 250;
}

/// Coin cost of calling a new Sub General.
pub const CALL_GENERAL_COST: u32 = 50;

/// One step of a stat upgrade table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier<T> {
    /// Level before the upgrade.
    pub from: T,
    /// Level after the upgrade.
    pub to: T,
    /// Coin cost.
    pub cost: u32,
}

const fn tier<T>(from: T, to: T, cost: u32) -> Tier<T> {
    Tier { from, to, cost }
}

const FARMER_PRODUCTION: [Tier<u32>; 3] = [tier(1, 2, 10), tier(2, 4, 25), tier(4, 6, 35)];
const SUB_PRODUCTION: [Tier<u32>; 2] = [tier(1, 2, 60), tier(2, 4, 120)];

const FARMER_DEFENSE: [Tier<DefenseLevel>; 3] = [
    tier(DefenseLevel::ONE, DefenseLevel::ONE_AND_HALF, 15),
    tier(DefenseLevel::ONE_AND_HALF, DefenseLevel::TWO, 30),
    tier(DefenseLevel::TWO, DefenseLevel::THREE, 60),
];
const SUB_DEFENSE: [Tier<DefenseLevel>; 2] = [
    tier(DefenseLevel::ONE, DefenseLevel::TWO, 40),
    tier(DefenseLevel::TWO, DefenseLevel::THREE, 100),
];

const SUB_MOBILITY: [Tier<u32>; 2] = [tier(1, 2, 20), tier(2, 4, 40)];

/// Main Generals pay half of the Sub price for the same tier.
const fn main_price<T: Copy>(t: Tier<T>) -> Tier<T> {
    Tier {
        from: t.from,
        to: t.to,
        cost: t.cost / 2,
    }
}

fn lookup<T: Copy + PartialEq>(table: &[Tier<T>], current: T) -> Option<Tier<T>> {
    table.iter().copied().find(|t| t.from == current)
}

/// Next production tier for a General, `None` at the ceiling.
#[must_use]
pub fn production_upgrade(kind: GeneralKind, current: u32) -> Option<Tier<u32>> {
    match kind {
        GeneralKind::Farmer => lookup(&FARMER_PRODUCTION, current),
        GeneralKind::Sub => lookup(&SUB_PRODUCTION, current),
        GeneralKind::Main => lookup(&SUB_PRODUCTION, current).map(main_price),
    }
}

/// Next defense tier for a General, `None` at the ceiling.
#[must_use]
pub fn defense_upgrade(kind: GeneralKind, current: DefenseLevel) -> Option<Tier<DefenseLevel>> {
    match kind {
        GeneralKind::Farmer => lookup(&FARMER_DEFENSE, current),
        GeneralKind::Sub => lookup(&SUB_DEFENSE, current),
        GeneralKind::Main => lookup(&SUB_DEFENSE, current).map(main_price),
    }
}

/// Next mobility tier. Farmers have no mobility track and always get `None`.
#[must_use]
pub fn mobility_upgrade(kind: GeneralKind, current: u32) -> Option<Tier<u32>> {
    match kind {
        GeneralKind::Farmer => None,
        GeneralKind::Sub => lookup(&SUB_MOBILITY, current),
        GeneralKind::Main => lookup(&SUB_MOBILITY, current).map(main_price),
    }
}

/// Next movement tech tier.
#[must_use]
pub fn movement_upgrade(current: u32) -> Option<Tier<u32>> {
    tech::MOVEMENT
        .iter()
        .find(|(from, _, _)| *from == current)
        .map(|&(from, to, cost)| tier(from, to, cost))
}
