//! Game layer.
//!
//! Implements the rules of the two-player conquest game:
//! - Board of plain, bog and mountain cells
//! - Generals with production, defense and mobility tracks
//! - Combat math, army and General movement
//! - Skills, super-weapons, upgrades and tech
//! - Command dispatch, round lifecycle and win evaluation

mod board;
pub(crate) mod combat;
pub mod command;
mod general;
pub mod invariants;
pub mod movement;
pub mod round;
pub mod rules;
pub mod skills;
pub mod state;
pub mod upgrade;
pub mod victory;
pub mod weapons;

pub use board::{Board, Cell, Coord, Direction, NUM_PLAYERS, PlayerId, Terrain, opponent};
pub use combat::{Clash, attack_multiplier, clash, combat_value, defense_multiplier};
pub use command::{Command, END_TURN, WeaponAction, apply_command, execute_command};
pub use general::{Buff, DefenseLevel, General, GeneralId, GeneralKind, SkillKind, Stat};
pub use round::end_round;
pub use state::{GameState, TechLevels, TechTrack};
pub use victory::{evaluate, force_tiebreak};
pub use weapons::{SuperWeapon, WeaponKind};
