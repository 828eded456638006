//! Error types for command execution.
//!
//! Every rejected command maps to exactly one [`ActionError`]. Rejection never
//! mutates the game state, so callers may treat an `Err` as a no-op.

use std::fmt;

/// Reasons a command can be rejected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// A coordinate lies outside the board.
    OutOfBounds,
    /// The acting seat is not 0 or 1.
    InvalidPlayer,
    /// The acting player does not own the cell.
    NotOwner,
    /// No General occupies the cell.
    NoGeneral,
    /// The destination already holds a General.
    GeneralOccupied,
    /// Not enough army on the origin cell.
    InsufficientArmy,
    /// Not enough coin for the action.
    InsufficientCoin,
    /// The player (or General) has no movement left this round.
    NoMovesLeft,
    /// The skill slot is still cooling down.
    SkillCoolingDown,
    /// A stun effect blocks the action.
    Stunned,
    /// Mountains require climbing tech.
    MountainBlocked,
    /// The destination is outside the General's reach.
    Unreachable,
    /// The stat or tech is already at its highest tier.
    MaxTier,
    /// This General kind cannot upgrade the stat.
    NotUpgradable,
    /// Super-weapons have not been unlocked.
    WeaponLocked,
    /// The super-weapon cooldown has not elapsed.
    WeaponCoolingDown,
    /// A rush into an enemy cell would not win the fight.
    CombatNotFavorable,
    /// Requested army amount is zero or negative.
    InvalidAmount,
    /// Unknown command code or sub-code.
    UnknownCommand(i64),
    /// The parameter vector is too short for the command.
    MissingParameter,
    /// No General exists with the given id.
    UnknownGeneral(i64),
    /// The skill needs a target cell and none was given.
    MissingTarget,
    /// The target cell is too far from the General.
    OutOfRange,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "coordinate out of bounds"),
            Self::InvalidPlayer => write!(f, "invalid player seat"),
            Self::NotOwner => write!(f, "cell not owned by acting player"),
            Self::NoGeneral => write!(f, "no general on cell"),
            Self::GeneralOccupied => write!(f, "destination already holds a general"),
            Self::InsufficientArmy => write!(f, "insufficient army"),
            Self::InsufficientCoin => write!(f, "insufficient coin"),
            Self::NoMovesLeft => write!(f, "no movement left this round"),
            Self::SkillCoolingDown => write!(f, "skill is cooling down"),
            Self::Stunned => write!(f, "cell is stunned"),
            Self::MountainBlocked => write!(f, "mountain requires climbing tech"),
            Self::Unreachable => write!(f, "destination unreachable"),
            Self::MaxTier => write!(f, "already at maximum tier"),
            Self::NotUpgradable => write!(f, "stat cannot be upgraded for this general"),
            Self::WeaponLocked => write!(f, "super-weapon not unlocked"),
            Self::WeaponCoolingDown => write!(f, "super-weapon is cooling down"),
            Self::CombatNotFavorable => write!(f, "attack would not capture the cell"),
            Self::InvalidAmount => write!(f, "army amount must be positive"),
            Self::UnknownCommand(code) => write!(f, "unknown command code {code}"),
            Self::MissingParameter => write!(f, "missing command parameter"),
            Self::UnknownGeneral(id) => write!(f, "no general with id {id}"),
            Self::MissingTarget => write!(f, "skill requires a target cell"),
            Self::OutOfRange => write!(f, "target out of range"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result type for command execution.
pub type ActionResult = Result<(), ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_payload() {
        assert_eq!(
            ActionError::UnknownCommand(42).to_string(),
            "unknown command code 42"
        );
        assert_eq!(ActionError::UnknownGeneral(-3).to_string(), "no general with id -3");
    }
}
