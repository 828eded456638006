//! Command model and dispatcher.
//!
//! External callers speak integer vectors `[code, params...]`. Parsing turns
//! a vector into a [`Command`]; applying resolves General ids to cells and
//! forwards to the rule that implements the action.

use tracing::debug;

use crate::error::{ActionError, ActionResult};
use crate::game::movement::{army_move, general_move};
use crate::game::skills::activate_skill;
use crate::game::upgrade::{call_general, level_up, upgrade_tech};
use crate::game::weapons::{area_damage, attack_buff, stun, teleport};
use crate::game::{Coord, Direction, GameState, GeneralId, PlayerId, SkillKind, Stat, TechTrack};

/// Code of the end-of-turn sentinel.
pub const END_TURN: i64 = 8;

/// A super-weapon activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponAction {
    /// Strike the 3x3 area around a cell.
    AreaDamage(Coord),
    /// Buff the 3x3 area around a cell.
    AttackBuff(Coord),
    /// Move an army across the board.
    Teleport {
        /// Cell the army leaves.
        origin: Coord,
        /// Cell the army lands on.
        destination: Coord,
    },
    /// Freeze enemy actions around a cell.
    Stun(Coord),
}

/// One player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Code 1: move army one step.
    MoveArmy {
        /// Source cell.
        origin: Coord,
        /// Step direction.
        direction: Direction,
        /// Requested amount, clamped when applied.
        amount: i64,
    },
    /// Code 2: walk a General.
    MoveGeneral {
        /// General id.
        general: GeneralId,
        /// Target cell.
        destination: Coord,
    },
    /// Code 3: upgrade a General stat.
    LevelUp {
        /// General id.
        general: GeneralId,
        /// Stat to raise.
        stat: Stat,
    },
    /// Code 4: use a General skill.
    Skill {
        /// General id.
        general: GeneralId,
        /// Skill to use.
        skill: SkillKind,
        /// Target cell for rush and breakthrough.
        target: Option<Coord>,
    },
    /// Code 5: buy tech.
    Tech(TechTrack),
    /// Code 6: fire a super-weapon.
    SuperWeapon(WeaponAction),
    /// Code 7: spawn a Sub General.
    CallGeneral(Coord),
    /// Code 8: stop processing this turn.
    EndTurn,
}

fn param(params: &[i64], idx: usize) -> Result<i64, ActionError> {
    params.get(idx).copied().ok_or(ActionError::MissingParameter)
}

fn coord(params: &[i64], idx: usize) -> Result<Coord, ActionError> {
    Coord::from_params(param(params, idx)?, param(params, idx + 1)?).ok_or(ActionError::OutOfBounds)
}

fn general_id(params: &[i64], idx: usize) -> Result<GeneralId, ActionError> {
    let raw = param(params, idx)?;
    GeneralId::try_from(raw).map_err(|_| ActionError::UnknownGeneral(raw))
}

fn coord_params(c: Coord) -> [i64; 2] {
    [i64::from(c.row), i64::from(c.col)]
}

impl Command {
    /// Parse a command code and its parameters.
    ///
    /// A skill target of `[-1, -1]` (or none at all) means "no target".
    /// Teleport takes `[3, to_row, to_col, from_row, from_col]`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownCommand`] for an unknown code or
    /// sub-code, [`ActionError::MissingParameter`] for a short vector, and
    /// [`ActionError::OutOfBounds`] for negative coordinates.
    pub fn parse(code: i64, params: &[i64]) -> Result<Self, ActionError> {
        let unknown = ActionError::UnknownCommand;
        Ok(match code {
            1 => {
                let raw_dir = param(params, 2)?;
                Self::MoveArmy {
                    origin: coord(params, 0)?,
                    direction: Direction::from_code(raw_dir).ok_or(unknown(raw_dir))?,
                    amount: param(params, 3)?,
                }
            }
            2 => Self::MoveGeneral {
                general: general_id(params, 0)?,
                destination: coord(params, 1)?,
            },
            3 => {
                let raw = param(params, 1)?;
                Self::LevelUp {
                    general: general_id(params, 0)?,
                    stat: Stat::from_code(raw).ok_or(unknown(raw))?,
                }
            }
            4 => {
                let raw = param(params, 1)?;
                let skill = SkillKind::from_code(raw).ok_or(unknown(raw))?;
                let target = match params.get(2..4) {
                    Some([-1, -1]) | None => None,
                    Some(_) if !skill.needs_target() => None,
                    Some(_) => Some(coord(params, 2)?),
                };
                Self::Skill {
                    general: general_id(params, 0)?,
                    skill,
                    target,
                }
            }
            5 => {
                let raw = param(params, 0)?;
                Self::Tech(TechTrack::from_code(raw).ok_or(unknown(raw))?)
            }
            6 => {
                let raw = param(params, 0)?;
                let action = match raw {
                    1 => WeaponAction::AreaDamage(coord(params, 1)?),
                    2 => WeaponAction::AttackBuff(coord(params, 1)?),
                    3 => WeaponAction::Teleport {
                        destination: coord(params, 1)?,
                        origin: coord(params, 3)?,
                    },
                    4 => WeaponAction::Stun(coord(params, 1)?),
                    _ => return Err(unknown(raw)),
                };
                Self::SuperWeapon(action)
            }
            7 => Self::CallGeneral(coord(params, 0)?),
            END_TURN => Self::EndTurn,
            _ => return Err(unknown(code)),
        })
    }

    /// Parse a full vector `[code, params...]`.
    ///
    /// # Errors
    ///
    /// As [`Self::parse`]; an empty vector is [`ActionError::MissingParameter`].
    pub fn from_vec(raw: &[i64]) -> Result<Self, ActionError> {
        let (&code, params) = raw.split_first().ok_or(ActionError::MissingParameter)?;
        Self::parse(code, params)
    }

    /// Vector form `[code, params...]`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        let mut out = vec![self.code()];
        match *self {
            Self::MoveArmy {
                origin,
                direction,
                amount,
            } => {
                out.extend(coord_params(origin));
                out.extend([direction.code(), amount]);
            }
            Self::MoveGeneral {
                general,
                destination,
            } => {
                out.push(i64::from(general));
                out.extend(coord_params(destination));
            }
            Self::LevelUp { general, stat } => out.extend([i64::from(general), stat.code()]),
            Self::Skill {
                general,
                skill,
                target,
            } => {
                out.extend([i64::from(general), skill.code()]);
                if let Some(target) = target {
                    out.extend(coord_params(target));
                }
            }
            Self::Tech(track) => out.push(track.code()),
            Self::SuperWeapon(action) => match action {
                WeaponAction::AreaDamage(c) => {
                    out.push(1);
                    out.extend(coord_params(c));
                }
                WeaponAction::AttackBuff(c) => {
                    out.push(2);
                    out.extend(coord_params(c));
                }
                WeaponAction::Teleport {
                    origin,
                    destination,
                } => {
                    out.push(3);
                    out.extend(coord_params(destination));
                    out.extend(coord_params(origin));
                }
                WeaponAction::Stun(c) => {
                    out.push(4);
                    out.extend(coord_params(c));
                }
            },
            Self::CallGeneral(c) => out.extend(coord_params(c)),
            Self::EndTurn => {}
        }
        out
    }

    /// Command code 1..=8.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::MoveArmy { .. } => 1,
            Self::MoveGeneral { .. } => 2,
            Self::LevelUp { .. } => 3,
            Self::Skill { .. } => 4,
            Self::Tech(_) => 5,
            Self::SuperWeapon(_) => 6,
            Self::CallGeneral(_) => 7,
            Self::EndTurn => END_TURN,
        }
    }
}

/// Apply a parsed command for `player`. `EndTurn` is a no-op here.
///
/// # Errors
///
/// Returns the rule's [`ActionError`] when the command is illegal; the state
/// is left untouched in that case.
pub fn apply_command(state: &mut GameState, player: PlayerId, command: &Command) -> ActionResult {
    match *command {
        Command::MoveArmy {
            origin,
            direction,
            amount,
        } => army_move(state, player, origin, direction, amount),
        Command::MoveGeneral {
            general,
            destination,
        } => {
            let origin = state.position_of(i64::from(general))?;
            general_move(state, player, origin, destination)
        }
        Command::LevelUp { general, stat } => {
            let origin = state.position_of(i64::from(general))?;
            level_up(state, player, origin, stat)
        }
        Command::Skill {
            general,
            skill,
            target,
        } => {
            let origin = state.position_of(i64::from(general))?;
            activate_skill(state, player, origin, skill, target)
        }
        Command::Tech(track) => upgrade_tech(state, player, track),
        Command::SuperWeapon(action) => match action {
            WeaponAction::AreaDamage(c) => area_damage(state, player, c),
            WeaponAction::AttackBuff(c) => attack_buff(state, player, c),
            WeaponAction::Teleport {
                origin,
                destination,
            } => teleport(state, player, origin, destination),
            WeaponAction::Stun(c) => stun(state, player, c),
        },
        Command::CallGeneral(c) => call_general(state, player, c),
        Command::EndTurn => Ok(()),
    }
}

/// Parse and apply `[code, params...]` for `player`.
///
/// # Errors
///
/// Any parse or rule rejection. Rejected commands change nothing.
pub fn execute_command(
    state: &mut GameState,
    player: PlayerId,
    code: i64,
    params: &[i64],
) -> ActionResult {
    let result = Command::parse(code, params).and_then(|cmd| apply_command(state, player, &cmd));
    if let Err(err) = result {
        debug!(player, code, ?params, %err, "command rejected");
    }
    result
}
