//! Game invariants - sanity checks that detect bugs.
//!
//! Legal commands and round ticks should never trigger these. If they do, a
//! rule is missing a legality check.
//!
//! These are NOT gameplay limits. The bounds are generous sanity checks.

use std::collections::HashSet;

use crate::game::{GameState, GeneralKind};

/// Sanity bound: army per cell should never exceed this.
pub const SANITY_MAX_ARMY_PER_CELL: u32 = 1_000_000;

/// Sanity bound: coin per player should never exceed this.
pub const SANITY_MAX_COINS: u32 = 10_000_000;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    for (coord, cell) in state.board.iter() {
        if cell.owner.is_some() && cell.army == 0 && cell.general.is_none() {
            report(format!("Cell at {coord:?} is owned with zero army and no general"));
        }
        if cell.army > SANITY_MAX_ARMY_PER_CELL {
            report(format!(
                "Cell at {coord:?} has army {} > sanity max {SANITY_MAX_ARMY_PER_CELL}",
                cell.army
            ));
        }
        if let Some(id) = cell.general {
            if state.general(id).is_none_or(|g| g.position != coord) {
                report(format!("Cell at {coord:?} names general {id} which is not there"));
            }
        }
    }

    let mut seen = HashSet::new();
    for general in state.generals() {
        if !seen.insert(general.id) {
            report(format!("Duplicate general id {}", general.id));
        }
        let back = state.board.get(general.position).and_then(|c| c.general);
        if back != Some(general.id) {
            report(format!(
                "General {} at {:?} is not referenced by its cell",
                general.id, general.position
            ));
        }
        if general.kind == GeneralKind::Main && general.owner.is_none() {
            report(format!("Main general {} has no owner", general.id));
        }
    }

    for (seat, &coins) in state.coins.iter().enumerate() {
        if coins > SANITY_MAX_COINS {
            report(format!(
                "Player {seat} has {coins} coins > sanity max {SANITY_MAX_COINS}"
            ));
        }
        let steps = state.rest_move_step[seat];
        let cap = state.tech[seat].movement;
        if steps > cap {
            report(format!(
                "Player {seat} has {steps} move steps > movement tech {cap}"
            ));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
