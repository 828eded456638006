//! Win evaluation.

use std::cmp::Ordering;

use crate::game::rules::ROUND_CAP;
use crate::game::{GameState, PlayerId};

/// Elimination check: the winner if exactly one player holds a Main General.
#[must_use]
pub fn sole_survivor(state: &GameState) -> Option<PlayerId> {
    match (state.has_main(0), state.has_main(1)) {
        (true, false) => Some(0),
        (false, true) => Some(1),
        _ => None,
    }
}

/// Tiebreak by total army, then owned cells, then coin. Full ties go to
/// player 0.
#[must_use]
pub fn force_tiebreak(state: &GameState) -> PlayerId {
    if let Some(winner) = sole_survivor(state) {
        return winner;
    }
    let score = |p: PlayerId| {
        (
            state.board.total_army(p),
            state.board.count_cells(p),
            state.coins[usize::from(p)],
        )
    };
    match score(0).cmp(&score(1)) {
        Ordering::Less => 1,
        Ordering::Equal | Ordering::Greater => 0,
    }
}

/// Decide the match if it is over.
///
/// Elimination applies at any time. Past the round cap the tiebreak decides.
#[must_use]
pub fn evaluate(state: &GameState) -> Option<PlayerId> {
    if let Some(winner) = sole_survivor(state) {
        return Some(winner);
    }
    (state.round > ROUND_CAP).then(|| force_tiebreak(state))
}
