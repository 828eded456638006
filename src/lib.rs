// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Generals: a deterministic two-player territory-conquest engine.
//!
//! This crate provides the game simulation designed for:
//! - Bit-exact deterministic rules over a shared grid
//! - Boolean-style command legality with zero mutation on rejection
//! - Replays in JSON Lines that external viewers consume
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Match Runner / Tournament CLI     │
//! ├─────────────────────────────────────┤
//! │   Command Dispatcher + Round Tick   │
//! ├─────────────────────────────────────┤
//! │   Rules: combat, movement, skills,  │
//! │   super-weapons, upgrades           │
//! ├─────────────────────────────────────┤
//! │   Board + Generals (GameState)      │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod protocol;
pub mod replay;
pub mod tournament;

pub use error::{ActionError, ActionResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Cell, Command, Coord, Direction, GameState, General, GeneralKind, PlayerId, Terrain,
    execute_command,
};
pub use tournament::{MatchConfig, MatchResult, Policy, run_match};
