//! CLI command implementations for Generals.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;

mod bots;
mod output;

use clap::ValueEnum;
use generals::MatchConfig;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<generals::tournament::MatchError> for CliError {
    fn from(e: generals::tournament::MatchError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<generals::tournament::ConfigError> for CliError {
    fn from(e: generals::tournament::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<generals::replay::ReplayError> for CliError {
    fn from(e: generals::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<generals::protocol::ProtocolError> for CliError {
    fn from(e: generals::protocol::ProtocolError) -> Self {
        Self::new(e.to_string())
    }
}

/// Config file (or defaults) with a round override applied.
fn load_config(path: Option<PathBuf>, rounds: Option<u32>) -> Result<MatchConfig, CliError> {
    let mut config = match path {
        Some(path) => MatchConfig::load(&path)?,
        None => MatchConfig::default(),
    };
    if let Some(rounds) = rounds {
        config.max_rounds = rounds;
    }
    Ok(config)
}

/// Seed from the clock when none is given.
#[allow(clippy::cast_possible_truncation)]
fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
