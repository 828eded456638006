//! Bot selection from command-line names.

use super::CliError;
use generals::Policy;
use generals::tournament::{GreedyPolicy, IdlePolicy, RandomPolicy, ScriptedPolicy};
use std::fs;

/// A bot ready to be instantiated for any number of matches.
#[derive(Debug, Clone)]
pub(super) enum Bot {
    /// Ends every turn.
    Idle,
    /// Adjacent-capture baseline.
    Greedy,
    /// Seeded random mover.
    Random,
    /// Pre-parsed command script.
    Script(ScriptedPolicy),
}

impl Bot {
    /// Parse `idle`, `greedy`, `random` or `script:<path>`.
    pub(super) fn load(arg: &str) -> Result<Self, CliError> {
        match arg {
            "idle" => Ok(Self::Idle),
            "greedy" => Ok(Self::Greedy),
            "random" => Ok(Self::Random),
            _ => {
                let Some(path) = arg.strip_prefix("script:") else {
                    return Err(CliError::new(format!(
                        "Unknown bot {arg:?} (expected idle, greedy, random, or script:<path>)"
                    )));
                };
                let text = fs::read_to_string(path)
                    .map_err(|e| CliError::new(format!("Failed to read {path}: {e}")))?;
                Ok(Self::Script(ScriptedPolicy::from_text(path, &text)?))
            }
        }
    }

    /// Fresh policy for one match. `seed` only feeds the random bot.
    pub(super) fn policy(&self, seed: u64) -> Box<dyn Policy> {
        match self {
            Self::Idle => Box::new(IdlePolicy),
            Self::Greedy => Box::new(GreedyPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Script(script) => Box::new(script.clone()),
        }
    }

    /// Display name.
    pub(super) fn name(&self) -> String {
        self.policy(0).name().to_string()
    }
}

/// Load both bots.
pub(super) fn load_pair(args: &[String]) -> Result<[Bot; 2], CliError> {
    match args {
        [a, b] => Ok([Bot::load(a)?, Bot::load(b)?]),
        _ => Err(CliError::new(format!("Expected 2 bots, got {}", args.len()))),
    }
}
