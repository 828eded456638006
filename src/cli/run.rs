//! Run command implementation.

use super::bots::{Bot, load_pair};
use super::output::{JsonMatchResult, format_text};
use super::{CliError, OutputFormat, load_config, seed_or_clock};
use generals::replay::save_replay;
use generals::run_match;
use std::path::PathBuf;

/// Seat-specific salt so two random bots never mirror each other.
const SEAT_SALT: [u64; 2] = [0, 0x9e37_79b9_7f4a_7c15];

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if a bot or config fails to load, or the replay cannot be written.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    bots: &[String],
    seed: Option<u64>,
    rounds: Option<u32>,
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
    strict: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let pair = load_pair(bots)?;
    let bot_names: Vec<String> = pair.iter().map(Bot::name).collect();
    let seed = seed_or_clock(seed);

    let mut config = load_config(config, rounds)?;
    config.forfeit_on_illegal |= strict;
    config.record_replay = replay.is_some();

    if format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!("Players: {}", bot_names.join(" vs "));
        println!();
    }

    let [first, second] = &pair;
    let mut first = first.policy(seat_seed(seed, 0));
    let mut second = second.policy(seat_seed(seed, 1));
    let result = run_match(seed, [first.as_mut(), second.as_mut()], &config)?;

    if let Some(path) = replay {
        save_replay(&path, &result.replay)?;
        if format == OutputFormat::Text {
            println!("Replay saved to: {}", path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result, &bot_names));
        }
        OutputFormat::Json => {
            let json_result = JsonMatchResult::from_match_result(&result, &bot_names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Per-seat policy seed, shared with the tournament command.
pub(super) const fn seat_seed(seed: u64, seat: usize) -> u64 {
    seed ^ SEAT_SALT[seat]
}
