//! Replay command implementation.

use super::CliError;
use generals::replay::{load_replay, render_summary, summarize};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the replay file cannot be read or parsed.
pub(crate) fn execute(recording_path: &Path) -> Result<(), CliError> {
    let lines = load_replay(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load replay {}: {e}",
            recording_path.display()
        ))
    })?;
    print!("{}", render_summary(&summarize(&lines)));
    Ok(())
}
