//! Tournament command implementation.

use super::bots::{Bot, load_pair};
use super::output::{
    JsonTournamentResult, TournamentStats, format_tournament_csv, format_tournament_text,
};
use super::run::seat_seed;
use super::{CliError, TournamentFormat, load_config, seed_or_clock};
use generals::run_match;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if a bot or config fails to load.
#[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
pub(crate) fn execute(
    bots: &[String],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    rounds: Option<u32>,
    config: Option<PathBuf>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let pair = load_pair(bots)?;
    let bot_names: Vec<String> = pair.iter().map(Bot::name).collect();

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let mut config = load_config(config, rounds)?;
    config.record_replay = false;

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats, merged once at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(TournamentStats::new, |mut local_stats, i| {
            let game_seed = base_seed.wrapping_add(i);
            let [first, second] = &pair;
            let mut first = first.policy(seat_seed(game_seed, 0));
            let mut second = second.policy(seat_seed(game_seed, 1));
            match run_match(game_seed, [first.as_mut(), second.as_mut()], &config) {
                Ok(result) => local_stats.add_result(&result),
                Err(e) => warn!(seed = game_seed, error = %e, "match skipped"),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local_stats
        })
        .reduce(TournamentStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &bot_names));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &bot_names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &bot_names));
        }
    }

    Ok(())
}
