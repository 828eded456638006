//! Generals CLI - run matches, tournaments and replay summaries.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Generals - a deterministic two-player conquest engine
#[derive(Parser, Debug)]
#[command(name = "generals")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match between two bots
    Run {
        /// Bots: idle, greedy, random, or script:<path>
        #[arg(required = true, num_args = 2)]
        bots: Vec<String>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds (overrides the config file)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Match config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the replay as JSON Lines to this file
        #[arg(long)]
        replay: Option<PathBuf>,

        /// An illegal command forfeits the match
        #[arg(long)]
        strict: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run mass parallel matches and aggregate statistics
    Tournament {
        /// Bots: idle, greedy, random, or script:<path>
        #[arg(required = true, num_args = 2)]
        bots: Vec<String>,

        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum rounds per game
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Match config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Summarize a recorded replay
    Replay {
        /// Replay file (.jsonl)
        #[arg(required = true)]
        recording: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("generals={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            bots,
            seed,
            rounds,
            config,
            replay,
            strict,
            format,
        } => cli::run::execute(&bots, seed, rounds, config, replay, strict, format),

        Commands::Tournament {
            bots,
            games,
            seed,
            threads,
            rounds,
            config,
            format,
            progress,
        } => cli::tournament::execute(&bots, games, seed, threads, rounds, config, format, progress),

        Commands::Replay { recording } => cli::replay::execute(&recording),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
