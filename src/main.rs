//! Catgame CLI - play, replay and inspect games from the terminal.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Catgame - a deterministic card and resource game
#[derive(Parser, Debug)]
#[command(name = "catgame")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game on this terminal
    Play {
        /// Player names in seat order (2-4 players)
        #[arg(short, long, required = true, num_args = 2..=4)]
        players: Vec<String>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Game configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Stop after this many actions and show the table
        #[arg(long)]
        at: Option<usize>,
    },

    /// Print the default game configuration
    Rules,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("catgame=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            players,
            seed,
            config,
            save,
            format,
        } => cli::play::execute(players, seed, config, save, format),

        Commands::Replay {
            recording,
            format,
            at,
        } => cli::replay::execute(recording, format, at),

        Commands::Rules => cli::rules::execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
