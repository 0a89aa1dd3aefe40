//! Cachegrid CLI - play, scan, and inspect cachegrid sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Cachegrid - a token-crafting game on a geographic grid
#[derive(Parser, Debug)]
#[command(name = "cachegrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file (fields not given keep their defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Resume from a saved session (uses its saved config)
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Save the session to this file on quit
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        overrides: cli::ConfigOverrides,
    },

    /// List the caches that spawn around a location
    Scan {
        /// Grid x of the center (latitude axis)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: i32,

        /// Grid y of the center (longitude axis)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        y: i32,

        /// Center on a geographic point instead, as "LAT,LNG"
        #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["x", "y"])]
        at: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ScanFormat,

        #[command(flatten)]
        overrides: cli::ConfigOverrides,
    },

    /// Validate a saved session and summarise it
    Inspect {
        /// Saved session file
        #[arg(required = true)]
        snapshot: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let interactive = matches!(args.command, Commands::Play { .. });
    if let Err(e) = cli::init_logging(args.log_file.as_deref(), interactive) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Play {
            resume,
            save,
            overrides,
        } => cli::play::execute(args.config, resume, save, &overrides),

        Commands::Scan {
            x,
            y,
            at,
            format,
            overrides,
        } => cli::scan::execute(args.config, x, y, at, format, &overrides),

        Commands::Inspect { snapshot } => cli::inspect::execute(&snapshot),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
