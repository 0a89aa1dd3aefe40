//! CLI command implementations for cachegrid.

pub(crate) mod inspect;
pub(crate) mod play;
pub(crate) mod scan;

mod output;

use cachegrid::{ConfigError, GameConfig, SnapshotError};
use clap::{Args, ValueEnum};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for the `scan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScanFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Per-run overrides layered on top of the config file.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ConfigOverrides {
    /// Probability that a cell holds a cache (0-1)
    #[arg(long)]
    spawn_probability: Option<f64>,

    /// Interaction radius in tiles
    #[arg(long)]
    radius: Option<f64>,

    /// Neighbourhood half-extent in tiles (both axes)
    #[arg(long)]
    neighborhood: Option<i32>,

    /// Token value that wins when crafted (0 disables winning)
    #[arg(long)]
    win: Option<u32>,
}

impl ConfigOverrides {
    /// Whether no override flag was given.
    pub(crate) const fn is_empty(&self) -> bool {
        self.spawn_probability.is_none()
            && self.radius.is_none()
            && self.neighborhood.is_none()
            && self.win.is_none()
    }

    fn apply(&self, config: &mut GameConfig) {
        if let Some(p) = self.spawn_probability {
            config.spawn_probability = p;
        }
        if let Some(r) = self.radius {
            config.interaction_radius = r;
        }
        if let Some(n) = self.neighborhood {
            config.neighborhood_radius_x = n;
            config.neighborhood_radius_y = n;
        }
        if let Some(w) = self.win {
            config.win_threshold = (w != 0).then_some(w);
        }
    }
}

/// Load the config file (or defaults), apply overrides, and validate.
pub(crate) fn load_config(
    path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<GameConfig, CliError> {
    let mut config = match path {
        Some(path) => GameConfig::load(&path)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?,
        None => GameConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the TUI logs nothing unless a log file
/// is given, and the other commands log warnings to stderr.
pub(crate) fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<(), CliError> {
    let default = if interactive && log_file.is_none() {
        "off"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to create log file {}: {e}", path.display()))
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    }
    Ok(())
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

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}
