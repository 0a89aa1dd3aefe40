//! Save and resume a session.
//!
//! Only explicit state is written: the player, the completion flag, and the
//! cells the player has touched. Untouched cells are recomputed from luck on
//! load, so a snapshot stays small no matter how far the player wandered.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{GameSession, InvariantViolation, PlayerState, check_invariants};
use crate::world::{CellStore, GridCoord, Slot, Token};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One explicitly set cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Cell x.
    pub x: i32,
    /// Cell y.
    pub y: i32,
    /// Stored state.
    pub state: Slot,
}

/// Serialisable form of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version.
    pub version: u32,
    /// Configuration the session ran with.
    pub config: GameConfig,
    /// Player position.
    pub position: GridCoord,
    /// Player inventory.
    pub held: Slot,
    /// Token that completed the session, if it has been completed.
    pub completed: Option<Token>,
    /// Explicitly set cells, sorted by coordinate.
    pub cells: Vec<CellRecord>,
}

/// Error type for snapshot operations.
#[derive(Debug)]
pub enum SnapshotError {
    /// File operations failed.
    Io(io::Error),
    /// The file is not a valid snapshot.
    Format(serde_json::Error),
    /// The snapshot was written by an unsupported version.
    UnsupportedVersion(u32),
    /// The embedded config is invalid.
    Config(ConfigError),
    /// The restored state breaks game invariants.
    Invariants(Vec<InvariantViolation>),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "snapshot I/O failed: {e}"),
            Self::Format(e) => write!(f, "malformed snapshot: {e}"),
            Self::UnsupportedVersion(v) => {
                write!(f, "unsupported snapshot version {v} (expected {SNAPSHOT_VERSION})")
            }
            Self::Config(e) => write!(f, "snapshot config rejected: {e}"),
            Self::Invariants(violations) => {
                write!(f, "snapshot breaks {} invariant(s)", violations.len())?;
                if let Some(first) = violations.first() {
                    write!(f, ": {first}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::UnsupportedVersion(_) | Self::Invariants(_) => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

impl From<ConfigError> for SnapshotError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl SessionSnapshot {
    /// Capture a session.
    #[must_use]
    pub fn capture(session: &GameSession) -> Self {
        let player = session.player();
        Self {
            version: SNAPSHOT_VERSION,
            config: session.config().clone(),
            position: player.position,
            held: player.held,
            completed: session.completed(),
            cells: session
                .store()
                .records()
                .into_iter()
                .map(|(coord, state)| CellRecord {
                    x: coord.x,
                    y: coord.y,
                    state,
                })
                .collect(),
        }
    }

    /// Rebuild a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is unsupported, the config is invalid,
    /// or the restored state breaks invariants.
    pub fn restore(self) -> Result<GameSession, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        let store = CellStore::from_records(
            self.config.candidates()?,
            self.cells
                .into_iter()
                .map(|r| (GridCoord::new(r.x, r.y), r.state)),
        );
        let player = PlayerState::new(self.position, self.held);
        let session = GameSession::with_parts(self.config, store, player, self.completed)?;

        let violations = check_invariants(&session);
        if !violations.is_empty() {
            return Err(SnapshotError::Invariants(violations));
        }
        Ok(session)
    }

    /// Write as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), cells = self.cells.len(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot file. Does not validate it; see [`SessionSnapshot::restore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&text)?;
        info!(path = %path.display(), cells = snapshot.cells.len(), "snapshot loaded");
        Ok(snapshot)
    }
}

impl GameSession {
    /// Capture this session for saving.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    /// Save this session to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        self.snapshot().save(path)
    }

    /// Rebuild a session from a snapshot.
    ///
    /// # Errors
    ///
    /// See [`SessionSnapshot::restore`].
    pub fn restore(snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        snapshot.restore()
    }

    /// Load and validate a session from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or the snapshot is invalid.
    pub fn resume(path: &Path) -> Result<Self, SnapshotError> {
        SessionSnapshot::load(path)?.restore()
    }
}
