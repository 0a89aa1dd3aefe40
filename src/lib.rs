// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Cachegrid: a deterministic token-crafting game on a geographic grid.
//!
//! The map is divided into cells. Some cells hold a cache with a power-of-two
//! token; the player carries at most one token and can poke, craft, or store
//! at caches within reach. Crafting two equal tokens yields one of twice the
//! value.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Renderer (TUI, OverlaySurface)    │
//! ├─────────────────────────────────────┤
//! │   Game: session, economy, gate      │
//! ├─────────────────────────────────────┤
//! │   World: luck, cells, spawner       │
//! └─────────────────────────────────────┘
//! ```
//!
//! World content is procedural: an untouched cell's token is a pure function
//! of its coordinate, so nothing is stored until the player changes a cell.

pub mod config;
pub mod error;
pub mod game;
pub mod snapshot;
pub mod world;

pub use config::GameConfig;
pub use error::{ConfigError, ConfigResult};
pub use snapshot::{SessionSnapshot, SnapshotError};

// Re-export key types at crate root for convenience
pub use game::{Action, GameSession, Outcome, PlayerState, Status};
pub use world::{CellStore, Direction, GridCoord, Slot, Token};
