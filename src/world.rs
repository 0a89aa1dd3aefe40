//! World layer for cachegrid.
//!
//! Everything here is pure or lazily materialised:
//! - Grid coordinates and geographic scaling
//! - Deterministic luck for procedural content
//! - The cell store (hash defaults plus explicit overrides)
//! - Neighbourhood spawning

mod cells;
mod coords;
mod luck;
mod spawner;

pub use cells::{CellKey, CellState, CellStore, INITIAL_VALUE_TAG, InvalidToken, Slot, Token};
pub use coords::{CoordinateMapper, Direction, GeoBounds, GeoPoint, GridCoord, UnknownDirection};
pub use luck::{KeyPart, cell_luck, luck, luck_bits, pick_index};
pub use spawner::{OverlaySurface, SpawnedCell, ViewportSpawner};
