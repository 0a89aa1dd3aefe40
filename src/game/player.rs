//! Player state.

use crate::world::{Direction, GridCoord, Slot};

/// The single player: where they stand and what they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    /// Current grid position.
    pub position: GridCoord,
    /// One-slot inventory.
    pub held: Slot,
}

impl PlayerState {
    /// Create a player at `position` holding `held`.
    #[must_use]
    pub const fn new(position: GridCoord, held: Slot) -> Self {
        Self { position, held }
    }

    /// Move one tile and return the new position.
    pub fn step(&mut self, direction: Direction) -> GridCoord {
        self.position = self.position.step(direction);
        self.position
    }
}
