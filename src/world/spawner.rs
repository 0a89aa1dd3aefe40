//! Neighbourhood enumeration: which cells materialise around a center.

use tracing::debug;

use crate::world::{CellStore, GridCoord, Slot, cell_luck};

/// A cell chosen for display, with its state at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedCell {
    /// Where the cell is.
    pub coord: GridCoord,
    /// Its state when the neighbourhood was enumerated.
    pub state: Slot,
}

/// Rendering collaborator that displays spawned cells.
///
/// Implementors own the overlays; the core only tells them what to show.
pub trait OverlaySurface {
    /// Remove every overlay drawn so far.
    fn clear_overlays(&mut self);

    /// Draw one cell overlay.
    fn draw_cell(&mut self, cell: &SpawnedCell);

    /// Update the status display.
    fn set_status(&mut self, status: &str);
}

/// Decides which cells of a rectangular neighbourhood exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSpawner {
    /// Half-width of the neighbourhood along x.
    pub radius_x: i32,
    /// Half-height of the neighbourhood along y.
    pub radius_y: i32,
    /// Probability in `[0, 1]` that any given cell spawns.
    pub spawn_probability: f64,
}

impl ViewportSpawner {
    /// Create a spawner.
    #[must_use]
    pub const fn new(radius_x: i32, radius_y: i32, spawn_probability: f64) -> Self {
        Self {
            radius_x,
            radius_y,
            spawn_probability,
        }
    }

    /// Whether the cell at `coord` spawns at all.
    #[must_use]
    pub fn spawns(&self, coord: GridCoord) -> bool {
        cell_luck(coord, None) < self.spawn_probability
    }

    /// Every coordinate that spawns around `center`, in row-major order.
    ///
    /// Offsets cover `[-radius, radius)` on each axis. Offsets that would leave
    /// the `i32` domain are skipped.
    #[must_use]
    pub fn candidates(&self, center: GridCoord) -> Vec<GridCoord> {
        let mut out = Vec::new();
        for dx in -self.radius_x..self.radius_x {
            for dy in -self.radius_y..self.radius_y {
                if let Some(coord) = center.checked_offset(dx, dy)
                    && self.spawns(coord)
                {
                    out.push(coord);
                }
            }
        }
        out
    }

    /// Enumerate the neighbourhood and resolve each spawned cell's state.
    #[must_use]
    pub fn spawn_neighborhood(&self, center: GridCoord, store: &CellStore) -> Vec<SpawnedCell> {
        let cells: Vec<SpawnedCell> = self
            .candidates(center)
            .into_iter()
            .map(|coord| SpawnedCell {
                coord,
                state: store.get(coord),
            })
            .collect();
        debug!(%center, spawned = cells.len(), "neighborhood spawned");
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Token;

    fn store() -> CellStore {
        CellStore::new(
            [0, 2, 4, 8, 16]
                .into_iter()
                .map(|v| Slot::from_value(v).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_spawn_is_idempotent() {
        let spawner = ViewportSpawner::new(8, 8, 0.1);
        let center = GridCoord::new(-4, 11);
        assert_eq!(spawner.candidates(center), spawner.candidates(center));
    }

    #[test]
    fn test_rectangle_is_half_open() {
        let spawner = ViewportSpawner::new(2, 3, 1.0);
        let cells = spawner.candidates(GridCoord::ORIGIN);
        assert_eq!(cells.len(), 4 * 6);
        assert!(cells.contains(&GridCoord::new(-2, -3)));
        assert!(cells.contains(&GridCoord::new(1, 2)));
        assert!(!cells.contains(&GridCoord::new(2, 0)));
        assert!(!cells.contains(&GridCoord::new(0, 3)));
    }

    #[test]
    fn test_probability_extremes() {
        assert!(ViewportSpawner::new(8, 8, 0.0).candidates(GridCoord::ORIGIN).is_empty());
        assert_eq!(ViewportSpawner::new(8, 8, 1.0).candidates(GridCoord::ORIGIN).len(), 256);
    }

    #[test]
    fn test_shifted_center_agrees_on_overlap() {
        let spawner = ViewportSpawner::new(8, 8, 0.3);
        let a = spawner.candidates(GridCoord::ORIGIN);
        let b = spawner.candidates(GridCoord::new(1, 0));
        for coord in &a {
            if coord.x >= -7 {
                assert!(b.contains(coord), "{coord} vanished after a one-tile move");
            }
        }
    }

    #[test]
    fn test_domain_edge_skips_overflow() {
        let spawner = ViewportSpawner::new(2, 2, 1.0);
        let cells = spawner.candidates(GridCoord::new(i32::MAX, i32::MIN));
        // dx = 1 and dy in {-2, -1} leave the domain.
        assert_eq!(cells.len(), 3 * 2);
    }

    #[test]
    fn test_spawned_state_reflects_overrides() {
        let spawner = ViewportSpawner::new(8, 8, 1.0);
        let mut store = store();
        let target = GridCoord::new(2, 1);
        let token = Slot::Holds(Token::new(128).unwrap());
        store.set(target, token);

        let cells = spawner.spawn_neighborhood(GridCoord::ORIGIN, &store);
        let found = cells.iter().find(|c| c.coord == target).unwrap();
        assert_eq!(found.state, token);
        assert_eq!(store.explicit_len(), 1);
    }
}
