//! Output formatting utilities for CLI.

use cachegrid::world::{CoordinateMapper, SpawnedCell};
use cachegrid::{GridCoord, Slot};
use serde::Serialize;

/// JSON-serializable scan result.
#[derive(Debug, Serialize)]
pub(super) struct JsonScan {
    /// Grid center of the scan.
    pub(super) center: GridCoord,
    /// Spawned caches.
    pub(super) cells: Vec<JsonCell>,
}

/// JSON-serializable cache.
#[derive(Debug, Serialize)]
pub(super) struct JsonCell {
    /// Grid x.
    pub(super) x: i32,
    /// Grid y.
    pub(super) y: i32,
    /// Token value (null if empty).
    pub(super) token: Option<u32>,
    /// Geographic bounds as `[south, west, north, east]`.
    pub(super) bounds: [f64; 4],
}

impl JsonScan {
    /// Build from spawned cells.
    pub(super) fn new(center: GridCoord, cells: &[SpawnedCell], mapper: &CoordinateMapper) -> Self {
        Self {
            center,
            cells: cells
                .iter()
                .map(|cell| {
                    let b = mapper.bounds_of(cell.coord);
                    JsonCell {
                        x: cell.coord.x,
                        y: cell.coord.y,
                        token: cell.state.token().map(u32::from),
                        bounds: [
                            b.south_west.lat,
                            b.south_west.lng,
                            b.north_east.lat,
                            b.north_east.lng,
                        ],
                    }
                })
                .collect(),
        }
    }
}

/// Format a scan as human-readable text.
pub(super) fn format_scan_text(center: GridCoord, cells: &[SpawnedCell]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Caches around {center}: {}\n", cells.len()));
    for cell in cells {
        let token = match cell.state {
            Slot::Empty => "no token".to_string(),
            Slot::Holds(t) => format!("token {t}"),
        };
        let distance = cell.coord.distance(center);
        output.push_str(&format!(
            "  ({:>6}, {:>6})  {token:<10} {distance:>5.1} tiles\n",
            cell.coord.x, cell.coord.y
        ));
    }

    let total: u64 = cells.iter().map(|c| u64::from(c.state.value())).sum();
    output.push_str(&format!("\nTotal token value: {total}\n"));

    output
}
