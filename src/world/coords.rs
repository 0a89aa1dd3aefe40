//! Grid coordinates and the geographic mapping around them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Address of a cell in the origin-relative grid.
///
/// `x` runs along the latitude axis and `y` along the longitude axis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    /// Index along the latitude axis.
    pub x: i32,
    /// Index along the longitude axis.
    pub y: i32,
}

impl GridCoord {
    /// The grid origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate, returning `None` if either axis would overflow.
    #[must_use]
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Move one tile in `direction`, staying put at the edge of the domain.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.checked_offset(dx, dy).unwrap_or(self)
    }

    /// Euclidean distance to another coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f64;
        let dy = (i64::from(self.y) - i64::from(other.y)) as f64;
        dx.hypot(dy)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the four movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Increase latitude.
    North,
    /// Decrease latitude.
    South,
    /// Increase longitude.
    East,
    /// Decrease longitude.
    West,
}

impl Direction {
    /// All directions, in a fixed order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Grid delta for one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }

    /// Parse a direction name, accepting compass names, initials and the arrow words.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "up" => Some(Self::North),
            "south" | "s" | "down" => Some(Self::South),
            "east" | "e" | "right" => Some(Self::East),
            "west" | "w" | "left" => Some(Self::West),
            _ => None,
        }
    }
}

/// Error returned when a direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction: {:?}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Corner with the smallest latitude and longitude.
    pub south_west: GeoPoint,
    /// Corner with the largest latitude and longitude.
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// Check whether a point lies inside (south/west edges inclusive).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south_west.lat
            && point.lat < self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng < self.north_east.lng
    }
}

/// Converts between geographic degrees and grid indices by simple scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: GeoPoint,
    tile_degrees: f64,
}

impl CoordinateMapper {
    /// Create a mapper with the given origin and tile size in degrees.
    ///
    /// `tile_degrees` must be positive and finite; `GameConfig::validate` enforces it.
    #[must_use]
    pub const fn new(origin: GeoPoint, tile_degrees: f64) -> Self {
        Self {
            origin,
            tile_degrees,
        }
    }

    /// The geographic origin of cell `(0, 0)`.
    #[must_use]
    pub const fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Tile edge length in degrees.
    #[must_use]
    pub const fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    /// Convert a degree offset to the nearest grid index.
    ///
    /// NaN maps to 0; infinities and huge magnitudes saturate at the `i32` bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_grid(&self, degrees: f64) -> i32 {
        let scaled = (degrees / self.tile_degrees).round();
        if scaled.is_nan() { 0 } else { scaled as i32 }
    }

    /// Convert a grid index to its degree offset.
    #[must_use]
    pub fn to_geo(&self, index: i32) -> f64 {
        f64::from(index) * self.tile_degrees
    }

    /// Cell containing (nearest to) an absolute geographic point.
    #[must_use]
    pub fn cell_of(&self, point: GeoPoint) -> GridCoord {
        GridCoord::new(
            self.to_grid(point.lat - self.origin.lat),
            self.to_grid(point.lng - self.origin.lng),
        )
    }

    /// Absolute geographic point of a cell's south-west corner.
    #[must_use]
    pub fn corner_of(&self, coord: GridCoord) -> GeoPoint {
        GeoPoint::new(
            self.origin.lat + self.to_geo(coord.x),
            self.origin.lng + self.to_geo(coord.y),
        )
    }

    /// Rectangle covered by a cell, one tile wide on each axis.
    #[must_use]
    pub fn bounds_of(&self, coord: GridCoord) -> GeoBounds {
        let south_west = self.corner_of(coord);
        GeoBounds {
            south_west,
            north_east: GeoPoint::new(
                south_west.lat + self.tile_degrees,
                south_west.lng + self.tile_degrees,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(GeoPoint::new(36.997_936_938_057_016, -122.057_035_075_011_51), 1e-4)
    }

    #[test]
    fn test_to_grid_rounds_to_nearest() {
        let m = mapper();
        assert_eq!(m.to_grid(0.0), 0);
        assert_eq!(m.to_grid(0.000_04), 0);
        assert_eq!(m.to_grid(0.000_06), 1);
        assert_eq!(m.to_grid(-0.000_06), -1);
        assert_eq!(m.to_grid(0.000_34), 3);
    }

    #[test]
    fn test_grid_round_trip_is_exact() {
        let m = mapper();
        for i in [-1_000_000, -17, -1, 0, 1, 2, 99, 123_456, i32::MAX, i32::MIN] {
            assert_eq!(m.to_grid(m.to_geo(i)), i, "index {i}");
        }
    }

    #[test]
    fn test_to_grid_is_total() {
        let m = mapper();
        assert_eq!(m.to_grid(f64::NAN), 0);
        assert_eq!(m.to_grid(f64::INFINITY), i32::MAX);
        assert_eq!(m.to_grid(f64::NEG_INFINITY), i32::MIN);
        assert_eq!(m.to_grid(1e300), i32::MAX);
    }

    #[test]
    fn test_cell_of_and_bounds_agree() {
        let m = mapper();
        let coord = GridCoord::new(3, -5);
        let bounds = m.bounds_of(coord);
        assert!(bounds.contains(bounds.south_west));
        assert!(!bounds.contains(bounds.north_east));
        assert_eq!(m.cell_of(bounds.south_west), coord);
    }

    #[test]
    fn test_step_and_edges() {
        let c = GridCoord::ORIGIN;
        assert_eq!(c.step(Direction::North), GridCoord::new(1, 0));
        assert_eq!(c.step(Direction::South), GridCoord::new(-1, 0));
        assert_eq!(c.step(Direction::East), GridCoord::new(0, 1));
        assert_eq!(c.step(Direction::West), GridCoord::new(0, -1));

        let edge = GridCoord::new(i32::MAX, 0);
        assert_eq!(edge.step(Direction::North), edge);
    }

    #[test]
    fn test_distance_does_not_overflow() {
        let a = GridCoord::new(i32::MIN, i32::MIN);
        let b = GridCoord::new(i32::MAX, i32::MAX);
        assert!(a.distance(b).is_finite());
        assert!((GridCoord::new(3, 4).distance(GridCoord::ORIGIN) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("North"), Some(Direction::North));
        assert_eq!(Direction::parse(" w "), Some(Direction::West));
        assert_eq!(Direction::parse("down"), Some(Direction::South));
        assert_eq!(Direction::parse("sideways"), None);
        assert!("upward".parse::<Direction>().is_err());
    }
}
