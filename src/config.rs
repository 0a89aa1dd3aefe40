//! Tunable gameplay parameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::world::{GeoPoint, Slot, Token};

/// Latitude/longitude of the default origin (the classroom).
pub const CLASSROOM: GeoPoint = GeoPoint::new(36.997_936_938_057_016, -122.057_035_075_011_51);

/// Smallest accepted tile edge, in degrees.
pub const MIN_TILE_DEGREES: f64 = 1e-9;

/// Largest accepted tile edge, in degrees. Keeps every grid index finite in degree space.
pub const MAX_TILE_DEGREES: f64 = 360.0;

/// Largest accepted neighbourhood half-extent.
pub const MAX_NEIGHBORHOOD_RADIUS: i32 = 256;

/// Configuration for a game session.
///
/// Every field has a default, so a config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Geographic position of cell `(0, 0)`.
    pub origin: GeoPoint,
    /// Tile edge length in degrees.
    pub tile_degrees: f64,
    /// Neighbourhood half-extent along x.
    pub neighborhood_radius_x: i32,
    /// Neighbourhood half-extent along y.
    pub neighborhood_radius_y: i32,
    /// Probability that a cell spawns.
    pub spawn_probability: f64,
    /// Maximum distance, in tiles, at which the player may interact.
    pub interaction_radius: f64,
    /// Initial-value candidates; 0 means the cell starts empty.
    pub initial_values: Vec<u32>,
    /// Crafting a token of exactly this value completes the session.
    pub win_threshold: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            origin: CLASSROOM,
            tile_degrees: 1e-4,
            neighborhood_radius_x: 8,
            neighborhood_radius_y: 8,
            spawn_probability: 0.1,
            interaction_radius: 4.5,
            initial_values: vec![0, 2, 4, 8, 16],
            win_threshold: Some(32),
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.origin.lat.is_finite() || !self.origin.lng.is_finite() {
            return Err(ConfigError::invalid("origin", "coordinates must be finite"));
        }
        if !(MIN_TILE_DEGREES..=MAX_TILE_DEGREES).contains(&self.tile_degrees) {
            return Err(ConfigError::invalid(
                "tile_degrees",
                format!(
                    "must be within {MIN_TILE_DEGREES}..={MAX_TILE_DEGREES}, got {}",
                    self.tile_degrees
                ),
            ));
        }
        for (field, radius) in [
            ("neighborhood_radius_x", self.neighborhood_radius_x),
            ("neighborhood_radius_y", self.neighborhood_radius_y),
        ] {
            if !(0..=MAX_NEIGHBORHOOD_RADIUS).contains(&radius) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be in 0..={MAX_NEIGHBORHOOD_RADIUS}, got {radius}"),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::invalid(
                "spawn_probability",
                format!("must be in [0, 1], got {}", self.spawn_probability),
            ));
        }
        if self.interaction_radius.is_nan() || self.interaction_radius < 0.0 {
            return Err(ConfigError::invalid(
                "interaction_radius",
                format!("must be non-negative, got {}", self.interaction_radius),
            ));
        }
        self.candidates()?;
        self.win_token()?;
        Ok(())
    }

    /// Initial-value candidates as slots.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is neither 0 nor a power of two >= 2.
    pub fn candidates(&self) -> ConfigResult<Vec<Slot>> {
        self.initial_values
            .iter()
            .map(|&v| {
                Slot::from_value(v).ok_or_else(|| {
                    ConfigError::invalid(
                        "initial_values",
                        format!("{v} is neither 0 nor a power of two >= 2"),
                    )
                })
            })
            .collect()
    }

    /// Win threshold as a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not a power of two >= 4, the smallest
    /// value a craft can produce.
    pub fn win_token(&self) -> ConfigResult<Option<Token>> {
        match self.win_threshold {
            None => Ok(None),
            Some(v) => match Token::new(v) {
                Some(t) if t > Token::MIN => Ok(Some(t)),
                _ => Err(ConfigError::invalid(
                    "win_threshold",
                    format!("{v} cannot be produced by crafting"),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::CoordinateMapper;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.candidates().unwrap().len(), 5);
        assert_eq!(config.win_token().unwrap().map(Token::value), Some(32));
    }

    #[test]
    fn test_rejects_bad_candidates() {
        let config = GameConfig {
            initial_values: vec![0, 3],
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "initial_values", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for bad in [0, 2, 6] {
            let config = GameConfig {
                win_threshold: Some(bad),
                ..GameConfig::default()
            };
            assert!(config.validate().is_err(), "threshold {bad}");
        }
        let no_win = GameConfig {
            win_threshold: None,
            ..GameConfig::default()
        };
        no_win.validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let cases = [
            GameConfig { tile_degrees: 0.0, ..GameConfig::default() },
            GameConfig { tile_degrees: f64::NAN, ..GameConfig::default() },
            GameConfig { tile_degrees: f64::INFINITY, ..GameConfig::default() },
            GameConfig { tile_degrees: 1e300, ..GameConfig::default() },
            GameConfig { tile_degrees: 1e-12, ..GameConfig::default() },
            GameConfig { spawn_probability: 1.5, ..GameConfig::default() },
            GameConfig { interaction_radius: -1.0, ..GameConfig::default() },
            GameConfig { neighborhood_radius_x: -1, ..GameConfig::default() },
            GameConfig { neighborhood_radius_y: 10_000, ..GameConfig::default() },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_tile_bounds_keep_extreme_indices_finite() {
        for tile_degrees in [MIN_TILE_DEGREES, MAX_TILE_DEGREES] {
            let config = GameConfig {
                tile_degrees,
                ..GameConfig::default()
            };
            config.validate().unwrap();

            let mapper = CoordinateMapper::new(config.origin, config.tile_degrees);
            for index in [i32::MIN, -1, 0, 1, i32::MAX] {
                let degrees = mapper.to_geo(index);
                assert!(degrees.is_finite(), "tile {tile_degrees} index {index}");
                assert_eq!(mapper.to_grid(degrees), index, "tile {tile_degrees}");
            }
        }
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "spawn_probability": 0.25, "win_threshold": 64 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert!((config.spawn_probability - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.win_threshold, Some(64));
        assert_eq!(config.neighborhood_radius_x, 8);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tile_size": 1 }}"#).unwrap();
        assert!(matches!(GameConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(GameConfig::load(&missing), Err(ConfigError::Io(_))));
    }
}
