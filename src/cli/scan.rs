//! Scan command implementation.

use super::output::{JsonScan, format_scan_text};
use super::{CliError, ConfigOverrides, ScanFormat, load_config};
use cachegrid::world::GeoPoint;
use cachegrid::{GameSession, GridCoord};
use std::path::PathBuf;

/// Parse a `"LAT,LNG"` pair.
fn parse_point(text: &str) -> Result<GeoPoint, CliError> {
    let (lat, lng) = text
        .split_once(',')
        .ok_or_else(|| CliError::new(format!("Expected LAT,LNG but got {text:?}")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| CliError::new(format!("Invalid coordinate {s:?}: {e}")))
    };
    Ok(GeoPoint::new(parse(lat)?, parse(lng)?))
}

/// Execute the scan command.
///
/// # Errors
///
/// Returns an error if the config or location is invalid.
pub(crate) fn execute(
    config: Option<PathBuf>,
    x: i32,
    y: i32,
    at: Option<String>,
    format: ScanFormat,
    overrides: &ConfigOverrides,
) -> Result<(), CliError> {
    let config = load_config(config, overrides)?;
    let session = GameSession::new(config)?;

    let center = match at {
        Some(text) => session.mapper().cell_of(parse_point(&text)?),
        None => GridCoord::new(x, y),
    };

    let cells = session.cells_around(center);

    match format {
        ScanFormat::Text => print!("{}", format_scan_text(center, &cells)),
        ScanFormat::Json => {
            let scan = JsonScan::new(center, &cells, session.mapper());
            let json = serde_json::to_string_pretty(&scan)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let p = parse_point("36.9979, -122.057").unwrap();
        assert!((p.lat - 36.9979).abs() < 1e-12);
        assert!((p.lng + 122.057).abs() < 1e-12);
        assert!(parse_point("36.9979").is_err());
        assert!(parse_point("north,south").is_err());
    }
}
