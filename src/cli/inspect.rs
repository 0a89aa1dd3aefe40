//! Snapshot inspection command implementation.

use super::CliError;
use cachegrid::snapshot::SNAPSHOT_VERSION;
use cachegrid::{GameSession, SessionSnapshot, SnapshotError};
use std::path::Path;

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or fails validation.
pub(crate) fn execute(snapshot: &Path) -> Result<(), CliError> {
    println!("Inspecting: {}", snapshot.display());
    println!();

    let loaded = SessionSnapshot::load(snapshot)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", snapshot.display())))?;
    print_check("Snapshot format", true);

    let version_ok = loaded.version == SNAPSHOT_VERSION;
    print_check(&format!("Snapshot version {SNAPSHOT_VERSION}"), version_ok);

    let config_ok = loaded.config.validate().is_ok();
    print_check("Config", config_ok);

    let cells = loaded.cells.len();
    let session = match loaded.restore() {
        Ok(session) => session,
        Err(SnapshotError::Invariants(violations)) => {
            print_check("Invariants", false);
            for violation in &violations {
                println!("      {violation}");
            }
            return Err(CliError::new(format!(
                "{} invariant violation(s)",
                violations.len()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    print_check("Invariants", true);

    print_summary(&session, cells);

    println!();
    println!("Inspection successful!");

    Ok(())
}

fn print_summary(session: &GameSession, cells: usize) {
    let player = session.player();
    let position = session.mapper().corner_of(player.position);
    let windfall: u64 = session
        .store()
        .records()
        .iter()
        .map(|(_, state)| u64::from(state.value()))
        .sum();

    println!();
    println!("Summary:");
    println!(
        "  Position:     {} ({:.6}, {:.6})",
        player.position, position.lat, position.lng
    );
    println!("  Status:       {}", session.status_text());
    println!("  Saved cells:  {cells}");
    println!("  Saved value:  {windfall}");
    match session.config().win_threshold {
        Some(win) => println!("  Win at:       {win}"),
        None => println!("  Win at:       disabled"),
    }
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachegrid::{Action, GameConfig, GridCoord};

    fn saved_session(dir: &Path) -> std::path::PathBuf {
        let config = GameConfig {
            spawn_probability: 1.0,
            initial_values: vec![2],
            ..GameConfig::default()
        };
        let mut session = GameSession::new(config).unwrap();
        session.act(GridCoord::new(1, 0), Action::Poke);
        let path = dir.join("session.json");
        session.save(&path).unwrap();
        path
    }

    #[test]
    fn test_valid_snapshot_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = saved_session(dir.path());
        execute(&path).unwrap();
    }

    #[test]
    fn test_unsupported_version_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = saved_session(dir.path());
        let mut snapshot = SessionSnapshot::load(&path).unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;
        snapshot.save(&path).unwrap();
        assert!(execute(&path).is_err());
    }
}
