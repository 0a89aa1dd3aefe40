#![no_main]

use arbitrary::Arbitrary;
use cachegrid::game::check_invariants;
use cachegrid::{Action, Direction, GameConfig, GameSession, GridCoord};
use libfuzzer_sys::fuzz_target;

/// One player input.
#[derive(Arbitrary, Debug)]
enum Input {
    /// Walk one tile.
    Walk(u8),
    /// Act on a cell relative to the player.
    Act { dx: i8, dy: i8, action: u8 },
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// Start near the edge of the grid to exercise overflow handling.
    edge_start: bool,
    /// Inputs applied in order.
    inputs: Vec<Input>,
}

fuzz_target!(|input: SessionInput| {
    let Ok(mut session) = GameSession::new(GameConfig::default()) else {
        return;
    };

    if input.edge_start {
        // Walking there would take billions of steps.
        let mut snapshot = session.snapshot();
        snapshot.position = GridCoord::new(i32::MAX - 2, i32::MIN + 2);
        let Ok(restored) = snapshot.restore() else {
            return;
        };
        session = restored;
    }

    for step in input.inputs.iter().take(512) {
        match *step {
            Input::Walk(d) => {
                session.move_player(Direction::ALL[usize::from(d) % Direction::ALL.len()]);
            }
            Input::Act { dx, dy, action } => {
                let Some(target) = session
                    .player()
                    .position
                    .checked_offset(i32::from(dx), i32::from(dy))
                else {
                    continue;
                };
                let action = Action::ALL[usize::from(action) % Action::ALL.len()];
                let before = session.cell(target);
                let outcome = session.act(target, action);
                if !session.in_range(target) || !session.spawns(target) {
                    assert!(!outcome.changed());
                    assert_eq!(session.cell(target), before);
                }
            }
        }
        let _ = session.visible_cells();
    }

    let violations = check_invariants(&session);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");
});
