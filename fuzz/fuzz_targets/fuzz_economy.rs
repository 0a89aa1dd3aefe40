#![no_main]

use arbitrary::Arbitrary;
use cachegrid::game::{Action, apply, pair_count, pair_value};
use cachegrid::{Slot, Token};
use libfuzzer_sys::fuzz_target;

/// Structured input for economy fuzzing.
#[derive(Arbitrary, Debug)]
struct EconomyInput {
    /// Held token level (0 means empty).
    held_level: u8,
    /// Cell token level (0 means empty).
    cell_level: u8,
    /// Win threshold level (0 disables).
    win_level: u8,
    /// Actions to apply in order.
    actions: Vec<u8>,
}

fn slot(level: u8) -> Slot {
    match level % 32 {
        0 => Slot::Empty,
        l => Token::new(1 << l).map_or(Slot::Empty, Slot::Holds),
    }
}

fuzz_target!(|input: EconomyInput| {
    let mut held = slot(input.held_level);
    let mut cell = slot(input.cell_level);
    let win = slot(input.win_level).token();

    for &raw in input.actions.iter().take(256) {
        let action = Action::ALL[usize::from(raw) % Action::ALL.len()];
        let (before_held, before_cell) = (held, cell);
        let outcome = apply(action, &mut held, &mut cell, win);

        // Value is conserved by every transition.
        assert_eq!(pair_value(held, cell), pair_value(before_held, before_cell));

        if outcome.changed() {
            assert!(pair_count(held, cell) <= pair_count(before_held, before_cell));
        } else {
            assert_eq!((held, cell), (before_held, before_cell));
        }

        for s in [held, cell] {
            if let Slot::Holds(t) = s {
                assert!(t.value() >= 2 && t.value().is_power_of_two());
            }
        }
    }
});
