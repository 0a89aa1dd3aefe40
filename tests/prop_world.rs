//! Property-based tests for the world layer and token economy.
//!
//! Run with: cargo test --release prop_world

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use proptest::prelude::*;

use cachegrid::game::{
    Action, Outcome, ProximityGate, apply, craft, pair_count, pair_value, poke, store,
};
use cachegrid::world::{
    CellKey, CoordinateMapper, GeoPoint, KeyPart, ViewportSpawner, cell_luck, luck,
};
use cachegrid::{CellStore, GridCoord, Slot, Token};

fn coord() -> impl Strategy<Value = GridCoord> {
    (any::<i32>(), any::<i32>()).prop_map(|(x, y)| GridCoord::new(x, y))
}

fn near_coord() -> impl Strategy<Value = GridCoord> {
    (-10_000i32..10_000, -10_000i32..10_000).prop_map(|(x, y)| GridCoord::new(x, y))
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        Just(Slot::Empty),
        (1u32..=31).prop_map(|level| Slot::Holds(Token::new(1 << level).unwrap())),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Poke), Just(Action::Craft), Just(Action::Store)]
}

fn default_candidates() -> Vec<Slot> {
    [0, 2, 4, 8, 16]
        .into_iter()
        .map(|v| Slot::from_value(v).unwrap())
        .collect()
}

fn default_store() -> CellStore {
    CellStore::new(default_candidates())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// The same key always hashes to the same value in [0, 1).
    #[test]
    fn prop_luck_deterministic(a in any::<i64>(), b in any::<i64>(), tag in "[a-zA-Z]{0,12}") {
        let key = [KeyPart::Int(a), KeyPart::Int(b), KeyPart::Tag(&tag)];
        let first = luck(&key);
        prop_assert_eq!(first.to_bits(), luck(&key).to_bits());
        prop_assert!((0.0..1.0).contains(&first));
    }

    /// Cell luck is in range for every coordinate, including the extremes.
    #[test]
    fn prop_cell_luck_in_range(c in coord()) {
        let v = cell_luck(c, None);
        prop_assert!((0.0..1.0).contains(&v));
        let tagged = cell_luck(c, Some("initialValue"));
        prop_assert!((0.0..1.0).contains(&tagged));
    }

    /// An untouched cell reads the candidate its tagged luck selects.
    #[test]
    fn prop_default_stable(c in coord()) {
        let candidates = default_candidates();
        let roll = cell_luck(c, Some("initialValue"));
        let index = (roll * candidates.len() as f64).floor() as usize;
        let expected = candidates[index.min(candidates.len() - 1)];

        let a = default_store();
        let b = default_store();
        prop_assert_eq!(a.get(c), expected);
        prop_assert_eq!(b.get(c), expected);
        prop_assert_eq!(a.implicit(c), expected);
        prop_assert!(!a.is_explicit(c));
    }

    /// A set cell returns exactly what was stored, and nothing else moves.
    #[test]
    fn prop_set_overrides(c in coord(), other in coord(), s in slot()) {
        let mut store = default_store();
        let before = store.get(other);
        store.set(c, s);
        prop_assert_eq!(store.get(c), s);
        if other != c {
            prop_assert_eq!(store.get(other), before);
        }
    }

    /// The cell key packs both axes without collisions.
    #[test]
    fn prop_key_injective(a in coord(), b in coord()) {
        prop_assert_eq!(CellKey::of(a).coord(), a);
        if a != b {
            prop_assert_ne!(CellKey::of(a), CellKey::of(b));
        }
    }

    /// Spawning the same neighbourhood twice yields the same cells.
    #[test]
    fn prop_spawn_idempotent(center in near_coord(), p in 0.0f64..=1.0) {
        let spawner = ViewportSpawner::new(6, 6, p);
        let store = default_store();
        prop_assert_eq!(
            spawner.spawn_neighborhood(center, &store),
            spawner.spawn_neighborhood(center, &store)
        );
    }

    /// Spawning never writes to the store.
    #[test]
    fn prop_spawn_is_read_only(center in near_coord()) {
        let store = default_store();
        let _ = ViewportSpawner::new(8, 8, 1.0).spawn_neighborhood(center, &store);
        prop_assert_eq!(store.explicit_len(), 0);
    }

    /// Poke and store swaps conserve the values in the pair.
    #[test]
    fn prop_swaps_conserve(held in slot(), cell in slot()) {
        let steps: [fn(&mut Slot, &mut Slot) -> Outcome; 2] = [poke, store];
        for step in steps {
            let (mut h, mut c) = (held, cell);
            let _ = step(&mut h, &mut c);
            prop_assert_eq!(pair_value(h, c), pair_value(held, cell));
            prop_assert_eq!(pair_count(h, c), pair_count(held, cell));
        }
    }

    /// Craft either does nothing or merges two equal tokens into one.
    #[test]
    fn prop_craft_merges(held in slot(), cell in slot()) {
        let (mut h, mut c) = (held, cell);
        let outcome = craft(&mut h, &mut c, None);
        if outcome.changed() {
            prop_assert_eq!(held, cell);
            prop_assert_eq!(h, Slot::Empty);
            prop_assert_eq!(u64::from(c.value()), 2 * u64::from(cell.value()));
            prop_assert_eq!(pair_count(h, c), 1);
        } else {
            prop_assert_eq!((h, c), (held, cell));
        }
        prop_assert_eq!(pair_value(h, c), pair_value(held, cell));
    }

    /// Every reachable value is a power of two >= 2.
    #[test]
    fn prop_values_stay_powers_of_two(
        held in slot(),
        cell in slot(),
        actions in prop::collection::vec(action(), 0..20),
    ) {
        let (mut h, mut c) = (held, cell);
        for a in actions {
            let _ = apply(a, &mut h, &mut c, Token::new(32));
            for s in [h, c] {
                if let Slot::Holds(t) = s {
                    prop_assert!(t.value() >= 2 && t.value().is_power_of_two());
                }
            }
        }
    }

    /// Grid to geo and back returns the same index.
    #[test]
    fn prop_grid_round_trip(i in -1_000_000i32..1_000_000) {
        let mapper = CoordinateMapper::new(GeoPoint::new(0.0, 0.0), 1e-4);
        prop_assert_eq!(mapper.to_grid(mapper.to_geo(i)), i);
    }

    /// A cell's corner maps back to that cell.
    #[test]
    fn prop_cell_of_corner(c in near_coord()) {
        let mapper = CoordinateMapper::new(GeoPoint::new(36.99, -122.05), 1e-4);
        prop_assert_eq!(mapper.cell_of(mapper.corner_of(c)), c);
    }

    /// The gate is symmetric and agrees with the distance.
    #[test]
    fn prop_proximity_symmetric(a in coord(), b in coord(), radius in 0.0f64..20.0) {
        let gate = ProximityGate::new(radius);
        prop_assert_eq!(gate.within_range(a, b), gate.within_range(b, a));
        prop_assert_eq!(gate.within_range(a, b), a.distance(b) <= radius);
        prop_assert!(gate.within_range(a, a));
    }
}
