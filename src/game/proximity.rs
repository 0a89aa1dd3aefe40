//! Proximity gate and button enablement.

use crate::game::Action;
use crate::world::{GridCoord, Slot};

/// Distance check that enables or disables interaction with a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityGate {
    /// Maximum Euclidean grid distance, inclusive.
    pub radius: f64,
}

impl ProximityGate {
    /// Create a gate with the given radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// True iff `cell` is within `radius` of `player`.
    #[must_use]
    pub fn within_range(&self, player: GridCoord, cell: GridCoord) -> bool {
        player.distance(cell) <= self.radius
    }
}

/// Which actions are currently enabled for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActionAvailability {
    /// Poke is enabled.
    pub poke: bool,
    /// Craft is enabled.
    pub craft: bool,
    /// Store is enabled.
    pub store: bool,
}

impl ActionAvailability {
    /// Everything disabled.
    pub const NONE: Self = Self {
        poke: false,
        craft: false,
        store: false,
    };

    /// Compute enablement. Proximity is checked first and disables everything.
    #[must_use]
    pub fn evaluate(held: Slot, cell: Slot, in_range: bool) -> Self {
        if !in_range {
            return Self::NONE;
        }
        Self {
            poke: !cell.is_empty(),
            craft: matches!(
                (held, cell),
                (Slot::Holds(h), Slot::Holds(v)) if h == v && v.doubled().is_some()
            ),
            store: !held.is_empty(),
        }
    }

    /// Whether one action is enabled.
    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::Poke => self.poke,
            Action::Craft => self.craft,
            Action::Store => self.store,
        }
    }

    /// Whether any action is enabled.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.poke || self.craft || self.store
    }
}
