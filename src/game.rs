//! Game layer for cachegrid.
//!
//! Implements the rules on top of the world layer:
//! - Player with a one-token inventory
//! - Token economy (poke, craft, store)
//! - Proximity gate and button enablement
//! - The session that owns all mutable state

mod economy;
mod invariants;
mod player;
mod proximity;
mod session;

pub use economy::{Action, NoOpReason, Outcome, apply, craft, poke, store};
pub use invariants::{InvariantViolation, check_invariants, pair_count, pair_value};
pub use player::PlayerState;
pub use proximity::{ActionAvailability, ProximityGate};
pub use session::{CellPanel, GameSession, Status};
