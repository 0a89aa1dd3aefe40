//! Game invariants - sanity checks that detect bugs.
//!
//! Token values are checked at construction, so these should never trigger in
//! a correctly built session. Restored snapshots run them before play resumes.

use crate::game::GameSession;
use crate::world::Slot;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Total value in a `(held, cell)` pair.
///
/// Swaps leave this unchanged. A craft of two `v` tokens leaves it unchanged
/// too (`v + v == 2v`) while reducing the token count by one.
#[must_use]
pub fn pair_value(held: Slot, cell: Slot) -> u64 {
    u64::from(held.value()) + u64::from(cell.value())
}

/// Number of tokens in a `(held, cell)` pair.
#[must_use]
pub fn pair_count(held: Slot, cell: Slot) -> u32 {
    u32::from(!held.is_empty()) + u32::from(!cell.is_empty())
}

fn check_slot(violations: &mut Vec<InvariantViolation>, what: &str, slot: Slot) {
    if let Slot::Holds(t) = slot {
        let v = t.value();
        if v < 2 || !v.is_power_of_two() {
            violations.push(InvariantViolation {
                message: format!("{what} holds {v}, which is not a power of two >= 2"),
            });
        }
    }
}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &GameSession) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    check_slot(&mut violations, "held slot", session.player().held);

    for (coord, state) in session.store().records() {
        check_slot(&mut violations, &format!("cell {coord}"), state);
    }

    for candidate in session.store().candidates() {
        check_slot(&mut violations, "initial-value candidate", *candidate);
    }

    if let Some(done) = session.completed() {
        let threshold = session.config().win_threshold;
        if threshold != Some(done.value()) {
            violations.push(InvariantViolation {
                message: format!(
                    "session completed with {done} but the win threshold is {threshold:?}"
                ),
            });
        }
    }

    violations
}
