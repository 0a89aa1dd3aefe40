//! Token economy: the poke/craft/store transitions.
//!
//! Every transition operates on the pair `(held, cell)`. Swaps conserve the
//! multiset of values; crafting merges two equal tokens into one of twice the
//! value. Any precondition that does not hold is a no-op, never an error.
//!
//! | Action | held    | cell    | Effect                      |
//! |--------|---------|---------|-----------------------------|
//! | poke   | empty   | v       | held = v, cell empty        |
//! | poke   | h       | v       | swap                        |
//! | poke   | any     | empty   | no-op                       |
//! | craft  | v       | v       | cell = 2v, held empty       |
//! | craft  | other   | other   | no-op                       |
//! | store  | h       | empty   | cell = h, held empty        |
//! | store  | h       | v       | swap                        |
//! | store  | empty   | any     | no-op                       |

use std::fmt;

use crate::world::{Slot, Token};

/// One of the three cell interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Take the cell's token, swapping if already holding one.
    Poke,
    /// Merge the held token into an equal cell token.
    Craft,
    /// Put the held token into the cell, swapping if it is occupied.
    Store,
}

impl Action {
    /// All actions in display order.
    pub const ALL: [Self; 3] = [Self::Poke, Self::Craft, Self::Store];

    /// Lower-case name, as shown on buttons.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Poke => "poke",
            Self::Craft => "craft",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a transition left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Poke on an empty cell.
    NothingToPoke,
    /// Craft without two equal tokens.
    CannotCraft,
    /// Store without a held token.
    NothingToStore,
    /// The cell is beyond the interaction radius.
    OutOfRange,
    /// No cache spawns at the cell.
    NoCache,
    /// Crafting would exceed the largest representable token.
    Overflow,
}

/// Result of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The player picked up the cell's token.
    PickedUp(Token),
    /// Held and cell tokens were exchanged.
    Swapped {
        /// What the player now holds.
        held: Token,
        /// What the cell now holds.
        stored: Token,
    },
    /// Two equal tokens were merged into the cell.
    Crafted {
        /// The new cell token.
        produced: Token,
        /// Whether this craft reached the win threshold.
        completed: bool,
    },
    /// The held token was put into an empty cell.
    Stored(Token),
    /// Nothing changed.
    Ignored(NoOpReason),
}

impl Outcome {
    /// Whether the transition changed any state.
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }

    /// Human-readable description of what happened.
    #[must_use]
    pub fn describe(&self) -> String {
        match *self {
            Self::PickedUp(t) => format!("You have no token.  Picking up token of {t}"),
            Self::Swapped { .. } => {
                "You have a token in your inventory.  Swapping inventory with cache".to_string()
            }
            Self::Crafted { produced, .. } => {
                let input = produced.value() / 2;
                format!("Crafting a token of value {input} to create a {produced} token!")
            }
            Self::Stored(_) => "Storing token into cache".to_string(),
            Self::Ignored(NoOpReason::NothingToPoke) => {
                "There is nothing here that could be poked!".to_string()
            }
            Self::Ignored(NoOpReason::CannotCraft) => "Cannot craft!".to_string(),
            Self::Ignored(NoOpReason::NothingToStore) => {
                "Player has no token.  Cannot store anything".to_string()
            }
            Self::Ignored(NoOpReason::OutOfRange) => "That cache is too far away.".to_string(),
            Self::Ignored(NoOpReason::NoCache) => "There is no cache here.".to_string(),
            Self::Ignored(NoOpReason::Overflow) => {
                "That token is already as large as it can get.".to_string()
            }
        }
    }
}

fn swap(held: &mut Slot, cell: &mut Slot, h: Token, v: Token) -> Outcome {
    *held = Slot::Holds(v);
    *cell = Slot::Holds(h);
    Outcome::Swapped { held: v, stored: h }
}

/// Poke a cell.
pub fn poke(held: &mut Slot, cell: &mut Slot) -> Outcome {
    match (*held, *cell) {
        (_, Slot::Empty) => Outcome::Ignored(NoOpReason::NothingToPoke),
        (Slot::Empty, Slot::Holds(v)) => {
            *held = Slot::Holds(v);
            *cell = Slot::Empty;
            Outcome::PickedUp(v)
        }
        (Slot::Holds(h), Slot::Holds(v)) => swap(held, cell, h, v),
    }
}

/// Craft the held token into an equal cell token.
///
/// `win_threshold` marks the value whose creation completes the session.
pub fn craft(held: &mut Slot, cell: &mut Slot, win_threshold: Option<Token>) -> Outcome {
    match (*held, *cell) {
        (Slot::Holds(h), Slot::Holds(v)) if h == v => {
            let Some(produced) = v.doubled() else {
                return Outcome::Ignored(NoOpReason::Overflow);
            };
            *cell = Slot::Holds(produced);
            *held = Slot::Empty;
            Outcome::Crafted {
                produced,
                completed: win_threshold == Some(produced),
            }
        }
        _ => Outcome::Ignored(NoOpReason::CannotCraft),
    }
}

/// Store the held token into a cell.
pub fn store(held: &mut Slot, cell: &mut Slot) -> Outcome {
    match (*held, *cell) {
        (Slot::Empty, _) => Outcome::Ignored(NoOpReason::NothingToStore),
        (Slot::Holds(h), Slot::Empty) => {
            *cell = Slot::Holds(h);
            *held = Slot::Empty;
            Outcome::Stored(h)
        }
        (Slot::Holds(h), Slot::Holds(v)) => swap(held, cell, h, v),
    }
}

/// Apply any action.
pub fn apply(
    action: Action,
    held: &mut Slot,
    cell: &mut Slot,
    win_threshold: Option<Token>,
) -> Outcome {
    match action {
        Action::Poke => poke(held, cell),
        Action::Craft => craft(held, cell, win_threshold),
        Action::Store => store(held, cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(v: u32) -> Token {
        Token::new(v).unwrap()
    }

    fn h(v: u32) -> Slot {
        Slot::Holds(t(v))
    }

    const WIN: Option<Token> = Token::new(32);

    #[test]
    fn test_poke_picks_up() {
        let (mut held, mut cell) = (Slot::Empty, h(2));
        assert_eq!(poke(&mut held, &mut cell), Outcome::PickedUp(t(2)));
        assert_eq!((held, cell), (h(2), Slot::Empty));
    }

    #[test]
    fn test_poke_swaps() {
        let (mut held, mut cell) = (h(4), h(16));
        let outcome = poke(&mut held, &mut cell);
        assert_eq!(outcome, Outcome::Swapped { held: t(16), stored: t(4) });
        assert_eq!((held, cell), (h(16), h(4)));
    }

    #[test]
    fn test_poke_empty_cell_is_noop() {
        for start in [Slot::Empty, h(8)] {
            let (mut held, mut cell) = (start, Slot::Empty);
            assert_eq!(
                poke(&mut held, &mut cell),
                Outcome::Ignored(NoOpReason::NothingToPoke)
            );
            assert_eq!((held, cell), (start, Slot::Empty));
        }
    }

    #[test]
    fn test_craft_merges_equal_tokens() {
        let (mut held, mut cell) = (h(4), h(4));
        let outcome = craft(&mut held, &mut cell, WIN);
        assert_eq!(outcome, Outcome::Crafted { produced: t(8), completed: false });
        assert_eq!((held, cell), (Slot::Empty, h(8)));
    }

    #[test]
    fn test_craft_unequal_is_noop() {
        let (mut held, mut cell) = (h(4), h(8));
        assert_eq!(
            craft(&mut held, &mut cell, WIN),
            Outcome::Ignored(NoOpReason::CannotCraft)
        );
        assert_eq!((held, cell), (h(4), h(8)));

        let (mut held, mut cell) = (Slot::Empty, Slot::Empty);
        assert!(!craft(&mut held, &mut cell, WIN).changed());
    }

    #[test]
    fn test_craft_win_threshold_only_at_exact_value() {
        for (input, expect_win) in [(8, false), (16, true), (32, false)] {
            let (mut held, mut cell) = (h(input), h(input));
            match craft(&mut held, &mut cell, WIN) {
                Outcome::Crafted { completed, .. } => {
                    assert_eq!(completed, expect_win, "input {input}");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_craft_without_threshold_never_completes() {
        let (mut held, mut cell) = (h(16), h(16));
        assert_eq!(
            craft(&mut held, &mut cell, None),
            Outcome::Crafted { produced: t(32), completed: false }
        );
    }

    #[test]
    fn test_craft_overflow_is_noop() {
        let big = h(1 << 31);
        let (mut held, mut cell) = (big, big);
        assert_eq!(
            craft(&mut held, &mut cell, WIN),
            Outcome::Ignored(NoOpReason::Overflow)
        );
        assert_eq!((held, cell), (big, big));
    }

    #[test]
    fn test_store_into_empty() {
        let (mut held, mut cell) = (h(8), Slot::Empty);
        assert_eq!(store(&mut held, &mut cell), Outcome::Stored(t(8)));
        assert_eq!((held, cell), (Slot::Empty, h(8)));
    }

    #[test]
    fn test_store_swaps_like_poke() {
        let (mut a_held, mut a_cell) = (h(2), h(64));
        let (mut b_held, mut b_cell) = (h(2), h(64));
        assert_eq!(store(&mut a_held, &mut a_cell), poke(&mut b_held, &mut b_cell));
        assert_eq!((a_held, a_cell), (b_held, b_cell));
    }

    #[test]
    fn test_store_without_token_is_noop() {
        for cell_start in [Slot::Empty, h(4)] {
            let (mut held, mut cell) = (Slot::Empty, cell_start);
            assert_eq!(
                store(&mut held, &mut cell),
                Outcome::Ignored(NoOpReason::NothingToStore)
            );
            assert_eq!(cell, cell_start);
        }
    }

    #[test]
    fn test_describe_mentions_values() {
        let msg = Outcome::Crafted { produced: t(8), completed: false }.describe();
        assert_eq!(msg, "Crafting a token of value 4 to create a 8 token!");
        assert_eq!(Outcome::Ignored(NoOpReason::CannotCraft).describe(), "Cannot craft!");
    }

    #[test]
    fn test_apply_dispatches() {
        let (mut held, mut cell) = (h(8), Slot::Empty);
        assert_eq!(apply(Action::Store, &mut held, &mut cell, WIN), Outcome::Stored(t(8)));
        assert_eq!(apply(Action::Poke, &mut held, &mut cell, WIN), Outcome::PickedUp(t(8)));
        assert_eq!((held, cell), (h(8), Slot::Empty));
    }
}
