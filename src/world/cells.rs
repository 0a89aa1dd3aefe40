//! Tokens, cell state, and the lazy cell store.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::world::{GridCoord, cell_luck, pick_index};

/// Tag used for the luck draw that decides a cell's initial token.
pub const INITIAL_VALUE_TAG: &str = "initialValue";

/// A power-of-two token value, always at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Token(u32);

impl Token {
    /// Smallest token value.
    pub const MIN: Self = Self(2);

    /// Create a token, rejecting values that are not a power of two >= 2.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value >= 2 && value.is_power_of_two() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Token of twice the value, or `None` if it would not fit.
    #[must_use]
    pub const fn doubled(self) -> Option<Self> {
        match self.0.checked_mul(2) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Position on the doubling ramp: 2 is level 1, 4 is level 2, and so on.
    #[must_use]
    pub const fn level(self) -> u32 {
        self.0.trailing_zeros()
    }
}

impl TryFrom<u32> for Token {
    type Error = InvalidToken;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidToken(value))
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value that cannot be a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken(pub u32);

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a power-of-two token value", self.0)
    }
}

impl std::error::Error for InvalidToken {}

/// A one-token slot: the state of a cell, or the player's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// No token.
    #[default]
    Empty,
    /// Holds exactly one token.
    Holds(Token),
}

/// State of a single cell.
pub type CellState = Slot;

impl Slot {
    /// Build a slot from a raw value where 0 means empty.
    #[must_use]
    pub fn from_value(value: u32) -> Option<Self> {
        if value == 0 {
            Some(Self::Empty)
        } else {
            Token::new(value).map(Self::Holds)
        }
    }

    /// The held token, if any.
    #[must_use]
    pub const fn token(self) -> Option<Token> {
        match self {
            Self::Empty => None,
            Self::Holds(t) => Some(t),
        }
    }

    /// Raw value, 0 when empty.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Holds(t) => t.value(),
        }
    }

    /// Check whether the slot is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Empty the slot, returning what it held.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<Token> for Slot {
    fn from(token: Token) -> Self {
        Self::Holds(token)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Holds(t) => write!(f, "{t}"),
        }
    }
}

/// Injective key for a grid coordinate.
///
/// Both axes are packed bit-for-bit into one `u64`, so distinct coordinates can
/// never share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    /// Key for a coordinate.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_lossless)]
    pub const fn of(coord: GridCoord) -> Self {
        let hi = (coord.x as u32 as u64) << 32;
        let lo = coord.y as u32 as u64;
        Self(hi | lo)
    }

    /// The coordinate this key was built from.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn coord(self) -> GridCoord {
        GridCoord::new((self.0 >> 32) as u32 as i32, self.0 as u32 as i32)
    }

    /// Raw packed value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coord())
    }
}

/// Lazy mapping from coordinate to cell state.
///
/// Untouched cells derive their state from luck; once `set` is called the
/// explicit value wins for the rest of the session.
#[derive(Debug, Clone)]
pub struct CellStore {
    /// Initial-value candidates, indexed by the luck draw.
    candidates: Vec<Slot>,
    /// Explicit overrides written by player interactions.
    overrides: HashMap<CellKey, Slot>,
}

impl CellStore {
    /// Create a store drawing initial values from `candidates`.
    ///
    /// An empty candidate list makes every implicit cell empty.
    #[must_use]
    pub fn new(candidates: Vec<Slot>) -> Self {
        Self {
            candidates,
            overrides: HashMap::new(),
        }
    }

    /// Key for a coordinate.
    #[must_use]
    pub const fn key(coord: GridCoord) -> CellKey {
        CellKey::of(coord)
    }

    /// The initial-value candidates.
    #[must_use]
    pub fn candidates(&self) -> &[Slot] {
        &self.candidates
    }

    /// The hash-derived default, ignoring any override.
    #[must_use]
    pub fn implicit(&self, coord: GridCoord) -> Slot {
        if self.candidates.is_empty() {
            return Slot::Empty;
        }
        let roll = cell_luck(coord, Some(INITIAL_VALUE_TAG));
        self.candidates[pick_index(roll, self.candidates.len())]
    }

    /// Current state of a cell. Does not persist the implicit default.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Slot {
        self.overrides
            .get(&Self::key(coord))
            .copied()
            .unwrap_or_else(|| self.implicit(coord))
    }

    /// Pin a cell to an explicit state.
    pub fn set(&mut self, coord: GridCoord, state: Slot) {
        self.overrides.insert(Self::key(coord), state);
    }

    /// Check whether a cell has an explicit override.
    #[must_use]
    pub fn is_explicit(&self, coord: GridCoord) -> bool {
        self.overrides.contains_key(&Self::key(coord))
    }

    /// Number of explicit overrides.
    #[must_use]
    pub fn explicit_len(&self) -> usize {
        self.overrides.len()
    }

    /// All overrides as `(coord, state)` records, sorted by coordinate.
    #[must_use]
    pub fn records(&self) -> Vec<(GridCoord, Slot)> {
        let mut records: Vec<_> = self
            .overrides
            .iter()
            .map(|(key, state)| (key.coord(), *state))
            .collect();
        records.sort_unstable_by_key(|(coord, _)| *coord);
        records
    }

    /// Rebuild a store from override records. Later duplicates win.
    #[must_use]
    pub fn from_records(
        candidates: Vec<Slot>,
        records: impl IntoIterator<Item = (GridCoord, Slot)>,
    ) -> Self {
        let mut store = Self::new(candidates);
        for (coord, state) in records {
            store.set(coord, state);
        }
        store
    }
}
