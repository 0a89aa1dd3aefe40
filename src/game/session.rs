//! Game session: the one owner of all mutable game state.

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::error::ConfigResult;
use crate::game::{
    Action, ActionAvailability, NoOpReason, Outcome, PlayerState, ProximityGate, apply,
};
use crate::world::{
    CellStore, CoordinateMapper, Direction, GridCoord, OverlaySurface, Slot, SpawnedCell, Token,
    ViewportSpawner,
};

/// What the status display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Normal play; shows the held token.
    Holding(Slot),
    /// The win threshold was crafted. Sticky for the rest of the session.
    Completed(Token),
}

impl Status {
    /// Text for the status panel.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Holding(Slot::Empty) => "No token held".to_string(),
            Self::Holding(Slot::Holds(t)) => format!("Holding a token of {t}"),
            Self::Completed(t) => format!("You crafted a token of {t}. You win!"),
        }
    }

    /// Whether the session reached its terminal state.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Everything an interaction panel needs, built fresh when it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPanel {
    /// Which cell.
    pub coord: GridCoord,
    /// Current cell state.
    pub state: Slot,
    /// Description line.
    pub description: String,
    /// Centre label; absent when the cell is empty.
    pub label: Option<String>,
    /// Whether the cell is within interaction range.
    pub in_range: bool,
    /// Button enablement.
    pub actions: ActionAvailability,
}

/// A single-player game session.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    mapper: CoordinateMapper,
    spawner: ViewportSpawner,
    gate: ProximityGate,
    win_threshold: Option<Token>,
    store: CellStore,
    player: PlayerState,
    completed: Option<Token>,
}

impl GameSession {
    /// Start a session with the player at the origin, empty-handed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        let store = CellStore::new(config.candidates()?);
        Self::with_parts(config, store, PlayerState::default(), None)
    }

    /// Assemble a session from previously saved parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn with_parts(
        config: GameConfig,
        store: CellStore,
        player: PlayerState,
        completed: Option<Token>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let win_threshold = config.win_token()?;
        Ok(Self {
            mapper: CoordinateMapper::new(config.origin, config.tile_degrees),
            spawner: ViewportSpawner::new(
                config.neighborhood_radius_x,
                config.neighborhood_radius_y,
                config.spawn_probability,
            ),
            gate: ProximityGate::new(config.interaction_radius),
            win_threshold,
            store,
            player,
            completed,
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Geographic mapping for the renderer.
    #[must_use]
    pub const fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// The cell store (read-only; writes go through [`GameSession::act`]).
    #[must_use]
    pub const fn store(&self) -> &CellStore {
        &self.store
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The proximity gate.
    #[must_use]
    pub const fn gate(&self) -> &ProximityGate {
        &self.gate
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self.completed {
            Some(t) => Status::Completed(t),
            None => Status::Holding(self.player.held),
        }
    }

    /// The token that completed the session, if any.
    #[must_use]
    pub const fn completed(&self) -> Option<Token> {
        self.completed
    }

    /// Status text for display.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.status().text()
    }

    /// Current state of a cell.
    #[must_use]
    pub fn cell(&self, coord: GridCoord) -> Slot {
        self.store.get(coord)
    }

    /// Whether the player can reach a cell.
    #[must_use]
    pub fn in_range(&self, coord: GridCoord) -> bool {
        self.gate.within_range(self.player.position, coord)
    }

    /// Cells that spawn around the player.
    #[must_use]
    pub fn visible_cells(&self) -> Vec<SpawnedCell> {
        self.cells_around(self.player.position)
    }

    /// Cells that spawn around an arbitrary center.
    #[must_use]
    pub fn cells_around(&self, center: GridCoord) -> Vec<SpawnedCell> {
        self.spawner.spawn_neighborhood(center, &self.store)
    }

    /// Whether a cell spawns at all.
    #[must_use]
    pub fn spawns(&self, coord: GridCoord) -> bool {
        self.spawner.spawns(coord)
    }

    /// Button enablement for one cell. Cells without a cache offer nothing.
    #[must_use]
    pub fn availability(&self, coord: GridCoord) -> ActionAvailability {
        if !self.spawns(coord) {
            return ActionAvailability::NONE;
        }
        ActionAvailability::evaluate(self.player.held, self.cell(coord), self.in_range(coord))
    }

    /// Build the interaction panel for a cell from current state.
    #[must_use]
    pub fn panel(&self, coord: GridCoord) -> CellPanel {
        let state = self.cell(coord);
        let description = match state {
            Slot::Empty => {
                format!("There is a cache here at \"{coord}\". Currently there is no token.")
            }
            Slot::Holds(t) => {
                format!("There is a cache here at \"{coord}\". It has a token of {t}.")
            }
        };
        CellPanel {
            coord,
            state,
            description,
            label: state.token().map(|t| t.to_string()),
            in_range: self.in_range(coord),
            actions: self.availability(coord),
        }
    }

    /// Apply an action to a cell.
    ///
    /// Proximity is checked first, then that a cache spawns at the cell. A
    /// transition that changes state is written back to the store, pinning the
    /// cell for the rest of the session.
    pub fn act(&mut self, coord: GridCoord, action: Action) -> Outcome {
        if !self.in_range(coord) {
            let outcome = Outcome::Ignored(NoOpReason::OutOfRange);
            warn!(%coord, %action, player = %self.player.position, "{}", outcome.describe());
            return outcome;
        }
        if !self.spawns(coord) {
            let outcome = Outcome::Ignored(NoOpReason::NoCache);
            warn!(%coord, %action, "{}", outcome.describe());
            return outcome;
        }

        let mut cell = self.store.get(coord);
        let outcome = apply(action, &mut self.player.held, &mut cell, self.win_threshold);

        if !outcome.changed() {
            warn!(%coord, %action, "{}", outcome.describe());
            return outcome;
        }

        self.store.set(coord, cell);
        info!(%coord, %action, held = %self.player.held, cell = %cell, "{}", outcome.describe());

        if let Outcome::Crafted {
            produced,
            completed: true,
        } = outcome
            && self.completed.is_none()
        {
            info!(%produced, "win threshold reached");
            self.completed = Some(produced);
        }
        outcome
    }

    /// Move the player one tile.
    pub fn move_player(&mut self, direction: Direction) -> GridCoord {
        self.player.step(direction)
    }

    /// Move by direction name; unknown names leave the player where they are.
    pub fn move_player_named(&mut self, name: &str) -> GridCoord {
        match Direction::parse(name) {
            Some(direction) => self.move_player(direction),
            None => {
                warn!(name, "unknown movement direction");
                self.player.position
            }
        }
    }

    /// Clear the surface and redraw the neighbourhood and status.
    pub fn refresh(&self, surface: &mut impl OverlaySurface) {
        surface.clear_overlays();
        for cell in self.visible_cells() {
            surface.draw_cell(&cell);
        }
        surface.set_status(&self.status_text());
    }
}
