//! Play command implementation - interactive TUI.

#![allow(clippy::needless_pass_by_value)]

use super::{CliError, ConfigOverrides, load_config};
use cachegrid::game::CellPanel;
use cachegrid::world::{OverlaySurface, SpawnedCell};
use cachegrid::{Action, Direction, GameSession, GridCoord, Slot};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::HashMap;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config or saved session is invalid, if `--resume`
/// is combined with `--config` or override flags, or if the TUI fails.
pub(crate) fn execute(
    config: Option<PathBuf>,
    resume: Option<PathBuf>,
    save: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<(), CliError> {
    if resume.is_some() && (config.is_some() || !overrides.is_empty()) {
        return Err(CliError::new(
            "--resume plays with the saved config; drop --config and the override flags",
        ));
    }

    let session = match resume {
        Some(path) => {
            let session = GameSession::resume(&path).map_err(|e| {
                CliError::new(format!("Failed to resume {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "session resumed");
            session
        }
        None => GameSession::new(load_config(config, overrides)?)?,
    };

    let app = run_tui(App::new(session))?;

    if let Some(path) = save {
        app.session
            .save(&path)
            .map_err(|e| CliError::new(format!("Failed to save {}: {e}", path.display())))?;
        println!("Session saved to {}", path.display());
    }
    println!("{}", app.session.status_text());

    Ok(())
}

/// What the map panel currently shows.
#[derive(Debug, Default)]
struct TuiSurface {
    overlays: HashMap<GridCoord, Slot>,
    status: String,
}

impl OverlaySurface for TuiSurface {
    fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    fn draw_cell(&mut self, cell: &SpawnedCell) {
        self.overlays.insert(cell.coord, cell.state);
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

/// App state for the TUI.
struct App {
    session: GameSession,
    surface: TuiSurface,
    selected: Option<GridCoord>,
    panel: Option<CellPanel>,
    message: String,
}

impl App {
    fn new(session: GameSession) -> Self {
        let mut app = Self {
            session,
            surface: TuiSurface::default(),
            selected: None,
            panel: None,
            message: String::from("Use the arrow keys to walk, Tab to pick a cache."),
        };
        app.redraw();
        app
    }

    fn redraw(&mut self) {
        self.session.refresh(&mut self.surface);
        if let Some(coord) = self.selected
            && !self.surface.overlays.contains_key(&coord)
        {
            self.selected = None;
        }
    }

    /// Visible caches, nearest first.
    fn caches_by_distance(&self) -> Vec<GridCoord> {
        let player = self.session.player().position;
        let mut coords: Vec<GridCoord> = self.surface.overlays.keys().copied().collect();
        coords.sort_by(|a, b| {
            a.distance(player)
                .total_cmp(&b.distance(player))
                .then_with(|| a.cmp(b))
        });
        coords
    }

    fn cycle(&mut self, forward: bool) {
        let coords = self.caches_by_distance();
        if coords.is_empty() {
            self.selected = None;
            return;
        }
        let len = coords.len();
        let next = match self.selected.and_then(|c| coords.iter().position(|&x| x == c)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.selected = coords.get(next).copied();
        self.panel = None;
    }

    fn step(&mut self, direction: Direction) {
        let position = self.session.move_player(direction);
        self.panel = None;
        self.redraw();
        self.message = format!("Walked {direction:?} to {position}");
    }

    fn toggle_panel(&mut self) {
        self.panel = match (self.panel.take(), self.selected) {
            (None, Some(coord)) => Some(self.session.panel(coord)),
            _ => None,
        };
    }

    fn act(&mut self, action: Action) {
        let Some(coord) = self.selected else {
            self.message = String::from("Select a cache first (Tab).");
            return;
        };
        let outcome = self.session.act(coord, action);
        self.message = outcome.describe();
        self.redraw();
        if self.panel.is_some() {
            self.panel = Some(self.session.panel(coord));
        }
    }

    /// Handle one key press. Returns false when the user quits.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Esc if self.panel.is_some() => self.panel = None,
            KeyCode::Esc => return false,
            KeyCode::Up | KeyCode::Char('k') => self.step(Direction::North),
            KeyCode::Down | KeyCode::Char('j') => self.step(Direction::South),
            KeyCode::Right | KeyCode::Char('l') => self.step(Direction::East),
            KeyCode::Left | KeyCode::Char('h') => self.step(Direction::West),
            KeyCode::Tab => self.cycle(true),
            KeyCode::BackTab => self.cycle(false),
            KeyCode::Enter => self.toggle_panel(),
            KeyCode::Char('p') => self.act(Action::Poke),
            KeyCode::Char('c') => self.act(Action::Craft),
            KeyCode::Char('s') => self.act(Action::Store),
            _ => {}
        }
        true
    }
}

fn run_tui(mut app: App) -> Result<App, CliError> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore the terminal even when the loop failed.
    if let Err(e) = disable_raw_mode() {
        error!(error = %e, "failed to disable raw mode");
    }
    if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        error!(error = %e, "failed to leave alternate screen");
    }
    if let Err(e) = terminal.show_cursor() {
        error!(error = %e, "failed to show cursor");
    }

    result.map(|()| app)
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let [header, main, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .areas(f.area());

    render_header(f, header, app);

    let [map, side] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(main);
    render_map(f, map, app);
    render_side(f, side, app);

    render_footer(f, footer, app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let style = if app.session.status().is_completed() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let header = Paragraph::new(format!(" Cachegrid | {} ", app.surface.status))
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Colour ramp by token level.
fn token_color(slot: Slot) -> Color {
    match slot.token().map(cachegrid::Token::level) {
        None => Color::Gray,
        Some(1) => Color::Blue,
        Some(2) => Color::Cyan,
        Some(3) => Color::Green,
        Some(4) => Color::Yellow,
        Some(5) => Color::LightRed,
        Some(_) => Color::Magenta,
    }
}

/// One glyph per cache: `o` when empty, otherwise the token level in base 36.
fn cache_glyph(slot: Slot) -> char {
    match slot.token() {
        None => 'o',
        Some(t) => char::from_digit(t.level(), 36).unwrap_or('#'),
    }
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let player = app.session.player().position;

    // Two columns per tile keep the map roughly square.
    let half_cols = i32::from(area.width.saturating_sub(2)) / 4;
    let half_rows = i32::from(area.height.saturating_sub(2)) / 2;

    let mut lines: Vec<Line> = Vec::new();
    for row in -half_rows..=half_rows {
        let mut spans = Vec::new();
        for col in -half_cols..half_cols {
            // North is up: rows count down from the player's latitude.
            let Some(coord) = player.checked_offset(-row, col) else {
                spans.push(Span::raw("  "));
                continue;
            };
            let mut style = Style::default();
            let glyph = if coord == player {
                style = style.fg(Color::White).add_modifier(Modifier::BOLD);
                '@'
            } else if let Some(&slot) = app.surface.overlays.get(&coord) {
                style = style.fg(token_color(slot));
                cache_glyph(slot)
            } else if app.session.in_range(coord) {
                style = style.fg(Color::Gray);
                '.'
            } else {
                style = style.fg(Color::DarkGray);
                '.'
            };
            if app.selected == Some(coord) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{glyph} "), style));
        }
        lines.push(Line::from(spans));
    }

    let title = format!(" Map around {player} ");
    let map = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(map, area);
}

fn button(key: char, action: Action, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("[{key}] {action}  "), style)
}

fn render_side(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    let geo = app.session.mapper().corner_of(app.session.player().position);
    lines.push(Line::from(format!(
        "You are at {} ({:.5}, {:.5})",
        app.session.player().position,
        geo.lat,
        geo.lng
    )));
    lines.push(Line::from(format!("Caches in view: {}", app.surface.overlays.len())));
    lines.push(Line::from(""));

    match (&app.panel, app.selected) {
        (Some(panel), _) => {
            lines.push(Line::from(Span::styled(
                panel.label.clone().unwrap_or_default(),
                Style::default().fg(token_color(panel.state)).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(panel.description.clone()));
            if !panel.in_range {
                lines.push(Line::from(Span::styled(
                    "Too far away to reach.",
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                button('p', Action::Poke, panel.actions.poke),
                button('c', Action::Craft, panel.actions.craft),
                button('s', Action::Store, panel.actions.store),
            ]));
        }
        (None, Some(coord)) => {
            lines.push(Line::from(format!("Selected cache at {coord}")));
            lines.push(Line::from("Press Enter to open it."));
        }
        (None, None) => lines.push(Line::from("No cache selected.")),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.message.clone(),
        Style::default().fg(Color::Yellow),
    )));

    let side = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Cache "))
        .wrap(Wrap { trim: false });
    f.render_widget(side, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.panel.is_some() {
        " [p] Poke  [c] Craft  [s] Store  [Esc] Close  [q] Quit "
    } else {
        " [←↑↓→/hjkl] Walk  [Tab] Next cache  [Enter] Open  [q] Quit "
    };
    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
