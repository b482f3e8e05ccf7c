//! Application state and logic.

use crate::config::Config;
use crate::gesture::{CellSize, Direction};
use crate::import::{self, DeckEntry};
use crate::models::Outcome;
use crate::session::Session;
use crate::store::Store;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::time::Duration;
use tracing::{error, info, warn};
use tui_theme::ColorPalette;

pub struct App {
    pub store: Store,
    pub config: Config,
    pub palette: ColorPalette,
    pub view: View,
    pub home_item: HomeItem,
    pub decks: Vec<DeckEntry>,
    pub selected_deck: usize,
    pub deck_name: Option<String>,
    pub has_deck: bool,
    pub session: Option<Session>,
    /// Why the practice view could not load its deck.
    pub load_error: Option<String>,
    pub alert: Option<Alert>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Resting area of the active card, set when drawn.
    pub card_area: Option<Rect>,
    bell: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    DeckPicker,
    Practice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    LoadDeck,
    Practice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub text: String,
    pub is_error: bool,
}

impl Alert {
    fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

impl App {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::load();
        if Config::config_path().is_some_and(|p| !p.exists()) {
            if let Err(err) = config.save() {
                warn!(error = %err, "failed to write default config");
            }
        }
        let db_path = Config::db_path().unwrap_or_else(|| "memor.db".into());
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Store::open(&db_path)?;
        info!(path = %db_path.display(), "opened store");
        Self::with_store(store, config)
    }

    pub fn with_store(store: Store, config: Config) -> anyhow::Result<Self> {
        let palette = config.display.palette();
        let mut app = Self {
            store,
            config,
            palette,
            view: View::Home,
            home_item: HomeItem::LoadDeck,
            decks: Vec::new(),
            selected_deck: 0,
            deck_name: None,
            has_deck: false,
            session: None,
            load_error: None,
            alert: None,
            show_help: false,
            should_quit: false,
            card_area: None,
            bell: false,
        };
        app.refresh_home()?;
        Ok(app)
    }

    pub fn refresh_home(&mut self) -> anyhow::Result<()> {
        self.has_deck = self.store.has_deck()?;
        self.deck_name = self.store.current_deck_name()?;
        Ok(())
    }

    pub fn cell_size(&self) -> CellSize {
        self.config.display.cell_size()
    }

    pub fn selected_deck(&self) -> Option<&DeckEntry> {
        self.decks.get(self.selected_deck)
    }

    /// Whether the practice card is moving or being dragged.
    pub fn is_animating(&self) -> bool {
        self.view == View::Practice && self.session.as_ref().is_some_and(|s| !s.motion().is_idle())
    }

    /// Whether the terminal bell should ring, clearing the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    pub fn handle_event(&mut self, event: &Event, at: Duration) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse, at),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.alert.take().is_some() {
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.view {
            View::Home => self.handle_home_key(key),
            View::DeckPicker => self.handle_picker_key(key),
            View::Practice => self.handle_practice_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.home_item = HomeItem::Practice,
            KeyCode::Char('k') | KeyCode::Up => self.home_item = HomeItem::LoadDeck,
            KeyCode::Enter | KeyCode::Char(' ') => match self.home_item {
                HomeItem::LoadDeck => self.open_picker(),
                HomeItem::Practice => self.start_practice(),
            },
            KeyCode::Char('l') => self.open_picker(),
            KeyCode::Char('p') => self.start_practice(),
            KeyCode::Char('R') => self.reset_scores(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.decks.is_empty() {
                    self.selected_deck = (self.selected_deck + 1).min(self.decks.len() - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_deck = self.selected_deck.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.import_selected(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') | KeyCode::Esc => self.view = View::Home,
            _ => {}
        }
    }

    fn handle_practice_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.leave_practice();
            return;
        }
        if key.code == KeyCode::Char('?') {
            self.interrupt_gesture();
            self.show_help = true;
            return;
        }

        let Some(session) = &mut self.session else {
            return;
        };

        let direction = match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
            KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
            KeyCode::Char('1') => Some(Direction::from_outcome(Outcome::Again)),
            KeyCode::Char('2') => Some(Direction::from_outcome(Outcome::Hard)),
            KeyCode::Char('3') => Some(Direction::from_outcome(Outcome::Good)),
            KeyCode::Char('4') => Some(Direction::from_outcome(Outcome::Easy)),
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('f') => {
                session.toggle_flip();
                None
            }
            _ => None,
        };

        if let Some(direction) = direction {
            session.fling(direction);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, at: Duration) {
        if self.view != View::Practice || self.alert.is_some() || self.show_help {
            if matches!(mouse.kind, MouseEventKind::Up(_)) {
                self.interrupt_gesture();
            }
            return;
        }
        let cells = self.cell_size();
        let card_area = self.card_area;
        let Some(session) = &mut self.session else {
            return;
        };

        let point = cells.point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let on_card = card_area.is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)));
                if on_card {
                    session.press(point, at);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => session.drag(point, at),
            MouseEventKind::Up(MouseButton::Left) => {
                session.release(point, at);
            }
            _ => {}
        }
    }

    /// Advance animations by one frame and apply anything they finished.
    pub fn tick(&mut self, dt: Duration) {
        if self.view != View::Practice {
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };

        if let Err(err) = session.tick(dt, &self.store) {
            error!(error = %err, "failed to save scores");
            session.cancel_gesture();
            self.alert = Some(Alert::error(format!("Could not save scores: {err}")));
        }
        if session.take_commit_feedback() && self.config.display.bell_on_commit {
            self.bell = true;
        }
    }

    fn open_picker(&mut self) {
        let user_dir = Config::user_decks_dir();
        self.decks = import::available_decks(user_dir.as_deref());
        self.selected_deck = self.selected_deck.min(self.decks.len().saturating_sub(1));
        self.view = View::DeckPicker;
    }

    fn import_selected(&mut self) {
        let Some(entry) = self.selected_deck().cloned() else {
            return;
        };

        let result = entry
            .read()
            .and_then(|text| import::import_deck(&self.store, &entry.name, &text));

        match result {
            Ok(count) => {
                self.has_deck = true;
                self.deck_name = Some(entry.name.clone());
                self.session = None;
                self.view = View::Home;
                self.home_item = HomeItem::Practice;
                self.alert = Some(Alert::info(format!("Loaded {} ({} cards)", entry.name, count)));
            }
            Err(err) => {
                error!(deck = %entry.name, error = %err, "failed to import deck");
                self.alert = Some(Alert::error("Failed to load deck. Try again."));
            }
        }
    }

    fn start_practice(&mut self) {
        if !self.has_deck {
            return;
        }
        self.view = View::Practice;
        if self.session.is_some() {
            return;
        }

        let gesture = self.config.gesture.clone();
        let motion = self.config.session_motion();
        match Session::load(&self.store, gesture, motion) {
            Ok(session) => {
                self.session = Some(session);
                self.load_error = None;
            }
            Err(err) => {
                error!(error = %err, "failed to load session");
                self.load_error = Some(err.to_string());
            }
        }
    }

    /// Release the card if a drag is in progress, so it does not stay held under a popup.
    fn interrupt_gesture(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel_gesture();
        }
    }

    fn leave_practice(&mut self) {
        self.interrupt_gesture();
        self.view = View::Home;
        self.card_area = None;
        if self.load_error.take().is_some() {
            self.session = None;
        }
    }

    fn reset_scores(&mut self) {
        let result = match &mut self.session {
            Some(session) => session.clear_scores(&self.store),
            None => self.store.clear_scores(),
        };
        match result {
            Ok(()) => self.alert = Some(Alert::info("Scores reset")),
            Err(err) => {
                warn!(error = %err, "failed to reset scores");
                self.alert = Some(Alert::error(format!("Could not reset scores: {err}")));
            }
        }
    }
}
