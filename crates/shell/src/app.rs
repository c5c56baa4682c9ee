use crate::bindings::{default_bindings, QueryBinding};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use database::{format_rows, QueryGateway};
use ratatui::layout::{Position, Rect};

/// How many result lines one PgUp/PgDn press scrolls.
const SCROLL_STEP: u16 = 5;

/// Where the shell is in handling the most recent trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Executing(usize),
    ResultsShown(usize),
    ErrorShown(usize),
}

/// What the event loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Run(usize),
    Quit,
}

/// The presentation shell's state: the trigger controls, the two text
/// areas, and the gateway every trigger goes through.
pub struct ShellApp<G: QueryGateway> {
    gateway: G,
    pub bindings: Vec<QueryBinding>,
    pub selected: usize,
    pub phase: Phase,
    pub results: String,
    pub error: String,
    pub results_scroll: u16,
    /// Screen areas of the trigger controls from the last draw, for mouse hits.
    pub(crate) button_areas: Vec<Rect>,
    closed: bool,
}

impl<G: QueryGateway> ShellApp<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            bindings: default_bindings(),
            selected: 0,
            phase: Phase::Idle,
            results: String::new(),
            error: String::new(),
            results_scroll: 0,
            button_areas: Vec::new(),
            closed: false,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Makes sure the table exists. A failure only fills the error area.
    pub async fn startup(&mut self) {
        if let Err(e) = self.gateway.ensure_schema().await {
            tracing::warn!(error = %e, "Schema setup failed.");
            self.error = e.to_string();
        }
    }

    /// Marks a trigger as executing so the next draw can show it.
    pub fn begin(&mut self, index: usize) {
        self.selected = index;
        self.phase = Phase::Executing(index);
    }

    /// Runs the query bound to `index` and fills the matching area.
    ///
    /// Success replaces the results and leaves the error area alone; failure
    /// replaces the error and leaves the previous results on screen.
    pub async fn run_query(&mut self, index: usize) {
        let Some(binding) = self.bindings.get(index) else {
            return;
        };
        let query = binding.query;
        self.begin(index);

        match self.gateway.execute(query).await {
            Ok(rows) => {
                self.results = format_rows(&rows);
                self.results_scroll = 0;
                self.phase = Phase::ResultsShown(index);
            }
            Err(e) => {
                tracing::warn!(trigger = index, error = %e, "Query failed.");
                self.error = e.to_string();
                self.phase = Phase::ErrorShown(index);
            }
        }
    }

    /// Releases the database connection. Only the first call reaches the gateway.
    pub async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.gateway.close().await;
    }

    pub fn handle_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => Action::None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(d) if (d as usize) < self.bindings.len() => Action::Run(d as usize),
                _ => Action::None,
            },
            KeyCode::Enter => Action::Run(self.selected),
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % self.bindings.len();
                Action::None
            }
            KeyCode::Up | KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + self.bindings.len() - 1) % self.bindings.len();
                Action::None
            }
            KeyCode::PageDown => {
                let last_line =
                    u16::try_from(self.results.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
                self.results_scroll = self.results_scroll.saturating_add(SCROLL_STEP).min(last_line);
                Action::None
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(SCROLL_STEP);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> Action {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Action::None;
        }
        let click = Position::new(mouse.column, mouse.row);
        self.button_areas
            .iter()
            .position(|area| area.contains(click))
            .map_or(Action::None, Action::Run)
    }
}
