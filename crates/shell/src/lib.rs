//! # Shell Crate
//!
//! The presentation shell: a terminal window with one trigger control per
//! fixed query, a results area and an error area.
//!
//! Every database call is awaited inline on the UI task, so the window does
//! not redraw or take input while a query runs. There is one connection for
//! the whole session and it is released exactly once when the window closes.

pub mod app;
pub mod bindings;
pub mod error;
pub mod ui;

pub use app::{Action, Phase, ShellApp};
pub use bindings::{default_bindings, QueryBinding};
pub use error::ShellError;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use database::QueryGateway;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Database App";

type ShellTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Opens the window, runs it until the user closes it, and restores the terminal.
///
/// The gateway is closed on every exit path, including terminal errors.
pub async fn run<G: QueryGateway>(gateway: G) -> Result<(), ShellError> {
    tracing::info!("Starting the query shell...");

    let mut app = ShellApp::new(gateway);
    app.startup().await;

    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            app.shutdown().await;
            // Setup may have stopped part way; undo whatever it got to.
            let _ = disable_raw_mode();
            let _ = leave_screen(&mut io::stdout());
            return Err(e);
        }
    };
    let result = event_loop(&mut terminal, &mut app).await;

    app.shutdown().await;
    let restored = restore_terminal(&mut terminal);

    tracing::info!("Query shell finished.");
    result.and(restored)
}

async fn event_loop<G: QueryGateway>(
    terminal: &mut ShellTerminal,
    app: &mut ShellApp<G>,
) -> Result<(), ShellError> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        match app.handle_event(&event::read()?) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Run(index) => {
                app.begin(index);
                terminal.draw(|f| ui::render(f, app))?;
                app.run_query(index).await;
            }
        }
    }
}

fn setup_terminal() -> Result<ShellTerminal, ShellError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(WINDOW_TITLE))?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut ShellTerminal) -> Result<(), ShellError> {
    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leaves the alternate screen and stops mouse capture. Both are harmless
/// when they were never turned on.
fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}
