//! Window layout.
//!
//! Top to bottom: two rows of four trigger controls, the results area, the
//! error area, and a one-line status bar.

use crate::app::{Phase, ShellApp};
use database::QueryGateway;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const BUTTONS_PER_ROW: usize = 4;

pub fn render<G: QueryGateway>(f: &mut Frame, app: &mut ShellApp<G>) {
    let button_rows = app.bindings.len().div_ceil(BUTTONS_PER_ROW) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(button_rows * 3),
            Constraint::Min(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_buttons(f, app, chunks[0]);
    render_results(f, app, chunks[1]);
    render_error(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

fn render_buttons<G: QueryGateway>(f: &mut Frame, app: &mut ShellApp<G>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3);
            app.bindings.len().div_ceil(BUTTONS_PER_ROW)
        ])
        .split(area);

    let mut areas = Vec::with_capacity(app.bindings.len());
    for row in rows.iter() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, BUTTONS_PER_ROW as u32);
                BUTTONS_PER_ROW
            ])
            .split(*row);
        areas.extend(cells.iter().copied());
    }
    areas.truncate(app.bindings.len());

    let running = match app.phase {
        Phase::Executing(i) => Some(i),
        _ => None,
    };

    for (index, (binding, cell)) in app.bindings.iter().zip(areas.iter()).enumerate() {
        let border_style = if running == Some(index) {
            Style::default().fg(Color::Yellow)
        } else if index == app.selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let label_style = if index == app.selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let button = Paragraph::new(Span::styled(binding.label.as_str(), label_style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border_style));
        f.render_widget(button, *cell);
    }

    app.button_areas = areas;
}

fn render_results<G: QueryGateway>(f: &mut Frame, app: &ShellApp<G>, area: Rect) {
    let results = Paragraph::new(app.results.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .scroll((app.results_scroll, 0));
    f.render_widget(results, area);
}

fn render_error<G: QueryGateway>(f: &mut Frame, app: &ShellApp<G>, area: Rect) {
    let error = Paragraph::new(app.error.as_str())
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(" Errors "))
        .wrap(Wrap { trim: false });
    f.render_widget(error, area);
}

fn render_status<G: QueryGateway>(f: &mut Frame, app: &ShellApp<G>, area: Rect) {
    let (text, color) = match app.phase {
        Phase::Idle => ("Ready".to_string(), Color::DarkGray),
        Phase::Executing(i) => (format!("Running query {i}..."), Color::Yellow),
        Phase::ResultsShown(i) => (format!("Query {i} done"), Color::Green),
        Phase::ErrorShown(i) => (format!("Query {i} failed"), Color::Red),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(text, Style::default().fg(color)),
        Span::styled(
            " | 0-7 run  ↑↓ select  Enter run  PgUp/PgDn scroll  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::{DbError, DbRow};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    struct IdleGateway;

    #[async_trait(?Send)]
    impl QueryGateway for IdleGateway {
        async fn ensure_schema(&mut self) -> Result<(), DbError> {
            Ok(())
        }

        async fn execute(&mut self, _query: &str) -> Result<Vec<DbRow>, DbError> {
            Ok(Vec::new())
        }

        async fn close(&mut self) {}
    }

    fn draw(app: &mut ShellApp<IdleGateway>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn lines(buffer: &Buffer) -> Vec<String> {
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn every_button_is_drawn_and_recorded() {
        let mut app = ShellApp::new(IdleGateway);
        let buffer = draw(&mut app);
        let screen = lines(&buffer).join("\n");

        for index in 0..8 {
            assert!(screen.contains(&format!("Запрос {index}")), "button {index}");
        }
        assert_eq!(app.button_areas.len(), 8);
        assert_eq!(app.button_areas[0], Rect::new(0, 0, 20, 3));
        assert_eq!(app.button_areas[5].y, 3);
    }

    #[test]
    fn results_and_errors_land_in_their_own_areas() {
        let mut app = ShellApp::new(IdleGateway);
        app.results = "('A')\n('Ivanov')".to_string();
        app.error = "Error executing query: boom".to_string();

        let buffer = draw(&mut app);
        let rows = lines(&buffer);

        let result_row = rows.iter().position(|l| l.contains("('Ivanov')")).unwrap();
        let error_row = rows.iter().position(|l| l.contains("boom")).unwrap();
        assert!(result_row < error_row);

        let x = rows[error_row].chars().position(|c| c == 'b').unwrap() as u16;
        let cell = buffer.content[error_row * 80 + x as usize].clone();
        assert_eq!(cell.style().fg, Some(Color::Red));
    }
}
