//! UI module for TUI rendering.
//!
//! Every view shares the header (tabs, session, feed status) and the key
//! hint footer; the body is drawn by the view module of the active tab.

pub mod active_calls;
pub mod guide;
pub mod history;
pub mod requests;

use crate::app::{App, InputMode, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the appropriate view based on active tab.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Active view
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.active_tab {
        Tab::ActiveCalls => active_calls::render(frame, app, chunks[1]),
        Tab::History => history::render(frame, app, chunks[1]),
        Tab::Requests => requests::render(frame, app, chunks[1]),
        Tab::Guide => guide::render(frame, app, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);
}

/// Render the header bar: tabs on the left, connection on the right.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for tab in Tab::ALL {
        let style = if tab == app.active_tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!(" [{}] {} ", tab.hotkey(), tab.name()),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let (status_symbol, status_color) = if app.connected {
        ("●", Color::Green)
    } else {
        ("○", Color::Red)
    };
    spans.push(Span::raw("│ "));
    spans.push(Span::styled(
        format!("{} {}", status_symbol, app.feed_label()),
        Style::default().fg(status_color),
    ));
    if let Some(user) = app.username() {
        spans.push(Span::raw("  │ "));
        spans.push(Span::styled(
            user.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" CALLBOARD ─── v{} ", env!("CARGO_PKG_VERSION"))),
    );
    frame.render_widget(header, area);
}

/// Render the footer with key hints, or the last error.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.last_error {
        Line::from(vec![
            Span::styled(" ERROR ", Style::default().fg(Color::White).bg(Color::Red)),
            Span::raw(" "),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ])
    } else if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.filter.search.clone()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
            Span::raw("   "),
            Span::styled("[Enter/Esc] ", Style::default().fg(Color::Yellow)),
            Span::raw("Done"),
        ])
    } else {
        let mut spans = Vec::new();
        for (key, label) in key_hints(app.active_tab) {
            spans.push(Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(*label));
        }
        spans.push(Span::raw("  │ "));
        spans.push(Span::styled("[R] ", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw("Refresh  "));
        spans.push(Span::styled("[Q] ", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw("Quit"));
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn key_hints(tab: Tab) -> &'static [(&'static str, &'static str)] {
    match tab {
        Tab::ActiveCalls => &[("↑/↓", "Select"), ("E", "End call")],
        Tab::History => &[
            ("/", "Search"),
            ("S", "Status"),
            ("C", "Company"),
            ("D", "Date"),
            ("↑/↓", "Navigate"),
        ],
        Tab::Requests => &[
            ("1", "Callback"),
            ("2", "Verification"),
            ("3", "API"),
            ("↑/↓", "Navigate"),
        ],
        Tab::Guide => &[("↑/↓", "Select example")],
    }
}

/// Label/value line used by the stat panels.
pub(crate) fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(" {}: ", label)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_dashboard::{ClientConfig, GatewayClient, MockFeed, DEFAULT_BASE_URL};
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn loaded_app() -> App {
        let client = GatewayClient::new(&ClientConfig::new(DEFAULT_BASE_URL)).unwrap();
        let mut app = App::new(Box::new(MockFeed::new()), client, None);
        app.refresh().await;
        app
    }

    #[tokio::test]
    async fn test_every_tab_renders() {
        let mut app = loaded_app().await;
        let expectations = [
            ('a', "Sarah Cohen"),
            ('h', "rec_1"),
            ('r', "No requests sent yet"),
            ('g', "Create a phone call"),
        ];

        for (key, expected) in expectations {
            app.on_key(KeyCode::Char(key));
            let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
            terminal.draw(|frame| render(frame, &app)).unwrap();
            let text = screen_text(&terminal);
            assert!(text.contains(expected), "tab {} missing {:?}", key, expected);
            assert!(text.contains("CALLBOARD"));
        }
    }

    #[tokio::test]
    async fn test_footer_shows_search_prompt() {
        let mut app = loaded_app().await;
        app.on_key(KeyCode::Char('/'));
        app.on_key(KeyCode::Char('x'));

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Search: x"));
    }
}
