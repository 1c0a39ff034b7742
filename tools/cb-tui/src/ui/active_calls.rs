//! Active calls view UI rendering.

use super::stat_line;
use crate::app::App;
use cb_dashboard::format_duration;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};
use shared_types::CallStatus;

/// Render the active calls view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Min(6),    // Call list
        ])
        .split(area);

    render_stats(frame, app, chunks[0]);
    render_calls(frame, app, chunks[1]);
}

/// Render the four counters.
fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.board.stats();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let panels = [
        ("Active calls", stats.active, Color::Green),
        ("Waiting", stats.waiting, Color::Yellow),
        ("Active drivers", stats.drivers, Color::Blue),
        ("Active companies", stats.companies, Color::Magenta),
    ];
    for ((label, value, color), chunk) in panels.into_iter().zip(chunks.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        frame.render_widget(
            Paragraph::new(stat_line(label, value.to_string(), color)).block(block),
            *chunk,
        );
    }
}

/// Render the live call table.
fn render_calls(frame: &mut Frame, app: &App, area: Rect) {
    let calls = app.board.calls();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Live calls: driver and client ")
        .border_style(Style::default().fg(Color::Green));

    if calls.is_empty() {
        let empty = Paragraph::new("\n  No active calls. All drivers are available.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        "",
        "Client",
        "Phone",
        "Caller ID",
        "Driver",
        "Driver phone",
        "Driver caller ID",
        "Company",
        "Duration",
        "State",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .height(1);

    let rows: Vec<Row> = calls
        .iter()
        .enumerate()
        .map(|(i, call)| {
            let style = if i == app.calls_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            let (dot, state) = match call.status {
                CallStatus::Active => (Color::Green, "active"),
                CallStatus::Waiting => (Color::Yellow, "waiting"),
                CallStatus::Completed => (Color::Gray, "completed"),
            };

            Row::new(vec![
                ratatui::text::Text::styled(" ●", Style::default().fg(dot)),
                call.client_name.clone().into(),
                call.phone_number.clone().into(),
                call.client_caller_id.clone().into(),
                call.driver_id.clone().into(),
                call.driver_phone.clone().into(),
                call.driver_caller_id.clone().into(),
                call.company_id.clone().into(),
                format_duration(call.duration.unwrap_or(0)).into(),
                state.into(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Length(14),
        Constraint::Length(17),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(table, area);
}
