//! Call history view UI rendering.

use super::stat_line;
use crate::app::App;
use cb_dashboard::format_duration;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};
use shared_types::RecordingStatus;

/// Render the call history view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Filters
            Constraint::Min(6),    // Recordings
        ])
        .split(area);

    render_stats(frame, app, chunks[0]);
    render_filters(frame, app, chunks[1]);
    render_recordings(frame, app, chunks[2]);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.history_stats();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let panels = [
        ("Recordings", stats.total, Color::Blue),
        ("Available", stats.available, Color::Green),
        ("Drivers", stats.drivers, Color::Cyan),
        ("Companies", stats.companies, Color::Magenta),
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

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let search = if app.filter.search.is_empty() {
        "-".to_string()
    } else {
        app.filter.search.clone()
    };
    let value = Style::default().fg(Color::Cyan);

    let line = Line::from(vec![
        Span::raw(" Search: "),
        Span::styled(search, value),
        Span::raw("   Status: "),
        Span::styled(app.filter.status.to_string(), value),
        Span::raw("   Company: "),
        Span::styled(app.filter.company.to_string(), value),
        Span::raw("   Date: "),
        Span::styled(app.filter.date.to_string(), value),
    ]);

    let border = if app.filter.is_default() {
        Color::DarkGray
    } else {
        Color::Yellow
    };
    let filters = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filters ")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(filters, area);
}

fn render_recordings(frame: &mut Frame, app: &App, area: Rect) {
    let recordings = app.filtered_recordings();

    let header = Row::new(vec![
        " Id",
        "Client",
        "Phone",
        "Driver",
        "Driver phone",
        "Company",
        "Duration",
        "Date",
        "Size",
        "Status",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .height(1);

    let rows: Vec<Row> = recordings
        .iter()
        .enumerate()
        .map(|(i, recording)| {
            let style = if i == app.history_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            let status_color = match recording.status {
                RecordingStatus::Available => Color::Green,
                RecordingStatus::Processing => Color::Yellow,
                RecordingStatus::Failed => Color::Red,
            };

            Row::new(vec![
                format!(" {}", recording.id).into(),
                recording.client_name.clone().into(),
                recording.phone_number.clone().into(),
                recording.driver_id.clone().into(),
                recording.driver_phone.clone().into(),
                recording.company_id.clone().into(),
                format_duration(recording.duration).into(),
                recording
                    .date
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .into(),
                recording.file_size.clone().into(),
                ratatui::text::Text::styled(
                    recording.status.as_str(),
                    Style::default().fg(status_color),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(13),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(17),
        Constraint::Length(8),
        Constraint::Length(11),
    ];

    let title = format!(
        " Recordings ({} of {}) ",
        recordings.len(),
        app.recordings.len()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(table, area);
}
