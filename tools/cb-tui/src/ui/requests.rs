//! Requests view UI rendering.

use crate::app::App;
use cb_dashboard::{ProbeClass, ProbeEntry, ProbePreset};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Render the requests view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Presets
            Constraint::Min(6),    // Log + detail
        ])
        .split(area);

    render_presets(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_log(frame, app, body[0]);
    render_detail(frame, app.log.get(app.requests_selected), body[1]);
}

fn render_presets(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = ProbePreset::ALL
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let request = preset.request();
            Line::from(vec![
                Span::styled(format!(" [{}] ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:<18}", preset.title()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<6}", request.method),
                    Style::default().fg(Color::Blue),
                ),
                Span::raw(app.guide.base_url().to_string()),
                Span::styled(request.endpoint, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let presets = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Send to {} ", display_base(app.guide.base_url()))),
    );
    frame.render_widget(presets, area);
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Request log ({}) ", app.log.len()))
        .border_style(Style::default().fg(Color::Green));

    if app.log.is_empty() {
        let empty = Paragraph::new("\n  No requests sent yet. Press 1, 2 or 3.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![" Time", "Method", "Status", "Endpoint"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);

    let rows: Vec<Row> = app
        .log
        .entries()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.requests_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                ratatui::text::Text::raw(format!(" {}", entry.time)),
                ratatui::text::Text::raw(entry.method.to_string()),
                ratatui::text::Text::styled(
                    status_text(entry),
                    Style::default().fg(class_color(entry.class())),
                ),
                ratatui::text::Text::raw(entry.endpoint.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Min(20),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_detail(frame: &mut Frame, entry: Option<&ProbeEntry>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Response ");
    let Some(entry) = entry else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" #{} ", entry.id),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            status_text(entry),
            Style::default()
                .fg(class_color(entry.class()))
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(Line::raw(""));
    match &entry.error {
        Some(error) => lines.push(Line::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => lines.extend(entry.response.lines().map(|l| Line::raw(l.to_string()))),
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block.border_style(Style::default().fg(class_color(entry.class()))));
    frame.render_widget(detail, area);
}

fn status_text(entry: &ProbeEntry) -> String {
    if entry.status == 0 {
        "ERR".to_string()
    } else {
        entry.status.to_string()
    }
}

fn class_color(class: ProbeClass) -> Color {
    match class {
        ProbeClass::Success => Color::Green,
        ProbeClass::ClientError => Color::Yellow,
        ProbeClass::Failure => Color::Red,
    }
}

fn display_base(base_url: &str) -> &str {
    if base_url.is_empty() {
        "same origin"
    } else {
        base_url
    }
}
