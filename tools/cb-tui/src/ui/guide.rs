//! API guide view UI rendering.

use crate::app::App;
use cb_dashboard::ProbeMethod;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the API guide view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    render_index(frame, app, chunks[0]);
    render_example(frame, app, chunks[1]);
}

fn method_color(method: ProbeMethod) -> Color {
    match method {
        ProbeMethod::Get => Color::Green,
        ProbeMethod::Post => Color::Blue,
        _ => Color::Magenta,
    }
}

/// Endpoint list.
fn render_index(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .guide
        .examples()
        .iter()
        .enumerate()
        .map(|(i, example)| {
            let style = if i == app.guide_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<6} ", example.method),
                    Style::default().fg(method_color(example.method)),
                ),
                Span::raw(example.title),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" API endpoints "),
    );
    frame.render_widget(list, area);
}

/// Selected example: description, request, response and curl.
fn render_example(frame: &mut Frame, app: &App, area: Rect) {
    let Some(example) = app.guide.examples().get(app.guide_selected) else {
        return;
    };

    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let code = Style::default().fg(Color::Cyan);

    let mut lines = vec![
        Line::from(Span::styled(
            example.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(example.description),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", example.method),
                Style::default().fg(method_color(example.method)),
            ),
            Span::raw(app.guide.url(example)),
        ]),
    ];

    if let Some(body) = example.request_body {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Request", heading));
        lines.extend(body.lines().map(|l| Line::styled(l.to_string(), code)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("Response", heading));
    lines.extend(
        example
            .response_example
            .lines()
            .map(|l| Line::styled(l.to_string(), code)),
    );

    lines.push(Line::raw(""));
    lines.push(Line::styled("curl", heading));
    lines.extend(
        app.guide
            .curl(example)
            .lines()
            .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Gray))),
    );

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", example.id)),
    );
    frame.render_widget(paragraph, area);
}
