use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Role};

const ORANGE: Color = Color::Rgb(255, 165, 0);

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Settings
                Constraint::Min(1),    // Transcript
                Constraint::Length(3), // Message entry
                Constraint::Length(1), // Status bar
            ]
            .as_ref(),
        )
        .split(f.area());

    let settings = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10)].as_ref())
        .split(chunks[0]);

    f.render_widget(
        field(
            "Max papers",
            &app.max_papers,
            app.focus == Focus::MaxPapers,
            app.can_set(),
        ),
        settings[0],
    );
    f.render_widget(
        field(
            "Search Query",
            &app.query,
            app.focus == Focus::Query,
            app.can_set(),
        ),
        settings[1],
    );

    draw_transcript(f, app, chunks[1]);

    f.render_widget(
        field(
            "Message",
            &app.message,
            app.focus == Focus::Message,
            app.can_chat(),
        ),
        chunks[2],
    );

    let status = Paragraph::new(app.status_line())
        .style(Style::default().bg(Color::Blue).fg(Color::White));
    f.render_widget(status, chunks[3]);
}

fn field<'a>(title: &'a str, value: &'a str, focused: bool, enabled: bool) -> Paragraph<'a> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(value).style(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    )
}

fn draw_transcript(f: &mut Frame, app: &App, area: Rect) {
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut rows = 0usize;
    for entry in &app.transcript {
        let (style, alignment) = match entry.role {
            Role::User => (Style::default().bg(ORANGE).fg(Color::Black), Alignment::Right),
            Role::Bot => (Style::default().bg(Color::Green).fg(Color::Black), Alignment::Left),
        };
        for text in entry.text.lines() {
            let width = text.chars().count().max(1);
            rows += width.div_ceil(inner_width);
            lines.push(
                Line::from(Span::styled(text.to_string(), style)).alignment(alignment),
            );
        }
        lines.push(Line::from(""));
        rows += 1;
    }

    // Stick to the bottom unless scrolled back.
    let max_offset = rows.saturating_sub(inner_height);
    let offset = max_offset.saturating_sub(app.scroll_back as usize);

    let title = Span::styled("Chat", Style::default().add_modifier(Modifier::BOLD));
    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(transcript, area);
}
