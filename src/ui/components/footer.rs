use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::{App, LogLevel};

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let now = std::time::Instant::now();
    app.logs
        .retain(|l| now.duration_since(l.created_at) < std::time::Duration::from_secs(3));

    let p = app.theme.palette();
    let key = |label: &'static str, color: Color| {
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let hint = |label: &'static str| Span::styled(label, Style::default().fg(p.muted));

    let mut second_line: Vec<Span> = vec![
        hint("Actions "),
        key("Enter Open", p.primary),
        Span::raw("  "),
        key("I Install", p.success),
        Span::raw("  "),
        key("R Refresh", p.primary),
        Span::raw("  "),
        key("S Sign in", p.text),
        Span::raw("  "),
        key("X Sign out", p.warning),
        Span::styled("   |   ", Style::default().fg(p.panel)),
        Span::styled(
            format!(
                "visible:{} total:{} [{}]",
                app.filtered_indices.len(),
                app.catalog.len(),
                app.platform.label()
            ),
            Style::default().fg(p.muted),
        ),
    ];

    for l in &app.logs {
        let color = match l.level {
            LogLevel::Success => p.success,
            LogLevel::Error => p.warning,
            LogLevel::Info => p.primary,
        };
        second_line.push(Span::raw("  "));
        second_line.push(Span::styled(l.message.clone(), Style::default().fg(color)));
    }

    let footer_lines = vec![
        Line::from(vec![
            hint("Move "),
            key("↑/↓ j/k", p.text),
            hint("  Category "),
            key("←/→", p.text),
            hint("  Search "),
            key("/", p.primary),
            hint("  Theme "),
            key("T", p.text),
            hint("  Quit "),
            key("Q", p.text),
        ]),
        Line::from(second_line),
        Line::from(Span::styled(app.status.clone(), Style::default().fg(p.text))),
    ];
    let footer = Paragraph::new(footer_lines).block(
        Block::default()
            .title(" Command Bar ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(p.panel)),
    );
    frame.render_widget(footer, area);
}
