use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::App;
use crate::cache::FetchSource;

pub fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let p = app.theme.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.panel))
        .style(Style::default().bg(p.bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let mut title = vec![
        Span::styled(
            " AppLaunch ",
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("on {}", app.platform.label()),
            Style::default().fg(p.muted),
        ),
    ];
    if app.catalog_source == Some(FetchSource::Cache) {
        title.push(Span::styled("  (offline copy)", Style::default().fg(p.warning)));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), halves[0]);

    let user = match &app.session {
        Some(session) => Span::styled(
            format!("{} ", session.label()),
            Style::default().fg(p.text).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Not signed in ", Style::default().fg(p.muted)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(user)).alignment(Alignment::Right),
        halves[1],
    );
}
