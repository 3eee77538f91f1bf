use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::state::App;
use crate::launch::{resolve_install, resolve_open};
use crate::utils::human_size;

pub fn render_detail_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let p = app.theme.palette();
    let details_block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.panel))
        .style(Style::default().bg(p.bg));
    let details_inner = details_block.inner(area);
    frame.render_widget(details_block, area);

    let field = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(p.muted)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let details_lines = if let Some(entry) = app.current_entry() {
        let install_display = resolve_install(entry, app.platform)
            .map(|action| action.describe())
            .unwrap_or_else(|_| "N/A".to_string());
        let open_display = resolve_open(entry, app.platform)
            .map(|action| action.describe())
            .unwrap_or_else(|_| "N/A".to_string());
        let tags = entry.tags.iter().cloned().collect::<Vec<_>>().join(", ");

        vec![
            Line::from(vec![
                Span::styled("Name: ", Style::default().fg(p.muted)),
                Span::styled(
                    entry.name.clone(),
                    Style::default().fg(p.text).add_modifier(Modifier::BOLD),
                ),
            ]),
            field("ID: ", entry.id.clone(), p.text),
            field("Category: ", entry.category.clone(), p.text),
            field("Tags: ", tags, p.text),
            field("Size: ", human_size(entry.size_bytes), p.text),
            field("Platform: ", app.platform.label().to_string(), p.text),
            Line::from(""),
            Line::from(Span::styled(
                entry.description.clone(),
                Style::default().fg(p.text),
            )),
            Line::from(""),
            field("Install: ", install_display, p.success),
            field("Open: ", open_display, p.primary),
        ]
    } else {
        vec![Line::from(Span::styled(
            "No apps match the current category/search.",
            Style::default().fg(p.muted),
        ))]
    };

    let details_widget = Paragraph::new(details_lines).wrap(Wrap { trim: true });
    frame.render_widget(details_widget, details_inner);
}
