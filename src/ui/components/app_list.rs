use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::state::{App, CatalogStatus};
use crate::utils::{human_size, truncate_with_ellipsis};

pub fn render_app_list(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let p = app.theme.palette();
    let catalog_block = Block::default()
        .title(" Catalog ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.panel))
        .style(Style::default().bg(p.bg));
    let catalog_inner = catalog_block.inner(area);
    frame.render_widget(catalog_block, area);

    match &app.catalog_status {
        CatalogStatus::Failed(message) => {
            render_error_card(frame, catalog_inner, app, message.clone());
            return;
        }
        CatalogStatus::Loading if app.catalog.is_empty() => {
            let loading = Paragraph::new("Loading catalog...").style(Style::default().fg(p.muted));
            frame.render_widget(loading, catalog_inner);
            return;
        }
        _ => {}
    }

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(catalog_inner);

    let header_line = Paragraph::new("Name                 Category        Size        Description")
        .style(Style::default().fg(p.muted).add_modifier(Modifier::BOLD));
    frame.render_widget(header_line, left_chunks[0]);

    let list_width = left_chunks[1].width as usize;
    let desc_width = if list_width > 54 { list_width - 54 } else { 12 };
    let items: Vec<ListItem> = app
        .filtered_indices
        .iter()
        .filter_map(|idx| app.catalog.entries().get(*idx))
        .map(|entry| {
            let display_name = truncate_with_ellipsis(&entry.name, 20);
            let display_category = truncate_with_ellipsis(&entry.category, 14);
            let display_desc = truncate_with_ellipsis(&entry.description, desc_width);

            let line = Line::from(vec![
                Span::styled(format!("{:<21}", display_name), Style::default().fg(p.text)),
                Span::styled(
                    format!("{:<16}", display_category),
                    Style::default().fg(p.muted),
                ),
                Span::styled(
                    format!("{:<12}", human_size(entry.size_bytes)),
                    Style::default().fg(p.primary),
                ),
                Span::styled(display_desc, Style::default().fg(p.text)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let app_list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(p.highlight)
                .fg(p.text)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ")
        .repeat_highlight_symbol(true);

    frame.render_stateful_widget(app_list, left_chunks[1], &mut app.list_state);
}

fn render_error_card(frame: &mut Frame<'_>, area: Rect, app: &App, message: String) {
    let p = app.theme.palette();
    let card = Paragraph::new(message)
        .style(Style::default().fg(p.warning))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Catalog unavailable ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(p.warning)),
        );
    let height = area.height.min(5);
    frame.render_widget(card, Rect::new(area.x, area.y, area.width, height));
}
