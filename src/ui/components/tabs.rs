use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Tabs},
    Frame,
};

use crate::app::state::App;

pub fn render_category_tabs(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let p = app.theme.palette();
    let category_titles = app
        .catalog
        .categories()
        .iter()
        .map(|c| Line::from(c.to_string()))
        .collect::<Vec<_>>();
    let cat_tabs = Tabs::new(category_titles)
        .select(app.selected_category)
        .block(
            Block::default()
                .title(" Category ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(p.panel)),
        )
        .style(Style::default().fg(p.muted))
        .highlight_style(
            Style::default()
                .fg(p.success)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" | ");
    frame.render_widget(cat_tabs, area);
}
