use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    style::Style,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::App;
use crate::ui::components::{
    app_list::render_app_list,
    detail_panel::render_detail_panel,
    footer::render_footer,
    header::render_header,
    modal::{render_alert, render_login},
    tabs::render_category_tabs,
};

pub fn ui(frame: &mut Frame<'_>, app: &mut App) {
    let p = app.theme.palette();
    frame.render_widget(Block::default().style(Style::default().bg(p.bg)), frame.area());

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
        ])
        .split(frame.area());

    render_header(frame, vertical[0], app);
    render_category_tabs(frame, vertical[1], app);

    let search_title = if app.search_mode {
        " Search mode (/): typing... Enter apply, Esc close "
    } else {
        " Search (/ to start, Esc clear) "
    };

    let search_text = if app.filter.query.is_empty() {
        "Type to filter by name, description, tags".to_string()
    } else {
        app.filter.query.clone()
    };
    let search = Paragraph::new(search_text)
        .block(
            Block::default()
                .title(search_title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if app.search_mode {
                    p.primary
                } else {
                    p.panel
                })),
        )
        .style(if app.search_mode {
            Style::default().fg(p.text)
        } else {
            Style::default().fg(p.muted)
        });

    frame.render_widget(search, vertical[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(vertical[3]);

    render_app_list(frame, body[0], app);
    render_detail_panel(frame, body[1], app);

    render_footer(frame, vertical[4], app);

    if app.search_mode {
        let cursor_x = vertical[2].x + 1 + app.filter.query.chars().count() as u16;
        let cursor_y = vertical[2].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    if let Some(form) = &app.login {
        render_login(frame, app, form);
    }

    if let Some(alert) = &app.alert {
        render_alert(frame, app, alert);
    }
}
