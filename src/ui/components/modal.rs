use ratatui::{
    layout::Rect,
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::state::{Alert, App, LoginField, LoginForm};
use crate::ui::layout::centered_rect;

pub fn render_alert(frame: &mut Frame<'_>, app: &App, alert: &Alert) {
    let p = app.theme.palette();
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(alert.message.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "[ OK ]",
            Style::default()
                .fg(p.bg)
                .bg(p.warning)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let block = Paragraph::new(lines)
        .style(Style::default().fg(p.text).bg(p.bg))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" {} ", alert.title))
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(p.warning)),
        );
    frame.render_widget(block, area);
}

pub fn render_login(frame: &mut Frame<'_>, app: &App, form: &LoginForm) {
    let p = app.theme.palette();
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let field_style = |field: LoginField| {
        if form.focus == field {
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.muted)
        }
    };
    let masked = "*".repeat(form.password.chars().count());

    let lines = vec![
        Line::from(vec![
            Span::styled("Email:    ", field_style(LoginField::Email)),
            Span::styled(form.email.clone(), Style::default().fg(p.text)),
        ]),
        Line::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::styled(masked, Style::default().fg(p.text)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter sign in  Tab switch field  Ctrl+G provider sign-in  Esc close",
            Style::default().fg(p.muted),
        )),
    ];
    let block = Paragraph::new(lines)
        .style(Style::default().bg(p.bg))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Sign in ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(p.primary)),
        );
    frame.render_widget(block, area);

    let (label_row, text_len) = match form.focus {
        LoginField::Email => (0, form.email.chars().count()),
        LoginField::Password => (1, form.password.chars().count()),
    };
    let cursor = Rect::new(area.x + 11 + text_len as u16, area.y + 1 + label_row, 1, 1);
    frame.set_cursor_position((cursor.x, cursor.y));
}
