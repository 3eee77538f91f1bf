use std::io::Stdout;
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::actions::{
    drain_events, install_focused, open_focused, poll_launches, popup_login, request_catalog,
    sign_out, submit_login, Services,
};
use super::state::{App, LoginForm};
use crate::launch::Clock;
use crate::system::navigator::{Navigator, Prober};
use crate::ui::draw::ui;

pub fn run<N: Navigator + Prober, C: Clock>(
    app: &mut App,
    services: &mut Services<N, C>,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<()> {
    loop {
        drain_events(app, services);
        poll_launches(app, services);
        terminal.draw(|frame| ui(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(app, services, key).is_break() {
                break;
            }
        }
    }

    Ok(())
}

pub fn handle_key<N: Navigator + Prober, C: Clock>(
    app: &mut App,
    services: &mut Services<N, C>,
    key: KeyEvent,
) -> ControlFlow<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return ControlFlow::Break(());
    }

    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.alert = None;
        }
        return ControlFlow::Continue(());
    }

    if app.login.is_some() {
        handle_login_key(app, services, key);
        return ControlFlow::Continue(());
    }

    if app.search_mode {
        match key.code {
            KeyCode::Esc => {
                app.search_mode = false;
            }
            KeyCode::Enter => {
                app.search_mode = false;
                app.set_status(format!("Search applied: '{}'", app.filter.query));
            }
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.push_search_char(c);
                }
            }
            _ => {}
        }
        return ControlFlow::Continue(());
    }

    match key.code {
        KeyCode::Char('q') => return ControlFlow::Break(()),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Left | KeyCode::Char('h') => app.category_left(),
        KeyCode::Right | KeyCode::Char('l') => app.category_right(),
        KeyCode::Char('/') => {
            app.search_mode = true;
        }
        KeyCode::Esc => {
            if !app.filter.query.is_empty() {
                app.clear_search();
                app.set_status("Search cleared.");
            }
        }
        KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char('O') => open_focused(app, services),
        KeyCode::Char('i') | KeyCode::Char('I') => install_focused(app, services),
        KeyCode::Char('r') | KeyCode::Char('R') => request_catalog(app, services, false),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if app.session.is_some() {
                app.set_status("Already signed in. Press x to sign out.");
            } else {
                app.login = Some(LoginForm::default());
            }
        }
        KeyCode::Char('x') | KeyCode::Char('X') => sign_out(app, services),
        _ => {}
    }
    ControlFlow::Continue(())
}

fn handle_login_key<N: Navigator + Prober, C: Clock>(
    app: &mut App,
    services: &mut Services<N, C>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('g') && key.modifiers.contains(KeyModifiers::CONTROL) {
        popup_login(app, services);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.login = None;
            return;
        }
        KeyCode::Enter => {
            submit_login(app, services);
            return;
        }
        _ => {}
    }

    let Some(form) = app.login.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
        KeyCode::Backspace => {
            form.focused_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.focused_mut().push(c);
        }
        _ => {}
    }
}
