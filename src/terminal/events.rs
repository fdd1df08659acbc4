use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Job;
use crate::app::compose::ComposeField;
use crate::app::view::ViewKind;
use crate::domain::email::Mailbox;
use crate::terminal::state::TuiState;

pub fn handle_key(key: KeyEvent, state: &mut TuiState) -> Vec<Job> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }
    state.app.clear_status();

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return Vec::new();
    }

    match state.app.kind() {
        ViewKind::Compose => handle_compose_keys(key, state),
        ViewKind::Mailbox => handle_mailbox_keys(key, state),
        ViewKind::Detail => handle_detail_keys(key, state),
    }
}

/// Navigation shared by the mailbox and detail views.
fn handle_nav_keys(key: KeyEvent, state: &mut TuiState) -> Option<Vec<Job>> {
    let jobs = match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('i') => state.app.show_mailbox(Mailbox::Inbox),
        KeyCode::Char('s') => state.app.show_mailbox(Mailbox::Sent),
        KeyCode::Char('a') => state.app.show_mailbox(Mailbox::Archive),
        KeyCode::Char('c') => state.app.compose_new(),
        _ => return None,
    };
    Some(state.after_navigation(jobs))
}

fn handle_mailbox_keys(key: KeyEvent, state: &mut TuiState) -> Vec<Job> {
    if let Some(jobs) = handle_nav_keys(key, state) {
        return jobs;
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Home => state.move_selection(i32::MIN / 2),
        KeyCode::End => state.move_selection(i32::MAX / 2),

        // Opening and archiving are separate keys, so one press never does both.
        KeyCode::Enter => {
            if let Some(id) = state.selected_id() {
                let jobs = state.app.show_detail(id);
                return state.after_navigation(jobs);
            }
        }
        KeyCode::Char('e') => {
            if let Some(toggle) = state.selected_toggle() {
                let jobs = state.app.toggle_archive(&toggle);
                return state.after_navigation(jobs);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_detail_keys(key: KeyEvent, state: &mut TuiState) -> Vec<Job> {
    if let Some(jobs) = handle_nav_keys(key, state) {
        return jobs;
    }
    match key.code {
        KeyCode::Char('r') => {
            let jobs = state.app.reply();
            if state.app.kind() == ViewKind::Compose {
                return state.after_navigation(jobs);
            }
        }
        KeyCode::Esc | KeyCode::Backspace => {
            let jobs = state.app.back();
            return state.after_navigation(jobs);
        }
        KeyCode::Down | KeyCode::Char('j') => state.scroll_body(1),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_body(-1),
        KeyCode::PageDown => state.scroll_body(10),
        KeyCode::PageUp => state.scroll_body(-10),
        _ => {}
    }
    Vec::new()
}

fn handle_compose_keys(key: KeyEvent, state: &mut TuiState) -> Vec<Job> {
    let field = state.field;
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let jobs = state.app.submit();
            return state.after_navigation(jobs);
        }
        KeyCode::Esc => {
            let jobs = state.app.back();
            return state.after_navigation(jobs);
        }
        KeyCode::Tab => state.field = field.next(),
        KeyCode::BackTab => state.field = field.prev(),
        KeyCode::Enter => {
            if field == ComposeField::Body {
                state.app.edit(field, |s| s.push('\n'));
            } else {
                state.field = field.next();
            }
        }
        KeyCode::Backspace => state.app.edit(field, |s| {
            s.pop();
        }),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            state.app.edit(field, |s| s.push(c))
        }
        _ => {}
    }
    Vec::new()
}
