//! Input handling for the TUI.
//!
//! Keys are routed to the help overlay, the search prompt or the tree
//! depending on the current mode.

use crate::app::{App, AppEvent};
use crate::util::MAX_SEARCH_TERM_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code);
        return Action::Continue;
    }

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc => {
            if app.view.active_search().is_empty() {
                return Action::Quit;
            }
            app.search_input.clear();
            app.view.clear_search();
            app.selected = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('g') | KeyCode::Home => app.nav_top(),
        KeyCode::Char('G') | KeyCode::End => app.nav_bottom(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected();
        }
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('e') => app.expand_all(),
        KeyCode::Char('c') => app.collapse_all(),
        KeyCode::Char('/') => {
            app.search_mode = true;
            app.search_input = app.view.active_search().to_string();
        }
        KeyCode::Char('r') => app.reload(event_tx),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

/// Handle input in search mode.
///
/// Typing only schedules a debounced filter pass; the event loop runs it
/// once input has been quiet for the debounce period.
fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
            app.view.clear_search();
            app.selected = 0;
        }
        KeyCode::Enter => {
            app.search_mode = false;
            // Apply immediately rather than waiting out the debounce.
            if app.view.flush_search() {
                app.selected = 0;
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.view.on_search_change(&app.search_input);
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() >= MAX_SEARCH_TERM_LENGTH {
                app.set_status(format!(
                    "Search term too long (max {} chars)",
                    MAX_SEARCH_TERM_LENGTH
                ));
                return;
            }
            app.search_input.push(c);
            app.view.on_search_change(&app.search_input);
        }
        _ => {}
    }
}
