//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes and comic actions.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, ComicAction, Screen};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return false;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        _ => {}
    }

    match app.screen {
        Screen::Comic => handle_comic_input(app, key),
        Screen::Favorites => handle_favorites_input(app, key),
    }
    false
}

fn handle_comic_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.dispatch(ComicAction::Previous),
        KeyCode::Char('l') | KeyCode::Right => app.dispatch(ComicAction::Next),
        KeyCode::Char('r') => app.dispatch(ComicAction::Random),
        KeyCode::Char('L') => app.dispatch(ComicAction::Latest),
        KeyCode::Char('f') => app.dispatch(ComicAction::ToggleFavorite),
        KeyCode::Char('R') => {
            if app.comic.error.is_some() {
                app.dispatch(ComicAction::Retry);
            }
        }
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('v') => {
            app.favorites.sync();
            app.screen = Screen::Favorites;
        }
        _ => {}
    }
}

fn handle_favorites_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.favorites.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.favorites.select_previous(),
        KeyCode::Enter => app.open_selected_favorite(),
        KeyCode::Esc | KeyCode::Char('b') => app.screen = Screen::Comic,
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => {
            app.search_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}
