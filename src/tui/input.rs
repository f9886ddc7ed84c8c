//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::FilterSet;
use crate::session::{Session, SortDirection};

use super::state::{AppState, InputMode};

/// Rows moved by PgUp/PgDn.
const PAGE_JUMP: usize = 10;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
}

/// Handles key input, updating UI state and forwarding events to the
/// session.
pub fn handle_key(state: &mut AppState, session: &mut Session, key: KeyEvent) -> KeyAction {
    if state.show_quit_confirm {
        return handle_quit_confirm(state, key);
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, session, key),
        InputMode::NameFilter | InputMode::SpeciesFilter => {
            handle_filter_mode(state, session, key)
        }
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('y') => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.show_quit_confirm = false;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, session: &mut Session, key: KeyEvent) -> KeyAction {
    state.status_message = None;

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = true;
            KeyAction::None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Help popup
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
            state.help_scroll = 0;
            KeyAction::None
        }

        // Esc closes popups, then clears the detail selection
        KeyCode::Esc => {
            if state.show_help {
                state.show_help = false;
            } else if session.selected_id().is_some() {
                session.on_character_select(None);
                state.detail_scroll = 0;
            }
            KeyAction::None
        }

        // Row navigation (or popup scroll if a popup is open)
        KeyCode::Up | KeyCode::Char('k') => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_sub(1);
            } else if session.selected_record().is_some() {
                state.detail_scroll = state.detail_scroll.saturating_sub(1);
            } else {
                state.select_up();
            }
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_add(1);
            } else if session.selected_record().is_some() {
                // Clamped during render.
                state.detail_scroll = state.detail_scroll.saturating_add(1);
            } else {
                state.select_down();
            }
            KeyAction::None
        }
        KeyCode::PageUp => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_sub(PAGE_JUMP);
            } else if session.selected_record().is_some() {
                state.detail_scroll = state.detail_scroll.saturating_sub(PAGE_JUMP);
            } else {
                state.page_up(PAGE_JUMP);
            }
            KeyAction::None
        }
        KeyCode::PageDown => {
            if state.show_help {
                state.help_scroll = state.help_scroll.saturating_add(PAGE_JUMP);
            } else if session.selected_record().is_some() {
                state.detail_scroll = state.detail_scroll.saturating_add(PAGE_JUMP);
            } else {
                state.page_down(PAGE_JUMP);
            }
            KeyAction::None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.home();
            KeyAction::None
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.end();
            KeyAction::None
        }

        // Local page navigation
        KeyCode::Right | KeyCode::Char('n') => {
            let next = session.local_page() + 1;
            if next <= session.view().total_local_pages {
                session.on_page_change(next);
                state.reset_for_new_page();
            }
            KeyAction::None
        }
        KeyCode::Left | KeyCode::Char('p') => {
            if session.local_page() > 1 {
                session.on_page_change(session.local_page() - 1);
                state.reset_for_new_page();
            }
            KeyAction::None
        }

        // Page size cycling
        KeyCode::Char('+') | KeyCode::Char('=') => {
            session.on_page_size_change(session.page_size().next());
            state.reset_for_new_page();
            KeyAction::None
        }
        KeyCode::Char('-') => {
            session.on_page_size_change(session.page_size().prev());
            state.reset_for_new_page();
            KeyAction::None
        }

        // Filter editing
        KeyCode::Char('/') => {
            state.input_mode = InputMode::NameFilter;
            state.input_buffer = session.filters().name.clone();
            KeyAction::None
        }
        KeyCode::Char('e') => {
            state.input_mode = InputMode::SpeciesFilter;
            state.input_buffer = session.filters().species.clone();
            KeyAction::None
        }
        KeyCode::Char('t') => {
            let mut filters = session.filters().clone();
            filters.status = filters.status.next();
            session.on_filter_change(filters);
            state.reset_for_new_page();
            KeyAction::None
        }
        KeyCode::Char('y') => {
            let mut filters = session.filters().clone();
            filters.gender = filters.gender.next();
            session.on_filter_change(filters);
            state.reset_for_new_page();
            KeyAction::None
        }
        KeyCode::Char('c') => {
            if !session.filters().is_empty() {
                session.on_filter_change(FilterSet::default());
                state.reset_for_new_page();
            }
            KeyAction::None
        }

        // Sort the visible page by name
        KeyCode::Char('o') => {
            let direction = match state.sort {
                None => SortDirection::Ascending,
                Some(d) => d.toggle(),
            };
            match session.on_sort("name", direction) {
                Ok(()) => state.sort = Some(direction),
                Err(e) => state.status_message = Some(e.to_string()),
            }
            KeyAction::None
        }

        // Detail popup toggle for the highlighted row
        KeyCode::Enter => {
            if !state.show_help {
                let id = session
                    .view()
                    .records
                    .get(state.selected_row)
                    .map(|c| c.id);
                if let Some(id) = id {
                    session.on_character_select(Some(id));
                    state.detail_scroll = 0;
                }
            }
            KeyAction::None
        }

        // Refetch the current filter
        KeyCode::Char('r') => {
            session.refresh();
            state.reset_for_new_page();
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

/// Handles keys while editing the name or species filter.
fn handle_filter_mode(state: &mut AppState, session: &mut Session, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.input_buffer.clear();
        }
        KeyCode::Enter => {
            let mut filters = session.filters().clone();
            match state.input_mode {
                InputMode::NameFilter => filters.name = state.input_buffer.trim().to_string(),
                InputMode::SpeciesFilter => {
                    filters.species = state.input_buffer.trim().to_string()
                }
                InputMode::Normal => {}
            }
            state.input_mode = InputMode::Normal;
            state.input_buffer.clear();
            session.on_filter_change(filters);
            state.reset_for_new_page();
        }
        KeyCode::Backspace => {
            state.input_buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input_buffer.push(c);
        }
        _ => {}
    }
    KeyAction::None
}
