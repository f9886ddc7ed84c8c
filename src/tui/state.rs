//! UI-only application state.
//!
//! Everything that belongs to the terminal frontend and not to the
//! browsing session itself: input modes, row selection, popup state,
//! spinner animation.

use ratatui::widgets::TableState as RatatuiTableState;

use crate::session::SortDirection;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the name filter.
    NameFilter,
    /// Typing into the species filter.
    SpeciesFilter,
}

/// Frames of the loading spinner.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// UI state next to the session.
pub struct AppState {
    pub input_mode: InputMode,
    /// Edit buffer for the filter input modes.
    pub input_buffer: String,
    /// Highlighted row index within the current page.
    pub selected_row: usize,
    /// Sort direction last applied to the Name column, if any.
    pub sort: Option<SortDirection>,
    pub show_help: bool,
    pub help_scroll: usize,
    pub show_quit_confirm: bool,
    pub detail_scroll: usize,
    /// Transient one-line message (input errors and the like).
    pub status_message: Option<String>,
    spinner_frame: usize,
    pub table_state: RatatuiTableState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            selected_row: 0,
            sort: None,
            show_help: false,
            help_scroll: 0,
            show_quit_confirm: false,
            detail_scroll: 0,
            status_message: None,
            spinner_frame: 0,
            table_state: RatatuiTableState::default(),
        }
    }

    /// Advances the loading spinner; called on every tick.
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    /// Current spinner glyph.
    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame]
    }

    /// Moves the highlight up one row.
    pub fn select_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Moves the highlight down one row; clamped later against the page.
    pub fn select_down(&mut self) {
        self.selected_row = self.selected_row.saturating_add(1);
    }

    pub fn page_up(&mut self, rows: usize) {
        self.selected_row = self.selected_row.saturating_sub(rows);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.selected_row = self.selected_row.saturating_add(rows);
    }

    pub fn home(&mut self) {
        self.selected_row = 0;
    }

    pub fn end(&mut self) {
        self.selected_row = usize::MAX;
    }

    /// Resets per-page UI state after the page content changed.
    pub fn reset_for_new_page(&mut self) {
        self.selected_row = 0;
        self.detail_scroll = 0;
        self.sort = None;
    }

    /// Clamps the highlight into the current page and syncs the ratatui
    /// table state for auto-scrolling.
    pub fn clamp_selection(&mut self, rows: usize) {
        if rows == 0 {
            self.selected_row = 0;
            self.table_state.select(None);
        } else {
            self.selected_row = self.selected_row.min(rows - 1);
            self.table_state.select(Some(self.selected_row));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_clamps_to_page() {
        let mut state = AppState::new();
        state.end();
        state.clamp_selection(5);
        assert_eq!(state.selected_row, 4);

        state.clamp_selection(0);
        assert_eq!(state.selected_row, 0);
        assert_eq!(state.table_state.selected(), None);
    }

    #[test]
    fn test_spinner_wraps() {
        let mut state = AppState::new();
        let first = state.spinner();
        for _ in 0..SPINNER.len() {
            state.tick_spinner();
        }
        assert_eq!(state.spinner(), first);
    }

    #[test]
    fn test_reset_for_new_page_clears_sort_and_scroll() {
        let mut state = AppState::new();
        state.selected_row = 7;
        state.detail_scroll = 3;
        state.sort = Some(SortDirection::Descending);
        state.reset_for_new_page();
        assert_eq!(state.selected_row, 0);
        assert_eq!(state.detail_scroll, 0);
        assert_eq!(state.sort, None);
    }
}
