//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Theme;

impl Theme {
    // Background colors
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const SELECTED_BG: Color = Color::DarkGray;

    // Foreground colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    // Status colors (alive/dead/unknown)
    pub const STATUS_ALIVE: Color = Color::Green;
    pub const STATUS_DEAD: Color = Color::Red;
    pub const STATUS_UNKNOWN: Color = Color::DarkGray;

    // Accents
    pub const ACCENT: Color = Color::Cyan;
    pub const ERROR: Color = Color::Red;
    pub const LOADING: Color = Color::Yellow;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected row style.
    pub fn selected() -> Style {
        Style::default()
            .bg(Theme::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a character status cell.
    pub fn status(status: &str) -> Style {
        if status.eq_ignore_ascii_case("alive") {
            Style::default().fg(Theme::STATUS_ALIVE)
        } else if status.eq_ignore_ascii_case("dead") {
            Style::default().fg(Theme::STATUS_DEAD)
        } else {
            Style::default().fg(Theme::STATUS_UNKNOWN)
        }
    }

    /// Error banner style.
    pub fn error() -> Style {
        Style::default()
            .fg(Theme::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading indicator style.
    pub fn loading() -> Style {
        Style::default().fg(Theme::LOADING)
    }

    /// Accented value style (filter values, counts).
    pub fn accent() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Filter input style.
    pub fn filter_input() -> Style {
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Section header style for the detail popup.
    pub fn section_header() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Help text style.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }
}
