//! Main rendering logic for the TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::session::{Phase, Session};

use super::state::{AppState, InputMode};
use super::style::Styles;
use super::widgets::{render_characters, render_detail, render_help, render_quit_confirm};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState, session: &Session) {
    let area = frame.area();

    // Main layout: header, filter bar, content, footer
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(1), // Filter bar / input line
        Constraint::Min(5),    // Content area
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, chunks[0], state, session);
    render_filter_bar(frame, chunks[1], state, session);
    render_characters(frame, chunks[2], state, session);
    render_footer(frame, chunks[3], state, session);

    // Detail popup for the selected record, when it is on this page.
    if let Some(character) = session.selected_record() {
        render_detail(frame, area, character, &mut state.detail_scroll);
    }

    // Help popup overlays everything below the quit dialog.
    if state.show_help {
        render_help(frame, area, &mut state.help_scroll);
    }

    if state.show_quit_confirm {
        render_quit_confirm(frame, area);
    }
}

/// Header: title, phase indicator, record totals.
fn render_header(frame: &mut Frame, area: Rect, state: &AppState, session: &Session) {
    let mut spans = vec![Span::styled(" chartop ", Styles::header())];

    match session.phase() {
        Phase::Loading => spans.push(Span::styled(
            format!("  {} loading", state.spinner()),
            Styles::loading(),
        )),
        Phase::Loaded => spans.push(Span::styled(
            format!(
                "  {} characters · page {}/{} · size {}",
                session.view().total_count,
                session.local_page(),
                session.view().total_local_pages,
                session.page_size()
            ),
            Styles::accent(),
        )),
        Phase::Failed => spans.push(Span::styled("  fetch failed", Styles::error())),
        Phase::Idle => {}
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::styled(format!("  {}", message), Styles::error()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Filter bar, or the active filter input.
fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState, session: &Session) {
    let line = match state.input_mode {
        InputMode::NameFilter => Line::from(vec![
            Span::styled(" name> ", Styles::accent()),
            Span::styled(format!("{}▏", state.input_buffer), Styles::filter_input()),
        ]),
        InputMode::SpeciesFilter => Line::from(vec![
            Span::styled(" species> ", Styles::accent()),
            Span::styled(format!("{}▏", state.input_buffer), Styles::filter_input()),
        ]),
        InputMode::Normal => {
            let filters = session.filters();
            let field = |label: &str, value: String, set: bool| {
                let style = if set { Styles::accent() } else { Styles::dim() };
                Span::styled(format!("{}:{}  ", label, value), style)
            };
            Line::from(vec![
                Span::raw(" "),
                field(
                    "name",
                    if filters.name.is_empty() {
                        "*".to_string()
                    } else {
                        filters.name.clone()
                    },
                    !filters.name.is_empty(),
                ),
                field(
                    "status",
                    filters.status.label().to_string(),
                    filters.status.as_query().is_some(),
                ),
                field(
                    "species",
                    if filters.species.is_empty() {
                        "*".to_string()
                    } else {
                        filters.species.clone()
                    },
                    !filters.species.is_empty(),
                ),
                field(
                    "gender",
                    filters.gender.label().to_string(),
                    filters.gender.as_query().is_some(),
                ),
            ])
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer: key hints.
fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, _session: &Session) {
    let line = match state.input_mode {
        InputMode::Normal => Line::from(vec![
            Span::styled(" /", Styles::help_key()),
            Span::styled(" name ", Styles::help()),
            Span::styled("t", Styles::help_key()),
            Span::styled(" status ", Styles::help()),
            Span::styled("e", Styles::help_key()),
            Span::styled(" species ", Styles::help()),
            Span::styled("y", Styles::help_key()),
            Span::styled(" gender ", Styles::help()),
            Span::styled("o", Styles::help_key()),
            Span::styled(" sort ", Styles::help()),
            Span::styled("±", Styles::help_key()),
            Span::styled(" size ", Styles::help()),
            Span::styled("←→", Styles::help_key()),
            Span::styled(" page ", Styles::help()),
            Span::styled("?", Styles::help_key()),
            Span::styled(" help ", Styles::help()),
            Span::styled("q", Styles::help_key()),
            Span::styled(" quit", Styles::help()),
        ]),
        _ => Line::from(vec![
            Span::styled(" Enter", Styles::help_key()),
            Span::styled(" apply ", Styles::help()),
            Span::styled("Esc", Styles::help_key()),
            Span::styled(" cancel", Styles::help()),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}
