//! The character table.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::session::{Phase, Session};
use crate::tui::state::AppState;
use crate::tui::style::Styles;
use crate::util::truncate;

const HEADERS: [&str; 6] = ["NAME", "STATUS", "SPECIES", "GENDER", "ORIGIN", "LOCATION"];

fn widths() -> [Constraint; 6] {
    [
        Constraint::Min(24),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ]
}

/// Renders the table of the current local page, or the matching
/// empty/loading/failure message.
pub fn render_characters(frame: &mut Frame, area: Rect, state: &mut AppState, session: &Session) {
    match session.phase() {
        Phase::Loading => {
            let line = Line::styled(
                format!("{} Loading characters…", state.spinner()),
                Styles::loading(),
            );
            frame.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                vertically_centered(area),
            );
            return;
        }
        Phase::Failed => {
            let lines = vec![
                Line::styled(
                    session.error().unwrap_or("Request failed."),
                    Styles::error(),
                ),
                Line::styled("press r to retry", Styles::help()),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                vertically_centered(area),
            );
            return;
        }
        Phase::Idle | Phase::Loaded => {}
    }

    let records = &session.view().records;
    if records.is_empty() {
        let line = Line::styled(
            "No characters found matching your filters.",
            Styles::dim(),
        );
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            vertically_centered(area),
        );
        return;
    }

    state.clamp_selection(records.len());

    let sort_arrow = state.sort.map(|d| d.arrow()).unwrap_or("");
    let header = Row::new(
        HEADERS
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    Cell::from(format!("{}{}", h, sort_arrow))
                } else {
                    Cell::from(*h)
                }
            })
            .collect::<Vec<_>>(),
    )
    .style(Styles::table_header());

    let rows: Vec<Row> = records
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(truncate(&c.name, 32)),
                Cell::from(c.status.clone()).style(Styles::status(&c.status)),
                Cell::from(truncate(&c.species, 14)),
                Cell::from(truncate(&c.gender, 12)),
                Cell::from(truncate(&c.origin.name, 28)),
                Cell::from(truncate(&c.location.name, 28)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths())
        .header(header)
        .row_highlight_style(Styles::selected())
        .column_spacing(1);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Shrinks `area` to a message band at roughly a third of its height.
fn vertically_centered(area: Rect) -> Rect {
    if area.height < 3 {
        return area;
    }
    Rect::new(area.x, area.y + area.height / 3, area.width, 2)
}
