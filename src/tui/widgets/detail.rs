//! Character detail popup.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::api::Character;
use crate::tui::style::Styles;
use crate::util::format_created;

use super::centered_rect;

/// Renders the detail popup for the selected character.
pub fn render_detail(frame: &mut Frame, area: Rect, character: &Character, scroll: &mut usize) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", character.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let content = build_content(character);

    // Clamp scroll to the content.
    let visible = chunks[0].height as usize;
    let max_scroll = content.len().saturating_sub(visible);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0));
    frame.render_widget(paragraph, chunks[0]);

    let footer = Line::from(vec![
        Span::styled("↑/↓", Styles::help_key()),
        Span::styled(" scroll  ", Styles::help()),
        Span::styled("Enter/Esc", Styles::help_key()),
        Span::styled(" close", Styles::help()),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}

fn section(name: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("── {} ──", name),
        Styles::section_header(),
    ))
}

fn kv(key: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>10}: ", key), Styles::accent()),
        Span::raw(value.to_string()),
    ])
}

fn kv_styled(key: &str, value: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>10}: ", key), Styles::accent()),
        Span::styled(value.to_string(), style),
    ])
}

fn build_content(character: &Character) -> Vec<Line<'static>> {
    vec![
        section("Character"),
        kv("Id", &character.id.to_string()),
        kv_styled("Status", &character.status, Styles::status(&character.status)),
        kv("Species", &character.species),
        kv("Gender", &character.gender),
        Line::from(""),
        section("Whereabouts"),
        kv("Origin", &character.origin.name),
        kv("Location", &character.location.name),
        Line::from(""),
        section("Record"),
        kv("Image", &character.image),
        kv("Created", &format_created(&character.created)),
    ]
}
