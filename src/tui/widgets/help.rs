//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, scroll: &mut usize) {
    let popup_width = (area.width * 60 / 100).clamp(40, 72).min(area.width);
    let popup_height = (area.height * 80 / 100).clamp(10, 26).min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let content = help_content();
    let content_lines = content.len();

    let block = Block::default()
        .title(" chartop help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let visible_height = chunks[0].height as usize;
    let max_scroll = content_lines.saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let scroll_info = if max_scroll > 0 {
        format!(" [{}/{}]", *scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        Span::styled(", ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" to scroll", Style::default().fg(Color::DarkGray)),
        Span::styled(scroll_info, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(footer, chunks[1]);
}

fn key_line(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), Style::default().fg(Color::Yellow)),
        Span::raw(text),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::Cyan)))
}

fn help_content() -> Vec<Line<'static>> {
    vec![
        heading("Navigation"),
        key_line("↑/k ↓/j", "move row selection"),
        key_line("PgUp/PgDn", "jump rows"),
        key_line("g / G", "first / last row"),
        key_line("←/p →/n", "previous / next page"),
        key_line("Enter", "open/close detail for the selected row"),
        Line::from(""),
        heading("Filters"),
        key_line("/", "edit name search"),
        key_line("e", "edit species filter"),
        key_line("t", "cycle status (all→alive→dead→unknown)"),
        key_line("y", "cycle gender"),
        key_line("c", "clear all filters"),
        Line::from(""),
        heading("View"),
        key_line("o", "sort visible page by name (toggles direction)"),
        key_line("+ / -", "grow / shrink page size (20..250)"),
        key_line("r", "refetch the current filter"),
        Line::from(""),
        heading("Other"),
        key_line("?", "toggle this help"),
        key_line("q", "quit (with confirmation)"),
        key_line("Ctrl-C", "quit immediately"),
        Line::from(""),
        Line::from(Span::styled(
            "Filtering and page changes fetch every upstream page matching the",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "filter once, then re-slice locally at the chosen page size.",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
