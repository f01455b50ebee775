use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FilterEntry};

use super::helpers::{centered_rect_fixed, pad_to_width};

const POPUP_WIDTH: u16 = 36;

/// Label and active state of one filter menu entry
fn entry_label(app: &App, entry: &FilterEntry) -> (String, bool) {
    match entry {
        FilterEntry::Tag(tag) => (format!("#{}", tag), app.filters.tags.contains(tag)),
        FilterEntry::Priority(p) => (format!("!p{}", p), app.filters.priorities.contains(p)),
        FilterEntry::Due(due) => (format!("due: {}", due.name()), app.filters.due == Some(*due)),
    }
}

/// Render the tag/priority/due filter menu
pub fn render_filter_popup(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let inner_w = POPUP_WIDTH.saturating_sub(2) as usize;
    let blank_style = Style::default().bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    for (i, entry) in app.filter_entries.iter().enumerate() {
        let (label, active) = entry_label(app, entry);
        let is_cursor = i == app.filter_cursor;
        let row_bg = if is_cursor {
            app.theme.selection_bg
        } else {
            bg
        };
        let color = match entry {
            FilterEntry::Tag(_) => app.theme.purple,
            FilterEntry::Priority(_) => app.theme.yellow,
            FilterEntry::Due(_) => app.theme.cyan,
        };
        let mut spans = vec![
            Span::styled(
                if active { " [x] " } else { " [ ] " },
                Style::default()
                    .fg(if active { app.theme.green } else { app.theme.dim })
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(color).bg(row_bg)),
        ];
        pad_to_width(&mut spans, inner_w, Style::default().bg(row_bg));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
    lines.push(Line::from(Span::styled(
        " enter toggle  c clear  esc close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let height = lines.len() as u16 + 2;
    let popup_area = centered_rect_fixed(POPUP_WIDTH, height, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Filter ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
