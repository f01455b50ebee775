use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::spans_width;

/// Render the title bar: file path on the left, completion count on the right
pub fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let total = app.doc.len();
    let done = app.doc.items().filter(|i| i.checked).count();
    let count = format!("{}/{} ", done, total);

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            "tdx",
            Style::default()
                .fg(app.theme.purple)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default().bg(bg)),
    ];
    let room = width.saturating_sub(spans_width(&spans) + count.chars().count() + 1);
    let path = app.file.path.display().to_string();
    spans.push(Span::styled(
        unicode::truncate_to_width(&path, room),
        Style::default().fg(app.theme.text).bg(bg),
    ));

    let used = spans_width(&spans);
    let count_width = unicode::display_width(&count);
    if used + count_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - count_width),
            Style::default().bg(bg),
        ));
        let count_color = if total > 0 && done == total {
            app.theme.green
        } else {
            app.theme.dim
        };
        spans.push(Span::styled(count, Style::default().fg(count_color).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
