use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::inline::plain_text;
use crate::model::item::ChecklistItem;
use crate::ops::item_ops;
use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode;

use super::helpers::{pad_to_width, styled_words};

/// Lines heading, "more" and empty-state rows up with the checkbox column
const GUTTER: &str = "      ";
const CARET: &str = "\u{258C}";

/// The list rows, and the rows that must stay on screen
struct ListRows {
    lines: Vec<Line<'static>>,
    focus: Option<Range<usize>>,
}

/// Render the checklist: one row per visible item (more when wrapped),
/// headings interleaved when enabled, plus the new-item input row.
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height as usize;
    let rows = build_rows(app, area.width as usize);

    // Keep the focused rows in view
    if let Some(focus) = &rows.focus {
        if focus.start < app.scroll {
            app.scroll = focus.start;
        } else if focus.end > app.scroll + height {
            app.scroll = focus.end.saturating_sub(height);
        }
    }
    app.scroll = app.scroll.min(rows.lines.len().saturating_sub(height));

    let lines: Vec<Line> = rows
        .lines
        .into_iter()
        .skip(app.scroll)
        .take(height)
        .collect();
    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// Item positions `[start, end)` of the visible list shown under an item
/// cap, centered on the cursor where possible
fn window(len: usize, cursor_pos: usize, max: usize) -> (usize, usize) {
    if max == 0 || len <= max {
        return (0, len);
    }
    let start = cursor_pos.saturating_sub(max / 2).min(len - max);
    (start, start + max)
}

/// Canonical index the item being typed will take, when inserting
fn insertion_point(app: &App) -> Option<usize> {
    if app.mode != Mode::Insert {
        return None;
    }
    match app.edit_target? {
        EditTarget::NewAfter(Some(c)) if c < app.doc.len() => Some(item_ops::subtree_end(&app.doc, c)),
        EditTarget::NewAfter(_) => Some(0),
        EditTarget::Append => Some(app.doc.len()),
        _ => None,
    }
}

fn build_rows(app: &App, width: usize) -> ListRows {
    let theme = &app.theme;
    let bg = theme.background;
    let dim_style = Style::default().fg(theme.dim).bg(bg);
    let mut out = ListRows {
        lines: Vec::new(),
        focus: None,
    };

    let insert_at = insertion_point(app);
    if app.visible.is_empty() && insert_at.is_none() {
        let msg = if app.doc.is_empty() {
            "No todos. Press 'n' to create one."
        } else {
            "No items match the current filter."
        };
        out.lines.push(Line::from(Span::styled(
            unicode::truncate_to_width(&format!("{}{}", GUTTER, msg), width),
            dim_style,
        )));
        return out;
    }

    let cursor_pos = app
        .cursor
        .and_then(|c| app.visible.binary_search(&c).ok())
        .unwrap_or(0);
    let (start, end) = window(
        app.visible.len(),
        cursor_pos,
        app.settings.max_visible as usize,
    );

    if start > 0 {
        out.lines.push(Line::from(Span::styled(
            format!("{}\u{25B2} {} more", GUTTER, start),
            dim_style,
        )));
    }

    let mut input_done = insert_at.is_none();
    let mut last_heading: Option<usize> = None;
    for (pos, &index) in app.visible.iter().enumerate().take(end).skip(start) {
        let Some(item) = app.doc.item(index) else {
            continue;
        };
        if !input_done && insert_at.is_some_and(|at| at <= index) {
            push_input_rows(&mut out, app, width);
            input_done = true;
        }
        if app.settings.show_headings {
            push_headings(&mut out.lines, app, item, &mut last_heading, width);
        }
        push_item_rows(&mut out, app, item, index, pos as i64 - cursor_pos as i64, width);
    }
    if !input_done {
        push_input_rows(&mut out, app, width);
    }

    let below = app.visible.len() - end;
    if below > 0 {
        out.lines.push(Line::from(Span::styled(
            format!("{}\u{25BC} {} more", GUTTER, below),
            dim_style,
        )));
    }
    out
}

/// Headings of the item's section path not printed yet
fn push_headings(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    item: &ChecklistItem,
    last_heading: &mut Option<usize>,
    width: usize,
) {
    let style = Style::default()
        .fg(app.theme.cyan)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    for &ordinal in &item.section_path {
        if last_heading.is_some_and(|last| ordinal <= last) {
            continue;
        }
        if let Some(heading) = app.doc.heading(ordinal) {
            let text = format!(
                "{}{} {}",
                GUTTER,
                "#".repeat(heading.level as usize),
                plain_text(&heading.text)
            );
            lines.push(Line::from(Span::styled(
                unicode::truncate_to_width(&text, width),
                style,
            )));
        }
        *last_heading = Some(ordinal);
    }
}

fn push_item_rows(
    out: &mut ListRows,
    app: &App,
    item: &ChecklistItem,
    index: usize,
    relative: i64,
    width: usize,
) {
    let theme = &app.theme;
    let is_cursor = app.cursor == Some(index);
    let editing = app.mode == Mode::Edit && app.edit_target == Some(EditTarget::Item(index));
    let row_bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };

    let number = if !app.settings.line_numbers {
        "   ".to_string()
    } else if is_cursor {
        "  0".to_string()
    } else {
        format!("{:+3}", relative)
    };
    let marker = match (is_cursor, app.mode) {
        (true, Mode::Move) => "\u{2261}",
        (true, _) => app.config.display.select_marker.as_str(),
        (false, _) => " ",
    };
    let checkbox = if item.checked {
        format!("[{}]", app.config.display.check_symbol)
    } else {
        "[ ]".to_string()
    };

    let prefix = vec![
        Span::styled(number, Style::default().fg(theme.dim).bg(row_bg)),
        Span::styled(
            format!(" {} ", marker),
            Style::default()
                .fg(theme.highlight)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ".repeat(item.depth), Style::default().bg(row_bg)),
        Span::styled(
            checkbox,
            Style::default()
                .fg(if item.checked { theme.green } else { theme.text })
                .bg(row_bg),
        ),
        Span::styled(" ", Style::default().bg(row_bg)),
    ];

    let text_style = if item.checked {
        Style::default().fg(theme.dim).bg(row_bg)
    } else if is_cursor {
        Style::default().fg(theme.text_bright).bg(row_bg)
    } else {
        Style::default().fg(theme.text).bg(row_bg)
    };

    let first = out.lines.len();
    if editing {
        let text = with_caret(&app.edit_buffer, app.edit_cursor);
        push_wrapped(out, app, prefix, &text, width, row_bg, |s| {
            vec![Span::styled(s.to_string(), text_style)]
        });
    } else {
        let today = app.filters.today;
        let text = item.display_text();
        push_wrapped(out, app, prefix, &text, width, row_bg, |s| {
            styled_words(s, text_style, theme, today)
        });
    }
    if is_cursor && out.focus.is_none() && app.mode != Mode::Insert {
        out.focus = Some(first..out.lines.len());
    }
}

/// The row holding the text of a new item
fn push_input_rows(out: &mut ListRows, app: &App, width: usize) {
    let theme = &app.theme;
    let row_bg = theme.selection_bg;
    let depth = match app.edit_target {
        Some(EditTarget::NewAfter(Some(c))) => app.doc.item(c).map_or(0, |i| i.depth),
        _ => 0,
    };
    let prefix = vec![
        Span::styled("   ", Style::default().bg(row_bg)),
        Span::styled(
            " \u{270E} ",
            Style::default()
                .fg(theme.highlight)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ".repeat(depth), Style::default().bg(row_bg)),
        Span::styled("[ ] ", Style::default().fg(theme.text).bg(row_bg)),
    ];
    let text_style = Style::default().fg(theme.text_bright).bg(row_bg);
    let text = with_caret(&app.edit_buffer, app.edit_cursor);
    let first = out.lines.len();
    push_wrapped(out, app, prefix, &text, width, row_bg, |s| {
        vec![Span::styled(s.to_string(), text_style)]
    });
    out.focus = Some(first..out.lines.len());
}

/// Push `prefix` + `text`, wrapping (or truncating) the text to the space
/// left of `width`. Continuation rows are indented past the prefix.
fn push_wrapped<F>(
    out: &mut ListRows,
    app: &App,
    prefix: Vec<Span<'static>>,
    text: &str,
    width: usize,
    row_bg: ratatui::style::Color,
    style_text: F,
) where
    F: Fn(&str) -> Vec<Span<'static>>,
{
    let pad_style = Style::default().bg(row_bg);
    let prefix_width = super::helpers::spans_width(&prefix);
    let avail = width.saturating_sub(prefix_width).max(1);
    let segments = if app.settings.word_wrap {
        unicode::wrap_to_width(text, avail)
    } else {
        vec![unicode::truncate_to_width(text, avail)]
    };

    let mut prefix = Some(prefix);
    for segment in segments {
        let mut spans = match prefix.take() {
            Some(p) => p,
            None => vec![Span::styled(" ".repeat(prefix_width), pad_style)],
        };
        spans.extend(style_text(&segment));
        pad_to_width(&mut spans, width, pad_style);
        out.lines.push(Line::from(spans));
    }
}

fn with_caret(buffer: &str, cursor: usize) -> String {
    let (before, after) = buffer
        .split_at_checked(cursor)
        .unwrap_or((buffer, ""));
    format!("{}{}{}", before, CARET, after)
}
