use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Navigation", header_style)));
    add_binding(&mut lines, " [n]\u{2191}\u{2193}/jk", "Move cursor (n times)", key_style, desc_style);
    add_binding(&mut lines, " gg/G", "Jump to first/last", key_style, desc_style);
    add_binding(&mut lines, " /", "Search items", key_style, desc_style);
    add_binding(&mut lines, " f", "Filter by tag, priority or due", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Editing", header_style)));
    add_binding(&mut lines, " Space/Enter", "Toggle done", key_style, desc_style);
    add_binding(&mut lines, " n", "New item below", key_style, desc_style);
    add_binding(&mut lines, " N", "New item at end", key_style, desc_style);
    add_binding(&mut lines, " e", "Edit item text", key_style, desc_style);
    add_binding(&mut lines, " d", "Delete item", key_style, desc_style);
    add_binding(&mut lines, " Tab/S-Tab", "Indent / outdent", key_style, desc_style);
    add_binding(&mut lines, " m", "Move item (j/k, Enter)", key_style, desc_style);
    add_binding(&mut lines, " c", "Copy item text", key_style, desc_style);
    add_binding(&mut lines, " u", "Undo", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " :", "Command palette", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q/Esc", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_W, app_from, render_to_string};

    #[test]
    fn lists_core_bindings() {
        let (_dir, app) = app_from("- [ ] a\n");
        let out = render_to_string(TERM_W, 40, |frame, area| {
            render_help_overlay(frame, &app, area)
        });
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Toggle done"));
        assert!(out.contains("Command palette"));
        assert!(out.contains("[n]↑↓/jk"));
        assert!(out.contains("Search items"));
        assert!(out.contains("Copy item text"));
    }
}
