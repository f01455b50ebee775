use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::command_actions::COMMANDS;
use crate::util::unicode;

use super::helpers::{pad_to_width, push_highlighted, spans_width};

const MAX_VISIBLE: usize = 10;
const MAX_INNER_WIDTH: u16 = 60;

/// Render the command palette overlay
pub fn render_command_palette(frame: &mut Frame, app: &App, area: Rect) {
    let Some(cp) = &app.command_palette else {
        return;
    };

    let bg = app.theme.background;
    let dim = app.theme.dim;
    let highlight = app.theme.highlight;
    let blank_style = Style::default().bg(bg);

    let content_width = area.width.saturating_sub(4);
    let inner_w = content_width.min(MAX_INNER_WIDTH) as usize;
    let popup_w = (inner_w as u16) + 2;

    let mut lines: Vec<Line> = Vec::new();

    // Input line: " > query▌"
    let mut input_spans = vec![
        Span::styled(
            " > ",
            Style::default()
                .fg(highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            cp.input.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(highlight).bg(bg)),
    ];
    pad_to_width(&mut input_spans, inner_w, blank_style);
    lines.push(Line::from(input_spans));

    lines.push(Line::from(Span::styled(
        "\u{2500}".repeat(inner_w),
        Style::default().fg(dim).bg(bg),
    )));

    if cp.results.is_empty() {
        let msg = "No matching commands";
        let left_pad = inner_w.saturating_sub(msg.len()) / 2;
        let mut spans = vec![
            Span::styled(" ".repeat(left_pad), blank_style),
            Span::styled(msg, Style::default().fg(app.theme.text).bg(bg)),
        ];
        pad_to_width(&mut spans, inner_w, blank_style);
        lines.push(Line::from(spans));
    } else {
        let visible_count = cp.results.len().min(MAX_VISIBLE);
        let scroll_offset = (cp.selected + 1).saturating_sub(visible_count);

        for (i, scored) in cp
            .results
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_count)
        {
            let is_selected = i == cp.selected;
            let row_bg = if is_selected {
                app.theme.selection_bg
            } else {
                bg
            };
            let row_pad = Style::default().bg(row_bg);
            let label_style = if is_selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text).bg(row_bg)
            };
            let hl_style = Style::default()
                .fg(highlight)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD);

            let indicator = if is_selected { " \u{25B6} " } else { "   " };
            let mut spans: Vec<Span> = vec![Span::styled(indicator, hl_style)];
            push_highlighted(
                &mut spans,
                scored.command.name,
                &scored.matched,
                label_style,
                hl_style,
            );

            // Description, right of a fixed name column when it fits
            let used = spans_width(&spans);
            let name_col: usize = 3 + 18;
            let gap = name_col.saturating_sub(used).max(2);
            let room = inner_w.saturating_sub(used + gap);
            if room > 3 {
                spans.push(Span::styled(" ".repeat(gap), row_pad));
                spans.push(Span::styled(
                    unicode::truncate_to_width(scored.command.description, room),
                    Style::default().fg(dim).bg(row_bg),
                ));
            }
            pad_to_width(&mut spans, inner_w, row_pad);
            lines.push(Line::from(spans));
        }
    }

    lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
    let footer = format!("   {} of {} commands", cp.results.len(), COMMANDS.len());
    let mut footer_spans = vec![Span::styled(footer, Style::default().fg(dim).bg(bg))];
    pad_to_width(&mut footer_spans, inner_w, blank_style);
    lines.push(Line::from(footer_spans));

    let popup_h = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));

    // Centered horizontally, near the top
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + 3.min(area.height.saturating_sub(popup_h));
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, popup_area);
}
