use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{pad_to_width, push_highlighted, spans_width};

const MAX_RESULTS: usize = 10;
const MAX_INNER_WIDTH: u16 = 70;

/// Render the `/` search overlay: query, ranked items, match count
pub fn render_search_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(search) = &app.search else {
        return;
    };

    let bg = app.theme.background;
    let dim = app.theme.dim;
    let highlight = app.theme.highlight;
    let blank_style = Style::default().bg(bg);

    let inner_w = area.width.saturating_sub(4).min(MAX_INNER_WIDTH) as usize;
    let popup_w = (inner_w as u16) + 2;

    let mut lines: Vec<Line> = Vec::new();

    let mut input_spans = vec![
        Span::styled(
            " / ",
            Style::default()
                .fg(highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            search.input.clone(),
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

    if search.results.is_empty() {
        let msg = "No matching items";
        let left_pad = inner_w.saturating_sub(msg.len()) / 2;
        let mut spans = vec![
            Span::styled(" ".repeat(left_pad), blank_style),
            Span::styled(msg, Style::default().fg(app.theme.text).bg(bg)),
        ];
        pad_to_width(&mut spans, inner_w, blank_style);
        lines.push(Line::from(spans));
    } else {
        let shown = search.results.len().min(MAX_RESULTS);
        let offset = (search.selected + 1).saturating_sub(shown);
        for (i, hit) in search.results.iter().enumerate().skip(offset).take(shown) {
            let Some(item) = app.doc.item(hit.index) else {
                continue;
            };
            let is_selected = i == search.selected;
            let row_bg = if is_selected { app.theme.selection_bg } else { bg };
            let row_pad = Style::default().bg(row_bg);
            let text_style = if is_selected {
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

            let check = if item.checked {
                format!("[{}] ", app.config.display.check_symbol)
            } else {
                "[ ] ".to_string()
            };
            let mut spans: Vec<Span> = vec![
                Span::styled(if is_selected { " \u{25B6} " } else { "   " }, hl_style),
                Span::styled(check, Style::default().fg(dim).bg(row_bg)),
            ];
            let room = inner_w.saturating_sub(spans_width(&spans));
            let text = unicode::truncate_to_width(&item.markdown(), room);
            push_highlighted(&mut spans, &text, &hit.matched, text_style, hl_style);
            pad_to_width(&mut spans, inner_w, row_pad);
            lines.push(Line::from(spans));
        }
    }

    lines.push(Line::from(Span::styled(" ".repeat(inner_w), blank_style)));
    let footer = format!("   {} of {} items", search.results.len(), search.candidate_count());
    let mut footer_spans = vec![Span::styled(footer, Style::default().fg(dim).bg(bg))];
    pad_to_width(&mut footer_spans, inner_w, blank_style);
    lines.push(Line::from(footer_spans));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + 2.min(area.height.saturating_sub(popup_h));
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h);

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Search ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
