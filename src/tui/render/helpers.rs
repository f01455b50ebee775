use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;

use crate::model::item::PriorityBand;
use crate::parse::tokens;
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` with `style` out to `width` cells
pub(super) fn pad_to_width(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Split item text into spans, coloring `#tags`, `!pN` priorities and
/// `@due(...)` dates. Whitespace runs keep the base style.
pub(super) fn styled_words(
    text: &str,
    base: Style,
    theme: &Theme,
    today: NaiveDate,
) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let split = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (word, tail) = rest.split_at(split);
        if !word.is_empty() {
            spans.push(Span::styled(word.to_string(), word_style(word, base, theme, today)));
        }
        let gap = tail
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(tail.len());
        if gap > 0 {
            spans.push(Span::styled(tail[..gap].to_string(), base));
        }
        rest = &tail[gap..];
    }
    spans
}

/// Push `text` as spans with the characters at `matched` highlighted
pub(super) fn push_highlighted<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    matched: &[usize],
    base_style: Style,
    highlight_style: Style,
) {
    for (i, c) in text.chars().enumerate() {
        let style = if matched.contains(&i) {
            highlight_style
        } else {
            base_style
        };
        match spans.last_mut() {
            Some(last) if last.style == style && i > 0 => last.content.to_mut().push(c),
            _ => spans.push(Span::styled(c.to_string(), style)),
        }
    }
}

fn word_style(word: &str, base: Style, theme: &Theme, today: NaiveDate) -> Style {
    if word.len() > 1 && word.starts_with('#') && !tokens::extract_tags(word).is_empty() {
        return base.fg(theme.purple);
    }
    if let Some(p) = tokens::extract_priority(word) {
        return base.fg(theme.priority_color(PriorityBand::from_priority(p)));
    }
    if let Some(due) = tokens::extract_due(word) {
        return base.fg(theme.due_color(due < today, due == today));
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn words_keep_their_spacing() {
        let theme = Theme::default();
        let spans = styled_words("buy  milk #home", Style::default(), &theme, day());
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "buy  milk #home");
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[4].style.fg, Some(theme.purple));
    }

    #[test]
    fn tokens_are_colored() {
        let theme = Theme::default();
        let spans = styled_words("a !p1 @due(2024-12-31)", Style::default(), &theme, day());
        assert_eq!(spans[2].style.fg, Some(theme.red));
        assert_eq!(spans[4].style.fg, Some(theme.red));
        let spans = styled_words("@due(2025-01-01)", Style::default(), &theme, day());
        assert_eq!(spans[0].style.fg, Some(theme.yellow));
    }

    #[test]
    fn fixed_rect_is_clipped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_fixed(30, 20, area), area);
    }
}
