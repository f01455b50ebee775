use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::helpers::spans_width;

const NAVIGATE_HINTS: &str = "? help  : cmd  n new  \u{2423} toggle  esc quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Navigate => (navigate_spans(app), NAVIGATE_HINTS),
        Mode::Insert => (banner(app, "\u{270E} NEW", app.theme.green), "enter add  esc cancel"),
        Mode::Edit => (banner(app, "\u{270E} EDIT", app.theme.blue), "enter save  esc cancel"),
        Mode::Move => (
            banner(app, "\u{2261} MOVE", app.theme.purple),
            "j/k move  enter confirm  esc cancel",
        ),
        Mode::MaxVisibleInput => {
            let mut spans = banner(app, "\u{2299} SET MAX", app.theme.yellow);
            spans.push(Span::styled(
                format!(" max visible (0 = unlimited): {}", app.edit_buffer),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            (spans, "enter apply  esc cancel")
        }
        Mode::Command => (
            banner(app, ": COMMAND", app.theme.highlight),
            "enter run  tab complete  esc close",
        ),
        Mode::TagFilter => (
            banner(app, "# FILTER", app.theme.cyan),
            "enter toggle  c clear  esc close",
        ),
        Mode::Search => (
            banner(app, "/ SEARCH", app.theme.highlight),
            "enter jump  esc cancel",
        ),
        Mode::Help => (Vec::new(), "any key to close"),
    };

    // Right-aligned hint, dropped when it does not fit
    let content_width = spans_width(&spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

fn banner(app: &App, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(app.theme.background)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", Style::default().bg(app.theme.background)),
    ]
}

/// The status message if there is one, otherwise the active indicators
fn navigate_spans(app: &App) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    if let Some(status) = &app.status {
        let fg = if status.is_error {
            app.theme.red
        } else {
            app.theme.text
        };
        return vec![Span::styled(
            format!(" {}", status.text),
            Style::default().fg(fg).bg(bg),
        )];
    }

    let indicator = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.indicator_bg);
    let gap = Style::default().bg(bg);
    let mut spans: Vec<Span<'static>> = vec![Span::styled(" ", gap)];
    let mut push = |text: String, style: Style| {
        spans.push(Span::styled(format!(" {} ", text), style));
        spans.push(Span::styled(" ", gap));
    };

    if app.settings.read_only {
        push("READ ONLY".into(), indicator.bg(app.theme.red).fg(bg));
    }
    if app.filters.is_active() {
        push("FILTERED".into(), indicator);
    }
    for tag in &app.filters.tags {
        push(format!("#{}", tag), indicator.fg(app.theme.purple));
    }
    for p in &app.filters.priorities {
        push(format!("!p{}", p), indicator.fg(app.theme.yellow));
    }
    if let Some(due) = app.filters.due {
        push(due.name().to_string(), indicator.fg(app.theme.cyan));
    }
    if app.settings.word_wrap {
        push("WRAP".into(), indicator);
    }
    if app.settings.show_headings {
        push("HEADINGS".into(), indicator);
    }
    if app.settings.max_visible > 0 {
        push(format!("MAX:{}", app.settings.max_visible), indicator);
    }
    if let Some(count) = app.count {
        push(count.to_string(), indicator.fg(app.theme.highlight));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_W, app_from, press_str, render_to_string};

    fn status(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_indicators_and_hints() {
        let (_dir, mut app) = app_from("- [ ] a #x\n");
        app.settings.read_only = true;
        app.settings.max_visible = 5;
        app.filters.toggle_tag("x");
        let out = status(&app);
        assert!(out.contains("READ ONLY"));
        assert!(out.contains("FILTERED"));
        assert!(out.contains("#x"));
        assert!(out.contains("MAX:5"));
        // Too many indicators for the hint at this width
        assert!(!out.contains("esc quit"));

        let wide = render_to_string(120, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(wide.contains("MAX:5"));
        assert!(wide.ends_with("esc quit"));
    }

    #[test]
    fn navigate_hint_fits_beside_default_indicators() {
        let (_dir, app) = app_from("- [ ] a\n");
        let out = status(&app);
        assert!(out.starts_with("  WRAP "));
        assert!(out.ends_with("esc quit"));
    }

    #[test]
    fn status_message_replaces_indicators() {
        let (_dir, mut app) = app_from("- [ ] a\n");
        app.set_error("file changed on disk: :reload or :force-save");
        let out = status(&app);
        assert!(out.starts_with(" file changed on disk"));
        assert!(!out.contains("WRAP"));
    }

    #[test]
    fn mode_banners() {
        let (_dir, mut app) = app_from("- [ ] a\n- [ ] b\n");
        press_str(&mut app, "m");
        let out = status(&app);
        assert!(out.contains("≡ MOVE"));
        assert!(out.ends_with("j/k move  enter confirm  esc cancel"));

        let (_dir, mut app) = app_from("- [ ] a\n");
        press_str(&mut app, "n");
        assert!(status(&app).contains("✎ NEW"));

        let (_dir, mut app) = app_from("- [ ] a\n");
        press_str(&mut app, "/");
        let out = status(&app);
        assert!(out.contains("/ SEARCH"));
        assert!(out.ends_with("enter jump  esc cancel"));
    }

    #[test]
    fn pending_count_is_shown() {
        let (_dir, mut app) = app_from("- [ ] a\n- [ ] b\n");
        press_str(&mut app, "12");
        assert!(status(&app).contains(" 12 "));
    }

    #[test]
    fn max_visible_prompt_echoes_input() {
        let (_dir, mut app) = app_from("- [ ] a\n");
        app.mode = Mode::MaxVisibleInput;
        app.edit_buffer = "12".into();
        let out = status(&app);
        assert!(out.contains("⊙ SET MAX"));
        assert!(out.contains("12▌"));
    }
}
