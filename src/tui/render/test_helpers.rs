use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::document_io::DocumentFile;
use crate::model::config::{Config, ParseOptions, ViewOverrides};
use crate::tui::app::App;
use crate::tui::input;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen for `app`
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// The date every test session treats as today
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Build an App over `todo.md` in a fresh temp dir holding `md`.
/// Keep the TempDir alive for as long as the App is used.
pub fn app_from(md: &str) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.md");
    std::fs::write(&path, md).unwrap();
    let loaded = DocumentFile::open(&path, &ParseOptions::default()).unwrap();
    let app = App::new(
        loaded.file,
        loaded.document,
        Config::default(),
        &ViewOverrides::default(),
        today(),
    );
    (dir, app)
}

pub fn press_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    input::handle_key(app, KeyEvent::new(code, modifiers));
}

pub fn press(app: &mut App, code: KeyCode) {
    press_key(app, code, KeyModifiers::NONE);
}

/// Type each character as its own key press
pub fn press_str(app: &mut App, keys: &str) {
    for c in keys.chars() {
        press(app, KeyCode::Char(c));
    }
}
