use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, FilterEntry, Trigger};

pub(super) fn handle_filter_menu(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.enter(Trigger::Cancel);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.filter_cursor + 1 < app.filter_entries.len() {
                app.filter_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.filter_cursor = app.filter_cursor.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let anchor = app.anchor();
            if let Some(entry) = app.filter_entries.get(app.filter_cursor).cloned() {
                match entry {
                    FilterEntry::Tag(tag) => app.filters.toggle_tag(&tag),
                    FilterEntry::Priority(p) => app.filters.toggle_priority(p),
                    FilterEntry::Due(d) => app.filters.toggle_due(d),
                }
            }
            app.enter(Trigger::Confirm);
            app.resettle(anchor);
        }
        KeyCode::Char('c') => {
            let anchor = app.anchor();
            app.filters.tags.clear();
            app.filters.priorities.clear();
            app.filters.due = None;
            app.enter(Trigger::Confirm);
            app.resettle(anchor);
        }
        _ => {}
    }
}
