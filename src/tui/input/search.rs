use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Trigger};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    let Some(search) = app.search.as_mut() else {
        app.enter(Trigger::Cancel);
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.search = None;
            app.enter(Trigger::Cancel);
        }
        (_, KeyCode::Enter) => {
            let target = search.selected_index();
            app.search = None;
            if let Some(index) = target {
                app.cursor = Some(index);
            }
            app.refresh();
            app.enter(Trigger::Confirm);
        }
        (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n' | 'j')) => search.select_next(),
        (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p' | 'k')) => search.select_prev(),
        (_, KeyCode::Backspace) => {
            if search.input.pop().is_some() {
                search.update(&app.doc);
            }
        }
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            search.input.push(c);
            search.update(&app.doc);
        }
        _ => {}
    }
}
