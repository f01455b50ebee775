use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::nav::Direction;
use crate::tui::app::{App, Trigger};

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_step(app, Direction::Down),
        KeyCode::Char('k') | KeyCode::Up => move_step(app, Direction::Up),
        KeyCode::Enter | KeyCode::Char('m') => confirm_move(app),
        KeyCode::Esc => cancel_move(app),
        _ => {}
    }
}

fn move_step(app: &mut App, direction: Direction) {
    let Some(session) = app.move_session.as_mut() else {
        return;
    };
    if session.step(&mut app.doc, direction) {
        app.cursor = Some(session.hold);
        app.refresh();
    }
}

/// Keep the new position: one undo entry for the whole move, one save
fn confirm_move(app: &mut App) {
    if let Some(session) = app.move_session.take() {
        let origin = session.origin;
        let moved = session.has_moved();
        let (before, index) = session.commit();
        if moved {
            app.undo.push(&before, Some(origin));
            app.persist();
            tracing::debug!(from = origin, to = index, "moved item");
        }
        app.cursor = Some(index);
        app.refresh();
    }
    app.enter(Trigger::Confirm);
}

fn cancel_move(app: &mut App) {
    if let Some(session) = app.move_session.take() {
        let (restored, origin) = session.cancel();
        app.doc = restored;
        app.cursor = Some(origin);
        app.refresh();
    }
    app.enter(Trigger::Cancel);
}
