use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::item_ops;
use crate::ops::nav::{self, Direction, MoveSession};
use crate::tui::app::{App, EditTarget, Trigger};
use crate::tui::command_actions::CommandPaletteState;
use crate::tui::search::SearchState;
use crate::util::clipboard;

/// Largest count prefix kept
const MAX_COUNT: usize = 999;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    let pending_g = std::mem::take(&mut app.pending_g);

    let count = app.count.take();
    if let KeyCode::Char(digit @ '0'..='9') = key.code
        && (digit != '0' || count.is_some())
        && !key.modifiers.contains(KeyModifiers::CONTROL)
    {
        let value = digit.to_digit(10).unwrap_or(0) as usize;
        app.count = Some((count.unwrap_or(0) * 10 + value).min(MAX_COUNT));
        return;
    }
    let count = count.unwrap_or(1);

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('j') | KeyCode::Down) => step(app, Direction::Down, count),
        (_, KeyCode::Char('k') | KeyCode::Up) => step(app, Direction::Up, count),
        (_, KeyCode::Char('g')) => {
            if pending_g {
                app.cursor = nav::first_visible(&app.visible, &app.scope()).or(app.cursor);
            } else {
                app.pending_g = true;
            }
        }
        (_, KeyCode::Char('G')) => {
            app.cursor = nav::last_visible(&app.visible, &app.scope()).or(app.cursor);
        }
        (_, KeyCode::Char(' ') | KeyCode::Enter) => toggle_current(app),
        (_, KeyCode::Char('n')) => {
            let target = match app.cursor {
                Some(c) => EditTarget::NewAfter(Some(c)),
                None => EditTarget::Append,
            };
            begin_insert(app, target);
        }
        (_, KeyCode::Char('N')) => begin_insert(app, EditTarget::Append),
        (_, KeyCode::Char('e')) => begin_edit(app),
        (_, KeyCode::Char('d')) => delete_current(app),
        (_, KeyCode::Char('m')) => arm_move(app),
        (_, KeyCode::Char('u')) => app.undo(),
        (_, KeyCode::Char('?')) => {
            app.enter(Trigger::OpenHelp);
        }
        (_, KeyCode::Char('f')) => open_filter_menu(app),
        (_, KeyCode::Char('/')) => open_search(app),
        (_, KeyCode::Char('c')) => copy_current(app),
        (_, KeyCode::Char(':')) => {
            app.command_palette = Some(CommandPaletteState::new());
            app.enter(Trigger::OpenPalette);
        }
        (_, KeyCode::Tab) => indent_current(app, true),
        (_, KeyCode::BackTab) => indent_current(app, false),
        _ => {}
    }
}

fn step(app: &mut App, direction: Direction, count: usize) {
    let Some(mut cursor) = app.cursor else {
        return;
    };
    let scope = app.scope();
    for _ in 0..count {
        let next = nav::step(&app.visible, cursor, direction, &scope);
        if next == cursor {
            break;
        }
        cursor = next;
    }
    app.cursor = Some(cursor);
}

fn toggle_current(app: &mut App) {
    let Some(anchor) = app.anchor() else {
        return;
    };
    if app
        .mutate(|doc| item_ops::toggle_item(doc, anchor.index))
        .is_some()
    {
        app.settle(anchor);
    }
}

fn delete_current(app: &mut App) {
    let Some(mut anchor) = app.anchor() else {
        return;
    };
    // The item's scope, one shorter once it is gone
    let scope = app.scope();
    let options = app.options;
    if app
        .mutate(|doc| item_ops::delete_item(doc, anchor.index, &options))
        .is_some()
    {
        anchor.removed = true;
        app.settle_in(anchor, scope.start..scope.end.saturating_sub(1));
    }
}

fn indent_current(app: &mut App, deeper: bool) {
    let Some(index) = app.cursor else {
        return;
    };
    let options = app.options;
    let done = app.mutate(|doc| {
        if deeper {
            item_ops::indent_item(doc, index, &options)
        } else {
            item_ops::outdent_item(doc, index, &options)
        }
    });
    if done.is_some() {
        app.refresh();
    }
}

fn begin_insert(app: &mut App, target: EditTarget) {
    if !app.ensure_writable() {
        return;
    }
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.edit_target = Some(target);
    app.enter(Trigger::BeginInsert);
}

fn begin_edit(app: &mut App) {
    let Some(index) = app.cursor else {
        return;
    };
    if !app.ensure_writable() {
        return;
    }
    let Some(text) = app.doc.item(index).map(|i| i.markdown()) else {
        return;
    };
    app.edit_cursor = text.len();
    app.edit_buffer = text;
    app.edit_target = Some(EditTarget::Item(index));
    app.enter(Trigger::BeginEdit);
}

fn arm_move(app: &mut App) {
    let Some(index) = app.cursor else {
        return;
    };
    if !app.ensure_writable() {
        return;
    }
    match MoveSession::arm(&app.doc, index, app.settings.scope, &app.options) {
        Ok(session) => {
            app.move_session = Some(session);
            app.enter(Trigger::ArmMove);
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

fn open_search(app: &mut App) {
    let scope = app.scope();
    let candidates: Vec<usize> = app
        .visible
        .iter()
        .copied()
        .filter(|i| scope.contains(i))
        .collect();
    if candidates.is_empty() {
        app.set_status("nothing to search");
        return;
    }
    app.search = Some(SearchState::new(&app.doc, &candidates));
    app.enter(Trigger::OpenSearch);
}

fn copy_current(app: &mut App) {
    let Some(text) = app.current_item().map(|i| i.markdown()) else {
        return;
    };
    match clipboard::copy_text(&text) {
        Ok(()) => app.set_status("copied to clipboard"),
        Err(e) => {
            tracing::warn!("clipboard: {}", e);
            app.set_error(format!("copy failed: {}", e));
        }
    }
}

fn open_filter_menu(app: &mut App) {
    app.rebuild_filter_entries();
    if app.filter_entries.is_empty() {
        app.set_status("nothing to filter by");
        return;
    }
    app.enter(Trigger::OpenFilter);
}
