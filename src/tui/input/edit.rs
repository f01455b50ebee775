use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::item_ops;
use crate::ops::nav::Anchor;
use crate::tui::app::{App, EditTarget, Trigger};
use crate::util::unicode;

/// Line editing shared by Insert, Edit and MaxVisibleInput
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => cancel_edit(app),
        (_, KeyCode::Enter) => confirm_edit(app),
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => cancel_edit(app),

        // Cursor movement
        (_, KeyCode::Left) => {
            if let Some(i) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = i;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(i) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = i;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.edit_cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.edit_cursor = app.edit_buffer.len();
        }

        // Deletion
        (KeyModifiers::ALT, KeyCode::Backspace) | (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            let start = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.replace_range(start..app.edit_cursor, "");
            app.edit_cursor = start;
        }
        (_, KeyCode::Backspace) => {
            if let Some(i) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.replace_range(i..app.edit_cursor, "");
                app.edit_cursor = i;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(i) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.replace_range(app.edit_cursor..i, "");
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.edit_buffer.replace_range(..app.edit_cursor, "");
            app.edit_cursor = 0;
        }

        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            // The max-visible prompt only takes digits
            if app.edit_target == Some(EditTarget::MaxVisible) && !c.is_ascii_digit() {
                return;
            }
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn finish(app: &mut App, trigger: Trigger) {
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.edit_target = None;
    app.enter(trigger);
}

fn cancel_edit(app: &mut App) {
    finish(app, Trigger::Cancel);
}

fn confirm_edit(app: &mut App) {
    let text = app.edit_buffer.trim().to_string();
    let target = app.edit_target;
    finish(app, Trigger::Confirm);

    let Some(target) = target else {
        return;
    };
    match target {
        EditTarget::MaxVisible => match text.parse::<u32>() {
            Ok(n) => {
                app.settings.max_visible = n;
                app.scroll = 0;
                if n == 0 {
                    app.set_status("max visible: unlimited");
                } else {
                    app.set_status(format!("max visible: {}", n));
                }
            }
            Err(_) => app.set_error("max visible: enter a number"),
        },
        // Empty input adds nothing and leaves the item unchanged
        _ if text.is_empty() => {}
        EditTarget::NewAfter(after) => {
            if let Some(index) = app.mutate(|doc| item_ops::insert_item(doc, after, &text)) {
                focus_new(app, index);
            }
        }
        EditTarget::Append => {
            if let Some(index) = app.mutate(|doc| Ok(item_ops::add_item(doc, &text))) {
                focus_new(app, index);
            }
        }
        EditTarget::Item(index) => {
            let depth = app.doc.item(index).map_or(0, |i| i.depth);
            if app
                .mutate(|doc| item_ops::edit_item(doc, index, &text))
                .is_some()
            {
                // New tags may take the item out of a tag filter
                app.settle(Anchor {
                    index,
                    depth,
                    removed: false,
                });
            }
        }
    }
}

/// Put the cursor on a just-added item, or near it when a filter hides it
fn focus_new(app: &mut App, index: usize) {
    app.cursor = Some(index);
    app.refresh();
    if app.cursor != Some(index) {
        app.set_status("added (hidden by the active filter)");
    }
}
