use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::filter::DueFilter;
use crate::ops::item_ops::{self, SortKey};
use crate::tui::app::{App, EditTarget, Trigger};

pub(super) fn handle_command(app: &mut App, key: KeyEvent) {
    let Some(cp) = app.command_palette.as_mut() else {
        app.enter(Trigger::Cancel);
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.command_palette = None;
            app.enter(Trigger::Cancel);
        }
        (_, KeyCode::Enter) => {
            let name = cp.selected_name();
            app.command_palette = None;
            match name {
                Some("set-max-visible") => {
                    app.edit_buffer.clear();
                    app.edit_cursor = 0;
                    app.edit_target = Some(EditTarget::MaxVisible);
                    app.enter(Trigger::AskMaxVisible);
                }
                Some(name) => {
                    app.enter(Trigger::Confirm);
                    run_command(app, name);
                }
                None => {
                    app.enter(Trigger::Cancel);
                }
            }
        }
        (_, KeyCode::Tab) => cp.complete(),
        (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p')) => cp.select_prev(),
        (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n')) => cp.select_next(),
        (_, KeyCode::Backspace) => {
            if cp.input.pop().is_none() {
                app.command_palette = None;
                app.enter(Trigger::Cancel);
            } else {
                cp.selected = 0;
                cp.update_filter();
            }
        }
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            cp.input.push(c);
            cp.selected = 0;
            cp.update_filter();
        }
        _ => {}
    }
}

/// Execute a palette command by name
pub(super) fn run_command(app: &mut App, name: &str) {
    tracing::debug!(command = name, "palette command");
    let anchor = app.anchor();
    let scope = app.settings.scope;
    let options = app.options;
    match name {
        "check-all" | "uncheck-all" => {
            let checked = name == "check-all";
            if let Some(n) = app.mutate(|doc| Ok(item_ops::set_all_checked(doc, checked))) {
                app.set_status(format!("{} item(s) changed", n));
                app.resettle(anchor);
            }
        }
        "sort-done" | "sort-priority" | "sort-due" => {
            let key = match name {
                "sort-done" => SortKey::Done,
                "sort-priority" => SortKey::Priority,
                _ => SortKey::Due,
            };
            let focused = app.cursor;
            if let Some(order) = app.mutate(|doc| Ok(item_ops::sort_items(doc, key, scope, &options))) {
                // Follow the focused item to its new position
                app.cursor = focused.and_then(|c| order.iter().position(|&from| from == c));
                app.refresh();
            }
        }
        "clear-done" => {
            if let Some(n) = app.mutate(|doc| Ok(item_ops::clear_done(doc, &options))) {
                app.set_status(format!("{} completed item(s) removed", n));
                app.refresh();
            }
        }
        "filter-done" => {
            app.toggle_filter_done();
            app.set_status(if app.settings.filter_done {
                "hiding completed items"
            } else {
                "showing completed items"
            });
        }
        "filter-due" => toggle_due(app, DueFilter::HasDue),
        "filter-overdue" => toggle_due(app, DueFilter::Overdue),
        "filter-today" => toggle_due(app, DueFilter::Today),
        "filter-week" => toggle_due(app, DueFilter::Week),
        "read-only" => {
            let on = !app.settings.read_only;
            app.set_read_only(on);
            app.set_status(if on { "read-only on" } else { "read-only off" });
        }
        "save" => app.save(),
        "force-save" => app.force_save(),
        "reload" => app.reload(),
        "wrap" => app.settings.word_wrap = !app.settings.word_wrap,
        "line-numbers" => app.settings.line_numbers = !app.settings.line_numbers,
        "show-headings" => app.settings.show_headings = !app.settings.show_headings,
        other => app.set_error(format!("unknown command: {}", other)),
    }
}

fn toggle_due(app: &mut App, due: DueFilter) {
    let anchor = app.anchor();
    app.filters.toggle_due(due);
    app.resettle(anchor);
    match app.filters.due {
        Some(d) => app.set_status(format!("filter: {}", d.name())),
        None => app.set_status("due filter cleared"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_from;
    use pretty_assertions::assert_eq;

    fn names(app: &App) -> Vec<String> {
        app.doc.items().map(|i| i.markdown()).collect()
    }

    #[test]
    fn sorts_are_undoable() {
        let (_dir, mut app) = app_from("- [ ] c !p3\n- [ ] a !p1\n- [ ] b\n");
        run_command(&mut app, "sort-priority");
        assert_eq!(names(&app), vec!["a !p1", "c !p3", "b"]);
        app.undo();
        assert_eq!(names(&app), vec!["c !p3", "a !p1", "b"]);
    }

    #[test]
    fn sort_keeps_focus_on_the_same_item() {
        let (_dir, mut app) = app_from("- [ ] c !p3\n- [ ] a !p1\n- [ ] b\n");
        app.cursor = Some(0);
        run_command(&mut app, "sort-priority");
        assert_eq!(app.current_item().map(|i| i.markdown()), Some("c !p3".to_string()));
        assert_eq!(app.cursor, Some(1));
    }

    #[test]
    fn commands_that_change_nothing_leave_no_undo_entry() {
        let (dir, mut app) = app_from("- [ ] a !p1\n- [ ] b\n");
        let path = dir.path().join("todo.md");
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

        run_command(&mut app, "sort-priority");
        run_command(&mut app, "uncheck-all");
        run_command(&mut app, "clear-done");
        assert!(app.undo.is_empty());
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);

        run_command(&mut app, "check-all");
        assert_eq!(app.undo.len(), 1);
    }

    #[test]
    fn sort_done_sinks_completed() {
        let (_dir, mut app) = app_from("- [x] a\n- [ ] b\n- [x] c\n- [ ] d\n");
        run_command(&mut app, "sort-done");
        assert_eq!(names(&app), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn filter_done_is_session_only() {
        let (dir, mut app) = app_from("- [x] a\n- [ ] b\n");
        run_command(&mut app, "filter-done");
        assert_eq!(app.visible, vec![1]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("todo.md")).unwrap(),
            "- [x] a\n- [ ] b\n"
        );
    }

    #[test]
    fn due_filters_toggle() {
        let (_dir, mut app) = app_from("- [ ] a @due(2000-01-01)\n- [ ] b\n");
        run_command(&mut app, "filter-overdue");
        assert_eq!(app.visible, vec![0]);
        run_command(&mut app, "filter-overdue");
        assert_eq!(app.visible, vec![0, 1]);
    }

    #[test]
    fn uncheck_all_under_filter_keeps_cursor() {
        let (_dir, mut app) = app_from("- [x] a\n- [ ] b\n");
        run_command(&mut app, "uncheck-all");
        assert_eq!(names(&app).len(), 2);
        assert!(app.doc.items().all(|i| !i.checked));
        assert_eq!(app.cursor, Some(0));
    }

    #[test]
    fn view_toggles() {
        let (_dir, mut app) = app_from("- [ ] a\n");
        let wrap = app.settings.word_wrap;
        run_command(&mut app, "wrap");
        assert_eq!(app.settings.word_wrap, !wrap);
        run_command(&mut app, "line-numbers");
        assert!(!app.settings.line_numbers);
    }

    #[test]
    fn save_reports_conflict() {
        let (dir, mut app) = app_from("- [ ] a\n");
        std::fs::write(dir.path().join("todo.md"), "changed\n").unwrap();
        run_command(&mut app, "save");
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
        run_command(&mut app, "force-save");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("todo.md")).unwrap(),
            "- [ ] a\n"
        );
    }
}
