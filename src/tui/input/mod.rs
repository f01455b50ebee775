mod command;
mod edit;
mod filter;
mod move_mode;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Trigger};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Insert | Mode::Edit | Mode::MaxVisibleInput => edit::handle_edit(app, key),
        Mode::Move => move_mode::handle_move(app, key),
        Mode::Command => command::handle_command(app, key),
        Mode::Search => search::handle_search(app, key),
        Mode::TagFilter => filter::handle_filter_menu(app, key),
        Mode::Help => handle_help(app, key),
    }
}

/// Any key closes the help overlay
fn handle_help(app: &mut App, key: KeyEvent) {
    let trigger = match key.code {
        KeyCode::Char('?') => Trigger::OpenHelp,
        _ => Trigger::Cancel,
    };
    app.enter(trigger);
}

/// Normalize key events from terminals using the kitty keyboard protocol,
/// which sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE)`.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

fn shift_symbol(c: char) -> Option<char> {
    match c {
        ';' => Some(':'),
        '/' => Some('?'),
        _ => None,
    }
}
