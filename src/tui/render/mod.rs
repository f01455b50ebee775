pub mod command_palette;
pub mod filter_popup;
pub mod help_overlay;
mod helpers;
pub mod list_view;
pub mod search_overlay;
pub mod status_row;
pub mod title_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Main render function: title, list, status row, then any overlay
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // list
            Constraint::Length(1), // status row
        ])
        .split(area);

    title_bar::render_title_bar(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);

    match app.mode {
        Mode::Help => help_overlay::render_help_overlay(frame, app, area),
        Mode::Command => command_palette::render_command_palette(frame, app, chunks[1]),
        Mode::TagFilter => filter_popup::render_filter_popup(frame, app, chunks[1]),
        Mode::Search => search_overlay::render_search_overlay(frame, app, chunks[1]),
        _ => {}
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
