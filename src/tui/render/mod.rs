pub mod agenda_view;
pub mod detail_view;
pub mod helpers;
pub mod palette;
pub mod picker;
pub mod prompt;
pub mod status_row;
pub mod statuses_editor;
pub mod tree_view;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, View};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let view = app.view.clone();
    match view {
        View::Tree => tree_view::render_tree(frame, app, chunks[0]),
        View::Agenda => agenda_view::render_agenda(frame, app, chunks[0]),
        View::Detail { .. } => detail_view::render_detail(frame, app, chunks[0]),
    }

    status_row::render_status_row(frame, app, chunks[1]);

    // Blocking modals draw above everything; at most one is open.
    if app.palette.is_some() {
        palette::render_palette(frame, app, area);
    } else if app.picker.is_some() {
        picker::render_picker(frame, app, area);
    } else if app.prompt.is_some() {
        prompt::render_prompt(frame, app, area);
    } else if app.statuses_editor.is_some() {
        statuses_editor::render_statuses_editor(frame, app, area);
    }
}
