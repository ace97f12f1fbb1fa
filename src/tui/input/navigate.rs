use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::outline_ops::position_of;
use crate::tui::app::{App, View};
use crate::tui::palette::PaletteState;
use crate::tui::router::Disposition;

/// Final stage of the cascade: generic list navigation plus the handful
/// of keys that work from any view (palette, filter, view switching).
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => app.move_cursor(1),
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => app.move_cursor(-1),
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            app.move_cursor(isize::MIN + 1)
        }
        (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.move_cursor(isize::MAX)
        }
        (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h')) => collapse_or_parent(app),
        (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l')) => expand_or_first_child(app),
        (_, KeyCode::Enter) => open_focused(app),
        (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            app.assert_no_blocking_modal();
            app.palette = Some(PaletteState::open(app));
        }
        (KeyModifiers::NONE, KeyCode::Char('/')) => {
            app.filter_entry = true;
        }
        (_, KeyCode::Esc) => {
            if !app.session.filter.is_empty() {
                app.session.filter.clear();
                app.cursor = 0;
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('1')) => {
            app.view = View::Tree;
            app.cursor = 0;
            let focus = app.session.last_focused.clone();
            app.request_focus(focus);
        }
        (KeyModifiers::NONE, KeyCode::Char('2')) => {
            app.view = View::Agenda;
            app.cursor = 0;
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        _ => return Disposition::NotHandled,
    }
    Disposition::Handled
}

fn open_focused(app: &mut App) {
    if let Some(item_id) = app.acting_item_id() {
        if !matches!(app.view, View::Detail { .. }) {
            app.session.last_focused = Some(item_id.clone());
            app.view = View::Detail { item_id };
        }
    }
}

/// Collapse the focused subtree, or hop to the parent when there is
/// nothing left to collapse.
fn collapse_or_parent(app: &mut App) {
    if app.view != View::Tree {
        return;
    }
    let rows = app.tree_rows();
    let Some(row) = rows.get(app.cursor) else {
        return;
    };
    if row.has_children && !row.is_collapsed {
        app.collapsed.insert(row.id.clone());
        return;
    }
    if let Some((Some(parent), _)) = position_of(&app.outline, &row.id) {
        if let Some(index) = rows.iter().position(|r| r.id == parent) {
            app.cursor = index;
            app.session.last_focused = Some(parent);
        }
    }
}

fn expand_or_first_child(app: &mut App) {
    if app.view != View::Tree {
        return;
    }
    let Some(row) = app.tree_rows().get(app.cursor).cloned() else {
        return;
    };
    if row.has_children {
        if row.is_collapsed {
            app.collapsed.remove(&row.id);
        } else {
            app.move_cursor(1);
        }
    }
}
