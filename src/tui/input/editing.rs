use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Intent;
use crate::tui::app::{App, EditTarget};
use crate::tui::router::Disposition;

use super::{edit_backspace, edit_insert, edit_left, edit_right};

/// Stage 2 of the cascade: a focused text-entry surface. Everything is
/// claimed — while typing, no single-key shortcut may fire.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    if app.edit.is_some() {
        handle_inline_edit(app, key);
    } else if app.filter_entry {
        handle_filter_entry(app, key);
    }
    Disposition::Handled
}

// ---------------------------------------------------------------------------
// Inline title editor (new item / rename)
// ---------------------------------------------------------------------------

fn handle_inline_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.edit = None;
        }
        (_, KeyCode::Enter) => confirm_inline_edit(app),
        (_, KeyCode::Backspace) => {
            if let Some(edit) = &mut app.edit {
                edit_backspace(&mut edit.buffer, &mut edit.cursor);
            }
        }
        (_, KeyCode::Left) => {
            if let Some(edit) = &mut app.edit {
                edit_left(&edit.buffer.clone(), &mut edit.cursor);
            }
        }
        (_, KeyCode::Right) => {
            if let Some(edit) = &mut app.edit {
                edit_right(&edit.buffer.clone(), &mut edit.cursor);
            }
        }
        (_, KeyCode::Home) => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = 0;
            }
        }
        (_, KeyCode::End) => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = edit.buffer.len();
            }
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            if let Some(edit) = &mut app.edit {
                edit_insert(&mut edit.buffer, &mut edit.cursor, c);
            }
        }
        _ => {}
    }
}

fn confirm_inline_edit(app: &mut App) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };
    let title = edit.buffer.trim().to_string();
    if title.is_empty() {
        // The editing surface stays open for correction.
        app.flash_error("a title is required");
        return;
    }
    match edit.target.clone() {
        EditTarget::Rename { id } => {
            app.edit = None;
            app.apply_now(Intent::Rename { id, title });
        }
        EditTarget::NewItem { parent, index } => {
            let temp_id = app.fresh_temp_id();
            let status = app
                .vocab
                .status_options
                .first()
                .map(|s| s.id.clone())
                .unwrap_or_default();
            app.edit = None;
            app.apply_now(Intent::Create {
                id: temp_id.clone(),
                parent,
                index,
                title,
                status,
            });
            app.request_focus(Some(temp_id));
        }
    }
}

// ---------------------------------------------------------------------------
// Filter line
// ---------------------------------------------------------------------------

fn handle_filter_entry(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.session.filter.clear();
            app.filter_entry = false;
            app.cursor = 0;
        }
        (_, KeyCode::Enter) => {
            app.filter_entry = false;
        }
        (_, KeyCode::Backspace) => {
            app.session.filter.pop();
            app.cursor = 0;
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            app.session.filter.push(c);
            app.cursor = 0;
        }
        _ => {}
    }
}
