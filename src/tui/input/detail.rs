use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{DateField, ItemFlag};
use crate::tui::actions;
use crate::tui::app::{App, View};
use crate::tui::picker::PickerKind;
use crate::tui::router::Disposition;

/// Item-detail accelerators: the same field edits as a tree row, minus
/// the structural ones. Escape returns to the tree.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            let focus = match &app.view {
                View::Detail { item_id } => Some(item_id.clone()),
                _ => None,
            };
            app.view = View::Tree;
            app.request_focus(focus);
        }
        (KeyModifiers::NONE, KeyCode::Char('x')) => actions::cycle_status(app),
        (KeyModifiers::NONE, KeyCode::Char('s')) => actions::open_picker(app, PickerKind::Status),
        (KeyModifiers::NONE, KeyCode::Char('t')) => actions::open_picker(app, PickerKind::Tags),
        (KeyModifiers::NONE, KeyCode::Char('a')) => actions::open_picker(app, PickerKind::Assignee),
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            actions::open_picker(app, PickerKind::Destination)
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => actions::begin_rename(app),
        (KeyModifiers::NONE, KeyCode::Char('p')) => {
            actions::toggle_flag(app, ItemFlag::Priority)
        }
        (KeyModifiers::NONE, KeyCode::Char('b')) => actions::toggle_flag(app, ItemFlag::Hold),
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            actions::begin_date_prompt(app, DateField::Due)
        }
        (KeyModifiers::SHIFT, KeyCode::Char('D')) => {
            actions::begin_date_prompt(app, DateField::Scheduled)
        }
        (KeyModifiers::SHIFT, KeyCode::Char('X')) => actions::archive_item(app),
        (KeyModifiers::NONE, KeyCode::Char('y')) => actions::copy_reference(app),
        _ => return Disposition::NotHandled,
    }
    Disposition::Handled
}
