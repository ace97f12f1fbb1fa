use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{DateField, ItemFlag};
use crate::tui::actions;
use crate::tui::app::App;
use crate::tui::picker::PickerKind;
use crate::tui::router::Disposition;

/// Tree-row accelerators: structural edits, status cycling, pickers,
/// archive. Anything else falls through to generic list navigation.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('x')) => actions::cycle_status(app),
        (KeyModifiers::NONE, KeyCode::Char('s')) => actions::open_picker(app, PickerKind::Status),
        (KeyModifiers::NONE, KeyCode::Char('t')) => actions::open_picker(app, PickerKind::Tags),
        (KeyModifiers::NONE, KeyCode::Char('a')) => actions::open_picker(app, PickerKind::Assignee),
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            actions::open_picker(app, PickerKind::Destination)
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => actions::begin_rename(app),
        (KeyModifiers::NONE, KeyCode::Char('o')) => actions::begin_new_item(app, false),
        (KeyModifiers::SHIFT, KeyCode::Char('O')) => actions::begin_new_item(app, true),
        (KeyModifiers::NONE, KeyCode::Tab) | (_, KeyCode::Char('>')) => actions::indent_item(app),
        (KeyModifiers::SHIFT, KeyCode::BackTab) | (_, KeyCode::Char('<')) => {
            actions::outdent_item(app)
        }
        (KeyModifiers::SHIFT, KeyCode::Char('J')) => actions::move_item(app, 1),
        (KeyModifiers::SHIFT, KeyCode::Char('K')) => actions::move_item(app, -1),
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
