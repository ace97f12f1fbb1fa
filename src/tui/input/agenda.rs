use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::actions;
use crate::tui::app::App;
use crate::tui::picker::PickerKind;
use crate::tui::router::Disposition;

/// Agenda-row accelerators. Structural edits make no sense against a
/// date-sorted projection, so only item-level actions are offered here.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('x')) => actions::cycle_status(app),
        (KeyModifiers::NONE, KeyCode::Char('s')) => actions::open_picker(app, PickerKind::Status),
        (KeyModifiers::NONE, KeyCode::Char('y')) => actions::copy_reference(app),
        _ => return Disposition::NotHandled,
    }
    Disposition::Handled
}
