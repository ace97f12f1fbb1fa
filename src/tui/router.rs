use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, View};
use super::input;

/// What a dispatch stage did with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Handled,
    NotHandled,
}

/// One stage of the dispatch cascade.
pub struct Route {
    pub name: &'static str,
    pub applies: fn(&App) -> bool,
    pub handle: fn(&mut App, KeyEvent) -> Disposition,
}

/// The fixed-priority cascade. Stages are tried top to bottom; the first
/// one that applies and handles the event wins.
///
/// 1. A blocking modal claims every keystroke, recognized or not, so
///    nothing leaks into view-level shortcuts underneath it.
/// 2. A focused text-entry surface suppresses all single-key shortcuts.
/// 3. View-contextual handlers own the structural edit keys.
/// 4. Generic list navigation is the fallback for any list view.
pub fn routes() -> &'static [Route] {
    const ROUTES: &[Route] = &[
        Route {
            name: "modal",
            applies: |app| app.blocking_modal_open(),
            handle: input::modal::handle,
        },
        Route {
            name: "text-entry",
            applies: |app| app.editing_text(),
            handle: input::editing::handle,
        },
        Route {
            name: "tree-row",
            applies: |app| app.view == View::Tree,
            handle: input::tree::handle,
        },
        Route {
            name: "agenda-row",
            applies: |app| app.view == View::Agenda,
            handle: input::agenda::handle,
        },
        Route {
            name: "item-detail",
            applies: |app| matches!(app.view, View::Detail { .. }),
            handle: input::detail::handle,
        },
        Route {
            name: "list-nav",
            applies: |_| true,
            handle: input::navigate::handle,
        },
    ];
    ROUTES
}

/// Route one key press through the cascade.
pub fn dispatch(app: &mut App, key: KeyEvent) {
    // Bare modifier presses (Shift, Ctrl, ...) are noise.
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);
    for route in routes() {
        if (route.applies)(app) && (route.handle)(app, key) == Disposition::Handled {
            return;
        }
    }
}

/// Ctrl+G cancels everywhere Escape does.
fn normalize_key(key: KeyEvent) -> KeyEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
        return KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    }
    key
}

#[cfg(test)]
pub(crate) fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    dispatch(app, KeyEvent::new(code, modifiers));
}
