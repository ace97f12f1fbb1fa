use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{DateField, Intent, Item, ItemFlag, MoveDescriptor};
use crate::ops::outline_ops::{child_count, find_item, position_of};

use super::app::{
    App, EditState, EditTarget, PromptPurpose, PromptState, StatusesEditorState, View,
};
use super::palette::PaletteCommand;
use super::picker::{PickerKind, PickerPhase, PickerState};

pub(crate) const PERMISSION_MESSAGE: &str = "you can't edit this item";

/// Run an exec palette entry. The palette has already collapsed to Closed
/// by the time this is called, so commands never observe a stale palette.
pub(crate) fn dispatch(app: &mut App, command: PaletteCommand) {
    match command {
        PaletteCommand::CycleStatus => cycle_status(app),
        PaletteCommand::OpenStatusPicker => open_picker(app, PickerKind::Status),
        PaletteCommand::OpenTagsPicker => open_picker(app, PickerKind::Tags),
        PaletteCommand::OpenAssigneePicker => open_picker(app, PickerKind::Assignee),
        PaletteCommand::OpenDestinationPicker => open_picker(app, PickerKind::Destination),
        PaletteCommand::RenameItem => begin_rename(app),
        PaletteCommand::NewSibling => begin_new_item(app, false),
        PaletteCommand::NewChild => begin_new_item(app, true),
        PaletteCommand::EditDueDate => begin_date_prompt(app, DateField::Due),
        PaletteCommand::EditScheduledDate => begin_date_prompt(app, DateField::Scheduled),
        PaletteCommand::TogglePriority => toggle_flag(app, ItemFlag::Priority),
        PaletteCommand::ToggleHold => toggle_flag(app, ItemFlag::Hold),
        PaletteCommand::Archive => archive_item(app),
        PaletteCommand::CopyReference => copy_reference(app),
        PaletteCommand::ShowTree => show_view(app, View::Tree),
        PaletteCommand::ShowAgenda => show_view(app, View::Agenda),
        PaletteCommand::ShowDetail => {
            if let Some(item_id) = app.acting_item_id() {
                show_view(app, View::Detail { item_id });
            }
        }
        PaletteCommand::SetAgendaSpan(span) => {
            app.session.agenda_span = Some(span);
            show_view(app, View::Agenda);
        }
        PaletteCommand::CaptureTop => begin_capture(app, false),
        PaletteCommand::CaptureBottom => begin_capture(app, true),
        PaletteCommand::SyncNow => sync_now(app),
        PaletteCommand::FlushMoves => flush_moves(app),
        PaletteCommand::EditStatuses => open_statuses_editor(app),
        PaletteCommand::RenameOutline => begin_outline_rename(app),
        PaletteCommand::ArchiveCompleted => archive_completed(app),
        PaletteCommand::CollapseAll => collapse_all(app),
        PaletteCommand::ExpandAll => expand_all(app),
        PaletteCommand::ToggleTheme => toggle_theme(app),
    }
}

fn toggle_theme(app: &mut App) {
    let next = if app.theme_variant == "light" {
        "dark"
    } else {
        "light"
    };
    app.set_theme_variant(next);
    app.save_device_state();
    app.flash(format!("theme: {next}"));
}

/// The acting item if it may be edited. A vanished item drops the action
/// silently; a non-editable one flashes the permission message.
fn editable_acting_item(app: &mut App) -> Option<Item> {
    let item = app.acting_item()?.clone();
    if !item.can_edit {
        app.flash_error(PERMISSION_MESSAGE);
        return None;
    }
    Some(item)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Advance the item to the next status in vocabulary order. A target
/// status that requires a note detours through the status picker's note
/// phase instead of committing blind.
pub(crate) fn cycle_status(app: &mut App) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let Some(next) = app.vocab.status_after(&item.status).cloned() else {
        app.flash_error("no status vocabulary for this outline");
        return;
    };
    if next.requires_note {
        open_note_entry(app, &item, &next.id);
        return;
    }
    app.apply_now(Intent::Toggle {
        id: item.id,
        to: next.id,
        note: None,
    });
}

fn open_note_entry(app: &mut App, item: &Item, status_id: &str) {
    app.assert_no_blocking_modal();
    let mut picker = PickerState::status(&app.outline.id.clone(), item, &app.vocab);
    if let Some(index) = picker.options.iter().position(|o| o.id == status_id) {
        picker.active = index;
    }
    picker.phase = PickerPhase::Note;
    picker.pending_status = Some(status_id.to_string());
    app.picker = Some(picker);
}

// ---------------------------------------------------------------------------
// Pickers
// ---------------------------------------------------------------------------

pub(crate) fn open_picker(app: &mut App, kind: PickerKind) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let resource_id = app.outline.id.clone();
    // A successful metadata fetch is server truth: adopt it as the live
    // and confirmed vocabulary, not just as this picker's option list.
    let vocab = match app.options.refresh(&resource_id) {
        Some(fresh) => {
            app.vocab = fresh.clone();
            app.confirmed_vocab = fresh.status_options.clone();
            fresh
        }
        None => match app.options.cached(&resource_id) {
            Some(snapshot) => snapshot.clone(),
            None => {
                app.flash_error("no options available for this outline");
                return;
            }
        },
    };
    let picker = match kind {
        PickerKind::Status => PickerState::status(&resource_id, &item, &vocab),
        PickerKind::Tags => PickerState::tags(&resource_id, &item, &vocab),
        PickerKind::Assignee => PickerState::assignee(&resource_id, &item, &vocab),
        PickerKind::Destination => PickerState::destination(&resource_id, &item, &vocab),
    };
    if picker.options.is_empty() {
        app.flash_error("nothing to choose from");
        return;
    }
    app.assert_no_blocking_modal();
    app.picker = Some(picker);
}

// ---------------------------------------------------------------------------
// Title editing and creation
// ---------------------------------------------------------------------------

pub(crate) fn begin_rename(app: &mut App) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let cursor = item.title.len();
    app.edit = Some(EditState {
        target: EditTarget::Rename { id: item.id },
        buffer: item.title,
        cursor,
    });
}

/// Open an inline editor for a new sibling (below the acting item) or a
/// new child (appended to it). On an empty outline, a new top-level item.
pub(crate) fn begin_new_item(app: &mut App, as_child: bool) {
    if app.view != View::Tree {
        return;
    }
    let target = match app.acting_item_id() {
        None => EditTarget::NewItem {
            parent: None,
            index: app.outline.items.len(),
        },
        Some(acting_id) => {
            let Some(item) = editable_acting_item(app) else {
                return;
            };
            if as_child {
                // Make the insertion point visible.
                app.collapsed.remove(&acting_id);
                EditTarget::NewItem {
                    index: item.children.len(),
                    parent: Some(acting_id),
                }
            } else {
                match position_of(&app.outline, &acting_id) {
                    Some((parent, index)) => EditTarget::NewItem {
                        parent,
                        index: index + 1,
                    },
                    None => return,
                }
            }
        }
    };
    app.edit = Some(EditState {
        target,
        buffer: String::new(),
        cursor: 0,
    });
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

/// Reorder among siblings. Optimistic, and buffered behind the coalescing
/// window so held-down reorder keys become one request.
pub(crate) fn move_item(app: &mut App, delta: isize) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let Some((parent, index)) = position_of(&app.outline, &item.id) else {
        return;
    };
    let Some(sibling_count) = child_count(&app.outline, parent.as_deref()) else {
        return;
    };
    let new_index = (index as isize + delta).clamp(0, sibling_count as isize - 1) as usize;
    if new_index == index {
        return;
    }
    app.queue_move_now(
        MoveDescriptor {
            id: item.id.clone(),
            parent,
            index: new_index,
        },
        Instant::now(),
    );
    app.request_focus(Some(item.id));
}

/// Indent: become the last child of the previous sibling.
pub(crate) fn indent_item(app: &mut App) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let Some((parent, index)) = position_of(&app.outline, &item.id) else {
        return;
    };
    if index == 0 {
        return;
    }
    let siblings = match parent.as_deref() {
        None => &app.outline.items,
        Some(parent_id) => match find_item(&app.outline, parent_id) {
            Some(parent_item) => &parent_item.children,
            None => return,
        },
    };
    let new_parent = siblings[index - 1].id.clone();
    let new_index = siblings[index - 1].children.len();
    app.collapsed.remove(&new_parent);
    app.queue_move_now(
        MoveDescriptor {
            id: item.id.clone(),
            parent: Some(new_parent),
            index: new_index,
        },
        Instant::now(),
    );
    app.request_focus(Some(item.id));
}

/// Outdent: become the next sibling of the current parent.
pub(crate) fn outdent_item(app: &mut App) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    let Some((Some(parent_id), _)) = position_of(&app.outline, &item.id) else {
        return;
    };
    let Some((grandparent, parent_index)) = position_of(&app.outline, &parent_id) else {
        return;
    };
    app.queue_move_now(
        MoveDescriptor {
            id: item.id.clone(),
            parent: grandparent,
            index: parent_index + 1,
        },
        Instant::now(),
    );
    app.request_focus(Some(item.id));
}

// ---------------------------------------------------------------------------
// Item field edits
// ---------------------------------------------------------------------------

pub(crate) fn toggle_flag(app: &mut App, flag: ItemFlag) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    app.apply_now(Intent::Flag {
        id: item.id.clone(),
        flag,
        on: !item.flag(flag),
    });
}

pub(crate) fn begin_date_prompt(app: &mut App, field: DateField) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    app.assert_no_blocking_modal();
    let buffer = item
        .date(field)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    app.prompt = Some(PromptState {
        purpose: PromptPurpose::EditDate { id: item.id, field },
        cursor: buffer.len(),
        buffer,
        origin: app.acting_item_id(),
    });
}

pub(crate) fn archive_item(app: &mut App) {
    let Some(item) = editable_acting_item(app) else {
        return;
    };
    // Land on a neighbor once the row disappears.
    let row_ids: Vec<String> = match app.view {
        View::Agenda => app.agenda_rows().iter().map(|e| e.item_id.clone()).collect(),
        _ => app.tree_rows().iter().map(|r| r.id.clone()).collect(),
    };
    let fallback = row_ids
        .get(app.cursor + 1)
        .or_else(|| app.cursor.checked_sub(1).and_then(|i| row_ids.get(i)))
        .cloned();
    app.apply_now(Intent::Archive {
        id: item.id.clone(),
    });
    if let View::Detail { .. } = app.view {
        app.view = View::Tree;
    }
    app.request_focus(fallback.filter(|id| *id != item.id));
}

pub(crate) fn copy_reference(app: &mut App) {
    let Some(item_id) = app.acting_item_id() else {
        return;
    };
    let reference = format!("arbor://{}/{}", app.outline.id, item_id);
    app.flash(format!("copied {reference}"));
    app.session.copied_ref = Some(reference);
}

// ---------------------------------------------------------------------------
// Views, capture, sync, outline management
// ---------------------------------------------------------------------------

fn show_view(app: &mut App, view: View) {
    if app.view == view {
        return;
    }
    let focus = app.session.last_focused.clone();
    app.view = view;
    app.cursor = 0;
    app.scroll_offset = 0;
    app.request_focus(focus);
}

pub(crate) fn begin_capture(app: &mut App, bottom: bool) {
    app.assert_no_blocking_modal();
    app.prompt = Some(PromptState {
        purpose: PromptPurpose::Capture { bottom },
        buffer: String::new(),
        cursor: 0,
        origin: app.acting_item_id(),
    });
}

/// Re-fetch the page and reset both projections to server truth. Refused
/// while mutations are still in flight: their acks would land on state
/// they no longer describe.
pub(crate) fn sync_now(app: &mut App) {
    if !app.coordinator.is_idle() {
        app.flash_error("sync deferred: edits still in flight");
        return;
    }
    let resource_id = app.outline.id.clone();
    match app.transport.load(&resource_id) {
        Ok(page) => {
            app.outline = page.outline.clone();
            app.confirmed = page.outline;
            app.confirmed_vocab = page.vocab.status_options.clone();
            app.vocab = page.vocab.clone();
            app.options.seed(&resource_id, page.vocab);
            app.cursor = app.cursor.min(app.visible_len().saturating_sub(1));
            app.flash("synced");
        }
        Err(error) => app.flash_error(error.to_string()),
    }
}

pub(crate) fn flush_moves(app: &mut App) {
    let resource_id = app.outline.id.clone();
    if app.coordinator.flush_moves(&resource_id).is_some() {
        app.flash("pending moves sent");
    } else {
        app.flash("no pending moves");
    }
}

pub(crate) fn open_statuses_editor(app: &mut App) {
    app.assert_no_blocking_modal();
    app.statuses_editor = Some(StatusesEditorState {
        options: app.vocab.status_options.clone(),
        original: app.vocab.status_options.clone(),
        active: 0,
        renaming: None,
        origin: app.acting_item_id(),
    });
}

pub(crate) fn begin_outline_rename(app: &mut App) {
    app.assert_no_blocking_modal();
    let buffer = app.outline.title.clone();
    app.prompt = Some(PromptState {
        purpose: PromptPurpose::RenameOutline,
        cursor: buffer.len(),
        buffer,
        origin: app.acting_item_id(),
    });
}

/// One batch archiving every end-state item still in view.
pub(crate) fn archive_completed(app: &mut App) {
    let end_states: Vec<String> = app
        .vocab
        .status_options
        .iter()
        .filter(|s| s.is_end_state)
        .map(|s| s.id.clone())
        .collect();
    let mut ids = Vec::new();
    collect_with_status(&app.outline.items, &end_states, &mut ids);
    if ids.is_empty() {
        app.flash("nothing to archive");
        return;
    }
    let count = ids.len();
    app.apply_batch_now(ids.into_iter().map(|id| Intent::Archive { id }).collect());
    app.flash(format!("archived {count} completed item(s)"));
    app.cursor = app.cursor.min(app.visible_len().saturating_sub(1));
}

fn collect_with_status(items: &[Item], statuses: &[String], out: &mut Vec<String>) {
    for item in items {
        if statuses.iter().any(|s| *s == item.status) {
            out.push(item.id.clone());
        }
        collect_with_status(&item.children, statuses, out);
    }
}

pub(crate) fn collapse_all(app: &mut App) {
    let mut ids = Vec::new();
    collect_parents(&app.outline.items, &mut ids);
    app.collapsed = ids.into_iter().collect();
    app.cursor = app.cursor.min(app.visible_len().saturating_sub(1));
}

fn collect_parents(items: &[Item], out: &mut Vec<String>) {
    for item in items {
        if !item.children.is_empty() {
            out.push(item.id.clone());
            collect_parents(&item.children, out);
        }
    }
}

pub(crate) fn expand_all(app: &mut App) {
    app.collapsed.clear();
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse prompt input into a date-time. Empty clears the field.
pub(crate) fn parse_date_input(input: &str) -> Result<Option<NaiveDateTime>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(Some(dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0));
    }
    Err("expected YYYY-MM-DD or YYYY-MM-DD HH:MM".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Payload;
    use crate::ops::outline_ops::find_item_mut;
    use crate::tui::app::testing::{settle_all, test_app};

    #[test]
    fn cycle_status_sends_a_single_toggle() {
        let (mut app, transport) = test_app();
        cycle_status(&mut app);
        settle_all(&mut app);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "out-1");
        match &calls[0].1 {
            Payload::Single(Intent::Toggle { id, to, note }) => {
                assert_eq!(id, "a");
                assert_eq!(to, "done");
                assert!(note.is_none());
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn cycle_into_note_status_opens_note_entry_instead() {
        let (mut app, transport) = test_app();
        if let Some(item) = find_item_mut(&mut app.outline, "a") {
            item.status = "done".into();
        }
        // done → wontfix, which requires a note.
        cycle_status(&mut app);
        settle_all(&mut app);

        assert!(transport.calls.lock().unwrap().is_empty());
        let picker = app.picker.as_ref().unwrap();
        assert_eq!(picker.phase, PickerPhase::Note);
        assert_eq!(picker.pending_status.as_deref(), Some("wontfix"));
    }

    #[test]
    fn non_editable_item_is_guarded_with_a_message() {
        let (mut app, transport) = test_app();
        if let Some(item) = find_item_mut(&mut app.outline, "a") {
            item.can_edit = false;
        }
        open_picker(&mut app, PickerKind::Status);
        assert!(app.picker.is_none());
        assert!(app.status_message.as_ref().unwrap().is_error);
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn reorder_keeps_focus_on_the_moved_item() {
        let (mut app, _) = test_app();
        // Cursor on "a" (index 0); move it below "b".
        move_item(&mut app, 1);
        app.tick(Instant::now());
        let rows = app.tree_rows();
        assert_eq!(rows[app.cursor].id, "a");
        assert_eq!(rows[0].id, "b");
    }

    #[test]
    fn indent_becomes_child_of_previous_sibling() {
        let (mut app, _) = test_app();
        app.move_cursor(2); // "b"
        indent_item(&mut app);
        assert_eq!(
            position_of(&app.outline, "b"),
            Some((Some("a".into()), 1))
        );
    }

    #[test]
    fn outdent_follows_the_parent() {
        let (mut app, _) = test_app();
        app.move_cursor(1); // "a1"
        outdent_item(&mut app);
        assert_eq!(position_of(&app.outline, "a1"), Some((None, 1)));
    }

    #[test]
    fn archive_completed_batches_end_state_items() {
        let (mut app, transport) = test_app();
        if let Some(item) = find_item_mut(&mut app.outline, "a1") {
            item.status = "done".into();
        }
        if let Some(item) = find_item_mut(&mut app.outline, "b") {
            item.status = "wontfix".into();
        }
        archive_completed(&mut app);
        settle_all(&mut app);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        match &calls[0].1 {
            Payload::Batch { ops } => {
                assert_eq!(
                    ops,
                    &vec![
                        Intent::Archive { id: "a1".into() },
                        Intent::Archive { id: "b".into() }
                    ]
                );
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert!(find_item(&app.outline, "a1").is_none());
        assert!(find_item(&app.outline, "b").is_none());
    }

    #[test]
    fn date_input_parses_and_reports_errors() {
        assert_eq!(parse_date_input("  "), Ok(None));
        assert!(parse_date_input("2026-03-01").unwrap().is_some());
        assert!(parse_date_input("2026-03-01 14:30").unwrap().is_some());
        assert!(parse_date_input("tomorrow").is_err());
    }
}
