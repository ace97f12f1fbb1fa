use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Intent;
use crate::ops::outline_ops::apply_intent;
use crate::tui::actions;
use crate::tui::app::{App, PromptPurpose};
use crate::tui::palette::EntryKind;
use crate::tui::picker::{PickerKind, PickerPhase};
use crate::tui::router::Disposition;

use super::{edit_backspace, edit_insert, edit_left, edit_right};

/// Stage 1 of the cascade: whichever blocking modal is up owns the event,
/// including keys it does not recognize.
pub(crate) fn handle(app: &mut App, key: KeyEvent) -> Disposition {
    if app.palette.is_some() {
        handle_palette(app, key);
    } else if app.picker.is_some() {
        handle_picker(app, key);
    } else if app.prompt.is_some() {
        handle_prompt(app, key);
    } else if app.statuses_editor.is_some() {
        handle_statuses_editor(app, key);
    }
    Disposition::Handled
}

// ---------------------------------------------------------------------------
// Action palette
// ---------------------------------------------------------------------------

fn handle_palette(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc | KeyCode::Backspace) => {
            let Some(mut palette) = app.palette.take() else {
                return;
            };
            if palette.pop(app) {
                app.palette = Some(palette);
            } else {
                // Depth 1: close and give focus back to where it came from.
                app.request_focus(palette.origin.clone());
            }
        }
        (_, KeyCode::Enter) => {
            let index = app.palette.as_ref().map(|p| p.active);
            if let Some(index) = index {
                execute_palette_entry(app, index);
            }
        }
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            if let Some(palette) = &mut app.palette {
                palette.navigate(-1);
            }
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            if let Some(palette) = &mut app.palette {
                palette.navigate(1);
            }
        }
        (m, KeyCode::Char('n')) if m.contains(KeyModifiers::CONTROL) => {
            if let Some(palette) = &mut app.palette {
                palette.navigate(1);
            }
        }
        (m, KeyCode::Char('p')) if m.contains(KeyModifiers::CONTROL) => {
            if let Some(palette) = &mut app.palette {
                palette.navigate(-1);
            }
        }
        // Bare character: accelerator, executed without confirmation.
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            let index = app.palette.as_ref().and_then(|p| p.accelerator(c));
            if let Some(index) = index {
                execute_palette_entry(app, index);
            }
        }
        _ => {}
    }
}

fn execute_palette_entry(app: &mut App, index: usize) {
    let Some(mut palette) = app.palette.take() else {
        return;
    };
    match palette.entries.get(index).cloned() {
        Some(entry) => match entry.kind {
            EntryKind::Nav(mode) => {
                palette.push(mode, app);
                app.palette = Some(palette);
            }
            EntryKind::Exec(command) => {
                // Collapse to Closed before running, even from a nested
                // mode, so the command never observes a stale palette.
                app.request_focus(palette.origin.clone());
                drop(palette);
                actions::dispatch(app, command);
            }
        },
        None => app.palette = Some(palette),
    }
}

// ---------------------------------------------------------------------------
// Pickers
// ---------------------------------------------------------------------------

fn handle_picker(app: &mut App, key: KeyEvent) {
    let Some((kind, phase)) = app.picker.as_ref().map(|p| (p.kind, p.phase)) else {
        return;
    };
    if phase == PickerPhase::Note {
        handle_picker_note(app, key);
        return;
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            if kind == PickerKind::Tags {
                cancel_tags_picker(app);
            } else {
                close_picker(app);
            }
        }
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            if let Some(picker) = &mut app.picker {
                picker.navigate(-1);
            }
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            if let Some(picker) = &mut app.picker {
                picker.navigate(1);
            }
        }
        (m, KeyCode::Char('n')) if m.contains(KeyModifiers::CONTROL) => {
            if let Some(picker) = &mut app.picker {
                picker.navigate(1);
            }
        }
        (m, KeyCode::Char('p')) if m.contains(KeyModifiers::CONTROL) => {
            if let Some(picker) = &mut app.picker {
                picker.navigate(-1);
            }
        }
        (_, KeyCode::Char(' ')) if kind == PickerKind::Tags => {
            toggle_tag(app);
        }
        (_, KeyCode::Enter) => {
            if kind == PickerKind::Tags {
                // Done: anything still debounced goes out right now.
                app.flush_tag_save();
                close_picker(app);
            } else {
                commit_single_select(app);
            }
        }
        _ => {}
    }
}

fn toggle_tag(app: &mut App) {
    let debounce = app.tuning.tag_save_debounce();
    let Some(picker) = &mut app.picker else {
        return;
    };
    let selection = picker.toggle_active_tag(Instant::now(), debounce);
    let intent = Intent::SetTags {
        id: picker.item_id.clone(),
        tags: selection,
    };
    // Re-render immediately; the save itself stays debounced.
    apply_intent(&mut app.outline, &intent);
}

fn commit_single_select(app: &mut App) {
    let Some(picker) = app.picker.as_ref() else {
        return;
    };
    let Some(option) = picker.active_option().cloned() else {
        return;
    };
    let item_id = picker.item_id.clone();
    match picker.kind {
        PickerKind::Status => {
            if option.requires_note {
                if let Some(picker) = &mut app.picker {
                    picker.phase = PickerPhase::Note;
                    picker.pending_status = Some(option.id);
                }
                return;
            }
            close_picker(app);
            app.apply_now(Intent::Toggle {
                id: item_id,
                to: option.id,
                note: None,
            });
        }
        PickerKind::Assignee => {
            close_picker(app);
            let actor = (!option.id.is_empty()).then_some(option.id);
            app.apply_now(Intent::Assign { id: item_id, actor });
        }
        PickerKind::Destination => {
            close_picker(app);
            app.apply_now(Intent::Refile {
                id: item_id,
                destination: option.id,
            });
        }
        PickerKind::Tags => {}
    }
}

/// Cancel restores the pre-open tag set exactly and, when anything drifted
/// or a debounced save already went out, issues one corrective mutation.
fn cancel_tags_picker(app: &mut App) {
    let Some(picker) = &mut app.picker else {
        return;
    };
    picker.save_deadline = None;
    let dirty = picker.tags_dirty();
    let item_id = picker.item_id.clone();
    let initial = picker.initial_vec();
    close_picker(app);
    if dirty {
        app.apply_now(Intent::SetTags {
            id: item_id,
            tags: initial,
        });
    }
}

fn handle_picker_note(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Back to list navigation, not to Closed.
        (_, KeyCode::Esc) => {
            if let Some(picker) = &mut app.picker {
                picker.phase = PickerPhase::List;
                picker.pending_status = None;
                picker.note_buffer.clear();
                picker.note_cursor = 0;
            }
        }
        (_, KeyCode::Enter) => {
            let Some((note, status, item_id)) = app.picker.as_ref().map(|p| {
                (
                    p.note_buffer.trim().to_string(),
                    p.pending_status.clone(),
                    p.item_id.clone(),
                )
            }) else {
                return;
            };
            if note.is_empty() {
                app.flash_error("this status requires a note");
                return;
            }
            let Some(status) = status else {
                return;
            };
            close_picker(app);
            app.apply_now(Intent::Toggle {
                id: item_id,
                to: status,
                note: Some(note),
            });
        }
        (_, KeyCode::Backspace) => {
            if let Some(picker) = &mut app.picker {
                edit_backspace(&mut picker.note_buffer, &mut picker.note_cursor);
            }
        }
        (_, KeyCode::Left) => {
            if let Some(picker) = &mut app.picker {
                edit_left(&picker.note_buffer.clone(), &mut picker.note_cursor);
            }
        }
        (_, KeyCode::Right) => {
            if let Some(picker) = &mut app.picker {
                edit_right(&picker.note_buffer.clone(), &mut picker.note_cursor);
            }
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            if let Some(picker) = &mut app.picker {
                edit_insert(&mut picker.note_buffer, &mut picker.note_cursor, c);
            }
        }
        _ => {}
    }
}

fn close_picker(app: &mut App) {
    if let Some(picker) = app.picker.take() {
        app.request_focus(picker.origin);
    }
}

// ---------------------------------------------------------------------------
// Free-text prompt (capture, dates, outline rename)
// ---------------------------------------------------------------------------

fn handle_prompt(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            if let Some(prompt) = app.prompt.take() {
                app.request_focus(prompt.origin);
            }
        }
        (_, KeyCode::Enter) => confirm_prompt(app),
        (_, KeyCode::Backspace) => {
            if let Some(prompt) = &mut app.prompt {
                edit_backspace(&mut prompt.buffer, &mut prompt.cursor);
            }
        }
        (_, KeyCode::Left) => {
            if let Some(prompt) = &mut app.prompt {
                edit_left(&prompt.buffer.clone(), &mut prompt.cursor);
            }
        }
        (_, KeyCode::Right) => {
            if let Some(prompt) = &mut app.prompt {
                edit_right(&prompt.buffer.clone(), &mut prompt.cursor);
            }
        }
        (_, KeyCode::Home) => {
            if let Some(prompt) = &mut app.prompt {
                prompt.cursor = 0;
            }
        }
        (_, KeyCode::End) => {
            if let Some(prompt) = &mut app.prompt {
                prompt.cursor = prompt.buffer.len();
            }
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            if let Some(prompt) = &mut app.prompt {
                edit_insert(&mut prompt.buffer, &mut prompt.cursor, c);
            }
        }
        _ => {}
    }
}

fn confirm_prompt(app: &mut App) {
    let Some(prompt) = app.prompt.as_ref() else {
        return;
    };
    let text = prompt.buffer.trim().to_string();
    match prompt.purpose.clone() {
        PromptPurpose::Capture { bottom } => {
            if text.is_empty() {
                app.flash_error("a title is required");
                return;
            }
            let temp_id = app.fresh_temp_id();
            let index = if bottom { app.outline.items.len() } else { 0 };
            let status = app
                .vocab
                .status_options
                .first()
                .map(|s| s.id.clone())
                .unwrap_or_default();
            app.prompt = None;
            app.apply_now(Intent::Create {
                id: temp_id.clone(),
                parent: None,
                index,
                title: text,
                status,
            });
            app.view = crate::tui::app::View::Tree;
            app.request_focus(Some(temp_id));
        }
        PromptPurpose::RenameOutline => {
            if text.is_empty() {
                app.flash_error("a title is required");
                return;
            }
            let origin = app.prompt.take().and_then(|p| p.origin);
            app.request_focus(origin);
            let outline_id = app.outline.id.clone();
            app.apply_now(Intent::Rename {
                id: outline_id,
                title: text,
            });
        }
        PromptPurpose::EditDate { id, field } => match actions::parse_date_input(&text) {
            Ok(at) => {
                let origin = app.prompt.take().and_then(|p| p.origin);
                app.request_focus(origin);
                app.apply_now(Intent::Schedule { id, field, at });
            }
            Err(message) => app.flash_error(message),
        },
    }
}

// ---------------------------------------------------------------------------
// Outline statuses editor
// ---------------------------------------------------------------------------

fn handle_statuses_editor(app: &mut App, key: KeyEvent) {
    let renaming = app
        .statuses_editor
        .as_ref()
        .is_some_and(|e| e.renaming.is_some());
    if renaming {
        handle_statuses_rename(app, key);
        return;
    }
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            // Discard the working copy.
            if let Some(editor) = app.statuses_editor.take() {
                app.request_focus(editor.origin);
            }
        }
        (_, KeyCode::Enter) => {
            let Some(editor) = app.statuses_editor.take() else {
                return;
            };
            app.request_focus(editor.origin.clone());
            if editor.options != editor.original {
                app.apply_now(Intent::SetStatuses {
                    options: editor.options,
                });
            }
        }
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            if let Some(editor) = &mut app.statuses_editor {
                editor.active = editor.active.saturating_sub(1);
            }
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if !editor.options.is_empty() {
                    editor.active = (editor.active + 1).min(editor.options.len() - 1);
                }
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if let Some(option) = editor.options.get(editor.active) {
                    let label = option.label.clone();
                    let cursor = label.len();
                    editor.renaming = Some((label, cursor));
                }
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if let Some(option) = editor.options.get_mut(editor.active) {
                    option.is_end_state = !option.is_end_state;
                }
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if let Some(option) = editor.options.get_mut(editor.active) {
                    option.requires_note = !option.requires_note;
                }
            }
        }
        (KeyModifiers::SHIFT, KeyCode::Char('K')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if editor.active > 0 {
                    editor.options.swap(editor.active, editor.active - 1);
                    editor.active -= 1;
                }
            }
        }
        (KeyModifiers::SHIFT, KeyCode::Char('J')) => {
            if let Some(editor) = &mut app.statuses_editor {
                if editor.active + 1 < editor.options.len() {
                    editor.options.swap(editor.active, editor.active + 1);
                    editor.active += 1;
                }
            }
        }
        _ => {}
    }
}

fn handle_statuses_rename(app: &mut App, key: KeyEvent) {
    if let (_, KeyCode::Enter) = (key.modifiers, key.code) {
        let label = app
            .statuses_editor
            .as_ref()
            .and_then(|e| e.renaming.as_ref())
            .map(|(buffer, _)| buffer.trim().to_string());
        let Some(label) = label else {
            return;
        };
        if label.is_empty() {
            app.flash_error("a label is required");
            return;
        }
        if let Some(editor) = &mut app.statuses_editor {
            let active = editor.active;
            if let Some(option) = editor.options.get_mut(active) {
                option.label = label;
            }
            editor.renaming = None;
        }
        return;
    }

    let Some(editor) = &mut app.statuses_editor else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            editor.renaming = None;
        }
        (_, KeyCode::Backspace) => {
            if let Some((buffer, cursor)) = &mut editor.renaming {
                edit_backspace(buffer, cursor);
            }
        }
        (_, KeyCode::Left) => {
            if let Some((buffer, cursor)) = &mut editor.renaming {
                edit_left(&buffer.clone(), cursor);
            }
        }
        (_, KeyCode::Right) => {
            if let Some((buffer, cursor)) = &mut editor.renaming {
                edit_right(&buffer.clone(), cursor);
            }
        }
        (m, KeyCode::Char(c))
            if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
        {
            if let Some((buffer, cursor)) = &mut editor.renaming {
                edit_insert(buffer, cursor, c);
            }
        }
        _ => {}
    }
}
