use std::time::{Duration, Instant};

use indexmap::IndexSet;

use crate::model::{Item, VocabSnapshot};

/// Which vocabulary a picker selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Status,
    Tags,
    Assignee,
    Destination,
}

impl PickerKind {
    pub fn title(self) -> &'static str {
        match self {
            PickerKind::Status => "Status",
            PickerKind::Tags => "Tags",
            PickerKind::Assignee => "Assign to",
            PickerKind::Destination => "Move to",
        }
    }
}

/// List navigation, or the note-entry interlude for statuses that require
/// a justification before they commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    List,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub id: String,
    pub label: String,
    pub is_end_state: bool,
    pub requires_note: bool,
}

/// One open picker. The same machine backs all four instantiations; the
/// tags picker is the only multi-select and the only one with a debounced
/// save, the status picker the only one with a note phase.
#[derive(Debug)]
pub struct PickerState {
    pub kind: PickerKind,
    pub resource_id: String,
    pub item_id: String,
    /// Item focused when the picker opened; focus returns there on close.
    pub origin: Option<String>,
    pub options: Vec<PickerOption>,
    pub active: usize,
    pub phase: PickerPhase,

    // Multi-select (tags)
    pub selection: IndexSet<String>,
    /// Pre-open selection, restored exactly on cancel.
    pub initial: IndexSet<String>,
    pub save_deadline: Option<Instant>,
    /// A debounced save already went out; cancel must correct it.
    pub save_dispatched: bool,

    // Note entry (status)
    pub pending_status: Option<String>,
    pub note_buffer: String,
    pub note_cursor: usize,
}

impl PickerState {
    fn new(
        kind: PickerKind,
        resource_id: &str,
        item_id: &str,
        options: Vec<PickerOption>,
        active: usize,
    ) -> PickerState {
        PickerState {
            kind,
            resource_id: resource_id.to_string(),
            item_id: item_id.to_string(),
            origin: Some(item_id.to_string()),
            options,
            active,
            phase: PickerPhase::List,
            selection: IndexSet::new(),
            initial: IndexSet::new(),
            save_deadline: None,
            save_dispatched: false,
            pending_status: None,
            note_buffer: String::new(),
            note_cursor: 0,
        }
    }

    pub fn status(resource_id: &str, item: &Item, vocab: &VocabSnapshot) -> PickerState {
        let options: Vec<PickerOption> = vocab
            .status_options
            .iter()
            .map(|s| PickerOption {
                id: s.id.clone(),
                label: s.label.clone(),
                is_end_state: s.is_end_state,
                requires_note: s.requires_note,
            })
            .collect();
        let active = options
            .iter()
            .position(|o| o.id == item.status)
            .unwrap_or(0);
        PickerState::new(PickerKind::Status, resource_id, &item.id, options, active)
    }

    pub fn tags(resource_id: &str, item: &Item, vocab: &VocabSnapshot) -> PickerState {
        // Vocabulary order first, then any tags the item carries that the
        // vocabulary no longer lists (still toggleable, never invisible).
        let mut ids: IndexSet<String> = vocab.tag_options.iter().cloned().collect();
        for tag in &item.tags {
            ids.insert(tag.clone());
        }
        let options = ids
            .into_iter()
            .map(|id| PickerOption {
                label: id.clone(),
                id,
                is_end_state: false,
                requires_note: false,
            })
            .collect();
        let mut picker = PickerState::new(PickerKind::Tags, resource_id, &item.id, options, 0);
        picker.selection = item.tags.iter().cloned().collect();
        picker.initial = picker.selection.clone();
        picker
    }

    pub fn assignee(resource_id: &str, item: &Item, vocab: &VocabSnapshot) -> PickerState {
        let mut options = vec![PickerOption {
            id: String::new(),
            label: "(nobody)".to_string(),
            is_end_state: false,
            requires_note: false,
        }];
        options.extend(vocab.actor_options.iter().map(|a| PickerOption {
            id: a.id.clone(),
            label: a.label.clone(),
            is_end_state: false,
            requires_note: false,
        }));
        let active = match &item.assignee {
            Some(actor) => options.iter().position(|o| &o.id == actor).unwrap_or(0),
            None => 0,
        };
        PickerState::new(PickerKind::Assignee, resource_id, &item.id, options, active)
    }

    pub fn destination(resource_id: &str, item: &Item, vocab: &VocabSnapshot) -> PickerState {
        let options = vocab
            .destination_options
            .iter()
            .map(|d| PickerOption {
                id: d.id.clone(),
                label: d.label.clone(),
                is_end_state: false,
                requires_note: false,
            })
            .collect();
        PickerState::new(PickerKind::Destination, resource_id, &item.id, options, 0)
    }

    pub fn navigate(&mut self, delta: isize) {
        if self.options.is_empty() {
            self.active = 0;
            return;
        }
        let max = self.options.len() - 1;
        self.active = (self.active as isize + delta).clamp(0, max as isize) as usize;
    }

    pub fn active_option(&self) -> Option<&PickerOption> {
        self.options.get(self.active)
    }

    /// Toggle the active tag in or out of the selection and re-arm the
    /// debounced save. Returns the selection after the toggle.
    pub fn toggle_active_tag(&mut self, now: Instant, debounce: Duration) -> Vec<String> {
        if let Some(option) = self.options.get(self.active) {
            let id = option.id.clone();
            if !self.selection.shift_remove(&id) {
                self.selection.insert(id);
            }
            self.save_deadline = Some(now + debounce);
        }
        self.selection_vec()
    }

    pub fn selection_vec(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }

    pub fn initial_vec(&self) -> Vec<String> {
        self.initial.iter().cloned().collect()
    }

    /// Whether cancel has anything to correct: the selection drifted from
    /// the pre-open set, or a debounced save already reached the server.
    pub fn tags_dirty(&self) -> bool {
        self.save_dispatched || self.selection != self.initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::testing::{sample_vocab, test_app};
    use crate::ops::outline_ops::find_item;

    #[test]
    fn status_picker_starts_on_the_current_value() {
        let (mut app, _) = test_app();
        if let Some(item) = crate::ops::outline_ops::find_item_mut(&mut app.outline, "a") {
            item.status = "done".into();
        }
        let item = find_item(&app.outline, "a").unwrap();
        let picker = PickerState::status("out-1", item, &sample_vocab());
        assert_eq!(picker.active, 1);
        assert_eq!(picker.active_option().unwrap().id, "done");
    }

    #[test]
    fn status_picker_falls_back_to_first_option() {
        let (mut app, _) = test_app();
        if let Some(item) = crate::ops::outline_ops::find_item_mut(&mut app.outline, "a") {
            item.status = "unknown".into();
        }
        let item = find_item(&app.outline, "a").unwrap();
        let picker = PickerState::status("out-1", item, &sample_vocab());
        assert_eq!(picker.active, 0);
    }

    #[test]
    fn navigate_clamps_into_bounds() {
        let (app, _) = test_app();
        let item = find_item(&app.outline, "a").unwrap();
        let mut picker = PickerState::status("out-1", item, &sample_vocab());
        picker.navigate(-5);
        assert_eq!(picker.active, 0);
        picker.navigate(100);
        assert_eq!(picker.active, picker.options.len() - 1);
    }

    #[test]
    fn tags_options_include_off_vocabulary_tags() {
        let (mut app, _) = test_app();
        if let Some(item) = crate::ops::outline_ops::find_item_mut(&mut app.outline, "a") {
            item.tags = vec!["legacy".into(), "deep".into()];
        }
        let item = find_item(&app.outline, "a").unwrap();
        let picker = PickerState::tags("out-1", item, &sample_vocab());
        let ids: Vec<&str> = picker.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["deep", "quick", "waiting", "legacy"]);
        assert!(picker.selection.contains("legacy"));
    }

    #[test]
    fn toggle_arms_the_debounced_save() {
        let (app, _) = test_app();
        let item = find_item(&app.outline, "a").unwrap();
        let mut picker = PickerState::tags("out-1", item, &sample_vocab());
        let now = Instant::now();

        assert!(!picker.tags_dirty());
        let selection = picker.toggle_active_tag(now, Duration::from_millis(600));
        assert_eq!(selection, vec!["deep".to_string()]);
        assert_eq!(picker.save_deadline, Some(now + Duration::from_millis(600)));
        assert!(picker.tags_dirty());

        // Toggling back off leaves nothing to correct (no save went out).
        picker.toggle_active_tag(now, Duration::from_millis(600));
        assert!(!picker.tags_dirty());
    }

    #[test]
    fn assignee_picker_marks_current_actor() {
        let (mut app, _) = test_app();
        if let Some(item) = crate::ops::outline_ops::find_item_mut(&mut app.outline, "a") {
            item.assignee = Some("u2".into());
        }
        let item = find_item(&app.outline, "a").unwrap();
        let picker = PickerState::assignee("out-1", item, &sample_vocab());
        assert_eq!(picker.active_option().unwrap().label, "Grace");
    }
}
