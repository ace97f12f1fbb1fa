use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use regex::Regex;

use crate::io::state::{OutlineDeviceState, read_device_state, write_device_state};
use crate::model::{
    ClientConfig, DateField, Intent, Item, MoveDescriptor, Outline, StatusOption, TuningConfig,
    VocabSnapshot,
};
use crate::ops::agenda::{AgendaEntry, AgendaSpan, agenda_entries};
use crate::ops::outline_ops::{adopt_id, apply_intent, apply_move, find_item};
use crate::remote::{OutlinePage, Transport};
use crate::sync::{Coordinator, OptionsCache, Outcome};

use super::palette::PaletteState;
use super::picker::PickerState;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The outline tree
    Tree,
    /// Date-ordered agenda of due/scheduled items
    Agenda,
    /// One item's fields
    Detail { item_id: String },
}

/// Ephemeral per-session state; dropped when the process exits.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub last_focused: Option<String>,
    /// Case-insensitive title filter (regex, escaped on parse failure).
    pub filter: String,
    pub agenda_span: Option<AgendaSpan>,
    /// Last reference produced by copy-reference.
    pub copied_ref: Option<String>,
}

/// Transient status-line feedback, auto-cleared after a short delay.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub expires: Instant,
}

/// What an inline title edit commits to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// Insert a new item at this placement on confirm.
    NewItem { parent: Option<String>, index: usize },
    /// Rename an existing item.
    Rename { id: String },
}

/// Inline single-line title editor (not a blocking modal: it lives in the
/// row, but while active every single-key shortcut is suppressed).
#[derive(Debug, Clone)]
pub struct EditState {
    pub target: EditTarget,
    pub buffer: String,
    pub cursor: usize,
}

/// What a free-text prompt commits to.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPurpose {
    /// Create a new top-level item (capture dialog).
    Capture { bottom: bool },
    RenameOutline,
    EditDate { id: String, field: DateField },
}

/// Blocking free-text prompt.
#[derive(Debug, Clone)]
pub struct PromptState {
    pub purpose: PromptPurpose,
    pub buffer: String,
    pub cursor: usize,
    pub origin: Option<String>,
}

impl PromptState {
    pub fn title(&self) -> &'static str {
        match self.purpose {
            PromptPurpose::Capture { bottom: false } => "Capture to top",
            PromptPurpose::Capture { bottom: true } => "Capture to bottom",
            PromptPurpose::RenameOutline => "Rename outline",
            PromptPurpose::EditDate {
                field: DateField::Due,
                ..
            } => "Due (YYYY-MM-DD [HH:MM], empty clears)",
            PromptPurpose::EditDate {
                field: DateField::Scheduled,
                ..
            } => "Scheduled (YYYY-MM-DD [HH:MM], empty clears)",
        }
    }
}

/// Blocking editor over the outline's status vocabulary. Commits as one
/// `outline:set-statuses` mutation; cancel discards the working copy.
#[derive(Debug, Clone)]
pub struct StatusesEditorState {
    pub options: Vec<StatusOption>,
    pub original: Vec<StatusOption>,
    pub active: usize,
    /// Inline rename of the active entry (buffer, cursor).
    pub renaming: Option<(String, usize)>,
    pub origin: Option<String>,
}

/// A visible row of the tree view.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub id: String,
    pub depth: usize,
    pub has_children: bool,
    pub is_collapsed: bool,
}

/// Main application state. All mutation flows through here on the UI
/// thread; the coordinator's worker threads only ever touch the transport.
pub struct App {
    // Document state
    /// Optimistic projection, what the views render.
    pub outline: Outline,
    /// Last server-acknowledged projection; failures rebuild from this.
    pub confirmed: Outline,
    pub vocab: VocabSnapshot,
    /// Last server-acknowledged status vocabulary. `vocab.status_options`
    /// is edited optimistically, so failures restore from here the same
    /// way the tree restores from `confirmed`.
    pub confirmed_vocab: Vec<StatusOption>,

    // Server plumbing
    pub coordinator: Coordinator,
    pub options: OptionsCache,
    pub transport: Arc<dyn Transport>,

    // Blocking modals: at most one is Some at any time (caller contract).
    pub palette: Option<PaletteState>,
    pub picker: Option<PickerState>,
    pub prompt: Option<PromptState>,
    pub statuses_editor: Option<StatusesEditorState>,

    // Text-entry surfaces (suppress shortcuts but are not blocking modals)
    pub edit: Option<EditState>,
    pub filter_entry: bool,

    // View state
    pub view: View,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub collapsed: HashSet<String>,
    pub session: SessionState,
    /// Item to refocus once the view has settled (resolved by stable id on
    /// the next tick, tolerating rows replaced by a re-render meanwhile).
    pub pending_focus: Option<String>,

    pub status_message: Option<StatusMessage>,
    pub theme: Theme,
    /// "dark" or "light"; persisted per device.
    pub theme_variant: String,
    pub tuning: TuningConfig,
    pub should_quit: bool,

    /// Where device state persists; None disables persistence (tests).
    pub state_dir: Option<PathBuf>,
    ui_config: crate::model::UiConfig,
    next_temp_id: u64,
}

impl App {
    pub fn new(page: OutlinePage, transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        let coordinator = Coordinator::new(
            Arc::clone(&transport),
            config.tuning.move_coalesce_window(),
        );
        let mut options = OptionsCache::new(Arc::clone(&transport));
        options.seed(&page.outline.id, page.vocab.clone());

        App {
            confirmed: page.outline.clone(),
            outline: page.outline,
            confirmed_vocab: page.vocab.status_options.clone(),
            vocab: page.vocab,
            coordinator,
            options,
            transport,
            palette: None,
            picker: None,
            prompt: None,
            statuses_editor: None,
            edit: None,
            filter_entry: false,
            view: View::Tree,
            cursor: 0,
            scroll_offset: 0,
            collapsed: HashSet::new(),
            session: SessionState::default(),
            pending_focus: None,
            status_message: None,
            theme: Theme::from_config(&config.ui),
            theme_variant: "dark".to_string(),
            tuning: config.tuning.clone(),
            should_quit: false,
            state_dir: None,
            ui_config: config.ui.clone(),
            next_temp_id: 0,
        }
    }

    pub fn set_theme_variant(&mut self, name: &str) {
        self.theme_variant = name.to_string();
        self.theme = Theme::variant(name).with_overrides(&self.ui_config);
    }

    // -----------------------------------------------------------------------
    // Tick: settle requests, fire timers, resolve focus
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, now: Instant) {
        for outcome in self.coordinator.poll(now) {
            self.settle(outcome);
        }

        // Debounced tags save
        let tags_due = self
            .picker
            .as_ref()
            .is_some_and(|p| p.save_deadline.is_some_and(|d| d <= now));
        if tags_due {
            self.flush_tag_save();
        }

        if self
            .status_message
            .as_ref()
            .is_some_and(|m| m.expires <= now)
        {
            self.status_message = None;
        }

        if let Some(id) = self.pending_focus.take() {
            match self.row_index_of(&id) {
                Some(index) => {
                    self.cursor = index;
                    self.session.last_focused = Some(id);
                }
                None => {
                    // The target is gone; keep the cursor in bounds.
                    self.cursor = self.cursor.min(self.visible_len().saturating_sub(1));
                }
            }
        }
    }

    /// Fold one settled request back into client state.
    ///
    /// Success replays the acknowledged ops onto `confirmed` and adopts any
    /// server-assigned ids. Failure rebuilds the optimistic outline as
    /// `confirmed` plus everything still unacknowledged, so one failed
    /// request never erases later edits that are still on their way.
    fn settle(&mut self, outcome: Outcome) {
        if outcome.resource_id != self.outline.id {
            return;
        }
        match outcome.result {
            Ok(ack) => {
                for op in &outcome.ops {
                    apply_intent(&mut self.confirmed, op);
                    if let Intent::SetStatuses { options } = op {
                        self.vocab.status_options = options.clone();
                        self.confirmed_vocab = options.clone();
                    }
                }
                for (temp, assigned) in &ack.assigned {
                    self.adopt_item_id(temp, assigned);
                }
            }
            Err(error) => {
                // The vocabulary is restored alongside the tree: a
                // SetStatuses op is a tree no-op, so the replay below
                // cannot rebuild it.
                self.outline = self.confirmed.clone();
                self.vocab.status_options = self.confirmed_vocab.clone();
                for op in self.coordinator.pending_ops(&outcome.resource_id) {
                    apply_intent(&mut self.outline, &op);
                    if let Intent::SetStatuses { options } = &op {
                        self.vocab.status_options = options.clone();
                    }
                }
                self.cursor = self.cursor.min(self.visible_len().saturating_sub(1));
                self.flash_error(error.to_string());
            }
        }
    }

    /// Swap a temporary id for the server-assigned one everywhere it can be
    /// referenced: both outline copies, collapsed set, session, open modal
    /// targets, and any pending focus request.
    fn adopt_item_id(&mut self, old: &str, new: &str) {
        adopt_id(&mut self.outline, old, new);
        adopt_id(&mut self.confirmed, old, new);
        if self.collapsed.remove(old) {
            self.collapsed.insert(new.to_string());
        }
        let rename = |slot: &mut Option<String>| {
            if slot.as_deref() == Some(old) {
                *slot = Some(new.to_string());
            }
        };
        rename(&mut self.session.last_focused);
        rename(&mut self.pending_focus);
        if let View::Detail { item_id } = &mut self.view {
            if item_id == old {
                *item_id = new.to_string();
            }
        }
        if let Some(picker) = &mut self.picker {
            if picker.item_id == old {
                picker.item_id = new.to_string();
            }
            rename(&mut picker.origin);
        }
        if let Some(edit) = &mut self.edit {
            match &mut edit.target {
                EditTarget::Rename { id } if id == old => *id = new.to_string(),
                EditTarget::NewItem {
                    parent: Some(parent),
                    ..
                } if parent == old => *parent = new.to_string(),
                _ => {}
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutation entry points (optimistic apply + send)
    // -----------------------------------------------------------------------

    /// Apply optimistically and submit through the coordinator. A missing
    /// target drops the action silently: nothing is rendered, nothing sent.
    pub fn apply_now(&mut self, intent: Intent) {
        if !apply_intent(&mut self.outline, &intent) {
            return;
        }
        if let Intent::SetStatuses { options } = &intent {
            self.vocab.status_options = options.clone();
        }
        let resource_id = self.outline.id.clone();
        self.coordinator.apply(&resource_id, intent);
    }

    /// Batch variant of `apply_now`; ops that lost their target are dropped.
    pub fn apply_batch_now(&mut self, ops: Vec<Intent>) {
        let applied: Vec<Intent> = ops
            .into_iter()
            .filter(|op| apply_intent(&mut self.outline, op))
            .collect();
        if applied.is_empty() {
            return;
        }
        let resource_id = self.outline.id.clone();
        self.coordinator.apply_batch(&resource_id, applied);
    }

    /// Optimistically reposition and buffer the move behind the debounce
    /// window. Refused moves (vanished item, bad destination) are dropped.
    pub fn queue_move_now(&mut self, mv: MoveDescriptor, now: Instant) {
        if !apply_move(&mut self.outline, &mv) {
            return;
        }
        let resource_id = self.outline.id.clone();
        self.coordinator.queue_move(&resource_id, mv, now);
    }

    /// Send the tags picker's debounced save immediately.
    pub fn flush_tag_save(&mut self) {
        let Some(picker) = &mut self.picker else {
            return;
        };
        if picker.save_deadline.take().is_none() {
            return;
        }
        picker.save_dispatched = true;
        let intent = Intent::SetTags {
            id: picker.item_id.clone(),
            tags: picker.selection.iter().cloned().collect(),
        };
        let resource_id = picker.resource_id.clone();
        self.coordinator.apply(&resource_id, intent);
    }

    // -----------------------------------------------------------------------
    // Feedback
    // -----------------------------------------------------------------------

    pub fn flash(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            expires: Instant::now() + self.tuning.status_message_ttl(),
        });
    }

    pub fn flash_error(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            expires: Instant::now() + self.tuning.status_message_ttl(),
        });
    }

    // -----------------------------------------------------------------------
    // Modal bookkeeping
    // -----------------------------------------------------------------------

    /// True while any keyboard-claiming modal is up.
    pub fn blocking_modal_open(&self) -> bool {
        self.palette.is_some()
            || self.picker.is_some()
            || self.prompt.is_some()
            || self.statuses_editor.is_some()
    }

    /// Opening a blocking modal over another is a caller error by contract.
    pub fn assert_no_blocking_modal(&self) {
        debug_assert!(
            !self.blocking_modal_open(),
            "a blocking modal is already open"
        );
    }

    /// True while a text-entry surface owns typing.
    pub fn editing_text(&self) -> bool {
        self.edit.is_some() || self.filter_entry
    }

    /// Schedule the cursor to land on `id` once the view has settled.
    pub fn request_focus(&mut self, id: Option<String>) {
        if id.is_some() {
            self.pending_focus = id;
        }
    }

    // -----------------------------------------------------------------------
    // Rows and cursor
    // -----------------------------------------------------------------------

    /// Compiled title filter: case-insensitive, escaped when the raw
    /// pattern does not parse as a regex.
    pub fn filter_re(&self) -> Option<Regex> {
        if self.session.filter.is_empty() {
            return None;
        }
        let pattern = &self.session.filter;
        Regex::new(&format!("(?i){pattern}"))
            .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
            .ok()
    }

    /// Flatten the outline into visible rows, honoring collapsed state.
    /// With a filter active, an item is visible when it or any descendant
    /// matches, and matching subtrees ignore collapse.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let filter = self.filter_re();
        let mut rows = Vec::new();
        flatten(&self.outline.items, 0, &self.collapsed, filter.as_ref(), &mut rows);
        rows
    }

    pub fn agenda_rows(&self) -> Vec<AgendaEntry> {
        let span = self.session.agenda_span.unwrap_or(AgendaSpan::Week);
        agenda_entries(&self.outline, span, chrono::Local::now().date_naive())
    }

    pub fn visible_len(&self) -> usize {
        match &self.view {
            View::Tree => self.tree_rows().len(),
            View::Agenda => self.agenda_rows().len(),
            View::Detail { .. } => 0,
        }
    }

    pub fn row_index_of(&self, id: &str) -> Option<usize> {
        match &self.view {
            View::Tree => self.tree_rows().iter().position(|r| r.id == id),
            View::Agenda => self.agenda_rows().iter().position(|e| e.item_id == id),
            View::Detail { .. } => None,
        }
    }

    /// The item the next action applies to: the detail item in detail view,
    /// the cursor row elsewhere.
    pub fn acting_item_id(&self) -> Option<String> {
        match &self.view {
            View::Tree => self.tree_rows().get(self.cursor).map(|r| r.id.clone()),
            View::Agenda => self
                .agenda_rows()
                .get(self.cursor)
                .map(|e| e.item_id.clone()),
            View::Detail { item_id } => Some(item_id.clone()),
        }
    }

    pub fn acting_item(&self) -> Option<&Item> {
        let id = self.acting_item_id()?;
        find_item(&self.outline, &id)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let max = len - 1;
        self.cursor = (self.cursor as isize)
            .saturating_add(delta)
            .clamp(0, max as isize) as usize;
        self.session.last_focused = self.acting_item_id();
    }

    pub fn fresh_temp_id(&mut self) -> String {
        self.next_temp_id += 1;
        format!("tmp-{}", self.next_temp_id)
    }

    // -----------------------------------------------------------------------
    // Device state persistence
    // -----------------------------------------------------------------------

    pub fn restore_device_state(&mut self) {
        let Some(dir) = &self.state_dir else {
            return;
        };
        let Some(state) = read_device_state(dir) else {
            return;
        };
        if let Some(name) = &state.theme {
            self.set_theme_variant(name);
        }
        if let Some(outline_state) = state.outlines.get(&self.outline.id) {
            self.collapsed = outline_state.collapsed.clone();
        }
    }

    pub fn save_device_state(&self) {
        let Some(dir) = &self.state_dir else {
            return;
        };
        let mut state = read_device_state(dir).unwrap_or_default();
        state.theme = Some(self.theme_variant.clone());
        state.outlines.insert(
            self.outline.id.clone(),
            OutlineDeviceState {
                collapsed: self.collapsed.clone(),
            },
        );
        let _ = write_device_state(dir, &state);
    }
}

fn flatten(
    items: &[Item],
    depth: usize,
    collapsed: &HashSet<String>,
    filter: Option<&Regex>,
    rows: &mut Vec<TreeRow>,
) {
    for item in items {
        let visible = match filter {
            Some(re) => subtree_matches(item, re),
            None => true,
        };
        if !visible {
            continue;
        }
        let has_children = !item.children.is_empty();
        let is_collapsed = filter.is_none() && collapsed.contains(&item.id);
        rows.push(TreeRow {
            id: item.id.clone(),
            depth,
            has_children,
            is_collapsed,
        });
        if has_children && !is_collapsed {
            flatten(&item.children, depth + 1, collapsed, filter, rows);
        }
    }
}

fn subtree_matches(item: &Item, re: &Regex) -> bool {
    re.is_match(&item.title) || item.children.iter().any(|c| subtree_matches(c, re))
}

/// Shared fixtures for the tui test modules.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::model::{Ack, Payload, StatusOption};
    use crate::remote::RemoteError;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every mutation call; answers from a scripted response stack
    /// (popped from the back), defaulting to an empty ack.
    pub(crate) struct ScriptedTransport {
        pub calls: Mutex<Vec<(String, Payload)>>,
        pub responses: Mutex<Vec<Result<Ack, RemoteError>>>,
        pub vocab: Mutex<Option<VocabSnapshot>>,
    }

    impl ScriptedTransport {
        pub(crate) fn ok() -> Self {
            ScriptedTransport {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(Vec::new()),
                vocab: Mutex::new(None),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn mutate(&self, resource_id: &str, payload: &Payload) -> Result<Ack, RemoteError> {
            self.calls
                .lock()
                .unwrap()
                .push((resource_id.to_string(), payload.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Ack::default()))
        }

        fn metadata(&self, _: &str) -> Result<VocabSnapshot, RemoteError> {
            match self.vocab.lock().unwrap().clone() {
                Some(vocab) => Ok(vocab),
                None => Err(RemoteError::Network("metadata offline".into())),
            }
        }

        fn load(&self, _: &str) -> Result<OutlinePage, RemoteError> {
            Err(RemoteError::Network("not used".into()))
        }
    }

    pub(crate) fn status(id: &str, end_state: bool, requires_note: bool) -> StatusOption {
        StatusOption {
            id: id.into(),
            label: id.into(),
            is_end_state: end_state,
            requires_note,
        }
    }

    pub(crate) fn sample_vocab() -> VocabSnapshot {
        VocabSnapshot {
            status_options: vec![
                status("todo", false, false),
                status("done", true, false),
                status("wontfix", true, true),
            ],
            tag_options: vec!["deep".into(), "quick".into(), "waiting".into()],
            actor_options: vec![
                crate::model::ActorOption {
                    id: "u1".into(),
                    label: "Ada".into(),
                },
                crate::model::ActorOption {
                    id: "u2".into(),
                    label: "Grace".into(),
                },
            ],
            destination_options: vec![crate::model::DestinationOption {
                id: "out-2".into(),
                label: "Someday".into(),
            }],
            description: None,
        }
    }

    pub(crate) fn sample_page() -> OutlinePage {
        let mut outline = Outline::new("out-1", "Test");
        let mut a = Item::new("a", "Alpha", "todo");
        a.children.push(Item::new("a1", "Alpha one", "todo"));
        outline.items.push(a);
        outline.items.push(Item::new("b", "Beta", "todo"));
        OutlinePage {
            outline,
            vocab: sample_vocab(),
        }
    }

    pub(crate) fn test_app() -> (App, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::ok());
        let app = App::new(
            sample_page(),
            Arc::clone(&transport) as Arc<dyn Transport>,
            &ClientConfig::default(),
        );
        (app, transport)
    }

    /// Tick until every dispatched request has settled.
    pub(crate) fn settle_all(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !app.coordinator.is_idle() {
            assert!(Instant::now() < deadline, "coordinator did not go idle");
            app.tick(Instant::now());
            std::thread::sleep(Duration::from_millis(5));
        }
        app.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{sample_vocab, settle_all, status, test_app};
    use super::*;
    use crate::model::Ack;
    use crate::remote::RemoteError;

    #[test]
    fn tree_rows_respect_collapse() {
        let (mut app, _) = test_app();
        assert_eq!(app.tree_rows().len(), 3);
        app.collapsed.insert("a".into());
        let rows = app.tree_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_collapsed);
    }

    #[test]
    fn filter_keeps_matching_subtrees() {
        let (mut app, _) = test_app();
        app.session.filter = "one".into();
        let rows = app.tree_rows();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        // "Alpha one" matches, so its parent stays visible too.
        assert_eq!(ids, vec!["a", "a1"]);
    }

    #[test]
    fn optimistic_apply_updates_view_then_confirmed_on_ack() {
        let (mut app, _) = test_app();
        app.apply_now(Intent::Rename {
            id: "b".into(),
            title: "Better".into(),
        });
        assert_eq!(find_item(&app.outline, "b").unwrap().title, "Better");
        assert_eq!(find_item(&app.confirmed, "b").unwrap().title, "Beta");

        settle_all(&mut app);
        assert_eq!(find_item(&app.confirmed, "b").unwrap().title, "Better");
    }

    #[test]
    fn failure_reverts_to_confirmed_and_flashes() {
        let (mut app, transport) = test_app();
        transport
            .responses
            .lock()
            .unwrap()
            .push(Err(RemoteError::Rejected("outline is frozen".into())));

        app.apply_now(Intent::Rename {
            id: "b".into(),
            title: "Better".into(),
        });
        settle_all(&mut app);

        assert_eq!(find_item(&app.outline, "b").unwrap().title, "Beta");
        let message = app.status_message.as_ref().unwrap();
        assert!(message.is_error);
        assert!(message.text.contains("outline is frozen"));
    }

    #[test]
    fn failure_keeps_still_pending_edits() {
        let (mut app, transport) = test_app();
        {
            let mut responses = transport.responses.lock().unwrap();
            // Responses pop from the back: first request fails, second succeeds.
            responses.push(Ok(Ack::default()));
            responses.push(Err(RemoteError::Network("offline".into())));
        }

        app.apply_now(Intent::Rename {
            id: "a".into(),
            title: "First".into(),
        });
        app.apply_now(Intent::Rename {
            id: "b".into(),
            title: "Second".into(),
        });
        settle_all(&mut app);

        // The failed rename of "a" rolled back; the acknowledged rename of
        // "b" survived.
        assert_eq!(find_item(&app.outline, "a").unwrap().title, "Alpha");
        assert_eq!(find_item(&app.outline, "b").unwrap().title, "Second");
    }

    #[test]
    fn ack_adopts_temporary_ids_everywhere() {
        let (mut app, transport) = test_app();
        let mut ack = Ack::default();
        ack.assigned.insert("tmp-1".into(), "item-42".into());
        transport.responses.lock().unwrap().push(Ok(ack));

        app.apply_now(Intent::Create {
            id: "tmp-1".into(),
            parent: None,
            index: 0,
            title: "New".into(),
            status: "todo".into(),
        });
        app.pending_focus = Some("tmp-1".into());
        settle_all(&mut app);

        assert!(find_item(&app.outline, "item-42").is_some());
        assert!(find_item(&app.outline, "tmp-1").is_none());
        assert!(find_item(&app.confirmed, "item-42").is_some());
        assert_eq!(app.session.last_focused.as_deref(), Some("item-42"));
    }

    #[test]
    fn rejected_status_vocabulary_edit_rolls_back() {
        let (mut app, transport) = test_app();
        transport
            .responses
            .lock()
            .unwrap()
            .push(Err(RemoteError::Rejected("statuses are managed".into())));

        let edited = vec![status("weird", false, false)];
        app.apply_now(Intent::SetStatuses {
            options: edited.clone(),
        });
        // Optimistic: the edited vocabulary renders immediately.
        assert_eq!(app.vocab.status_options, edited);

        settle_all(&mut app);

        // Rejected: the confirmed vocabulary is back, not the edited one.
        assert_eq!(app.vocab.status_options, sample_vocab().status_options);
        assert_eq!(app.confirmed_vocab, sample_vocab().status_options);
        assert!(app.status_message.as_ref().unwrap().is_error);
    }

    #[test]
    fn accepted_status_vocabulary_edit_becomes_the_confirmed_baseline() {
        let (mut app, _) = test_app();
        let edited = vec![status("open", false, false), status("shipped", true, false)];
        app.apply_now(Intent::SetStatuses {
            options: edited.clone(),
        });
        settle_all(&mut app);

        assert_eq!(app.vocab.status_options, edited);
        assert_eq!(app.confirmed_vocab, edited);
    }

    #[test]
    fn vanished_target_sends_nothing() {
        let (mut app, transport) = test_app();
        app.apply_now(Intent::Rename {
            id: "ghost".into(),
            title: "x".into(),
        });
        settle_all(&mut app);
        assert!(transport.calls.lock().unwrap().is_empty());
    }
}
