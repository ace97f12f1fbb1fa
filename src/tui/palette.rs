use crate::ops::agenda::AgendaSpan;

use super::app::{App, View};

/// Named modes of the action palette. Each mode's option list is a pure
/// function of (mode, current context); no mode keeps state of its own
/// across recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    Context,
    Nav,
    Agenda,
    Capture,
    Sync,
    Outline,
}

impl PaletteMode {
    pub fn title(self) -> &'static str {
        match self {
            PaletteMode::Context => "actions",
            PaletteMode::Nav => "go to",
            PaletteMode::Agenda => "agenda",
            PaletteMode::Capture => "capture",
            PaletteMode::Sync => "sync",
            PaletteMode::Outline => "outline",
        }
    }
}

/// What an exec entry does once the palette has collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCommand {
    CycleStatus,
    OpenStatusPicker,
    OpenTagsPicker,
    OpenAssigneePicker,
    OpenDestinationPicker,
    RenameItem,
    NewSibling,
    NewChild,
    EditDueDate,
    EditScheduledDate,
    TogglePriority,
    ToggleHold,
    Archive,
    CopyReference,
    ShowTree,
    ShowAgenda,
    ShowDetail,
    SetAgendaSpan(AgendaSpan),
    CaptureTop,
    CaptureBottom,
    SyncNow,
    FlushMoves,
    EditStatuses,
    RenameOutline,
    ArchiveCompleted,
    CollapseAll,
    ExpandAll,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Run a command; the palette collapses to Closed first.
    Exec(PaletteCommand),
    /// Push a deeper mode onto the stack.
    Nav(PaletteMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Accelerator: a bare keystroke that executes the entry immediately.
    pub key: &'static str,
    pub label: String,
    pub kind: EntryKind,
}

fn exec(key: &'static str, label: &str, command: PaletteCommand) -> PaletteEntry {
    PaletteEntry {
        key,
        label: label.to_string(),
        kind: EntryKind::Exec(command),
    }
}

fn nav(key: &'static str, label: &str, mode: PaletteMode) -> PaletteEntry {
    PaletteEntry {
        key,
        label: label.to_string(),
        kind: EntryKind::Nav(mode),
    }
}

/// Build a mode's option list from the current app context.
pub fn entries_for(mode: PaletteMode, app: &App) -> Vec<PaletteEntry> {
    match mode {
        PaletteMode::Context => {
            let mut entries = Vec::new();
            if app.acting_item().is_some() {
                entries.push(exec("x", "Cycle status", PaletteCommand::CycleStatus));
                entries.push(exec("s", "Set status…", PaletteCommand::OpenStatusPicker));
                entries.push(exec("t", "Edit tags…", PaletteCommand::OpenTagsPicker));
                entries.push(exec("a", "Assign…", PaletteCommand::OpenAssigneePicker));
                entries.push(exec("m", "Move to…", PaletteCommand::OpenDestinationPicker));
                entries.push(exec("r", "Rename", PaletteCommand::RenameItem));
                if app.view == View::Tree {
                    entries.push(exec("n", "New sibling", PaletteCommand::NewSibling));
                    entries.push(exec("i", "New child", PaletteCommand::NewChild));
                }
                entries.push(exec("d", "Due date…", PaletteCommand::EditDueDate));
                entries.push(exec("f", "Schedule…", PaletteCommand::EditScheduledDate));
                entries.push(exec("p", "Toggle priority", PaletteCommand::TogglePriority));
                entries.push(exec("z", "Toggle on hold", PaletteCommand::ToggleHold));
                entries.push(exec("v", "Archive", PaletteCommand::Archive));
                entries.push(exec("y", "Copy reference", PaletteCommand::CopyReference));
            }
            entries.push(nav("g", "Go to…", PaletteMode::Nav));
            entries.push(nav("w", "Agenda…", PaletteMode::Agenda));
            entries.push(nav("c", "Capture…", PaletteMode::Capture));
            entries.push(nav("u", "Sync…", PaletteMode::Sync));
            entries.push(nav("o", "Outline…", PaletteMode::Outline));
            entries
        }
        PaletteMode::Nav => {
            let mut entries = vec![
                exec("t", "Outline tree", PaletteCommand::ShowTree),
                exec("a", "Agenda", PaletteCommand::ShowAgenda),
            ];
            if app.acting_item().is_some() {
                entries.push(exec("d", "Item detail", PaletteCommand::ShowDetail));
            }
            entries
        }
        PaletteMode::Agenda => vec![
            exec(
                "t",
                "Today",
                PaletteCommand::SetAgendaSpan(AgendaSpan::Today),
            ),
            exec(
                "w",
                "This week",
                PaletteCommand::SetAgendaSpan(AgendaSpan::Week),
            ),
            exec(
                "l",
                "Everything",
                PaletteCommand::SetAgendaSpan(AgendaSpan::All),
            ),
            exec("o", "Open agenda", PaletteCommand::ShowAgenda),
        ],
        PaletteMode::Capture => vec![
            exec("t", "Capture to top", PaletteCommand::CaptureTop),
            exec("b", "Capture to bottom", PaletteCommand::CaptureBottom),
        ],
        PaletteMode::Sync => vec![
            exec("s", "Sync now", PaletteCommand::SyncNow),
            exec("f", "Flush pending moves", PaletteCommand::FlushMoves),
        ],
        PaletteMode::Outline => vec![
            exec("s", "Edit statuses…", PaletteCommand::EditStatuses),
            exec("r", "Rename outline…", PaletteCommand::RenameOutline),
            exec("a", "Archive completed", PaletteCommand::ArchiveCompleted),
            exec("c", "Collapse all", PaletteCommand::CollapseAll),
            exec("e", "Expand all", PaletteCommand::ExpandAll),
            exec("t", "Toggle theme", PaletteCommand::ToggleTheme),
        ],
    }
}

/// The action palette: a stack of modes, top visible. Non-empty while
/// open; closing is represented by the App dropping the whole state.
#[derive(Debug)]
pub struct PaletteState {
    stack: Vec<PaletteMode>,
    pub entries: Vec<PaletteEntry>,
    pub active: usize,
    /// Item focused when the palette opened; focus returns there on close.
    pub origin: Option<String>,
}

impl PaletteState {
    pub fn open(app: &App) -> PaletteState {
        PaletteState {
            stack: vec![PaletteMode::Context],
            entries: entries_for(PaletteMode::Context, app),
            active: 0,
            origin: app.acting_item_id(),
        }
    }

    pub fn top(&self) -> PaletteMode {
        self.stack.last().copied().unwrap_or(PaletteMode::Context)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push a mode; pushing the current top again is a no-op.
    pub fn push(&mut self, mode: PaletteMode, app: &App) {
        if self.top() == mode {
            return;
        }
        self.stack.push(mode);
        self.entries = entries_for(mode, app);
        self.active = 0;
    }

    /// Drop the top mode and recompute options for the one underneath.
    /// Returns false at depth 1: the caller closes the palette instead.
    pub fn pop(&mut self, app: &App) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        self.entries = entries_for(self.top(), app);
        self.active = 0;
        true
    }

    pub fn navigate(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.active = 0;
            return;
        }
        let max = self.entries.len() - 1;
        self.active = (self.active as isize + delta).clamp(0, max as isize) as usize;
    }

    /// First entry whose accelerator matches the bare keystroke, if any.
    /// Plain lowercase letters match case-insensitively; explicitly-cased
    /// or non-letter keys match exactly; multi-character keys never match
    /// a single keystroke.
    pub fn accelerator(&self, c: char) -> Option<usize> {
        self.entries.iter().position(|e| key_matches(e.key, c))
    }

    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|m| m.title())
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

fn key_matches(key: &str, c: char) -> bool {
    let mut chars = key.chars();
    let (Some(k), None) = (chars.next(), chars.next()) else {
        return false;
    };
    if k.is_ascii_lowercase() {
        k.eq_ignore_ascii_case(&c)
    } else {
        k == c
    }
}
