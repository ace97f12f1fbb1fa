use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Boolean flags an item can carry, addressable on the wire by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFlag {
    Priority,
    Hold,
}

/// Which of the two item date slots an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    Due,
    Scheduled,
}

/// A single node of the outline tree, as projected on the client.
///
/// This is view-state: the server owns the document. Items enter the
/// projection via the initial page load, an optimistic insert under a
/// temporary id, or a server echo; they leave on archive or a full reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    /// Status id from the owning outline's vocabulary.
    pub status: String,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub on_hold: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due: Option<NaiveDateTime>,
    #[serde(default)]
    pub scheduled: Option<NaiveDateTime>,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Server-granted permission to mutate this item.
    #[serde(default = "default_can_edit")]
    pub can_edit: bool,
    #[serde(default)]
    pub children: Vec<Item>,
}

fn default_can_edit() -> bool {
    true
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            title: title.into(),
            status: status.into(),
            priority: false,
            on_hold: false,
            tags: Vec::new(),
            due: None,
            scheduled: None,
            assignee: None,
            can_edit: true,
            children: Vec::new(),
        }
    }

    pub fn flag(&self, flag: ItemFlag) -> bool {
        match flag {
            ItemFlag::Priority => self.priority,
            ItemFlag::Hold => self.on_hold,
        }
    }

    pub fn set_flag(&mut self, flag: ItemFlag, on: bool) {
        match flag {
            ItemFlag::Priority => self.priority = on,
            ItemFlag::Hold => self.on_hold = on,
        }
    }

    pub fn date(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Due => self.due,
            DateField::Scheduled => self.scheduled,
        }
    }

    pub fn set_date(&mut self, field: DateField, at: Option<NaiveDateTime>) {
        match field {
            DateField::Due => self.due = at,
            DateField::Scheduled => self.scheduled = at,
        }
    }
}

/// The client's copy of one outline resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Stable resource id, e.g. `out-1`.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Outline {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Outline {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }
}
