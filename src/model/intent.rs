use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::item::{DateField, ItemFlag};
use super::vocab::StatusOption;

/// The new placement of one item: parent (None = top level) plus index
/// within that parent's children. A move is self-contained, so replaying a
/// redundant sequence of moves still lands every item in its final spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub id: String,
    pub parent: Option<String>,
    pub index: usize,
}

/// A single requested mutation, immutable once constructed.
///
/// Serializes to the wire shape `{"type": "outline:...", "detail": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum Intent {
    /// Status transition. `note` is present only for statuses that require one.
    #[serde(rename = "outline:toggle")]
    Toggle {
        id: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    #[serde(rename = "outline:move")]
    Move(MoveDescriptor),
    /// `id` is client-chosen (`tmp-N`); the ack maps it to a server id.
    /// `status` is the initial status id from the outline's vocabulary.
    #[serde(rename = "outline:create")]
    Create {
        id: String,
        parent: Option<String>,
        index: usize,
        title: String,
        status: String,
    },
    #[serde(rename = "outline:rename")]
    Rename { id: String, title: String },
    #[serde(rename = "outline:set-tags")]
    SetTags { id: String, tags: Vec<String> },
    #[serde(rename = "outline:assign")]
    Assign { id: String, actor: Option<String> },
    #[serde(rename = "outline:flag")]
    Flag { id: String, flag: ItemFlag, on: bool },
    #[serde(rename = "outline:schedule")]
    Schedule {
        id: String,
        field: DateField,
        at: Option<NaiveDateTime>,
    },
    #[serde(rename = "outline:archive")]
    Archive { id: String },
    #[serde(rename = "outline:refile")]
    Refile { id: String, destination: String },
    #[serde(rename = "outline:set-statuses")]
    SetStatuses { options: Vec<StatusOption> },
}

impl Intent {
    /// Structural reorder intents are the only ones the coalescer buffers.
    pub fn is_move(&self) -> bool {
        matches!(self, Intent::Move(_))
    }

    /// The item this intent acts on, when it targets a single item.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Intent::Toggle { id, .. }
            | Intent::Move(MoveDescriptor { id, .. })
            | Intent::Create { id, .. }
            | Intent::Rename { id, .. }
            | Intent::SetTags { id, .. }
            | Intent::Assign { id, .. }
            | Intent::Flag { id, .. }
            | Intent::Schedule { id, .. }
            | Intent::Archive { id }
            | Intent::Refile { id, .. } => Some(id),
            Intent::SetStatuses { .. } => None,
        }
    }
}

/// Body of one mutation request: a bare intent, or `{"ops": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Single(Intent),
    Batch { ops: Vec<Intent> },
}

impl Payload {
    pub fn from_ops(mut ops: Vec<Intent>) -> Payload {
        if ops.len() == 1 {
            Payload::Single(ops.remove(0))
        } else {
            Payload::Batch { ops }
        }
    }
}

/// Structured acknowledgment from the mutation endpoint. An empty success
/// body deserializes to the default (no id assignments).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    /// Server-assigned ids, keyed by the client's temporary ids.
    #[serde(default)]
    pub assigned: HashMap<String, String>,
}
