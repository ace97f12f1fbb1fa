use serde::{Deserialize, Serialize};

/// One entry of an outline's status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOption {
    pub id: String,
    pub label: String,
    /// Marks completion/closure; end-state items are candidates for bulk archive.
    #[serde(default)]
    pub is_end_state: bool,
    /// Transitions into this status must carry a free-text note.
    #[serde(default)]
    pub requires_note: bool,
}

/// An actor an item can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorOption {
    pub id: String,
    pub label: String,
}

/// A refile target for the move-destination picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationOption {
    pub id: String,
    pub label: String,
}

/// Read-only snapshot of a resource's selectable vocabularies, as served by
/// the metadata endpoint (and inlined with the initial page load).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabSnapshot {
    #[serde(default)]
    pub status_options: Vec<StatusOption>,
    #[serde(default)]
    pub tag_options: Vec<String>,
    #[serde(default)]
    pub actor_options: Vec<ActorOption>,
    #[serde(default)]
    pub destination_options: Vec<DestinationOption>,
    #[serde(default)]
    pub description: Option<String>,
}

impl VocabSnapshot {
    pub fn status(&self, id: &str) -> Option<&StatusOption> {
        self.status_options.iter().find(|s| s.id == id)
    }

    /// The status after `current` in vocabulary order, wrapping at the end.
    /// Returns None for an empty vocabulary or an unknown current status.
    pub fn status_after(&self, current: &str) -> Option<&StatusOption> {
        let idx = self.status_options.iter().position(|s| s.id == current)?;
        let next = (idx + 1) % self.status_options.len();
        self.status_options.get(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(ids: &[&str]) -> VocabSnapshot {
        VocabSnapshot {
            status_options: ids
                .iter()
                .map(|id| StatusOption {
                    id: id.to_string(),
                    label: id.to_string(),
                    is_end_state: false,
                    requires_note: false,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn status_after_advances_and_wraps() {
        let v = vocab(&["todo", "doing", "done"]);
        assert_eq!(v.status_after("todo").unwrap().id, "doing");
        assert_eq!(v.status_after("done").unwrap().id, "todo");
    }

    #[test]
    fn status_after_unknown_is_none() {
        let v = vocab(&["todo"]);
        assert!(v.status_after("nope").is_none());
        assert!(vocab(&[]).status_after("todo").is_none());
    }

    #[test]
    fn snapshot_wire_names_are_camel_case() {
        let json = r#"{
            "statusOptions": [{"id": "done", "label": "Done", "isEndState": true, "requiresNote": false}],
            "tagOptions": ["urgent"],
            "actorOptions": [{"id": "u1", "label": "Ada"}],
            "destinationOptions": [],
            "description": "demo"
        }"#;
        let v: VocabSnapshot = serde_json::from_str(json).unwrap();
        assert!(v.status("done").unwrap().is_end_state);
        assert_eq!(v.tag_options, vec!["urgent"]);
        assert_eq!(v.actor_options[0].label, "Ada");
    }
}
