use std::collections::HashMap;
use std::sync::Arc;

use crate::model::VocabSnapshot;
use crate::remote::Transport;

/// Per-resource vocabulary snapshots for the pickers.
///
/// Each picker open prefers a fresh metadata fetch; when the server is
/// unreachable it falls back to the last good fetch, then to the snapshot
/// inlined with the initial page load.
pub struct OptionsCache {
    transport: Arc<dyn Transport>,
    /// Snapshots delivered with the page load.
    inline: HashMap<String, VocabSnapshot>,
    /// Snapshots from the most recent successful metadata fetch.
    fetched: HashMap<String, VocabSnapshot>,
}

impl OptionsCache {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        OptionsCache {
            transport,
            inline: HashMap::new(),
            fetched: HashMap::new(),
        }
    }

    /// Record the snapshot that arrived inline with a page load.
    pub fn seed(&mut self, resource_id: &str, snapshot: VocabSnapshot) {
        self.inline.insert(resource_id.to_string(), snapshot);
    }

    /// Fetch a fresh snapshot from the metadata endpoint. Returns None when
    /// the fetch fails; the last good fetch is retained either way.
    pub fn refresh(&mut self, resource_id: &str) -> Option<VocabSnapshot> {
        match self.transport.metadata(resource_id) {
            Ok(snapshot) => {
                self.fetched.insert(resource_id.to_string(), snapshot.clone());
                Some(snapshot)
            }
            Err(_) => None,
        }
    }

    /// Snapshot for one picker interaction: a fresh fetch, else the last
    /// good fetch, else the inline page-load snapshot. Returns None only
    /// when nothing has ever been seeded or fetched for the resource.
    pub fn open(&mut self, resource_id: &str) -> Option<VocabSnapshot> {
        self.refresh(resource_id)
            .or_else(|| self.cached(resource_id).cloned())
    }

    /// The best snapshot available without a network round trip.
    pub fn cached(&self, resource_id: &str) -> Option<&VocabSnapshot> {
        self.fetched
            .get(resource_id)
            .or_else(|| self.inline.get(resource_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ack, Payload, StatusOption};
    use crate::remote::{OutlinePage, RemoteError};
    use std::sync::Mutex;

    struct FlakyMeta {
        snapshot: Mutex<Option<VocabSnapshot>>,
    }

    impl Transport for FlakyMeta {
        fn mutate(&self, _: &str, _: &Payload) -> Result<Ack, RemoteError> {
            Ok(Ack::default())
        }

        fn metadata(&self, _: &str) -> Result<VocabSnapshot, RemoteError> {
            self.snapshot
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| RemoteError::Network("offline".into()))
        }

        fn load(&self, _: &str) -> Result<OutlinePage, RemoteError> {
            Err(RemoteError::Network("not used".into()))
        }
    }

    fn vocab_with_status(id: &str) -> VocabSnapshot {
        VocabSnapshot {
            status_options: vec![StatusOption {
                id: id.into(),
                label: id.into(),
                is_end_state: false,
                requires_note: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn open_prefers_fresh_fetch() {
        let transport = Arc::new(FlakyMeta {
            snapshot: Mutex::new(Some(vocab_with_status("fresh"))),
        });
        let mut cache = OptionsCache::new(Arc::clone(&transport) as Arc<dyn Transport>);
        cache.seed("out-1", vocab_with_status("inline"));

        let snapshot = cache.open("out-1").unwrap();
        assert_eq!(snapshot.status_options[0].id, "fresh");
    }

    #[test]
    fn open_falls_back_to_last_fetch_then_inline() {
        let transport = Arc::new(FlakyMeta {
            snapshot: Mutex::new(Some(vocab_with_status("fetched"))),
        });
        let mut cache = OptionsCache::new(Arc::clone(&transport) as Arc<dyn Transport>);
        cache.seed("out-1", vocab_with_status("inline"));

        cache.open("out-1").unwrap();
        *transport.snapshot.lock().unwrap() = None;

        let snapshot = cache.open("out-1").unwrap();
        assert_eq!(snapshot.status_options[0].id, "fetched");

        let snapshot = cache.open("out-2");
        assert!(snapshot.is_none());

        cache.seed("out-2", vocab_with_status("inline-2"));
        let snapshot = cache.open("out-2").unwrap();
        assert_eq!(snapshot.status_options[0].id, "inline-2");
    }
}
