pub mod http;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Ack, Outline, Payload, VocabSnapshot};

pub use http::HttpTransport;

/// Failures crossing the client/server boundary. Non-success responses carry
/// the server's plain-text message; everything else is flattened to a
/// human-readable string because callers only ever surface it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The server refused the request.
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed server response: {0}")]
    Malformed(String),
}

/// Initial page load: the outline tree plus an inline vocabulary snapshot
/// so pickers work even when the metadata endpoint is unreachable.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlinePage {
    pub outline: Outline,
    #[serde(default)]
    pub vocab: VocabSnapshot,
}

/// The server as the client sees it. One implementation speaks HTTP; tests
/// substitute in-memory fakes.
///
/// `mutate` is the only call made from the keystroke hot path, and it is
/// always issued from a coordinator worker thread, never the UI thread.
pub trait Transport: Send + Sync {
    fn mutate(&self, resource_id: &str, payload: &Payload) -> Result<Ack, RemoteError>;
    fn metadata(&self, resource_id: &str) -> Result<VocabSnapshot, RemoteError>;
    fn load(&self, resource_id: &str) -> Result<OutlinePage, RemoteError>;
}
