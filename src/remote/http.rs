use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};

use crate::model::{Ack, Payload, VocabSnapshot};

use super::{OutlinePage, RemoteError, Transport};

/// Requests that outlive this are better treated as failed and retried by
/// the user than left dangling behind a frozen queue.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP transport against the outline server.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    /// Map a non-success response to the server's plain-text message.
    fn ensure_ok(&self, resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().unwrap_or_default();
        let message = if message.trim().is_empty() {
            match status {
                StatusCode::UNAUTHORIZED => "unauthorized (token invalid or expired)".to_string(),
                StatusCode::FORBIDDEN => "forbidden (no access to this outline)".to_string(),
                _ => format!("server returned {status}"),
            }
        } else {
            message.trim().to_string()
        };
        Err(RemoteError::Rejected(message))
    }
}

impl Transport for HttpTransport {
    fn mutate(&self, resource_id: &str, payload: &Payload) -> Result<Ack, RemoteError> {
        let req = self
            .client
            .post(self.url(&format!("/outlines/{resource_id}/mutations")))
            .json(payload);
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let body = self
            .ensure_ok(resp)?
            .text()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        // An empty success body is a valid acknowledgment.
        if body.trim().is_empty() {
            return Ok(Ack::default());
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    fn metadata(&self, resource_id: &str) -> Result<VocabSnapshot, RemoteError> {
        let req = self.client.get(self.url(&format!("/outlines/{resource_id}/meta")));
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        self.ensure_ok(resp)?
            .json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    fn load(&self, resource_id: &str) -> Result<OutlinePage, RemoteError> {
        let req = self.client.get(self.url(&format!("/outlines/{resource_id}")));
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        self.ensure_ok(resp)?
            .json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}
