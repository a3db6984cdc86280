//! Consumer-side viewer.
//!
//! The viewer fetches the document once per call (re-invocation is the
//! caller's responsibility; there is no polling loop) and runs the policy
//! engine against the current local time. Its decision API is infallible
//! by design: any fetch, HTTP, or decode failure collapses to
//! [`OverlayDecision::fail_open`] -- a broken status document must never
//! prevent customers from completing the unrelated action it guards.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde_json::Value;

use crate::document::StatusDocument;
use crate::error::TransportError;
use crate::policy::{decide, OverlayDecision};

const FETCH_TIMEOUT_SECS: u64 = 10;

/// Read-only consumer of a published status document.
#[derive(Debug, Clone)]
pub struct Viewer {
    client: Client,
    document_url: String,
}

impl Viewer {
    /// A bad URL is not rejected here; it surfaces as fail-open at
    /// decision time, like every other viewer-side failure.
    pub fn new(document_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            document_url: document_url.into(),
        }
    }

    /// Fetch and decide at the current local wall-clock time.
    pub async fn decision_now(&self) -> OverlayDecision {
        self.decision_at(Local::now().naive_local()).await
    }

    /// Fetch and decide at an explicit time. Never fails.
    pub async fn decision_at(&self, now: NaiveDateTime) -> OverlayDecision {
        match self.fetch_document().await {
            Ok(doc) => decide(&doc, now),
            Err(_) => OverlayDecision::fail_open(),
        }
    }

    /// Fetch and normalize the document. Exposed for operator tooling
    /// that wants to look at the document itself; the consumer path goes
    /// through [`Viewer::decision_at`] and never sees these errors.
    pub async fn fetch_document(&self) -> Result<StatusDocument, TransportError> {
        let resp = self
            .client
            .get(&self.document_url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }

        let raw: Value = resp.json().await?;
        Ok(StatusDocument::normalize(&raw))
    }
}
