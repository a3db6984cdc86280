//! HTTP document store.
//!
//! Maps the transport contract onto plain HTTP conditional requests:
//! the `ETag` response header is the version token, writes are `PUT`
//! with `If-Match`, and `412 Precondition Failed` is a conflict.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Client, StatusCode};
use url::Url;

use super::{DocumentStore, ReadResponse, VersionToken};
use crate::error::TransportError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A status document hosted behind an HTTP endpoint supporting
/// conditional writes.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    url: Url,
    auth_token: Option<String>,
}

impl HttpStore {
    pub fn new(url: &str, auth_token: Option<String>) -> Result<Self, TransportError> {
        Self::with_timeout(url, auth_token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        url: &str,
        auth_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let url = Url::parse(url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url,
            auth_token,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl DocumentStore for HttpStore {
    async fn read(&self) -> Result<ReadResponse, TransportError> {
        let resp = self
            .authorize(self.client.get(self.url.clone()))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }

        let version = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(VersionToken::new)
            .ok_or(TransportError::MissingVersionToken)?;

        let content = resp.text().await?;
        Ok(ReadResponse { content, version })
    }

    async fn write(&self, content: &str, version: &VersionToken) -> Result<(), TransportError> {
        let resp = self
            .authorize(self.client.put(self.url.clone()))
            .header(CONTENT_TYPE, "application/json")
            .header(IF_MATCH, version.as_str())
            .body(content.to_string())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::PRECONDITION_FAILED {
            return Err(TransportError::Conflict);
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }
        Ok(())
    }
}
