//! Document store transport contract.
//!
//! The core never assumes a specific protocol. It needs exactly two
//! operations: read the document together with an opaque version token,
//! and write a new document conditioned on that token. The token is the
//! store's own optimistic-concurrency guard -- a stale token loses, and
//! the writer must re-read before retrying.

mod http;

pub use http::HttpStore;

use crate::error::TransportError;

/// Opaque version token obtained from a read and required by a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a successful read.
#[derive(Debug, Clone)]
pub struct ReadResponse {
    pub content: String,
    pub version: VersionToken,
}

/// A remote location holding the serialized status document.
pub trait DocumentStore {
    /// Fetch the current document text and its version token.
    fn read(&self) -> impl std::future::Future<Output = Result<ReadResponse, TransportError>> + Send;

    /// Replace the document, conditioned on `version` still being current.
    /// Fails with [`TransportError::Conflict`] when the token is stale.
    fn write(
        &self,
        content: &str,
        version: &VersionToken,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
