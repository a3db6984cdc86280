//! Operator publish sequence.
//!
//! Publishing is a strict read-modify-write: read the current document
//! and its version token, normalize, merge the operator's draft, write
//! back conditioned on the token. The two network calls are sequential
//! by construction -- the write cannot start without the token from the
//! read. There is no retry: a conflict or transport failure surfaces
//! immediately, nothing is partially applied, and the caller still holds
//! the draft for a later attempt.

use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;

use crate::document::{build_publishable, DraftFields, StatusDocument};
use crate::error::Result;
use crate::transport::DocumentStore;

/// Publish `draft` on top of whatever the store currently holds.
///
/// Returns the document that was written. The caller decides what to
/// keep -- there is no shared mutable current-document state.
pub async fn publish<S: DocumentStore>(store: &S, draft: &DraftFields) -> Result<StatusDocument> {
    publish_at(store, draft, Local::now().fixed_offset()).await
}

/// Same as [`publish`] with an explicit timestamp for `last_update`.
pub async fn publish_at<S: DocumentStore>(
    store: &S,
    draft: &DraftFields,
    now: DateTime<FixedOffset>,
) -> Result<StatusDocument> {
    let current = store.read().await?;

    // A malformed stored document is not fatal: normalization rebuilds
    // it from defaults, field by field.
    let raw: Value = serde_json::from_str(&current.content).unwrap_or(Value::Null);
    let baseline = StatusDocument::normalize(&raw);

    let next = build_publishable(&baseline, draft, now);
    let payload = next.to_canonical_json()?;

    store.write(&payload, &current.version).await?;
    Ok(next)
}
