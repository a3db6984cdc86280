//! # Statusgate Core Library
//!
//! Core library for publishing and consuming a small "service status"
//! document. An operator edits the document and pushes it to a remote
//! file host; a customer-facing page fetches it and renders a blocking
//! or informational overlay with mode-specific interaction rules.
//!
//! ## Architecture
//!
//! - **Document model**: schema, invariants, and the pure normalization
//!   from "raw stored JSON" to a well-formed [`StatusDocument`]
//! - **Policy engine**: turns a document plus the current time into an
//!   [`OverlayDecision`], including the weekly block-window evaluator and
//!   the per-view dismissal state machine
//! - **Transport**: the read/write-with-version-token store contract and
//!   an HTTP implementation
//! - **Publish**: the operator's sequential read-modify-write
//! - **Viewer**: the consumer-side fetch-and-decide, fail-open on error
//!
//! ## Key Components
//!
//! - [`StatusDocument`]: the published artifact
//! - [`decide`]: the render/enable decision
//! - [`OverlayView`]: per-page-view countdown state machine
//! - [`publish`]: push a draft through a [`DocumentStore`]

pub mod document;
pub mod policy;
pub mod transport;
pub mod publish;
pub mod viewer;
pub mod storage;
pub mod error;

pub use document::{
    build_publishable, DraftFields, InfoConfig, Mode, Preset, StatusDocument, WarningConfig,
};
pub use policy::{
    decide, live_config, BlockSchedule, LiveConfig, OverlayContent, OverlayDecision, OverlayView,
    OverlayViewState,
};
pub use publish::{publish, publish_at};
pub use transport::{DocumentStore, HttpStore, ReadResponse, VersionToken};
pub use viewer::Viewer;
pub use storage::Config;
pub use error::{ConfigError, CoreError, TransportError};
