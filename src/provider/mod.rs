//! Collaborators the orchestrator sequences around the core.
//!
//! Each collaborator is an enum with a local variant that works offline and a
//! remote variant backed by the Google Docs / Slides REST APIs:
//!
//! | Collaborator | Local | Remote |
//! |--------------|-------|--------|
//! | [`AuthProvider`]  | token file, placeholder if missing | static bearer token |
//! | [`DocumentStore`] | UTF-8 file on disk | Google Docs v1 document |
//! | [`DeckSink`]      | `presentation_<id>.json` written atomically | Google Slides presentation |
//!
//! The core in [`crate::pipeline`] never touches these.

pub mod auth;
pub mod docs;
pub mod slides;

pub use auth::{AuthProvider, Credentials};
pub use docs::{DocumentLookup, DocumentStore};
pub use slides::DeckSink;

use crate::error::StudyError;
use std::time::Duration;

/// Build the HTTP client shared by the remote variants.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, StudyError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| StudyError::Internal(format!("Failed to build HTTP client: {e}")))
}
