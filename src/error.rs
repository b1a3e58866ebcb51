//! Error types for the study-buddy library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StudyError`] — **Fatal**: the run cannot proceed (bad configuration,
//!   document missing, deck could not be published). Returned as
//!   `Err(StudyError)` from the configuration builder and the orchestrator.
//!
//! * [`PayloadError`] — **Recoverable**: a structured flashcard payload could
//!   not be used. The synthesizer never propagates it; it falls back to the
//!   deterministic path and records the error text in
//!   [`crate::output::FlashcardSet::fallback_reason`].
//!
//! Empty input is neither: it is a valid case and yields empty results.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the study-buddy library.
#[derive(Debug, Error)]
pub enum StudyError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Document store errors ─────────────────────────────────────────────
    /// The requested document does not exist in any configured store.
    #[error("Document '{identifier}' not found.\nPass a readable text file or a document ID with valid credentials.")]
    DocumentNotFound { identifier: String },

    /// The store exists but could not serve the document right now.
    #[error("Document '{identifier}' is unavailable: {reason}")]
    DocumentUnavailable { identifier: String, reason: String },

    // ── Collaborator errors ───────────────────────────────────────────────
    /// The authorization provider could not produce credentials.
    #[error("Authorization failed: {detail}")]
    Auth { detail: String },

    /// The slide sink rejected the deck.
    #[error("Failed to publish deck '{title}': {reason}")]
    Publish { title: String, reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a local output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a structured flashcard payload was rejected.
///
/// Stored as text on the resulting [`crate::output::FlashcardSet`]; never
/// returned as `Err` from the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PayloadError {
    /// The payload is not valid JSON in any accepted shape.
    #[error("payload is not valid flashcard JSON: {detail}")]
    Malformed { detail: String },

    /// The payload parsed but every entry was blank or had question == answer.
    #[error("payload contained {entries} entries but none were usable flashcards")]
    NoUsableCards { entries: usize },
}
