//! # study-buddy
//!
//! Turn free-form study notes into a condensed summary and a set of
//! question/answer flashcards, deterministically and without any AI service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes
//!  │
//!  ├─ 1. Auth       token file / bearer token, placeholder on failure
//!  ├─ 2. Fetch      local file or Google Doc, bundled sample by default
//!  ├─ 3. Summarise  extractive: score sentences, keep the best, document order
//!  ├─ 4. Cards      key-term questions over top sentences, or a repaired
//!  │                structured payload with sentence-based fallback
//!  └─ 5. Publish    presentation_<id>.json or a Google Slides deck
//! ```
//!
//! Steps 3 and 4 are pure functions ([`summarize`], [`generate_flashcards`])
//! usable on their own; [`run_study`] sequences all five.
//!
//! ## Quick Start
//!
//! ```rust
//! use study_buddy::{generate_flashcards, summarize};
//!
//! let notes = "Entropy measures disorder. It never decreases in an isolated system. \
//!              Heat flows from hot to cold.";
//! let summary = summarize(notes, 2);
//! let cards = generate_flashcards(notes, 3);
//! assert_eq!(summary.len(), 2);
//! assert!(cards.len() <= 3);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `study-buddy` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! study-buddy = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod observe;
pub mod output;
pub mod pipeline;
pub mod provider;
pub mod study;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    FlashcardOptions, FlashcardSource, QuestionStyle, ScoringOptions, ScoringWeights,
    StudyConfig, StudyConfigBuilder, SummaryOptions,
};
pub use engine::StudyEngine;
pub use error::{PayloadError, StudyError};
pub use observe::{NoopObserver, Observer, StudyObserver};
pub use output::{
    Deck, Flashcard, FlashcardSet, Provenance, PublishedDeck, StudyOutput, StudyStats, Summary,
};
pub use pipeline::flashcards::{generate_flashcards, generate_flashcards_with, FlashcardInput};
pub use pipeline::summarize::{summarize, summarize_with};
pub use provider::{AuthProvider, Credentials, DeckSink, DocumentLookup, DocumentStore};
pub use study::{run_study, run_study_sync};
pub use templates::render_markdown;
