//! Observer trait for semantic events emitted during a study run.
//!
//! Inject an [`Arc<dyn StudyObserver>`] via
//! [`crate::config::StudyConfigBuilder::observer`] to receive events as the
//! engine summarises notes, synthesises flashcards, and publishes the deck.
//!
//! The core functions in [`crate::pipeline`] stay pure; it is
//! [`crate::engine::StudyEngine`] and the orchestrator in [`crate::study`]
//! that fire these callbacks, alongside `tracing` events under the component
//! targets [`SUMMARIZER`], [`FLASHCARDS`], and [`ORCHESTRATOR`].
//!
//! # Example
//!
//! ```rust
//! use study_buddy::{Provenance, StudyConfig, StudyObserver};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FallbackCounter {
//!     fallbacks: AtomicUsize,
//! }
//!
//! impl StudyObserver for FallbackCounter {
//!     fn on_flashcards_complete(&self, _count: usize, provenance: Provenance) {
//!         if provenance == Provenance::Fallback {
//!             self.fallbacks.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(FallbackCounter { fallbacks: AtomicUsize::new(0) });
//! let config = StudyConfig::builder()
//!     .observer(counter as Arc<dyn StudyObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::Provenance;
use std::sync::Arc;

/// `tracing` target for summarizer events.
pub const SUMMARIZER: &str = "summarizer";
/// `tracing` target for flashcard synthesizer events.
pub const FLASHCARDS: &str = "flashcards";
/// `tracing` target for orchestration events.
pub const ORCHESTRATOR: &str = "study";

/// Receives semantic events from the engine and the orchestrator.
///
/// Implementations must be `Send + Sync` so a single observer can be shared
/// by engines running on several threads. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait StudyObserver: Send + Sync {
    /// Called once when the orchestrator starts resolving its source.
    fn on_run_start(&self, source: &str) {
        let _ = source;
    }

    /// Called when the notes have been fetched.
    ///
    /// # Arguments
    /// * `source` — label of the store the notes came from
    /// * `chars`  — character count of the notes
    fn on_document_loaded(&self, source: &str, chars: usize) {
        let _ = (source, chars);
    }

    /// Called before summarisation with the input size in characters.
    fn on_summarize_start(&self, chars: usize) {
        let _ = chars;
    }

    /// Called after summarisation.
    ///
    /// # Arguments
    /// * `sentences` — sentences kept in the summary
    /// * `chars`     — characters in the rendered summary
    fn on_summary_complete(&self, sentences: usize, chars: usize) {
        let _ = (sentences, chars);
    }

    /// Called before flashcard synthesis with the requested card count.
    fn on_flashcards_start(&self, requested: usize) {
        let _ = requested;
    }

    /// Called when a structured payload was rejected and the deterministic
    /// path took over.
    fn on_fallback(&self, reason: &str) {
        let _ = reason;
    }

    /// Called after synthesis with the final count and provenance.
    fn on_flashcards_complete(&self, count: usize, provenance: Provenance) {
        let _ = (count, provenance);
    }

    /// Called once the deck sink has accepted the deck.
    fn on_publish_complete(&self, deck_id: &str, url: &str) {
        let _ = (deck_id, url);
    }
}

/// A no-op implementation for callers that don't need events.
pub struct NoopObserver;

impl StudyObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::StudyConfig`].
pub type Observer = Arc<dyn StudyObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingObserver {
        summaries: AtomicUsize,
        fallbacks: Mutex<Vec<String>>,
        last_count: AtomicUsize,
    }

    impl StudyObserver for TrackingObserver {
        fn on_summary_complete(&self, _sentences: usize, _chars: usize) {
            self.summaries.fetch_add(1, Ordering::SeqCst);
        }

        fn on_fallback(&self, reason: &str) {
            self.fallbacks.lock().unwrap().push(reason.to_string());
        }

        fn on_flashcards_complete(&self, count: usize, _provenance: Provenance) {
            self.last_count.store(count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_run_start("notes.txt");
        obs.on_document_loaded("local", 120);
        obs.on_summarize_start(120);
        obs.on_summary_complete(2, 40);
        obs.on_flashcards_start(10);
        obs.on_fallback("bad json");
        obs.on_flashcards_complete(3, Provenance::Fallback);
        obs.on_publish_complete("1", "/tmp/presentation_1.json");
    }

    #[test]
    fn tracking_observer_receives_events() {
        let tracker = TrackingObserver::default();

        tracker.on_summary_complete(3, 90);
        tracker.on_summary_complete(1, 20);
        tracker.on_fallback("payload is not valid flashcard JSON");
        tracker.on_flashcards_complete(4, Provenance::Fallback);

        assert_eq!(tracker.summaries.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.fallbacks.lock().unwrap().len(), 1);
        assert_eq!(tracker.last_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: Observer = Arc::new(NoopObserver);
        obs.on_flashcards_start(5);
        obs.on_flashcards_complete(5, Provenance::Synthesized);
    }
}
