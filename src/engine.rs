//! Instrumented wrapper around the pure core.
//!
//! [`StudyEngine`] owns a validated [`StudyConfig`] and calls
//! [`crate::pipeline`] with the options derived from it. Around each call it
//! emits `tracing` events under the component targets and fires the
//! configured [`crate::observe::StudyObserver`] callbacks. The results are
//! exactly what the free functions return for the same options.

use crate::config::StudyConfig;
use crate::observe::{FLASHCARDS, SUMMARIZER};
use crate::output::{FlashcardSet, Summary};
use crate::pipeline::flashcards::{generate_flashcards_with, FlashcardInput};
use crate::pipeline::summarize::summarize_with;
use tracing::{debug, info, warn};

/// Summarizer and flashcard synthesizer sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct StudyEngine {
    config: StudyConfig,
}

impl StudyEngine {
    pub fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Summarise `text` with the configured sentence and character limits.
    pub fn summarize(&self, text: &str) -> Summary {
        let chars = text.chars().count();
        info!(target: SUMMARIZER, chars, max_sentences = self.config.max_sentences, "summarize start");
        if let Some(ref obs) = self.config.observer {
            obs.on_summarize_start(chars);
        }

        let summary = summarize_with(text, &self.config.summary_options());

        let summary_chars = summary.text.chars().count();
        info!(
            target: SUMMARIZER,
            selected = summary.len(),
            source_sentences = summary.source_sentences,
            chars = summary_chars,
            "summarize complete"
        );
        if let Some(ref obs) = self.config.observer {
            obs.on_summary_complete(summary.len(), summary_chars);
        }
        summary
    }

    /// Synthesise up to `flashcard_count` cards from `input`.
    pub fn flashcards(&self, input: FlashcardInput<'_>) -> FlashcardSet {
        self.flashcards_n(input, self.config.flashcard_count)
    }

    /// Synthesise up to `count` cards, overriding the configured count.
    pub fn flashcards_n(&self, input: FlashcardInput<'_>, count: usize) -> FlashcardSet {
        let (kind, chars) = match input {
            FlashcardInput::Text(text) => ("text", text.chars().count()),
            FlashcardInput::Structured { payload, .. } => ("structured", payload.chars().count()),
        };
        info!(target: FLASHCARDS, requested = count, input = kind, chars, "flashcards start");
        if let Some(ref obs) = self.config.observer {
            obs.on_flashcards_start(count);
        }

        let set = generate_flashcards_with(input, count, &self.config.flashcard_options());

        if let Some(ref reason) = set.fallback_reason {
            warn!(target: FLASHCARDS, reason = %reason, "structured payload rejected, using sentence fallback");
            if let Some(ref obs) = self.config.observer {
                obs.on_fallback(reason);
            }
        }
        if set.len() < count {
            debug!(target: FLASHCARDS, requested = count, produced = set.len(), "notes ran out before the requested count");
        }
        info!(target: FLASHCARDS, count = set.len(), provenance = %set.provenance, "flashcards complete");
        if let Some(ref obs) = self.config.observer {
            obs.on_flashcards_complete(set.len(), set.provenance);
        }
        set
    }
}
