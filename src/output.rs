//! Result types produced by the summarizer, the flashcard synthesizer, and
//! the orchestrator.
//!
//! Everything here is a plain value: computed fresh per call, `Send + Sync`,
//! and serialisable so the CLI can emit it as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An extractive summary: selected sentences in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Rendered summary: each sentence ends with a period, joined by one space.
    pub text: String,
    /// The selected sentences without their terminal punctuation.
    pub sentences: Vec<String>,
    /// How many distinct sentences the source text contained.
    pub source_sentences: usize,
}

impl Summary {
    /// `true` when no sentence was selected.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Number of selected sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A single question/answer pair.
///
/// Both sides are non-empty after trimming and never equal; use
/// [`Flashcard::new`] to get that check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Build a card, trimming both sides. Returns `None` when either side is
    /// blank or the two are identical.
    pub fn new(question: impl AsRef<str>, answer: impl AsRef<str>) -> Option<Self> {
        let question = question.as_ref().trim();
        let answer = answer.as_ref().trim();
        if question.is_empty() || answer.is_empty() || question == answer {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// Which path produced a [`FlashcardSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Normal synthesis: deterministic sentence-based cards, or a structured
    /// payload that parsed cleanly.
    #[default]
    Synthesized,
    /// A structured payload was unusable and the deterministic path ran instead.
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Synthesized => f.write_str("synthesized"),
            Provenance::Fallback => f.write_str("fallback"),
        }
    }
}

/// An ordered set of at most N flashcards plus its provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub cards: Vec<Flashcard>,
    pub provenance: Provenance,
    /// Why the fallback path ran; `None` for synthesized sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl FlashcardSet {
    /// An empty, normally synthesized set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// What gets handed to a [`crate::provider::DeckSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub summary: String,
    pub flashcards: FlashcardSet,
}

/// Where a deck ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedDeck {
    pub deck_id: String,
    pub url: String,
}

/// Timing and size statistics for one orchestrated run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyStats {
    /// Characters in the fetched notes.
    pub input_chars: usize,
    /// Distinct sentences found in the notes.
    pub source_sentences: usize,
    /// Characters in the rendered summary.
    pub summary_chars: usize,
    /// Flashcards produced.
    pub flashcards: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

/// Everything an orchestrated run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyOutput {
    /// Human-readable label for where the notes came from.
    pub source: String,
    pub summary: Summary,
    pub flashcards: FlashcardSet,
    pub deck: PublishedDeck,
    pub stats: StudyStats,
}
