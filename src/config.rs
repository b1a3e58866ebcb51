//! Configuration types for summarisation, flashcard synthesis, and the
//! orchestrated run.
//!
//! All behaviour is controlled through [`StudyConfig`], built via its
//! [`StudyConfigBuilder`]. The pure core functions take the narrower
//! [`SummaryOptions`] and [`FlashcardOptions`], which `StudyConfig` derives so
//! the engine and the free functions always agree on the scoring constants.

use crate::error::StudyError;
use crate::observe::Observer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default number of sentences kept in a summary.
pub const DEFAULT_MAX_SENTENCES: usize = 5;

/// Default number of flashcards requested per run.
pub const DEFAULT_FLASHCARD_COUNT: usize = 10;

/// Default size of the keyword pool (most frequent content words).
pub const DEFAULT_KEYWORD_POOL: usize = 10;

/// Configuration for a study run.
///
/// Built via [`StudyConfig::builder()`] or using [`StudyConfig::default()`].
///
/// # Example
/// ```rust
/// use study_buddy::StudyConfig;
///
/// let config = StudyConfig::builder()
///     .max_sentences(3)
///     .flashcard_count(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_sentences, 3);
/// ```
#[derive(Clone)]
pub struct StudyConfig {
    /// Upper bound on summary sentences. Must be ≥ 1. Default: 5.
    pub max_sentences: usize,

    /// Optional upper bound on rendered summary characters. Default: None.
    ///
    /// Applied on top of the sentence limit; 400 suits a single slide.
    pub max_summary_chars: Option<usize>,

    /// Target number of flashcards. Default: 10.
    pub flashcard_count: usize,

    /// Whether flashcards are drawn from the full notes or the summary.
    /// Default: [`FlashcardSource::Notes`].
    pub flashcard_source: FlashcardSource,

    /// Question stem used by the deterministic synthesizer.
    /// Default: [`QuestionStyle::KeyTerm`].
    pub question_style: QuestionStyle,

    /// Sentence-scoring weights. Default: position 0.25, length 0.25, keyword 0.5.
    pub weights: ScoringWeights,

    /// How many of the most frequent content words count as keywords. Default: 10.
    pub keyword_pool: usize,

    /// Title given to the published deck.
    pub deck_title: String,

    /// Where the local authorization provider keeps its token file.
    /// Default: `token.json`.
    pub token_path: PathBuf,

    /// Directory the local deck sink writes presentation files into. Default: `.`.
    pub output_dir: PathBuf,

    /// Bearer token for the remote collaborators. When set it takes
    /// precedence over the token file. Never printed by `Debug`.
    pub access_token: Option<String>,

    /// Publish to Google Slides instead of writing a local presentation file.
    /// Requires real credentials. Default: false.
    pub remote_slides: bool,

    /// Timeout for remote collaborator HTTP calls in seconds. Default: 30.
    pub http_timeout_secs: u64,

    /// Receives semantic events from the engine and orchestrator.
    pub observer: Option<Observer>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            max_summary_chars: None,
            flashcard_count: DEFAULT_FLASHCARD_COUNT,
            flashcard_source: FlashcardSource::default(),
            question_style: QuestionStyle::default(),
            weights: ScoringWeights::default(),
            keyword_pool: DEFAULT_KEYWORD_POOL,
            deck_title: "Study Buddy Flashcards".to_string(),
            token_path: PathBuf::from("token.json"),
            output_dir: PathBuf::from("."),
            access_token: None,
            remote_slides: false,
            http_timeout_secs: 30,
            observer: None,
        }
    }
}

impl fmt::Debug for StudyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyConfig")
            .field("max_sentences", &self.max_sentences)
            .field("max_summary_chars", &self.max_summary_chars)
            .field("flashcard_count", &self.flashcard_count)
            .field("flashcard_source", &self.flashcard_source)
            .field("question_style", &self.question_style)
            .field("weights", &self.weights)
            .field("keyword_pool", &self.keyword_pool)
            .field("deck_title", &self.deck_title)
            .field("token_path", &self.token_path)
            .field("output_dir", &self.output_dir)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("remote_slides", &self.remote_slides)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn StudyObserver>"))
            .finish()
    }
}

impl StudyConfig {
    /// Create a new builder for `StudyConfig`.
    pub fn builder() -> StudyConfigBuilder {
        StudyConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scoring knobs shared by both core components.
    pub fn scoring(&self) -> ScoringOptions {
        ScoringOptions {
            weights: self.weights,
            keyword_pool: self.keyword_pool,
        }
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            max_sentences: self.max_sentences,
            max_chars: self.max_summary_chars,
            scoring: self.scoring(),
        }
    }

    pub fn flashcard_options(&self) -> FlashcardOptions {
        FlashcardOptions {
            style: self.question_style,
            scoring: self.scoring(),
        }
    }
}

/// Builder for [`StudyConfig`].
#[derive(Debug)]
pub struct StudyConfigBuilder {
    config: StudyConfig,
}

impl StudyConfigBuilder {
    pub fn max_sentences(mut self, n: usize) -> Self {
        self.config.max_sentences = n;
        self
    }

    pub fn max_summary_chars(mut self, chars: usize) -> Self {
        self.config.max_summary_chars = Some(chars);
        self
    }

    pub fn flashcard_count(mut self, n: usize) -> Self {
        self.config.flashcard_count = n;
        self
    }

    pub fn flashcard_source(mut self, source: FlashcardSource) -> Self {
        self.config.flashcard_source = source;
        self
    }

    pub fn question_style(mut self, style: QuestionStyle) -> Self {
        self.config.question_style = style;
        self
    }

    pub fn weights(mut self, weights: ScoringWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn keyword_pool(mut self, n: usize) -> Self {
        self.config.keyword_pool = n;
        self
    }

    pub fn deck_title(mut self, title: impl Into<String>) -> Self {
        self.config.deck_title = title.into();
        self
    }

    pub fn token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.token_path = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn remote_slides(mut self, enabled: bool) -> Self {
        self.config.remote_slides = enabled;
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs.max(1);
        self
    }

    pub fn observer(mut self, observer: Observer) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StudyConfig, StudyError> {
        let c = &self.config;
        if c.max_sentences == 0 {
            return Err(StudyError::InvalidConfig(
                "max_sentences must be ≥ 1".into(),
            ));
        }
        if c.max_summary_chars == Some(0) {
            return Err(StudyError::InvalidConfig(
                "max_summary_chars must be ≥ 1 when set".into(),
            ));
        }
        if c.keyword_pool == 0 {
            return Err(StudyError::InvalidConfig(
                "keyword_pool must be ≥ 1".into(),
            ));
        }
        c.weights.validate()?;
        if c.deck_title.trim().is_empty() {
            return Err(StudyError::InvalidConfig(
                "deck_title must not be blank".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────

/// Relative weight of each sentence-scoring signal.
///
/// Each signal is normalised to `[0, 1]` before weighting, so the weights
/// express relative importance directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Lead bias: earlier sentences score higher.
    pub position: f64,
    /// Closeness of the sentence's word count to the mean.
    pub length: f64,
    /// Density of frequent content words.
    pub keyword: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            position: 0.25,
            length: 0.25,
            keyword: 0.5,
        }
    }
}

impl ScoringWeights {
    fn validate(&self) -> Result<(), StudyError> {
        for (name, w) in [
            ("position", self.position),
            ("length", self.length),
            ("keyword", self.keyword),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(StudyError::InvalidConfig(format!(
                    "{name} weight must be a finite number ≥ 0, got {w}"
                )));
            }
        }
        if self.position + self.length + self.keyword <= 0.0 {
            return Err(StudyError::InvalidConfig(
                "at least one scoring weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Knobs shared by the summarizer and the flashcard synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringOptions {
    pub weights: ScoringWeights,
    pub keyword_pool: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            keyword_pool: DEFAULT_KEYWORD_POOL,
        }
    }
}

/// Options for [`crate::pipeline::summarize::summarize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub max_sentences: usize,
    pub max_chars: Option<usize>,
    pub scoring: ScoringOptions,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            max_chars: None,
            scoring: ScoringOptions::default(),
        }
    }
}

/// Options for [`crate::pipeline::flashcards::generate_flashcards_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashcardOptions {
    pub style: QuestionStyle,
    pub scoring: ScoringOptions,
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which text the orchestrator feeds to the flashcard synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashcardSource {
    /// The full notes (default): more candidate sentences, fuller decks.
    #[default]
    Notes,
    /// The summary. Decks are capped at the summary's sentence count.
    Summary,
}

/// How the deterministic synthesizer phrases questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionStyle {
    /// "What does the text say about <key term>?" (default)
    #[default]
    KeyTerm,
    /// "Explain: <first 60 characters of the sentence>?"
    Explain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = StudyConfig::builder().build().unwrap();
        assert_eq!(config.max_sentences, DEFAULT_MAX_SENTENCES);
        assert_eq!(config.flashcard_count, DEFAULT_FLASHCARD_COUNT);
        assert_eq!(config.flashcard_source, FlashcardSource::Notes);
    }

    #[test]
    fn zero_sentences_rejected() {
        let err = StudyConfig::builder().max_sentences(0).build().unwrap_err();
        assert!(matches!(err, StudyError::InvalidConfig(_)));
    }

    #[test]
    fn zero_keyword_pool_rejected() {
        assert!(StudyConfig::builder().keyword_pool(0).build().is_err());
    }

    #[test]
    fn negative_weight_rejected() {
        let weights = ScoringWeights {
            position: -0.1,
            ..Default::default()
        };
        let err = StudyConfig::builder().weights(weights).build().unwrap_err();
        assert!(err.to_string().contains("position"), "got: {err}");
    }

    #[test]
    fn nan_weight_rejected() {
        let weights = ScoringWeights {
            keyword: f64::NAN,
            ..Default::default()
        };
        assert!(StudyConfig::builder().weights(weights).build().is_err());
    }

    #[test]
    fn all_zero_weights_rejected() {
        let weights = ScoringWeights {
            position: 0.0,
            length: 0.0,
            keyword: 0.0,
        };
        assert!(StudyConfig::builder().weights(weights).build().is_err());
    }

    #[test]
    fn zero_flashcards_allowed() {
        let config = StudyConfig::builder().flashcard_count(0).build().unwrap();
        assert_eq!(config.flashcard_count, 0);
    }

    #[test]
    fn derived_options_follow_config() {
        let config = StudyConfig::builder()
            .max_sentences(2)
            .max_summary_chars(120)
            .keyword_pool(4)
            .question_style(QuestionStyle::Explain)
            .build()
            .unwrap();
        let summary = config.summary_options();
        assert_eq!(summary.max_sentences, 2);
        assert_eq!(summary.max_chars, Some(120));
        assert_eq!(summary.scoring.keyword_pool, 4);
        assert_eq!(config.flashcard_options().style, QuestionStyle::Explain);
    }

    #[test]
    fn debug_redacts_access_token() {
        let config = StudyConfig::builder()
            .access_token("ya29.secret")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("ya29.secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
