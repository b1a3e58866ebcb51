//! Text segmentation: notes → sentences → words.
//!
//! Shared by the summarizer and the flashcard synthesizer so both agree on
//! what a sentence is. The rules are deliberately simple and
//! locale-independent:
//!
//! - a run of `.`, `!` or `?` ends a sentence; the run itself is discarded
//! - internal whitespace (including newlines) collapses to one space
//! - empty fragments are dropped
//! - a fragment identical to an earlier sentence is dropped, so sentence
//!   order is order of first occurrence
//!
//! A word is a run of letters/digits, optionally joined by an apostrophe or
//! hyphen (`don't`, `cell-wall`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").unwrap());

/// Minimum length (in chars) for a word to count as content.
pub const MIN_CONTENT_WORD_CHARS: usize = 3;

/// Fixed English stop-word list excluded from keyword scoring.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// One word of a sentence, as written and normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The word exactly as it appears in the sentence.
    pub surface: String,
    /// Lowercased form used for counting and stop-word checks.
    pub norm: String,
}

impl Word {
    fn new(surface: &str) -> Self {
        Self {
            surface: surface.to_string(),
            norm: surface.to_lowercase(),
        }
    }

    /// `true` when the word carries meaning for keyword scoring.
    pub fn is_content(&self) -> bool {
        is_content_word(&self.norm)
    }
}

/// A sentence of the source text, without its terminal punctuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// 0-based position among the distinct sentences of the text.
    pub index: usize,
    /// Trimmed text with whitespace collapsed; no terminal punctuation.
    pub text: String,
    pub words: Vec<Word>,
}

impl Sentence {
    /// The sentence with a terminal period, as it appears in summaries and
    /// flashcard answers.
    pub fn rendered(&self) -> String {
        render_sentence(&self.text)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn content_words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| w.is_content())
    }
}

/// Split `text` into distinct sentences in order of first occurrence.
///
/// Text without any terminal punctuation yields a single sentence; empty or
/// whitespace-only text yields none.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut sentences = Vec::new();

    for fragment in RE_BOUNDARY.split(text) {
        let normalised = collapse_whitespace(fragment);
        if normalised.is_empty() || !seen.insert(normalised.clone()) {
            continue;
        }
        let words = split_words(&normalised);
        sentences.push(Sentence {
            index: sentences.len(),
            text: normalised,
            words,
        });
    }

    sentences
}

/// Tokenise a fragment into words.
pub fn split_words(text: &str) -> Vec<Word> {
    RE_WORD
        .find_iter(text)
        .map(|m| Word::new(m.as_str()))
        .collect()
}

/// `true` for lowercase words that count toward keyword scoring.
pub fn is_content_word(norm: &str) -> bool {
    norm.chars().count() >= MIN_CONTENT_WORD_CHARS
        && !norm.chars().all(|c| c.is_numeric())
        && !STOP_SET.contains(norm)
}

/// Append a period to a sentence unless it already ends with terminal
/// punctuation.
pub fn render_sentence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

fn collapse_whitespace(fragment: &str) -> String {
    RE_WHITESPACE.replace_all(fragment.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentences: &[Sentence]) -> Vec<&str> {
        sentences.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let s = split_sentences("The cat sat. It was tired! Was the sun setting?");
        assert_eq!(
            texts(&s),
            vec!["The cat sat", "It was tired", "Was the sun setting"]
        );
        assert_eq!(s[2].index, 2);
    }

    #[test]
    fn runs_of_punctuation_are_one_boundary() {
        let s = split_sentences("Wait... what?! Fine.");
        assert_eq!(texts(&s), vec!["Wait", "what", "Fine"]);
    }

    #[test]
    fn no_punctuation_is_one_sentence() {
        let s = split_sentences("  notes without an ending  ");
        assert_eq!(texts(&s), vec!["notes without an ending"]);
    }

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
        assert!(split_sentences("...!?").is_empty());
    }

    #[test]
    fn whitespace_collapses() {
        let s = split_sentences("Energy is\n   conserved\tin   closed systems.");
        assert_eq!(texts(&s), vec!["Energy is conserved in closed systems"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let s = split_sentences("Cells divide. Mitosis has phases. Cells divide.");
        assert_eq!(texts(&s), vec!["Cells divide", "Mitosis has phases"]);
        assert_eq!(s[1].index, 1);
    }

    #[test]
    fn words_keep_apostrophes_and_hyphens() {
        let words = split_words("Don't ignore the cell-wall, 42 times");
        let surfaces: Vec<&str> = words.iter().map(|w| w.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["Don't", "ignore", "the", "cell-wall", "42", "times"]);
        assert_eq!(words[0].norm, "don't");
    }

    #[test]
    fn content_word_rules() {
        assert!(is_content_word("photosynthesis"));
        assert!(!is_content_word("the"));
        assert!(!is_content_word("ox"));
        assert!(!is_content_word("1905"));
        assert!(is_content_word("énergie"));
    }

    #[test]
    fn render_appends_period_once() {
        assert_eq!(render_sentence("The cat sat"), "The cat sat.");
        assert_eq!(render_sentence("Done."), "Done.");
        assert_eq!(render_sentence("Really?"), "Really?");
    }
}
