//! Flashcard synthesis: turn information-dense sentences into Q/A pairs.
//!
//! ## Deterministic path
//!
//! Sentences are ranked with the same heuristic as the summarizer. Walking
//! best-first, each sentence whose core clause (or, failing that, whole
//! sentence) has a content word becomes a card: the question names the
//! sentence's highest-frequency content word, the answer is the sentence
//! itself. Cards come back in document order. When the notes run out before
//! `count` is reached the set is simply shorter.
//!
//! ## Structured path
//!
//! When a payload is supplied, [`crate::pipeline::repair::parse_payload`]
//! gets the first shot. If it rejects the payload the deterministic path runs
//! over the accompanying notes and the set is marked
//! [`Provenance::Fallback`], even when `count` is zero. Neither path returns
//! an error or panics.

use crate::config::FlashcardOptions;
use crate::output::{Flashcard, FlashcardSet, Provenance};
use crate::pipeline::repair::parse_payload;
use crate::pipeline::score::{rank, score_with_table, KeywordTable};
use crate::pipeline::segment::{split_sentences, split_words, Sentence, Word};
use crate::templates;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Words that open a leading subordinate clause ("Although X, Y").
const LEADING_SUBORDINATORS: &[&str] = &[
    "after", "although", "as", "because", "before", "if", "once", "since", "though", "unless",
    "until", "when", "whenever", "whereas", "while",
];

static RE_TRAILING_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),\s+(?:which|but|although|though|whereas|because|so)\b|\s[—–-]\s|;").unwrap()
});

/// What the synthesizer works from.
#[derive(Debug, Clone, Copy)]
pub enum FlashcardInput<'a> {
    /// Plain notes.
    Text(&'a str),
    /// A structured payload from an upstream generator, plus the notes to
    /// fall back on if the payload is unusable.
    Structured { payload: &'a str, notes: &'a str },
}

/// Generate up to `count` flashcards from plain notes with default options.
///
/// # Example
/// ```rust
/// use study_buddy::generate_flashcards;
///
/// let set = generate_flashcards("Photosynthesis converts light into energy.", 1);
/// assert_eq!(set.cards[0].question, "What does the text say about Photosynthesis?");
/// assert_eq!(set.cards[0].answer, "Photosynthesis converts light into energy.");
/// ```
pub fn generate_flashcards(text: &str, count: usize) -> FlashcardSet {
    generate_flashcards_with(FlashcardInput::Text(text), count, &FlashcardOptions::default())
}

/// Generate up to `count` flashcards from either input kind.
pub fn generate_flashcards_with(
    input: FlashcardInput<'_>,
    count: usize,
    options: &FlashcardOptions,
) -> FlashcardSet {
    match input {
        FlashcardInput::Text(_) if count == 0 => FlashcardSet::empty(),
        FlashcardInput::Text(text) => synthesize(text, count, options),
        // Validated even when `count == 0`.
        FlashcardInput::Structured { payload, notes } => match parse_payload(payload, count) {
            Ok(cards) => FlashcardSet {
                cards,
                provenance: Provenance::Synthesized,
                fallback_reason: None,
            },
            Err(e) => FlashcardSet {
                provenance: Provenance::Fallback,
                fallback_reason: Some(e.to_string()),
                ..synthesize(notes, count, options)
            },
        },
    }
}

fn synthesize(text: &str, count: usize, options: &FlashcardOptions) -> FlashcardSet {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return FlashcardSet::empty();
    }

    let table = KeywordTable::from_text(text, options.scoring.keyword_pool);
    let scores = score_with_table(&table, &sentences, &options.scoring);

    let mut used_terms: HashSet<String> = HashSet::new();
    let mut picked: Vec<(usize, Flashcard)> = Vec::with_capacity(count.min(sentences.len()));

    for idx in rank(&scores) {
        if picked.len() == count {
            break;
        }
        let sentence = &sentences[idx];
        let Some(term) = key_term(sentence, &table, &used_terms) else {
            continue;
        };
        let question = templates::question(options.style, &term.surface, &sentence.text);
        let Some(card) = Flashcard::new(question, sentence.rendered()) else {
            continue;
        };
        used_terms.insert(term.norm);
        picked.push((idx, card));
    }

    picked.sort_by_key(|(idx, _)| *idx);
    FlashcardSet {
        cards: picked.into_iter().map(|(_, card)| card).collect(),
        provenance: Provenance::Synthesized,
        fallback_reason: None,
    }
}

/// Pick the sentence's key term: the most frequent content word of its core
/// clause, preferring terms not already asked about. Earliest word wins ties.
fn key_term(sentence: &Sentence, table: &KeywordTable, used: &HashSet<String>) -> Option<Word> {
    let core: Vec<Word> = split_words(core_clause(&sentence.text))
        .into_iter()
        .filter(Word::is_content)
        .collect();
    let candidates: Vec<Word> = if core.is_empty() {
        sentence.content_words().cloned().collect()
    } else {
        core
    };

    let best = |allow_used: bool| {
        candidates
            .iter()
            .filter(|w| allow_used || !used.contains(&w.norm))
            .fold(None::<&Word>, |best, w| match best {
                Some(b) if table.frequency(&b.norm) >= table.frequency(&w.norm) => Some(b),
                _ => Some(w),
            })
            .cloned()
    };

    best(false).or_else(|| best(true))
}

/// Strip a leading subordinate clause and a trailing clause, if present.
///
/// Falls back to the whole sentence when stripping would leave nothing.
pub fn core_clause(sentence: &str) -> &str {
    let mut core = sentence.trim();

    let first_word = core
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or("")
        .to_lowercase();
    if LEADING_SUBORDINATORS.contains(&first_word.as_str()) {
        if let Some(comma) = core.find(',') {
            core = core[comma + 1..].trim();
        }
    }

    if let Some(m) = RE_TRAILING_CLAUSE.find(core) {
        core = core[..m.start()].trim();
    }

    if core.is_empty() {
        sentence.trim()
    } else {
        core
    }
}
