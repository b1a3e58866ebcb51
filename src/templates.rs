//! Question stems and Markdown renderings of study material.
//!
//! Centralising the wording here means changing how questions read, or how a
//! deck looks when exported, requires editing exactly one place, and tests can
//! inspect the templates directly.

use crate::config::QuestionStyle;
use crate::output::{FlashcardSet, Provenance, Summary};

/// Characters of the sentence quoted by [`QuestionStyle::Explain`].
pub const EXPLAIN_PREFIX_CHARS: usize = 60;

/// Build a question for a sentence.
///
/// * `key_term` — the sentence's highest-scoring content word, as written
/// * `sentence` — the sentence text without terminal punctuation
pub fn question(style: QuestionStyle, key_term: &str, sentence: &str) -> String {
    match style {
        QuestionStyle::KeyTerm => format!("What does the text say about {key_term}?"),
        QuestionStyle::Explain => {
            let prefix: String = sentence.chars().take(EXPLAIN_PREFIX_CHARS).collect();
            format!("Explain: {}?", prefix.trim())
        }
    }
}

/// Render a study note: title, summary, and the flashcards as Q/A sections.
pub fn render_markdown(title: &str, summary: &Summary, flashcards: &FlashcardSet) -> String {
    let mut md = format!("# {}\n\n## Summary\n\n", title.trim());

    if summary.is_empty() {
        md.push_str("_No summary: the notes were empty._\n");
    } else {
        md.push_str(&summary.text);
        md.push('\n');
    }

    md.push_str("\n## Flashcards\n");
    if flashcards.provenance == Provenance::Fallback {
        md.push_str("\n> Generated by the sentence-based fallback");
        if let Some(ref reason) = flashcards.fallback_reason {
            md.push_str(&format!(": {reason}"));
        }
        md.push('\n');
    }
    if flashcards.is_empty() {
        md.push_str("\n_No flashcards could be generated._\n");
    }
    for (i, card) in flashcards.cards.iter().enumerate() {
        md.push_str(&format!("\n### {}. {}\n\n{}\n", i + 1, card.question, card.answer));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Flashcard;

    #[test]
    fn key_term_question() {
        let q = question(QuestionStyle::KeyTerm, "Photosynthesis", "ignored");
        assert_eq!(q, "What does the text say about Photosynthesis?");
    }

    #[test]
    fn explain_question_truncates() {
        let sentence = "a".repeat(100);
        let q = question(QuestionStyle::Explain, "ignored", &sentence);
        assert_eq!(q, format!("Explain: {}?", "a".repeat(60)));
    }

    #[test]
    fn markdown_lists_cards_in_order() {
        let summary = Summary {
            text: "Cells divide.".into(),
            sentences: vec!["Cells divide".into()],
            source_sentences: 1,
        };
        let set = FlashcardSet {
            cards: vec![
                Flashcard::new("Q one?", "A one.").unwrap(),
                Flashcard::new("Q two?", "A two.").unwrap(),
            ],
            ..FlashcardSet::default()
        };
        let md = render_markdown("Biology", &summary, &set);
        assert!(md.starts_with("# Biology\n"));
        assert!(md.contains("Cells divide."));
        let one = md.find("### 1. Q one?").unwrap();
        let two = md.find("### 2. Q two?").unwrap();
        assert!(one < two);
        assert!(!md.contains("fallback"));
    }

    #[test]
    fn markdown_flags_fallback() {
        let set = FlashcardSet {
            provenance: Provenance::Fallback,
            fallback_reason: Some("bad json".into()),
            ..FlashcardSet::default()
        };
        let md = render_markdown("Notes", &Summary::default(), &set);
        assert!(md.contains("fallback: bad json"));
        assert!(md.contains("No flashcards"));
    }
}
