//! Extractive summarisation: pick the highest-scoring sentences and put them
//! back in document order.
//!
//! ## Algorithm
//!
//! 1. Segment the notes ([`crate::pipeline::segment`]).
//! 2. Score each sentence ([`crate::pipeline::score`]).
//! 3. Walk sentences best-first, keeping up to `max_sentences` of them and,
//!    when a character budget is set, skipping any that would overflow it.
//! 4. Restore document order, render each sentence with a terminal period,
//!    and join with single spaces.
//!
//! When every sentence fits, scoring is skipped entirely and the summary is
//! the whole text, normalised.

use crate::config::SummaryOptions;
use crate::output::Summary;
use crate::pipeline::score::{rank, score_sentences};
use crate::pipeline::segment::{split_sentences, Sentence};

/// Summarise `text` into at most `max_sentences` sentences using the default
/// scoring weights.
///
/// Empty text, or `max_sentences == 0`, yields an empty summary.
///
/// # Example
/// ```rust
/// use study_buddy::summarize;
///
/// let summary = summarize("The cat sat. It was tired. The sun set.", 2);
/// assert_eq!(summary.text, "The cat sat. The sun set.");
/// ```
pub fn summarize(text: &str, max_sentences: usize) -> Summary {
    summarize_with(
        text,
        &SummaryOptions {
            max_sentences,
            ..SummaryOptions::default()
        },
    )
}

/// Summarise `text` with explicit options.
pub fn summarize_with(text: &str, options: &SummaryOptions) -> Summary {
    let sentences = split_sentences(text);
    let source_sentences = sentences.len();

    if sentences.is_empty() || options.max_sentences == 0 {
        return Summary {
            source_sentences,
            ..Summary::default()
        };
    }

    let all: Vec<usize> = (0..sentences.len()).collect();
    let selected = if options.max_sentences >= sentences.len()
        && within_budget(&sentences, &all, options.max_chars)
    {
        all
    } else {
        let scores = score_sentences(text, &sentences, &options.scoring);
        select(&sentences, &rank(&scores), options)
    };

    assemble(&sentences, &selected, source_sentences)
}

/// Greedy selection in rank order, returned in document order.
fn select(sentences: &[Sentence], ranked: &[usize], options: &SummaryOptions) -> Vec<usize> {
    let mut chosen = Vec::with_capacity(options.max_sentences.min(ranked.len()));
    let mut used_chars = 0usize;

    for &idx in ranked {
        if chosen.len() == options.max_sentences {
            break;
        }
        let len = rendered_len(&sentences[idx]);
        let needed = if chosen.is_empty() { len } else { len + 1 };
        if let Some(budget) = options.max_chars {
            if used_chars + needed > budget {
                continue;
            }
        }
        used_chars += needed;
        chosen.push(idx);
    }

    chosen.sort_unstable();
    chosen
}

fn within_budget(sentences: &[Sentence], indices: &[usize], max_chars: Option<usize>) -> bool {
    let Some(budget) = max_chars else {
        return true;
    };
    let total: usize = indices.iter().map(|&i| rendered_len(&sentences[i])).sum::<usize>()
        + indices.len().saturating_sub(1);
    total <= budget
}

fn rendered_len(sentence: &Sentence) -> usize {
    sentence.rendered().chars().count()
}

fn assemble(sentences: &[Sentence], selected: &[usize], source_sentences: usize) -> Summary {
    let picked: Vec<&Sentence> = selected.iter().map(|&i| &sentences[i]).collect();
    let text = picked
        .iter()
        .map(|s| s.rendered())
        .collect::<Vec<_>>()
        .join(" ");
    Summary {
        text,
        sentences: picked.iter().map(|s| s.text.clone()).collect(),
        source_sentences,
    }
}
