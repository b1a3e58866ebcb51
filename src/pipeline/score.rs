//! Sentence scoring shared by the summarizer and the flashcard synthesizer.
//!
//! A sentence's score is a weighted sum of three signals, each in `[0, 1]`:
//!
//! | Signal   | Formula | Intent |
//! |----------|---------|--------|
//! | position | `1 - i / n` | notes front-load key claims |
//! | length   | `r` if `r ≤ 1`, else `1 / r`, with `r = words / mean words` | penalise fragments and run-ons |
//! | keyword  | `Σ freq(w) / max_freq` over pool words, divided by word count | coarse information density |
//!
//! The keyword pool is the `keyword_pool` most frequent content words of the
//! whole text. Frequency ties are broken by first occurrence, so the pool,
//! and therefore every score, is independent of hash iteration order.

use crate::config::ScoringOptions;
use crate::pipeline::segment::{split_words, Sentence};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Content-word frequencies for a whole text plus its keyword pool.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    frequencies: HashMap<String, usize>,
    pool: HashMap<String, usize>,
    max_pool_freq: usize,
}

impl KeywordTable {
    /// Count content words in `text` and keep the `pool_size` most frequent.
    pub fn from_text(text: &str, pool_size: usize) -> Self {
        // word → (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (pos, word) in split_words(text).into_iter().enumerate() {
            if !word.is_content() {
                continue;
            }
            counts
                .entry(word.norm)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, pos));
        }

        let mut ranked: Vec<(&String, usize, usize)> = counts
            .iter()
            .map(|(word, &(count, first))| (word, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let pool: HashMap<String, usize> = ranked
            .iter()
            .take(pool_size)
            .map(|(word, count, _)| ((*word).clone(), *count))
            .collect();
        let max_pool_freq = ranked.first().map(|(_, count, _)| *count).unwrap_or(0);

        let frequencies = counts
            .into_iter()
            .map(|(word, (count, _))| (word, count))
            .collect();

        Self {
            frequencies,
            pool,
            max_pool_freq,
        }
    }

    /// How often a lowercased content word occurs in the text (0 if never).
    pub fn frequency(&self, norm: &str) -> usize {
        self.frequencies.get(norm).copied().unwrap_or(0)
    }

    pub fn in_pool(&self, norm: &str) -> bool {
        self.pool.contains_key(norm)
    }

    /// Keyword-density signal for one sentence, in `[0, 1]`.
    pub fn density(&self, sentence: &Sentence) -> f64 {
        if sentence.words.is_empty() || self.max_pool_freq == 0 {
            return 0.0;
        }
        let max = self.max_pool_freq as f64;
        let weight: f64 = sentence
            .words
            .iter()
            .filter_map(|w| self.pool.get(&w.norm))
            .map(|&freq| freq as f64 / max)
            .sum();
        weight / sentence.words.len() as f64
    }
}

/// Score every sentence. `text` is the full source the sentences came from.
///
/// Returns one score per sentence, in sentence order.
pub fn score_sentences(text: &str, sentences: &[Sentence], options: &ScoringOptions) -> Vec<f64> {
    let table = KeywordTable::from_text(text, options.keyword_pool);
    score_with_table(&table, sentences, options)
}

/// Like [`score_sentences`] but reusing an existing [`KeywordTable`].
pub fn score_with_table(
    table: &KeywordTable,
    sentences: &[Sentence],
    options: &ScoringOptions,
) -> Vec<f64> {
    let n = sentences.len();
    if n == 0 {
        return Vec::new();
    }
    let total_words: usize = sentences.iter().map(Sentence::word_count).sum();
    let mean_words = total_words as f64 / n as f64;
    let w = options.weights;

    sentences
        .iter()
        .map(|s| {
            let position = 1.0 - s.index as f64 / n as f64;
            let length = length_signal(s.word_count(), mean_words);
            let keyword = table.density(s);
            w.position * position + w.length * length + w.keyword * keyword
        })
        .collect()
}

/// Sentence indices ordered best-first: higher score wins, earlier position
/// breaks ties.
pub fn rank(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| match scores[b].total_cmp(&scores[a]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });
    order
}

fn length_signal(words: usize, mean_words: f64) -> f64 {
    if words == 0 || mean_words <= 0.0 {
        return 0.0;
    }
    let ratio = words as f64 / mean_words;
    if ratio <= 1.0 {
        ratio
    } else {
        1.0 / ratio
    }
}
