//! Structured flashcard payloads: parse what an upstream generator produced.
//!
//! Generators that are asked for JSON routinely wrap it in a ```` ```json ````
//! fence, use `q`/`a` or `front`/`back` instead of `question`/`answer`, or
//! return an object with a `flashcards` array instead of a bare array. Those
//! shapes are accepted. Anything that still fails to parse is reported as a
//! [`PayloadError`] so the synthesizer can fall back; nothing here panics.

use crate::error::PayloadError;
use crate::output::Flashcard;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\n(.*)\n```\s*$").unwrap());

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(alias = "q", alias = "front")]
    question: String,
    #[serde(alias = "a", alias = "back")]
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayload {
    List(Vec<RawCard>),
    Wrapped {
        #[serde(alias = "cards")]
        flashcards: Vec<RawCard>,
    },
}

impl RawPayload {
    fn into_cards(self) -> Vec<RawCard> {
        match self {
            RawPayload::List(cards) => cards,
            RawPayload::Wrapped { flashcards } => flashcards,
        }
    }
}

/// Parse a structured payload into at most `count` valid flashcards.
///
/// Entries with a blank side, identical sides, or an exact duplicate of an
/// earlier entry are dropped. Returns an error when the payload does not
/// parse, or when nothing usable is left; usability is judged before
/// truncating, so `count == 0` still validates the payload.
pub fn parse_payload(payload: &str, count: usize) -> Result<Vec<Flashcard>, PayloadError> {
    let body = strip_code_fence(payload);
    let raw: RawPayload =
        serde_json::from_str(body).map_err(|e| PayloadError::Malformed {
            detail: e.to_string(),
        })?;

    let entries = raw.into_cards();
    let total = entries.len();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut cards: Vec<Flashcard> = entries
        .into_iter()
        .filter_map(|raw| Flashcard::new(raw.question, raw.answer))
        .filter(|card| seen.insert((card.question.clone(), card.answer.clone())))
        .collect();

    if cards.is_empty() {
        return Err(PayloadError::NoUsableCards { entries: total });
    }
    cards.truncate(count);
    Ok(cards)
}

fn strip_code_fence(input: &str) -> &str {
    let trimmed = input.trim();
    match RE_OUTER_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let cards = parse_payload(
            r#"[{"question": "What is ATP?", "answer": "The cell's energy currency."}]"#,
            5,
        )
        .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is ATP?");
    }

    #[test]
    fn parses_wrapped_object_with_aliases() {
        let payload = r#"{"cards": [{"front": "Q1?", "back": "A1."}, {"q": "Q2?", "a": "A2."}]}"#;
        let cards = parse_payload(payload, 5).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].answer, "A2.");
    }

    #[test]
    fn strips_json_fence() {
        let payload = "```json\n[{\"question\": \"Q?\", \"answer\": \"A.\"}]\n```";
        assert_eq!(parse_payload(payload, 1).unwrap().len(), 1);
    }

    #[test]
    fn truncates_to_count() {
        let payload = r#"[{"q":"1?","a":"one"},{"q":"2?","a":"two"},{"q":"3?","a":"three"}]"#;
        let cards = parse_payload(payload, 2).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "2?");
    }

    #[test]
    fn drops_invalid_and_duplicate_entries() {
        let payload = r#"[
            {"q": "", "a": "orphan answer"},
            {"q": "same", "a": "same"},
            {"q": "Keep?", "a": "Yes."},
            {"q": "Keep?", "a": "Yes."}
        ]"#;
        let cards = parse_payload(payload, 10).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn zero_count_still_validates() {
        assert_eq!(parse_payload(r#"[{"q":"1?","a":"one"}]"#, 0).unwrap(), vec![]);
        assert!(parse_payload("{not json", 0).is_err());
        assert!(parse_payload("[]", 0).is_err());
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = parse_payload(r#"[{"question": "What is ATP?", "answer": "#, 3).unwrap_err();
        assert!(matches!(err, PayloadError::Malformed { .. }));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_payload(r#"{"title": "not flashcards"}"#, 3).unwrap_err();
        assert!(matches!(err, PayloadError::Malformed { .. }));
    }

    #[test]
    fn nothing_usable_is_reported() {
        let err = parse_payload("[]", 3).unwrap_err();
        assert_eq!(err, PayloadError::NoUsableCards { entries: 0 });
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
    }
}
