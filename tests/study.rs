//! Integration tests for study-buddy.
//!
//! The property tests run the public core functions over a small corpus of
//! notes. The orchestration tests drive `run_study` end to end against local
//! collaborators only (token file and deck directory in a temp dir), so no
//! network access is needed.
//!
//! Run with:
//!   cargo test --test study -- --nocapture

use study_buddy::{
    generate_flashcards, generate_flashcards_with, render_markdown, run_study, summarize,
    FlashcardInput, FlashcardOptions, FlashcardSource, Provenance, QuestionStyle, StudyConfig,
    StudyError,
};
use std::path::Path;

// ── Test helpers ─────────────────────────────────────────────────────────────

const CORPUS: &[&str] = &[
    "The cat sat. It was tired. The sun set.",
    "Photosynthesis converts light into energy.",
    "Mitochondria produce ATP, which powers the cell. ATP stores chemical energy! \
     Cells need energy to divide? Division happens in phases. Mitosis is one of them.",
    "Although water is common, it has unusual properties. Water expands when it freezes. \
     Ice floats on water. Hydrogen bonds explain this; they also raise the boiling point.",
    "no punctuation at all in this fragment of notes",
    "Repeat this. Repeat this. Repeat this. Something new appears here.",
    "   \n\n  Messy   whitespace\teverywhere.\nNew line sentence.   ",
    "A. B. C. It. Is. So.",
];

fn normalise(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Route library logs through the test harness; `RUST_LOG=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn local_config(dir: &Path) -> StudyConfig {
    StudyConfig::builder()
        .token_path(dir.join("token.json"))
        .output_dir(dir.join("decks"))
        .max_sentences(3)
        .flashcard_count(4)
        .build()
        .unwrap()
}

// ── Core properties ──────────────────────────────────────────────────────────

#[test]
fn summary_examples() {
    assert_eq!(
        summarize("The cat sat. It was tired. The sun set.", 2).text,
        "The cat sat. The sun set."
    );
}

#[test]
fn flashcard_example() {
    let set = generate_flashcards("Photosynthesis converts light into energy.", 1);
    assert_eq!(set.len(), 1);
    assert!(set.cards[0].question.contains("Photosynthesis"));
    assert_eq!(set.cards[0].answer, "Photosynthesis converts light into energy.");
}

#[test]
fn summaries_are_bounded_ordered_substrings() {
    for text in CORPUS {
        let flat = normalise(text);
        for k in 0..6 {
            let summary = summarize(text, k);
            assert!(summary.len() <= k, "[{text}] k={k} got {}", summary.len());

            let mut cursor = 0usize;
            for sentence in &summary.sentences {
                let found = flat[cursor..]
                    .find(sentence.as_str())
                    .unwrap_or_else(|| panic!("[{text}] {sentence:?} missing or out of order"));
                cursor += found + sentence.len();
            }
        }
    }
}

#[test]
fn empty_text_gives_empty_results() {
    for k in 0..5 {
        assert!(summarize("", k).is_empty());
        assert!(generate_flashcards("", k).is_empty());
    }
}

#[test]
fn zero_cards_always_empty() {
    for text in CORPUS {
        assert!(generate_flashcards(text, 0).is_empty());
    }
}

#[test]
fn every_card_is_well_formed_and_bounded() {
    for text in CORPUS {
        for n in [1, 3, 10] {
            let set = generate_flashcards(text, n);
            assert!(set.len() <= n);
            for card in &set.cards {
                assert!(!card.question.trim().is_empty(), "[{text}] blank question");
                assert!(!card.answer.trim().is_empty(), "[{text}] blank answer");
                assert_ne!(card.question, card.answer);
            }
        }
    }
}

#[test]
fn never_padded_past_available_sentences() {
    let set = generate_flashcards("Atoms bond. Ions carry charge.", 10);
    assert_eq!(set.len(), 2);
    let set = generate_flashcards("Repeat this. Repeat this. Repeat this.", 5);
    assert!(set.len() <= 1);
}

#[test]
fn results_are_idempotent() {
    for text in CORPUS {
        assert_eq!(summarize(text, 2), summarize(text, 2));
        assert_eq!(generate_flashcards(text, 3), generate_flashcards(text, 3));
    }
}

#[test]
fn invalid_payloads_fall_back_without_panicking() {
    let payloads = [
        "",
        "null",
        "{",
        "[{\"question\": \"Q\"}]",
        "```json\n[{\"question\": \"Truncated",
        "[{\"question\": \"Same\", \"answer\": \"Same\"}]",
        "{\"flashcards\": 42}",
        "\u{0}\u{1}binary",
    ];
    for payload in payloads {
        let set = generate_flashcards_with(
            FlashcardInput::Structured {
                payload,
                notes: CORPUS[2],
            },
            3,
            &FlashcardOptions::default(),
        );
        assert_eq!(set.provenance, Provenance::Fallback, "payload {payload:?}");
        assert!(set.fallback_reason.is_some());
        assert!(set.len() <= 3);
    }
}

#[test]
fn fenced_payload_is_repaired() {
    let payload = "```json\n{\"cards\": [{\"front\": \"What is ATP?\", \"back\": \"Energy currency.\"}]}\n```";
    let set = generate_flashcards_with(
        FlashcardInput::Structured {
            payload,
            notes: CORPUS[2],
        },
        3,
        &FlashcardOptions::default(),
    );
    assert_eq!(set.provenance, Provenance::Synthesized);
    assert_eq!(set.cards[0].answer, "Energy currency.");
}

#[test]
fn explain_style_uses_sentence_prefix() {
    let options = FlashcardOptions {
        style: QuestionStyle::Explain,
        ..FlashcardOptions::default()
    };
    let set = generate_flashcards_with(FlashcardInput::Text(CORPUS[3]), 2, &options);
    for card in &set.cards {
        assert!(card.question.starts_with("Explain: "));
        assert!(card.question.ends_with('?'));
    }
}

#[test]
fn concurrent_calls_match_single_threaded_results() {
    let expected: Vec<_> = CORPUS
        .iter()
        .map(|text| (summarize(text, 2), generate_flashcards(text, 3)))
        .collect();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|offset| {
                scope.spawn(move || {
                    // Each thread walks the corpus from a different start.
                    (0..CORPUS.len())
                        .map(|i| {
                            let idx = (i + offset) % CORPUS.len();
                            let text = CORPUS[idx];
                            (idx, summarize(text, 2), generate_flashcards(text, 3))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for worker in workers {
            for (idx, summary, cards) in worker.join().unwrap() {
                assert_eq!(summary, expected[idx].0, "summary differs for {:?}", CORPUS[idx]);
                assert_eq!(cards, expected[idx].1, "cards differ for {:?}", CORPUS[idx]);
            }
        }
    });
}

// ── Orchestration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn run_study_with_local_notes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, CORPUS[3]).unwrap();
    let config = local_config(dir.path());

    let output = run_study(Some(notes.to_str().unwrap()), None, &config)
        .await
        .unwrap();

    assert_eq!(output.source, notes.to_str().unwrap());
    assert!(output.summary.len() <= 3);
    assert!(!output.flashcards.is_empty());
    assert!(output.flashcards.len() <= 4);
    assert_eq!(output.stats.flashcards, output.flashcards.len());
    assert_eq!(output.stats.input_chars, CORPUS[3].chars().count());

    // Placeholder token written; deck file exists where the URL says.
    assert!(dir.path().join("token.json").exists());
    let deck: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output.deck.url).unwrap()).unwrap();
    assert_eq!(deck["summary"], output.summary.text.as_str());
    assert_eq!(
        deck["slides"].as_array().unwrap().len(),
        output.flashcards.len()
    );
}

#[tokio::test]
async fn run_study_missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());
    let missing = dir.path().join("absent.txt");

    let err = run_study(Some(missing.to_str().unwrap()), None, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::DocumentNotFound { .. }));
}

#[tokio::test]
async fn run_study_default_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    let output = run_study(None, None, &config).await.unwrap();
    assert!(
        output.source == "sample_document.txt" || output.source == "bundled sample notes",
        "got {}",
        output.source
    );
    assert!(!output.summary.is_empty());
}

#[tokio::test]
async fn run_study_payload_fallback_and_summary_source() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, CORPUS[2]).unwrap();
    let config = StudyConfig::builder()
        .token_path(dir.path().join("token.json"))
        .output_dir(dir.path())
        .max_sentences(2)
        .flashcard_count(10)
        .flashcard_source(FlashcardSource::Summary)
        .build()
        .unwrap();

    let output = run_study(Some(notes.to_str().unwrap()), Some("{broken"), &config)
        .await
        .unwrap();
    assert!(output.flashcards.is_fallback());
    // Cards drawn from a two-sentence summary.
    assert!(output.flashcards.len() <= 2);

    let md = render_markdown(&config.deck_title, &output.summary, &output.flashcards);
    assert!(md.contains("fallback"));
}

#[tokio::test]
async fn remote_slides_without_token_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, CORPUS[0]).unwrap();
    let config = StudyConfig::builder()
        .token_path(dir.path().join("token.json"))
        .output_dir(dir.path())
        .remote_slides(true)
        .build()
        .unwrap();

    let err = run_study(Some(notes.to_str().unwrap()), None, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Publish { .. }));
}
