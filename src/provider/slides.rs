//! Deck sinks: publish a summary and its flashcards as a slide deck.
//!
//! The local sink writes `presentation_<id>.json` with the same slide layout
//! the remote sink builds in Google Slides: one title slide per card, the
//! question as title and the answer as body.

use crate::error::StudyError;
use crate::output::{Deck, PublishedDeck};
use crate::provider::http_client;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const SLIDES_API: &str = "https://slides.googleapis.com/v1/presentations";

/// Where decks go.
#[derive(Debug, Clone)]
pub enum DeckSink {
    Local { output_dir: PathBuf },
    Remote { token: String, timeout_secs: u64 },
}

#[derive(Debug, Serialize)]
struct LocalPresentation<'a> {
    id: &'a str,
    title: &'a str,
    summary: &'a str,
    provenance: String,
    slides: Vec<LocalSlide<'a>>,
}

#[derive(Debug, Serialize)]
struct LocalSlide<'a> {
    title: &'a str,
    body: &'a str,
}

impl DeckSink {
    pub async fn publish(&self, deck: &Deck) -> Result<PublishedDeck, StudyError> {
        match self {
            DeckSink::Local { output_dir } => publish_local(output_dir, deck).await,
            DeckSink::Remote {
                token,
                timeout_secs,
            } => publish_remote(token, *timeout_secs, deck).await,
        }
    }
}

/// Suffixed ids tried after the timestamp id before giving up.
const MAX_ID_ATTEMPTS: usize = 1000;

async fn publish_local(output_dir: &Path, deck: &Deck) -> Result<PublishedDeck, StudyError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let base_id = millis.to_string();

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| StudyError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
    let dir = tokio::fs::canonicalize(output_dir)
        .await
        .map_err(|e| StudyError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let owned = deck.clone();
    let (deck_id, path) =
        tokio::task::spawn_blocking(move || write_new_deck(&dir, &base_id, &owned))
            .await
            .map_err(|e| StudyError::Internal(format!("Deck writer panicked: {e}")))??;

    info!("Wrote deck {} to {}", deck_id, path.display());
    Ok(PublishedDeck {
        deck_id,
        url: path.display().to_string(),
    })
}

/// Claim the first free `presentation_<id>.json` (`<id>`, `<id>_1`, `<id>_2`,
/// …) and write the deck into it. An existing deck is never replaced.
fn write_new_deck(dir: &Path, base_id: &str, deck: &Deck) -> Result<(String, PathBuf), StudyError> {
    for attempt in 0..MAX_ID_ATTEMPTS {
        let deck_id = if attempt == 0 {
            base_id.to_string()
        } else {
            format!("{base_id}_{attempt}")
        };
        let path = dir.join(format!("presentation_{deck_id}.json"));
        let body = presentation_json(&deck_id, deck)?;

        match write_atomic_new(&path, &body) {
            Ok(()) => return Ok((deck_id, path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("{} already exists, trying next id", path.display());
            }
            Err(e) => return Err(StudyError::OutputWriteFailed { path, source: e }),
        }
    }
    Err(StudyError::Internal(format!(
        "no free deck id for {base_id} after {MAX_ID_ATTEMPTS} attempts"
    )))
}

fn presentation_json(deck_id: &str, deck: &Deck) -> Result<Vec<u8>, StudyError> {
    let presentation = LocalPresentation {
        id: deck_id,
        title: &deck.title,
        summary: &deck.summary,
        provenance: deck.flashcards.provenance.to_string(),
        slides: deck
            .flashcards
            .cards
            .iter()
            .map(|c| LocalSlide {
                title: &c.question,
                body: &c.answer,
            })
            .collect(),
    };
    serde_json::to_vec_pretty(&presentation)
        .map_err(|e| StudyError::Internal(format!("Failed to serialise deck: {e}")))
}

/// Temp file in the destination directory, then link it into place. Fails
/// with `AlreadyExists` instead of overwriting.
fn write_atomic_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

async fn publish_remote(
    token: &str,
    timeout_secs: u64,
    deck: &Deck,
) -> Result<PublishedDeck, StudyError> {
    let publish_err = |reason: String| StudyError::Publish {
        title: deck.title.clone(),
        reason,
    };
    let client = http_client(timeout_secs)?;

    info!("Creating Google Slides presentation '{}'", deck.title);
    let created: Value = send_json(
        client
            .post(SLIDES_API)
            .bearer_auth(token)
            .json(&json!({ "title": deck.title })),
    )
    .await
    .map_err(publish_err)?;
    let deck_id = created
        .get("presentationId")
        .and_then(Value::as_str)
        .ok_or_else(|| publish_err("response had no presentationId".into()))?
        .to_string();

    let requests = slide_requests(deck);
    if !requests.is_empty() {
        debug!("Adding {} slide requests to {}", requests.len(), deck_id);
        send_json(
            client
                .post(format!("{SLIDES_API}/{deck_id}:batchUpdate"))
                .bearer_auth(token)
                .json(&json!({ "requests": requests })),
        )
        .await
        .map_err(publish_err)?;
    }

    Ok(PublishedDeck {
        url: format!("https://docs.google.com/presentation/d/{deck_id}/edit"),
        deck_id,
    })
}

async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, String> {
    let response = request.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("HTTP {status}: {}", body.trim()));
    }
    response.json().await.map_err(|e| e.to_string())
}

/// `batchUpdate` requests: one TITLE_AND_BODY slide per card, then the text.
fn slide_requests(deck: &Deck) -> Vec<Value> {
    let mut requests = Vec::with_capacity(deck.flashcards.len() * 3);
    for (i, card) in deck.flashcards.cards.iter().enumerate() {
        let slide_id = format!("card_{i}");
        let title_id = format!("card_{i}_title");
        let body_id = format!("card_{i}_body");
        requests.push(json!({
            "createSlide": {
                "objectId": slide_id,
                "slideLayoutReference": { "predefinedLayout": "TITLE_AND_BODY" },
                "placeholderIdMappings": [
                    { "layoutPlaceholder": { "type": "TITLE" }, "objectId": title_id },
                    { "layoutPlaceholder": { "type": "BODY" }, "objectId": body_id }
                ]
            }
        }));
        requests.push(json!({ "insertText": { "objectId": title_id, "text": card.question } }));
        requests.push(json!({ "insertText": { "objectId": body_id, "text": card.answer } }));
    }
    requests
}
