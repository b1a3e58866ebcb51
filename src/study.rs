//! Orchestrated study run: authorize, fetch notes, summarise, synthesise
//! flashcards, publish the deck.
//!
//! The core functions never fail on text input. Everything fatal here comes
//! from the collaborators in [`crate::provider`]:
//!
//! - an explicit source that no store can find is [`StudyError::DocumentNotFound`]
//! - a store that fails outright is [`StudyError::DocumentUnavailable`]
//! - a sink that rejects the deck is [`StudyError::Publish`]
//!
//! Authorization failures are not fatal: the run continues with placeholder
//! credentials and local collaborators only.

use crate::config::{FlashcardSource, StudyConfig};
use crate::engine::StudyEngine;
use crate::error::StudyError;
use crate::observe::ORCHESTRATOR;
use crate::output::{Deck, StudyOutput, StudyStats};
use crate::pipeline::flashcards::FlashcardInput;
use crate::provider::{AuthProvider, Credentials, DeckSink, DocumentLookup, DocumentStore};
use std::time::Instant;
use tracing::{debug, info, warn};

/// File looked up in the working directory when no source is given.
pub const DEFAULT_SOURCE: &str = "sample_document.txt";

/// Notes used when no source is given and [`DEFAULT_SOURCE`] is absent.
pub const BUNDLED_NOTES: &str = include_str!("../samples/sample_document.txt");

/// Label reported for [`BUNDLED_NOTES`].
pub const BUNDLED_LABEL: &str = "bundled sample notes";

/// Run the full study workflow.
///
/// # Arguments
/// * `source`  — file path or Google Docs ID; `None` uses the default notes
/// * `payload` — optional structured flashcard payload from an upstream
///   generator; if unusable the deck falls back to sentence-based cards
/// * `config`  — validated configuration
///
/// # Errors
/// Returns `Err(StudyError)` only when a collaborator fails fatally.
pub async fn run_study(
    source: Option<&str>,
    payload: Option<&str>,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    let total_start = Instant::now();
    info!(target: ORCHESTRATOR, source = source.unwrap_or(DEFAULT_SOURCE), "Study run started");
    if let Some(ref obs) = config.observer {
        obs.on_run_start(source.unwrap_or(DEFAULT_SOURCE));
    }

    // ── Step 1: Authorize ────────────────────────────────────────────────
    let creds = authorize(config).await;
    if config.remote_slides && creds.bearer().is_none() {
        return Err(StudyError::Publish {
            title: config.deck_title.clone(),
            reason: "remote slides need an access token; pass one or drop --remote-slides".into(),
        });
    }

    // ── Step 2: Fetch notes ──────────────────────────────────────────────
    let (label, notes) = resolve_notes(source, &creds, config).await?;
    let input_chars = notes.chars().count();
    info!(target: ORCHESTRATOR, source = %label, chars = input_chars, "Notes loaded");
    if let Some(ref obs) = config.observer {
        obs.on_document_loaded(&label, input_chars);
    }

    // ── Step 3: Summarise ────────────────────────────────────────────────
    let engine = StudyEngine::new(config.clone());
    let summary = engine.summarize(&notes);

    // ── Step 4: Flashcards ───────────────────────────────────────────────
    let card_text = match config.flashcard_source {
        FlashcardSource::Notes => notes.as_str(),
        FlashcardSource::Summary => summary.text.as_str(),
    };
    let input = match payload {
        Some(payload) => FlashcardInput::Structured {
            payload,
            notes: card_text,
        },
        None => FlashcardInput::Text(card_text),
    };
    let flashcards = engine.flashcards(input);

    // ── Step 5: Publish ──────────────────────────────────────────────────
    let sink = match creds.bearer() {
        Some(token) if config.remote_slides => DeckSink::Remote {
            token: token.to_string(),
            timeout_secs: config.http_timeout_secs,
        },
        _ => DeckSink::Local {
            output_dir: config.output_dir.clone(),
        },
    };
    let deck = Deck {
        title: config.deck_title.clone(),
        summary: summary.text.clone(),
        flashcards: flashcards.clone(),
    };
    let published = sink.publish(&deck).await?;
    info!(target: ORCHESTRATOR, deck_id = %published.deck_id, url = %published.url, "Deck published");
    if let Some(ref obs) = config.observer {
        obs.on_publish_complete(&published.deck_id, &published.url);
    }

    let stats = StudyStats {
        input_chars,
        source_sentences: summary.source_sentences,
        summary_chars: summary.text.chars().count(),
        flashcards: flashcards.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        target: ORCHESTRATOR,
        "Study run complete: {} summary sentences, {} flashcards, {}ms",
        summary.len(),
        stats.flashcards,
        stats.total_duration_ms
    );

    Ok(StudyOutput {
        source: label,
        summary,
        flashcards,
        deck: published,
        stats,
    })
}

/// Synchronous wrapper around [`run_study`].
///
/// Creates a temporary tokio runtime internally. Do not call from within an
/// existing async context; use [`run_study`] instead.
pub fn run_study_sync(
    source: Option<&str>,
    payload: Option<&str>,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| StudyError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run_study(source, payload, config))
}

async fn authorize(config: &StudyConfig) -> Credentials {
    let provider = match config.access_token {
        Some(ref token) => AuthProvider::Static(token.clone()),
        None => AuthProvider::TokenFile(config.token_path.clone()),
    };
    match provider.authorize().await {
        Ok(creds) => {
            debug!(target: ORCHESTRATOR, ?creds, "Authorization complete");
            creds
        }
        Err(e) => {
            warn!(target: ORCHESTRATOR, "{e}; continuing with placeholder credentials");
            Credentials::Placeholder
        }
    }
}

/// Stores to try, in order: local files first, then Google Docs when a real
/// token is available.
fn document_stores(creds: &Credentials, config: &StudyConfig) -> Vec<DocumentStore> {
    let mut stores = vec![DocumentStore::Local];
    if let Some(token) = creds.bearer() {
        stores.push(DocumentStore::Remote {
            token: token.to_string(),
            timeout_secs: config.http_timeout_secs,
        });
    }
    stores
}

async fn resolve_notes(
    source: Option<&str>,
    creds: &Credentials,
    config: &StudyConfig,
) -> Result<(String, String), StudyError> {
    let Some(identifier) = source else {
        return match DocumentStore::Local.fetch_text(DEFAULT_SOURCE).await {
            Ok(DocumentLookup::Found(text)) => Ok((DEFAULT_SOURCE.to_string(), text)),
            Ok(DocumentLookup::NotFound) => {
                info!(target: ORCHESTRATOR, "No {DEFAULT_SOURCE} in working directory, using {BUNDLED_LABEL}");
                Ok((BUNDLED_LABEL.to_string(), BUNDLED_NOTES.to_string()))
            }
            Err(e) => {
                warn!(target: ORCHESTRATOR, "{e}; using {BUNDLED_LABEL}");
                Ok((BUNDLED_LABEL.to_string(), BUNDLED_NOTES.to_string()))
            }
        };
    };

    for store in document_stores(creds, config) {
        match store.fetch_text(identifier).await? {
            DocumentLookup::Found(text) => {
                let label = match store {
                    DocumentStore::Local => identifier.to_string(),
                    DocumentStore::Remote { .. } => format!("{}:{identifier}", store.label()),
                };
                return Ok((label, text));
            }
            DocumentLookup::NotFound => {
                debug!(target: ORCHESTRATOR, store = store.label(), identifier, "Not found");
            }
        }
    }

    Err(StudyError::DocumentNotFound {
        identifier: identifier.to_string(),
    })
}
