//! Document stores: fetch note text by identifier.

use crate::error::StudyError;
use crate::provider::http_client;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

const DOCS_API: &str = "https://docs.googleapis.com/v1/documents";

/// Outcome of a lookup that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLookup {
    Found(String),
    NotFound,
}

/// Where notes are fetched from.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    /// Identifiers are file-system paths to UTF-8 text.
    Local,
    /// Identifiers are Google Docs document IDs.
    Remote { token: String, timeout_secs: u64 },
}

impl DocumentStore {
    /// Label used in logs and [`crate::output::StudyOutput::source`].
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStore::Local => "local",
            DocumentStore::Remote { .. } => "google-docs",
        }
    }

    pub async fn fetch_text(&self, identifier: &str) -> Result<DocumentLookup, StudyError> {
        match self {
            DocumentStore::Local => fetch_local(identifier).await,
            DocumentStore::Remote {
                token,
                timeout_secs,
            } => fetch_remote(identifier, token, *timeout_secs).await,
        }
    }
}

async fn fetch_local(identifier: &str) -> Result<DocumentLookup, StudyError> {
    let path = PathBuf::from(identifier);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let text = String::from_utf8(bytes).map_err(|e| StudyError::DocumentUnavailable {
                identifier: identifier.to_string(),
                reason: format!("not valid UTF-8: {e}"),
            })?;
            debug!("Read {} bytes from {}", text.len(), path.display());
            Ok(DocumentLookup::Found(text))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DocumentLookup::NotFound),
        Err(e) => Err(StudyError::DocumentUnavailable {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        }),
    }
}

async fn fetch_remote(
    document_id: &str,
    token: &str,
    timeout_secs: u64,
) -> Result<DocumentLookup, StudyError> {
    info!("Fetching Google Doc {}", document_id);
    let unavailable = |reason: String| StudyError::DocumentUnavailable {
        identifier: document_id.to_string(),
        reason,
    };

    let url = document_url(document_id).map_err(unavailable)?;
    let client = http_client(timeout_secs)?;
    let response = client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(DocumentLookup::NotFound);
    }
    if !response.status().is_success() {
        return Err(unavailable(format!("HTTP {}", response.status())));
    }

    let doc: Value = response
        .json()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    Ok(DocumentLookup::Found(extract_text_from_doc(&doc)))
}

/// `documents/<id>` with the id as one percent-encoded path segment, so a
/// path-like identifier cannot address another endpoint.
fn document_url(document_id: &str) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(DOCS_API).map_err(|e| e.to_string())?;
    url.path_segments_mut()
        .map_err(|()| format!("{DOCS_API} cannot take path segments"))?
        .push(document_id);
    Ok(url)
}

/// Concatenate every text run of a Google Docs document resource.
pub fn extract_text_from_doc(doc: &Value) -> String {
    let mut text = String::new();
    let Some(content) = doc.pointer("/body/content").and_then(Value::as_array) else {
        return text;
    };
    for element in content {
        let Some(runs) = element
            .pointer("/paragraph/elements")
            .and_then(Value::as_array)
        else {
            continue;
        };
        for run in runs {
            if let Some(s) = run.pointer("/textRun/content").and_then(Value::as_str) {
                text.push_str(s);
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn local_found_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Cells divide.").unwrap();

        let store = DocumentStore::Local;
        let found = store.fetch_text(path.to_str().unwrap()).await.unwrap();
        assert_eq!(found, DocumentLookup::Found("Cells divide.".into()));

        let missing = dir.path().join("absent.txt");
        let lookup = store.fetch_text(missing.to_str().unwrap()).await.unwrap();
        assert_eq!(lookup, DocumentLookup::NotFound);
    }

    #[tokio::test]
    async fn local_non_utf8_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = DocumentStore::Local
            .fetch_text(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::DocumentUnavailable { .. }));
    }

    #[test]
    fn document_id_is_one_encoded_segment() {
        let url = document_url("notes/../missing file.txt").unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.googleapis.com/v1/documents/notes%2F..%2Fmissing%20file.txt"
        );
        assert_eq!(
            document_url("1AbC-xyz_09").unwrap().as_str(),
            "https://docs.googleapis.com/v1/documents/1AbC-xyz_09"
        );
    }

    #[test]
    fn extracts_text_runs_in_order() {
        let doc = json!({
            "title": "Notes",
            "body": {"content": [
                {"sectionBreak": {}},
                {"paragraph": {"elements": [
                    {"textRun": {"content": "Heat flows. "}},
                    {"textRun": {"content": "Entropy rises.\n"}}
                ]}},
                {"table": {}},
                {"paragraph": {"elements": [{"inlineObjectElement": {}}]}},
                {"paragraph": {"elements": [{"textRun": {"content": "Engines work.\n"}}]}}
            ]}
        });
        assert_eq!(
            extract_text_from_doc(&doc),
            "Heat flows. Entropy rises.\nEngines work.\n"
        );
    }

    #[test]
    fn empty_document_is_empty_text() {
        assert_eq!(extract_text_from_doc(&json!({"title": "Blank"})), "");
    }
}
