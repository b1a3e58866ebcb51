//! Authorization: produce an opaque capability for the remote collaborators.

use crate::error::StudyError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Token value written when no token file exists yet.
pub const PLACEHOLDER_TOKEN: &str = "placeholder";

/// What an [`AuthProvider`] hands back.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A real bearer token usable against the remote APIs.
    Bearer(String),
    /// No usable token; only local collaborators will work.
    Placeholder,
}

impl Credentials {
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Credentials::Bearer(token) => Some(token),
            Credentials::Placeholder => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Credentials::Placeholder => f.write_str("Placeholder"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    created: bool,
}

/// Source of credentials.
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// JSON token file (`{"access_token": "..."}`). A missing file is
    /// created with a placeholder token.
    TokenFile(PathBuf),
    /// A bearer token supplied directly, e.g. from the environment.
    Static(String),
}

impl AuthProvider {
    pub async fn authorize(&self) -> Result<Credentials, StudyError> {
        match self {
            AuthProvider::Static(token) if token.trim().is_empty() => Err(StudyError::Auth {
                detail: "access token is blank".into(),
            }),
            AuthProvider::Static(token) => Ok(Credentials::Bearer(token.trim().to_string())),
            AuthProvider::TokenFile(path) => authorize_from_file(path).await,
        }
    }
}

async fn authorize_from_file(path: &Path) -> Result<Credentials, StudyError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            write_placeholder(path).await?;
            info!("No token at {}, wrote placeholder credentials", path.display());
            return Ok(Credentials::Placeholder);
        }
        Err(e) => {
            return Err(StudyError::Auth {
                detail: format!("cannot read {}: {e}", path.display()),
            })
        }
    };

    let token: TokenFile = serde_json::from_str(&raw).map_err(|e| StudyError::Auth {
        detail: format!("malformed token file {}: {e}", path.display()),
    })?;

    if token.access_token.trim().is_empty() || token.access_token == PLACEHOLDER_TOKEN {
        debug!("Token file {} holds a placeholder", path.display());
        return Ok(Credentials::Placeholder);
    }
    Ok(Credentials::Bearer(token.access_token))
}

async fn write_placeholder(path: &Path) -> Result<(), StudyError> {
    let body = serde_json::to_string(&TokenFile {
        access_token: PLACEHOLDER_TOKEN.to_string(),
        created: true,
    })
    .map_err(|e| StudyError::Internal(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StudyError::OutputWriteFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|e| StudyError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}
