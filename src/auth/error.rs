// ABOUTME: Error types for credential acquisition.
// ABOUTME: Any of these aborts the deploy before work is distributed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read service account key {path}: {source}")]
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid service account key {path}: {source}")]
    KeyFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("token endpoint {url} returned HTTP {status}: {body}")]
    Rejected {
        url: String,
        status: u16,
        body: String,
    },

    #[error("token endpoint {url} returned an unusable response: {reason}")]
    MalformedResponse { url: String, reason: String },
}
