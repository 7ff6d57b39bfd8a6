// ABOUTME: Application-wide error types for speedy-deploy.
// ABOUTME: Uses thiserror; kind() groups variants into the user-facing failure classes.

use crate::auth::AuthError;
use crate::hosting::HostingError;
use crate::upload::UploadError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("site name must be provided (--site-name or FIREBASE_SITE)")]
    MissingSiteName,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("failed to create version: {0}")]
    Version(#[source] HostingError),

    #[error("hosting client error: {0}")]
    Hosting(#[from] HostingError),

    #[error("failed to list files under {path}: {source}")]
    Enumerate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure class for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid site/target settings.
    Config,
    /// The HTTP client for the hosting API could not be set up.
    Client,
    /// No usable credential.
    Auth,
    /// The remote version could not be created.
    Version,
    /// Local file system failure outside the upload pipeline.
    Io,
    /// A worker failed during the upload.
    Upload,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigNotFound(_)
            | Error::ConfigParse { .. }
            | Error::MissingSiteName
            | Error::InvalidConfig(_) => ErrorKind::Config,
            Error::Hosting(_) => ErrorKind::Client,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Version(_) => ErrorKind::Version,
            Error::Enumerate { .. } | Error::Io(_) => ErrorKind::Io,
            Error::Upload(_) => ErrorKind::Upload,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
