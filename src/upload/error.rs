// ABOUTME: Error types for the upload pipeline.
// ABOUTME: PipelineError fails one worker; UploadError is the coordinator's aggregate failure.

use crate::hosting::HostingError;
use crate::types::Digest;
use std::path::PathBuf;
use thiserror::Error;

/// A failure inside a worker's sub-batch loop. Always fatal to the worker.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to compress {path}: {source}")]
    Compression {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest negotiation failed: {0}")]
    Negotiation(#[source] HostingError),

    #[error("failed to upload blob {digest}: {source}")]
    Upload { digest: Digest, source: HostingError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    Io,
    Compression,
    Negotiation,
    Upload,
}

impl PipelineError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Io { .. } => PipelineErrorKind::Io,
            PipelineError::Compression { .. } => PipelineErrorKind::Compression,
            PipelineError::Negotiation(_) => PipelineErrorKind::Negotiation,
            PipelineError::Upload { .. } => PipelineErrorKind::Upload,
        }
    }
}

/// Aggregate failure of a parallel upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("worker {worker} failed: {source}")]
    WorkerFailed {
        worker: usize,
        source: PipelineError,
    },

    #[error("worker {worker} stopped without reporting a result")]
    WorkerAborted { worker: usize },
}

impl UploadError {
    /// Index of the worker whose failure decided the outcome.
    pub fn worker(&self) -> usize {
        match self {
            UploadError::WorkerFailed { worker, .. } | UploadError::WorkerAborted { worker } => {
                *worker
            }
        }
    }

    /// The pipeline error, if the worker reported one.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            UploadError::WorkerFailed { source, .. } => Some(source),
            UploadError::WorkerAborted { .. } => None,
        }
    }
}
