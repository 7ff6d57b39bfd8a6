// ABOUTME: Content hashing for deduplication.
// ABOUTME: Gzips file bytes deterministically and digests the compressed output.

use super::error::PipelineError;
use crate::types::Digest;
use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;

/// A compressed blob together with its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedBlob {
    pub digest: Digest,
    pub compressed: Bytes,
}

/// Compress `raw` and digest the compressed bytes.
///
/// The gzip header carries no file name and a zero mtime, so equal input
/// always yields equal output.
pub fn hash_content(raw: &[u8]) -> std::io::Result<HashedBlob> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
    encoder.write_all(raw)?;
    let compressed = encoder.finish()?;

    Ok(HashedBlob {
        digest: Digest::of(&compressed),
        compressed: Bytes::from(compressed),
    })
}

/// Read the file at `path` and hash it off the async threads.
pub async fn hash_file(path: &Path) -> Result<HashedBlob, PipelineError> {
    let raw = tokio::fs::read(path).await.map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let compressed = tokio::task::spawn_blocking(move || hash_content(&raw))
        .await
        .map_err(std::io::Error::other)
        .and_then(|result| result);

    compressed.map_err(|source| PipelineError::Compression {
        path: path.to_path_buf(),
        source,
    })
}
