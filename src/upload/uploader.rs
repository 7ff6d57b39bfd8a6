// ABOUTME: Uploads the blobs a negotiation marked as required.
// ABOUTME: Each required digest is sent at most once; everything else is skipped.

use super::error::PipelineError;
use super::negotiate::Negotiation;
use crate::hosting::HostingApi;
use crate::types::{BearerToken, Digest};
use bytes::Bytes;
use std::collections::HashMap;

/// Compressed blobs of one sub-batch, keyed by digest.
pub type BlobCache = HashMap<Digest, Bytes>;

/// Counts from one sub-batch's upload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: usize,
    pub skipped: usize,
}

/// Upload every cached blob whose digest the service asked for.
///
/// Stops at the first failed upload. Required digests with no cached blob are
/// logged and ignored.
pub async fn upload_required<A>(
    api: &A,
    token: &BearerToken,
    negotiation: &Negotiation,
    cache: &BlobCache,
) -> Result<UploadOutcome, PipelineError>
where
    A: HostingApi + ?Sized,
{
    let mut outcome = UploadOutcome::default();

    for (digest, blob) in cache {
        if !negotiation.is_required(digest) {
            outcome.skipped += 1;
            continue;
        }

        tracing::debug!(%digest, bytes = blob.len(), "uploading blob");
        api.upload_blob(token, &negotiation.upload_base, digest, blob.clone())
            .await
            .map_err(|source| PipelineError::Upload {
                digest: digest.clone(),
                source,
            })?;
        outcome.uploaded += 1;
    }

    for digest in negotiation
        .required
        .iter()
        .filter(|d| !cache.contains_key(*d))
    {
        tracing::warn!(%digest, "service requested a digest outside this sub-batch");
    }

    Ok(outcome)
}
