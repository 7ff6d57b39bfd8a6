// ABOUTME: Dedup negotiation: submit a sub-batch manifest, learn which blobs are missing.
// ABOUTME: The required-digest set returned here is the only dedup decision point.

use super::error::PipelineError;
use crate::hosting::{HostingApi, HostingError, Manifest};
use crate::types::{BearerToken, Digest, UploadBase, VersionHandle};
use std::collections::HashSet;

/// What the service told us about one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    /// Base that per-digest upload locations are resolved against.
    pub upload_base: UploadBase,
    /// Digests the service does not have yet.
    pub required: HashSet<Digest>,
}

impl Negotiation {
    pub fn is_required(&self, digest: &Digest) -> bool {
        self.required.contains(digest)
    }
}

/// Submit `manifest` to the version's populateFiles endpoint.
pub async fn negotiate<A>(
    api: &A,
    token: &BearerToken,
    version: &VersionHandle,
    manifest: &Manifest,
) -> Result<Negotiation, PipelineError>
where
    A: HostingApi + ?Sized,
{
    let response = api
        .populate_files(token, version, manifest)
        .await
        .map_err(PipelineError::Negotiation)?;

    let upload_base = UploadBase::parse(&response.upload_url).map_err(|e| {
        PipelineError::Negotiation(HostingError::MalformedResponse {
            url: version.to_string(),
            reason: format!("invalid uploadUrl {:?}: {e}", response.upload_url),
        })
    })?;

    let required: HashSet<Digest> = response.upload_required_hashes.into_iter().collect();
    tracing::debug!(
        files = manifest.len(),
        required = required.len(),
        "manifest negotiated"
    );

    Ok(Negotiation {
        upload_base,
        required,
    })
}
