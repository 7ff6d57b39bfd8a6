// ABOUTME: The HostingApi trait and wire types for the two-phase upload protocol.
// ABOUTME: populateFiles negotiates missing digests; upload_blob sends one blob.

use super::error::HostingError;
use crate::types::{BearerToken, Digest, UploadBase, VersionHandle};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Remote operations the upload pipeline needs from the hosting service.
///
/// Implementations must be cheap to clone: every worker gets its own copy.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Submit a manifest for a version and learn which digests are missing.
    async fn populate_files(
        &self,
        token: &BearerToken,
        version: &VersionHandle,
        manifest: &Manifest,
    ) -> Result<PopulateFilesResponse, HostingError>;

    /// Upload one compressed blob to its digest-specific location.
    async fn upload_blob(
        &self,
        token: &BearerToken,
        upload_base: &UploadBase,
        digest: &Digest,
        blob: Bytes,
    ) -> Result<(), HostingError>;
}

/// Mapping from site path to digest for one sub-batch.
///
/// Paths are unique; inserting a path twice keeps the latest digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, Digest>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, digest: Digest) {
        self.0.insert(path.into(), digest);
    }

    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.0.get(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Digest> {
        self.0.iter()
    }
}

/// Request body of `POST {version}:populateFiles`.
#[derive(Debug, Serialize)]
pub(crate) struct PopulateFilesRequest<'a> {
    pub files: &'a Manifest,
}

/// Response body of `POST {version}:populateFiles`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PopulateFilesResponse {
    pub upload_url: String,
    /// Omitted by the service when nothing needs uploading.
    #[serde(default)]
    pub upload_required_hashes: Vec<Digest>,
}
