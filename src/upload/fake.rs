// ABOUTME: In-memory HostingApi used by the pipeline's unit tests.
// ABOUTME: Records every manifest and upload and can be told to reject calls.

use crate::hosting::{HostingApi, HostingError, Manifest, PopulateFilesResponse};
use crate::types::{BearerToken, Digest, UploadBase, VersionHandle};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Default)]
struct Records {
    manifests: Vec<Manifest>,
    uploads: Vec<Digest>,
}

#[derive(Clone)]
pub struct FakeApi {
    /// `None` means every submitted digest is required.
    required: Option<HashSet<Digest>>,
    populate_status: Option<u16>,
    upload_status: Option<u16>,
    upload_url: String,
    records: Arc<Mutex<Records>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            required: None,
            populate_status: None,
            upload_status: None,
            upload_url: "https://upload.test/v".to_string(),
            records: Arc::default(),
        }
    }
}

impl FakeApi {
    pub fn requiring(digests: impl IntoIterator<Item = Digest>) -> Self {
        Self {
            required: Some(digests.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn rejecting_populate(status: u16) -> Self {
        Self {
            populate_status: Some(status),
            ..Self::default()
        }
    }

    pub fn rejecting_uploads(status: u16) -> Self {
        Self {
            upload_status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_upload_url(url: &str) -> Self {
        Self {
            upload_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn manifests(&self) -> Vec<Manifest> {
        self.records.lock().manifests.clone()
    }

    pub fn uploaded_digests(&self) -> Vec<Digest> {
        self.records.lock().uploads.clone()
    }
}

#[async_trait]
impl HostingApi for FakeApi {
    async fn populate_files(
        &self,
        _token: &BearerToken,
        version: &VersionHandle,
        manifest: &Manifest,
    ) -> Result<PopulateFilesResponse, HostingError> {
        self.records.lock().manifests.push(manifest.clone());

        if let Some(status) = self.populate_status {
            return Err(HostingError::Status {
                url: version.to_string(),
                status,
                body: "rejected".to_string(),
            });
        }

        let submitted: HashSet<Digest> = manifest.iter().map(|(_, d)| d.clone()).collect();
        let required = match &self.required {
            Some(required) => submitted.intersection(required).cloned().collect(),
            None => submitted.into_iter().collect(),
        };

        Ok(PopulateFilesResponse {
            upload_url: self.upload_url.clone(),
            upload_required_hashes: required,
        })
    }

    async fn upload_blob(
        &self,
        _token: &BearerToken,
        upload_base: &UploadBase,
        digest: &Digest,
        _blob: Bytes,
    ) -> Result<(), HostingError> {
        if let Some(status) = self.upload_status {
            return Err(HostingError::Status {
                url: upload_base.to_string(),
                status,
                body: "rejected".to_string(),
            });
        }
        self.records.lock().uploads.push(digest.clone());
        Ok(())
    }
}
