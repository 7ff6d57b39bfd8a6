// ABOUTME: reqwest-backed client for the Firebase Hosting REST API.
// ABOUTME: Creates versions, negotiates manifests, and uploads blobs.

use super::api::{HostingApi, Manifest, PopulateFilesRequest, PopulateFilesResponse};
use super::error::{
    ClientSnafu, HostingError, InvalidUrlSnafu, MalformedResponseSnafu, StatusSnafu,
    TransportSnafu, VersionNotCreatedSnafu,
};
use crate::types::{BearerToken, Digest, SiteName, UploadBase, VersionHandle};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use url::Url;

/// Management API root used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://firebasehosting.googleapis.com/v1beta1";

const USER_AGENT: &str = concat!("speedy-deploy/", env!("CARGO_PKG_VERSION"));

/// Status the service reports for a freshly created version.
const VERSION_CREATED: &str = "CREATED";

/// HTTP client for one hosting API root.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HostingClient {
    http: reqwest::Client,
    api_base: Url,
}

#[derive(Debug, Deserialize)]
struct CreateVersionResponse {
    name: String,
    status: String,
}

impl HostingClient {
    pub fn new(api_base: Url) -> Result<Self, HostingError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context(ClientSnafu)?;
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// The underlying HTTP client, for calls outside the hosting API.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Create a new version of `site` with the given serving config.
    ///
    /// Returns the version handle that files are later populated into.
    pub async fn create_version(
        &self,
        token: &BearerToken,
        site: &SiteName,
        serving_config: &serde_json::Value,
    ) -> Result<VersionHandle, HostingError> {
        let base = self.api_base.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}/sites/{site}/versions")).context(InvalidUrlSnafu)?;

        tracing::debug!(%url, "creating version");
        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token.secret())
            .json(&serde_json::json!({ "config": serving_config }))
            .send()
            .await
            .context(TransportSnafu { url: url.as_str() })?;

        let created: CreateVersionResponse = read_json(&url, response).await?;
        if created.status != VERSION_CREATED {
            return VersionNotCreatedSnafu {
                status: created.status,
            }
            .fail();
        }

        VersionHandle::parse(&format!("{base}/{}", created.name)).context(InvalidUrlSnafu)
    }
}

#[async_trait]
impl HostingApi for HostingClient {
    async fn populate_files(
        &self,
        token: &BearerToken,
        version: &VersionHandle,
        manifest: &Manifest,
    ) -> Result<PopulateFilesResponse, HostingError> {
        let url = version
            .with_suffix(":populateFiles")
            .context(InvalidUrlSnafu)?;

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token.secret())
            .json(&PopulateFilesRequest { files: manifest })
            .send()
            .await
            .context(TransportSnafu { url: url.as_str() })?;

        read_json(&url, response).await
    }

    async fn upload_blob(
        &self,
        token: &BearerToken,
        upload_base: &UploadBase,
        digest: &Digest,
        blob: Bytes,
    ) -> Result<(), HostingError> {
        let url = upload_base
            .with_suffix(&format!("/{}", digest.path_segment()))
            .context(InvalidUrlSnafu)?;

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token.secret())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(blob)
            .send()
            .await
            .context(TransportSnafu { url: url.as_str() })?;

        ensure_success(&url, response).await?;
        Ok(())
    }
}

/// Fail with the status and body text unless the response is a 2xx.
async fn ensure_success(
    url: &Url,
    response: reqwest::Response,
) -> Result<reqwest::Response, HostingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    StatusSnafu {
        url: url.as_str(),
        status: status.as_u16(),
        body,
    }
    .fail()
}

async fn read_json<T: DeserializeOwned>(
    url: &Url,
    response: reqwest::Response,
) -> Result<T, HostingError> {
    let response = ensure_success(url, response).await?;
    let body = response
        .bytes()
        .await
        .context(TransportSnafu { url: url.as_str() })?;

    serde_json::from_slice(&body).map_err(|e| {
        MalformedResponseSnafu {
            url: url.as_str(),
            reason: e.to_string(),
        }
        .build()
    })
}
