// ABOUTME: In-process HTTP mock of the Firebase Hosting and OAuth token endpoints.
// ABOUTME: Records every request so tests can assert on what went over the wire.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token the mock token endpoint hands out.
pub const MINTED_TOKEN: &str = "minted-token";

/// Which manifest digests the mock reports as missing.
#[derive(Debug, Clone)]
pub enum Required {
    All,
    None,
    Only(HashSet<String>),
}

/// How the mock answers each endpoint.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub required: Required,
    pub populate_status: u16,
    pub upload_status: u16,
    pub token_status: u16,
    pub version_status: &'static str,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            required: Required::All,
            populate_status: 200,
            upload_status: 200,
            token_status: 200,
            version_status: "CREATED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VersionRequest {
    pub site: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct PopulateRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub digest: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Default)]
struct Records {
    versions: Vec<VersionRequest>,
    populates: Vec<PopulateRequest>,
    uploads: Vec<UploadRequest>,
    token_requests: Vec<HashMap<String, String>>,
}

struct Shared {
    addr: SocketAddr,
    behavior: Behavior,
    records: Mutex<Records>,
}

/// A running mock server; shut down on drop.
pub struct MockHosting {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl MockHosting {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Arc::new(Shared {
            addr,
            behavior,
            records: Mutex::new(Records::default()),
        });

        let server = shared.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let shared = server.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(shared.clone(), req));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { shared, task }
    }

    /// Hosting API root to point the client at.
    pub fn api_url(&self) -> String {
        format!("http://{}/v1beta1", self.shared.addr)
    }

    /// Upload base the mock hands out from populateFiles.
    pub fn upload_url(&self) -> String {
        format!("http://{}/upload/files", self.shared.addr)
    }

    /// Token endpoint to put in a service-account key's `token_uri`.
    pub fn token_url(&self) -> String {
        format!("http://{}/token", self.shared.addr)
    }

    pub fn versions(&self) -> Vec<VersionRequest> {
        self.shared.records.lock().versions.clone()
    }

    pub fn populates(&self) -> Vec<PopulateRequest> {
        self.shared.records.lock().populates.clone()
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.shared.records.lock().uploads.clone()
    }

    pub fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.shared.records.lock().token_requests.clone()
    }

    /// Every path that was populated, across all sub-batches.
    pub fn populated_paths(&self) -> Vec<String> {
        self.populates()
            .into_iter()
            .flat_map(|p| p.files.into_keys())
            .collect()
    }

    /// Distinct digests named in any manifest.
    pub fn manifest_digests(&self) -> BTreeSet<String> {
        self.populates()
            .into_iter()
            .flat_map(|p| p.files.into_values())
            .collect()
    }
}

impl Drop for MockHosting {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    shared: Arc<Shared>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Ok(respond(400, "unreadable body")),
    };
    let path = parts.uri.path().to_string();
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header(AUTHORIZATION);
    let behavior = &shared.behavior;

    if path == "/token" {
        let form = url::form_urlencoded::parse(&body).into_owned().collect();
        shared.records.lock().token_requests.push(form);
        if behavior.token_status != 200 {
            return Ok(respond(behavior.token_status, "denied"));
        }
        return Ok(respond_json(json!({
            "access_token": MINTED_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
        })));
    }

    if let Some(digest) = path.strip_prefix("/upload/files/") {
        let digest = urlencoding::decode(digest)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| digest.to_string());
        shared.records.lock().uploads.push(UploadRequest {
            digest,
            content_type: header(CONTENT_TYPE),
            authorization,
            body,
        });
        return Ok(respond(behavior.upload_status, ""));
    }

    if path.ends_with(":populateFiles") {
        let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let files: BTreeMap<String, String> = parsed["files"]
            .as_object()
            .map(|files| {
                files
                    .iter()
                    .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let required: BTreeSet<String> = files
            .values()
            .filter(|digest| match &behavior.required {
                Required::All => true,
                Required::None => false,
                Required::Only(only) => only.contains(*digest),
            })
            .cloned()
            .collect();

        shared.records.lock().populates.push(PopulateRequest {
            path,
            authorization,
            files,
        });
        if behavior.populate_status != 200 {
            return Ok(respond(behavior.populate_status, "populate rejected"));
        }
        return Ok(respond_json(json!({
            "uploadUrl": format!("http://{}/upload/files", shared.addr),
            "uploadRequiredHashes": required,
        })));
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if let ["v1beta1", "sites", site, "versions"] = segments.as_slice() {
        let site = site.to_string();
        shared.records.lock().versions.push(VersionRequest {
            site: site.clone(),
            authorization,
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        return Ok(respond_json(json!({
            "name": format!("sites/{site}/versions/v1"),
            "status": behavior.version_status,
        })));
    }

    Ok(respond(404, "not found"))
}

fn respond(status: u16, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
}

fn respond_json(value: Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(value.to_string())));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, "application/json".parse().unwrap());
    response
}
