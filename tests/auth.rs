// ABOUTME: Integration tests for credential acquisition.
// ABOUTME: Exchanges a service-account assertion against the mock token endpoint.

mod support;

use speedy_deploy::auth::{AuthError, CredentialSource, HOSTING_SCOPE};
use std::path::{Path, PathBuf};
use support::mock_hosting::{Behavior, MINTED_TOKEN, MockHosting};

const PRIVATE_KEY: &str = include_str!("fixtures/test_key.pem");

fn write_key(dir: &Path, token_uri: &str) -> PathBuf {
    let key = serde_json::json!({
        "type": "service_account",
        "project_id": "demo",
        "client_email": "deployer@demo.iam.gserviceaccount.com",
        "private_key": PRIVATE_KEY,
        "token_uri": token_uri,
    });
    let path = dir.join("service-account.json");
    std::fs::write(&path, key.to_string()).unwrap();
    path
}

#[tokio::test]
async fn service_account_is_exchanged_for_access_token() {
    support::init_tracing();
    let mock = MockHosting::start(Behavior::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let source = CredentialSource::ServiceAccount(write_key(dir.path(), &mock.token_url()));

    let token = source.acquire(&reqwest::Client::new()).await.unwrap();

    assert_eq!(token.secret(), MINTED_TOKEN);
    let requests = mock.token_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].get("grant_type").map(String::as_str),
        Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    );
    // A compact JWS has three dot-separated parts.
    let assertion = &requests[0]["assertion"];
    assert_eq!(assertion.split('.').count(), 3);
}

#[tokio::test]
async fn rejected_exchange_reports_status() {
    let mock = MockHosting::start(Behavior {
        token_status: 401,
        ..Behavior::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let source = CredentialSource::ServiceAccount(write_key(dir.path(), &mock.token_url()));

    let err = source.acquire(&reqwest::Client::new()).await.unwrap_err();

    assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
}

#[tokio::test]
async fn malformed_key_file_is_rejected_before_any_request() {
    let mock = MockHosting::start(Behavior::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service-account.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = CredentialSource::ServiceAccount(path)
        .acquire(&reqwest::Client::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::KeyFormat { .. }));
    assert!(mock.token_requests().is_empty());
}

#[test]
fn hosting_scope_is_requested() {
    assert!(HOSTING_SCOPE.contains("firebase.hosting"));
}
