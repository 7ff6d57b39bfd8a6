// ABOUTME: Service-account JWT bearer flow for Google OAuth2.
// ABOUTME: Signs an RS256 assertion and trades it for an access token.

use super::error::AuthError;
use crate::types::BearerToken;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// OAuth2 scope for the Firebase Hosting management API.
pub const HOSTING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.hosting";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime of a signed assertion; the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account key file this tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str, path: &Path) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|source| AuthError::KeyFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|source| AuthError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    /// Build the signed assertion presented to the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: HOSTING_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges signed assertions for access tokens.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    http: reqwest::Client,
}

impl TokenExchange {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn exchange(&self, key: &ServiceAccountKey) -> Result<BearerToken, AuthError> {
        let assertion = key.assertion(Utc::now())?;
        let url = key.token_uri.clone();

        let response = self
            .http
            .post(&url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|source| AuthError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| AuthError::Transport {
                url: url.clone(),
                source,
            })?;
        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| AuthError::MalformedResponse {
                url,
                reason: e.to_string(),
            })?;

        Ok(BearerToken::new(token.access_token))
    }
}
