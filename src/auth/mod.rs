// ABOUTME: Credential acquisition for the hosting management API.
// ABOUTME: Accepts a raw bearer token or exchanges a service-account JWT for one.

mod error;
mod service_account;

pub use error::AuthError;
pub use service_account::{HOSTING_SCOPE, ServiceAccountKey, TokenExchange};

use crate::types::BearerToken;
use std::path::PathBuf;

/// Where the bearer token for this run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A pre-issued access token, used as-is.
    Token(BearerToken),
    /// A service-account key file to sign a token request with.
    ServiceAccount(PathBuf),
}

impl CredentialSource {
    /// Resolve the source to a bearer token.
    pub async fn acquire(&self, http: &reqwest::Client) -> Result<BearerToken, AuthError> {
        match self {
            CredentialSource::Token(token) => {
                tracing::debug!("using pre-issued access token");
                Ok(token.clone())
            }
            CredentialSource::ServiceAccount(path) => {
                tracing::debug!(path = %path.display(), "exchanging service-account key");
                let key = ServiceAccountKey::load(path)?;
                TokenExchange::new(http.clone()).exchange(&key).await
            }
        }
    }
}
