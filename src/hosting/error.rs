// ABOUTME: Hosting API error types with SNAFU pattern.
// ABOUTME: Separates transport failures, HTTP status failures, and bad payloads.

use snafu::Snafu;

/// Errors returned by calls to the hosting API.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HostingError {
    #[snafu(display("failed to build HTTP client: {source}"))]
    Client { source: reqwest::Error },

    #[snafu(display("invalid request URL: {source}"))]
    InvalidUrl { source: url::ParseError },

    #[snafu(display("request to {url} failed: {source}"))]
    Transport { url: String, source: reqwest::Error },

    #[snafu(display("{url} returned HTTP {status}: {body}"))]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[snafu(display("malformed response from {url}: {reason}"))]
    MalformedResponse { url: String, reason: String },

    #[snafu(display("version was not created (status {status})"))]
    VersionNotCreated { status: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostingErrorKind {
    /// The request never produced a response.
    Transport,
    /// The service answered with a non-success status.
    Rejected,
    /// The service answered with a body we could not use.
    Malformed,
}

impl HostingError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> HostingErrorKind {
        match self {
            HostingError::Client { .. }
            | HostingError::InvalidUrl { .. }
            | HostingError::Transport { .. } => HostingErrorKind::Transport,
            HostingError::Status { .. } | HostingError::VersionNotCreated { .. } => {
                HostingErrorKind::Rejected
            }
            HostingError::MalformedResponse { .. } => HostingErrorKind::Malformed,
        }
    }

    /// Returns the HTTP status if the service rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            HostingError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
