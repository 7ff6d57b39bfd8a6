// ABOUTME: Firebase Hosting REST API surface used by the deploy pipeline.
// ABOUTME: Exposes the HostingApi seam and its reqwest-backed implementation.

mod api;
mod client;
mod error;

pub use api::{HostingApi, Manifest, PopulateFilesResponse};
pub use client::{DEFAULT_API_URL, HostingClient};
pub use error::{HostingError, HostingErrorKind};
