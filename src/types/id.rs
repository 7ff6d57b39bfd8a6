// ABOUTME: Phantom-typed remote endpoints for compile-time type safety.
// ABOUTME: Prevents passing an upload base where a version handle is expected.

use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use url::Url;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum VersionMarker {}
pub enum UploadMarker {}

/// A remote URL tagged with the kind of resource it addresses.
///
/// The hosting API hands out several opaque URLs (the version resource, the
/// per-version upload base). They are all plain URLs on the wire, so the
/// marker keeps them apart inside the program.
#[must_use = "endpoints address remote resources and should not be ignored"]
pub struct Endpoint<T> {
    url: Url,
    _marker: PhantomData<T>,
}

impl<T> Endpoint<T> {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            _marker: PhantomData,
        }
    }

    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        Url::parse(value).map(Self::new)
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Append a raw suffix to this endpoint, e.g. `:populateFiles` or `/<digest>`.
    ///
    /// A trailing slash on the endpoint is dropped first so the suffix never
    /// produces an empty path segment.
    pub fn with_suffix(&self, suffix: &str) -> Result<Url, url::ParseError> {
        let base = self.url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{suffix}"))
    }
}

// Manual trait implementations that don't require T to implement the trait.

impl<T> std::fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url.as_str())
            .finish()
    }
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Endpoint<T> {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl<T> Eq for Endpoint<T> {}

impl<T> Hash for Endpoint<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl<T> std::fmt::Display for Endpoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// URL of a remote deployment version, e.g. `.../sites/s/versions/v`.
pub type VersionHandle = Endpoint<VersionMarker>;
/// Base URL that per-digest upload targets are resolved against.
pub type UploadBase = Endpoint<UploadMarker>;
