// ABOUTME: Content digest used as the deduplication key for uploaded blobs.
// ABOUTME: Standard base64 of the SHA-256 of a blob's compressed bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

/// Length in bytes of the raw SHA-256 output.
const DIGEST_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDigestError {
    #[error("digest is not valid base64: {0}")]
    NotBase64(String),

    #[error("digest decodes to {0} bytes, expected 32")]
    WrongLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(String);

impl Digest {
    /// Digest of already-compressed blob bytes.
    pub fn of(compressed: &[u8]) -> Self {
        use sha2::Digest as _;
        let hash = Sha256::digest(compressed);
        Self(STANDARD.encode(hash))
    }

    pub fn parse(value: &str) -> Result<Self, ParseDigestError> {
        let raw = STANDARD
            .decode(value)
            .map_err(|e| ParseDigestError::NotBase64(e.to_string()))?;
        if raw.len() != DIGEST_LEN {
            return Err(ParseDigestError::WrongLength(raw.len()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest encoded as a single URL path segment.
    ///
    /// Base64 output may contain `/` and `+`, so both are percent-encoded.
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Digest::parse(&value).map_err(serde::de::Error::custom)
    }
}
