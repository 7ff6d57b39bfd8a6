// ABOUTME: The hosting section of firebase.json.
// ABOUTME: Picks the entry for the target site and extracts the API serving config.

use super::deserialize::{HostingEntry, deserialize_hosting};
use crate::error::{Error, Result};
use crate::types::SiteName;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Keys of a hosting entry that the versions API understands as serving config.
/// Everything else (`public`, `ignore`, `predeploy`, ...) is CLI-only.
pub const SERVING_KEYS: &[&str] = &[
    "headers",
    "redirects",
    "rewrites",
    "cleanUrls",
    "trailingSlashBehavior",
    "i18n",
    "appAssociation",
];

#[derive(Debug, Deserialize)]
struct FirebaseJson {
    #[serde(default, deserialize_with = "deserialize_hosting")]
    hosting: Vec<HostingEntry>,
}

/// Hosting settings for the site being deployed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostingConfig {
    /// Deploy root relative to the target directory.
    pub public: Option<PathBuf>,
    serving: Map<String, Value>,
}

impl HostingConfig {
    /// Parse firebase.json content and select the entry for `site`.
    ///
    /// With several entries, the one whose `site` matches wins; otherwise the
    /// first. No hosting section at all yields an empty config.
    pub fn from_json(json: &str, site: &SiteName) -> std::result::Result<Self, serde_json::Error> {
        let parsed: FirebaseJson = serde_json::from_str(json)?;

        let mut entries = parsed.hosting;
        if entries.is_empty() {
            return Ok(Self::default());
        }
        let index = entries
            .iter()
            .position(|e| e.site.as_deref() == Some(site.as_str()))
            .unwrap_or(0);
        let entry = entries.swap_remove(index);

        let serving = entry
            .rest
            .into_iter()
            .filter(|(key, _)| SERVING_KEYS.contains(&key.as_str()))
            .collect();

        Ok(Self {
            public: entry.public.map(PathBuf::from),
            serving,
        })
    }

    pub fn load(path: &Path, site: &SiteName) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Self::from_json(&content, site).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The `config` body sent when creating a version.
    pub fn serving_config(&self) -> Value {
        Value::Object(self.serving.clone())
    }

    /// Directory whose files are deployed.
    pub fn deploy_root(&self, target: &Path) -> PathBuf {
        match &self.public {
            Some(public) => target.join(public),
            None => target.to_path_buf(),
        }
    }
}
