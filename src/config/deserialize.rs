// ABOUTME: Custom serde deserializers for firebase.json.
// ABOUTME: Accepts the hosting section as a single object or a list of per-site objects.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One hosting entry of firebase.json.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostingEntry {
    #[serde(default)]
    pub site: Option<String>,

    #[serde(default)]
    pub public: Option<String>,

    /// Everything else, including the serving config forwarded to the API.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostingSection {
    Single(HostingEntry),
    Multiple(Vec<HostingEntry>),
}

pub fn deserialize_hosting<'de, D>(deserializer: D) -> Result<Vec<HostingEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let section: Option<HostingSection> = Option::deserialize(deserializer)?;
    Ok(match section {
        None => Vec::new(),
        Some(HostingSection::Single(entry)) => vec![entry],
        Some(HostingSection::Multiple(entries)) => entries,
    })
}
