// ABOUTME: Deploy configuration assembled once from CLI options and firebase.json.
// ABOUTME: Produces an immutable DeployConfig that is passed by value to the pipeline.

mod deserialize;
mod hosting;

pub use hosting::{HostingConfig, SERVING_KEYS};

use crate::auth::CredentialSource;
use crate::error::{Error, Result};
use crate::hosting::DEFAULT_API_URL;
use crate::types::{BearerToken, SiteName};
use crate::upload::{BatchSize, UploadSettings};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use url::Url;

pub const FIREBASE_CONFIG_FILENAME: &str = "firebase.json";
pub const DEFAULT_SERVICE_ACCOUNT: &str = "service-account.json";

/// Raw, unvalidated deploy options as supplied by the user.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub site_name: Option<String>,
    pub target: Option<PathBuf>,
    pub token: Option<String>,
    pub service_account: Option<PathBuf>,
    pub api_url: Option<String>,
    pub workers: Option<NonZeroUsize>,
    pub batch_size: Option<BatchSize>,
}

/// Everything a deploy needs, validated.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub site: SiteName,
    /// Directory holding firebase.json.
    pub target: PathBuf,
    pub hosting: HostingConfig,
    pub credentials: CredentialSource,
    pub api_url: Url,
    pub upload: UploadSettings,
}

impl DeployConfig {
    /// Validate `options`, resolving relative paths against `cwd`.
    pub fn resolve(options: DeployOptions, cwd: &Path) -> Result<Self> {
        let site_name = options.site_name.ok_or(Error::MissingSiteName)?;
        let site = SiteName::new(&site_name)
            .map_err(|e| Error::InvalidConfig(format!("site name {site_name:?}: {e}")))?;

        let target = match options.target {
            Some(target) => cwd.join(target),
            None => cwd.to_path_buf(),
        };
        if !target.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "target {} is not a directory",
                target.display()
            )));
        }

        let hosting = HostingConfig::load(&target.join(FIREBASE_CONFIG_FILENAME), &site)?;

        // A raw token wins over any service-account key.
        let credentials = match options.token {
            Some(token) if !token.is_empty() => CredentialSource::Token(BearerToken::new(token)),
            _ => CredentialSource::ServiceAccount(cwd.join(
                options
                    .service_account
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT)),
            )),
        };

        let api_url = options.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let api_url = Url::parse(api_url)
            .map_err(|e| Error::InvalidConfig(format!("API URL {api_url:?}: {e}")))?;

        let defaults = UploadSettings::default();
        let upload = UploadSettings {
            workers: options.workers.unwrap_or(defaults.workers),
            batch_size: options.batch_size.unwrap_or(defaults.batch_size),
        };

        Ok(Self {
            site,
            target,
            hosting,
            credentials,
            api_url,
            upload,
        })
    }

    /// Directory whose files are deployed.
    pub fn deploy_root(&self) -> PathBuf {
        self.hosting.deploy_root(&self.target)
    }

    /// Files that must never be published, even if they sit in the deploy root.
    pub fn excluded_paths(&self) -> Vec<PathBuf> {
        let mut excluded = vec![self.target.join(FIREBASE_CONFIG_FILENAME)];
        if let CredentialSource::ServiceAccount(path) = &self.credentials {
            excluded.push(path.clone());
        }
        excluded
    }
}
