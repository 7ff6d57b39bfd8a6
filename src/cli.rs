// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Maps flags and environment variables onto DeployOptions.

use clap::Parser;
use speedy_deploy::config::DeployOptions;
use speedy_deploy::hosting::DEFAULT_API_URL;
use speedy_deploy::output::OutputMode;
use speedy_deploy::upload::BatchSize;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "speedy-deploy")]
#[command(about = "Deploy a static site to Firebase Hosting, uploading only new content")]
#[command(version)]
pub struct Cli {
    /// Service-account key file used to obtain an access token
    #[arg(short = 's', long, value_name = "PATH")]
    pub service_account: Option<PathBuf>,

    /// Raw access token (takes precedence over the service account)
    #[arg(short, long, env = "FIREBASE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory containing firebase.json (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Hosting site to deploy to
    #[arg(short = 'n', long, env = "FIREBASE_SITE")]
    pub site_name: Option<String>,

    /// Number of parallel upload workers (defaults to the CPU count)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,

    /// Maximum files per negotiated sub-batch (1-1000)
    #[arg(long, value_parser = parse_batch_size)]
    pub batch_size: Option<BatchSize>,

    /// Hosting API root
    #[arg(long, env = "FIREBASE_HOSTING_API", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print only the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }

    pub fn deploy_options(&self) -> DeployOptions {
        DeployOptions {
            site_name: self.site_name.clone(),
            target: self.target.clone(),
            token: self.token.clone(),
            service_account: self.service_account.clone(),
            api_url: Some(self.api_url.clone()),
            workers: self.workers,
            batch_size: self.batch_size,
        }
    }
}

fn parse_batch_size(value: &str) -> Result<BatchSize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("not a number: {value}"))?;
    BatchSize::new(size).map_err(|e| e.to_string())
}
