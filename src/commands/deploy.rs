// ABOUTME: Deploy command implementation.
// ABOUTME: Authenticates, creates a version, enumerates files, and runs the parallel upload.

use speedy_deploy::config::DeployConfig;
use speedy_deploy::error::{Error, Result};
use speedy_deploy::files::enumerate_files;
use speedy_deploy::hosting::HostingClient;
use speedy_deploy::output::Output;
use speedy_deploy::upload::Coordinator;

/// Deploy the configured site.
pub async fn deploy(config: DeployConfig, output: &mut Output) -> Result<()> {
    output.start_timer();

    let root = config.deploy_root();
    output.progress(&format!(
        "Deploying {} to site {}",
        root.display(),
        config.site
    ));

    let client = HostingClient::new(config.api_url.clone())?;

    output.progress("  → Acquiring access token...");
    let token = config.credentials.acquire(client.http()).await?;

    output.progress("  → Creating version...");
    let version = client
        .create_version(&token, &config.site, &config.hosting.serving_config())
        .await
        .map_err(Error::Version)?;
    tracing::info!(%version, "version created");

    output.progress("  → Listing files...");
    let files = enumerate_files(&root, &config.excluded_paths())
        .await
        .map_err(|source| Error::Enumerate {
            path: root.clone(),
            source,
        })?;
    if files.is_empty() {
        output.warning(&format!("no files found under {}", root.display()));
    }

    output.progress(&format!(
        "  → Uploading {} file(s) with up to {} worker(s)...",
        files.len(),
        config.upload.workers
    ));
    let summary = Coordinator::new(client, config.upload)
        .run(token, version.clone(), files)
        .await?;

    output.success(&format!("Deployed version {version}"), Some(&summary));
    Ok(())
}
