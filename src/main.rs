// ABOUTME: Entry point for the speedy-deploy CLI application.
// ABOUTME: Parses arguments, runs the deploy, and maps the outcome to an exit code.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use speedy_deploy::config::DeployConfig;
use speedy_deploy::error::Result;
use speedy_deploy::output::Output;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(&cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = DeployConfig::resolve(cli.deploy_options(), &cwd)?;
    commands::deploy(config, output).await
}
