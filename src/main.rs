//! s3cache - CI build cache on S3
//!
//! CLI entry point: loads configuration, sets up logging and runs one
//! cache request.

use clap::Parser;
use s3cache::cli::{Cli, LogFormat};
use s3cache::config::ConfigManager;
use s3cache::error::CacheResult;
use s3cache::ui;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&e.to_string(), e.hint());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    init_logging(cli.verbose, format);
    debug!("Using config {}", config_manager.path().display());

    s3cache::cli::execute(&cli, &config).await?;
    Ok(())
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug; RUST_LOG wins
fn init_logging(verbose: u8, format: LogFormat) {
    let level = match verbose {
        0 => "s3cache=warn",
        1 => "s3cache=info",
        _ => "s3cache=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
