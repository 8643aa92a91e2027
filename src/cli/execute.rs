//! Turns parsed arguments and config into a request and runs it

use crate::cli::args::Cli;
use crate::config::Config;
use crate::error::{CacheError, CacheResult};
use crate::pipeline::{CachePipeline, Outcome};
use crate::request::{Action, CacheRequest};
use crate::store::S3Store;
use crate::ui::{self, TaskSpinner, UiContext};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Execute the requested cache action against S3
pub async fn execute(cli: &Cli, config: &Config) -> CacheResult<Outcome> {
    let request = build_request(cli, config)?;
    let root = resolve_workdir(cli, config)?;
    debug!("Working directory: {}", root.display());

    let ctx = UiContext::detect().with_quiet(cli.json);
    let store = S3Store::from_config(&config.s3).await;
    let pipeline = CachePipeline::new(store, root);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&progress_message(&request));
    let result = pipeline.execute(&request).await;
    spinner.clear();

    let outcome = result?;
    if cli.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        ui::report_outcome(&ctx, &request, &outcome);
    }
    Ok(outcome)
}

/// Merge CLI values over config values and validate the request
pub fn build_request(cli: &Cli, config: &Config) -> CacheResult<CacheRequest> {
    let action: Action = cli.action.parse()?;

    let bucket = cli
        .bucket
        .clone()
        .or_else(|| config.s3.bucket.clone())
        .ok_or(CacheError::ConfigMissing("bucket"))?;

    let storage_class = cli
        .storage_class
        .clone()
        .or_else(|| config.s3.storage_class.clone());

    CacheRequest::new(action, bucket, cli.key.clone(), storage_class, &cli.artifacts)
}

/// Directory relative paths resolve against: flag, then config, then cwd
pub fn resolve_workdir(cli: &Cli, config: &Config) -> CacheResult<PathBuf> {
    if let Some(dir) = &cli.workdir {
        return Ok(dir.clone());
    }
    if let Some(dir) = &config.general.workdir {
        return Ok(PathBuf::from(dir));
    }
    env::current_dir().map_err(|e| CacheError::io("getting current directory", e))
}

fn progress_message(request: &CacheRequest) -> String {
    let object = format!("s3://{}/{}", request.bucket, request.object_key());
    match request.action {
        Action::Store => format!("Saving cache to {}...", object),
        Action::Restore => format!("Restoring cache from {}...", object),
        Action::Purge => format!("Purging {}...", object),
    }
}
