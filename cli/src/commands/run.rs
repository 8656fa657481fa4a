// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `run` subcommand: load a repository list, run every registered
//! check against it, and persist the results.

use crate::error::CliError;
use crate::output;
use clap::Args;
use repolizer_checks::loader::RepoListLoader;
use repolizer_core::batch::BatchRunner;
use repolizer_core::builtin_checks;
use repolizer_core::config::ConfigLoader;
use repolizer_core::registry::CheckRegistry;
use repolizer_core::snapshot::CancelSignal;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for `repolizer run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the repository list (JSON or YAML).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to a configuration file, overriding the platform default.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override where the output stream is written.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the number of repositories processed per sub-batch.
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Override the maximum number of checks running concurrently.
    #[arg(long)]
    pub max_concurrency: Option<u32>,

    /// Override the per-check timeout, in seconds.
    #[arg(long)]
    pub check_timeout_s: Option<u32>,

    /// Restrict the run to a comma-separated subset of category tags.
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<String>>,
}

/// Run a batch end to end: load input and configuration, build the
/// registry, execute, and persist. Returns `Err` for any condition the
/// spec's exit-code contract treats as non-zero (`spec.md` §6).
pub async fn execute(args: RunArgs, verbose: bool) -> Result<(), CliError> {
    let repo_list = RepoListLoader::new().load(&args.input)?;
    tracing::info!(count = repo_list.repositories.len(), "loaded repository list");

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load()?;

    if let Some(output) = args.output {
        config.output_path = output;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(max_concurrency) = args.max_concurrency {
        config.max_concurrency = max_concurrency;
    }
    if let Some(timeout) = args.check_timeout_s {
        config.check_timeout_s = timeout;
    }
    if let Some(categories) = args.categories {
        config.categories = categories;
    }
    config.validate_full()?;

    let registry = Arc::new(builtin_checks::register_all(CheckRegistry::builder()).build()?);
    let mut runner = BatchRunner::new(registry, &config)?;

    let cancel = CancelSignal::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("cancellation requested, finishing in-flight sub-batch");
            cancel_for_signal.cancel();
        }
    });

    let total = repo_list.repositories.len();
    let summary = runner.run(repo_list.repositories, cancel).await;

    if verbose {
        tracing::debug!(?summary.category_means, "per-category means");
    }
    output::display_batch_summary(&summary);

    if !summary.is_complete() {
        return Err(CliError::PartialCompletion { processed: summary.processed, total });
    }
    if summary.processed == 0 {
        return Err(CliError::NoRepositoriesProcessed);
    }
    Ok(())
}
