// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Batch Runner (`spec.md` §4.3, §5, supplemented from
//! `throttled_batch_processor.py`'s sub-batching and memory-throttle loop).
//!
//! Drains a list of repositories in fixed-size sub-batches, runs every
//! registered check against each repository in the sub-batch concurrently
//! (bounded by the [`ExecutionEngine`]'s own semaphore), folds the results
//! into a [`RepoReport`] per repository via the [`Aggregator`], appends each
//! report to the [`PersistenceWriter`] as soon as it's ready, and samples
//! memory between sub-batches. Cancellation is cooperative: once requested,
//! no new sub-batch starts, and repositories not yet dispatched are counted
//! as cancelled rather than silently dropped (`spec.md` §8 invariant 5,
//! "total accounting").

use crate::aggregate::{Aggregator, RepositoryIdentity};
use crate::config::EngineConfig;
use crate::engine::memory::MemoryMonitor;
use crate::engine::{EngineError, ExecutionEngine};
use crate::persist::{PersistenceError, PersistenceWriter};
use crate::registry::CheckRegistry;
use crate::snapshot::{CancelSignal, SnapshotProvider};
use chrono::Utc;
use repolizer_checks::schema::RepoEntry;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Shared, per-run context threaded through every sub-batch.
///
/// Built once from an [`EngineConfig`] and reused across the whole batch, so
/// the memory monitor's history and the cancellation signal survive across
/// sub-batch boundaries.
pub struct BatchContext {
    /// Repositories per sub-batch before the next drain (`spec.md` §4.3).
    pub batch_size: usize,
    /// Cooperative cancellation, shared with every in-flight check.
    pub cancel: CancelSignal,
}

impl BatchContext {
    /// Derive a context from a validated engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            batch_size: config.batch_size as usize,
            cancel: CancelSignal::new(),
        }
    }
}

/// Aggregate outcome of running a full batch, the Rust analog of the
/// teacher's fleet-level summary: counts by terminal disposition plus mean
/// scores, never individual `RepoReport`s (those already went to the
/// persistence stream as they completed).
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Repositories the caller asked to process.
    pub total_repos: usize,
    /// Repositories whose checks ran to completion (any terminal status)
    /// and whose report was persisted.
    pub processed: usize,
    /// Repositories never dispatched because cancellation was requested
    /// before their sub-batch started.
    pub cancelled: usize,
    /// Mean `overall_score` across every processed repository. `0.0` if
    /// none were processed.
    pub mean_overall_score: f64,
    /// Mean per-category score across every processed repository's
    /// `CategoryReport`s, keyed by category for deterministic output.
    pub category_means: BTreeMap<String, f64>,
}

impl BatchSummary {
    /// `true` if every requested repository was processed (no cancellation
    /// cut the run short).
    pub fn is_complete(&self) -> bool {
        self.cancelled == 0
    }
}

/// Orchestrates a full batch run: sub-batching, execution, aggregation,
/// persistence, and memory throttling.
pub struct BatchRunner {
    engine: ExecutionEngine,
    aggregator: Aggregator,
    writer: PersistenceWriter,
    memory: MemoryMonitor,
    batch_size: usize,
}

impl BatchRunner {
    /// Build a runner from a registry and validated configuration.
    ///
    /// Mirrors `spec.md` §7: a non-positive `max_concurrency` is a
    /// configuration error, surfaced here as [`EngineError`] rather than
    /// deep inside the first sub-batch.
    pub fn new(registry: Arc<CheckRegistry>, config: &EngineConfig) -> Result<Self, EngineError> {
        let engine = ExecutionEngine::new(
            registry,
            config.max_concurrency as usize,
            Duration::from_secs(u64::from(config.check_timeout_s)),
        )?;
        Ok(Self {
            engine,
            aggregator: Aggregator::with_weights(config.strict_zero_inclusion, config.category_weights.clone()),
            writer: PersistenceWriter::new(&config.output_path),
            memory: MemoryMonitor::new(u64::from(config.memory_limit_mb)),
            batch_size: config.batch_size as usize,
        })
    }

    /// Run every repository in `repos`, sub-batching per `batch_size` and
    /// honoring `cancel`.
    ///
    /// Each completed `RepoReport` is appended to the output stream
    /// immediately, in the order its sub-batch's tasks happen to finish
    /// (`spec.md` §4.5: append order is completion order, not input order).
    /// A persistence failure for one repository is logged and that
    /// repository is excluded from `processed`; it does not abort the rest
    /// of the batch.
    pub async fn run(&mut self, repos: Vec<RepoEntry>, cancel: CancelSignal) -> BatchSummary {
        let total_repos = repos.len();
        let mut summary = BatchSummary { total_repos, ..Default::default() };
        let mut category_totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut score_total = 0.0;

        for (sub_batch_index, chunk) in repos.chunks(self.batch_size.max(1)).enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled += chunk.len();
                continue;
            }

            let mut join_set = JoinSet::new();
            for entry in chunk {
                let handle = Arc::new(SnapshotProvider::snapshot(entry));
                let identity = RepositoryIdentity {
                    id: handle.id.clone(),
                    name: handle.name.clone(),
                    full_name: handle.full_name.clone(),
                };
                let cancel = cancel.clone();
                let categorized = self.engine.run_repo(handle, cancel);
                join_set.spawn(async move { (identity, categorized.await) });
            }

            while let Some(joined) = join_set.join_next().await {
                let Ok((identity, categorized)) = joined else {
                    tracing::error!("repository task aborted unexpectedly");
                    continue;
                };

                let report = self.aggregator.build_report(identity, Utc::now(), categorized);

                for (category, category_report) in &report.categories {
                    let entry = category_totals.entry(category.clone()).or_insert((0.0, 0));
                    entry.0 += category_report.score;
                    entry.1 += 1;
                }
                score_total += report.overall_score;

                match self.writer.append(&report) {
                    Ok(()) => summary.processed += 1,
                    Err(error) => {
                        tracing::error!(
                            repo_id = %report.repository.id,
                            error = %error,
                            "failed to persist report after retry"
                        );
                    }
                }
            }

            let sample = self.memory.cleanup_and_check();
            if sample.over_threshold {
                tracing::warn!(
                    sub_batch = sub_batch_index,
                    rss_mb = sample.rss_mb,
                    "pausing briefly to let memory settle before the next sub-batch"
                );
            }
        }

        if summary.processed > 0 {
            summary.mean_overall_score = round1(score_total / summary.processed as f64);
            summary.category_means = category_totals
                .into_iter()
                .map(|(category, (total, count))| (category, round1(total / count as f64)))
                .collect();
        }

        summary
    }

    /// Run the repair pass over this runner's output stream before (or
    /// after) a run, returning whatever [`PersistenceError`] the pass hit.
    pub fn repair_output(config: &EngineConfig) -> Result<crate::persist::RepairSummary, PersistenceError> {
        crate::persist::RepairPass::repair(std::path::Path::new(&config.output_path))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
