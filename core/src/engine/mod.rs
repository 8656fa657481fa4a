// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Execution Engine (`spec.md` §4.3, §5).
//!
//! Runs every registered check against one repository concurrently, bounded
//! by a semaphore sized to the configured concurrency, each under its own
//! deadline and with panics isolated to a synthetic `failed` result. A
//! category's checks only ever get folded into a [`CategoryReport`] once
//! every check in that category has reached a terminal state — trivially
//! true here, since the engine waits for the whole repository's checks to
//! finish before returning anything.

pub mod memory;

use crate::contract::{RawResult, Status};
use crate::normalize::{CheckResult, Normalizer};
use crate::registry::CheckRegistry;
use crate::snapshot::{CancelSignal, RepoHandle};
use futures::future::{AssertUnwindSafe, FutureExt};
use serde_json::Value;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe as StdAssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fatal errors from running an engine over a batch of repositories.
///
/// Per-check failures never surface here — they're captured as synthetic
/// `failed`/`timeout` [`CheckResult`]s. This enum is reserved for engine
/// construction and whole-batch conditions.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("max_concurrency must be at least 1")]
    InvalidConcurrency,
}

/// One repository's checks, folded by category: `category -> check_id ->
/// (weight, result)`. Consumed directly by
/// [`Aggregator::build_report`](crate::aggregate::Aggregator::build_report).
pub type CategorizedResults = BTreeMap<String, BTreeMap<String, (f64, CheckResult)>>;

/// Runs the registered checks against repositories.
pub struct ExecutionEngine {
    registry: Arc<CheckRegistry>,
    semaphore: Arc<Semaphore>,
    check_timeout: Duration,
}

impl ExecutionEngine {
    /// Build an engine bounding concurrent check execution to
    /// `max_concurrency` and each individual check to `check_timeout`.
    pub fn new(
        registry: Arc<CheckRegistry>,
        max_concurrency: usize,
        check_timeout: Duration,
    ) -> Result<Self, EngineError> {
        if max_concurrency == 0 {
            return Err(EngineError::InvalidConcurrency);
        }
        Ok(Self {
            registry,
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            check_timeout,
        })
    }

    /// Run every registered check against one repository.
    ///
    /// Each check is dispatched as its own task once a semaphore permit is
    /// available; a check that exceeds `check_timeout` is abandoned in
    /// place (`spec.md` §4.3: checks never observe their own timeout — the
    /// engine's clock does) and recorded as `timeout`. A check whose future
    /// panics is caught and recorded as `failed` rather than poisoning the
    /// whole batch (`spec.md` §5).
    pub async fn run_repo(&self, handle: Arc<RepoHandle>, cancel: CancelSignal) -> CategorizedResults {
        let mut join_set = JoinSet::new();

        for descriptor in self.registry.all() {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("engine semaphore never closed while engine is alive");
            let check = descriptor.check().clone();
            let id = descriptor.id().to_string();
            let category = descriptor.category().to_string();
            let weight = descriptor.weight();
            let handle = handle.clone();
            let cancel = cancel.clone();
            let deadline = self.check_timeout;

            join_set.spawn(async move {
                let _permit = permit;
                let started = Instant::now();

                let guarded = StdAssertUnwindSafe(check.run(&handle, &cancel));
                let raw = match tokio::time::timeout(deadline, guarded.catch_unwind()).await {
                    Ok(Ok(raw)) => raw,
                    Ok(Err(_panic)) => RawResult::failed("check panicked during execution"),
                    Err(_elapsed) => RawResult {
                        status: Status::Timeout,
                        score: None,
                        result: Value::Object(Default::default()),
                        errors: Some(format!("exceeded {}s deadline", deadline.as_secs())),
                        metadata: None,
                    },
                };

                let duration_ms = started.elapsed().as_millis() as u64;
                let result = Normalizer::normalize(raw, duration_ms);
                (category, id, weight, result)
            });
        }

        let mut per_category: CategorizedResults = BTreeMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((category, id, weight, result)) => {
                    per_category.entry(category).or_default().insert(id, (weight, result));
                }
                Err(join_error) => {
                    tracing::error!(error = %join_error, "check task aborted unexpectedly");
                }
            }
        }

        per_category
    }
}

// `AssertUnwindSafe` is re-exported under two names above: `futures`'s for
// the `.catch_unwind()` extension method, `std`'s to wrap the future value
// itself. Both are zero-cost newtypes; this avoids a name collision without
// introducing an alias module.
#[allow(unused_imports)]
use AssertUnwindSafe as _FuturesAssertUnwindSafeMarker;
