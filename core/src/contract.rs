// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The check contract: what a check is, and what it returns.
//!
//! `spec.md` §4.1 describes a check as a dynamic function returning a
//! duck-typed dict with `status`/`score`/`result`/`errors`/`metadata` keys.
//! Per the REDESIGN FLAGS (§9), this is lifted to a single capability trait
//! (`Check`) plus a tagged `Status` enum and a `RawResult` struct — no
//! runtime reflection, no stringly-typed status values.

use crate::snapshot::{CancelSignal, RepoHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal (and pre-terminal `queued`/`running`) states of a check
/// execution, per `spec.md` §4.3's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The check ran to completion and produced a score.
    Completed,
    /// The check produced a result for only part of its domain.
    Partial,
    /// The check raised an error; isolated at the engine boundary.
    Failed,
    /// The check declined to run (e.g. missing `local_path`).
    Skipped,
    /// The engine's clock abandoned the check before it finished.
    ///
    /// Checks never emit this themselves — see `spec.md` §4.3.
    Timeout,
    /// The repository is outside this check's domain; excluded from
    /// aggregation.
    NotApplicable,
}

impl Status {
    /// Parse a free-form status tag, falling back to `Failed` for anything
    /// unrecognized (`spec.md` §4.4: "raw value if one of the six enum
    /// members; otherwise `failed`").
    pub fn parse_or_failed(raw: &str) -> Self {
        match raw {
            "completed" => Status::Completed,
            "partial" => Status::Partial,
            "failed" => Status::Failed,
            "skipped" => Status::Skipped,
            "timeout" => Status::Timeout,
            "not_applicable" => Status::NotApplicable,
            _ => Status::Failed,
        }
    }
}

/// The raw return value of a single `Check::run` invocation, before
/// normalization.
#[derive(Debug, Clone)]
pub struct RawResult {
    /// Outcome tag reported by the check.
    pub status: Status,
    /// Raw score, not yet clamped or rounded.
    pub score: Option<f64>,
    /// Arbitrary diagnostic payload.
    pub result: Value,
    /// Human-readable error, if any.
    pub errors: Option<String>,
    /// Optional structured metadata.
    pub metadata: Option<Value>,
}

impl RawResult {
    /// A successful run with a score in `[0, 100]`.
    pub fn completed(score: f64, result: Value) -> Self {
        Self {
            status: Status::Completed,
            score: Some(score),
            result,
            errors: None,
            metadata: None,
        }
    }

    /// The check declined to run; `spec.md` §4.1 requires an explanatory
    /// error when prerequisites (typically `local_path`) are unmet.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Skipped,
            score: None,
            result: Value::Object(Default::default()),
            errors: Some(reason.into()),
            metadata: None,
        }
    }

    /// The repository falls outside this check's domain.
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            status: Status::NotApplicable,
            score: None,
            result: Value::Object(Default::default()),
            errors: Some(reason.into()),
            metadata: None,
        }
    }

    /// The check encountered an error it could not recover from.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            score: None,
            result: Value::Object(Default::default()),
            errors: Some(message.into()),
            metadata: None,
        }
    }

    /// Attach structured metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A pluggable analyzer producing a single score and diagnostic payload for
/// one concern.
///
/// Implementations MUST NOT modify the repository tree, MUST NOT persist
/// state outside the returned `RawResult`, and MUST tolerate a missing
/// `local_path` by returning `skipped` or degrading to `api_data` alone
/// (`spec.md` §4.1).
#[async_trait]
pub trait Check: Send + Sync {
    /// Globally unique identifier, stable across runs.
    fn id(&self) -> &str;

    /// One of the fixed category tags (`spec.md` §4.1/§6).
    fn category(&self) -> &str;

    /// Relative weight within its category; must be positive.
    fn weight(&self) -> f64 {
        1.0
    }

    /// Run the analysis. `cancel` is polled cooperatively at I/O boundaries;
    /// a check that never suspends is instead bounded by the engine's
    /// per-check deadline (`spec.md` §5).
    async fn run(&self, handle: &RepoHandle, cancel: &CancelSignal) -> RawResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(Status::parse_or_failed("completed"), Status::Completed);
        assert_eq!(Status::parse_or_failed("not_applicable"), Status::NotApplicable);
    }

    #[test]
    fn test_status_parse_unknown_falls_back_to_failed() {
        assert_eq!(Status::parse_or_failed("bogus"), Status::Failed);
    }

    #[test]
    fn test_raw_result_builders() {
        assert_eq!(RawResult::completed(80.0, Value::Null).status, Status::Completed);
        assert_eq!(RawResult::skipped("no path").status, Status::Skipped);
        assert_eq!(RawResult::not_applicable("n/a").status, Status::NotApplicable);
        assert_eq!(RawResult::failed("boom").errors.unwrap(), "boom");
    }
}
