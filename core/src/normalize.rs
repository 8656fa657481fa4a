// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Result Normalizer (`spec.md` §4.4).
//!
//! Converts a check's [`RawResult`](crate::contract::RawResult) into the
//! canonical [`CheckResult`] that the Aggregator and Persistence layer both
//! consume: scores clamped to `[0, 100]` and rounded to one decimal, status
//! coherent with the presence/absence of a score, and an unrecognized status
//! tag never silently treated as success.

use crate::contract::{RawResult, Status};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical, stable shape of one check's outcome, as written to the
/// persisted report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: Status,
    /// `None` only for `skipped`/`not_applicable`/`failed`/`timeout`
    /// (`spec.md` §4.4 invariant: "`score` is present if and only if status
    /// is `completed` or `partial`").
    pub score: Option<f64>,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub duration_ms: u64,
}

/// Applies the normalization rules from `spec.md` §4.4 to a single check's
/// raw output.
pub struct Normalizer;

impl Normalizer {
    /// Normalize one check's raw result.
    ///
    /// `spec.md` §8 invariant 3: a `completed` status with a raw score of
    /// `0` is promoted to `1` ("the minimum-1 rule") so that a completed
    /// check is never indistinguishable from a degraded-zero category in
    /// aggregate reports.
    pub fn normalize(raw: RawResult, duration_ms: u64) -> CheckResult {
        let score = match raw.status {
            Status::Completed | Status::Partial => {
                let clamped = raw.score.unwrap_or(0.0).clamp(0.0, 100.0);
                let rounded = (clamped * 10.0).round() / 10.0;
                let floored = if raw.status == Status::Completed && rounded <= 0.0 {
                    1.0
                } else {
                    rounded
                };
                Some(floored)
            }
            Status::Failed | Status::Skipped | Status::Timeout | Status::NotApplicable => None,
        };

        CheckResult {
            status: raw.status,
            score,
            result: raw.result,
            errors: raw.errors,
            metadata: raw.metadata,
            duration_ms,
        }
    }

    /// Normalize a raw, free-form status tag (e.g. read back from a stale
    /// persisted record) alongside the rest of a raw result, falling back
    /// to `failed` for anything unrecognized per `spec.md` §4.4.
    pub fn normalize_tagged(raw_status: &str, raw: RawResult, duration_ms: u64) -> CheckResult {
        let status = Status::parse_or_failed(raw_status);
        Self::normalize(RawResult { status, ..raw }, duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_score_clamped_above_100() {
        let result = Normalizer::normalize(RawResult::completed(150.0, Value::Null), 10);
        assert_eq!(result.score, Some(100.0));
    }

    #[test]
    fn test_completed_score_clamped_below_0() {
        let result = Normalizer::normalize(RawResult::completed(-30.0, Value::Null), 10);
        assert_eq!(result.score, Some(1.0));
    }

    #[test]
    fn test_completed_zero_promoted_to_minimum_one() {
        let result = Normalizer::normalize(RawResult::completed(0.0, Value::Null), 10);
        assert_eq!(result.score, Some(1.0));
    }

    #[test]
    fn test_completed_score_rounded_to_one_decimal() {
        let result = Normalizer::normalize(RawResult::completed(66.666, Value::Null), 10);
        assert_eq!(result.score, Some(66.7));
    }

    #[test]
    fn test_skipped_has_no_score() {
        let result = Normalizer::normalize(RawResult::skipped("no path"), 5);
        assert_eq!(result.score, None);
        assert_eq!(result.status, Status::Skipped);
    }

    #[test]
    fn test_not_applicable_has_no_score() {
        let result = Normalizer::normalize(RawResult::not_applicable("n/a"), 5);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_failed_has_no_score() {
        let result = Normalizer::normalize(RawResult::failed("boom"), 5);
        assert_eq!(result.score, None);
        assert_eq!(result.errors.unwrap(), "boom");
    }

    #[test]
    fn test_unknown_tag_falls_back_to_failed() {
        let result = Normalizer::normalize_tagged("bogus", RawResult::completed(90.0, Value::Null), 5);
        assert_eq!(result.status, Status::Failed);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_metadata_preserved() {
        let raw = RawResult::completed(50.0, Value::Null).with_metadata(serde_json::json!({"k": "v"}));
        let result = Normalizer::normalize(raw, 5);
        assert_eq!(result.metadata.unwrap()["k"], "v");
    }

    #[test]
    fn test_serializes_without_null_errors_field() {
        let result = Normalizer::normalize(RawResult::completed(50.0, Value::Null), 5);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("errors").is_none());
    }
}
