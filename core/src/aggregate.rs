// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Result Aggregator (`spec.md` §4.4, §8).
//!
//! Folds per-check [`CheckResult`]s into per-category weighted means, then
//! folds categories into a single overall score. Both folds use `BTreeMap`
//! so iteration — and therefore serialized output — is always in sorted key
//! order, independent of registration or completion order.

use crate::normalize::CheckResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while folding check results into a report. Currently
/// infallible in practice — reserved for future invariant checks (e.g. a
/// category referencing an unregistered check) without breaking the public
/// API.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("category '{0}' has no checks to aggregate")]
    EmptyCategory(String),
}

/// One category's folded score plus its constituent check results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub score: f64,
    /// `true` when every check in the category produced no score (all
    /// `skipped`/`not_applicable`/`failed`/`timeout`), per `spec.md` §8
    /// invariant 7: "if the sum of weights is zero, category score is
    /// reported as `0` with `degraded: true`, never `NaN`".
    pub degraded: bool,
    pub checks: BTreeMap<String, CheckResult>,
}

/// Minimal repository identity carried alongside a report for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub id: String,
    pub name: String,
    pub full_name: String,
}

/// The full, persisted outcome of running every registered check against
/// one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub repository: RepositoryIdentity,
    pub timestamp: DateTime<Utc>,
    pub overall_score: f64,
    pub categories: BTreeMap<String, CategoryReport>,
}

/// Folds normalized check results into category and overall scores.
pub struct Aggregator {
    /// When `true`, a degraded (all-excluded) category still contributes a
    /// `0` to the overall mean instead of being dropped from it entirely.
    /// `spec.md` §9 Open Question 1, resolved in `DESIGN.md`.
    strict_zero_inclusion: bool,
    /// Per-category weight applied in `aggregate_overall`'s weighted mean
    /// (`spec.md` §4.4, §9 Open Question 2). A category absent from this map
    /// defaults to weight 1, matching `EngineConfig::category_weights`'s own
    /// default preset.
    category_weights: BTreeMap<String, f64>,
}

impl Aggregator {
    /// Build an aggregator with every category at the default weight of 1.
    pub fn new(strict_zero_inclusion: bool) -> Self {
        Self::with_weights(strict_zero_inclusion, BTreeMap::new())
    }

    /// Build an aggregator with explicit per-category weights, typically
    /// `EngineConfig::category_weights`.
    pub fn with_weights(strict_zero_inclusion: bool, category_weights: BTreeMap<String, f64>) -> Self {
        Self { strict_zero_inclusion, category_weights }
    }

    fn weight_for(&self, category: &str) -> f64 {
        self.category_weights.get(category).copied().unwrap_or(1.0)
    }

    /// Fold one category's check results into a [`CategoryReport`].
    ///
    /// `spec.md` §8 invariant 7's weighted-mean law: `score = Σ(w_i * s_i) /
    /// Σ(w_i)`, summing only over checks that produced a score (`completed`
    /// or `partial`); checks without a score don't participate in the
    /// weight sum either.
    pub fn aggregate_category(&self, checks: BTreeMap<String, (f64, CheckResult)>) -> CategoryReport {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for (weight, result) in checks.values() {
            if let Some(score) = result.score {
                weighted_sum += weight * score;
                weight_total += weight;
            }
        }

        let (score, degraded) = if weight_total > 0.0 {
            (weighted_sum / weight_total, false)
        } else {
            (0.0, true)
        };

        CategoryReport {
            score: round1(score),
            degraded,
            checks: checks.into_iter().map(|(id, (_, result))| (id, result)).collect(),
        }
    }

    /// Fold category reports into an overall score.
    ///
    /// Weighted mean, by `category_weights`, across categories that
    /// contributed a real score; a degraded (zero-weight) category is
    /// excluded unless `strict_zero_inclusion` is set, in which case it
    /// contributes `0` at its configured weight.
    pub fn aggregate_overall(&self, categories: &BTreeMap<String, CategoryReport>) -> f64 {
        let contributing: Vec<(f64, f64)> = categories
            .iter()
            .filter_map(|(category, c)| {
                if !c.degraded || self.strict_zero_inclusion {
                    Some((self.weight_for(category), c.score))
                } else {
                    None
                }
            })
            .collect();

        let weight_total: f64 = contributing.iter().map(|(w, _)| w).sum();
        if weight_total <= 0.0 {
            return 0.0;
        }

        round1(contributing.iter().map(|(w, s)| w * s).sum::<f64>() / weight_total)
    }

    /// Build the final report for one repository from its per-category
    /// weighted check maps.
    pub fn build_report(
        &self,
        repository: RepositoryIdentity,
        timestamp: DateTime<Utc>,
        per_category: BTreeMap<String, BTreeMap<String, (f64, CheckResult)>>,
    ) -> RepoReport {
        let categories: BTreeMap<String, CategoryReport> = per_category
            .into_iter()
            .map(|(category, checks)| (category, self.aggregate_category(checks)))
            .collect();

        let overall_score = self.aggregate_overall(&categories);

        RepoReport {
            repository,
            timestamp,
            overall_score,
            categories,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
