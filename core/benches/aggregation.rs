// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Throughput of the Aggregator's category and overall folds (`spec.md`
//! §4.4), at batch sizes representative of a single repository's full
//! category set and of a whole-batch roll-up.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repolizer_core::aggregate::Aggregator;
use repolizer_core::contract::{RawResult, Status};
use repolizer_core::normalize::{CheckResult, Normalizer};
use std::collections::BTreeMap;

fn check_result(status: Status, score: Option<f64>) -> CheckResult {
    let raw = match status {
        Status::Completed => RawResult::completed(score.unwrap_or(0.0), serde_json::Value::Null),
        _ => RawResult::skipped("benchmark fixture"),
    };
    Normalizer::normalize(raw, 5)
}

fn category_with(n: usize) -> BTreeMap<String, (f64, CheckResult)> {
    (0..n)
        .map(|i| {
            let score = (i * 7 % 100) as f64;
            (format!("check_{i}"), (1.0, check_result(Status::Completed, Some(score))))
        })
        .collect()
}

fn bench_aggregate_category(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_category");
    for size in [5usize, 25, 100] {
        let checks = category_with(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &checks, |b, checks| {
            let aggregator = Aggregator::new(false);
            b.iter(|| aggregator.aggregate_category(black_box(checks.clone())));
        });
    }
    group.finish();
}

fn bench_aggregate_overall(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_overall");
    for categories in [3usize, 10] {
        let aggregator = Aggregator::new(false);
        let mut per_category = BTreeMap::new();
        for cat in 0..categories {
            per_category.insert(format!("category_{cat}"), category_with(10));
        }
        let report_categories: BTreeMap<_, _> = per_category
            .into_iter()
            .map(|(name, checks)| (name, aggregator.aggregate_category(checks)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(categories), &report_categories, |b, cats| {
            b.iter(|| aggregator.aggregate_overall(black_box(cats)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregate_category, bench_aggregate_overall);
criterion_main!(benches);
