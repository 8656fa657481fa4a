// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Memory-aware throttling between sub-batches (`spec.md` §11, supplemented
//! from `throttled_batch_processor.py`'s `_check_memory_usage`/
//! `_cleanup_resources`).
//!
//! Samples this process's resident set size via `sysinfo` after each
//! sub-batch, keeps a bounded ring buffer of recent samples for diagnostics,
//! and logs a warning (never errors — memory pressure is advisory, not
//! fatal) when usage crosses the configured threshold.

use std::collections::VecDeque;
use sysinfo::{Pid, System};

/// Maximum number of samples retained; older samples are evicted.
const HISTORY_CAPACITY: usize = 64;

/// One point-in-time reading of this process's memory footprint.
#[derive(Debug, Clone, Copy)]
pub struct MemorySample {
    pub rss_mb: f64,
    pub over_threshold: bool,
}

/// Samples and tracks this process's RSS across a batch run.
pub struct MemoryMonitor {
    system: System,
    pid: Pid,
    threshold_mb: u64,
    history: VecDeque<MemorySample>,
}

impl MemoryMonitor {
    /// Create a monitor that warns once RSS exceeds `threshold_mb`.
    pub fn new(threshold_mb: u64) -> Self {
        let pid = Pid::from_u32(std::process::id());
        let mut system = System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
        Self {
            system,
            pid,
            threshold_mb,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Re-sample RSS, tagging the reading with a diagnostic label (the
    /// Rust analog of the original's `tag` parameter — surfaced only in the
    /// log line, never stored).
    pub fn sample(&mut self, tag: &str) -> MemorySample {
        self.system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[self.pid]), true);
        let rss_mb = self
            .system
            .process(self.pid)
            .map(|p| p.memory() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);

        let over_threshold = rss_mb > self.threshold_mb as f64;
        if over_threshold {
            tracing::warn!(tag, rss_mb, threshold_mb = self.threshold_mb, "high memory usage");
        }

        let reading = MemorySample { rss_mb, over_threshold };
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(reading);
        reading
    }

    /// Readings retained so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &MemorySample> {
        self.history.iter()
    }

    /// Re-sample and report whether the process should pause before
    /// starting its next sub-batch.
    ///
    /// The original's `_cleanup_resources` forces a GC pass; Rust has no
    /// equivalent knob, so this just re-samples after the caller's sub-batch
    /// has dropped its intermediate allocations.
    pub fn cleanup_and_check(&mut self) -> MemorySample {
        self.sample("after cleanup")
    }
}
