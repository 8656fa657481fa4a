// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Repository Snapshot Provider (`spec.md` §4.2).
//!
//! Materializes a read-only `RepoHandle` for each input repository: a local
//! path (verified to be a directory, or cleared), opaque API metadata, and a
//! per-repo cache that checks may use to amortize shared parsing work.

use parking_lot::Mutex;
use repolizer_checks::schema::RepoEntry;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors from materializing a repository snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// `local_path` was supplied but isn't readable at all (distinct from
    /// "not a directory", which is tolerated by clearing the path).
    #[error("local_path is unreadable: {0}")]
    Unreadable(String),
}

/// A cooperative cancellation signal shared by every in-flight check.
///
/// Checks observe this at I/O boundaries (`spec.md` §5); it carries no
/// payload beyond "has cancellation been requested".
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a signal that has not yet fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// `true` once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Per-repo cache keyed by `"<check_id>_<repo_id>"`, shared by every check
/// running against the same `RepoHandle`.
///
/// `get_or_compute` guarantees at-most-one computation of any key even under
/// concurrent access from multiple checks (`spec.md` §9).
#[derive(Debug, Default)]
pub struct RepoCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl RepoCache {
    /// Return the cached value for `key`, computing and storing it via `f`
    /// if absent.
    pub fn get_or_compute<F>(&self, key: &str, f: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(key) {
            return existing.clone();
        }
        let computed = f();
        entries.insert(key.to_string(), computed.clone());
        computed
    }

    /// Number of entries currently cached. Exposed for diagnostics/tests.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// A read-only view of one repository, handed to every check in the batch.
///
/// Owns its `cache` exclusively; the cache (and any cloned `Arc` handles to
/// it) is dropped when the `RepoHandle` goes out of scope, regardless of
/// whether its checks succeeded, failed, or were cancelled — ordinary Rust
/// RAII gives us the "scoped acquisition" `spec.md` §4.2 asks for.
#[derive(Debug)]
pub struct RepoHandle {
    /// Stable identifier, unique within a batch.
    pub id: String,
    /// Short repository name.
    pub name: String,
    /// Fully qualified name, e.g. `owner/repo`.
    pub full_name: String,
    /// Absolute path to a readable local working tree, or `None` if the
    /// caller didn't supply one (or it wasn't a directory).
    pub local_path: Option<PathBuf>,
    /// Opaque metadata obtained from an external API.
    pub api_data: HashMap<String, Value>,
    cache: RepoCache,
}

impl RepoHandle {
    /// `true` if this handle has a usable local working tree.
    pub fn has_local_path(&self) -> bool {
        self.local_path.is_some()
    }

    /// Namespaced cache key for a given check id, per the
    /// `"<check_id>_<repo_id>"` convention in `spec.md` §4.2.
    pub fn cache_key(&self, check_id: &str) -> String {
        format!("{check_id}_{}", self.id)
    }

    /// Access this handle's cache.
    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }
}

impl Drop for RepoHandle {
    fn drop(&mut self) {
        tracing::trace!(repo_id = %self.id, cache_entries = self.cache.len(), "repo handle dropped");
    }
}

/// Materializes `RepoHandle`s from input `RepoEntry` records.
///
/// Never clones or network-fetches a repository — that is the caller's
/// responsibility (`spec.md` §4.2, §6).
pub struct SnapshotProvider;

impl SnapshotProvider {
    /// Build a handle for one repository entry.
    ///
    /// A non-empty `local_path` that isn't a readable directory is cleared
    /// to `None` rather than treated as fatal, per `spec.md` §4.2 ("verifies
    /// that `local_path`, if given, is a directory; otherwise it clears the
    /// path to empty").
    pub fn snapshot(entry: &RepoEntry) -> RepoHandle {
        let local_path = entry.local_path.as_deref().and_then(|p| {
            if p.is_empty() {
                return None;
            }
            let path = PathBuf::from(p);
            if path.is_dir() {
                Some(path)
            } else {
                tracing::debug!(repo_id = %entry.id, path = %p, "local_path is not a directory, clearing");
                None
            }
        });

        RepoHandle {
            id: entry.id.clone(),
            name: entry.name.clone(),
            full_name: entry.full_name.clone(),
            local_path,
            api_data: entry.api_data.clone().unwrap_or_default(),
            cache: RepoCache::default(),
        }
    }
}
