// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Repository batch schema definitions with validation.
//!
//! A batch handed to the Check Orchestration Engine is a `RepoList`: a
//! non-empty collection of `RepoEntry` records, each identifying one
//! repository to analyze. This mirrors the input contract in the
//! specification's External Interfaces section: every entry carries at
//! minimum `{id, name, full_name}`, and optionally a `local_path` to a
//! readable working tree and an opaque `api_data` map.

use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::collections::HashMap;

/// One repository to analyze.
///
/// # Example
///
/// ```
/// use repolizer_checks::schema::RepoEntry;
///
/// let entry = RepoEntry::new("42", "widget", "acme/widget")
///     .with_local_path("/repos/widget");
/// assert_eq!(entry.id, "42");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RepoEntry {
    /// Stable identifier, unique within a `RepoList`.
    #[validate(min_length = 1)]
    pub id: String,

    /// Short repository name.
    #[validate(min_length = 1)]
    pub name: String,

    /// Fully qualified name, e.g. `owner/repo`.
    #[validate(min_length = 1)]
    pub full_name: String,

    /// Absolute path to a readable local working tree, if one was provided
    /// by the caller. Cloning/fetching a repository is out of scope for
    /// this crate — the caller is responsible for making this path exist.
    pub local_path: Option<String>,

    /// Opaque metadata obtained from an external API (e.g. license, stars),
    /// consulted by checks that can operate without a local working tree.
    pub api_data: Option<HashMap<String, serde_json::Value>>,
}

/// A batch of repositories to analyze in one run.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RepoList {
    /// The repositories in this batch (must contain at least one entry).
    #[validate(min_items = 1)]
    pub repositories: Vec<RepoEntry>,
}

impl RepoEntry {
    /// Create a new repository entry with no local path or API data.
    pub fn new(id: impl Into<String>, name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            full_name: full_name.into(),
            local_path: None,
            api_data: None,
        }
    }

    /// Attach a local working-tree path.
    pub fn with_local_path(mut self, path: impl Into<String>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Attach opaque API metadata.
    pub fn with_api_data(mut self, api_data: HashMap<String, serde_json::Value>) -> Self {
        self.api_data = Some(api_data);
        self
    }

    /// `true` if the caller supplied a local working-tree path.
    pub fn has_local_path(&self) -> bool {
        self.local_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl RepoList {
    /// Create an empty repository list.
    pub fn new() -> Self {
        Self { repositories: Vec::new() }
    }

    /// Add a repository entry.
    pub fn add(&mut self, entry: RepoEntry) {
        self.repositories.push(entry);
    }

    /// Number of repositories in the batch.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// `true` if the batch contains no repositories.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Check that every `id` in the batch is unique.
    ///
    /// `serde_valid`'s derive validates individual fields; cross-entry
    /// invariants like id uniqueness are checked separately here.
    pub fn check_unique_ids(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::with_capacity(self.repositories.len());
        for entry in &self.repositories {
            if !seen.insert(entry.id.as_str()) {
                return Err(format!("duplicate repository id: {}", entry.id));
            }
        }
        Ok(())
    }
}

impl Default for RepoList {
    fn default() -> Self {
        Self::new()
    }
}
