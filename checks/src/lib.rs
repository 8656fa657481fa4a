// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Repolizer Checks
//!
//! This crate provides the input schema for a batch of repositories to be
//! analyzed by the Check Orchestration Engine, together with loading/saving
//! helpers and the built-in category-weight presets.
//!
//! ## Modules
//!
//! - `schema`: `RepoEntry`/`RepoList` definitions with validation.
//! - `loader`: Loading and saving repository batches (JSON/YAML).
//! - `builtin`: Default category-weight presets.
//!
//! ## Example
//!
//! ```no_run
//! use repolizer_checks::loader::RepoListLoader;
//! use std::path::Path;
//!
//! let loader = RepoListLoader::new();
//! let batch = loader.load(Path::new("repos.json")).unwrap();
//! println!("Loaded {} repositories", batch.repositories.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

pub mod builtin;
pub mod loader;
pub mod schema;

// Re-export main types for convenience
pub use schema::{RepoEntry, RepoList};

use thiserror::Error;

/// Errors arising from loading, saving, or validating a repository batch.
#[derive(Error, Debug)]
pub enum RepoListError {
    /// The requested repository list file does not exist.
    #[error("repository list not found: {0}")]
    NotFound(String),

    /// The file's contents did not parse as a recognized format.
    #[error("invalid repository list format: {0}")]
    InvalidFormat(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML (de)serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Schema validation failure (e.g. empty id, duplicate id).
    #[error("validation error: {0}")]
    ValidationError(String),
}
