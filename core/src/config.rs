// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine configuration (`spec.md` §6, expanded in `SPEC_FULL.md` §10.3).
//!
//! A hierarchical configuration system mirroring the teacher's
//! `ConfigLoader`: defaults, then an optional config file, then
//! `REPOLIZER_COE_`-prefixed environment variables, then explicit
//! programmatic overrides. Validation enforces the positivity and
//! known-category constraints from `spec.md` §3/§7 so a malformed
//! configuration fails fast, before any repository is processed.

use config::{Config as ConfigBuilder, Environment, File};
use repolizer_checks::builtin::{default_category_weights, is_known_category};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = "repolizer";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "REPOLIZER_COE";

/// Environment variable separator for nested configuration, e.g.
/// `REPOLIZER_COE_BATCH_SIZE=10`.
const ENV_SEPARATOR: &str = "__";

/// Errors that prevent the engine from starting at all.
///
/// `spec.md` §7: "Configuration error (invalid concurrency, unknown
/// category) — fail fast, never run." This is one of only three error
/// classes that propagate to the process boundary (exit code 2).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying `config` crate could not build or deserialize the
    /// layered configuration.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A field failed `serde_valid` validation (non-positive integers, an
    /// unknown category tag, etc).
    #[error("configuration validation failed: {0}")]
    Validation(String),

    /// A `categories` entry isn't one of the fixed category tags.
    #[error("unknown category in configuration: {0}")]
    UnknownCategory(String),
}

/// Every field enumerated in `spec.md` §6's Configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum repositories in flight before a full drain (`spec.md` §4.3).
    #[validate(minimum = 1)]
    pub batch_size: u32,

    /// Worker count for the Execution Engine's semaphore, clamped at use
    /// time to `min(cpu_count, 8, queue_length)` per `spec.md` §4.3.
    #[validate(minimum = 1)]
    pub max_concurrency: u32,

    /// Per-check wall-clock deadline, in seconds.
    #[validate(minimum = 1)]
    pub check_timeout_s: u32,

    /// Resident-memory threshold that triggers a throttling warning between
    /// sub-batches.
    #[validate(minimum = 1)]
    pub memory_limit_mb: u32,

    /// When `true`, a degraded category still contributes a `0` to the
    /// overall mean instead of being excluded from the denominator
    /// (`spec.md` §4.4, Open Question 1).
    pub strict_zero_inclusion: bool,

    /// Where the Persistence Layer appends finalized `RepoReport`s.
    pub output_path: String,

    /// The subset of the fixed category tag set to run. Empty means "all
    /// ten categories".
    pub categories: Vec<String>,

    /// Per-category weights, overriding the built-in all-ones preset
    /// (`spec.md` §9, Open Question 2).
    pub category_weights: BTreeMap<String, f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_concurrency: 4,
            check_timeout_s: 60,
            memory_limit_mb: 1000,
            strict_zero_inclusion: false,
            output_path: "repolizer-report.jsonl".to_string(),
            categories: Vec::new(),
            category_weights: default_category_weights(),
        }
    }
}

impl EngineConfig {
    /// Validate this configuration, failing fast per `spec.md` §7.
    ///
    /// Beyond the per-field `serde_valid` bounds, this checks that every
    /// entry in `categories` and `category_weights` names one of the fixed
    /// category tags — `serde_valid` alone can't express a "member of a
    /// dynamic set" constraint.
    pub fn validate_full(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        for category in &self.categories {
            if !is_known_category(category) {
                return Err(ConfigError::UnknownCategory(category.clone()));
            }
        }
        for category in self.category_weights.keys() {
            if !is_known_category(category) {
                return Err(ConfigError::UnknownCategory(category.clone()));
            }
        }
        Ok(())
    }

    /// The effective category set to run: `categories` if non-empty,
    /// otherwise every fixed category.
    pub fn effective_categories(&self) -> Vec<String> {
        if self.categories.is_empty() {
            repolizer_checks::builtin::CATEGORIES.iter().map(|c| c.to_string()).collect()
        } else {
            self.categories.clone()
        }
    }
}

/// Loads `EngineConfig` from the layered sources described in `SPEC_FULL.md`
/// §10.3: defaults, config file, environment, explicit overrides.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    custom_file: Option<PathBuf>,
    skip_default_file: bool,
    skip_env: bool,
}

impl ConfigLoader {
    /// Start building a loader with all sources enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from this file instead of the platform default.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip the platform-default config file lookup (tests, `--no-config`).
    pub fn skip_default_file(mut self) -> Self {
        self.skip_default_file = true;
        self
    }

    /// Skip environment-variable overrides.
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Load and validate the configuration, in defaults -> file -> env
    /// precedence order.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let defaults = EngineConfig::default();
        let defaults_value =
            serde_json::to_value(&defaults).map_err(|e| ConfigError::Validation(e.to_string()))?;
        builder = builder.add_source(config::Config::try_from(&defaults_value)?);

        if !self.skip_default_file {
            if let Some(path) = self.find_config_file() {
                tracing::debug!(path = %path.display(), "loading config file");
                builder = builder.add_source(File::from(path).required(false).format(config::FileFormat::Toml));
            }
        }

        if let Some(custom_path) = &self.custom_file {
            tracing::info!(path = %custom_path.display(), "loading custom config file");
            builder = builder.add_source(File::from(custom_path.as_path()).required(true).format(config::FileFormat::Toml));
        }

        if !self.skip_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR).try_parsing(true),
            );
        }

        let built = builder.build()?;
        let config: EngineConfig = built.try_deserialize()?;
        config.validate_full()?;
        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(dir) = dirs::config_dir() {
            let path = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if path.exists() {
                return Some(path);
            }
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    /// The platform config directory this loader would look in.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
    }
}
