// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI-level errors and the process exit-code contract (`spec.md` §6).

use thiserror::Error;

/// Errors the CLI itself can raise, beyond what `core` surfaces.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input repository list could not be loaded or failed validation.
    #[error("failed to load repository list: {0}")]
    RepoList(#[from] repolizer_checks::RepoListError),

    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] repolizer_core::config::ConfigError),

    /// The check registry failed to build.
    #[error("registry error: {0}")]
    Registry(#[from] repolizer_core::registry::RegistryError),

    /// The execution engine could not be constructed.
    #[error("engine error: {0}")]
    Engine(#[from] repolizer_core::engine::EngineError),

    /// The persistence or repair layer hit an unrecoverable I/O error.
    #[error("persistence error: {0}")]
    Persistence(#[from] repolizer_core::persist::PersistenceError),

    /// A batch completed but cancellation cut it short.
    #[error("batch partially completed: {processed} of {total} repositories processed before cancellation")]
    PartialCompletion {
        /// Repositories that finished and were persisted.
        processed: usize,
        /// Total repositories requested.
        total: usize,
    },

    /// A batch ran to completion without cancellation but persisted zero
    /// records (e.g. every append failed after its retry).
    #[error("no repositories were processed successfully")]
    NoRepositoriesProcessed,
}

impl CliError {
    /// Map this error to the process exit code the spec's External
    /// Interfaces section (`spec.md` §6) assigns its category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::CONFIG_ERROR,
            Self::Registry(_) => exit_codes::REGISTRY_ERROR,
            Self::PartialCompletion { .. } => exit_codes::PARTIAL_CANCELLED,
            Self::RepoList(_) | Self::Engine(_) | Self::Persistence(_) | Self::NoRepositoriesProcessed => {
                exit_codes::GENERAL_FAILURE
            }
        }
    }
}

/// Exit codes for `repolizer run`, per `spec.md` §6: "`0` on full
/// completion with at least one record written; `2` on configuration
/// error; `3` on fatal registry error; `4` on partial completion due to
/// cancellation; `1` for any other failure."
pub mod exit_codes {
    /// Full completion, at least one record written.
    pub const SUCCESS: i32 = 0;
    /// Any failure not covered by the other codes.
    pub const GENERAL_FAILURE: i32 = 1;
    /// Invalid configuration; the engine never ran.
    pub const CONFIG_ERROR: i32 = 2;
    /// The check registry failed to build.
    pub const REGISTRY_ERROR: i32 = 3;
    /// Cancellation cut the batch short; some repositories were processed.
    pub const PARTIAL_CANCELLED: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_completion_maps_to_exit_code_four() {
        let err = CliError::PartialCompletion { processed: 3, total: 10 };
        assert_eq!(err.exit_code(), exit_codes::PARTIAL_CANCELLED);
    }

    #[test]
    fn test_config_error_maps_to_exit_code_two() {
        let config_err = repolizer_core::config::EngineConfig::default();
        let mut config_err = config_err;
        config_err.batch_size = 0;
        let err = CliError::Config(config_err.validate_full().unwrap_err());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    }
}
