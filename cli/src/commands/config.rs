// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `config` subcommand family: `show` prints the effective, layered
//! configuration (`SPEC_FULL.md` §10.3); `validate` checks a file without
//! running anything, per `spec.md` §7's "Configuration error — fail fast,
//! never run."

use crate::error::CliError;
use clap::Subcommand;
use repolizer_core::config::ConfigLoader;
use std::path::PathBuf;

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration after layering defaults, the
    /// config file, and environment overrides.
    Show {
        /// Load from this file instead of the platform default.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file without running the engine.
    Validate {
        /// Path to the config file to validate.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the platform-default configuration directory.
    Path,
}

/// Dispatch a `config` subcommand.
pub async fn execute(cmd: ConfigCommands, verbose: bool) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Show { config } => show_config(config, verbose),
        ConfigCommands::Validate { config } => validate_config(config),
        ConfigCommands::Path => {
            print_config_path();
            Ok(())
        }
    }
}

fn show_config(config_path: Option<PathBuf>, verbose: bool) -> Result<(), CliError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &config_path {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;

    println!("{}", toml::to_string_pretty(&config).unwrap_or_default());
    if verbose {
        println!("# effective categories: {:?}", config.effective_categories());
    }
    Ok(())
}

fn validate_config(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &config_path {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;
    config.validate_full()?;
    println!("configuration is valid ({} categories enabled)", config.effective_categories().len());
    Ok(())
}

fn print_config_path() {
    match ConfigLoader::default_config_dir() {
        Some(dir) => println!("{}", dir.join("config.toml").display()),
        None => println!("unable to determine a platform config directory"),
    }
}
