// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Process entry point for `repolizer`: a thin dispatcher onto the Check
//! Orchestration Engine in `repolizer-core`. Per `spec.md` §1, CLI argument
//! parsing is an external concern, so this crate stays small: it loads
//! configuration, loads a repository batch, runs the engine or the repair
//! pass, and maps the outcome onto the exit-code contract in `error.rs`.

use clap::{Parser, Subcommand};
use std::process;

mod commands;
mod error;
mod output;

use commands::{config, repair, run};
use error::exit_codes;

/// Repolizer - Check Orchestration Engine for repository health reports.
#[derive(Parser)]
#[command(name = "repolizer")]
#[command(author = "Repolizer Contributors")]
#[command(version)]
#[command(about = "Run repository health checks and persist a canonical result stream", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every registered check against a batch of repositories.
    #[command(visible_alias = "r")]
    Run(run::RunArgs),

    /// Repair a result stream, quarantining unrepairable lines.
    Repair(repair::RepairArgs),

    /// Configuration management commands.
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completions.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Run(args) => match run::execute(args, cli.verbose).await {
            Ok(()) => process::exit(exit_codes::SUCCESS),
            Err(e) => {
                output::display_error(&e.to_string());
                process::exit(e.exit_code());
            }
        },
        Commands::Repair(args) => match repair::execute(args, cli.verbose).await {
            Ok(()) => process::exit(exit_codes::SUCCESS),
            Err(e) => {
                output::display_error(&e.to_string());
                process::exit(e.exit_code());
            }
        },
        Commands::Config(cmd) => match config::execute(cmd, cli.verbose).await {
            Ok(()) => process::exit(exit_codes::SUCCESS),
            Err(e) => {
                output::display_error(&e.to_string());
                process::exit(e.exit_code());
            }
        },
        Commands::Completions { shell } => {
            generate_completions(shell);
            process::exit(exit_codes::SUCCESS);
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
