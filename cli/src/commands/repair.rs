// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `repair` subcommand: run the Persistence Layer's repair pass
//! (`spec.md` §4.5) over an existing result stream.

use crate::error::CliError;
use crate::output;
use clap::Args;
use repolizer_core::persist::RepairPass;
use std::path::PathBuf;

/// Arguments for `repolizer repair`.
#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Path to the result stream to repair, in place.
    pub path: PathBuf,
}

/// Run the repair pass and print its summary.
pub async fn execute(args: RepairArgs, _verbose: bool) -> Result<(), CliError> {
    let summary = RepairPass::repair(&args.path)?;
    output::display_repair_summary(&summary);
    Ok(())
}
