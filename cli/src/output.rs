// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human-readable terminal output for batch runs and repairs.

use colored::Colorize;
use repolizer_core::batch::BatchSummary;
use repolizer_core::persist::RepairSummary;

/// Print a batch run's summary: counts, completion state, and mean scores
/// by category.
pub fn display_batch_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "Batch summary".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{} {}", "Total repositories:".cyan(), summary.total_repos);
    println!("{} {}", "Processed:".cyan(), summary.processed.to_string().green());

    if summary.cancelled > 0 {
        println!("{} {}", "Cancelled:".cyan(), summary.cancelled.to_string().yellow());
    }

    println!("{} {:.1}", "Mean overall score:".cyan(), summary.mean_overall_score);

    if !summary.category_means.is_empty() {
        println!();
        println!("{}", "By category:".bold());
        for (category, score) in &summary.category_means {
            println!("  {:<16} {:.1}", category, score);
        }
    }
    println!();
}

/// Print a repair pass's summary: how many lines were valid, fixed, or
/// quarantined.
pub fn display_repair_summary(summary: &RepairSummary) {
    println!();
    println!("{}", "Repair summary".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{} {}", "Valid lines:".cyan(), summary.valid_count.to_string().green());
    println!("{} {}", "Repaired lines:".cyan(), summary.repaired_count.to_string().yellow());
    println!("{} {}", "Quarantined lines:".cyan(), summary.unrepairable.len().to_string().red());
    println!("{} {}", "Backup written to:".cyan(), summary.backup_path.display());

    if !summary.unrepairable.is_empty() {
        println!("{} {}", "Quarantine file:".cyan(), summary.quarantine_path.display());
        for line in &summary.unrepairable {
            println!("  {} line {}: {}", "-".dimmed(), line.line_number, line.error.dimmed());
        }
    }
    println!();
}

/// Print an error to stderr in the same red/bold style used elsewhere.
pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
