//! filedupes - Duplicate File Finder
//!
//! Finds files with identical content beneath a directory using a staged
//! filter: exact size, then a BLAKE3 signature of the first 80 KB, then a
//! BLAKE3 signature of the whole file. Hard links to the same inode are
//! recognised and never counted as duplicates of each other.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;

use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run a complete scan as described by the command line.
///
/// Loads configuration, scans `cli.dir`, and writes the report. Per-file
/// read errors are logged and do not change the exit code.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the root is not a
/// directory, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let progress = Arc::new(Progress::new(cli.quiet));
    let finder_config = config.finder_config().with_progress_callback(progress);
    let finder = DuplicateFinder::new(finder_config);

    let (sets, summary) = finder.find_duplicates(&cli.dir)?;

    for err in &summary.scan_errors {
        log::debug!("Skipped: {}", err);
    }
    if !summary.scan_errors.is_empty() {
        log::warn!(
            "{} files or directories could not be read and were skipped",
            summary.scan_errors.len()
        );
    }

    report::write_report(&config.output, config.format, &sets, &summary)
        .with_context(|| format!("Failed to write report to {}", config.output.display()))?;

    log::info!(
        "Found {} duplicate sets ({} paths) among {} files in {:.2?}; {} reclaimable",
        summary.duplicate_sets,
        summary.duplicate_entries,
        summary.total_files,
        summary.scan_duration,
        summary.reclaimable_display()
    );
    if summary.hardlink_only_sets > 0 {
        log::info!(
            "{} sets were hard links to a single file and not counted",
            summary.hardlink_only_sets
        );
    }

    Ok(ExitCode::Success)
}
