//! Command-line interface definitions for filedupes.
//!
//! This module defines all CLI arguments using the clap derive API. Options
//! that also exist in the configuration file are optional here so that an
//! absent flag does not override a configured value.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory, report to dupes.out
//! filedupes
//!
//! # Scan a photo library for files above 1 MB, skipping caches
//! filedupes -d ~/Pictures -s 1MB -e .cache -e Thumbnails
//!
//! # Machine-readable report
//! filedupes -d /srv/data --format json -f dupes.json
//!
//! # Verbose mode for debugging
//! filedupes -v -d ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::duplicates::HardlinkPolicy;
use crate::report::ReportFormat;

/// Find duplicate files by content.
///
/// Files are compared by size, then by a signature of their first 80 KB,
/// then by a signature of their full content. Confirmed duplicates are
/// written to a report file, one line per path.
#[derive(Debug, Parser)]
#[command(name = "filedupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Only consider files strictly larger than this (e.g., 250000, 100KB, 1MiB)
    /// [default: 250000]
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Report file to write [default: dupes.out]
    #[arg(short = 'f', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory name to skip at any depth (repeatable, adds to Backups.backupdb)
    #[arg(short, long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Descend into directories on other filesystems
    #[arg(long)]
    pub cross_mount_points: bool,

    /// Report encoding [default: text]
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// What to do with sets made only of hard links to one file [default: skip]
    #[arg(long, value_enum)]
    pub hardlinks: Option<HardlinkPolicy>,

    /// Number of threads used for hashing [default: 4]
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports the following formats:
/// - Plain numbers: "1024" (bytes)
/// - Decimal suffixes: "1KB", "1MB", "1GB", "1TB" (powers of 1000)
/// - Binary suffixes: "1KiB", "1MiB", "1GiB", "1TiB" (powers of 1024)
/// - Single-letter: "1K", "1M", "1G", "1T" (decimal)
///
/// Suffixes are case-insensitive. Fractions are accepted ("1.5MB").
///
/// ```
/// use filedupes::cli::parse_size;
///
/// assert_eq!(parse_size("250000").unwrap(), 250_000);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
