//! Report writers for confirmed duplicate sets.
//!
//! The report flattens every [`DuplicateSet`] into its entries and orders
//! them by size, then signature, then path, so two runs over an unchanged
//! tree produce byte-identical output. Three encodings are available:
//!
//! - [`ReportFormat::Text`]: one `<size> <signature> <identity> <path>` line
//!   per entry, no header or trailer
//! - [`ReportFormat::Csv`]: the same columns with a header row
//! - [`ReportFormat::Json`]: sets and scan summary, pretty-printed
//!
//! # Example
//!
//! ```no_run
//! use filedupes::duplicates::DuplicateFinder;
//! use filedupes::report::{write_report, ReportFormat};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (sets, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! write_report(Path::new("dupes.out"), ReportFormat::Text, &sets, &summary).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::{DuplicateEntry, DuplicateSet, ScanSummary};

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// Report encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Space-separated lines
    #[default]
    Text,
    /// Comma-separated values with header
    Csv,
    /// Pretty-printed JSON document
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur while writing a report. All are fatal.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination file could not be created.
    #[error("Cannot create report file {path}: {source}")]
    Create {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing to the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flatten sets into entries ordered by size, signature, then path.
#[must_use]
pub fn sorted_entries(sets: &[DuplicateSet]) -> Vec<&DuplicateEntry> {
    let mut entries: Vec<&DuplicateEntry> = sets.iter().flat_map(|s| s.entries.iter()).collect();
    entries.sort_by(|a, b| {
        a.size
            .cmp(&b.size)
            .then_with(|| a.signature.cmp(&b.signature))
            .then_with(|| a.path.cmp(&b.path))
    });
    entries
}

/// Encode the report into any writer.
///
/// # Errors
///
/// Returns [`ReportError`] if writing or serialization fails.
pub fn write_to<W: Write>(
    writer: W,
    format: ReportFormat,
    sets: &[DuplicateSet],
    summary: &ScanSummary,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => TextOutput::new(sets).write_to(writer),
        ReportFormat::Csv => CsvOutput::new(sets).write_to(writer),
        ReportFormat::Json => JsonOutput::new(sets, summary).write_to(writer),
    }
}

/// Create `path` and write the report to it.
///
/// An existing file is truncated. Nothing is retried.
///
/// # Errors
///
/// Returns [`ReportError::Create`] if the file cannot be created, or another
/// [`ReportError`] if writing fails part-way.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    sets: &[DuplicateSet],
    summary: &ScanSummary,
) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    write_to(&mut writer, format, sets, summary)?;
    writer.flush()?;

    log::info!(
        "Wrote {} entries ({}) to {}",
        sets.iter().map(DuplicateSet::len).sum::<usize>(),
        format,
        path.display()
    );
    Ok(())
}
