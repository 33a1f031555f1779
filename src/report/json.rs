//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "sets": [
//!     {
//!       "size": 1024,
//!       "signature": "abc123...",
//!       "genuine": true,
//!       "entries": [
//!         { "path": "/path/to/file1.txt", "identity": 1234 },
//!         { "path": "/path/to/file2.txt", "identity": 5678 }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "directories_visited": 12,
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "duplicate_sets": 5,
//!     "reclaimable_space": 51200,
//!     "scan_duration_ms": 1234,
//!     ...
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::ReportError;
use crate::duplicates::{DuplicateEntry, DuplicateSet, ScanSummary};

/// One path of a set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonEntry {
    /// Path as reached from the scan root
    pub path: String,
    /// Inode number, `null` when unavailable
    pub identity: Option<u64>,
}

impl From<&DuplicateEntry> for JsonEntry {
    fn from(entry: &DuplicateEntry) -> Self {
        Self {
            path: entry.path.to_string_lossy().into_owned(),
            identity: entry.identity.map(|id| id.ino),
        }
    }
}

/// A single duplicate set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateSet {
    /// File size in bytes
    pub size: u64,
    /// BLAKE3 signature as hexadecimal string (64 characters)
    pub signature: String,
    /// False for sets made only of hard links to one inode
    pub genuine: bool,
    /// Member paths, sorted
    pub entries: Vec<JsonEntry>,
}

impl From<&DuplicateSet> for JsonDuplicateSet {
    fn from(set: &DuplicateSet) -> Self {
        Self {
            size: set.size,
            signature: set.signature_hex(),
            genuine: set.is_genuine(),
            entries: set.entries.iter().map(JsonEntry::from).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Directories whose entries were read
    pub directories_visited: usize,
    /// Files above the size threshold
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files eliminated by size grouping
    pub eliminated_by_size: usize,
    /// Files eliminated by partial signature
    pub eliminated_by_partial: usize,
    /// Confirmed genuine duplicate sets
    pub duplicate_sets: usize,
    /// Sets made only of hard links
    pub hardlink_only_sets: usize,
    /// Entries across all reported sets
    pub duplicate_entries: usize,
    /// Bytes reclaimable by keeping one copy of each set
    pub reclaimable_space: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Number of files or directories that could not be read
    pub scan_errors: usize,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            directories_visited: summary.directories_visited,
            total_files: summary.total_files,
            total_size: summary.total_size,
            eliminated_by_size: summary.eliminated_by_size,
            eliminated_by_partial: summary.eliminated_by_partial,
            duplicate_sets: summary.duplicate_sets,
            hardlink_only_sets: summary.hardlink_only_sets,
            duplicate_entries: summary.duplicate_entries,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            scan_errors: summary.scan_errors.len(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate sets ordered by size, then signature
    pub sets: Vec<JsonDuplicateSet>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate sets and summary.
    ///
    /// # Example
    ///
    /// ```
    /// use filedupes::duplicates::ScanSummary;
    /// use filedupes::report::JsonOutput;
    ///
    /// let output = JsonOutput::new(&[], &ScanSummary::default());
    /// assert!(output.sets.is_empty());
    /// ```
    #[must_use]
    pub fn new(sets: &[DuplicateSet], summary: &ScanSummary) -> Self {
        let mut ordered: Vec<&DuplicateSet> = sets.iter().collect();
        ordered.sort_by(|a, b| (a.size, a.signature).cmp(&(b.size, b.signature)));
        Self {
            sets: ordered.into_iter().map(JsonDuplicateSet::from).collect(),
            summary: JsonSummary::from(summary),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
