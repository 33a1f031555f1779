//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each entry, in report order.
//!
//! # Columns
//!
//! - `size`: File size in bytes
//! - `signature`: BLAKE3 content signature (hexadecimal)
//! - `identity`: Inode number, or `-` when unavailable
//! - `path`: Path as reached from the scan root

use std::io;

use serde::Serialize;

use super::{sorted_entries, ReportError};
use crate::duplicates::DuplicateSet;
use crate::scanner::identity::display_identity;

const HEADER: [&str; 4] = ["size", "signature", "identity", "path"];

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    size: u64,
    signature: String,
    identity: String,
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    sets: &'a [DuplicateSet],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet]) -> Self {
        Self { sets }
    }

    /// Write the CSV output to the given writer.
    ///
    /// The header row is written even when there are no entries.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv_writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(HEADER)?;

        for entry in sorted_entries(self.sets) {
            csv_writer.serialize(CsvRow {
                size: entry.size,
                signature: entry.signature_hex(),
                identity: display_identity(entry.identity),
                path: entry.path.to_string_lossy().to_string(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if serialization fails.
    pub fn to_string(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
