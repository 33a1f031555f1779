//! Line-oriented text report.
//!
//! Each entry is written as `<size> <signature-hex> <identity> <path>`
//! followed by a newline. Identity is the inode number, or `-` when the
//! platform has none. There is no header and no trailer.

use std::io::Write;

use super::{sorted_entries, ReportError};
use crate::duplicates::DuplicateSet;
use crate::scanner::identity::display_identity;

/// Text output formatter.
pub struct TextOutput<'a> {
    sets: &'a [DuplicateSet],
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet]) -> Self {
        Self { sets }
    }

    /// Write all entries to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ReportError> {
        for entry in sorted_entries(self.sets) {
            writeln!(
                writer,
                "{} {} {} {}",
                entry.size,
                entry.signature_hex(),
                display_identity(entry.identity),
                entry.path.display()
            )?;
        }
        Ok(())
    }
}
