//! Size grouping and confirmed duplicate sets.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. It partitions
//! files by exact size; files with a unique size cannot have a duplicate and
//! are dropped before any byte is read.
//!
//! The confirmed output of the pipeline is a list of [`DuplicateSet`]s, each
//! holding one [`DuplicateEntry`] per path whose full signature matched.
//!
//! # Example
//!
//! ```
//! use filedupes::scanner::FileDescriptor;
//! use filedupes::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileDescriptor::new(PathBuf::from("/file1.txt"), 1024, None),
//!     FileDescriptor::new(PathBuf::from("/file2.txt"), 1024, None),
//!     FileDescriptor::new(PathBuf::from("/file3.txt"), 2048, None),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scanner::identity::distinct_count;
use crate::scanner::{hash_to_hex, FileDescriptor, FileIdentity, Hash};

/// What to do with a content-equal set whose members are all one file.
///
/// Such a set is the same inode reached through several hard links. It is
/// never counted as a duplicate; the policy only decides whether it is
/// written to the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HardlinkPolicy {
    /// Drop sets made only of hard links to one inode.
    #[default]
    Skip,
    /// Report them alongside genuine duplicates.
    Report,
}

impl std::fmt::Display for HardlinkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardlinkPolicy::Skip => write!(f, "skip"),
            HardlinkPolicy::Report => write!(f, "report"),
        }
    }
}

/// One confirmed path in a duplicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    /// File size in bytes
    pub size: u64,
    /// Full-content signature
    pub signature: Hash,
    /// Path as reached from the scan root
    pub path: PathBuf,
    /// Device + inode, if known
    pub identity: Option<FileIdentity>,
}

impl DuplicateEntry {
    /// Build an entry from a descriptor and its full signature.
    #[must_use]
    pub fn new(file: FileDescriptor, signature: Hash) -> Self {
        Self {
            size: file.size,
            signature,
            path: file.path,
            identity: file.identity,
        }
    }

    /// Signature as hexadecimal string.
    #[must_use]
    pub fn signature_hex(&self) -> String {
        hash_to_hex(&self.signature)
    }
}

/// Files proven content-identical by full-signature match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    /// Shared file size
    pub size: u64,
    /// Shared full-content signature
    pub signature: Hash,
    /// One entry per path, sorted by path
    pub entries: Vec<DuplicateEntry>,
}

impl DuplicateSet {
    /// Create a set from descriptors sharing `signature`.
    #[must_use]
    pub fn new(size: u64, signature: Hash, files: Vec<FileDescriptor>) -> Self {
        let mut entries: Vec<DuplicateEntry> = files
            .into_iter()
            .map(|f| DuplicateEntry::new(f, signature))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            size,
            signature,
            entries,
        }
    }

    /// Number of paths in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct underlying files (hard links count once).
    #[must_use]
    pub fn distinct_identities(&self) -> usize {
        distinct_count(self.entries.iter().map(|e| &e.identity))
    }

    /// True when at least one pair of members has differing identity.
    ///
    /// A set whose members all share one identity is a single inode reached
    /// through several paths, not a duplicate.
    #[must_use]
    pub fn is_genuine(&self) -> bool {
        self.distinct_identities() >= 2
    }

    /// Redundant copies: distinct files minus the one to keep.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.distinct_identities().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping one copy.
    ///
    /// Hard links share storage, so only distinct files count.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.size.saturating_mul(self.duplicate_count() as u64)
    }

    /// Signature as hexadecimal string.
    #[must_use]
    pub fn signature_hex(&self) -> String {
        hash_to_hex(&self.signature)
    }

    /// Get just the paths of files in this set.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Returns only groups with two or more members, plus statistics about
/// what was dropped. No file I/O is performed.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileDescriptor>,
) -> (HashMap<u64, Vec<FileDescriptor>>, GroupingStats) {
    let mut all_groups: HashMap<u64, Vec<FileDescriptor>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size = stats.total_size.saturating_add(file.size);
        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    all_groups.retain(|size, files| {
        if files.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                files[0].path.display()
            );
            false
        } else {
            stats.potential_duplicates += files.len();
            stats.duplicate_groups += 1;
            log::debug!(
                "Size group {} bytes: {} potential duplicates",
                size,
                files.len()
            );
            true
        }
    });

    log::info!(
        "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (all_groups, stats)
}
