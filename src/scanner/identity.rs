//! File identity tokens for hard-link disambiguation.
//!
//! # Overview
//!
//! Hard links are multiple directory entries pointing to the same inode on
//! disk. They share content but are the same file, so a content match between
//! two hard links says nothing about duplication. The walker records a
//! [`FileIdentity`] for every file so later stages can tell "same data reached
//! twice" apart from "two copies of the same data".
//!
//! # Platform Support
//!
//! - **Unix**: (device_id, inode) pairs from `lstat` metadata
//! - **Other**: no identity available, every file is treated as distinct
//!
//! # Example
//!
//! ```no_run
//! use filedupes::scanner::FileIdentity;
//!
//! let meta = std::fs::symlink_metadata("some/file.bin").unwrap();
//! if let Some(id) = FileIdentity::from_metadata(&meta) {
//!     println!("inode {}", id);
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs::Metadata;

use serde::Serialize;

/// Platform file identity: the device and inode a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileIdentity {
    /// Device the file lives on
    pub dev: u64,
    /// Inode number on that device
    pub ino: u64,
}

impl FileIdentity {
    /// Create an identity from raw device and inode numbers.
    #[must_use]
    pub const fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    /// Read the identity from file metadata.
    ///
    /// Pass metadata from `symlink_metadata` so symbolic links are not
    /// resolved. Returns `None` where the platform exposes no inode.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    /// Read the identity from file metadata.
    ///
    /// Windows metadata does not expose the file index without opening a
    /// handle, so identity is unavailable there.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Reports show the inode number; the device is only used for comparison.
impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ino)
    }
}

/// Count the distinct underlying files among a set of identities.
///
/// `None` identities are unknown and each one counts as its own file.
#[must_use]
pub fn distinct_count<'a, I>(identities: I) -> usize
where
    I: IntoIterator<Item = &'a Option<FileIdentity>>,
{
    let mut seen = HashSet::new();
    let mut unknown = 0usize;
    for id in identities {
        match id {
            Some(id) => {
                seen.insert(*id);
            }
            None => unknown += 1,
        }
    }
    seen.len() + unknown
}

/// Format an optional identity for reports, `-` when unknown.
#[must_use]
pub fn display_identity(identity: Option<FileIdentity>) -> String {
    identity.map_or_else(|| "-".to_string(), |id| id.to_string())
}
