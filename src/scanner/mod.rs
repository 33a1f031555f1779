//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking with name-based exclusion and mount-point pruning
//! - Content signatures with BLAKE3 (bounded prefix and whole file)
//! - File identity (device + inode) for hard-link disambiguation
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//! - [`identity`]: Platform file identity tokens
//!
//! # Example
//!
//! ```no_run
//! use filedupes::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024, // Only files strictly larger than 1KB
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod identity;
pub mod walker;

use std::path::PathBuf;
use std::sync::Arc;

// Re-export main types
pub use hasher::{
    hash_to_hex, Hash, Hasher, BLOCK_SIZE, PARTIAL_BLOCKS, PARTIAL_SIZE,
};
pub use identity::FileIdentity;
pub use walker::{WalkStats, Walker};

/// Default minimum size threshold in bytes. Files must be strictly larger.
pub const DEFAULT_MIN_SIZE: u64 = 250_000;

/// Directory name that is always excluded from traversal.
pub const DEFAULT_EXCLUDE: &str = "Backups.backupdb";

/// A regular file discovered during traversal.
///
/// Descriptors are created once by the walker and never mutated afterwards;
/// every later stage consumes them by value or reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Path to the file, as reached from the scan root
    pub path: PathBuf,
    /// File size in bytes at scan time
    pub size: u64,
    /// Device + inode, `None` on platforms without inode support
    pub identity: Option<FileIdentity>,
}

impl FileDescriptor {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, identity: Option<FileIdentity>) -> Self {
        Self {
            path,
            size,
            identity,
        }
    }

    /// Whether this descriptor refers to different underlying data than `other`.
    ///
    /// Two descriptors are only considered the same file when both carry an
    /// identity and the identities are equal. Without identity information
    /// every descriptor is treated as distinct.
    #[must_use]
    pub fn is_distinct_from(&self, other: &FileDescriptor) -> bool {
        match (self.identity, other.identity) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Files must be strictly larger than this many bytes.
    pub min_size: u64,

    /// Directory names (not paths) that are never descended into.
    pub exclude_dirs: Vec<String>,

    /// Descend into directories that live on a different filesystem.
    pub cross_mount_points: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            exclude_dirs: vec![DEFAULT_EXCLUDE.to_string()],
            cross_mount_points: false,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    ///
    /// `extra_excludes` are merged with the built-in [`DEFAULT_EXCLUDE`]
    /// rather than replacing it.
    #[must_use]
    pub fn new(min_size: u64, extra_excludes: Vec<String>, cross_mount_points: bool) -> Self {
        Self::default()
            .with_min_size(min_size)
            .with_excludes(extra_excludes)
            .with_cross_mount_points(cross_mount_points)
    }

    /// Set the minimum size threshold.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Add directory names to the exclusion set.
    #[must_use]
    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !name.is_empty() && !self.exclude_dirs.contains(&name) {
                self.exclude_dirs.push(name);
            }
        }
        self
    }

    /// Allow or forbid crossing filesystem boundaries.
    #[must_use]
    pub fn with_cross_mount_points(mut self, cross: bool) -> Self {
        self.cross_mount_points = cross;
        self
    }

    /// Whether a directory with this name is excluded.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|e| e == name)
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: Arc::new(error),
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
