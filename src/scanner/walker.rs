//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting [`FileDescriptor`]s for duplicate detection.
//!
//! # Features
//!
//! - Parallel directory reads using jwalk's rayon pool
//! - Name-based directory exclusion at every depth
//! - Mount-point pruning (unless crossing is enabled)
//! - Strict minimum size filter
//! - Symlinks are never followed; identity comes from `lstat`
//!
//! Pruning happens in jwalk's `process_read_dir` hook, on the children list of
//! a directory before any child is read, so excluded and foreign-filesystem
//! subtrees are never touched.
//!
//! # Example
//!
//! ```no_run
//! use filedupes::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default()
//!     .with_min_size(250_000)
//!     .with_excludes(["node_modules"]);
//!
//! let walker = Walker::new(Path::new("/home/user"), config);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!(
//!     "{} files in {} directories",
//!     files.len(),
//!     walker.stats().directories()
//! );
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::{FileDescriptor, FileIdentity, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Counters maintained while walking. Diagnostic only.
#[derive(Debug, Default)]
pub struct WalkStats {
    directories: AtomicUsize,
    files: AtomicUsize,
    pruned: AtomicUsize,
    errors: AtomicUsize,
}

impl WalkStats {
    /// Directories whose entries were read.
    #[must_use]
    pub fn directories(&self) -> usize {
        self.directories.load(Ordering::Relaxed)
    }

    /// Files that passed every filter.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files.load(Ordering::Relaxed)
    }

    /// Directories pruned by exclusion or mount boundary.
    #[must_use]
    pub fn pruned(&self) -> usize {
        self.pruned.load(Ordering::Relaxed)
    }

    /// Entries that could not be read or stat'd.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Shared counters
    stats: Arc<WalkStats>,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            stats: Arc::new(WalkStats::default()),
            progress_callback: None,
        }
    }

    /// Set the progress callback, invoked once per accepted file.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Counters for this walker. Complete once the iterator is drained.
    #[must_use]
    pub fn stats(&self) -> Arc<WalkStats> {
        Arc::clone(&self.stats)
    }

    /// Walk the directory tree, yielding file descriptors.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Only regular files strictly larger than
    /// [`WalkerConfig::min_size`] are yielded.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileDescriptor, ScanError>> + '_ {
        let config = self.config.clone();
        let stats = Arc::clone(&self.stats);

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(move |depth, dir_path, _read_dir_state, children| {
                // depth is None for the synthetic read that yields the root itself
                if depth.is_none() {
                    return;
                }
                stats.directories.fetch_add(1, Ordering::Relaxed);

                let parent_dev = if config.cross_mount_points {
                    None
                } else {
                    match std::fs::symlink_metadata(dir_path) {
                        Ok(meta) => device_of(&meta),
                        Err(e) => {
                            log::debug!(
                                "Cannot stat {} for mount check: {}",
                                dir_path.display(),
                                e
                            );
                            None
                        }
                    }
                };

                children.retain(|child| {
                    let Ok(entry) = child else {
                        return true;
                    };
                    if !entry.file_type().is_dir() {
                        return true;
                    }

                    let name = entry.file_name().to_string_lossy();
                    if config.is_excluded(&name) {
                        log::debug!("Excluding directory: {}", entry.path().display());
                        stats.pruned.fetch_add(1, Ordering::Relaxed);
                        return false;
                    }

                    if let Some(parent_dev) = parent_dev {
                        let path = entry.path();
                        match std::fs::symlink_metadata(&path) {
                            Ok(meta) => {
                                if crosses_mount(parent_dev, device_of(&meta)) {
                                    log::debug!("Skipping mount point: {}", path.display());
                                    stats.pruned.fetch_add(1, Ordering::Relaxed);
                                    return false;
                                }
                            }
                            Err(e) => {
                                log::warn!("Cannot stat directory {}: {}", path.display(), e);
                                stats.errors.fetch_add(1, Ordering::Relaxed);
                                return false;
                            }
                        }
                    }

                    true
                });

                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(mut entry) => {
                    // jwalk reports a failed directory read on the directory's own entry
                    if let Some(err) = entry.read_children_error.take() {
                        return Some(self.handle_jwalk_error(entry.path(), err));
                    }

                    // Skip the root directory itself
                    if entry.depth == 0 {
                        return None;
                    }

                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    let path = entry.path();
                    match std::fs::symlink_metadata(&path) {
                        Ok(metadata) => self.process_file_entry(path, &metadata),
                        Err(e) => Some(self.handle_io_error(&path, e)),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(self.handle_jwalk_error(path, e))
                }
            })
    }

    /// Apply per-file filters and build the descriptor.
    fn process_file_entry(
        &self,
        path: PathBuf,
        metadata: &Metadata,
    ) -> Option<Result<FileDescriptor, ScanError>> {
        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if size <= self.config.min_size {
            log::trace!(
                "Skipping file at or below threshold ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        let count = self.stats.files.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(count, path.to_string_lossy().as_ref());
        }

        Some(Ok(FileDescriptor {
            identity: FileIdentity::from_metadata(metadata),
            path,
            size,
        }))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> Result<FileDescriptor, ScanError> {
        use std::io::ErrorKind;

        self.stats.errors.fetch_add(1, Ordering::Relaxed);
        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Err(ScanError::PermissionDenied(path.to_path_buf()))
            }
            ErrorKind::NotFound => {
                log::warn!("File vanished during scan: {}", path.display());
                Err(ScanError::NotFound(path.to_path_buf()))
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }

    /// Handle jwalk errors, keeping the underlying I/O error kind.
    fn handle_jwalk_error(
        &self,
        path: PathBuf,
        error: jwalk::Error,
    ) -> Result<FileDescriptor, ScanError> {
        let kind = error
            .io_error()
            .map_or(std::io::ErrorKind::Other, std::io::Error::kind);
        self.handle_io_error(&path, std::io::Error::new(kind, error.to_string()))
    }
}

/// Whether a directory on `child_dev` lies across a mount boundary from its
/// parent on `parent_dev`. Unknown devices never count as a boundary.
fn crosses_mount(parent_dev: u64, child_dev: Option<u64>) -> bool {
    child_dev.is_some_and(|dev| dev != parent_dev)
}

#[cfg(unix)]
fn device_of(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.dev())
}

// Windows doesn't have device IDs in the same way
#[cfg(not(unix))]
fn device_of(_metadata: &Metadata) -> Option<u64> {
    None
}
