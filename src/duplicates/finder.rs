//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size grouping**: Group files by size (see [`crate::duplicates::groups`] module)
//! 2. **Phase 2 - Partial signature**: Hash the first 80KB of same-size files
//! 3. **Phase 3 - Full signature**: Hash entire content of partial matches
//!
//! Each phase takes ownership of the previous phase's groups and returns new
//! ones; singleton buckets are dropped at every step.
//!
//! # Example
//!
//! ```no_run
//! use filedupes::scanner::{FileDescriptor, Hasher, Walker, WalkerConfig};
//! use filedupes::duplicates::{group_by_size, phase2_partial, PartialConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! // Phase 1: Collect and group files by size
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files: Vec<FileDescriptor> = walker.walk().filter_map(Result::ok).collect();
//! let (size_groups, _) = group_by_size(files);
//!
//! // Phase 2: Compute partial signatures for potential duplicates
//! let hasher = Arc::new(Hasher::new());
//! let (partial_groups, stats) = phase2_partial(size_groups, hasher, PartialConfig::default());
//!
//! println!("Phase 2: {} potential duplicates remain", stats.potential_duplicates);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::groups::{group_by_size, DuplicateSet, HardlinkPolicy};
use crate::progress::{ProgressCallback, PHASE_FULL, PHASE_PARTIAL, PHASE_WALKING};
use crate::scanner::identity::distinct_count;
use crate::scanner::{
    hash_to_hex, FileDescriptor, FileIdentity, Hash, HashError, Hasher, ScanError, Walker,
    WalkerConfig,
};

/// Default number of threads used for hashing.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Files larger than this are logged at debug level before full hashing.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Key of a partial-signature group: exact size plus prefix digest.
pub type PartialKey = (u64, Hash);

// ============================================================================
// Phase 2 - Partial signatures
// ============================================================================

/// Configuration for the partial-signature phase.
#[derive(Clone)]
pub struct PartialConfig {
    /// Number of I/O threads for parallel hashing
    pub io_threads: usize,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for PartialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for PartialConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            progress_callback: None,
        }
    }
}

impl PartialConfig {
    /// Set the number of I/O threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the partial-signature phase.
#[derive(Debug, Clone, Default)]
pub struct PartialStats {
    /// Total files that entered Phase 2
    pub input_files: usize,
    /// Number of files that received a partial signature
    pub hashed_files: usize,
    /// Number of files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Errors encountered during partial hashing
    pub errors: Vec<HashError>,
    /// Number of files whose (size, partial) key was unique
    pub unique_signatures: usize,
    /// Number of files that could still be duplicates
    pub potential_duplicates: usize,
    /// Number of partial groups with 2+ files
    pub candidate_groups: usize,
}

impl PartialStats {
    /// Percentage of input files eliminated by partial comparison.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            let eliminated = self.input_files - self.potential_duplicates;
            (eliminated as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Group files by partial signature within size groups (Phase 2).
///
/// For every file in a multi-member size group, hashes at most
/// [`Hasher::partial_len`] bytes from the start of the file and re-groups by
/// `(size, partial)`. Only groups with two or more members are returned.
///
/// Files that cannot be opened or read are dropped and recorded in
/// [`PartialStats::errors`]; their siblings are unaffected.
///
/// Hard links to one inode are read once and share the resulting digest.
#[must_use]
pub fn phase2_partial(
    size_groups: HashMap<u64, Vec<FileDescriptor>>,
    hasher: Arc<Hasher>,
    config: PartialConfig,
) -> (HashMap<PartialKey, Vec<FileDescriptor>>, PartialStats) {
    let all_files: Vec<FileDescriptor> = size_groups.into_values().flatten().collect();
    let mut stats = PartialStats {
        input_files: all_files.len(),
        ..Default::default()
    };

    if all_files.is_empty() {
        log::debug!("Phase 2: No files to process");
        return (HashMap::new(), stats);
    }

    log::info!(
        "Phase 2: Computing partial signatures for {} files",
        all_files.len()
    );

    let units = split_by_identity(all_files);
    let results = hash_units(
        units,
        config.io_threads,
        config.progress_callback.as_ref(),
        PHASE_PARTIAL,
        |path| hasher.partial(path),
    );

    let mut partial_groups: HashMap<PartialKey, Vec<FileDescriptor>> = HashMap::new();
    for (members, result) in results {
        match result {
            Ok(partial) => {
                stats.hashed_files += members.len();
                for file in members {
                    partial_groups
                        .entry((file.size, partial))
                        .or_default()
                        .push(file);
                }
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", e.path().display(), e);
                stats.failed_files += members.len();
                stats.errors.push(e);
            }
        }
    }

    partial_groups.retain(|(size, partial), files| {
        if files.len() == 1 {
            stats.unique_signatures += 1;
            log::trace!(
                "Eliminated unique partial signature {}: {}",
                hash_to_hex(partial),
                files[0].path.display()
            );
            false
        } else {
            stats.potential_duplicates += files.len();
            stats.candidate_groups += 1;
            log::debug!(
                "Partial group {} ({} bytes): {} potential duplicates",
                hash_to_hex(partial),
                size,
                files.len()
            );
            true
        }
    });

    log::info!(
        "Phase 2 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.input_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (partial_groups, stats)
}

// ============================================================================
// Phase 3 - Full signatures
// ============================================================================

/// Configuration for the full-signature phase.
#[derive(Clone)]
pub struct FullConfig {
    /// Number of I/O threads for parallel hashing
    pub io_threads: usize,
    /// Treatment of sets made only of hard links to one inode
    pub hardlink_policy: HardlinkPolicy,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FullConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullConfig")
            .field("io_threads", &self.io_threads)
            .field("hardlink_policy", &self.hardlink_policy)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FullConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            hardlink_policy: HardlinkPolicy::default(),
            progress_callback: None,
        }
    }
}

impl FullConfig {
    /// Set the number of I/O threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the hard-link policy.
    #[must_use]
    pub fn with_hardlink_policy(mut self, policy: HardlinkPolicy) -> Self {
        self.hardlink_policy = policy;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the full-signature phase.
#[derive(Debug, Clone, Default)]
pub struct FullStats {
    /// Total files that entered Phase 3
    pub input_files: usize,
    /// Number of files that received a full signature
    pub hashed_files: usize,
    /// Number of files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Errors encountered during full hashing
    pub errors: Vec<HashError>,
    /// Bytes actually read (hard links are read once)
    pub bytes_hashed: u64,
    /// Number of confirmed genuine duplicate sets
    pub duplicate_sets: usize,
    /// Number of content-equal sets made only of hard links
    pub hardlink_only_sets: usize,
    /// Redundant copies across genuine sets (distinct files minus one per set)
    pub duplicate_files: usize,
    /// Bytes reclaimable across genuine sets
    pub wasted_space: u64,
}

/// Confirm duplicates by full-content signature (Phase 3).
///
/// Every member of a partial group is hashed in full and re-grouped by
/// `(size, full)`. A group with two or more members becomes a
/// [`DuplicateSet`]. Sets with at least two distinct identities are genuine
/// and counted; sets whose members are all one inode are counted in
/// [`FullStats::hardlink_only_sets`] and only returned under
/// [`HardlinkPolicy::Report`].
///
/// Returned sets are sorted by size, then signature.
#[must_use]
pub fn phase3_full(
    partial_groups: HashMap<PartialKey, Vec<FileDescriptor>>,
    hasher: Arc<Hasher>,
    config: FullConfig,
) -> (Vec<DuplicateSet>, FullStats) {
    let mut stats = FullStats {
        input_files: partial_groups.values().map(Vec::len).sum(),
        ..Default::default()
    };

    let mut units = Vec::new();
    for (_, files) in partial_groups {
        // A single inode cannot produce a genuine set; skip reading it at all.
        if config.hardlink_policy == HardlinkPolicy::Skip
            && distinct_count(files.iter().map(|f| &f.identity)) < 2
        {
            log::debug!(
                "Skipping hard-link-only group: {}",
                files
                    .iter()
                    .map(|f| f.path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            stats.hardlink_only_sets += 1;
            continue;
        }
        units.extend(split_by_identity(files));
    }

    if units.is_empty() {
        log::debug!("Phase 3: No files to process");
        return (Vec::new(), stats);
    }

    log::info!(
        "Phase 3: Computing full signatures for {} files",
        units.iter().map(Vec::len).sum::<usize>()
    );

    let results = hash_units(
        units,
        config.io_threads,
        config.progress_callback.as_ref(),
        PHASE_FULL,
        |path| hasher.full(path),
    );

    let mut full_groups: HashMap<(u64, Hash), Vec<FileDescriptor>> = HashMap::new();
    for (members, result) in results {
        match result {
            Ok(full) => {
                stats.hashed_files += members.len();
                stats.bytes_hashed += members.first().map_or(0, |f| f.size);
                for file in members {
                    full_groups.entry((file.size, full)).or_default().push(file);
                }
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", e.path().display(), e);
                stats.failed_files += members.len();
                stats.errors.push(e);
            }
        }
    }

    let mut sets = Vec::new();
    for ((size, full), files) in full_groups {
        if files.len() < 2 {
            continue;
        }

        let set = DuplicateSet::new(size, full, files);
        if set.is_genuine() {
            log::debug!(
                "Duplicate set {}: {} paths, {} distinct files, {} bytes each",
                set.signature_hex(),
                set.len(),
                set.distinct_identities(),
                size
            );
            stats.duplicate_sets += 1;
            stats.duplicate_files += set.duplicate_count();
            stats.wasted_space = stats.wasted_space.saturating_add(set.reclaimable_bytes());
            sets.push(set);
        } else {
            stats.hardlink_only_sets += 1;
            if config.hardlink_policy == HardlinkPolicy::Report {
                log::debug!(
                    "Hard-link-only set {}: {} paths",
                    set.signature_hex(),
                    set.len()
                );
                sets.push(set);
            }
        }
    }

    sets.sort_by(|a, b| (a.size, a.signature).cmp(&(b.size, b.signature)));

    log::info!(
        "Phase 3 complete: {} duplicate sets, {} duplicate files, {} bytes reclaimable",
        stats.duplicate_sets,
        stats.duplicate_files,
        stats.wasted_space
    );

    (sets, stats)
}

/// Split files into hashing units, one per distinct identity.
///
/// Members of a unit are sorted by path so the first one, which is the one
/// actually read, is stable between runs. Files without identity each form
/// their own unit.
fn split_by_identity(files: Vec<FileDescriptor>) -> Vec<Vec<FileDescriptor>> {
    let mut by_identity: HashMap<FileIdentity, Vec<FileDescriptor>> = HashMap::new();
    let mut units = Vec::new();

    for file in files {
        match file.identity {
            Some(id) => by_identity.entry(id).or_default().push(file),
            None => units.push(vec![file]),
        }
    }

    for (_, mut members) in by_identity {
        members.sort_by(|a, b| a.path.cmp(&b.path));
        units.push(members);
    }

    units
}

/// Hash the first member of every unit in a bounded rayon pool.
///
/// Results keep the input order; callers merge them on the calling thread.
fn hash_units<F>(
    units: Vec<Vec<FileDescriptor>>,
    io_threads: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
    phase: &str,
    hash_fn: F,
) -> Vec<(Vec<FileDescriptor>, Result<Hash, HashError>)>
where
    F: Fn(&Path) -> Result<Hash, HashError> + Sync,
{
    if let Some(callback) = progress {
        callback.on_phase_start(phase, units.len());
    }

    let completed = AtomicUsize::new(0);
    let work = || {
        units
            .into_par_iter()
            .filter(|members| !members.is_empty())
            .map(|members| {
                let representative = &members[0];
                if phase == PHASE_FULL && representative.size > LARGE_FILE_THRESHOLD {
                    log::debug!(
                        "Hashing large file ({}): {}",
                        ByteSize::b(representative.size),
                        representative.path.display()
                    );
                }

                let result = hash_fn(&representative.path);
                if result.is_ok() {
                    log::trace!("{} signature computed: {}", phase, representative.path.display());
                }

                if let Some(callback) = progress {
                    let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    callback.on_progress(current, representative.path.to_string_lossy().as_ref());
                    if result.is_ok() {
                        callback.on_item_completed(representative.size);
                    }
                }

                (members, result)
            })
            .collect::<Vec<_>>()
    };

    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            log::warn!(
                "Failed to create I/O thread pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            work()
        }
    };

    if let Some(callback) = progress {
        callback.on_phase_end(phase);
    }

    results
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for hashing
    pub io_threads: usize,
    /// Traversal policy
    pub walker_config: WalkerConfig,
    /// Treatment of hard-link-only sets
    pub hardlink_policy: HardlinkPolicy,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("hardlink_policy", &self.hardlink_policy)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            walker_config: WalkerConfig::default(),
            hardlink_policy: HardlinkPolicy::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of I/O threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the hard-link policy.
    #[must_use]
    pub fn with_hardlink_policy(mut self, policy: HardlinkPolicy) -> Self {
        self.hardlink_policy = policy;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Directories whose entries were read
    pub directories_visited: usize,
    /// Files above the size threshold
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Files eliminated by partial signature
    pub eliminated_by_partial: usize,
    /// Confirmed genuine duplicate sets
    pub duplicate_sets: usize,
    /// Content-equal sets made only of hard links (never counted as duplicates)
    pub hardlink_only_sets: usize,
    /// Entries across all returned sets
    pub duplicate_entries: usize,
    /// Bytes reclaimable by keeping one copy of each genuine set
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that prevent a scan from starting.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The directory exists but its entries cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    Unreadable {
        /// The scan root
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that orchestrates the multi-phase detection pipeline.
///
/// # Example
///
/// ```no_run
/// use filedupes::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
/// let (sets, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate sets", summary.duplicate_sets);
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<Hasher>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Arc::new(Hasher::new()),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files beneath `path`.
    ///
    /// Traversal and hashing errors are collected in
    /// [`ScanSummary::scan_errors`] and never abort the scan.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path does not exist, is not a
    /// directory, or cannot be listed. These checks happen before any
    /// traversal.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        if let Err(source) = std::fs::read_dir(path) {
            return Err(FinderError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }

        log::info!("Starting duplicate scan of {}", path.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let mut files = Vec::new();
        let mut scan_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) => scan_errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        let walk_stats = walker.stats();
        log::info!(
            "Walk complete: {} directories, {} files above {} bytes, {} pruned",
            walk_stats.directories(),
            files.len(),
            self.config.walker_config.min_size,
            walk_stats.pruned()
        );

        let mut summary = ScanSummary {
            directories_visited: walk_stats.directories(),
            scan_errors,
            ..Default::default()
        };
        let sets = self.run_phases(files, &mut summary);
        summary.scan_duration = start_time.elapsed();

        Ok((sets, summary))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Runs size grouping, partial and full signatures on `files` without
    /// touching the directory tree.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileDescriptor>,
    ) -> (Vec<DuplicateSet>, ScanSummary) {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let sets = self.run_phases(files, &mut summary);
        summary.scan_duration = start_time.elapsed();
        (sets, summary)
    }

    fn run_phases(&self, files: Vec<FileDescriptor>, summary: &mut ScanSummary) -> Vec<DuplicateSet> {
        let (size_groups, size_stats) = group_by_size(files);
        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.eliminated_by_size = size_stats.eliminated_unique;

        log::info!(
            "Found {} files ({} total)",
            summary.total_files,
            summary.total_size_display()
        );

        if size_groups.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            return Vec::new();
        }

        let partial_config = PartialConfig {
            io_threads: self.config.io_threads,
            progress_callback: self.config.progress_callback.clone(),
        };
        let (partial_groups, partial_stats) =
            phase2_partial(size_groups, Arc::clone(&self.hasher), partial_config);

        summary.eliminated_by_partial = partial_stats.unique_signatures;
        summary
            .scan_errors
            .extend(partial_stats.errors.into_iter().map(ScanError::from));

        if partial_groups.is_empty() {
            log::info!("No potential duplicates found after partial signatures");
            return Vec::new();
        }

        let full_config = FullConfig {
            io_threads: self.config.io_threads,
            hardlink_policy: self.config.hardlink_policy,
            progress_callback: self.config.progress_callback.clone(),
        };
        let (sets, full_stats) =
            phase3_full(partial_groups, Arc::clone(&self.hasher), full_config);

        summary
            .scan_errors
            .extend(full_stats.errors.into_iter().map(ScanError::from));
        summary.duplicate_sets = full_stats.duplicate_sets;
        summary.hardlink_only_sets = full_stats.hardlink_only_sets;
        summary.duplicate_entries = sets.iter().map(DuplicateSet::len).sum();
        summary.reclaimable_space = full_stats.wasted_space;

        log::info!(
            "Scan complete: {} duplicate sets, {} entries, {} reclaimable, {} errors",
            summary.duplicate_sets,
            summary.duplicate_entries,
            summary.reclaimable_display(),
            summary.scan_errors.len()
        );

        sets
    }
}
