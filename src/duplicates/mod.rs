//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Partial-signature comparison (Phase 2)
//! - Full-signature confirmation and hard-link disambiguation (Phase 3)

pub mod finder;
pub mod groups;

pub use finder::{
    phase2_partial, phase3_full, DuplicateFinder, FinderConfig, FinderError, FullConfig,
    FullStats, PartialConfig, PartialKey, PartialStats, ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{group_by_size, DuplicateEntry, DuplicateSet, GroupingStats, HardlinkPolicy};
