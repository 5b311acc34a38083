//! Index statistics with atomic counters.
//!
//! This module provides [`IndexStats`], updated by every cache build, and
//! [`IndexStatsSnapshot`] for point-in-time views.
//!
//! # Thread Safety
//!
//! All counters use [`AtomicU64`] with
//! [`Relaxed`](std::sync::atomic::Ordering::Relaxed) ordering. Statistics are
//! informational and don't require strict ordering guarantees.
//!
//! # Examples
//!
//! ```
//! use dirsrc_index::IndexStats;
//!
//! let stats = IndexStats::new();
//! stats.record_file_build(12, 3, 0);
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.file_cache_builds, 1);
//! assert_eq!(snapshot.files_discovered, 12);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters describing cache activity.
///
/// Build counters are cumulative. The `files_discovered`, `summaries` and
/// `parse_errors` gauges describe the most recent build of their cache.
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Number of file cache builds.
    file_cache_builds: AtomicU64,
    /// Number of successful summary cache builds.
    summary_cache_builds: AtomicU64,
    /// Directories listed across all walks.
    directories_enumerated: AtomicU64,
    /// Directories skipped across all walks.
    directories_skipped: AtomicU64,
    /// Files in the current file cache.
    files_discovered: AtomicU64,
    /// Summaries in the current summary cache.
    summaries: AtomicU64,
    /// Malformed documents in the current summary cache.
    parse_errors: AtomicU64,
}

impl IndexStats {
    /// Creates a new [`IndexStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed file cache build.
    pub fn record_file_build(&self, files: u64, enumerated: u64, skipped: u64) {
        self.file_cache_builds.fetch_add(1, Ordering::Relaxed);
        self.directories_enumerated.fetch_add(enumerated, Ordering::Relaxed);
        self.directories_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.files_discovered.store(files, Ordering::Relaxed);
    }

    /// Records a completed summary cache build.
    pub fn record_summary_build(&self, summaries: u64, parse_errors: u64) {
        self.summary_cache_builds.fetch_add(1, Ordering::Relaxed);
        self.summaries.store(summaries, Ordering::Relaxed);
        self.parse_errors.store(parse_errors, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all statistics.
    #[must_use]
    pub fn snapshot(&self) -> IndexStatsSnapshot {
        IndexStatsSnapshot {
            file_cache_builds: self.file_cache_builds.load(Ordering::Relaxed),
            summary_cache_builds: self.summary_cache_builds.load(Ordering::Relaxed),
            directories_enumerated: self.directories_enumerated.load(Ordering::Relaxed),
            directories_skipped: self.directories_skipped.load(Ordering::Relaxed),
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            summaries: self.summaries.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`IndexStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStatsSnapshot {
    /// Number of file cache builds.
    pub file_cache_builds: u64,
    /// Number of successful summary cache builds.
    pub summary_cache_builds: u64,
    /// Directories listed across all walks.
    pub directories_enumerated: u64,
    /// Directories skipped across all walks.
    pub directories_skipped: u64,
    /// Files in the current file cache.
    pub files_discovered: u64,
    /// Summaries in the current summary cache.
    pub summaries: u64,
    /// Malformed documents in the current summary cache.
    pub parse_errors: u64,
}

impl IndexStatsSnapshot {
    /// Returns the total number of cache builds of either kind.
    #[inline]
    #[must_use]
    pub const fn total_builds(&self) -> u64 {
        self.file_cache_builds + self.summary_cache_builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_stats_new() {
        assert_eq!(IndexStats::new().snapshot(), IndexStatsSnapshot::default());
    }

    #[test]
    fn test_builds_accumulate_and_gauges_overwrite() {
        let stats = IndexStats::new();

        stats.record_file_build(10, 2, 1);
        stats.record_file_build(7, 2, 0);
        stats.record_summary_build(5, 1);

        let snap = stats.snapshot();
        assert_eq!(snap.file_cache_builds, 2);
        assert_eq!(snap.directories_enumerated, 4);
        assert_eq!(snap.directories_skipped, 1);
        assert_eq!(snap.files_discovered, 7);
        assert_eq!(snap.summary_cache_builds, 1);
        assert_eq!(snap.summaries, 5);
        assert_eq!(snap.parse_errors, 1);
        assert_eq!(snap.total_builds(), 3);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snap = IndexStatsSnapshot {
            file_cache_builds: 1,
            summaries: 4,
            ..Default::default()
        };

        let json = serde_json::to_string(&snap).expect("Serialization failed");
        let parsed: IndexStatsSnapshot = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(snap, parsed);
    }
}
