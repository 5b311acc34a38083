//! Directory-backed index of conformance artifacts.
//!
//! This crate discovers FHIR artifact files under a root directory, collapses
//! XML/JSON twins of the same resource, harvests a lightweight summary of
//! every resource via `dirsrc-summary`, enforces canonical URL uniqueness,
//! and answers point lookups against the result.
//!
//! # Overview
//!
//! The main entry point is [`DirectorySource`], which wraps a
//! [`SummaryIndex`] built from:
//!
//! - [`DirectoryWalker`]: breadth-first, fault-tolerant traversal with masks
//! - [`PathFilter`]: include/exclude glob patterns
//! - [`resolve_duplicates`]: XML/JSON pair resolution
//! - [`detect_conflicts`]: canonical URL uniqueness
//! - [`IndexStats`]: atomic build statistics
//!
//! # Example
//!
//! ```no_run
//! use dirsrc_core::{DiscoverySettings, DuplicateFilePreference};
//! use dirsrc_index::DirectorySource;
//!
//! let settings = DiscoverySettings::new("/srv/fhir/package")
//!     .with_recursive(true)
//!     .with_format_preference(DuplicateFilePreference::PreferJson);
//! let source = DirectorySource::with_settings(settings)?;
//!
//! if let Some(profile) = source.resolve_by_canonical_uri("http://hl7.org/fhir/StructureDefinition/Patient")? {
//!     println!("Patient profile lives in {}", profile.origin);
//! }
//!
//! for error in source.errors()? {
//!     eprintln!("skipped {error}");
//! }
//! # Ok::<(), dirsrc_index::IndexError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! DirectorySource (queries)
//!     │
//!     └── SummaryIndex (lazy caches)
//!             │
//!             ├── file cache
//!             │       ├── DirectoryWalker ── FileSystem (OsFileSystem)
//!             │       └── PathFilter (ignore overrides)
//!             │
//!             ├── summary cache
//!             │       ├── resolve_duplicates
//!             │       ├── NavigatorStreamFactory + SummaryHarvester (rayon)
//!             │       └── detect_conflicts
//!             │
//!             └── IndexStats (atomic counters)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod conflict;
mod dedup;
mod error;
mod filter;
mod fs;
mod index;
mod source;
mod stats;
mod walker;

#[cfg(test)]
mod testing;

pub use conflict::{CanonicalConflict, ConflictReport, detect_conflicts};
pub use dedup::{logical_identity, resolve_duplicates};
pub use error::IndexError;
pub use filter::PathFilter;
pub use fs::{DirEntryInfo, EntryKind, FileSystem, OsFileSystem};
pub use index::{SummaryIndex, SummarySet};
pub use source::DirectorySource;
pub use stats::{IndexStats, IndexStatsSnapshot};
pub use walker::{DirectoryWalker, WalkOutcome, is_excluded_binary};
