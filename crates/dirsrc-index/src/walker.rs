//! Directory traversal for artifact files.
//!
//! This module provides [`DirectoryWalker`], a breadth-first walk over a
//! [`FileSystem`] that keeps files whose name matches one of the configured
//! masks.
//!
//! # Features
//!
//! - Case-insensitive glob masks (`*.xml`, `profile-*.json`) on file names;
//!   `*.*` matches every name, including names without an extension
//! - Optional recursion into subdirectories
//! - Skips hidden and system entries, files and directories alike
//! - Skips directories that cannot be enumerated instead of failing the walk
//! - Returns each path once, sorted, regardless of how many masks match it
//!
//! # Examples
//!
//! ```
//! use dirsrc_index::{DirectoryWalker, OsFileSystem};
//! use camino::Utf8Path;
//!
//! let walker = DirectoryWalker::new(Utf8Path::new("/no/such/dir"), &["*.xml".to_owned()])?
//!     .with_recursive(true);
//! let outcome = walker.walk(&OsFileSystem);
//! assert!(outcome.paths.is_empty());
//! # Ok::<(), dirsrc_index::IndexError>(())
//! ```

use std::collections::VecDeque;

use camino::{Utf8Path, Utf8PathBuf};
use dirsrc_core::{DEFAULT_MASK, fx_hash_set};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::error::IndexError;
use crate::fs::{EntryKind, FileSystem};

/// Extensions that are never treated as artifacts, whatever the masks say.
const EXCLUDED_EXTENSIONS: &[&str] = &["exe", "dll"];

/// The wildcard mask that matches any file name.
const MATCH_ALL_MASK: &str = "*.*";

/// Result of one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Matching files, sorted and free of duplicates.
    pub paths: Vec<Utf8PathBuf>,
    /// Directories whose entries were listed.
    pub directories_enumerated: u64,
    /// Directories skipped because listing them failed.
    pub directories_skipped: u64,
}

/// A breadth-first walker that discovers files matching a set of masks.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    /// The directory (or single file) to start from.
    root: Utf8PathBuf,
    /// Compiled file name masks.
    masks: GlobSet,
    /// Whether to descend into subdirectories.
    recursive: bool,
}

impl DirectoryWalker {
    /// Creates a non-recursive walker rooted at `root`.
    ///
    /// An empty mask list falls back to [`DEFAULT_MASK`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Pattern`] if a mask is not a valid glob.
    pub fn new(root: &Utf8Path, masks: &[String]) -> Result<Self, IndexError> {
        Ok(Self {
            root: root.to_owned(),
            masks: compile_masks(masks)?,
            recursive: false,
        })
    }

    /// Configures whether subdirectories are walked.
    #[must_use]
    pub const fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Returns the walk root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns `true` if a file named `file_name` matches any mask.
    #[must_use]
    pub fn matches_mask(&self, file_name: &str) -> bool {
        self.masks.is_match(file_name)
    }

    /// Walks the tree and returns every matching file.
    ///
    /// A root that names a file yields exactly that file, with no mask
    /// check. A missing root yields nothing. Directory listing failures are
    /// logged and counted, never propagated.
    pub fn walk(&self, fs: &dyn FileSystem) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        match fs.entry_kind(&self.root) {
            Ok(EntryKind::File) => {
                outcome.paths.push(self.root.clone());
                return outcome;
            }
            Ok(EntryKind::Missing) => {
                debug!(root = %self.root, "Walk root does not exist");
                return outcome;
            }
            Ok(EntryKind::Directory) => {}
            Err(e) => {
                warn!(root = %self.root, error = %e, "Cannot inspect walk root");
                return outcome;
            }
        }

        let mut seen = fx_hash_set();
        let mut pending = VecDeque::from([self.root.clone()]);

        while let Some(dir) = pending.pop_front() {
            let entries = match fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = %dir, error = %e, "Skipping unreadable directory");
                    outcome.directories_skipped += 1;
                    continue;
                }
            };
            outcome.directories_enumerated += 1;

            for entry in entries {
                if entry.hidden {
                    continue;
                }
                if entry.is_dir {
                    if self.recursive {
                        pending.push_back(entry.path);
                    }
                    continue;
                }

                let matched = entry.path.file_name().is_some_and(|name| self.matches_mask(name));
                if matched && seen.insert(entry.path.clone()) {
                    outcome.paths.push(entry.path);
                }
            }
        }

        outcome.paths.sort();
        debug!(
            root = %self.root,
            files = outcome.paths.len(),
            directories = outcome.directories_enumerated,
            "Walk complete"
        );
        outcome
    }
}

/// Returns `true` for executables and libraries, which are never artifacts.
#[must_use]
pub fn is_excluded_binary(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| EXCLUDED_EXTENSIONS.iter().any(|excluded| ext.eq_ignore_ascii_case(excluded)))
}

fn compile_masks(masks: &[String]) -> Result<GlobSet, IndexError> {
    let default = [DEFAULT_MASK.to_owned()];
    let masks = if masks.is_empty() { &default[..] } else { masks };

    let mut builder = GlobSetBuilder::new();
    for mask in masks {
        let pattern = if mask == MATCH_ALL_MASK { "*" } else { mask.as_str() };
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| IndexError::pattern(mask, e))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| IndexError::pattern(masks.join(";"), e))
}
