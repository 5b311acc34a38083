//! Include and exclude filtering of discovered paths.
//!
//! Patterns use gitignore-style glob syntax, matched case-insensitively
//! against the path relative to the source root. A pattern without a `/`
//! matches at any depth (`*.json`); a pattern with one is anchored to the
//! root (`profiles/**`). A pattern that names a directory (`drafts`,
//! `drafts/`, `/drafts`) applies to every file beneath it.
//!
//! # Examples
//!
//! ```
//! use dirsrc_index::PathFilter;
//! use camino::{Utf8Path, Utf8PathBuf};
//!
//! let root = Utf8Path::new("/data");
//! let filter = PathFilter::exclude(root, &["drafts/**".to_owned()])?;
//! let kept = filter.apply(vec![
//!     Utf8PathBuf::from("/data/a.xml"),
//!     Utf8PathBuf::from("/data/drafts/b.xml"),
//! ]);
//! assert_eq!(kept, vec![Utf8PathBuf::from("/data/a.xml")]);
//! # Ok::<(), dirsrc_index::IndexError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use ignore::overrides::{Override, OverrideBuilder};

use crate::error::IndexError;

/// Whether matching paths are kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMode {
    Include,
    Exclude,
}

/// A compiled include or exclude pattern list.
///
/// An empty pattern list never changes its input.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: Utf8PathBuf,
    matcher: Override,
    mode: FilterMode,
}

impl PathFilter {
    /// Builds a filter that keeps only paths matching at least one pattern.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Pattern`] if a pattern is not a valid glob.
    pub fn include(root: &Utf8Path, patterns: &[String]) -> Result<Self, IndexError> {
        Self::build(root, patterns, FilterMode::Include)
    }

    /// Builds a filter that drops every path matching at least one pattern.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Pattern`] if a pattern is not a valid glob.
    pub fn exclude(root: &Utf8Path, patterns: &[String]) -> Result<Self, IndexError> {
        Self::build(root, patterns, FilterMode::Exclude)
    }

    fn build(root: &Utf8Path, patterns: &[String], mode: FilterMode) -> Result<Self, IndexError> {
        let mut builder = OverrideBuilder::new(root.as_std_path());
        builder
            .case_insensitive(true)
            .map_err(|e| IndexError::pattern(patterns.join(";"), e))?;
        for pattern in patterns {
            builder.add(pattern).map_err(|e| IndexError::pattern(pattern, e))?;
        }
        let matcher = builder
            .build()
            .map_err(|e| IndexError::pattern(patterns.join(";"), e))?;

        Ok(Self {
            root: root.to_owned(),
            matcher,
            mode,
        })
    }

    /// Returns `true` if the filter has no patterns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Returns `true` if `path`, or a directory between it and the root,
    /// matches at least one pattern.
    #[must_use]
    pub fn matches(&self, path: &Utf8Path) -> bool {
        if self.matcher.matched(path.as_std_path(), false).is_whitelist() {
            return true;
        }
        path.ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.root.as_path() && dir.starts_with(&self.root))
            .any(|dir| self.matcher.matched(dir.as_std_path(), true).is_whitelist())
    }

    /// Returns `true` if `path` survives this filter.
    #[must_use]
    pub fn keeps(&self, path: &Utf8Path) -> bool {
        if self.is_empty() {
            return true;
        }
        match self.mode {
            FilterMode::Include => self.matches(path),
            FilterMode::Exclude => !self.matches(path),
        }
    }

    /// Applies the filter, preserving the order of the surviving paths.
    #[must_use]
    pub fn apply(&self, paths: Vec<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
        if self.is_empty() {
            return paths;
        }
        paths.into_iter().filter(|path| self.keeps(path)).collect()
    }
}
