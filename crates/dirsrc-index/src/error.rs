//! Error types for the dirsrc-index crate.
//!
//! This module provides the [`IndexError`] type returned by every query on
//! the index and by [`DirectorySource`](crate::DirectorySource).

use camino::Utf8PathBuf;
use dirsrc_core::ConfigError;
use dirsrc_summary::HarvestError;

use crate::conflict::ConflictReport;

/// Errors that can occur while building or querying the index.
///
/// # Error Recovery Strategy
///
/// - **Invalid arguments** ([`IndexError::InvalidArgument`]): the caller
///   passed an empty key. Nothing was built.
/// - **Canonical conflicts** ([`IndexError::CanonicalConflict`]): the
///   summary cache stays unusable until the next refresh; every
///   summary-dependent query reports the same conflict.
/// - **I/O and harvest failures**: the build is abandoned and retried by
///   the next query. Malformed documents never surface here; they are
///   recorded as [`ErrorInfo`](dirsrc_core::ErrorInfo) instead.
///
/// # Examples
///
/// ```
/// use dirsrc_index::IndexError;
///
/// fn describe(err: &IndexError) -> &'static str {
///     match err {
///         IndexError::InvalidArgument(_) => "bad argument",
///         IndexError::CanonicalConflict(_) => "conflict",
///         IndexError::Pattern { .. } | IndexError::Config(_) => "configuration",
///         IndexError::Harvest(_) | IndexError::Io { .. } => "storage",
///     }
/// }
///
/// assert_eq!(describe(&IndexError::InvalidArgument("uri")), "bad argument");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A required argument was empty.
    #[error("invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),

    /// A mask, include or exclude pattern did not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two or more conformance resources share a canonical URL.
    #[error(transparent)]
    CanonicalConflict(#[from] ConflictReport),

    /// A document could not be harvested.
    #[error(transparent)]
    Harvest(#[from] HarvestError),

    /// A file could not be opened.
    #[error("failed to open {path}: {source}")]
    Io {
        /// The file that could not be opened.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    /// Creates a new [`IndexError::Pattern`] error.
    #[inline]
    pub fn pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new [`IndexError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error reports a canonical URL conflict.
    #[inline]
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::CanonicalConflict(_))
    }

    /// Returns the conflict report, if this is a conflict.
    #[must_use]
    pub const fn conflict_report(&self) -> Option<&ConflictReport> {
        match self {
            Self::CanonicalConflict(report) => Some(report),
            _ => None,
        }
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Harvest(err) => err.path(),
            Self::InvalidArgument(_)
            | Self::Pattern { .. }
            | Self::Config(_)
            | Self::CanonicalConflict(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::CanonicalConflict;
    use std::io;

    #[test]
    fn test_invalid_argument_message() {
        let err = IndexError::InvalidArgument("name");
        assert_eq!(err.to_string(), "invalid argument: name must not be empty");
        assert!(err.path().is_none());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_io_error_has_path() {
        let err = IndexError::io("/data/a.xml", io::Error::other("denied"));
        assert_eq!(err.path().map(|p| p.as_str()), Some("/data/a.xml"));
        assert!(err.to_string().contains("/data/a.xml"));
    }

    #[test]
    fn test_harvest_error_path_is_forwarded() {
        let err = IndexError::from(HarvestError::io("/data/b.json", io::Error::other("gone")));
        assert_eq!(err.path().map(|p| p.as_str()), Some("/data/b.json"));
    }

    #[test]
    fn test_conflict_report_is_exposed() {
        let report = ConflictReport::new(vec![CanonicalConflict {
            canonical: "http://x/p".into(),
            origins: vec!["/d/a.xml".into(), "/d/b.xml".into()],
        }]);
        let err = IndexError::from(report.clone());

        assert!(err.is_conflict());
        assert_eq!(err.conflict_report(), Some(&report));
        assert_eq!(err.to_string(), report.to_string());
    }
}
