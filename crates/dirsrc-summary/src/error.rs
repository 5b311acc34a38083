//! Error types for the dirsrc-summary crate.
//!
//! This module provides the [`HarvestError`] type for failures that occur
//! while reading a document and extracting summaries from it.

use camino::Utf8PathBuf;

/// Errors that can occur while navigating or harvesting a document.
///
/// # Error Recovery Strategy
///
/// - **Format errors** ([`HarvestError::Format`]): the document is malformed.
///   Recoverable - record it and continue with the next file.
/// - **I/O errors** ([`HarvestError::Io`]): the storage failed underneath us.
///   Fatal - abort the build.
/// - **Unsupported format** ([`HarvestError::UnsupportedFormat`]): the caller
///   asked for a stream over an extension no navigator handles. Fatal, since
///   it indicates a programming error rather than bad data.
///
/// # Examples
///
/// ```
/// use dirsrc_summary::HarvestError;
///
/// let err = HarvestError::format("/data/a.json", "expected value at line 1 column 1");
/// assert!(err.is_recoverable());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("/data/a.json"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// The document is not well-formed for its claimed format.
    #[error("malformed document {path}: {message}")]
    Format {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// Reading the document failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No navigator exists for the file's extension.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(Utf8PathBuf),
}

impl HarvestError {
    /// Creates a new [`HarvestError::Format`] error.
    #[inline]
    pub fn format(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new [`HarvestError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if harvesting can continue with other files.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Returns `true` if this error should abort the whole build.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Format { path, .. } | Self::Io { path, .. } => Some(path),
            Self::UnsupportedFormat(path) => Some(path),
        }
    }

    /// Returns the diagnostic without the path prefix.
    ///
    /// Used when the path is stored separately, as in
    /// [`ErrorInfo`](dirsrc_core::ErrorInfo).
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Format { message, .. } => message.clone(),
            Self::Io { source, .. } => source.to_string(),
            Self::UnsupportedFormat(_) => "unsupported document format".to_owned(),
        }
    }
}
