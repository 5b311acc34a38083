//! Recoverable harvesting failures.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A document that could not be parsed while harvesting summaries.
///
/// These are collected rather than raised: one malformed file never stops
/// the rest of the directory from being indexed.
///
/// # Examples
///
/// ```
/// use dirsrc_core::ErrorInfo;
///
/// let info = ErrorInfo::new("/data/a.json", "EOF while parsing an object at line 1 column 1");
/// assert_eq!(info.path.as_str(), "/data/a.json");
/// assert!(info.to_string().starts_with("/data/a.json: "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// The file that failed to parse.
    pub path: Utf8PathBuf,
    /// Description of the failure.
    pub message: String,
}

impl ErrorInfo {
    /// Creates a new error record.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
