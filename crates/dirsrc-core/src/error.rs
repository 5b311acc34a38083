//! Error types for the dirsrc-core crate.
//!
//! This module provides the [`ConfigError`] type for failures that occur
//! while building or loading [`DiscoverySettings`](crate::DiscoverySettings).

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use dirsrc_core::ConfigError;
///
/// let error = ConfigError::invalid_option("format_preference", "unknown value 'yaml'");
/// assert_eq!(
///     error.to_string(),
///     "invalid configuration option 'format_preference': unknown value 'yaml'"
/// );
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configured path is not valid UTF-8 or otherwise unusable.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The configuration file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::InvalidPath {
            path: Utf8PathBuf::from("/invalid/path"),
            reason: "not valid UTF-8".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("/invalid/path"));
        assert!(msg.contains("not valid UTF-8"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("masks", "must not be empty");
        let msg = error.to_string();
        assert!(msg.contains("masks"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_io_display_names_file() {
        let error = ConfigError::Io {
            path: Utf8PathBuf::from("dirsrc.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(error.to_string().contains("dirsrc.json"));
    }
}
