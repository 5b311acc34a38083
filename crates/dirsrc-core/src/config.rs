//! Discovery configuration for the artifact index.
//!
//! This module provides:
//!
//! - [`DiscoverySettings`] - root directory, recursion, masks, include/exclude
//!   patterns and the duplicate-format preference
//! - [`DuplicateFilePreference`] - which serialization wins when `a.xml` and
//!   `a.json` describe the same resource
//! - [`parse_mask`] - the `|`-delimited mask string form
//! - [`resolve_default_root`] / [`default_root`] - the directory used when no
//!   root is given
//!
//! Settings are plain data. They can be built programmatically or loaded from
//! a JSON file; missing fields fall back to their defaults.

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The mask applied when none is configured.
pub const DEFAULT_MASK: &str = "*.*";

/// Which representation to keep when the same resource exists as both
/// `name.xml` and `name.json` in one directory.
///
/// # Examples
///
/// ```
/// use dirsrc_core::DuplicateFilePreference;
///
/// let pref: DuplicateFilePreference = "prefer-json".parse().unwrap();
/// assert_eq!(pref, DuplicateFilePreference::PreferJson);
/// assert_eq!(DuplicateFilePreference::default(), DuplicateFilePreference::PreferXml);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFilePreference {
    /// Keep the `.xml` file.
    #[default]
    PreferXml,
    /// Keep the `.json` file.
    PreferJson,
    /// Keep both files.
    KeepBoth,
}

impl DuplicateFilePreference {
    /// Returns the kebab-case label used on the command line.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreferXml => "prefer-xml",
            Self::PreferJson => "prefer-json",
            Self::KeepBoth => "keep-both",
        }
    }
}

impl fmt::Display for DuplicateFilePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DuplicateFilePreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "prefer-xml" | "xml" => Ok(Self::PreferXml),
            "prefer-json" | "json" => Ok(Self::PreferJson),
            "keep-both" | "both" => Ok(Self::KeepBoth),
            other => Err(ConfigError::invalid_option(
                "format_preference",
                format!("unknown preference '{other}'"),
            )),
        }
    }
}

/// Settings that drive file discovery.
///
/// `root` and `recursive` are fixed once an index is built from these
/// settings; masks, includes, excludes and the format preference may be
/// changed later through the index, which invalidates its caches.
///
/// An empty `root` means "use the default root" (see [`default_root`]).
///
/// # Examples
///
/// ```
/// use dirsrc_core::{DiscoverySettings, DuplicateFilePreference};
///
/// let settings = DiscoverySettings::new("/data/profiles")
///     .with_recursive(true)
///     .with_mask("*.xml|*.json")
///     .with_format_preference(DuplicateFilePreference::KeepBoth);
///
/// assert_eq!(settings.masks, vec!["*.xml", "*.json"]);
/// assert!(settings.recursive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Root directory (or single file) to index.
    pub root: Utf8PathBuf,

    /// Whether to descend into subdirectories.
    pub recursive: bool,

    /// File name masks; a file must match at least one.
    pub masks: Vec<String>,

    /// Glob patterns relative to the root; when non-empty, only matching
    /// files are kept.
    pub includes: Vec<String>,

    /// Glob patterns relative to the root; matching files are dropped.
    pub excludes: Vec<String>,

    /// Duplicate-format resolution policy.
    pub format_preference: DuplicateFilePreference,

    /// Harvest summaries on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::new(),
            recursive: false,
            masks: vec![DEFAULT_MASK.to_owned()],
            includes: Vec::new(),
            excludes: Vec::new(),
            format_preference: DuplicateFilePreference::PreferXml,
            parallel: true,
        }
    }
}

impl DiscoverySettings {
    /// Creates settings for the given root with default values elsewhere.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Sets whether subdirectories are walked.
    #[must_use]
    pub const fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets the masks from their `|`-delimited string form.
    #[must_use]
    pub fn with_mask(mut self, mask: &str) -> Self {
        self.masks = parse_mask(mask);
        self
    }

    /// Sets the masks from a list.
    #[must_use]
    pub fn with_masks<I, S>(mut self, masks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.masks = masks.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the include patterns.
    #[must_use]
    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the duplicate-format preference.
    #[must_use]
    pub const fn with_format_preference(mut self, preference: DuplicateFilePreference) -> Self {
        self.format_preference = preference;
        self
    }

    /// Enables or disables parallel summary harvesting.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the masks joined back into their `|`-delimited form.
    #[must_use]
    pub fn mask(&self) -> String {
        self.masks.join("|")
    }

    /// Parses settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON or
    /// has fields of the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it cannot be parsed.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_std_path()).map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?;
        Self::from_json_str(&contents)
    }
}

/// Splits a `|`-delimited mask string into individual masks.
///
/// Each piece is trimmed and empty pieces are dropped.
///
/// # Examples
///
/// ```
/// use dirsrc_core::parse_mask;
///
/// assert_eq!(parse_mask(" *.xml | *.json ||"), vec!["*.xml", "*.json"]);
/// assert!(parse_mask("").is_empty());
/// ```
#[must_use]
pub fn parse_mask(mask: &str) -> Vec<String> {
    mask.split('|')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Picks the default root: `candidate` if it exists on disk, else `fallback`.
///
/// Kept separate from [`default_root`] so callers and tests can supply their
/// own candidates instead of the process-derived ones.
#[must_use]
pub fn resolve_default_root(candidate: Option<Utf8PathBuf>, fallback: Utf8PathBuf) -> Utf8PathBuf {
    match candidate {
        Some(path) if path.exists() => path,
        _ => fallback,
    }
}

/// Resolves the process default root: the directory containing the running
/// executable, or the current working directory if that cannot be found.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the current directory cannot be read and
/// [`ConfigError::InvalidPath`] if it is not valid UTF-8.
pub fn default_root() -> Result<Utf8PathBuf, ConfigError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(ToOwned::to_owned))
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());

    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| ConfigError::InvalidPath {
        path: Utf8PathBuf::from(p.to_string_lossy().into_owned()),
        reason: "current directory is not valid UTF-8".to_owned(),
    })?;

    Ok(resolve_default_root(exe_dir, cwd))
}
