//! Query facade over a directory of conformance artifacts.
//!
//! [`DirectorySource`] is the entry point most callers want. It answers
//! artifact-name queries from the file cache alone, and every resource,
//! canonical and terminology lookup from the summary cache. See
//! [`SummaryIndex`] for caching and invalidation behavior.
//!
//! # Examples
//!
//! ```
//! use dirsrc_index::DirectorySource;
//!
//! let dir = tempfile::tempdir()?;
//! std::fs::write(
//!     dir.path().join("vs.json"),
//!     r#"{"resourceType":"ValueSet","id":"vs1","url":"http://x/ValueSet/vs1","codeSystem":{"system":"http://x/cs"}}"#,
//! )?;
//!
//! let source = DirectorySource::new(camino::Utf8PathBuf::try_from(dir.path().to_path_buf())?)?;
//!
//! assert_eq!(source.list_artifact_names()?, vec!["vs.json"]);
//! let vs = source.find_value_set_by_system("http://x/cs")?.expect("value set");
//! assert_eq!(vs.canonical(), Some("http://x/ValueSet/vs1"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Read;
use std::path::MAIN_SEPARATOR;
use std::sync::Arc;

use camino::Utf8PathBuf;
use dirsrc_core::{
    ArtifactSummary, DiscoverySettings, DuplicateFilePreference, ErrorInfo, ResourceKind, default_root,
};
use dirsrc_summary::{NavigatorStreamFactory, SummaryHarvester};
use tracing::{debug, warn};

use crate::error::IndexError;
use crate::fs::FileSystem;
use crate::index::{SummaryIndex, SummarySet};
use crate::stats::IndexStatsSnapshot;

/// A read-only artifact source backed by a directory.
#[derive(Debug)]
pub struct DirectorySource {
    index: SummaryIndex,
}

impl DirectorySource {
    /// Creates a non-recursive source over `root` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if `root` is empty.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Result<Self, IndexError> {
        Self::with_settings(DiscoverySettings::new(root))
    }

    /// Creates a source from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if `settings.root` is empty.
    pub fn with_settings(settings: DiscoverySettings) -> Result<Self, IndexError> {
        Ok(Self {
            index: SummaryIndex::new(settings)?,
        })
    }

    /// Creates a source whose root, if unset, is the process default root
    /// (see [`default_root`]). The default is resolved once, here.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if the default root cannot be resolved.
    pub fn with_default_root(mut settings: DiscoverySettings) -> Result<Self, IndexError> {
        if settings.root.as_str().is_empty() {
            settings.root = default_root()?;
            debug!(root = %settings.root, "Using default root");
        }
        Self::with_settings(settings)
    }

    /// Creates a source with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if `settings.root` is empty.
    pub fn with_parts(
        settings: DiscoverySettings,
        fs: Arc<dyn FileSystem>,
        factory: Arc<dyn NavigatorStreamFactory>,
        harvester: Arc<dyn SummaryHarvester>,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            index: SummaryIndex::with_parts(settings, fs, factory, harvester)?,
        })
    }

    /// Returns the underlying index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> &SummaryIndex {
        &self.index
    }

    /// Returns the absolute root.
    #[must_use]
    pub fn root(&self) -> Utf8PathBuf {
        self.index.root()
    }

    /// Returns a copy of the current settings.
    #[must_use]
    pub fn settings(&self) -> DiscoverySettings {
        self.index.settings()
    }

    /// Returns a snapshot of the build statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStatsSnapshot {
        self.index.stats()
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Replaces the masks from a `|`-separated list. Drops both caches.
    pub fn set_mask(&self, mask: &str) {
        self.index.set_mask(mask);
    }

    /// Replaces the masks. Drops both caches.
    pub fn set_masks(&self, masks: Vec<String>) {
        self.index.set_masks(masks);
    }

    /// Replaces the include patterns. Drops both caches.
    pub fn set_includes(&self, includes: Vec<String>) {
        self.index.set_includes(includes);
    }

    /// Replaces the exclude patterns. Drops both caches.
    pub fn set_excludes(&self, excludes: Vec<String>) {
        self.index.set_excludes(excludes);
    }

    /// Changes the duplicate-format policy. Drops the summary cache only.
    pub fn set_format_preference(&self, preference: DuplicateFilePreference) {
        self.index.set_format_preference(preference);
    }

    /// Forgets everything; the next query re-reads the directory.
    pub fn refresh(&self) {
        self.index.invalidate();
    }

    // ---------------------------------------------------------------------
    // File queries
    // ---------------------------------------------------------------------

    /// Returns the file name of every discovered artifact file.
    ///
    /// Uses the raw file list: both members of an XML/JSON pair appear here
    /// even when only one of them is harvested.
    pub fn list_artifact_names(&self) -> Result<Vec<String>, IndexError> {
        Ok(self
            .index
            .files()?
            .iter()
            .filter_map(|path| path.file_name())
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Returns every discovered file whose path ends with `name`, ignoring
    /// case.
    ///
    /// `name` is matched as whole trailing path components: `a.xml` matches
    /// `/d/a.xml` but not `/d/data.xml`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] for an empty name.
    pub fn find_artifact_paths(&self, name: &str) -> Result<Vec<Utf8PathBuf>, IndexError> {
        if name.is_empty() {
            return Err(IndexError::InvalidArgument("name"));
        }

        let suffix = format!("{MAIN_SEPARATOR}{}", name.to_lowercase());
        Ok(self
            .index
            .files()?
            .iter()
            .filter(|path| path.as_str().to_lowercase().ends_with(&suffix))
            .cloned()
            .collect())
    }

    /// Opens the discovered file named `name`.
    ///
    /// Returns `Ok(None)` unless exactly one file matches; an ambiguous name
    /// is logged.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] for an empty name and
    /// [`IndexError::Io`] if the file cannot be opened.
    pub fn load_artifact_by_name(&self, name: &str) -> Result<Option<Box<dyn Read + Send>>, IndexError> {
        let matches = self.find_artifact_paths(name)?;
        match matches.as_slice() {
            [path] => self.index.open(path).map(Some),
            [] => Ok(None),
            _ => {
                warn!(name, matches = matches.len(), "Artifact name is ambiguous");
                Ok(None)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Summary queries
    // ---------------------------------------------------------------------

    /// Returns every harvested summary.
    pub fn summaries(&self) -> Result<Arc<SummarySet>, IndexError> {
        self.index.summary_set()
    }

    /// Returns the documents that failed to parse during the last build.
    pub fn errors(&self) -> Result<Vec<ErrorInfo>, IndexError> {
        Ok(self.index.summary_set()?.errors().to_vec())
    }

    /// Lists resource uris, optionally restricted to kinds admitted by
    /// `filter`.
    pub fn list_resource_uris(&self, filter: Option<ResourceKind>) -> Result<Vec<String>, IndexError> {
        let set = self.index.summary_set()?;
        Ok(set
            .summaries()
            .iter()
            .filter(Self::admitted(filter))
            .map(|s| s.resource_uri.clone())
            .collect())
    }

    /// Lists the canonical urls of conformance resources, optionally
    /// restricted to kinds admitted by `filter`.
    pub fn list_canonical_uris(&self, filter: Option<ResourceKind>) -> Result<Vec<String>, IndexError> {
        let set = self.index.summary_set()?;
        Ok(set
            .summaries()
            .iter()
            .filter(Self::admitted(filter))
            .filter_map(|s| s.canonical().map(ToOwned::to_owned))
            .collect())
    }

    /// Returns the first summary whose resource uri equals `uri`.
    pub fn resolve_by_uri(&self, uri: &str) -> Result<Option<ArtifactSummary>, IndexError> {
        if uri.is_empty() {
            return Err(IndexError::InvalidArgument("uri"));
        }
        self.find(|s| s.resource_uri == uri)
    }

    /// Returns the conformance resource with canonical url `uri`.
    ///
    /// A `|version` suffix additionally requires the resource's business
    /// version to match.
    pub fn resolve_by_canonical_uri(&self, uri: &str) -> Result<Option<ArtifactSummary>, IndexError> {
        if uri.is_empty() {
            return Err(IndexError::InvalidArgument("uri"));
        }
        let (canonical, version) = match uri.split_once('|') {
            Some((canonical, version)) => (canonical, Some(version)),
            None => (uri, None),
        };

        self.find(|s| {
            s.canonical() == Some(canonical) && version.is_none_or(|v| s.version.as_deref() == Some(v))
        })
    }

    /// Returns the value set whose inline code system is `system`.
    pub fn find_value_set_by_system(&self, system: &str) -> Result<Option<ArtifactSummary>, IndexError> {
        if system.is_empty() {
            return Err(IndexError::InvalidArgument("system"));
        }
        self.find(|s| s.value_set_system() == Some(system))
    }

    /// Returns every concept map matching the given endpoints.
    ///
    /// An omitted endpoint matches anything; at least one must be given.
    pub fn find_concept_maps(
        &self,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<ArtifactSummary>, IndexError> {
        if source.is_none() && target.is_none() {
            return Err(IndexError::InvalidArgument("source or target"));
        }

        let set = self.index.summary_set()?;
        Ok(set
            .summaries()
            .iter()
            .filter(Self::admitted(Some(ResourceKind::ConceptMap)))
            .filter(|s| source.is_none_or(|src| s.concept_map_source() == Some(src)))
            .filter(|s| target.is_none_or(|tgt| s.concept_map_target() == Some(tgt)))
            .cloned()
            .collect())
    }

    /// Returns the naming system declaring `unique_id`.
    pub fn find_naming_system(&self, unique_id: &str) -> Result<Option<ArtifactSummary>, IndexError> {
        if unique_id.is_empty() {
            return Err(IndexError::InvalidArgument("unique_id"));
        }
        self.find(|s| s.has_unique_id(unique_id))
    }

    fn find(&self, predicate: impl Fn(&ArtifactSummary) -> bool) -> Result<Option<ArtifactSummary>, IndexError> {
        let set = self.index.summary_set()?;
        Ok(set.summaries().iter().find(|s| predicate(s)).cloned())
    }

    fn admitted(filter: Option<ResourceKind>) -> impl Fn(&&ArtifactSummary) -> bool {
        move |summary: &&ArtifactSummary| filter.is_none_or(|kind| kind.admits(summary.kind()))
    }
}
