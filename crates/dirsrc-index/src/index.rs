//! Lazily built, invalidation-driven artifact index.
//!
//! [`SummaryIndex`] owns two caches over a directory:
//!
//! - the **file cache**: every discovered path, after masks, binary
//!   exclusion, includes and excludes;
//! - the **summary cache**: one [`ArtifactSummary`] per resource found in the
//!   de-duplicated file list, plus an [`ErrorInfo`] per malformed document.
//!
//! Neither is built until a query needs it. Each is built at most once per
//! invalidation, even under concurrent queries. Changing the discovery
//! settings, or calling [`invalidate`](SummaryIndex::invalidate), drops them.
//!
//! # Architecture
//!
//! ```text
//! SummaryIndex
//!     │
//!     ├── file cache ── DirectoryWalker ─> binary exclusion ─> includes ─> excludes
//!     │
//!     └── summary cache
//!             │
//!             ├── resolve_duplicates (format preference)
//!             ├── NavigatorStreamFactory ─> SummaryHarvester (rayon)
//!             └── detect_conflicts
//! ```
//!
//! # Locking
//!
//! Builds run under the cache's own mutex, which gives single-flight
//! construction. The summary build needs the file cache, so the lock order is
//! always summaries, then files. Settings writers take both cache locks first,
//! so a mutation never interleaves with a build.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use dirsrc_core::{ArtifactSummary, DiscoverySettings, ErrorInfo, FxHashMap, fx_hash_map, parse_mask};
use dirsrc_core::{ConfigError, DuplicateFilePreference};
use dirsrc_summary::{DefaultStreamFactory, NavigatorStreamFactory, StandardHarvester, SummaryHarvester};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::conflict::{ConflictReport, detect_conflicts};
use crate::dedup::resolve_duplicates;
use crate::error::IndexError;
use crate::filter::PathFilter;
use crate::fs::{EntryKind, FileSystem, OsFileSystem};
use crate::stats::{IndexStats, IndexStatsSnapshot};
use crate::walker::{DirectoryWalker, is_excluded_binary};

/// The product of one summary build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarySet {
    summaries: Vec<ArtifactSummary>,
    errors: Vec<ErrorInfo>,
}

impl SummarySet {
    /// Returns every summary, in file order then document order.
    #[inline]
    #[must_use]
    pub fn summaries(&self) -> &[ArtifactSummary] {
        &self.summaries
    }

    /// Returns one entry per malformed document, in file order.
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ErrorInfo] {
        &self.errors
    }
}

/// State of the summary cache.
#[derive(Debug)]
enum SummarySlot {
    Dirty,
    Ready(Arc<SummarySet>),
    Conflicted(Arc<ConflictReport>),
}

/// What happened to one file during harvesting.
enum FileOutcome {
    Harvested(Vec<ArtifactSummary>),
    Malformed(ErrorInfo),
    Unsupported,
}

/// How much a settings change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invalidation {
    Everything,
    SummariesOnly,
}

/// A directory of artifacts with lazily built file and summary caches.
///
/// # Thread Safety
///
/// `SummaryIndex` is `Send + Sync`; share it behind an [`Arc`] and query it
/// from any thread.
///
/// # Examples
///
/// ```
/// use dirsrc_core::DiscoverySettings;
/// use dirsrc_index::SummaryIndex;
///
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("a.json"), r#"{"resourceType":"Patient","id":"p1"}"#)?;
///
/// let root = camino::Utf8PathBuf::try_from(dir.path().to_path_buf())?;
/// let index = SummaryIndex::new(DiscoverySettings::new(root))?;
///
/// assert_eq!(index.summary_set()?.summaries().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SummaryIndex {
    settings: RwLock<DiscoverySettings>,
    fs: Arc<dyn FileSystem>,
    factory: Arc<dyn NavigatorStreamFactory>,
    harvester: Arc<dyn SummaryHarvester>,
    files: Mutex<Option<Arc<[Utf8PathBuf]>>>,
    summaries: Mutex<SummarySlot>,
    stats: IndexStats,
}

impl SummaryIndex {
    /// Creates an index over `settings.root` using the real filesystem and
    /// the standard navigators and harvester.
    ///
    /// The root is made absolute; it does not need to exist.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if the root is empty, and
    /// [`IndexError::Config`] if it cannot be made absolute.
    pub fn new(settings: DiscoverySettings) -> Result<Self, IndexError> {
        Self::with_parts(
            settings,
            Arc::new(OsFileSystem),
            Arc::new(DefaultStreamFactory),
            Arc::new(StandardHarvester),
        )
    }

    /// Creates an index with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_parts(
        mut settings: DiscoverySettings,
        fs: Arc<dyn FileSystem>,
        factory: Arc<dyn NavigatorStreamFactory>,
        harvester: Arc<dyn SummaryHarvester>,
    ) -> Result<Self, IndexError> {
        if settings.root.as_str().is_empty() {
            return Err(IndexError::InvalidArgument("root"));
        }
        settings.root = absolute(&settings.root)?;

        info!(
            root = %settings.root,
            recursive = settings.recursive,
            mask = %settings.mask(),
            preference = %settings.format_preference,
            "Creating artifact index"
        );

        Ok(Self {
            settings: RwLock::new(settings),
            fs,
            factory,
            harvester,
            files: Mutex::new(None),
            summaries: Mutex::new(SummarySlot::Dirty),
            stats: IndexStats::new(),
        })
    }

    /// Returns the absolute root.
    #[must_use]
    pub fn root(&self) -> Utf8PathBuf {
        self.settings.read().root.clone()
    }

    /// Returns a copy of the current settings.
    #[must_use]
    pub fn settings(&self) -> DiscoverySettings {
        self.settings.read().clone()
    }

    /// Returns a snapshot of the build statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the file cache, building it if needed.
    ///
    /// Paths are absolute and sorted.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Pattern`] if a mask, include or exclude pattern
    /// does not compile. Nothing is cached in that case.
    pub fn files(&self) -> Result<Arc<[Utf8PathBuf]>, IndexError> {
        let mut slot = self.files.lock();
        if let Some(files) = slot.as_ref() {
            return Ok(Arc::clone(files));
        }

        let files: Arc<[Utf8PathBuf]> = self.discover_files()?.into();
        *slot = Some(Arc::clone(&files));
        Ok(files)
    }

    /// Returns the summary cache, building it (and the file cache) if needed.
    ///
    /// # Errors
    ///
    /// - [`IndexError::CanonicalConflict`] if two conformance resources share
    ///   a canonical URL. The conflict is cached: every call reports it until
    ///   the index is invalidated.
    /// - [`IndexError::Io`] or [`IndexError::Harvest`] if a file cannot be
    ///   read. Nothing is cached; the next call retries.
    /// - Any error from [`files`](Self::files).
    pub fn summary_set(&self) -> Result<Arc<SummarySet>, IndexError> {
        let mut slot = self.summaries.lock();
        match &*slot {
            SummarySlot::Ready(set) => return Ok(Arc::clone(set)),
            SummarySlot::Conflicted(report) => return Err(IndexError::CanonicalConflict((**report).clone())),
            SummarySlot::Dirty => {}
        }

        let files = self.files()?;
        let (preference, parallel) = {
            let settings = self.settings.read();
            (settings.format_preference, settings.parallel)
        };

        let set = self.harvest(&files, preference, parallel)?;

        if let Err(report) = detect_conflicts(&set.summaries) {
            warn!(conflicts = report.conflicts().len(), "Canonical url conflicts found");
            *slot = SummarySlot::Conflicted(Arc::new(report.clone()));
            return Err(report.into());
        }
        warn_duplicate_resource_uris(&set.summaries);

        self.stats
            .record_summary_build(set.summaries.len() as u64, set.errors.len() as u64);
        let set = Arc::new(set);
        *slot = SummarySlot::Ready(Arc::clone(&set));
        Ok(set)
    }

    /// Opens `path` through the index's filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] if the file cannot be opened.
    pub fn open(&self, path: &Utf8Path) -> Result<Box<dyn Read + Send>, IndexError> {
        self.fs.open(path).map_err(|source| IndexError::io(path, source))
    }

    /// Drops both caches. The next query rebuilds them from disk.
    pub fn invalidate(&self) {
        self.update(Invalidation::Everything, |_| {});
        debug!("Index invalidated");
    }

    /// Replaces the file name masks.
    pub fn set_masks(&self, masks: Vec<String>) {
        self.update(Invalidation::Everything, |settings| settings.masks = masks);
    }

    /// Replaces the file name masks from a `|`-separated list.
    pub fn set_mask(&self, mask: &str) {
        self.set_masks(parse_mask(mask));
    }

    /// Replaces the include patterns.
    pub fn set_includes(&self, includes: Vec<String>) {
        self.update(Invalidation::Everything, |settings| settings.includes = includes);
    }

    /// Replaces the exclude patterns.
    pub fn set_excludes(&self, excludes: Vec<String>) {
        self.update(Invalidation::Everything, |settings| settings.excludes = excludes);
    }

    /// Changes the duplicate-format policy.
    ///
    /// The file list does not depend on it, so only summaries are dropped.
    pub fn set_format_preference(&self, preference: DuplicateFilePreference) {
        self.update(Invalidation::SummariesOnly, |settings| {
            settings.format_preference = preference;
        });
    }

    fn update(&self, scope: Invalidation, apply: impl FnOnce(&mut DiscoverySettings)) {
        let mut summaries = self.summaries.lock();
        let mut files = self.files.lock();

        apply(&mut self.settings.write());

        if scope == Invalidation::Everything {
            *files = None;
        }
        *summaries = SummarySlot::Dirty;
    }

    fn discover_files(&self) -> Result<Vec<Utf8PathBuf>, IndexError> {
        let settings = self.settings.read().clone();

        let walker = DirectoryWalker::new(&settings.root, &settings.masks)?.with_recursive(settings.recursive);
        let filter_base = self.filter_base(&settings.root);
        let includes = PathFilter::include(&filter_base, &settings.includes)?;
        let excludes = PathFilter::exclude(&filter_base, &settings.excludes)?;

        let outcome = walker.walk(self.fs.as_ref());
        let walked = outcome.paths.len();

        let paths: Vec<Utf8PathBuf> = outcome.paths.into_iter().filter(|p| !is_excluded_binary(p)).collect();
        let paths = excludes.apply(includes.apply(paths));

        self.stats.record_file_build(
            paths.len() as u64,
            outcome.directories_enumerated,
            outcome.directories_skipped,
        );
        info!(
            root = %settings.root,
            walked,
            kept = paths.len(),
            skipped_directories = outcome.directories_skipped,
            "Discovered artifact files"
        );
        Ok(paths)
    }

    /// Include/exclude patterns are relative to the root directory, or to the
    /// parent when the root names a single file.
    fn filter_base(&self, root: &Utf8Path) -> Utf8PathBuf {
        match self.fs.entry_kind(root) {
            Ok(EntryKind::File) => root.parent().map_or_else(|| root.to_owned(), ToOwned::to_owned),
            _ => root.to_owned(),
        }
    }

    fn harvest(
        &self,
        files: &[Utf8PathBuf],
        preference: DuplicateFilePreference,
        parallel: bool,
    ) -> Result<SummarySet, IndexError> {
        let paths = resolve_duplicates(files, preference);
        debug!(files = files.len(), selected = paths.len(), "Resolved duplicate formats");

        let outcomes: Vec<FileOutcome> = if parallel {
            paths
                .par_iter()
                .map(|path| self.harvest_file(path))
                .collect::<Result<_, _>>()?
        } else {
            paths
                .iter()
                .map(|path| self.harvest_file(path))
                .collect::<Result<_, _>>()?
        };

        let mut set = SummarySet::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Harvested(summaries) => set.summaries.extend(summaries),
                FileOutcome::Malformed(info) => set.errors.push(info),
                FileOutcome::Unsupported => {}
            }
        }

        info!(
            summaries = set.summaries.len(),
            errors = set.errors.len(),
            "Harvested artifact summaries"
        );
        Ok(set)
    }

    fn harvest_file(&self, path: &Utf8Path) -> Result<FileOutcome, IndexError> {
        if !self.factory.supports(path) {
            return Ok(FileOutcome::Unsupported);
        }

        let mut reader = self.open(path)?;
        match self.factory.open(path, &mut reader) {
            Ok(stream) => Ok(FileOutcome::Harvested(
                stream
                    .filter_map(|item| self.harvester.harvest(path, &item))
                    .collect(),
            )),
            Err(e) if e.is_recoverable() => {
                warn!(path = %path, error = %e, "Skipping malformed document");
                Ok(FileOutcome::Malformed(ErrorInfo::new(path, e.message())))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Debug for SummaryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryIndex")
            .field("settings", &*self.settings.read())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Logs every plain resource uri carried by more than one summary.
///
/// Lookups by such a uri return the first summary in file order.
fn warn_duplicate_resource_uris(summaries: &[ArtifactSummary]) {
    let mut counts: FxHashMap<&str, usize> = fx_hash_map();
    for summary in summaries {
        *counts.entry(summary.resource_uri.as_str()).or_default() += 1;
    }

    for (uri, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        warn!(uri, count, "Resource uri is not unique; lookups return the first match");
    }
}

fn absolute(root: &Utf8Path) -> Result<Utf8PathBuf, IndexError> {
    let invalid = |reason: String| {
        IndexError::Config(ConfigError::InvalidPath {
            path: root.to_owned(),
            reason,
        })
    };

    let path = std::path::absolute(root.as_std_path()).map_err(|e| invalid(e.to_string()))?;
    Utf8PathBuf::from_path_buf(path).map_err(|_| invalid("absolute path is not valid UTF-8".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingFileSystem, PATIENT_JSON, profile_xml, temp_tree, value_set_json};
    use std::thread;

    fn index_over(root: &Utf8Path, fs: &Arc<CountingFileSystem>) -> SummaryIndex {
        index_with(DiscoverySettings::new(root).with_recursive(true), fs)
    }

    fn index_with(settings: DiscoverySettings, fs: &Arc<CountingFileSystem>) -> SummaryIndex {
        SummaryIndex::with_parts(
            settings,
            Arc::clone(fs) as Arc<dyn FileSystem>,
            Arc::new(DefaultStreamFactory),
            Arc::new(StandardHarvester),
        )
        .unwrap()
    }

    fn file_names(files: &[Utf8PathBuf]) -> Vec<&str> {
        files.iter().filter_map(|p| p.file_name()).collect()
    }

    #[test]
    fn test_empty_root_is_rejected() {
        let err = SummaryIndex::new(DiscoverySettings::default()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidArgument("root")));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let index = SummaryIndex::new(DiscoverySettings::new("some/relative/dir")).unwrap();
        assert!(index.root().is_absolute());
        assert!(index.root().ends_with("some/relative/dir"));
    }

    #[test]
    fn test_nothing_is_built_until_queried() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());

        let index = index_over(&root, &fs);

        assert_eq!(fs.read_dir_calls(), 0);
        assert_eq!(fs.open_calls(), 0);
        assert_eq!(index.stats().total_builds(), 0);
    }

    #[test]
    fn test_file_cache_is_built_once() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("sub/b.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        let first = index.files().unwrap();
        let second = index.files().unwrap();

        assert_eq!(first, second);
        assert_eq!(fs.read_dir_calls(), 2);
        assert_eq!(index.stats().file_cache_builds, 1);
    }

    #[test]
    fn test_summary_cache_is_built_once() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("b.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        index.summary_set().unwrap();
        index.summary_set().unwrap();
        index.files().unwrap();

        assert_eq!(fs.open_calls(), 2);
        assert_eq!(fs.read_dir_calls(), 1);
        assert_eq!(index.stats().summary_cache_builds, 1);
    }

    #[test]
    fn test_concurrent_queries_build_once() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("b.xml", profile_xml("http://x/p").as_str())]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = Arc::new(index_over(&root, &fs));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                thread::spawn(move || index.summary_set().map(|set| set.summaries().len()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 2);
        }
        assert_eq!(fs.read_dir_calls(), 1);
        assert_eq!(fs.open_calls(), 2);
        assert_eq!(index.stats().summary_cache_builds, 1);
    }

    #[test]
    fn test_invalidate_rebuilds_from_disk() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        assert_eq!(index.summary_set().unwrap().summaries().len(), 1);
        std::fs::write(root.join("b.json"), PATIENT_JSON).unwrap();
        assert_eq!(index.summary_set().unwrap().summaries().len(), 1);

        index.invalidate();

        assert_eq!(index.summary_set().unwrap().summaries().len(), 2);
        assert_eq!(index.stats().file_cache_builds, 2);
    }

    #[test]
    fn test_mask_change_invalidates_both_caches() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("b.xml", profile_xml("http://x/p").as_str())]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);
        assert_eq!(index.files().unwrap().len(), 2);

        index.set_mask("*.xml");

        assert_eq!(file_names(&index.files().unwrap()), vec!["b.xml"]);
        assert_eq!(index.summary_set().unwrap().summaries().len(), 1);
        assert_eq!(index.stats().file_cache_builds, 2);
    }

    #[test]
    fn test_preference_change_keeps_file_cache() {
        let (_dir, root) = temp_tree(&[("p.json", PATIENT_JSON), ("p.xml", r#"<Patient><id value="x"/></Patient>"#)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        let origin = |index: &SummaryIndex| index.summary_set().unwrap().summaries()[0].origin.clone();
        assert_eq!(origin(&index).file_name(), Some("p.xml"));

        index.set_format_preference(DuplicateFilePreference::PreferJson);

        assert_eq!(origin(&index).file_name(), Some("p.json"));
        assert_eq!(index.stats().file_cache_builds, 1);
        assert_eq!(index.stats().summary_cache_builds, 2);
        assert_eq!(fs.read_dir_calls(), 1);
    }

    #[test]
    fn test_includes_and_excludes_are_applied() {
        let (_dir, root) = temp_tree(&[
            ("a.json", PATIENT_JSON),
            ("profiles/b.xml", ""),
            ("profiles/draft/c.xml", ""),
        ]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        index.set_includes(vec!["profiles/**".to_owned()]);
        index.set_excludes(vec!["**/draft/**".to_owned()]);

        assert_eq!(file_names(&index.files().unwrap()), vec!["b.xml"]);
    }

    #[test]
    fn test_excluding_a_directory_drops_its_files() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("drafts/b.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        index.set_excludes(vec!["drafts/".to_owned()]);

        assert_eq!(file_names(&index.files().unwrap()), vec!["a.json"]);
    }

    #[test]
    fn test_binaries_are_never_listed() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("tool.exe", ""), ("lib.DLL", "")]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        assert_eq!(file_names(&index.files().unwrap()), vec!["a.json"]);
    }

    #[test]
    fn test_single_file_root() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON), ("b.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root.join("a.json"), &fs);

        assert_eq!(file_names(&index.files().unwrap()), vec!["a.json"]);
        assert_eq!(index.summary_set().unwrap().summaries().len(), 1);
    }

    #[test]
    fn test_malformed_document_is_recorded_not_raised() {
        let (_dir, root) = temp_tree(&[("a.json", "{ not json"), ("b.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        let set = index.summary_set().unwrap();

        assert_eq!(set.summaries().len(), 1);
        assert_eq!(set.errors().len(), 1);
        assert_eq!(set.errors()[0].path, root.join("a.json"));
        assert_eq!(index.stats().parse_errors, 1);
    }

    #[test]
    fn test_unsupported_files_are_not_opened() {
        let (_dir, root) = temp_tree(&[("notes.txt", "hello"), ("a.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        let set = index.summary_set().unwrap();

        assert_eq!(index.files().unwrap().len(), 2);
        assert_eq!(set.summaries().len(), 1);
        assert_eq!(fs.open_calls(), 1);
    }

    #[test]
    fn test_io_failure_aborts_and_is_not_cached() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new().failing_open(root.join("a.json")));
        let index = index_over(&root, &fs);

        let err = index.summary_set().unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));

        let _ = index.summary_set();
        assert_eq!(fs.open_calls(), 2);
        assert_eq!(index.stats().summary_cache_builds, 0);
    }

    #[test]
    fn test_conflict_is_cached_until_invalidated() {
        let (_dir, root) = temp_tree(&[
            ("a.xml", profile_xml("http://x/p").as_str()),
            ("b.xml", profile_xml("http://x/p").as_str()),
        ]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        let first = index.summary_set().unwrap_err();
        let second = index.summary_set().unwrap_err();

        assert!(first.is_conflict());
        assert_eq!(first.conflict_report(), second.conflict_report());
        assert_eq!(fs.open_calls(), 2);

        std::fs::remove_file(root.join("b.xml")).unwrap();
        index.invalidate();
        assert_eq!(index.summary_set().unwrap().summaries().len(), 1);
    }

    #[test]
    fn test_sequential_and_parallel_harvests_agree() {
        let (_dir, root) = temp_tree(&[
            ("a.json", PATIENT_JSON),
            ("b.xml", profile_xml("http://x/b").as_str()),
            ("c.json", value_set_json("vs", "http://x/vs", "http://x/cs").as_str()),
            ("d.json", "[broken"),
        ]);
        let fs = Arc::new(CountingFileSystem::new());
        let parallel = index_with(DiscoverySettings::new(&root), &fs);
        let sequential = index_with(DiscoverySettings::new(&root).with_parallel(false), &fs);

        assert_eq!(*parallel.summary_set().unwrap(), *sequential.summary_set().unwrap());
    }

    #[test]
    fn test_invalid_mask_surfaces_on_query() {
        let (_dir, root) = temp_tree(&[("a.json", PATIENT_JSON)]);
        let fs = Arc::new(CountingFileSystem::new());
        let index = index_over(&root, &fs);

        index.set_masks(vec!["[oops".to_owned()]);

        assert!(matches!(index.files(), Err(IndexError::Pattern { .. })));
        index.set_mask("*.json");
        assert_eq!(index.files().unwrap().len(), 1);
    }
}
