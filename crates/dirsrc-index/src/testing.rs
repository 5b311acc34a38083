//! Shared fixtures for unit tests.

use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use dirsrc_core::FxHashSet;
use tempfile::TempDir;

use crate::fs::{DirEntryInfo, EntryKind, FileSystem, OsFileSystem};

pub(crate) const PATIENT_JSON: &str = r#"{"resourceType":"Patient","id":"p1"}"#;

/// A StructureDefinition whose id is the last segment of `canonical`.
pub(crate) fn profile_xml(canonical: &str) -> String {
    let id = canonical.rsplit('/').next().unwrap_or("profile");
    format!(
        r#"<StructureDefinition xmlns="http://hl7.org/fhir"><id value="{id}"/><url value="{canonical}"/></StructureDefinition>"#
    )
}

pub(crate) fn value_set_json(id: &str, canonical: &str, system: &str) -> String {
    format!(
        r#"{{"resourceType":"ValueSet","id":"{id}","url":"{canonical}","codeSystem":{{"system":"{system}"}}}}"#
    )
}

/// Creates a temporary directory populated with `files`.
///
/// Paths may contain `/`; parent directories are created as needed.
pub(crate) fn temp_tree(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }

    (dir, root)
}

/// The real filesystem, with call counters and injectable failures.
#[derive(Debug, Default)]
pub(crate) struct CountingFileSystem {
    read_dirs: AtomicUsize,
    opens: AtomicUsize,
    failing_dirs: FxHashSet<Utf8PathBuf>,
    failing_opens: FxHashSet<Utf8PathBuf>,
}

impl CountingFileSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_dir(mut self, path: Utf8PathBuf) -> Self {
        self.failing_dirs.insert(path);
        self
    }

    pub(crate) fn failing_open(mut self, path: Utf8PathBuf) -> Self {
        self.failing_opens.insert(path);
        self
    }

    pub(crate) fn read_dir_calls(&self) -> usize {
        self.read_dirs.load(Ordering::SeqCst)
    }

    pub(crate) fn open_calls(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl FileSystem for CountingFileSystem {
    fn entry_kind(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        OsFileSystem.entry_kind(path)
    }

    fn read_dir(&self, path: &Utf8Path) -> io::Result<Vec<DirEntryInfo>> {
        self.read_dirs.fetch_add(1, Ordering::SeqCst);
        if self.failing_dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        }
        OsFileSystem.read_dir(path)
    }

    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read + Send>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.failing_opens.contains(path) {
            return Err(io::Error::other("device not ready"));
        }
        OsFileSystem.open(path)
    }
}
