//! Filesystem access seam.
//!
//! The index never calls `std::fs` directly; it goes through a
//! [`FileSystem`] so that tests can observe (and count) every directory
//! enumeration and file open. [`OsFileSystem`] is the real implementation.
//!
//! # Hidden and system entries
//!
//! [`DirEntryInfo::hidden`] is set for entries whose name starts with `.`
//! on Unix, and for entries carrying the HIDDEN or SYSTEM attribute on
//! Windows. The walker never reports or descends into hidden entries.

use std::fs;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// What lives at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing.
    Missing,
    /// A regular file (or a symlink to one).
    File,
    /// A directory.
    Directory,
}

/// One immediate entry of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Full path of the entry.
    pub path: Utf8PathBuf,
    /// `true` for directories the walker may descend into.
    pub is_dir: bool,
    /// `true` for hidden or system entries.
    pub hidden: bool,
}

/// Read-only filesystem operations used by the index.
pub trait FileSystem: Send + Sync {
    /// Classifies `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but cannot be inspected.
    fn entry_kind(&self, path: &Utf8Path) -> io::Result<EntryKind>;

    /// Lists the immediate entries of the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, or any of its entries, cannot be
    /// read. The walker skips the whole directory in that case.
    fn read_dir(&self, path: &Utf8Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Opens the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read + Send>>;
}

/// The operating system's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn entry_kind(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        match fs::metadata(path.as_std_path()) {
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(e) => Err(e),
        }
    }

    fn read_dir(&self, path: &Utf8Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path.as_std_path())? {
            let entry = entry?;
            let Ok(entry_path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                debug!(dir = %path, "Skipping entry with non-UTF-8 name");
                continue;
            };

            let file_type = entry.file_type()?;
            let is_dir = if file_type.is_symlink() {
                // Follow links to files, but never descend through a linked
                // directory: that is how traversal cycles happen.
                match fs::metadata(entry_path.as_std_path()) {
                    Ok(meta) if meta.is_file() => false,
                    _ => continue,
                }
            } else if file_type.is_dir() {
                true
            } else if file_type.is_file() {
                false
            } else {
                continue;
            };

            let hidden = is_hidden(&entry_path, &entry);
            entries.push(DirEntryInfo {
                path: entry_path,
                is_dir,
                hidden,
            });
        }

        Ok(entries)
    }

    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(fs::File::open(path.as_std_path())?))
    }
}

#[cfg(windows)]
fn is_hidden(_path: &Utf8Path, entry: &fs::DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;

    entry.metadata().is_ok_and(|meta| {
        meta.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0
    })
}

#[cfg(not(windows))]
fn is_hidden(path: &Utf8Path, _entry: &fs::DirEntry) -> bool {
    path.file_name().is_some_and(|name| name.starts_with('.'))
}
