//! Directory traversal for content scans.
//!
//! Walks a content root depth-first, visiting every directory before its
//! children. Siblings are sorted by file name and filtered through a
//! [`FileFilter`]; rejected directories are not descended into.
//!
//! ```text
//! pages/
//! ├── 01-index.md            1  01-index.md
//! ├── 02-about/              2  02-about
//! │   ├── 01-index.md        3  02-about/01-index.md
//! │   └── team.md            4  02-about/team.md
//! ├── 03-contact.md          5  03-contact.md
//! └── .drafts/               -  (rejected, not descended)
//! ```
//!
//! Directories are described by their index file: the first file, in name
//! order, whose name contains the configured index marker (`index` by
//! default). See [`DirectoryWalker::find_index_file`].

use crate::filter::FileFilter;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One entry produced by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the walked root, `/`-separated.
    pub relative_path: String,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    filter: FileFilter,
    index_name: String,
}

impl DirectoryWalker {
    pub fn new(filter: FileFilter, index_name: impl Into<String>) -> Self {
        Self {
            filter,
            index_name: index_name.into(),
        }
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    /// Substring that marks a directory's index file.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Lazily walk `root` in pre-order. The root itself is not yielded.
    ///
    /// A missing or unreadable root surfaces as the first item's error.
    pub fn walk<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = Result<WalkEntry, WalkError>> + 'a {
        WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            // The root may itself be a dot-directory (temp dirs often are)
            .filter_entry(move |entry| entry.depth() == 0 || self.filter.accept_entry(entry))
            .map(move |entry| {
                let entry = entry?;
                Ok(WalkEntry {
                    relative_path: relative_path(root, entry.path()),
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                })
            })
    }

    /// Find the file describing `dir`: the first accepted file, in name
    /// order, whose name contains the index marker.
    pub fn find_index_file(&self, dir: &Path) -> Result<Option<PathBuf>, WalkError> {
        let read = fs::read_dir(dir).map_err(|source| WalkError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<PathBuf> = read
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                let name = p.file_name().unwrap_or_default().to_string_lossy();
                name.contains(self.index_name.as_str())
                    && p.is_file()
                    && self.filter.accept(&name, false)
            })
            .collect();

        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

/// `/`-separated path of `path` below `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
