//! Entry filtering for content scans.

use std::path::Path;
use walkdir::DirEntry;

/// Decides whether a filesystem entry takes part in a content scan.
///
/// - Dotfiles and dot-directories are rejected.
/// - Every other directory is accepted, so its index file and children
///   can be reached.
/// - Files are accepted when their extension is in the allow-list.
///   Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }

    /// Check an entry by name and kind.
    pub fn accept(&self, file_name: &str, is_dir: bool) -> bool {
        if file_name.starts_with('.') {
            return false;
        }
        if is_dir {
            return true;
        }
        self.allows_extension(extension(file_name))
    }

    /// Check a directory-walk entry.
    pub fn accept_entry(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.accept(&name, entry.file_type().is_dir())
    }

    /// Check a path on disk.
    pub fn accept_path(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.accept(&name, path.is_dir())
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Extension of a file name: everything after the last dot, `""` if none.
pub fn extension(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .map(|pos| &file_name[pos + 1..])
        .unwrap_or("")
}
