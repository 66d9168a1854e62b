//! Filesystem expansion of configured paths.
//!
//! A configured path may name a single file or a directory to scan. The
//! expansion order is part of the tool's contract: flat listings are
//! sorted by path string, and recursive scans emit each directory's files
//! before descending into its subdirectories, siblings in name order.
//! The recursive result is a concatenation of per-directory listings, not
//! a global sort over all paths.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::output::Reporter;

/// Expands a configured path into an ordered list of concrete files.
pub struct PathExpander<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> PathExpander<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Resolve `path` into concrete file paths.
    ///
    /// A nonexistent path yields an empty list and a warning; it never
    /// aborts the run.
    pub fn expand(&self, path: &Path, recursive: bool) -> Vec<PathBuf> {
        if !path.exists() {
            self.reporter
                .warn(&format!("Path does not exist: {}", path.display()));
            return Vec::new();
        }

        if path.is_file() {
            return vec![path.to_path_buf()];
        }

        if path.is_dir() {
            self.reporter.debug(&format!(
                "Scanning directory {} ({})",
                path.display(),
                if recursive {
                    "recursive"
                } else {
                    "non-recursive"
                }
            ));
            return if recursive {
                self.list_recursive(path)
            } else {
                self.list_flat(path)
            };
        }

        Vec::new()
    }

    /// Regular files directly inside `dir`, sorted by path string.
    fn list_flat(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.reporter
                    .warn(&format!("Cannot read directory {}: {err}", dir.display()));
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(err) => {
                    self.reporter
                        .warn(&format!("Skipping unreadable entry in {}: {err}", dir.display()));
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        files.sort();
        files
    }

    /// Pre-order traversal: each directory contributes its files (sorted)
    /// before its subdirectories (in name order).
    fn list_recursive(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by(files_before_directories)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    self.reporter
                        .warn(&format!("Skipping unreadable entry under {}: {err}", dir.display()));
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .collect()
    }
}

/// Sibling comparator: regular files sort before directories, then by
/// file name. Combined with walkdir's depth-first descent this yields the
/// per-directory grouping described in the module docs.
fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
