//! Flattening of the configuration tree into an ordered work list.
//!
//! Resolution walks the `files` entries in declaration order and expands
//! each into concrete `(path, options)` pairs. Options accumulate down
//! the tree: a group's own options are appended to the inherited set,
//! duplicates dropped, relative order preserved. The `recursive` option
//! doubles as the directory-traversal directive for its scope.

use std::path::PathBuf;

use crate::config::{merge_options, Entry};
use crate::output::Reporter;
use crate::walker::PathExpander;

/// Option literal consumed by the expander rather than the transform
/// engine.
pub const RECURSIVE_OPTION: &str = "recursive";

/// One flattened input: a concrete file plus its effective options.
///
/// Immutable once produced; the list is consumed in order and discarded
/// after assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub options: Vec<String>,
}

/// Walks configuration entries and produces the flat input list.
pub struct Resolver<'a> {
    expander: PathExpander<'a>,
    reporter: &'a dyn Reporter,
}

impl<'a> Resolver<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            expander: PathExpander::new(reporter),
            reporter,
        }
    }

    /// Resolve `entries` under `inherited` options.
    ///
    /// Output order equals entry order; filesystem order only breaks ties
    /// within a single path expansion.
    pub fn resolve(&self, entries: &[Entry], inherited: &[String]) -> Vec<ResolvedFile> {
        let mut resolved = Vec::new();

        if !inherited.is_empty() {
            self.reporter
                .debug(&format!("Resolving with inherited options: {inherited:?}"));
        }

        for entry in entries {
            match entry {
                Entry::Path(path) => {
                    // Bare strings never recurse; only group scopes can
                    // declare recursion.
                    for file in self.expander.expand(path.as_ref(), false) {
                        resolved.push(ResolvedFile {
                            path: file,
                            options: inherited.to_vec(),
                        });
                    }
                }
                Entry::Group(group) => {
                    let current = merge_options(inherited, &group.options);
                    let recursive = current.iter().any(|o| o == RECURSIVE_OPTION);

                    // The group's own list gets a global string sort,
                    // independent of the per-directory ordering inside a
                    // recursive scan.
                    let mut paths = group.files.clone();
                    paths.sort();

                    for path in &paths {
                        for file in self.expander.expand(path.as_ref(), recursive) {
                            resolved.push(ResolvedFile {
                                path: file,
                                options: current.clone(),
                            });
                        }
                    }
                }
                Entry::Other(value) => {
                    self.reporter
                        .debug(&format!("Skipping malformed entry: {value}"));
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeConfig;
    use crate::output::{Level, MemoryReporter};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn entries(json: &str) -> Vec<Entry> {
        let config: MergeConfig = serde_json::from_str(json).unwrap();
        config.files
    }

    #[test]
    fn plain_string_carries_inherited_options() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.pdf");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let json = format!(r#"{{"files": ["{}"]}}"#, dir.path().join("a.pdf").display());
        let inherited = vec!["rotate90".to_string()];
        let resolved = resolver.resolve(&entries(&json), &inherited);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].options, vec!["rotate90"]);
    }

    #[test]
    fn group_options_apply_to_every_expanded_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "a.pdf");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let json = format!(
            r#"{{"files": [{{"files": ["{}"], "options": ["rotate180"]}}]}}"#,
            dir.path().display()
        );
        let resolved = resolver.resolve(&entries(&json), &[]);

        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .all(|r| r.options == vec!["rotate180".to_string()]));
        assert!(resolved[0].path.ends_with("a.pdf"));
        assert!(resolved[1].path.ends_with("b.pdf"));
    }

    #[test]
    fn group_merges_options_without_duplicates() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.pdf");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let json = format!(
            r#"{{"files": [{{"files": ["{}"], "options": ["b", "c"]}}]}}"#,
            dir.path().join("a.pdf").display()
        );
        let inherited = vec!["a".to_string(), "b".to_string()];
        let resolved = resolver.resolve(&entries(&json), &inherited);

        assert_eq!(resolved[0].options, vec!["a", "b", "c"]);
    }

    #[test]
    fn recursive_option_descends_and_is_carried() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.png");
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "inner.png");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let json = format!(
            r#"{{"files": [{{"files": ["{}"], "options": ["recursive", "flipH"]}}]}}"#,
            dir.path().display()
        );
        let resolved = resolver.resolve(&entries(&json), &[]);

        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .all(|r| r.options == vec!["recursive".to_string(), "flipH".to_string()]));
        assert!(resolved[0].path.ends_with("top.png"));
        assert!(resolved[1].path.ends_with("sub/inner.png"));
    }

    #[test]
    fn without_recursive_option_subdirectories_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.png");
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "inner.png");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let json = format!(
            r#"{{"files": [{{"files": ["{}"], "options": ["rotate180"]}}]}}"#,
            dir.path().display()
        );
        let resolved = resolver.resolve(&entries(&json), &[]);

        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].path.ends_with("top.png"));
        assert_eq!(resolved[0].options, vec!["rotate180"]);
    }

    #[test]
    fn group_sorts_its_own_path_list() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "z.pdf");
        touch(dir.path(), "a.pdf");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        // Declared out of order; the entry's own list is sorted before
        // expansion.
        let json = format!(
            r#"{{"files": [{{"files": ["{z}", "{a}"]}}]}}"#,
            z = dir.path().join("z.pdf").display(),
            a = dir.path().join("a.pdf").display()
        );
        let resolved = resolver.resolve(&entries(&json), &[]);

        assert!(resolved[0].path.ends_with("a.pdf"));
        assert!(resolved[1].path.ends_with("z.pdf"));
    }

    #[test]
    fn top_level_entries_keep_declaration_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "z.pdf");
        touch(dir.path(), "a.pdf");
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        // Plain entries are not sorted across one another.
        let json = format!(
            r#"{{"files": ["{z}", "{a}"]}}"#,
            z = dir.path().join("z.pdf").display(),
            a = dir.path().join("a.pdf").display()
        );
        let resolved = resolver.resolve(&entries(&json), &[]);

        assert!(resolved[0].path.ends_with("z.pdf"));
        assert!(resolved[1].path.ends_with("a.pdf"));
    }

    #[test]
    fn malformed_entries_are_skipped_with_a_debug_note() {
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let resolved = resolver.resolve(&entries(r#"{"files": [42]}"#), &[]);

        assert!(resolved.is_empty());
        assert!(reporter.contains(Level::Debug, "malformed entry"));
        assert!(!reporter.contains(Level::Warning, "malformed"));
    }

    #[test]
    fn missing_paths_warn_and_contribute_nothing() {
        let reporter = MemoryReporter::new();
        let resolver = Resolver::new(&reporter);

        let resolved = resolver.resolve(&entries(r#"{"files": ["/no/such/file.pdf"]}"#), &[]);

        assert!(resolved.is_empty());
        assert!(reporter.contains(Level::Warning, "does not exist"));
    }
}
