//! Configuration model for pdfbind.
//!
//! The configuration is a JSON document with a required top-level `files`
//! array. Each element is either a plain path string or an object carrying
//! its own `files` list (path strings only) and `options` list
//! (transformation names). Anything else is tolerated by the parser and
//! skipped during resolution.
//!
//! ```json
//! {
//!   "files": [
//!     "cover.pdf",
//!     { "files": ["scans"], "options": ["recursive", "rotate180"] }
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{MergeError, Result};

/// Parsed configuration document. Loaded once, read-only afterwards.
#[derive(Debug, Deserialize)]
pub struct MergeConfig {
    /// Ordered input entries; order here is output page order.
    pub files: Vec<Entry>,
}

/// One element of the `files` array.
///
/// Deserialization tries the variants in order, so a JSON string becomes
/// `Path`, an object becomes `Group`, and everything else (numbers,
/// arrays, objects whose inner `files` is not a list of strings) falls
/// through to `Other` and is skipped at resolution time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Path(String),
    Group(GroupEntry),
    Other(serde_json::Value),
}

/// Object entry: nested paths plus transformation options for this scope.
#[derive(Debug, Default, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub options: Vec<String>,
}

impl MergeConfig {
    /// Load and parse a configuration file.
    ///
    /// A missing file, malformed JSON, or an absent `files` key is a
    /// fatal load error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| MergeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| MergeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Merge a child option list into an inherited one.
///
/// The result is the inherited list followed by those child options not
/// already present, preserving the child's relative order. Nested scopes
/// inherit the merged list unchanged.
///
/// ```
/// use pdfbind::config::merge_options;
///
/// let merged = merge_options(
///     &["a".to_string(), "b".to_string()],
///     &["b".to_string(), "c".to_string()],
/// );
/// assert_eq!(merged, vec!["a", "b", "c"]);
/// ```
pub fn merge_options(inherited: &[String], child: &[String]) -> Vec<String> {
    let mut merged = inherited.to_vec();
    for option in child {
        if !merged.contains(option) {
            merged.push(option.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(json: &str) -> MergeConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn string_entry_parses_as_path() {
        let config = parse(r#"{"files": ["a.pdf"]}"#);
        assert!(matches!(&config.files[0], Entry::Path(p) if p == "a.pdf"));
    }

    #[test]
    fn object_entry_parses_as_group() {
        let config = parse(r#"{"files": [{"files": ["dir"], "options": ["rotate90"]}]}"#);
        match &config.files[0] {
            Entry::Group(group) => {
                assert_eq!(group.files, vec!["dir"]);
                assert_eq!(group.options, vec!["rotate90"]);
            }
            other => panic!("expected group entry, got {other:?}"),
        }
    }

    #[test]
    fn group_fields_default_to_empty() {
        let config = parse(r#"{"files": [{}]}"#);
        match &config.files[0] {
            Entry::Group(group) => {
                assert!(group.files.is_empty());
                assert!(group.options.is_empty());
            }
            other => panic!("expected group entry, got {other:?}"),
        }
    }

    #[test]
    fn non_string_non_object_entry_parses_as_other() {
        let config = parse(r#"{"files": [42, [1, 2]]}"#);
        assert!(matches!(config.files[0], Entry::Other(_)));
        assert!(matches!(config.files[1], Entry::Other(_)));
    }

    #[test]
    fn group_with_non_string_inner_files_degrades_to_other() {
        // Inner `files` elements are strictly path strings; deeper nesting
        // does not match the two-level schema.
        let config = parse(r#"{"files": [{"files": [{"files": ["x"]}]}]}"#);
        assert!(matches!(config.files[0], Entry::Other(_)));
    }

    #[test]
    fn missing_files_key_is_an_error() {
        let result: std::result::Result<MergeConfig, _> = serde_json::from_str(r#"{"x": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"files": ["a.pdf", "b.pdf"]}}"#).unwrap();

        let config = MergeConfig::load(&path).unwrap();
        assert_eq!(config.files.len(), 2);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = MergeConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(MergeError::ConfigRead { .. })));
    }

    #[test]
    fn load_malformed_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let result = MergeConfig::load(&path);
        assert!(matches!(result, Err(MergeError::ConfigParse { .. })));
    }

    #[test]
    fn merge_options_deduplicates_preserving_order() {
        let inherited = vec!["a".to_string(), "b".to_string()];
        let child = vec!["b".to_string(), "c".to_string(), "a".to_string()];
        assert_eq!(merge_options(&inherited, &child), vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_options_with_empty_parent() {
        let child = vec!["rotate180".to_string()];
        assert_eq!(merge_options(&[], &child), vec!["rotate180"]);
    }
}
