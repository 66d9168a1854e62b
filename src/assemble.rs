//! Output document assembly.
//!
//! The assembler drives a run end to end: resolve the output path,
//! load the configuration, flatten it into the input list, convert and
//! transform each file, and append its pages to the output document in
//! list order. Per-file failures skip that file and continue; fatal
//! failures stop the run. `process` is the outermost boundary: every
//! internal error is caught there and reduced to a success flag plus
//! reported detail.

use lopdf::{Document, Object, ObjectId};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::MergeConfig;
use crate::convert::load_source;
use crate::error::{MergeError, Result};
use crate::output::Reporter;
use crate::prompt::{next_available_path, ConflictChoice, ConflictStrategy};
use crate::resolve::{ResolvedFile, Resolver};
use crate::transform::TransformEngine;

/// Counters for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Final output path after conflict resolution.
    pub output: PathBuf,
    /// Files whose pages made it into the output.
    pub files_merged: usize,
    /// Files skipped over per-file failures.
    pub files_skipped: usize,
    /// Total pages written.
    pub pages_written: usize,
}

/// Orchestrates one merge run.
pub struct Assembler<'a> {
    reporter: &'a dyn Reporter,
    conflicts: &'a dyn ConflictStrategy,
}

impl<'a> Assembler<'a> {
    pub fn new(reporter: &'a dyn Reporter, conflicts: &'a dyn ConflictStrategy) -> Self {
        Self {
            reporter,
            conflicts,
        }
    }

    /// Run to completion. Never returns an error; failures are reported
    /// and reflected in the flag.
    pub fn process(&self, config_path: &Path, output_path: &Path) -> bool {
        match self.try_process(config_path, output_path) {
            Ok(summary) => {
                self.reporter.info(&format!(
                    "Wrote {} page(s) from {} file(s) to {}",
                    summary.pages_written,
                    summary.files_merged,
                    summary.output.display()
                ));
                if summary.files_skipped > 0 {
                    self.reporter
                        .warn(&format!("Skipped {} file(s)", summary.files_skipped));
                }
                true
            }
            Err(err) => {
                self.reporter.error(&err.to_string());
                false
            }
        }
    }

    fn try_process(&self, config_path: &Path, output_path: &Path) -> Result<RunSummary> {
        let output = self.resolve_output(output_path)?;

        let config = MergeConfig::load(config_path)?;
        self.reporter.info(&format!(
            "Loaded configuration from {}",
            config_path.display()
        ));

        let resolver = Resolver::new(self.reporter);
        let resolved = resolver.resolve(&config.files, &[]);
        self.reporter
            .info(&format!("Processing {} file(s)", resolved.len()));

        let engine = TransformEngine::new(self.reporter);
        let (mut merged, pages_root) = new_output_document();

        let mut summary = RunSummary {
            output: output.clone(),
            files_merged: 0,
            files_skipped: 0,
            pages_written: 0,
        };

        for entry in &resolved {
            match self.append_file(&mut merged, pages_root, entry, &engine) {
                Ok(Some(pages)) => {
                    summary.files_merged += 1;
                    summary.pages_written += pages;
                }
                Ok(None) => summary.files_skipped += 1,
                Err(err) => {
                    self.reporter
                        .error(&format!("Skipping {}: {err}", entry.path.display()));
                    summary.files_skipped += 1;
                }
            }
        }

        if summary.pages_written == 0 {
            return Err(MergeError::NoPages);
        }

        write_document(&mut merged, &output)?;

        Ok(summary)
    }

    /// Decide the final output path, consulting the conflict strategy if
    /// the requested one already exists.
    fn resolve_output(&self, path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Ok(path.to_path_buf());
        }

        self.reporter
            .warn(&format!("Output file already exists: {}", path.display()));
        let suggested = next_available_path(path);

        match self.conflicts.ask(path, &suggested) {
            ConflictChoice::Overwrite => {
                self.reporter
                    .info(&format!("Overwriting {}", path.display()));
                Ok(path.to_path_buf())
            }
            ConflictChoice::Rename(alternative) => {
                self.reporter.info(&format!(
                    "Using alternative filename: {}",
                    alternative.display()
                ));
                Ok(alternative)
            }
            ConflictChoice::Abort => Err(MergeError::Aborted),
        }
    }

    /// Convert one resolved file, transform its pages, and append them.
    ///
    /// Returns the number of appended pages, or `None` if the file was
    /// unsupported.
    fn append_file(
        &self,
        merged: &mut Document,
        pages_root: ObjectId,
        entry: &ResolvedFile,
        engine: &TransformEngine,
    ) -> Result<Option<usize>> {
        self.reporter
            .info(&format!("Processing file: {}", entry.path.display()));
        if !entry.options.is_empty() {
            self.reporter
                .debug(&format!("  with options: {:?}", entry.options));
        }

        let mut source = match load_source(&entry.path, self.reporter)? {
            Some(doc) => doc,
            None => return Ok(None),
        };

        // Transform before the move so media boxes and content streams
        // are still resolvable in the source document.
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        for &page_id in &page_ids {
            engine.apply_all(&mut source, page_id, &entry.options)?;
        }

        source.renumber_objects_with(merged.max_id + 1);
        merged.max_id = source.max_id;

        let appended: Vec<ObjectId> = source.get_pages().into_values().collect();
        merged.objects.extend(source.objects);
        attach_pages(merged, pages_root, &appended)?;

        Ok(Some(appended.len()))
    }
}

/// Fresh output document: a catalog over an empty page tree.
fn new_output_document() -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(lopdf::dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => 0,
        }),
    );

    let catalog_id = doc.add_object(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, pages_id)
}

/// Push page references into the output page tree and bump the count.
fn attach_pages(merged: &mut Document, pages_root: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
    let pages_obj = merged.get_object_mut(pages_root)?;

    let dict = match pages_obj {
        Object::Dictionary(dict) => dict,
        _ => {
            return Err(MergeError::assembly_failed(
                "Pages object is not a dictionary",
            ));
        }
    };

    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            for &page_id in page_ids {
                kids.push(Object::Reference(page_id));
            }
        }
        _ => {
            return Err(MergeError::assembly_failed(
                "Pages dictionary missing Kids array",
            ));
        }
    }

    let count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(count + page_ids.len() as i64));

    Ok(())
}

/// Serialize the finished document.
fn write_document(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    doc.renumber_objects();

    let file = File::create(path).map_err(|source| MergeError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    doc.save_to(&mut writer)
        .map_err(|err| MergeError::FailedToWrite {
            path: path.to_path_buf(),
            source: io::Error::other(err),
        })?;

    writer.flush().map_err(|source| MergeError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
