//! Output-path conflict resolution.
//!
//! When the output file already exists, the run asks a pluggable
//! strategy what to do, so the interactive prompt can be swapped for a
//! deterministic implementation in tests or by CLI flags.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Decision for an existing output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Replace the existing file.
    Overwrite,
    /// Write to this path instead.
    Rename(PathBuf),
    /// Stop the run without writing.
    Abort,
}

/// Strategy consulted when the output path already exists.
pub trait ConflictStrategy {
    /// `suggested` is the first free numbered alternative for `path`.
    fn ask(&self, path: &Path, suggested: &Path) -> ConflictChoice;
}

/// Interactive stdin prompt with three numbered choices.
///
/// Non-matching input re-prompts; end of input or a read error aborts.
pub struct InteractivePrompt;

impl ConflictStrategy for InteractivePrompt {
    fn ask(&self, path: &Path, suggested: &Path) -> ConflictChoice {
        let stdin = io::stdin();

        loop {
            println!("\nOutput file already exists: {}", path.display());
            println!("  1. Overwrite the existing file");
            println!("  2. Use alternative filename: {}", suggested.display());
            println!("  3. Stop processing");
            print!("Enter your choice (1/2/3): ");
            io::stdout().flush().ok();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return ConflictChoice::Abort,
                Ok(_) => {}
            }

            match line.trim() {
                "1" => return ConflictChoice::Overwrite,
                "2" => return ConflictChoice::Rename(suggested.to_path_buf()),
                "3" => return ConflictChoice::Abort,
                _ => println!("Invalid choice. Please enter 1, 2, or 3."),
            }
        }
    }
}

/// `--force`: always overwrite without asking.
pub struct ForceOverwrite;

impl ConflictStrategy for ForceOverwrite {
    fn ask(&self, _path: &Path, _suggested: &Path) -> ConflictChoice {
        ConflictChoice::Overwrite
    }
}

/// `--no-clobber`: never overwrite; an existing output fails the run.
pub struct NeverOverwrite;

impl ConflictStrategy for NeverOverwrite {
    fn ask(&self, _path: &Path, _suggested: &Path) -> ConflictChoice {
        ConflictChoice::Abort
    }
}

/// First free numbered variant of `path`: `name_1.ext`, `name_2.ext`, …
pub fn next_available_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter: u32 = 1;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
