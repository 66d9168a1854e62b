//! pdfbind - Merge PDF and image files into a single PDF.
//!
//! Inputs are described by a JSON manifest: an ordered `files` array of
//! path strings and option-carrying groups. Directories are expanded in
//! a deterministic order, options are inherited down the tree, and page
//! transformations (rotation, flipping) are applied per file before the
//! pages are appended to the output document.

pub mod assemble;
mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod prompt;
pub mod resolve;
pub mod transform;
pub mod walker;

pub use error::{MergeError, Result};

use clap::Parser;

use crate::assemble::Assembler;
use crate::cli::Cli;
use crate::output::ConsoleReporter;
use crate::prompt::{ConflictStrategy, ForceOverwrite, InteractivePrompt, NeverOverwrite};

/// Parse the command line and run one merge. Returns whether the run
/// succeeded; all detail goes through the reporter.
pub fn run() -> bool {
    let cli = Cli::parse();

    let reporter = ConsoleReporter::new(cli.quiet, cli.debug);

    let strategy: Box<dyn ConflictStrategy> = if cli.force {
        Box::new(ForceOverwrite)
    } else if cli.no_clobber {
        Box::new(NeverOverwrite)
    } else {
        Box::new(InteractivePrompt)
    };

    let assembler = Assembler::new(&reporter, strategy.as_ref());
    assembler.process(&cli.config, &cli.output)
}
