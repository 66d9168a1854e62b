//! Error types for pdfbind.
//!
//! Only run-aborting conditions are represented here. Per-file problems
//! (missing source path, unsupported extension, unrecognized option) are
//! reported through the [`Reporter`](crate::output::Reporter) and never
//! surface as a `MergeError` from the orchestrator.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfbind operations.
pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Failed to read configuration file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Invalid configuration in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Stopped without writing: output file already exists")]
    Aborted,

    #[error("No pages could be produced from the configured inputs")]
    NoPages,

    #[error("Failed to write output file {}: {source}", path.display())]
    FailedToWrite { path: PathBuf, source: io::Error },

    #[error("Failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to assemble output document: {reason}")]
    AssemblyFailed { reason: String },

    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MergeError {
    /// Create an AssemblyFailed error.
    pub fn assembly_failed(reason: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            reason: reason.into(),
        }
    }
}
