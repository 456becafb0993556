//! Error types for the pdfoutline library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input cannot be read as a layout document.
    #[error("Cannot open document: {0}")]
    DocumentOpen(String),

    /// The layout records are structurally invalid.
    #[error("Invalid layout record: {0}")]
    InvalidLayout(String),

    /// A rule table failed to load or compile.
    #[error("Invalid rule table: {0}")]
    InvalidRules(String),

    /// A listed input file does not exist on disk.
    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    /// Error serializing the extraction result.
    #[error("Rendering error: {0}")]
    Render(String),
}
