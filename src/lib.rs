//! # pdfoutline
//!
//! Structural outline extraction for PDF documents.
//!
//! Given the positioned, styled text of a document (pages of lines of
//! spans, as produced by an upstream PDF text extraction step), this crate
//! infers the document title and a hierarchical outline of H1-H4 headings
//! with page numbers. No embedded bookmarks or tagged structure are
//! required; everything is derived from text, font and layout geometry.
//!
//! ## Quick start
//!
//! ```no_run
//! use pdfoutline::{ExtractOptions, StructureExtractor};
//!
//! # fn main() -> pdfoutline::Result<()> {
//! let extractor = StructureExtractor::with_options(
//!     ExtractOptions::default().with_threshold(4.0),
//! )?;
//! let structure = extractor.extract_file("layout/report.json")?;
//! println!("{}", structure.title);
//! for entry in &structure.outline {
//!     println!("{} {} (p. {})", entry.level, entry.text.trim(), entry.page);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. A document family profile is selected from the file name; profiles
//!    bundle pattern rule tables and a page numbering policy.
//! 2. The title is extracted (profile recognizer, first-page layout,
//!    metadata, file name stem, in that order).
//! 3. Each page's lines are scored as heading candidates, with lines inside
//!    detected table regions suppressed.
//! 4. Accepted candidates get H1-H4 levels from pattern overrides and
//!    document-relative font tiers, then the outline is validated
//!    (hierarchy clamping, deduplication, rule exclusions).

pub mod analyzer;
pub mod batch;
pub mod error;
pub mod extractor;
pub mod model;
pub mod options;
pub mod render;

pub use analyzer::{PageNumbering, ProfileRegistry};
pub use batch::{process_dir, BatchReport};
pub use error::{Error, Result};
pub use extractor::StructureExtractor;
pub use model::{DocumentStructure, HeadingLevel, LayoutDocument, OutlineEntry};
pub use options::ExtractOptions;
pub use render::{to_json, write_json, JsonFormat};

/// Extract the structure of an in-memory document with default options.
pub fn extract_structure(doc: &LayoutDocument) -> Result<DocumentStructure> {
    StructureExtractor::new()?.extract(doc)
}

/// Extract the structure of a layout record file with default options.
pub fn extract_file(path: impl AsRef<std::path::Path>) -> Result<DocumentStructure> {
    StructureExtractor::new()?.extract_file(path)
}
