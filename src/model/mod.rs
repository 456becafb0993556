//! Data model for layout records and extraction results.

mod layout;
mod outline;

pub use layout::{BBox, LayoutDocument, Line, Page, StyledSpan};
pub use outline::{DocumentStructure, HeadingCandidate, HeadingLevel, OutlineEntry};
