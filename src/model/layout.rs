//! Layout primitives: page → line → styled-span records.
//!
//! These records are produced by an external PDF text/layout extraction
//! step and consumed read-only by the analysis pipeline. Coordinates use a
//! top-left origin with y increasing downward.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Check that coordinates are monotonic (x1 >= x0, y1 >= y0).
    pub fn is_valid(&self) -> bool {
        self.x1 >= self.x0 && self.y1 >= self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether `other` is fully contained in this box.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    /// Rectangle intersection test.
    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.x1 < other.x0 || other.x1 < self.x0 || self.y1 < other.y0 || other.y1 < self.y0)
    }

    /// Expand the box by the given margins on each axis.
    pub fn pad(&self, dx: f32, dy: f32) -> BBox {
        BBox {
            x0: self.x0 - dx,
            y0: self.y0 - dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

/// A contiguous run of text with uniform styling on one line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyledSpan {
    /// The text content
    pub text: String,
    /// Bounding box in page units
    pub bbox: BBox,
    /// Font size in points
    pub font_size: f32,
    /// Whether the style flags mark this span bold
    #[serde(default)]
    pub bold: bool,
    /// Font family name, may be empty
    #[serde(default)]
    pub font_name: String,
}

impl StyledSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, bbox: BBox, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            bold: false,
            font_name: String::new(),
        }
    }

    /// Left edge X coordinate.
    pub fn x(&self) -> f32 {
        self.bbox.x0
    }

    /// Top edge Y coordinate.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }
}

/// An ordered sequence of spans on the same visual text line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Spans in visual order
    pub spans: Vec<StyledSpan>,
    /// Line bounding box (union of span boxes)
    pub bbox: BBox,
}

impl Line {
    /// Create a line from spans; the bbox is the union of the span boxes.
    pub fn from_spans(spans: Vec<StyledSpan>) -> Self {
        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0));
        Self { spans, bbox }
    }

    /// Concatenated span texts, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out.trim().to_string()
    }

    /// Font size of the primary (first) span, or 12.0 when empty.
    pub fn font_size(&self) -> f32 {
        self.spans.first().map(|s| s.font_size).unwrap_or(12.0)
    }

    /// Check if the line is predominantly bold (by character count).
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .spans
            .iter()
            .filter(|s| s.bold)
            .map(|s| s.text.chars().count())
            .sum();
        let total_chars: usize = self.spans.iter().map(|s| s.text.chars().count()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }

    /// Whether any span in the line is bold.
    pub fn has_bold(&self) -> bool {
        self.spans.iter().any(|s| s.bold)
    }

    /// Top edge Y position of the line.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }

    /// Line height.
    pub fn height(&self) -> f32 {
        self.bbox.height()
    }
}

/// A single page of layout records.
///
/// Lines arrive in content stream order, which is not necessarily
/// top-to-bottom; callers doing layout analysis should use
/// [`Page::lines_by_position`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-based)
    pub number: u32,
    /// Page width in page units
    pub width: f32,
    /// Page height in page units
    pub height: f32,
    /// Lines in content stream order
    pub lines: Vec<Line>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Lines sorted by vertical position (top to bottom).
    pub fn lines_by_position(&self) -> Vec<&Line> {
        let mut lines: Vec<&Line> = self.lines.iter().collect();
        lines.sort_by(|a, b| a.y().partial_cmp(&b.y()).unwrap_or(std::cmp::Ordering::Equal));
        lines
    }

    /// All spans on the page, in line order.
    pub fn spans(&self) -> impl Iterator<Item = &StyledSpan> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

/// A parsed document: the full input to one extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Source file name (used for the filename-stem title fallback)
    pub file_name: String,
    /// Title stored in the document's embedded metadata, if any
    #[serde(default)]
    pub metadata_title: Option<String>,
    /// Pages in document order
    pub pages: Vec<Page>,
}

impl LayoutDocument {
    /// Create a document with the given file name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            metadata_title: None,
            pages: Vec::new(),
        }
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        std::path::Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
