//! Extraction result types: heading candidates and the final outline.

use serde::{Deserialize, Serialize};

/// Heading level in the emitted outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
    /// Fourth-level heading
    H4,
}

impl HeadingLevel {
    /// Nesting depth as an integer, H1 = 1 .. H4 = 4.
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Level for a given depth, clamped to the H1..H4 range.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            _ => HeadingLevel::H4,
        }
    }

    /// All levels in H1 → H4 priority order.
    pub fn all() -> [HeadingLevel; 4] {
        [
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H4,
        ]
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
        };
        f.write_str(s)
    }
}

/// A scored heading candidate derived from one line.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// Trimmed line text
    pub text: String,
    /// Physical 1-based page number; numbering remap happens at emission
    pub page: u32,
    /// Composite heuristic score
    pub score: f32,
    /// Font size of the primary span
    pub font_size: f32,
    /// Whether the line is bold
    pub bold: bool,
    /// Vertical position of the line on its page
    pub y_position: f32,
    /// Line height
    pub line_height: f32,
    /// Whitespace prominence relative to neighbors, when spacing analysis ran
    pub spacing_score: Option<f32>,
}

/// One entry of the final outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text, trimmed with exactly one trailing space appended
    pub text: String,
    /// Page number
    pub page: u32,
}

/// The extraction result for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Best-guess document title, possibly empty
    pub title: String,
    /// Headings in document reading order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentStructure {
    /// An empty result with the given title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serialization() {
        let entry = OutlineEntry {
            level: HeadingLevel::H2,
            text: "Background ".to_string(),
            page: 3,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"level\":\"H2\""));
        assert!(json.contains("\"page\":3"));
    }

    #[test]
    fn test_level_depth_roundtrip() {
        for level in HeadingLevel::all() {
            assert_eq!(HeadingLevel::from_depth(level.depth()), level);
        }
        assert_eq!(HeadingLevel::from_depth(9), HeadingLevel::H4);
    }

    #[test]
    fn test_structure_field_order() {
        let s = DocumentStructure::with_title("T");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"title":"T","outline":[]}"#);
    }
}
