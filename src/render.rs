//! JSON output rendering.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentStructure;

/// Output formatting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, human-readable
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize an extraction result to JSON.
pub fn to_json(structure: &DocumentStructure, format: JsonFormat) -> Result<String> {
    let out = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(structure),
        JsonFormat::Compact => serde_json::to_string(structure),
    };
    out.map_err(|e| Error::Render(e.to_string()))
}

/// Serialize an extraction result to a file.
pub fn write_json(
    structure: &DocumentStructure,
    path: impl AsRef<Path>,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(structure, format)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> DocumentStructure {
        DocumentStructure {
            title: "Sample Document".to_string(),
            outline: vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Overview ".to_string(),
                page: 1,
            }],
        }
    }

    #[test]
    fn test_compact_shape() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Sample Document","outline":[{"level":"H1","text":"Overview ","page":1}]}"#
        );
    }

    #[test]
    fn test_pretty_parses_back() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        let parsed: DocumentStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
