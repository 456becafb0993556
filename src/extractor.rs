//! The extraction pipeline.
//!
//! One [`StructureExtractor`] is built per configuration and reused across
//! documents. Per document: select a profile, extract the title, collect
//! scored heading candidates page by page with table regions suppressed,
//! then classify levels and validate the outline.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::analyzer::{
    CandidateScorer, LevelClassifier, ProfileRegistry, TableDetector, TitleExtractor,
};
use crate::error::{Error, Result};
use crate::model::{DocumentStructure, HeadingCandidate, LayoutDocument, Line, Page};
use crate::options::ExtractOptions;

/// Extracts document structure from layout records.
pub struct StructureExtractor {
    options: ExtractOptions,
    profiles: ProfileRegistry,
    titles: TitleExtractor,
    scorer: CandidateScorer,
    tables: TableDetector,
}

impl StructureExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with the given options.
    pub fn with_options(options: ExtractOptions) -> Result<Self> {
        let profiles = match &options.profiles_path {
            Some(path) => ProfileRegistry::from_file(path)?,
            None => ProfileRegistry::builtin(),
        };
        Ok(Self {
            titles: TitleExtractor::with_page_limit(options.title_page_limit),
            options,
            profiles,
            scorer: CandidateScorer::new(),
            tables: TableDetector::new(),
        })
    }

    /// Extract the structure of one document.
    pub fn extract(&self, doc: &LayoutDocument) -> Result<DocumentStructure> {
        validate_layout(doc)?;
        let profile = self.profiles.select(doc);
        log::info!(
            "extracting {} ({} pages, profile {:?})",
            doc.file_name,
            doc.page_count(),
            profile.name
        );

        let title = self.titles.extract(doc, profile);
        let consumed: HashSet<&str> = title.consumed.iter().map(|s| s.as_str()).collect();
        let title_norm = normalize(&title.text);

        let mut candidates = Vec::new();
        for page in &doc.pages {
            self.collect_page_candidates(page, profile, &consumed, &title_norm, &mut candidates);
        }
        log::debug!("{} candidates accepted", candidates.len());

        let classifier = LevelClassifier::new(&profile.rules, profile.page_numbering);
        let outline = classifier.classify(candidates);

        Ok(DocumentStructure {
            title: title.text,
            outline,
        })
    }

    /// Load a layout record file and extract its structure.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<DocumentStructure> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let doc: LayoutDocument = serde_json::from_str(&json)
            .map_err(|e| Error::DocumentOpen(format!("{}: {}", path.display(), e)))?;
        self.extract(&doc)
    }

    fn collect_page_candidates(
        &self,
        page: &Page,
        profile: &crate::analyzer::DocumentProfile,
        consumed: &HashSet<&str>,
        title_norm: &str,
        candidates: &mut Vec<HeadingCandidate>,
    ) {
        let toc_page = profile.toc_page == Some(page.number);
        let regions = if self.options.detect_tables {
            self.tables.detect(page)
        } else {
            Vec::new()
        };

        let lines = page.lines_by_position();
        for (i, line) in lines.iter().enumerate() {
            let text = line.text();
            if text.is_empty() {
                continue;
            }
            // TOC entries are headings elsewhere; only the structural labels
            // of the TOC page itself survive
            if toc_page
                && !(profile.rules.forced_level(&text).is_some()
                    && !text.starts_with(|c: char| c.is_ascii_digit()))
            {
                continue;
            }
            // Title lines never double as headings
            if consumed.contains(text.as_str()) {
                continue;
            }
            if page.number == 1 && !title_norm.is_empty() {
                let norm = normalize(&text);
                if norm == title_norm
                    || title_norm.contains(norm.as_str())
                    || norm.contains(title_norm)
                {
                    continue;
                }
            }
            if regions.iter().any(|r| r.contains_line(line))
                && !self.scorer.is_obvious_heading(&text, &profile.rules)
            {
                continue;
            }

            let score = self.scorer.score(line, &profile.rules);
            if score <= 0.0 {
                continue;
            }
            let threshold = self
                .scorer
                .threshold(&text, &profile.rules, self.options.threshold);
            if score <= threshold {
                continue;
            }

            let spacing_score = if self.options.spacing {
                Some(spacing_score(&lines, i))
            } else {
                None
            };

            candidates.push(HeadingCandidate {
                text,
                page: page.number,
                score,
                font_size: line.font_size(),
                bold: line.is_bold(),
                y_position: line.y(),
                line_height: line.height(),
                spacing_score,
            });
        }
    }
}

/// Lowercased, whitespace-collapsed comparison key.
fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Basic sanity checks on incoming layout records.
fn validate_layout(doc: &LayoutDocument) -> Result<()> {
    for page in &doc.pages {
        if page.number == 0 {
            return Err(Error::InvalidLayout(format!(
                "{}: page numbers are 1-based, found 0",
                doc.file_name
            )));
        }
        if page.width <= 0.0 || page.height <= 0.0 {
            return Err(Error::InvalidLayout(format!(
                "{}: page {} has non-positive dimensions",
                doc.file_name, page.number
            )));
        }
    }
    Ok(())
}

/// Whitespace isolation of a line relative to its vertical neighbors.
/// Each side contributes +2 when the gap exceeds 1.5 line heights, +1 when
/// it exceeds one line height.
fn spacing_score(lines: &[&Line], index: usize) -> f32 {
    let line = lines[index];
    let height = line.height().max(1.0);
    let mut score = 0.0;

    if index > 0 {
        let above = lines[index - 1];
        let gap = line.bbox.y0 - above.bbox.y1;
        score += gap_points(gap, height);
    }
    if index + 1 < lines.len() {
        let below = lines[index + 1];
        let gap = below.bbox.y0 - line.bbox.y1;
        score += gap_points(gap, height);
    }

    score
}

fn gap_points(gap: f32, height: f32) -> f32 {
    if gap > height * 1.5 {
        2.0
    } else if gap > height {
        1.0
    } else {
        0.0
    }
}
