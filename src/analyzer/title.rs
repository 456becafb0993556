//! Document title extraction.
//!
//! Tries strategies in order of reliability: a profile title recognizer over
//! the first pages, layout scoring of the first page's upper region, the
//! embedded metadata title, then the file name stem as a last resort.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{LayoutDocument, Line};

use super::profile::{DocumentProfile, TitlePolicy};

/// How many leading pages the profile recognizer scans.
const TITLE_PAGE_LIMIT: usize = 5;

/// Fraction of the first page's height considered for layout scoring.
const TOP_REGION_RATIO: f32 = 0.6;

/// Maximum vertical gap between combined title lines, in page units.
const LINE_JOIN_GAP: f32 = 100.0;

/// Minimum combined score for a first-page title candidate (strict).
const FIRST_PAGE_MIN_SCORE: f32 = 3.0;

/// Which strategy produced the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// The profile declares the family has no title
    Suppressed,
    /// Profile title recognizer matched a line
    Profile,
    /// First-page layout scoring
    FirstPage,
    /// Embedded metadata title
    Metadata,
    /// File name stem fallback
    FileName,
}

/// An extracted title plus the page-1 line texts it consumed, so the heading
/// pass can avoid re-emitting the title as a heading.
#[derive(Debug, Clone)]
pub struct ExtractedTitle {
    /// Cleaned title text
    pub text: String,
    /// Strategy that produced it
    pub source: TitleSource,
    /// Exact line texts consumed from the document body
    pub consumed: Vec<String>,
}

/// Extracts the document title.
pub struct TitleExtractor {
    page_limit: usize,
    non_title_patterns: Vec<Regex>,
    filename_artifact: Regex,
    label_prefix: Regex,
    doc_type_keywords: Vec<&'static str>,
}

impl TitleExtractor {
    /// Create an extractor; patterns compile once here.
    pub fn new() -> Self {
        Self::with_page_limit(TITLE_PAGE_LIMIT)
    }

    /// Create an extractor scanning the first `page_limit` pages with the
    /// profile recognizer.
    pub fn with_page_limit(page_limit: usize) -> Self {
        Self {
            page_limit,
            non_title_patterns: vec![
                Regex::new(r"(?i)^(abstract|introduction|contents|table\s+of\s+contents|acknowledgments|acknowledgements|preface|foreword|index|references|bibliography)$").unwrap(),
                Regex::new(r"(?i)^(chapter|section|part|appendix)\s+\d+").unwrap(),
                Regex::new(r"(?i)^page\s+\d+").unwrap(),
                Regex::new(r"(?i)^(draft|confidential|internal|preliminary)$").unwrap(),
                Regex::new(r"^\d+$").unwrap(),
                Regex::new(r"(?i)^copyright|^©").unwrap(),
                Regex::new(r"(?i)^https?://|^www\.").unwrap(),
                Regex::new(r"^\w+\s+\d{1,2},?\s+\d{4}$").unwrap(),
                Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").unwrap(),
            ],
            filename_artifact: Regex::new(r"(?i)\.(docx?|pdf|txt|rtf)\b|microsoft\s+word").unwrap(),
            label_prefix: Regex::new(r"(?i)^(title|subject|document|file):\s*").unwrap(),
            doc_type_keywords: vec![
                "report", "proposal", "plan", "overview", "guide", "manual",
                "handbook", "specification", "rfp", "request for proposal",
                "syllabus", "curriculum", "agreement", "application form",
                "pathways", "foundation level", "extension",
            ],
        }
    }

    /// Extract the title for a document under the given profile.
    pub fn extract(&self, doc: &LayoutDocument, profile: &DocumentProfile) -> ExtractedTitle {
        if profile.title_policy == TitlePolicy::Empty {
            return ExtractedTitle {
                text: String::new(),
                source: TitleSource::Suppressed,
                consumed: Vec::new(),
            };
        }
        if let Some(found) = self.from_profile_recognizer(doc, profile) {
            log::debug!("title via profile recognizer: {:?}", found.text);
            return found;
        }
        if let Some(found) = self.from_first_page(doc) {
            log::debug!("title via first-page layout: {:?}", found.text);
            return found;
        }
        if let Some(found) = self.from_metadata(doc) {
            log::debug!("title via metadata: {:?}", found.text);
            return found;
        }
        self.from_file_name(doc)
    }

    /// Scan the first pages for a line matching the profile's title
    /// recognizer rule. Requires heading-like styling so body text quoting
    /// the title does not win.
    fn from_profile_recognizer(
        &self,
        doc: &LayoutDocument,
        profile: &DocumentProfile,
    ) -> Option<ExtractedTitle> {
        for page in doc.pages.iter().take(self.page_limit) {
            for line in page.lines_by_position() {
                let text = line.text();
                if text.is_empty() {
                    continue;
                }
                if profile.rules.matches_title(&text)
                    && line.font_size() >= 14.0
                    && line.is_bold()
                {
                    return Some(ExtractedTitle {
                        text: self.clean(&text),
                        source: TitleSource::Profile,
                        consumed: vec![text],
                    });
                }
            }
        }
        None
    }

    /// Score blocks of one to three adjacent lines in the upper region of
    /// page 1 and take the best-scoring block. Multi-line blocks are scored
    /// in their own right, so a wrapped title wins even when its individual
    /// lines would not.
    fn from_first_page(&self, doc: &LayoutDocument) -> Option<ExtractedTitle> {
        let page = doc.pages.first()?;
        let cutoff = page.height * TOP_REGION_RATIO;
        let lines: Vec<&Line> = page
            .lines_by_position()
            .into_iter()
            .filter(|l| l.y() <= cutoff && !l.text().is_empty())
            .collect();

        let mut best: Option<(usize, usize, f32)> = None;
        for start in 0..lines.len() {
            let anchor = lines[start];
            let mut prev = anchor;
            for (count, &line) in lines[start..].iter().take(3).enumerate() {
                if count > 0 {
                    // Continuation lines must sit close and keep comparable size.
                    if line.y() - prev.y() > LINE_JOIN_GAP
                        || line.font_size() < anchor.font_size() * 0.8
                        || self.is_non_title(&line.text())
                    {
                        break;
                    }
                    prev = line;
                }
                let block = &lines[start..=start + count];
                let score = self.score_title_block(block, page.height);
                if score > FIRST_PAGE_MIN_SCORE
                    && best.map(|(_, _, s)| score >= s).unwrap_or(true)
                {
                    best = Some((start, count + 1, score));
                }
            }
        }
        let (start, len, _) = best?;

        let consumed: Vec<String> = lines[start..start + len].iter().map(|l| l.text()).collect();
        Some(ExtractedTitle {
            text: self.clean(&consumed.join(" ")),
            source: TitleSource::FirstPage,
            consumed,
        })
    }

    fn from_metadata(&self, doc: &LayoutDocument) -> Option<ExtractedTitle> {
        let raw = doc.metadata_title.as_deref()?.trim();
        if raw.len() <= 3 || self.is_non_title(raw) || self.filename_artifact.is_match(raw) {
            return None;
        }
        let lower = raw.to_lowercase();
        if ["untitled", "document", "file"].iter().any(|p| lower.starts_with(p)) {
            return None;
        }
        Some(ExtractedTitle {
            text: self.clean(raw),
            source: TitleSource::Metadata,
            consumed: Vec::new(),
        })
    }

    fn from_file_name(&self, doc: &LayoutDocument) -> ExtractedTitle {
        let stem = doc.file_stem();
        let spaced: String = stem
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        let text = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
        ExtractedTitle {
            text,
            source: TitleSource::FileName,
            consumed: Vec::new(),
        }
    }

    /// Composite score of a block of one to three lines as a title candidate.
    fn score_title_block(&self, lines: &[&Line], page_height: f32) -> f32 {
        let first = lines[0];
        let text = lines.iter().map(|l| l.text()).collect::<Vec<_>>().join(" ");
        if text.len() < 5 || self.is_non_title(&text) {
            return 0.0;
        }

        let mut score = 0.0f32;

        // Vertical position, earlier is better
        let relative = first.y() / page_height;
        score += match relative {
            r if r < 0.15 => 6.0,
            r if r < 0.25 => 4.0,
            r if r < 0.40 => 2.0,
            r if r < 0.60 => 1.0,
            _ => 0.0,
        };

        // Font prominence of the largest line in the block
        let font = lines.iter().map(|l| l.font_size()).fold(0.0f32, f32::max);
        score += match font {
            s if s > 20.0 => 6.0,
            s if s > 18.0 => 5.0,
            s if s > 16.0 => 4.0,
            s if s > 14.0 => 3.0,
            s if s > 12.0 => 2.0,
            s if s > 10.0 => 1.0,
            _ => 0.0,
        };

        if lines.iter().any(|l| l.is_bold()) {
            score += 3.0;
        }

        score += match text.len() {
            15..=150 => 3.0,
            10..=200 => 2.0,
            5..=300 => 1.0,
            _ => -3.0,
        };

        if self.looks_like_document_title(&text) {
            score += 4.0;
        }

        score
    }

    fn is_non_title(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty() || self.non_title_patterns.iter().any(|p| p.is_match(trimmed))
    }

    /// Whether the text reads like a document title: either a document-type
    /// keyword or predominantly title-case words.
    fn looks_like_document_title(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if self.doc_type_keywords.iter().any(|k| lower.contains(k)) {
            return true;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 2 {
            return false;
        }
        let conforming = words
            .iter()
            .filter(|w| {
                w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
                    || TITLE_SMALL_WORDS.contains(&w.to_lowercase().as_str())
            })
            .count();
        conforming as f32 >= words.len() as f32 * 0.7
    }

    /// Normalize to NFKC, collapse whitespace, strip label prefixes and
    /// trailing punctuation.
    fn clean(&self, raw: &str) -> String {
        let normalized: String = raw.nfkc().collect();
        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        let unlabeled = self.label_prefix.replace(&collapsed, "");
        unlabeled.trim_end_matches(['.', ',', ':', ';']).trim().to_string()
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

const TITLE_SMALL_WORDS: [&str; 16] = [
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "of", "on", "or", "the", "to",
    "up",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::profile::ProfileRegistry;
    use crate::model::{BBox, Page, StyledSpan};

    fn line_at(text: &str, y: f32, size: f32, bold: bool) -> Line {
        let width = text.len() as f32 * size * 0.5;
        let mut span = StyledSpan::new(text, BBox::new(72.0, y, 72.0 + width, y + size), size);
        span.bold = bold;
        Line::from_spans(vec![span])
    }

    fn doc_with_first_page(lines: Vec<Line>) -> LayoutDocument {
        let mut doc = LayoutDocument::new("input.pdf");
        let mut page = Page::new(1, 612.0, 792.0);
        page.lines = lines;
        doc.pages.push(page);
        doc
    }

    fn profile_for(doc: &LayoutDocument) -> &'static crate::analyzer::profile::DocumentProfile {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ProfileRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ProfileRegistry::builtin).select(doc)
    }

    #[test]
    fn test_prominent_first_page_line_wins() {
        let doc = doc_with_first_page(vec![
            line_at("Annual Operations Report", 60.0, 24.0, true),
            line_at("Some introductory paragraph text that is small.", 300.0, 11.0, false),
        ]);
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.text, "Annual Operations Report");
        assert_eq!(title.source, TitleSource::FirstPage);
        assert_eq!(title.consumed, vec!["Annual Operations Report".to_string()]);
    }

    #[test]
    fn test_adjacent_lines_joined() {
        let doc = doc_with_first_page(vec![
            line_at("RFP: Request for Proposal", 80.0, 22.0, true),
            line_at("To Develop the Business Plan", 120.0, 20.0, true),
            line_at("body text far below in small print here", 600.0, 10.0, false),
        ]);
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(
            title.text,
            "RFP: Request for Proposal To Develop the Business Plan"
        );
        assert_eq!(title.consumed.len(), 2);
    }

    #[test]
    fn test_metadata_used_when_page_has_no_candidate() {
        let mut doc = doc_with_first_page(vec![line_at(
            "plain small line",
            700.0,
            9.0,
            false,
        )]);
        doc.metadata_title = Some("Strategic Plan 2025".to_string());
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.text, "Strategic Plan 2025");
        assert_eq!(title.source, TitleSource::Metadata);
    }

    #[test]
    fn test_filename_artifact_metadata_rejected() {
        let mut doc = LayoutDocument::new("project_status_update.pdf");
        doc.metadata_title = Some("Microsoft Word - draft3.doc".to_string());
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.source, TitleSource::FileName);
        assert_eq!(title.text, "project status update");
    }

    #[test]
    fn test_empty_document_falls_back_to_stem() {
        let doc = LayoutDocument::new("meeting-notes.pdf");
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.text, "meeting notes");
        assert_eq!(title.source, TitleSource::FileName);
        assert!(title.consumed.is_empty());
    }

    #[test]
    fn test_profile_recognizer_beats_layout() {
        let mut doc = doc_with_first_page(vec![
            line_at("Some Prominent Banner", 60.0, 24.0, true),
        ]);
        doc.file_name = "best-of-collection.pdf".to_string();
        let mut page2 = Page::new(2, 612.0, 792.0);
        page2
            .lines
            .push(line_at("The Best of Short Fiction", 100.0, 18.0, true));
        doc.pages.push(page2);
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.source, TitleSource::Profile);
        assert_eq!(title.text, "The Best of Short Fiction");
    }

    #[test]
    fn test_profile_recognizer_requires_bold_styling() {
        let mut doc = LayoutDocument::new("best-of-collection.pdf");
        doc.pages.push(Page::new(1, 612.0, 792.0));
        let mut page2 = Page::new(2, 612.0, 792.0);
        page2
            .lines
            .push(line_at("The Best of Short Fiction", 100.0, 18.0, false));
        doc.pages.push(page2);
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        // A large but non-bold recognizer match is body text quoting the
        // title, not the title itself.
        assert_eq!(title.source, TitleSource::FileName);
        assert_eq!(title.text, "best of collection");
    }

    #[test]
    fn test_wrapped_title_scored_as_block() {
        // Each line alone scores at the acceptance bar; only the two-line
        // block clears it.
        let doc = doc_with_first_page(vec![
            line_at("Granite", 320.0, 11.0, false),
            line_at("Kitchen", 340.0, 11.0, false),
        ]);
        let extractor = TitleExtractor::new();
        let title = extractor.extract(&doc, profile_for(&doc));
        assert_eq!(title.source, TitleSource::FirstPage);
        assert_eq!(title.text, "Granite Kitchen");
        assert_eq!(title.consumed.len(), 2);
    }

    #[test]
    fn test_clean_strips_labels_and_punctuation() {
        let extractor = TitleExtractor::new();
        assert_eq!(
            extractor.clean("Title:   Annual   Report.,"),
            "Annual Report"
        );
    }

    #[test]
    fn test_section_words_not_titles() {
        let extractor = TitleExtractor::new();
        assert!(extractor.is_non_title("Table of Contents"));
        assert!(extractor.is_non_title("Introduction"));
        assert!(extractor.is_non_title("Page 3"));
        assert!(!extractor.is_non_title("South of France Travel Guide"));
    }
}
