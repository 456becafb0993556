//! Heading candidate scoring.
//!
//! Each text line gets a composite heuristic score from font size, weight,
//! position, length, punctuation shape and pattern matches. Exclusion
//! filters short-circuit to zero before any positive scoring. Acceptance is
//! a strict `score > threshold` comparison; the rule table may lower the
//! threshold for named structural shapes.

use regex::Regex;
use std::collections::HashSet;

use crate::model::Line;

use super::rules::RuleSet;

/// Default acceptance threshold for heading candidates.
pub const DEFAULT_THRESHOLD: f32 = 4.0;

/// Scores text lines as potential headings.
pub struct CandidateScorer {
    exclusion_patterns: Vec<Regex>,
    stop_words: HashSet<&'static str>,
    strict_non_headings: HashSet<&'static str>,
    metadata_labels: HashSet<&'static str>,
    boilerplate_patterns: Vec<Regex>,
    code_patterns: Vec<Regex>,
    code_indicators: Vec<&'static str>,
    credit_patterns: Vec<Regex>,
    date_patterns: Vec<Regex>,
    org_patterns: Vec<Regex>,
    identifier_patterns: Vec<Regex>,
    heading_shapes: Vec<Regex>,
    heading_indicator: Regex,
    academic_patterns: Vec<Regex>,
    numbered_top: Regex,
    numbered_sub: Regex,
    long_allow: Regex,
    dangling_end: Regex,
    numbered_dangling: Regex,
    caps_stub: Regex,
    name_period: Regex,
    sentence_boundary: Regex,
    colon_label: Regex,
    paren_list: Regex,
}

impl CandidateScorer {
    /// Create a scorer; all patterns compile once here.
    pub fn new() -> Self {
        Self {
            exclusion_patterns: vec![
                Regex::new(r"(?i)^https?://").unwrap(),
                Regex::new(r"(?i)^www\.").unwrap(),
                Regex::new(r"(?i)\.(com|org|net|git)$").unwrap(),
                Regex::new(r"^\([^)]*\)$").unwrap(),
                Regex::new(r"^\[[^\]]*\]$").unwrap(),
                Regex::new(r"^[A-Z]{1,3}$").unwrap(),
                Regex::new(r"^\d+$").unwrap(),
                Regex::new(r"^[^\w\s]+$").unwrap(),
            ],
            stop_words: [
                "constraint", "requirement", "pdf", "max", "points", "criteria",
                "description", "total", "allowed", "bonus", "input", "output",
                "sample", "test", "case", "analysis", "content", "research",
                "business", "educational", "academic", "dataset", "users",
                "source", "link", "summary", "category", "type", "context",
                "metrics", "features", "model", "tool", "precision", "recall",
                "accuracy", "instances", "insights", "findings",
                "considerations", "patterns", "frequency", "usage", "feature",
                "solution", "system", "method", "approach", "technique",
            ]
            .into_iter()
            .collect(),
            strict_non_headings: [
                "max", "min", "total", "sum", "avg", "count", "id", "no",
                "link", "source", "page", "figure", "table", "chart",
            ]
            .into_iter()
            .collect(),
            metadata_labels: [
                "author", "authors", "editor", "editors", "publisher",
                "published", "copyright", "isbn", "issn", "doi", "version",
                "revision", "draft", "confidential", "proprietary", "internal",
                "preliminary", "final", "approved", "reviewed", "edited",
                "compiled", "translated",
            ]
            .into_iter()
            .collect(),
            boilerplate_patterns: vec![
                Regex::new(r"(?i)^\d+\.\s*$").unwrap(),
                Regex::new(r"(?i)^page\s+\d+").unwrap(),
                Regex::new(r"(?i)copyright|©|\(c\)").unwrap(),
                Regex::new(r"(?i)microsoft\s+word|\.doc$|\.pdf$").unwrap(),
                Regex::new(r"(?i)^date:|^time:|^author:|^version:").unwrap(),
                Regex::new(r"(?i)^signature\s+of").unwrap(),
                Regex::new(r"(?i)^(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}$").unwrap(),
            ],
            code_patterns: vec![
                Regex::new(r"^\s*<[^>]+>\s*$").unwrap(),
                Regex::new(r"^\s*\{[^}]*\}\s*$").unwrap(),
                Regex::new(r"^\s*function\s*\([^)]*\)").unwrap(),
                Regex::new(r"^\s*(var|let|const)\s+\w+\s*=").unwrap(),
                Regex::new(r"^\s*(if|for|while)\s*\(").unwrap(),
                Regex::new(r"^\s*//").unwrap(),
                Regex::new(r"^\s*/\*.*\*/\s*$").unwrap(),
                Regex::new(r"^\s*return\s+").unwrap(),
                Regex::new(r"^\s*\w+\s*:\s*\w+\s*,?\s*$").unwrap(),
            ],
            code_indicators: vec![
                "output:", "result:", "example output:", "error:", "warning:",
                "note:", "tip:", "see also:", "reference:", "listing",
                "code block",
            ],
            credit_patterns: vec![
                Regex::new(r"(?i)^(copy-edited|edited|reviewed|written|authored|compiled|translated|illustrated)\s+by\s+").unwrap(),
                Regex::new(r"(?i)^(cover\s+design|layout|design|photography)\s+by\s+").unwrap(),
                Regex::new(r"(?i)^isbn\s*#?\s*[\d-]+").unwrap(),
                Regex::new(r"(?i)^v?\d+\.\d+(\.\d+)?\s*$").unwrap(),
                Regex::new(r"(?i)^version\s+\d+\.\d+").unwrap(),
                Regex::new(r"(?i)^©\s*\d{4}").unwrap(),
                Regex::new(r"(?i)^published\s+(by|in)").unwrap(),
                Regex::new(r"(?i)^first\s+published").unwrap(),
                Regex::new(r"(?i)^revised\s+edition").unwrap(),
                Regex::new(r"(?i)^all\s+rights\s+reserved").unwrap(),
                Regex::new(r"(?i)^\w+\s+(press|publishing|publications|books)\b").unwrap(),
            ],
            date_patterns: vec![
                Regex::new(r"^\w+\s+\d{1,2},?\s+\d{4}$").unwrap(),
                Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(),
                Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
            ],
            org_patterns: vec![
                Regex::new(r"^[A-Z][a-z]+\s+(University|College|Institute|Corporation|Company|Inc\.|LLC|Ltd\.)$").unwrap(),
                Regex::new(r"^(Department|School|Faculty|Office|Division)\s+of\s+[A-Z]").unwrap(),
            ],
            identifier_patterns: vec![
                Regex::new(r"(?i)^ISBN\s*#?\s*[\d\-X]+$").unwrap(),
                Regex::new(r"(?i)^DOI\s*:?\s*10\.\d+/").unwrap(),
                Regex::new(r"^[A-Z]{2,}-\d+$").unwrap(),
            ],
            heading_shapes: vec![
                Regex::new(r"^\d+\.?\s+").unwrap(),
                Regex::new(r"^[A-Z][A-Z\s]{2,}$").unwrap(),
                Regex::new(r"^\d+\.\d+\.?\s+").unwrap(),
                Regex::new(r"^\d+\.\d+\.\d+\.?\s+").unwrap(),
            ],
            heading_indicator: Regex::new(
                r"(?i)^(Chapter|Section|Part|Round|Phase|Step|Appendix|Introduction|Overview|Summary|Conclusion|Background|Methodology|Results|Discussion|Challenge|Theme|Brief|Specification|Welcome|Why|What|How|Scoring|Submission|Deliverables|Features|Requirements|Implementation|System|Architecture|Design|Framework|Analysis|Evaluation|Performance|Security|Data|Database|Model|Algorithm|User|Interface|Technical|Functional|Abstract|Keywords|References|Bibliography|Acknowledgments|Acknowledgements|Future|Limitations|Constraints|Related|Previous|Prior|Existing)\b",
            )
            .unwrap(),
            academic_patterns: vec![
                Regex::new(r"^\d+\.?\s+[A-Z]").unwrap(),
                Regex::new(r"^[A-Z]+\s*:").unwrap(),
                Regex::new(r"^[IVX]+\.\s+[A-Z]").unwrap(),
                Regex::new(r"^\d+\.\d+\s+[A-Z]").unwrap(),
                Regex::new(r"(?i)^(ABSTRACT|INTRODUCTION|METHODOLOGY|RESULTS|DISCUSSION|CONCLUSION|REFERENCES|BIBLIOGRAPHY|ACKNOWLEDGMENTS|APPENDIX)\b").unwrap(),
            ],
            numbered_top: Regex::new(r"^\d+\.\s+[A-Z]").unwrap(),
            numbered_sub: Regex::new(r"^\d+\.\d+\s+[A-Z]").unwrap(),
            long_allow: Regex::new(r"(?i)^\d+\.\s+(Introduction|Overview|References)").unwrap(),
            dangling_end: Regex::new(r"(?i)\b(and|or|of|in|on|at|to|for|with|by)$").unwrap(),
            numbered_dangling: Regex::new(r"(?i)\b(and|the|or|would|have|more)$").unwrap(),
            caps_stub: Regex::new(r"^[A-Z]+:\s*[A-Z]?\s*$|^[A-Z][a-z]+\s+[a-z]?\s*$").unwrap(),
            name_period: Regex::new(r"^[A-Z][a-z]+(\s+[A-Z][a-z]*)*\.\s*$").unwrap(),
            sentence_boundary: Regex::new(r"\.\s+[A-Z]").unwrap(),
            colon_label: Regex::new(r"^\w+\s*:\s*$").unwrap(),
            paren_list: Regex::new(r"^\d+\)\s+|^\(\d+\)\s+").unwrap(),
        }
    }

    /// Acceptance threshold for this text under the given rule table.
    pub fn threshold(&self, text: &str, rules: &RuleSet, default: f32) -> f32 {
        rules.threshold_override(text).unwrap_or(default)
    }

    /// Unmistakable heading shapes that survive table-region suppression:
    /// numbered sections and rule-table structural phrases.
    pub fn is_obvious_heading(&self, text: &str, rules: &RuleSet) -> bool {
        self.numbered_top.is_match(text)
            || self.numbered_sub.is_match(text)
            || rules.is_structural(text)
    }

    /// Score a line as a potential heading. Zero means "not a heading".
    pub fn score(&self, line: &Line, rules: &RuleSet) -> f32 {
        let text = line.text();
        let text = text.trim();
        if text.len() < 3 || line.spans.is_empty() {
            return 0.0;
        }

        // Must-keep shapes bypass the generic exclusion families.
        let protected = rules.is_protected(text);

        if !protected && self.exclusion_patterns.iter().any(|p| p.is_match(text)) {
            return 0.0;
        }

        if is_bracketed(text) {
            return 0.0;
        }

        let lower = text.to_lowercase();
        if self.strict_non_headings.contains(lower.as_str()) {
            return 0.0;
        }
        if !protected && self.stop_words.contains(lower.as_str()) {
            return 0.0;
        }

        if self.is_boilerplate(text, &lower)
            || self.is_code_snippet(text, &lower)
            || self.is_credit_or_metadata(text, &lower)
            || self.is_universal_metadata(text, &lower)
        {
            return 0.0;
        }

        if text.len() > 80 && !protected && !self.long_allow.is_match(text) {
            return 0.0;
        }

        if self.dangling_end.is_match(text) {
            return 0.0;
        }
        if self.is_fragment(text) {
            return 0.0;
        }
        if text.len() < 5 && !protected && !self.heading_shapes[0].is_match(text) {
            return 0.0;
        }

        let mut score = 0.0f32;
        let primary = &line.spans[0];
        let font_size = primary.font_size;

        // Font size tiers
        score += match font_size {
            s if s > 20.0 => 5.0,
            s if s > 18.0 => 4.0,
            s if s > 16.0 => 3.0,
            s if s > 14.0 => 2.0,
            s if s > 12.0 => 1.0,
            s if s > 10.0 => 0.5,
            _ => 0.0,
        };

        if rules.is_structural(text) {
            score += 4.0;
        }

        if self.numbered_top.is_match(text) {
            score += 3.0;
        } else if self.numbered_sub.is_match(text) {
            score += 2.0;
        }

        score += self.formatting_score(line, text);

        if self.heading_shapes.iter().any(|p| p.is_match(text)) {
            score += 3.0;
        }

        // Left margin position
        if primary.x() < 100.0 {
            score += 1.0;
        }

        // Length preference
        let len = text.len();
        if (10..=80).contains(&len) {
            score += 2.0;
        } else if len <= 120 {
            score += 1.0;
        } else {
            score -= 2.0;
        }

        if is_all_caps(text) && len > 8 && text.split_whitespace().count() > 1 {
            score += 1.0;
        }

        if len > 150 {
            score -= 3.0;
        }
        if self.sentence_boundary.is_match(text) {
            score -= 2.0;
        }
        if (text.ends_with(',') || text.ends_with(';') || text.ends_with('-'))
            && !text.ends_with('—')
        {
            score -= 2.0;
        }

        if self.looks_like_proper_heading(text) {
            score += 2.0;
        }
        if self.academic_patterns.iter().any(|p| p.is_match(text)) {
            score += 1.5;
        }
        if self.is_standalone_heading_line(text) {
            score += 1.0;
        }

        score.max(0.0)
    }

    fn formatting_score(&self, line: &Line, text: &str) -> f32 {
        let mut score = 0.0;
        let multi_word = text.split_whitespace().count() > 1;

        if line.is_bold() {
            score += if multi_word { 3.0 } else { 1.0 };
        }

        let font_name = line
            .spans
            .first()
            .map(|s| s.font_name.to_lowercase())
            .unwrap_or_default();
        if ["bold", "heavy", "black", "extra"]
            .iter()
            .any(|w| font_name.contains(w))
        {
            score += 2.0;
        }
        if ["times", "serif", "georgia"].iter().any(|w| font_name.contains(w)) {
            score += 0.5;
        } else if ["arial", "helvetica", "sans"].iter().any(|w| font_name.contains(w)) {
            score += 1.0;
        }

        if is_all_caps(text) && text.len() > 3 {
            score += 1.0;
        }

        score
    }

    fn is_boilerplate(&self, text: &str, lower: &str) -> bool {
        if text.len() > 300 {
            return true;
        }
        self.boilerplate_patterns.iter().any(|p| p.is_match(lower))
    }

    fn is_code_snippet(&self, text: &str, lower: &str) -> bool {
        if self.code_patterns.iter().any(|p| p.is_match(text)) {
            return true;
        }
        if self.code_indicators.iter().any(|k| lower.contains(k)) {
            return true;
        }
        // Bare "word:" labels and "(1)"-style list markers
        if self.colon_label.is_match(text) && text.len() < 20 {
            return true;
        }
        self.paren_list.is_match(text)
    }

    fn is_credit_or_metadata(&self, text: &str, lower: &str) -> bool {
        // "Firstname Lastname." byline shape
        if self.name_period.is_match(text) {
            let words = text.trim_end_matches('.').split_whitespace().count();
            if (1..=4).contains(&words) {
                return true;
            }
        }
        if self.credit_patterns.iter().any(|p| p.is_match(lower)) {
            return true;
        }
        self.date_patterns.iter().any(|p| p.is_match(text))
    }

    fn is_universal_metadata(&self, text: &str, lower: &str) -> bool {
        if self.metadata_labels.contains(lower) {
            return true;
        }
        if text.ends_with("...") || text.ends_with('—') || text.ends_with('–') {
            return true;
        }
        if self.org_patterns.iter().any(|p| p.is_match(text)) {
            return true;
        }
        self.identifier_patterns.iter().any(|p| p.is_match(text))
    }

    /// Incomplete-fragment shapes that never make headings.
    fn is_fragment(&self, text: &str) -> bool {
        // Numbered sections and document-structure labels are not fragments.
        if self.numbered_top.is_match(text) && !self.numbered_dangling.is_match(text) {
            return false;
        }
        if self.numbered_sub.is_match(text) {
            return false;
        }

        // Lowercase start, unless numbered
        if text
            .chars()
            .next()
            .map(|c| c.is_lowercase())
            .unwrap_or(false)
            && !text.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            return true;
        }

        // Long text containing a bare conjunction reads like a sentence
        if text.len() > 50
            && !text.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            let has_conjunction = text
                .split_whitespace()
                .any(|w| matches!(w.to_lowercase().as_str(), "and" | "or" | "but"));
            if has_conjunction {
                return true;
            }
        }

        // Trailing comma/semicolon/dash
        if text.ends_with(',') || text.ends_with(';') || text.ends_with('—') || text.ends_with('-')
        {
            return true;
        }

        // Numbered line ending in a continuation word
        if self.heading_shapes[0].is_match(text) && self.numbered_dangling.is_match(text) {
            return true;
        }

        // "RFP: R" / "Request f" style stubs
        if self.caps_stub.is_match(text) {
            return true;
        }

        // Very short text ending mid-word
        if text.len() < 15 {
            let mut chars = text.chars().rev();
            if let (Some(last), Some(prev)) = (chars.next(), chars.next()) {
                if last.is_lowercase() && prev == ' ' {
                    return true;
                }
            }
        }

        false
    }

    fn looks_like_proper_heading(&self, text: &str) -> bool {
        if !text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            return false;
        }
        if self.heading_indicator.is_match(text) {
            return true;
        }
        if self.numbered_top.is_match(text) {
            return true;
        }
        // General title-case multi-word shape
        if !is_bracketed(text) {
            let words: Vec<&str> = text.split_whitespace().collect();
            if (2..=10).contains(&words.len()) {
                let conforming = words
                    .iter()
                    .filter(|w| {
                        w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
                            || SMALL_WORDS.contains(&w.to_lowercase().as_str())
                    })
                    .count();
                if conforming as f32 >= words.len() as f32 * 0.7 {
                    return true;
                }
            }
        }
        false
    }

    fn is_standalone_heading_line(&self, text: &str) -> bool {
        let words = text.split_whitespace().count();
        if words <= 6 && text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            let abbreviation_end = ["Inc.", "Ltd.", "Corp.", "Co."]
                .iter()
                .any(|a| text.ends_with(a));
            if !text.ends_with('.') || abbreviation_end {
                return true;
            }
        }
        is_all_caps(text) && (3..=50).contains(&text.len()) && words <= 5
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase "small words" exempt from title-case capitalization.
const SMALL_WORDS: [&str; 16] = [
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "of", "on", "or", "the", "to",
    "up",
];

fn is_bracketed(text: &str) -> bool {
    (text.starts_with('(') && text.ends_with(')'))
        || (text.starts_with('[') && text.ends_with(']'))
}

fn is_all_caps(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::profile::ProfileRegistry;
    use crate::model::{BBox, LayoutDocument, StyledSpan};

    fn make_line(text: &str, x: f32, y: f32, size: f32, bold: bool) -> Line {
        let width = text.len() as f32 * size * 0.5;
        let mut span = StyledSpan::new(text, BBox::new(x, y, x + width, y + size), size);
        span.bold = bold;
        Line::from_spans(vec![span])
    }

    fn generic_rules() -> &'static RuleSet {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ProfileRegistry> = OnceLock::new();
        let registry = REGISTRY.get_or_init(ProfileRegistry::builtin);
        let doc = LayoutDocument::new("doc.pdf");
        &registry.select(&doc).rules
    }

    #[test]
    fn test_numbered_bold_heading_scores_high() {
        let scorer = CandidateScorer::new();
        let line = make_line("1. Introduction", 50.0, 50.0, 18.0, true);
        let score = scorer.score(&line, generic_rules());
        assert!(score > DEFAULT_THRESHOLD, "score was {}", score);
    }

    #[test]
    fn test_url_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("https://example.com/path", 50.0, 50.0, 18.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_copyright_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("Copyright © 2024 Acme Corp", 50.0, 50.0, 20.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_strict_non_heading_rejected_even_bold() {
        let scorer = CandidateScorer::new();
        let line = make_line("Total", 50.0, 50.0, 16.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_dangling_preposition_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("The quick brown fox jumps of", 50.0, 50.0, 16.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_lowercase_start_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("continued from previous section", 50.0, 50.0, 14.0, false);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_long_body_text_rejected() {
        let scorer = CandidateScorer::new();
        let long = "This is a very long sentence that clearly belongs to body text because it runs on and on";
        let line = make_line(long, 50.0, 50.0, 12.0, false);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_long_numbered_introduction_allowed() {
        let scorer = CandidateScorer::new();
        let text = "1. Introduction to the Complete Handbook of Structural Analysis for Practicing Engineers";
        let line = make_line(text, 50.0, 50.0, 16.0, true);
        assert!(scorer.score(&line, generic_rules()) > 0.0);
    }

    #[test]
    fn test_background_gets_low_threshold() {
        let scorer = CandidateScorer::new();
        let rules = generic_rules();
        let line = make_line("Background", 50.0, 400.0, 10.0, false);
        let score = scorer.score(&line, rules);
        let threshold = scorer.threshold("Background", rules, DEFAULT_THRESHOLD);
        assert_eq!(threshold, 0.1);
        assert!(
            score > threshold,
            "small-font Background must pass its lowered threshold (score {})",
            score
        );
        assert_eq!(
            scorer.threshold("Plain body words", rules, DEFAULT_THRESHOLD),
            DEFAULT_THRESHOLD
        );
    }

    #[test]
    fn test_structural_bonus_applied() {
        let scorer = CandidateScorer::new();
        let rules = generic_rules();
        let structural = make_line("2.1 Intended Audience", 50.0, 50.0, 12.0, false);
        let plain = make_line("Some Ordinary Words", 50.0, 50.0, 12.0, false);
        assert!(scorer.score(&structural, rules) > scorer.score(&plain, rules));
    }

    #[test]
    fn test_author_credit_rejected() {
        let scorer = CandidateScorer::new();
        for text in ["Jane Smith.", "Edited by John Doe", "ISBN 978-0-13-468599-1"] {
            let line = make_line(text, 50.0, 50.0, 14.0, true);
            assert_eq!(scorer.score(&line, generic_rules()), 0.0, "{}", text);
        }
    }

    #[test]
    fn test_code_snippet_rejected() {
        let scorer = CandidateScorer::new();
        for text in ["<div class=\"x\">", "var count = 0;", "return result"] {
            let line = make_line(text, 50.0, 50.0, 12.0, false);
            assert_eq!(scorer.score(&line, generic_rules()), 0.0, "{}", text);
        }
    }

    #[test]
    fn test_all_caps_abbreviation_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("API", 50.0, 50.0, 16.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let scorer = CandidateScorer::new();
        let line = make_line("Implementation Details,", 50.0, 50.0, 16.0, true);
        assert_eq!(scorer.score(&line, generic_rules()), 0.0);
    }
}
