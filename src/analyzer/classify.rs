//! Heading level assignment and outline validation.
//!
//! Accepted candidates are ordered by position, assigned H1-H4 levels from
//! pattern overrides and document-relative font tiers, then cleaned up:
//! level jumps deeper than one step are clamped, repeated texts are dropped,
//! and rule-table exclusions are applied as a final pass.

use std::collections::HashSet;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{HeadingCandidate, HeadingLevel, OutlineEntry};

use super::profile::PageNumbering;
use super::rules::RuleSet;

/// Spacing score at which whitespace prominence counts like bold styling
/// in the font-tier fallback.
const SPACING_BOLD_EQUIVALENT: f32 = 3.0;

/// Font size thresholds separating H1/H2/H3 from H4, derived per document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontThresholds {
    /// Minimum size for H1 (with bold or equivalent prominence)
    pub t1: f32,
    /// Minimum size for H2
    pub t2: f32,
    /// Minimum size for H3
    pub t3: f32,
}

impl FontThresholds {
    /// Derive thresholds from the font sizes of the accepted candidates.
    ///
    /// Documents with at most two distinct sizes degenerate first: the
    /// largest becomes the top tier and the rest share the second. Beyond
    /// that, documents spanning the conventional print range (largest >= 16,
    /// smallest <= 12) get absolute tiers; otherwise the top three distinct
    /// sizes become the tiers.
    pub fn from_candidates(candidates: &[HeadingCandidate]) -> Self {
        let mut sizes: Vec<f32> = candidates
            .iter()
            .map(|c| (c.font_size * 10.0).round() / 10.0)
            .collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        sizes.dedup();

        match sizes.as_slice() {
            [] => Self {
                t1: 16.0,
                t2: 14.0,
                t3: 12.0,
            },
            [only] => Self {
                t1: *only,
                t2: *only,
                t3: *only,
            },
            // Two distinct sizes degenerate before any absolute-range logic:
            // the largest is the top tier, everything else shares the second.
            [first, second] => Self {
                t1: *first,
                t2: *second,
                t3: *second,
            },
            [first, .., last] if *first >= 16.0 && *last <= 12.0 => Self {
                t1: first.max(18.0),
                t2: 14.0,
                t3: 12.0,
            },
            [first, second, third, ..] => Self {
                t1: *first,
                t2: *second,
                t3: *third,
            },
        }
    }
}

/// Assigns levels to accepted candidates and emits the validated outline.
pub struct LevelClassifier<'a> {
    rules: &'a RuleSet,
    numbering: PageNumbering,
    numbered_top: Regex,
}

impl<'a> LevelClassifier<'a> {
    /// Create a classifier over the given rule table and numbering policy.
    pub fn new(rules: &'a RuleSet, numbering: PageNumbering) -> Self {
        Self {
            rules,
            numbering,
            numbered_top: Regex::new(r"^\d+\.\s+[A-Z]").unwrap(),
        }
    }

    /// Classify candidates into the final outline.
    pub fn classify(&self, mut candidates: Vec<HeadingCandidate>) -> Vec<OutlineEntry> {
        candidates.sort_by(|a, b| {
            a.page.cmp(&b.page).then(
                a.y_position
                    .partial_cmp(&b.y_position)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        let thresholds = FontThresholds::from_candidates(&candidates);
        log::debug!(
            "font thresholds: t1={} t2={} t3={}",
            thresholds.t1,
            thresholds.t2,
            thresholds.t3
        );

        let mut entries = Vec::with_capacity(candidates.len());
        let mut prev_depth: Option<u8> = None;
        let mut seen: HashSet<String> = HashSet::new();

        for candidate in &candidates {
            let text = candidate.text.trim();
            if text.is_empty() {
                continue;
            }

            let mut level = self.level_for(candidate, text, thresholds);

            // No jumping more than one level deeper than the previous entry
            if let Some(prev) = prev_depth {
                if level.depth() > prev + 1 {
                    level = HeadingLevel::from_depth(prev + 1);
                }
            }

            // First occurrence wins for repeated headings
            let key = text
                .nfkc()
                .collect::<String>()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if !seen.insert(key) {
                continue;
            }

            if self.rules.is_excluded(text) && !self.rules.is_protected(text) {
                log::debug!("excluding heading {:?} by rule", text);
                continue;
            }

            prev_depth = Some(level.depth());
            entries.push(OutlineEntry {
                level,
                text: format!("{} ", text),
                page: self.numbering.remap(candidate.page),
            });
        }

        entries
    }

    /// Level for one candidate: exact-shape profile overrides first, then
    /// top-level numbering, then the general level library, then font tiers.
    fn level_for(
        &self,
        candidate: &HeadingCandidate,
        text: &str,
        thresholds: FontThresholds,
    ) -> HeadingLevel {
        if let Some(level) = self.rules.priority_forced_level(text) {
            return level;
        }
        if self.numbered_top.is_match(text) {
            return HeadingLevel::H1;
        }
        if let Some(level) = self.rules.forced_level(text) {
            return level;
        }

        let size = candidate.font_size;
        let prominent = candidate.bold
            || candidate
                .spacing_score
                .map(|s| s >= SPACING_BOLD_EQUIVALENT)
                .unwrap_or(false);

        if size >= thresholds.t1 && prominent {
            HeadingLevel::H1
        } else if size >= thresholds.t2 || (size >= thresholds.t3 && prominent) {
            HeadingLevel::H2
        } else if size >= thresholds.t3 {
            HeadingLevel::H3
        } else {
            HeadingLevel::H4
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::profile::ProfileRegistry;
    use crate::model::LayoutDocument;

    fn candidate(text: &str, page: u32, y: f32, size: f32, bold: bool) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            page,
            score: 5.0,
            font_size: size,
            bold,
            y_position: y,
            line_height: size,
            spacing_score: None,
        }
    }

    fn generic_rules() -> &'static RuleSet {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ProfileRegistry> = OnceLock::new();
        let registry = REGISTRY.get_or_init(ProfileRegistry::builtin);
        let doc = LayoutDocument::new("doc.pdf");
        &registry.select(&doc).rules
    }

    fn classify(candidates: Vec<HeadingCandidate>) -> Vec<OutlineEntry> {
        LevelClassifier::new(generic_rules(), PageNumbering::OneBased).classify(candidates)
    }

    #[test]
    fn test_absolute_tiers_for_wide_size_range() {
        let t = FontThresholds::from_candidates(&[
            candidate("A Heading Here", 1, 10.0, 20.0, true),
            candidate("B Heading Here", 1, 20.0, 14.0, false),
            candidate("C Heading Here", 1, 30.0, 10.0, false),
        ]);
        assert_eq!(t, FontThresholds { t1: 20.0, t2: 14.0, t3: 12.0 });
    }

    #[test]
    fn test_top_distinct_sizes_for_narrow_range() {
        let t = FontThresholds::from_candidates(&[
            candidate("A Heading Here", 1, 10.0, 15.0, true),
            candidate("B Heading Here", 1, 20.0, 14.0, false),
            candidate("C Heading Here", 1, 30.0, 13.0, false),
        ]);
        assert_eq!(t, FontThresholds { t1: 15.0, t2: 14.0, t3: 13.0 });
    }

    #[test]
    fn test_single_size_degenerates() {
        let t = FontThresholds::from_candidates(&[
            candidate("A Heading Here", 1, 10.0, 14.0, true),
            candidate("B Heading Here", 1, 20.0, 14.0, false),
        ]);
        assert_eq!(t, FontThresholds { t1: 14.0, t2: 14.0, t3: 14.0 });
    }

    #[test]
    fn test_font_tier_fallback_levels() {
        let entries = classify(vec![
            candidate("Big Bold Banner Heading", 1, 10.0, 20.0, true),
            candidate("Medium Weight Heading", 1, 40.0, 14.0, false),
            candidate("Small Plain Heading", 1, 70.0, 12.0, false),
        ]);
        let levels: Vec<HeadingLevel> = entries.iter().map(|e| e.level).collect();
        assert_eq!(
            levels,
            vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
        );
    }

    #[test]
    fn test_numbered_top_level_forced_h1() {
        let entries = classify(vec![candidate("3. Evaluation Criteria", 2, 100.0, 11.0, false)]);
        assert_eq!(entries[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_numbered_sub_section_forced_h2() {
        let entries = classify(vec![candidate("2.1 Intended Audience", 2, 100.0, 11.0, false)]);
        assert_eq!(entries[0].level, HeadingLevel::H2);
    }

    #[test]
    fn test_hierarchy_jump_clamped() {
        let entries = classify(vec![
            candidate("Top Level Banner Heading", 1, 10.0, 20.0, true),
            candidate("Tiny Heading Below", 1, 50.0, 9.0, false),
            candidate("Medium Heading After", 1, 90.0, 14.0, false),
        ]);
        assert_eq!(entries[0].level, HeadingLevel::H1);
        // Font tiers say H4, but H1 -> H4 is a two-step jump
        assert_eq!(entries[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_two_distinct_sizes_share_second_tier() {
        let entries = classify(vec![
            candidate("Big Bold Banner Heading", 1, 10.0, 20.0, true),
            candidate("Small Plain Heading", 1, 50.0, 10.5, false),
        ]);
        assert_eq!(entries[0].level, HeadingLevel::H1);
        // The smaller of two sizes is the shared second tier, not H4
        assert_eq!(entries[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_duplicate_headings_first_wins() {
        let entries = classify(vec![
            candidate("Summary", 1, 10.0, 16.0, true),
            candidate("SUMMARY", 3, 20.0, 16.0, true),
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].page, 1);
    }

    #[test]
    fn test_rule_exclusion_final_pass() {
        let entries = classify(vec![
            candidate("Real Section Heading", 1, 10.0, 16.0, true),
            candidate("97%", 1, 50.0, 16.0, true),
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Real Section Heading ");
    }

    #[test]
    fn test_exactly_one_trailing_space() {
        let entries = classify(vec![candidate("  Overview  ", 1, 10.0, 18.0, true)]);
        assert_eq!(entries[0].text, "Overview ");
    }

    #[test]
    fn test_entries_ordered_by_page_then_position() {
        let entries = classify(vec![
            candidate("Later Heading Text", 2, 10.0, 16.0, true),
            candidate("Lower First Page Heading", 1, 300.0, 16.0, true),
            candidate("Upper First Page Heading", 1, 50.0, 16.0, true),
        ]);
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Upper First Page Heading ",
                "Lower First Page Heading ",
                "Later Heading Text "
            ]
        );
    }

    #[test]
    fn test_zero_based_numbering_remap() {
        let classifier = LevelClassifier::new(generic_rules(), PageNumbering::ZeroBased);
        let entries = classifier.classify(vec![candidate("Party Time Heading", 1, 10.0, 18.0, true)]);
        assert_eq!(entries[0].page, 0);
    }

    #[test]
    fn test_spacing_score_counts_as_prominence() {
        let mut isolated = candidate("Widely Spaced Heading", 1, 10.0, 14.0, false);
        isolated.spacing_score = Some(4.0);
        let crowded = candidate("Crowded Plain Heading", 1, 40.0, 14.0, false);
        let entries = classify(vec![isolated, crowded]);
        // Same font size: the isolated line rates H1, the crowded one H2
        assert_eq!(entries[0].level, HeadingLevel::H1);
        assert_eq!(entries[1].level, HeadingLevel::H2);
    }
}
