//! Document family profiles.
//!
//! Heuristic knowledge that only holds for a particular family of documents
//! (a title recognizer, a display page-numbering convention, extra exclusion
//! rules) is packaged as a profile selected once per document. The generic
//! profile carries the baseline rule table and always matches last.

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::LayoutDocument;

use super::rules::{Rule, RuleSet};

/// How a document family maps physical page indices to emitted page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumbering {
    /// Emit the 1-based physical page number unchanged.
    #[default]
    OneBased,
    /// The document displays 0-based numbers; emit page - 1.
    ZeroBased,
    /// Emit max(1, page - 1).
    OffsetMinusOne,
}

impl PageNumbering {
    /// Remap a 1-based physical page number for output.
    pub fn remap(&self, page: u32) -> u32 {
        match self {
            PageNumbering::OneBased => page,
            PageNumbering::ZeroBased => page.saturating_sub(1),
            PageNumbering::OffsetMinusOne => page.saturating_sub(1).max(1),
        }
    }
}

/// Whether a document family carries a title at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePolicy {
    /// Run the full title strategy chain.
    #[default]
    Standard,
    /// The family has no meaningful title; emit an empty string.
    Empty,
}

#[derive(Debug, Deserialize)]
struct ProfileSpec {
    name: String,
    #[serde(default)]
    file_name_pattern: Option<String>,
    #[serde(default)]
    page_numbering: PageNumbering,
    #[serde(default)]
    title_policy: TitlePolicy,
    #[serde(default)]
    toc_page: Option<u32>,
    #[serde(default)]
    rules: Vec<Rule>,
}

/// A selected document family profile.
pub struct DocumentProfile {
    /// Profile name (for logging and `info` output)
    pub name: String,
    matcher: Option<Regex>,
    /// Page numbering convention for emitted entries
    pub page_numbering: PageNumbering,
    /// Whether to extract a title for this family
    pub title_policy: TitlePolicy,
    /// Page whose body lines are table-of-contents entries, if known
    pub toc_page: Option<u32>,
    /// Combined rule table (baseline + family entries)
    pub rules: RuleSet,
}

impl DocumentProfile {
    /// Whether this profile applies to the given document.
    pub fn matches(&self, doc: &LayoutDocument) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(&doc.file_name),
            None => true,
        }
    }
}

/// Ordered profile list; the first matching profile wins.
pub struct ProfileRegistry {
    profiles: Vec<DocumentProfile>,
}

impl ProfileRegistry {
    /// Load the built-in profiles shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded resource is validated by tests; a failure here is a
        // packaging defect, not a runtime condition.
        Self::from_json(include_str!("builtin_profiles.json"))
            .expect("built-in profile table must compile")
    }

    /// Load profiles from their JSON form.
    ///
    /// The last profile is the generic baseline; its rule table is merged
    /// into every family profile so family entries only add knowledge.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<ProfileSpec> =
            serde_json::from_str(json).map_err(|e| Error::InvalidRules(e.to_string()))?;
        if specs.is_empty() {
            return Err(Error::InvalidRules("profile table is empty".to_string()));
        }

        let base_rules = RuleSet::compile(&specs.last().unwrap().rules)?;

        let mut profiles = Vec::with_capacity(specs.len());
        let last = specs.len() - 1;
        for (i, spec) in specs.into_iter().enumerate() {
            let matcher = match &spec.file_name_pattern {
                Some(p) => Some(Regex::new(p).map_err(|e| {
                    Error::InvalidRules(format!("profile {:?} matcher: {}", spec.name, e))
                })?),
                None => None,
            };
            let own = RuleSet::compile(&spec.rules)?;
            let rules = if i == last {
                own
            } else {
                base_rules.merged(&own)
            };
            profiles.push(DocumentProfile {
                name: spec.name,
                matcher,
                page_numbering: spec.page_numbering,
                title_policy: spec.title_policy,
                toc_page: spec.toc_page,
                rules,
            });
        }
        Ok(Self { profiles })
    }

    /// Load profiles from a JSON file on disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Select the profile for a document.
    pub fn select(&self, doc: &LayoutDocument) -> &DocumentProfile {
        for profile in &self.profiles {
            if profile.matches(doc) {
                log::debug!("profile {:?} selected for {}", profile.name, doc.file_name);
                return profile;
            }
        }
        // The generic profile has no matcher, so this is unreachable with a
        // well-formed table; fall back to the last profile regardless.
        self.profiles.last().expect("registry is never empty")
    }

    /// Number of loaded profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty (never true after a successful load).
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_compile() {
        let registry = ProfileRegistry::builtin();
        assert!(registry.len() >= 2);
    }

    #[test]
    fn test_generic_profile_selected_by_default() {
        let registry = ProfileRegistry::builtin();
        let doc = LayoutDocument::new("quarterly-report.pdf");
        assert_eq!(registry.select(&doc).name, "generic");
    }

    #[test]
    fn test_family_profile_selected_by_filename() {
        let registry = ProfileRegistry::builtin();
        let doc = LayoutDocument::new("summer-flyer.pdf");
        let profile = registry.select(&doc);
        assert_eq!(profile.name, "flyer");
        assert_eq!(profile.page_numbering, PageNumbering::ZeroBased);
    }

    #[test]
    fn test_family_profile_inherits_baseline_rules() {
        let registry = ProfileRegistry::builtin();
        let doc = LayoutDocument::new("summer-flyer.pdf");
        let profile = registry.select(&doc);
        // Baseline structural shape still recognized under the family profile
        assert!(profile.rules.is_structural("1. Introduction"));
        // Family-specific shape recognized too
        assert!(profile.rules.is_structural("Hope To See You There!"));
    }

    #[test]
    fn test_page_numbering_remap() {
        assert_eq!(PageNumbering::OneBased.remap(1), 1);
        assert_eq!(PageNumbering::ZeroBased.remap(1), 0);
        assert_eq!(PageNumbering::ZeroBased.remap(3), 2);
        assert_eq!(PageNumbering::OffsetMinusOne.remap(1), 1);
        assert_eq!(PageNumbering::OffsetMinusOne.remap(5), 4);
    }

    #[test]
    fn test_empty_profile_table_rejected() {
        assert!(matches!(
            ProfileRegistry::from_json("[]"),
            Err(Error::InvalidRules(_))
        ));
    }
}
