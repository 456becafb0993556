//! Data-driven pattern rule tables.
//!
//! The heading heuristics lean on a large amount of pattern knowledge
//! (structural phrases, forced levels, protected headings). That knowledge
//! lives here as an ordered `{pattern, action, priority}` table loaded from a
//! JSON resource, instead of literals embedded in the scoring code. Document
//! family profiles contribute additional entries on top of the generic table.

use regex::RegexBuilder;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::HeadingLevel;

/// What a matching rule does to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    /// Force the candidate to a fixed heading level.
    ForceLevel {
        /// The level to assign
        level: HeadingLevel,
    },
    /// Exclude the candidate in the final validation pass.
    Exclude,
    /// Protect the candidate from exclusion filters (must-keep shape).
    Protect,
    /// Recognized structural heading shape: +4 score bonus and a 0.5
    /// acceptance threshold.
    Structural,
    /// Lower the acceptance threshold for this shape.
    LowThreshold {
        /// Replacement threshold
        threshold: f32,
    },
    /// Line recognizer used by the title extractor's cross-page search.
    TitleRecognizer,
}

/// One rule table entry as it appears in the JSON resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// Regular expression matched against the trimmed line text
    pub pattern: String,
    /// Action taken on match
    #[serde(flatten)]
    pub action: RuleAction,
    /// Evaluation priority, higher first
    #[serde(default)]
    pub priority: i32,
    /// Match case-sensitively (exact-shape overrides); default insensitive
    #[serde(default)]
    pub case_sensitive: bool,
}

struct CompiledRule {
    regex: regex::Regex,
    action: RuleAction,
    priority: i32,
}

/// A compiled, ordered rule table.
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile a list of rule entries, ordered by descending priority.
    pub fn compile(entries: &[Rule]) -> Result<Self> {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            let regex = RegexBuilder::new(&entry.pattern)
                .case_insensitive(!entry.case_sensitive)
                .build()
                .map_err(|e| {
                    Error::InvalidRules(format!("pattern {:?}: {}", entry.pattern, e))
                })?;
            rules.push(CompiledRule {
                regex,
                action: entry.action,
                priority: entry.priority,
            });
        }
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(Self { rules })
    }

    /// Parse and compile a rule table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Rule> =
            serde_json::from_str(json).map_err(|e| Error::InvalidRules(e.to_string()))?;
        Self::compile(&entries)
    }

    /// An empty table.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    fn matching<'s>(&'s self, text: &'s str) -> impl Iterator<Item = &'s CompiledRule> + 's {
        self.rules.iter().filter(move |r| r.regex.is_match(text))
    }

    /// Whether the text matches a must-keep shape protected from exclusion.
    pub fn is_protected(&self, text: &str) -> bool {
        self.matching(text)
            .any(|r| matches!(r.action, RuleAction::Protect))
    }

    /// Whether the text matches a recognized structural heading shape.
    pub fn is_structural(&self, text: &str) -> bool {
        self.matching(text)
            .any(|r| matches!(r.action, RuleAction::Structural))
    }

    /// Whether the text is excluded by the final validation pass.
    pub fn is_excluded(&self, text: &str) -> bool {
        self.matching(text)
            .any(|r| matches!(r.action, RuleAction::Exclude))
    }

    /// Acceptance threshold override for this text, if any rule lowers it.
    ///
    /// `Structural` shapes imply a 0.5 threshold; explicit `LowThreshold`
    /// rules win when they specify a lower value.
    pub fn threshold_override(&self, text: &str) -> Option<f32> {
        let mut threshold: Option<f32> = None;
        for rule in self.matching(text) {
            let t = match rule.action {
                RuleAction::LowThreshold { threshold } => threshold,
                RuleAction::Structural => 0.5,
                _ => continue,
            };
            threshold = Some(threshold.map_or(t, |cur: f32| cur.min(t)));
        }
        threshold
    }

    /// Forced level for this text, honoring strict H1 → H4 priority order.
    ///
    /// Case-sensitive rules compile with higher fidelity but are evaluated
    /// the same way; exact-shape overrides should carry a high `priority`.
    pub fn forced_level(&self, text: &str) -> Option<HeadingLevel> {
        for level in HeadingLevel::all() {
            for rule in self.matching(text) {
                if matches!(rule.action, RuleAction::ForceLevel { level: l } if l == level) {
                    return Some(level);
                }
            }
        }
        None
    }

    /// Highest-priority forced level regardless of the H1→H4 order.
    ///
    /// Used for profile exact-shape overrides, which outrank the general
    /// level library.
    pub fn priority_forced_level(&self, text: &str) -> Option<HeadingLevel> {
        self.matching(text).find_map(|r| match r.action {
            RuleAction::ForceLevel { level } if r.priority > 0 => Some(level),
            _ => None,
        })
    }

    /// Whether the text matches a title recognizer rule.
    pub fn matches_title(&self, text: &str) -> bool {
        self.matching(text)
            .any(|r| matches!(r.action, RuleAction::TitleRecognizer))
    }

    /// Concatenate two tables; `other`'s entries keep their priorities.
    pub fn merged(&self, other: &RuleSet) -> RuleSet {
        let mut rules: Vec<CompiledRule> = self
            .rules
            .iter()
            .chain(other.rules.iter())
            .map(|r| CompiledRule {
                regex: r.regex.clone(),
                action: r.action,
                priority: r.priority,
            })
            .collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        RuleSet { rules }
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
