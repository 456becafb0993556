//! Layout analysis: rule tables, document profiles, table suppression,
//! title extraction, candidate scoring and level classification.

pub mod classify;
pub mod profile;
pub mod rules;
pub mod score;
pub mod tables;
pub mod title;

pub use classify::{FontThresholds, LevelClassifier};
pub use profile::{DocumentProfile, PageNumbering, ProfileRegistry, TitlePolicy};
pub use rules::{Rule, RuleAction, RuleSet};
pub use score::CandidateScorer;
pub use tables::{TableDetector, TableDetectorConfig, TableRegion};
pub use title::{ExtractedTitle, TitleExtractor, TitleSource};
