//! Extraction options.

use std::path::PathBuf;

use crate::analyzer::score::DEFAULT_THRESHOLD;

/// Options controlling structure extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Candidate acceptance threshold; acceptance requires score strictly
    /// greater than this value
    pub threshold: f32,
    /// Suppress heading candidates inside detected table regions
    pub detect_tables: bool,
    /// Compute whitespace isolation scores for accepted candidates
    pub spacing: bool,
    /// Leading pages scanned by the profile title recognizer
    pub title_page_limit: usize,
    /// Path to a profile table replacing the built-in one
    pub profiles_path: Option<PathBuf>,
    /// Process batch inputs in parallel
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            detect_tables: true,
            spacing: true,
            title_page_limit: 5,
            profiles_path: None,
            parallel: true,
        }
    }
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable or disable table region suppression.
    pub fn with_table_detection(mut self, enabled: bool) -> Self {
        self.detect_tables = enabled;
        self
    }

    /// Enable or disable spacing scores.
    pub fn with_spacing(mut self, enabled: bool) -> Self {
        self.spacing = enabled;
        self
    }

    /// Set how many leading pages the title recognizer scans.
    pub fn with_title_page_limit(mut self, pages: usize) -> Self {
        self.title_page_limit = pages;
        self
    }

    /// Use a profile table loaded from the given file.
    pub fn with_profiles_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profiles_path = Some(path.into());
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}
