//! Table region detection from span positions.
//!
//! Detects tabular areas by looking for vertically adjacent rows whose
//! column x-positions align, so that table cells are not mistaken for
//! headings. Works purely on text geometry, no graphical lines required.

use crate::model::{BBox, Line, Page, StyledSpan};

/// A detected tabular area. A line is "in" the region if its bounding box
/// is fully contained.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    /// Padded bounding rectangle of the region
    pub bbox: BBox,
}

impl TableRegion {
    /// Whether the given line sits inside this region.
    pub fn contains_line(&self, line: &Line) -> bool {
        self.bbox.contains(&line.bbox)
    }
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Y distance within which spans belong to the same row
    pub row_y_tolerance: f32,
    /// X distance within which a span aligns with a seed column
    pub column_x_tolerance: f32,
    /// Fraction of a row's spans that must align for the row to extend a seed
    pub min_alignment_ratio: f32,
    /// Maximum rows a seed may extend forward
    pub max_extension_rows: usize,
    /// Minimum aligned rows for a region
    pub min_rows: usize,
    /// Horizontal padding applied to the region box
    pub pad_x: f32,
    /// Vertical padding applied to the region box
    pub pad_y: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            row_y_tolerance: 5.0,
            column_x_tolerance: 30.0,
            min_alignment_ratio: 0.5,
            max_extension_rows: 10,
            min_rows: 2,
            pad_x: 10.0,
            pad_y: 5.0,
        }
    }
}

/// Keywords that mark a single-column row as a table header when it sits
/// directly above an aligned multi-column row.
const TABLE_HEADER_KEYWORDS: [&str; 8] = [
    "feature",
    "description",
    "source",
    "type",
    "model",
    "dataset",
    "accuracy",
    "metric",
];

/// Detects table regions on a page.
pub struct TableDetector {
    config: TableDetectorConfig,
}

#[derive(Debug, Clone)]
struct Row {
    spans: Vec<StyledSpan>,
}

impl Row {
    fn bbox(&self) -> BBox {
        self.spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0))
    }
}

impl TableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect table regions on one page.
    pub fn detect(&self, page: &Page) -> Vec<TableRegion> {
        let spans: Vec<StyledSpan> = page
            .spans()
            .filter(|s| !s.text.trim().is_empty())
            .cloned()
            .collect();
        if spans.is_empty() {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        log::debug!(
            "table detector: page {} grouped into {} rows",
            page.number,
            rows.len()
        );

        let mut regions = Vec::new();

        // Multi-column rows seed candidate regions.
        for i in 0..rows.len() {
            if rows[i].spans.len() >= 2 {
                if let Some(region) = self.grow_region(&rows, i) {
                    regions.push(region);
                }
            }
        }

        // A single-column header row immediately above an aligned
        // multi-column row is folded into its region.
        for i in 0..rows.len().saturating_sub(1) {
            if rows[i].spans.len() == 1 && rows[i + 1].spans.len() >= 2 {
                let header_text = rows[i].spans[0].text.to_lowercase();
                if TABLE_HEADER_KEYWORDS.iter().any(|k| header_text.contains(k)) {
                    if let Some(mut region) = self.grow_region(&rows, i + 1) {
                        let header_top = rows[i].bbox().y0 - self.config.pad_y;
                        region.bbox.y0 = region.bbox.y0.min(header_top);
                        regions.push(region);
                    }
                }
            }
        }

        let merged = merge_overlapping(regions);
        log::debug!(
            "table detector: page {} has {} merged regions",
            page.number,
            merged.len()
        );
        merged
    }

    /// Group spans into visual rows by vertical proximity.
    fn group_into_rows(&self, mut spans: Vec<StyledSpan>) -> Vec<Row> {
        spans.sort_by(|a, b| a.y().partial_cmp(&b.y()).unwrap_or(std::cmp::Ordering::Equal));

        let mut rows: Vec<Row> = Vec::new();
        let mut current: Vec<StyledSpan> = Vec::new();
        let mut current_y = f32::NEG_INFINITY;

        for span in spans {
            if current.is_empty() || (span.y() - current_y).abs() <= self.config.row_y_tolerance {
                if current.is_empty() {
                    current_y = span.y();
                }
                current.push(span);
            } else {
                current.sort_by(|a, b| {
                    a.x().partial_cmp(&b.x()).unwrap_or(std::cmp::Ordering::Equal)
                });
                rows.push(Row {
                    spans: std::mem::take(&mut current),
                });
                current_y = span.y();
                current.push(span);
            }
        }
        if !current.is_empty() {
            current.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap_or(std::cmp::Ordering::Equal));
            rows.push(Row { spans: current });
        }

        rows
    }

    /// Grow a region from the seed row at `start`, extending while column
    /// x-positions keep aligning. Returns a region once at least
    /// `min_rows` aligned rows accumulate.
    fn grow_region(&self, rows: &[Row], start: usize) -> Option<TableRegion> {
        let seed = &rows[start];
        if seed.spans.len() < 2 {
            return None;
        }

        let seed_xs: Vec<f32> = seed.spans.iter().map(|s| s.x()).collect();
        let mut bbox = seed.bbox();
        let mut aligned_rows = 1;

        let end = (start + 1 + self.config.max_extension_rows).min(rows.len());
        for row in &rows[start + 1..end] {
            if row.spans.len() >= 2 && self.rows_align(&seed_xs, row) {
                bbox = bbox.union(&row.bbox());
                aligned_rows += 1;
            } else {
                break;
            }
        }

        if aligned_rows >= self.config.min_rows {
            Some(TableRegion {
                bbox: bbox.pad(self.config.pad_x, self.config.pad_y),
            })
        } else {
            None
        }
    }

    /// Whether enough of a row's spans line up with the seed columns.
    fn rows_align(&self, seed_xs: &[f32], row: &Row) -> bool {
        if row.spans.is_empty() {
            return false;
        }
        let aligned = row
            .spans
            .iter()
            .filter(|span| {
                seed_xs
                    .iter()
                    .any(|x| (span.x() - x).abs() <= self.config.column_x_tolerance)
            })
            .count();
        aligned as f32 >= row.spans.len() as f32 * self.config.min_alignment_ratio
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge pairwise-overlapping regions into maximal unions.
fn merge_overlapping(regions: Vec<TableRegion>) -> Vec<TableRegion> {
    let mut merged: Vec<TableRegion> = Vec::new();
    for region in regions {
        let mut region = region;
        loop {
            let mut absorbed = false;
            merged.retain(|existing| {
                if region.bbox.intersects(&existing.bbox) {
                    region.bbox = region.bbox.union(&existing.bbox);
                    absorbed = true;
                    false
                } else {
                    true
                }
            });
            if !absorbed {
                break;
            }
        }
        merged.push(region);
    }
    merged
}
