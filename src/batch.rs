//! Batch processing over a directory of layout record files.
//!
//! Every `.json` file in the input directory is processed independently;
//! one bad document never aborts the batch. Outputs are written next to
//! each other in the output directory under the input's file stem.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::extractor::StructureExtractor;
use crate::render::{self, JsonFormat};

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outputs written successfully
    pub processed: Vec<PathBuf>,
    /// Inputs that failed, with the failure message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Whether every input processed cleanly.
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of inputs seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Process every `.json` layout file in `input_dir`, writing one output
/// file per input into `output_dir`.
pub fn process_dir(
    extractor: &StructureExtractor,
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    format: JsonFormat,
    parallel: bool,
) -> Result<BatchReport> {
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(Error::MissingInput(input_dir.to_path_buf()));
    }
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    inputs.sort();
    if inputs.is_empty() {
        log::warn!("no .json inputs found in {}", input_dir.display());
    }

    let process_one = |input: &PathBuf| -> (PathBuf, std::result::Result<PathBuf, String>) {
        let result = process_file(extractor, input, output_dir, format);
        (input.clone(), result.map_err(|e| e.to_string()))
    };

    let outcomes: Vec<_> = if parallel {
        inputs.par_iter().map(process_one).collect()
    } else {
        inputs.iter().map(process_one).collect()
    };

    let mut report = BatchReport::default();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(output) => report.processed.push(output),
            Err(message) => {
                log::error!("{}: {}", input.display(), message);
                report.failed.push((input, message));
            }
        }
    }
    Ok(report)
}

fn process_file(
    extractor: &StructureExtractor,
    input: &Path,
    output_dir: &Path,
    format: JsonFormat,
) -> Result<PathBuf> {
    let structure = extractor.extract_file(input)?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output = output_dir.join(format!("{}.json", stem));
    render::write_json(&structure, &output, format)?;
    Ok(output)
}
