//! pdfoutline CLI - document outline extraction tool

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{
    process_dir, ExtractOptions, JsonFormat, LayoutDocument, StructureExtractor,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract title and H1-H4 outline from PDF text layout", long_about = None)]
struct Cli {
    /// Input layout record file (.json)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one document
    Extract {
        /// Input layout record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Acceptance threshold for heading candidates
        #[arg(long, default_value = "4.0")]
        threshold: f32,

        /// Disable table region suppression
        #[arg(long)]
        no_tables: bool,

        /// Disable whitespace spacing analysis
        #[arg(long)]
        no_spacing: bool,

        /// Profile table file replacing the built-in one
        #[arg(long, value_name = "FILE")]
        profiles: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Process every layout record file in a directory
    Batch {
        /// Input directory of .json layout files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "outlines")]
        output: PathBuf,

        /// Acceptance threshold for heading candidates
        #[arg(long, default_value = "4.0")]
        threshold: f32,

        /// Process inputs one at a time
        #[arg(long)]
        sequential: bool,

        /// Profile table file replacing the built-in one
        #[arg(long, value_name = "FILE")]
        profiles: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information and outline statistics
    Info {
        /// Input layout record file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            threshold,
            no_tables,
            no_spacing,
            profiles,
            compact,
        }) => cmd_extract(
            &input,
            output.as_deref(),
            threshold,
            no_tables,
            no_spacing,
            profiles,
            compact,
        ),
        Some(Commands::Batch {
            input,
            output,
            threshold,
            sequential,
            profiles,
            compact,
        }) => cmd_batch(&input, &output, threshold, sequential, profiles, compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&input, cli.output.as_deref(), 4.0, false, false, None, false)
            } else {
                println!("{}", "Usage: pdfoutline <FILE> [OUTPUT]".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_extractor(
    threshold: f32,
    no_tables: bool,
    no_spacing: bool,
    profiles: Option<PathBuf>,
    parallel: bool,
) -> Result<StructureExtractor, pdfoutline::Error> {
    let mut options = ExtractOptions::default()
        .with_threshold(threshold)
        .with_table_detection(!no_tables)
        .with_spacing(!no_spacing)
        .with_parallel(parallel);
    if let Some(path) = profiles {
        options = options.with_profiles_path(path);
    }
    StructureExtractor::with_options(options)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    threshold: f32,
    no_tables: bool,
    no_spacing: bool,
    profiles: Option<PathBuf>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(threshold, no_tables, no_spacing, profiles, false)?;
    let structure = extractor.extract_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = pdfoutline::to_json(&structure, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    threshold: f32,
    sequential: bool,
    profiles: Option<PathBuf>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(threshold, false, false, profiles, !sequential)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Processing {}...", input.display()));

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let report = process_dir(&extractor, input, output, format, !sequential)?;
    pb.finish_and_clear();

    println!(
        "{} {} processed, {} failed",
        "Done!".green().bold(),
        report.processed.len(),
        report.failed.len()
    );
    for (path, message) in &report.failed {
        log::warn!("failed input {}: {}", path.display(), message);
        println!("  {} {}: {}", "✗".red(), path.display(), message);
    }
    println!("{} {}", "Output directory:".green(), output.display());

    // Individual failures are reported above; the batch itself succeeded
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = fs::read_to_string(input)?;
    let doc: LayoutDocument = serde_json::from_str(&json)?;

    let extractor = StructureExtractor::new()?;
    let structure = extractor.extract(&doc)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), doc.file_name);
    println!("{}: {}", "Pages".bold(), doc.page_count());
    let lines: usize = doc.pages.iter().map(|p| p.lines.len()).sum();
    let spans: usize = doc.pages.iter().map(|p| p.spans().count()).sum();
    println!("{}: {}", "Lines".bold(), lines);
    println!("{}: {}", "Spans".bold(), spans);
    if let Some(ref title) = doc.metadata_title {
        println!("{}: {}", "Metadata title".bold(), title);
    }
    let profile = pdfoutline::ProfileRegistry::builtin().select(&doc).name.clone();
    println!("{}: {}", "Profile".bold(), profile);

    println!();
    println!("{}", "Extracted Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Title".bold(), structure.title);
    println!("{}: {}", "Headings".bold(), structure.outline.len());

    let mut by_level: BTreeMap<String, usize> = BTreeMap::new();
    for entry in &structure.outline {
        *by_level.entry(entry.level.to_string()).or_insert(0) += 1;
    }
    for (level, count) in &by_level {
        println!("  {}: {}", level.bold(), count);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfoutline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Document outline extraction tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/pdfoutline/pdfoutline".dimmed()
    );
    println!("License: MIT");
}
