//! pdf-outline CLI - infer titles and heading outlines from PDF files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{self, BatchOptions, FileStatus};
use pdf_outline::render::{self, JsonFormat};
use pdf_outline::{
    extract_outline_with_options, extract_spans, Error, ErrorMode, OutlineOptions, SourceOptions,
};

const DEFAULT_INPUT_DIR: &str = "input";
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Infer a title and H1/H2/H3 outline from PDF files", long_about = None)]
struct Cli {
    /// Directory of PDFs to process
    #[arg(value_name = "INPUT", env = "PDF_OUTLINE_INPUT")]
    input: Option<PathBuf>,

    /// Directory for the JSON outlines
    #[arg(value_name = "OUTPUT", env = "PDF_OUTLINE_OUTPUT")]
    output: Option<PathBuf>,

    /// Process one document at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Fail a document on the first unreadable page
    #[arg(long, global = true)]
    strict: bool,

    /// Write compact single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Read pages top to bottom without column detection
    #[arg(long, global = true)]
    no_columns: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory (default)
    Batch {
        /// Directory of PDFs to process
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Directory for the JSON outlines
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Infer the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the extracted text spans of a PDF as JSON
    Spans {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn source_options(&self) -> SourceOptions {
        let mode = if self.strict {
            ErrorMode::Strict
        } else {
            ErrorMode::Lenient
        };
        SourceOptions::new()
            .with_error_mode(mode)
            .with_columns(!self.no_columns)
    }

    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions::new()
            .with_parallel(!self.sequential)
            .with_format(self.format())
            .with_source_options(self.source_options())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Batch { input, output }) => cmd_batch(
            input.as_deref().or(cli.input.as_deref()),
            output.as_deref().or(cli.output.as_deref()),
            &cli.batch_options(),
        ),
        Some(Commands::File { input, output }) => {
            cmd_file(input, output.as_deref(), cli.source_options(), cli.format())
        }
        Some(Commands::Spans { input }) => cmd_spans(input, cli.source_options(), cli.format()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(
            cli.input.as_deref(),
            cli.output.as_deref(),
            &cli.batch_options(),
        ),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: Option<&Path>,
    output: Option<&Path>,
    options: &BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = input.unwrap_or_else(|| Path::new(DEFAULT_INPUT_DIR));
    let output = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR));
    log::debug!(
        "Batch {} -> {} ({:?})",
        input.display(),
        output.display(),
        options
    );

    let files = match batch::list_pdfs(input) {
        Ok(files) => files,
        Err(Error::InputNotFound(dir)) => {
            log::warn!("Input directory {} does not exist", dir.display());
            println!(
                "{} {}",
                "Input directory not found:".yellow(),
                dir.display()
            );
            println!("Nothing to do.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if files.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = batch::run_with_progress(input, output, options, |outcome| {
        let name = outcome
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match &outcome.status {
            FileStatus::Written { headings, .. } => {
                pb.println(format!("  {} {} ({} headings)", "✓".green(), name, headings));
            }
            FileStatus::Skipped { reason } | FileStatus::Failed { reason } => {
                pb.println(format!("  {} {}: {}", "✗".red(), name, reason.dimmed()));
            }
        }
        pb.inc(1);
    })?;

    pb.finish_and_clear();
    for outcome in report.outcomes.iter().filter(|o| !o.is_success()) {
        log::debug!("No output for {}", outcome.input.display());
    }

    println!(
        "\n{} {} written, {} failed ({})",
        "Done!".green().bold(),
        report.succeeded(),
        report.failed(),
        output.display()
    );

    Ok(())
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    source_options: SourceOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = extract_outline_with_options(input, source_options, OutlineOptions::default())?;
    log::info!(
        "{}: {} headings, title {:?}",
        input.display(),
        doc.outline.len(),
        doc.title
    );
    let json = render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_spans(
    input: &Path,
    source_options: SourceOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = extract_spans(input, source_options)?;
    log::debug!("{}: {} pages", input.display(), pages.len());
    println!("{}", render::spans_to_json(&pages, format)?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Title and heading outline inference for PDF files");
    println!();
    println!("License: MIT");
}
