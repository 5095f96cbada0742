//! Batch processing of a directory of PDFs.
//!
//! Every `*.pdf` in the input directory yields one `<stem>.json` in the
//! output directory. A document that cannot be read or written is reported in
//! the [`BatchReport`] and never stops the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::OutlineDocument;
use crate::outline::{OutlineExtractor, OutlineOptions};
use crate::render::{to_json, JsonFormat};
use crate::source::{PdfSpanSource, SourceOptions};

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Process documents on the rayon thread pool
    pub parallel: bool,

    /// Output JSON format
    pub format: JsonFormat,

    /// How documents are read
    pub source: SourceOptions,

    /// Heading inference policy
    pub outline: OutlineOptions,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set span source options.
    pub fn with_source_options(mut self, source: SourceOptions) -> Self {
        self.source = source;
        self
    }

    /// Set outline options.
    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            format: JsonFormat::Pretty,
            source: SourceOptions::default(),
            outline: OutlineOptions::default(),
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// The outline was written
    Written { output: PathBuf, headings: usize },
    /// The document could not be opened or parsed; nothing was written
    Skipped { reason: String },
    /// The outline could not be serialized or written
    Failed { reason: String },
}

/// Outcome for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Written { .. })
    }
}

/// Per-file outcomes of a batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of outlines written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that produced no output.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

/// List the PDFs of a directory, sorted by path.
pub fn list_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Where the outline of `input` goes: same stem, `.json` extension.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Read one PDF and infer its outline.
pub fn process_file<P: AsRef<Path>>(
    path: P,
    extractor: &OutlineExtractor,
    options: &SourceOptions,
) -> Result<OutlineDocument> {
    let source = PdfSpanSource::open(path, options.clone())?;
    extractor.from_source(&source)
}

/// Serialize an outline and write it to `path`.
pub fn write_outline<P: AsRef<Path>>(
    doc: &OutlineDocument,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(doc, format)?;
    fs::write(path, json)?;
    Ok(())
}

/// Process every PDF of `input_dir` into `output_dir`.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_with_progress(input_dir, output_dir, options, |_| {})
}

/// Like [`run`], calling `on_file` as each document finishes.
pub fn run_with_progress<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&FileOutcome) + Sync,
{
    let files = list_pdfs(input_dir)?;
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    log::info!("Processing {} PDF files", files.len());

    let handle = |extractor: &mut OutlineExtractor, input: &PathBuf| {
        let outcome = handle_file(input, output_dir, extractor, options);
        on_file(&outcome);
        outcome
    };

    let outcomes = if options.parallel {
        files
            .par_iter()
            .map_init(|| OutlineExtractor::new(options.outline.clone()), handle)
            .collect()
    } else {
        let mut extractor = OutlineExtractor::new(options.outline.clone());
        files.iter().map(|input| handle(&mut extractor, input)).collect()
    };

    Ok(BatchReport { outcomes })
}

fn handle_file(
    input: &Path,
    output_dir: &Path,
    extractor: &OutlineExtractor,
    options: &BatchOptions,
) -> FileOutcome {
    let name = input.display();

    let status = match process_file(input, extractor, &options.source) {
        Err(e) => {
            log::error!("Skipping {}: {}", name, e);
            FileStatus::Skipped {
                reason: e.to_string(),
            }
        }
        Ok(doc) => {
            let output = output_path(input, output_dir);
            match write_outline(&doc, &output, options.format) {
                Ok(()) => {
                    log::info!(
                        "Wrote {} ({} headings, title {:?})",
                        output.display(),
                        doc.outline.len(),
                        doc.title
                    );
                    FileStatus::Written {
                        output,
                        headings: doc.outline.len(),
                    }
                }
                Err(e) => {
                    log::error!("Failed to write outline for {}: {}", name, e);
                    FileStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    };

    FileOutcome {
        input: input.to_path_buf(),
        status,
    }
}
