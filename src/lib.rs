//! # pdf-outline
//!
//! Infers a document title and a three-level (H1/H2/H3) heading outline from
//! the text layout of PDF files.
//!
//! PDFs rarely carry a usable structure tree, so the outline is rebuilt from
//! what the page looks like: font-size ranking, numbering schemes, bold
//! labels, keyword headings, and position on the page. Running heads, page
//! numbers, links, and affiliations are filtered out first.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let doc = extract_outline("paper.pdf")?;
//!
//!     println!("{}", render::to_json(&doc, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`source`]: turns a PDF into positioned, font-annotated spans
//! - [`outline`]: the heading inference pipeline over those spans
//! - [`render`]: JSON output
//! - [`batch`]: directory-to-directory processing in parallel

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchReport, FileOutcome, FileStatus};
pub use detect::{has_pdf_extension, sniff_bytes, sniff_file, PdfHeader};
pub use error::{Error, Result};
pub use model::{BBox, HeadingCandidate, HeadingLevel, OutlineDocument, Span, UNTITLED};
pub use outline::{OutlineExtractor, OutlineOptions};
pub use render::JsonFormat;
pub use source::{ErrorMode, PdfSpanSource, SourceOptions, SpanSource};

use std::path::Path;

/// Infer the title and outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let doc = extract_outline("paper.pdf").unwrap();
/// for heading in &doc.outline {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    extract_outline_with_options(path, SourceOptions::default(), OutlineOptions::default())
}

/// Infer the title and outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    source_options: SourceOptions,
    outline_options: OutlineOptions,
) -> Result<OutlineDocument> {
    let source = PdfSpanSource::open(path, source_options)?;
    OutlineExtractor::new(outline_options).from_source(&source)
}

/// Infer the title and outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<OutlineDocument> {
    let source = PdfSpanSource::from_bytes(data, SourceOptions::default())?;
    OutlineExtractor::default().from_source(&source)
}

/// Extract the positioned spans of every page, for diagnosis.
pub fn extract_spans<P: AsRef<Path>>(path: P, options: SourceOptions) -> Result<Vec<Vec<Span>>> {
    PdfSpanSource::open(path, options)?.all_pages()
}

/// Builder-style entry point.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::Outliner;
///
/// let doc = Outliner::new()
///     .lenient()
///     .without_columns()
///     .extract("paper.pdf")
///     .unwrap();
/// println!("{}", doc.title);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outliner {
    source: SourceOptions,
    outline: OutlineOptions,
}

impl Outliner {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip unreadable pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.source = self.source.lenient();
        self
    }

    /// Read pages top to bottom without column detection.
    pub fn without_columns(mut self) -> Self {
        self.source = self.source.with_columns(false);
        self
    }

    /// Replace the heading inference options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline = options;
        self
    }

    /// Extract from a file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<OutlineDocument> {
        extract_outline_with_options(path, self.source, self.outline)
    }

    /// Extract from bytes.
    pub fn extract_bytes(self, data: &[u8]) -> Result<OutlineDocument> {
        let source = PdfSpanSource::from_bytes(data, self.source)?;
        OutlineExtractor::new(self.outline).from_source(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outliner_builder() {
        let outliner = Outliner::new().lenient().without_columns();
        assert_eq!(outliner.source.error_mode, ErrorMode::Lenient);
        assert!(!outliner.source.detect_columns);
    }

    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let result = extract_outline_from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_outline("/nonexistent/paper.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
