//! Span sources: where positioned text comes from.
//!
//! The outline pipeline only sees [`SpanSource`]. The PDF implementation,
//! [`PdfSpanSource`], reads pages through a [`PdfBackend`], interprets their
//! content streams, and lays the resulting text runs out as top-down spans in
//! reading order.

mod backend;
mod content;
mod layout;

use std::collections::HashMap;
use std::path::Path;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::Span;

pub use backend::{
    decode_text_simple, get_number_from_value, BackendFontInfo, ContentOp, LopdfBackend,
    PageId, PdfBackend, PdfValue, DEFAULT_PAGE_BOX,
};
pub use content::{is_spaceless_script_char, ContentWalker, Matrix, TextRun};
pub use layout::{find_columns, layout_page, Column};

/// Error handling mode while reading pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip unreadable pages and continue
    Lenient,
}

/// Options for reading spans from a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to read two-column pages column by column
    pub detect_columns: bool,
}

impl SourceOptions {
    /// Create new source options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable column detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.detect_columns = detect;
        self
    }
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            detect_columns: true,
        }
    }
}

/// Anything that can hand out spans page by page.
pub trait SpanSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Spans of one page (1-based), in reading order.
    fn page_spans(&self, page: u32) -> Result<Vec<Span>>;

    /// How page failures are treated by [`SpanSource::all_pages`].
    fn error_mode(&self) -> ErrorMode {
        ErrorMode::Strict
    }

    /// Spans of every page, page 1 first.
    ///
    /// In lenient mode a page that fails to read is logged and contributes
    /// an empty page.
    fn all_pages(&self) -> Result<Vec<Vec<Span>>> {
        let count = self.page_count();
        let mut pages = Vec::with_capacity(count as usize);

        for page in 1..=count {
            match self.page_spans(page) {
                Ok(spans) => pages.push(spans),
                Err(e) => {
                    if self.error_mode() == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", page, e);
                    pages.push(Vec::new());
                }
            }
        }

        Ok(pages)
    }
}

/// Pre-extracted spans, one vector per page.
impl SpanSource for Vec<Vec<Span>> {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
        page.checked_sub(1)
            .and_then(|idx| self.get(idx as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

/// Span source reading a PDF document.
pub struct PdfSpanSource<B: PdfBackend = LopdfBackend> {
    backend: B,
    pages: Vec<PageId>,
    options: SourceOptions,
}

impl PdfSpanSource<LopdfBackend> {
    /// Open a PDF file.
    ///
    /// The header is checked before the document is parsed, so non-PDF
    /// files fail fast with [`Error::UnknownFormat`].
    pub fn open<P: AsRef<Path>>(path: P, options: SourceOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = detect::sniff_file(path)?;
        log::debug!("Opening {} ({})", path.display(), header);

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::from_backend(backend, options))
    }

    /// Read a PDF held in memory.
    pub fn from_bytes(data: &[u8], options: SourceOptions) -> Result<Self> {
        detect::sniff_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::from_backend(backend, options))
    }
}

impl<B: PdfBackend> PdfSpanSource<B> {
    /// Wrap an already loaded backend.
    pub fn from_backend(backend: B, options: SourceOptions) -> Self {
        let pages = backend.pages().into_values().collect();
        Self {
            backend,
            pages,
            options,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    fn page_id(&self, page: u32) -> Result<PageId> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl<B: PdfBackend> SpanSource for PdfSpanSource<B> {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
        let id = self.page_id(page)?;

        let content = self.backend.page_content(id)?;
        if content.is_empty() {
            log::debug!("Page {} has no content", page);
            return Ok(Vec::new());
        }

        let fonts: HashMap<Vec<u8>, BackendFontInfo> = self
            .backend
            .page_fonts(id)?
            .into_iter()
            .map(|font| (font.name.clone(), font))
            .collect();
        let page_box = self.backend.page_box(id)?;
        let ops = self.backend.decode_content(&content)?;

        let runs = ContentWalker::new(&fonts, |font: &[u8], bytes: &[u8]| {
            self.backend.decode_text(id, font, bytes)
        })
        .walk(&ops);

        let spans = layout_page(runs, &page_box, page, self.options.detect_columns);
        log::trace!("Page {}: {} spans", page, spans.len());
        Ok(spans)
    }

    fn error_mode(&self) -> ErrorMode {
        self.options.error_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;
    use std::collections::BTreeMap;

    /// Backend serving pre-decoded operations; page 2 has a broken font table.
    struct MockBackend {
        ops: Vec<ContentOp>,
    }

    impl MockBackend {
        fn new() -> Self {
            let text = |s: &str| PdfValue::Str(s.as_bytes().to_vec());
            Self {
                ops: vec![
                    ContentOp::new("BT", vec![]),
                    ContentOp::new(
                        "Tf",
                        vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(24)],
                    ),
                    ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
                    ContentOp::new("Tj", vec![text("Edge Ideals")]),
                    ContentOp::new(
                        "Tf",
                        vec![PdfValue::Name(b"F2".to_vec()), PdfValue::Integer(16)],
                    ),
                    ContentOp::new("Td", vec![PdfValue::Integer(0), PdfValue::Integer(-100)]),
                    ContentOp::new("Tj", vec![text("1. Introduction")]),
                    ContentOp::new("ET", vec![]),
                ],
            }
        }
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (10, 0)), (2, (11, 0)), (3, (12, 0))])
        }

        fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
            if page == (11, 0) {
                return Err(Error::PdfParse("broken font table".to_string()));
            }
            Ok(vec![
                BackendFontInfo::named(b"F1", "Times-Roman"),
                BackendFontInfo::named(b"F2", "Times-Bold"),
            ])
        }

        fn page_box(&self, _page: PageId) -> Result<BBox> {
            Ok(DEFAULT_PAGE_BOX)
        }

        fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
            // Page 3 is blank
            Ok(if page == (12, 0) {
                Vec::new()
            } else {
                b"mock".to_vec()
            })
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font_name: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    #[test]
    fn test_source_options_builder() {
        let options = SourceOptions::new().lenient().with_columns(false);
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.detect_columns);
        assert_eq!(SourceOptions::default().error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_page_spans_from_backend() {
        let source = PdfSpanSource::from_backend(MockBackend::new(), SourceOptions::default());
        assert_eq!(source.page_count(), 3);

        let spans = source.page_spans(1).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Edge Ideals");
        assert_eq!(spans[0].font_size, 24.0);
        assert!(!spans[0].is_bold);
        assert_eq!(spans[1].text, "1. Introduction");
        assert!(spans[1].is_bold);
        assert!(spans[0].bbox.y0 < spans[1].bbox.y0);
        assert_eq!(spans[1].page, 1);

        assert!(source.page_spans(3).unwrap().is_empty());
    }

    #[test]
    fn test_page_out_of_range() {
        let source = PdfSpanSource::from_backend(MockBackend::new(), SourceOptions::default());
        assert!(matches!(source.page_spans(0), Err(Error::PageOutOfRange(0, 3))));
        assert!(matches!(source.page_spans(4), Err(Error::PageOutOfRange(4, 3))));
    }

    #[test]
    fn test_strict_mode_fails_on_bad_page() {
        let source = PdfSpanSource::from_backend(MockBackend::new(), SourceOptions::default());
        let err = source.all_pages().unwrap_err();
        assert!(err.is_source_error());
    }

    #[test]
    fn test_lenient_mode_skips_bad_page() {
        let source =
            PdfSpanSource::from_backend(MockBackend::new(), SourceOptions::new().lenient());
        let pages = source.all_pages().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 2);
        assert!(pages[1].is_empty());
        assert!(pages[2].is_empty());
    }

    #[test]
    fn test_vec_span_source() {
        let pages = vec![vec![Span::new("A", 10.0, 1)], vec![]];
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_spans(1).unwrap()[0].text, "A");
        assert!(pages.page_spans(3).is_err());
        assert_eq!(pages.all_pages().unwrap(), pages);
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        assert!(matches!(
            PdfSpanSource::from_bytes(b"hello world", SourceOptions::default()),
            Err(Error::UnknownFormat)
        ));
    }
}
