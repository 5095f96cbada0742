//! Per-document outline pipeline.
//!
//! Stages run strictly in order and hand a [`DocumentContext`] to each other
//! by value:
//!
//! 1. collect distinct font sizes (before any filtering)
//! 2. detect the title on page 1 and cut its region out
//! 3. build the font-level map with the title size excluded
//! 4. per page: boilerplate filter, line assembly, heading rules
//! 5. normalize the candidate sequence

use crate::error::Result;
use crate::model::{HeadingCandidate, OutlineDocument, Span};
use crate::source::SpanSource;

use super::boilerplate::BoilerplateFilter;
use super::fonts::{distinct_font_sizes, FontLevelMap};
use super::lines::assemble_lines;
use super::normalize::normalize_outline;
use super::options::OutlineOptions;
use super::rules::HeadingClassifier;
use super::title::{detect_title, exclude_title_region, TitleInfo};

/// Everything known about one document while its outline is inferred.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContext {
    /// Spans per page, page 1 first
    pub pages: Vec<Vec<Span>>,
    /// Distinct font sizes of the whole document, largest first
    pub font_sizes: Vec<f32>,
    pub title: TitleInfo,
    pub font_map: FontLevelMap,
}

impl DocumentContext {
    /// Start a context from raw page spans.
    pub fn new(pages: Vec<Vec<Span>>) -> Self {
        let font_sizes = distinct_font_sizes(&pages);
        Self {
            pages,
            font_sizes,
            title: TitleInfo::untitled(),
            font_map: FontLevelMap::new(),
        }
    }

    /// Whether there is nothing to build an outline from.
    pub fn is_empty(&self) -> bool {
        self.pages.first().map_or(true, |page| page.is_empty())
    }

    /// Detect the title and remove its region from the first page.
    pub fn with_title(mut self, options: &OutlineOptions) -> Self {
        let Some(first_page) = self.pages.first_mut() else {
            return self;
        };

        let title = detect_title(first_page, options);
        if title.is_detected() {
            let spans = std::mem::take(first_page);
            *first_page = exclude_title_region(spans, &title, options);
        }
        self.title = title;
        self
    }

    /// Rank font sizes into heading levels, skipping the title size.
    pub fn with_font_map(mut self, options: &OutlineOptions) -> Self {
        self.font_map = FontLevelMap::build(&self.font_sizes, self.title.font_size, options);
        self
    }
}

/// Infers a title and outline from page spans.
pub struct OutlineExtractor {
    options: OutlineOptions,
    boilerplate: BoilerplateFilter,
    classifier: HeadingClassifier,
}

impl OutlineExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: OutlineOptions) -> Self {
        Self {
            boilerplate: BoilerplateFilter::new(&options),
            classifier: HeadingClassifier::new(&options),
            options,
        }
    }

    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Read every page from a span source and extract its outline.
    pub fn from_source(&self, source: &dyn SpanSource) -> Result<OutlineDocument> {
        let pages = source.all_pages()?;
        Ok(self.extract(pages))
    }

    /// Extract the outline from spans grouped by page.
    pub fn extract(&self, pages: Vec<Vec<Span>>) -> OutlineDocument {
        let context = DocumentContext::new(pages);
        if context.is_empty() {
            log::debug!("No spans on the first page, document is untitled");
            return OutlineDocument::untitled();
        }

        let context = context
            .with_title(&self.options)
            .with_font_map(&self.options);

        let candidates = self.candidates(&context);
        let outline = normalize_outline(candidates);
        log::debug!(
            "Outline for {:?}: {} headings",
            context.title.text,
            outline.len()
        );

        OutlineDocument::new(context.title.text, outline)
    }

    /// Heading candidates of every page in reading order.
    pub fn candidates(&self, context: &DocumentContext) -> Vec<HeadingCandidate> {
        context
            .pages
            .iter()
            .flat_map(|page| {
                let spans = self.boilerplate.filter_page(page.clone());
                let lines = assemble_lines(spans, self.options.line_tolerance);
                self.classifier.classify_page(&lines, &context.font_map)
            })
            .collect()
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}
