//! Running header, footer, and noise removal.
//!
//! Filtering happens per page before line assembly, so a dropped span never
//! contributes text or a font-size vote to any line.

use regex::Regex;

use crate::model::{BBox, Span};

use super::options::OutlineOptions;
use super::static_regex;

/// Why a span was classified as boilerplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoilerplateKind {
    /// URL, e-mail address, or any `@`
    Link,
    /// Small-font affiliation, journal, or author line in a margin zone
    Affiliation,
    /// Page number, "Page X of Y", or a short run of digits in a margin zone
    PageNumber,
    /// A "RESEARCH" article-type banner near the top
    Banner,
    /// Structural tags such as "a1:" or bare codes such as "i2"
    Tag,
}

/// Vertical extent of a page, derived from the union of its span boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageZones {
    top_limit: f32,
    bottom_limit: f32,
}

impl PageZones {
    /// Compute margin zones for a page's spans.
    ///
    /// The zone limits are fractions of the content height and are compared
    /// against absolute line coordinates.
    pub fn for_page(spans: &[Span], fraction: f32) -> Self {
        let height = spans
            .iter()
            .map(|span| span.bbox)
            .reduce(|a, b| a.union(&b))
            .map(|bbox: BBox| bbox.height())
            .unwrap_or(0.0);

        Self {
            top_limit: height * fraction,
            bottom_limit: height * (1.0 - fraction),
        }
    }

    /// Whether the span's line starts in the header zone.
    pub fn is_top(&self, span: &Span) -> bool {
        span.line_y0() < self.top_limit
    }

    /// Whether the span's line ends in the footer zone.
    pub fn is_bottom(&self, span: &Span) -> bool {
        span.line_y1() > self.bottom_limit
    }

    pub fn in_margin(&self, span: &Span) -> bool {
        self.is_top(span) || self.is_bottom(span)
    }
}

/// Span-level boilerplate classifier.
pub struct BoilerplateFilter {
    link: Regex,
    affiliation: Regex,
    digit_run: Regex,
    page_of: Regex,
    clock_like: Regex,
    bare_number: Regex,
    tag: Regex,
    small_font: f32,
    banner_font: f32,
    zone_fraction: f32,
}

impl BoilerplateFilter {
    /// Create a filter with thresholds from the outline options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            link: static_regex(r"https?://|www\.|@"),
            affiliation: static_regex(concat!(
                r"^[a-z]+\.[a-z]+@",
                r"|department of|university|institute|college",
                r"|^[a-z]\.\s?[a-z]\.\s+\p{L}+$",
                r"|^\p{L}\.\s?\p{L}\.\s+\p{L}+,\s*\p{L}\.\s",
                r"|res math sci|journal of|proceedings of|math sci",
            )),
            digit_run: static_regex(r"^\s*[\d\s.—–-]+\s*$"),
            page_of: static_regex(r"^\s*(\d+\s+)?page\s+\d+\s+of\s+\d+\s*$"),
            clock_like: static_regex(r"^\d+\s*:\s*\d+$"),
            bare_number: static_regex(r"^\d+$"),
            tag: static_regex(r"^\s*(?:[a-z]\d+:?|[0-9().,–:-]+)\s*$"),
            small_font: options.boilerplate_small_font,
            banner_font: options.banner_font_limit,
            zone_fraction: options.margin_zone_fraction,
        }
    }

    /// Classify one span given its page's zones.
    pub fn classify(&self, span: &Span, zones: &PageZones) -> Option<BoilerplateKind> {
        let text = span.text.as_str();
        let lower = text.to_lowercase();

        if self.link.is_match(&lower) {
            return Some(BoilerplateKind::Link);
        }

        let in_margin = zones.in_margin(span);

        if span.font_size < self.small_font && in_margin && self.affiliation.is_match(&lower) {
            return Some(BoilerplateKind::Affiliation);
        }

        let looks_like_page_number = (self.digit_run.is_match(text) && text.chars().count() < 10)
            || self.page_of.is_match(&lower)
            || self.clock_like.is_match(&lower)
            || self.bare_number.is_match(text.trim());
        if looks_like_page_number && in_margin {
            return Some(BoilerplateKind::PageNumber);
        }

        if span.font_size < self.banner_font
            && text.split_whitespace().count() < 5
            && text.trim().to_uppercase() == "RESEARCH"
            && zones.is_top(span)
        {
            return Some(BoilerplateKind::Banner);
        }

        if self.tag.is_match(&lower) {
            return Some(BoilerplateKind::Tag);
        }

        None
    }

    /// Keep the spans of one page that are not boilerplate, in order.
    pub fn filter_page(&self, spans: Vec<Span>) -> Vec<Span> {
        let zones = PageZones::for_page(&spans, self.zone_fraction);
        spans
            .into_iter()
            .filter(|span| match self.classify(span, &zones) {
                Some(kind) => {
                    log::trace!("Dropping {:?} span {:?}", kind, span.text);
                    false
                }
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_HEIGHT: f32 = 800.0;

    fn filter() -> BoilerplateFilter {
        BoilerplateFilter::new(&OutlineOptions::default())
    }

    /// A page frame spanning 0..800 so that zones are 0..120 and 680..800.
    fn frame() -> Vec<Span> {
        vec![
            Span::new("top", 11.0, 1).at(72.0, 0.0, 100.0, 10.0),
            Span::new("bottom", 11.0, 1).at(72.0, 790.0, 100.0, PAGE_HEIGHT),
        ]
    }

    fn zones() -> PageZones {
        PageZones::for_page(&frame(), 0.15)
    }

    fn at(text: &str, size: f32, y0: f32) -> Span {
        Span::new(text, size, 1).at(72.0, y0, 300.0, y0 + size)
    }

    #[test]
    fn test_zones() {
        let zones = zones();
        assert!(zones.is_top(&at("x", 10.0, 50.0)));
        assert!(zones.is_bottom(&at("x", 10.0, 700.0)));
        assert!(!zones.in_margin(&at("x", 10.0, 400.0)));
    }

    #[test]
    fn test_links_anywhere() {
        let f = filter();
        let zones = zones();
        assert_eq!(
            f.classify(&at("see https://example.org", 11.0, 400.0), &zones),
            Some(BoilerplateKind::Link)
        );
        assert_eq!(
            f.classify(&at("jane@uni.edu", 11.0, 400.0), &zones),
            Some(BoilerplateKind::Link)
        );
        assert_eq!(
            f.classify(&at("www.journal.com", 14.0, 400.0), &zones),
            Some(BoilerplateKind::Link)
        );
    }

    #[test]
    fn test_affiliation_needs_small_font_and_margin() {
        let f = filter();
        let zones = zones();
        let header = at("Department of Mathematics", 9.0, 40.0);
        assert_eq!(
            f.classify(&header, &zones),
            Some(BoilerplateKind::Affiliation)
        );
        // Same text in the body is content
        assert_eq!(
            f.classify(&at("Department of Mathematics", 9.0, 400.0), &zones),
            None
        );
        // Large font in the margin is not an affiliation line
        assert_eq!(
            f.classify(&at("University Press", 14.0, 40.0), &zones),
            None
        );
        assert_eq!(
            f.classify(&at("H. T. Hà", 9.0, 40.0), &zones),
            Some(BoilerplateKind::Affiliation)
        );
        assert_eq!(
            f.classify(&at("Res Math Sci (2016) 3:10", 8.0, 760.0), &zones),
            Some(BoilerplateKind::Affiliation)
        );
    }

    #[test]
    fn test_page_numbers_in_margin() {
        let f = filter();
        let zones = zones();
        for text in ["Page 3 of 12", "22 Page 2 of 26", "9:22", "17", "- 4 -"] {
            assert_eq!(
                f.classify(&at(text, 10.0, 770.0), &zones),
                Some(BoilerplateKind::PageNumber),
                "{text}"
            );
        }
        // Section numbers in the body survive the page-number rule
        assert_ne!(
            f.classify(&at("Page 3 of 12", 10.0, 400.0), &zones),
            Some(BoilerplateKind::PageNumber)
        );
    }

    #[test]
    fn test_research_banner() {
        let f = filter();
        let zones = zones();
        assert_eq!(
            f.classify(&at("RESEARCH", 10.0, 30.0), &zones),
            Some(BoilerplateKind::Banner)
        );
        assert_eq!(f.classify(&at("RESEARCH", 16.0, 30.0), &zones), None);
    }

    #[test]
    fn test_structural_tags() {
        let f = filter();
        let zones = zones();
        for text in ["a1:", "i2", "(3)", "1.2,"] {
            assert_eq!(
                f.classify(&at(text, 11.0, 400.0), &zones),
                Some(BoilerplateKind::Tag),
                "{text}"
            );
        }
        assert_eq!(f.classify(&at("Introduction", 11.0, 400.0), &zones), None);
    }

    #[test]
    fn test_filter_page_keeps_order() {
        let f = filter();
        let mut page = frame();
        page.insert(1, at("Results", 14.0, 300.0));
        page.push(at("Page 3 of 12", 10.0, 770.0));
        page.push(at("Discussion", 14.0, 500.0));

        let kept: Vec<String> = f
            .filter_page(page)
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(kept, vec!["top", "Results", "bottom", "Discussion"]);
    }
}
