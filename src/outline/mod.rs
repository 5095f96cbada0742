//! Outline inference from positioned text spans.
//!
//! The entry point is [`OutlineExtractor`], which runs title detection,
//! font-size ranking, boilerplate filtering, line assembly, the heading rule
//! engine, and normalization over one document's spans.
//!
//! # Example
//!
//! ```
//! use pdf_outline::model::Span;
//! use pdf_outline::outline::OutlineExtractor;
//!
//! let pages = vec![vec![
//!     Span::new("Edge Ideals", 24.0, 1).at(72.0, 60.0, 300.0, 84.0),
//!     Span::new("1. Introduction", 16.0, 1).at(72.0, 200.0, 300.0, 216.0),
//! ]];
//!
//! let doc = OutlineExtractor::default().extract(pages);
//! assert_eq!(doc.title, "Edge Ideals");
//! assert_eq!(doc.outline[0].text, "1. Introduction");
//! ```

mod boilerplate;
mod fonts;
mod lines;
mod normalize;
mod options;
mod pipeline;
mod rules;
mod title;

use regex::Regex;

pub use boilerplate::{BoilerplateFilter, BoilerplateKind, PageZones};
pub use fonts::{distinct_font_sizes, FontLevelMap};
pub use lines::{assemble_lines, Line};
pub use normalize::normalize_outline;
pub use options::{
    OutlineOptions, BANNER_FONT_LIMIT, BOILERPLATE_SMALL_FONT, FONT_MAP_TOLERANCE, LINE_TOLERANCE,
    MARGIN_ZONE_FRACTION, MAX_BOLD_LINE_CHARS, MAX_BOLD_RUN_SENTENCE_CHARS, MAX_BOLD_RUN_WORDS,
    MAX_BOLD_SENTENCE_CHARS, MAX_BULLET_HEADING_CHARS, MAX_COLON_LABEL_WORDS, MAX_KEYWORD_WORDS,
    MAX_NUMBERED_WORDS, MIN_H1_H2_GAP, MIN_H2_H3_GAP, MIN_PLAIN_HEADING_SIZE,
    MIN_SENTENCE_HEADING_SIZE, SIGNIFICANT_FONT_SIZE, SIZE_MATCH_TOLERANCE,
    TITLE_CONTAINMENT_SLACK, TITLE_CONTIGUITY_FACTOR,
};
pub use pipeline::{DocumentContext, OutlineExtractor};
pub use rules::{
    AcceptanceRule, BoldFallbackRule, BoldPrefixRule, BulletLookaheadRule, BulletRule,
    ColonSplitRule, FeatureExtractor, FontMapRule, HeadingClassifier, HeadingRule, KeywordRule,
    LevelUpdate, LineFeatures, Numbering, NumberingRule, RuleInput, RuleOutcome, RuleState,
};
pub use title::{detect_title, exclude_title_region, TitleInfo};

/// Compile a pattern that is a literal in this crate.
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}
