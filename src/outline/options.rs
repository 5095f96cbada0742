//! Tunable policy constants for outline inference.

/// Smallest font size that can be mapped to a heading level.
pub const SIGNIFICANT_FONT_SIZE: f32 = 10.0;
/// H1 must be at least this many points larger than H2.
pub const MIN_H1_H2_GAP: f32 = 2.0;
/// H2 must be at least this many points larger than H3.
pub const MIN_H2_H3_GAP: f32 = 1.5;
/// Tolerance for "same size as the title" checks.
pub const SIZE_MATCH_TOLERANCE: f32 = 0.1;
/// A line's size matches a font-map entry within this many points.
pub const FONT_MAP_TOLERANCE: f32 = 1.0;
/// Spans whose line tops differ by at most this much share a line.
pub const LINE_TOLERANCE: f32 = 0.1;
/// Title lines merge while the vertical gap stays under this × font size.
pub const TITLE_CONTIGUITY_FACTOR: f32 = 1.5;
/// Fraction of page height treated as header (top) and footer (bottom).
pub const MARGIN_ZONE_FRACTION: f32 = 0.15;
/// Allowed overhang when testing whether a span contains the title box.
pub const TITLE_CONTAINMENT_SLACK: f32 = 1.0;
/// Affiliation lines are only dropped below this font size.
pub const BOILERPLATE_SMALL_FONT: f32 = 12.0;
/// A "RESEARCH" banner is only dropped below this font size.
pub const BANNER_FONT_LIMIT: f32 = 14.0;
pub const MAX_NUMBERED_WORDS: usize = 20;
pub const MAX_COLON_LABEL_WORDS: usize = 10;
pub const MAX_KEYWORD_WORDS: usize = 15;
/// Smallest size at which a plain-weight line can be a heading.
pub const MIN_PLAIN_HEADING_SIZE: f32 = 12.0;
/// Smallest size at which a plain line ending in a period can be a heading.
pub const MIN_SENTENCE_HEADING_SIZE: f32 = 14.0;
pub const MAX_BULLET_HEADING_CHARS: usize = 60;
pub const MAX_BOLD_LINE_CHARS: usize = 150;
pub const MAX_BOLD_SENTENCE_CHARS: usize = 50;
pub const MAX_BOLD_RUN_WORDS: usize = 10;
pub const MAX_BOLD_RUN_SENTENCE_CHARS: usize = 30;

/// Options controlling outline inference.
///
/// Defaults are tuned for prose and academic-paper layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Sizes below this are never mapped to a heading level
    pub significant_font_size: f32,

    /// Minimum H1→H2 size gap
    pub min_h1_h2_gap: f32,

    /// Minimum H2→H3 size gap
    pub min_h2_h3_gap: f32,

    /// Tolerance for title-size exclusion and title span matching
    pub size_match_tolerance: f32,

    /// Tolerance for the font-map heading rule
    pub font_map_tolerance: f32,

    /// Vertical tolerance for line assembly
    pub line_tolerance: f32,

    /// Title contiguity factor (× font size)
    pub title_contiguity_factor: f32,

    /// Header/footer zone as a fraction of page height
    pub margin_zone_fraction: f32,

    /// Overhang allowed when a span "contains" the title box
    pub title_containment_slack: f32,

    /// Boilerplate: small-font threshold for affiliation lines
    pub boilerplate_small_font: f32,

    /// Boilerplate: "RESEARCH" banner font threshold
    pub banner_font_limit: f32,

    /// Numbering rule: lines with more words are not numbered headings
    pub max_numbered_words: usize,

    /// Colon rule: pre-colon text must have fewer words than this
    pub max_colon_label_words: usize,

    /// Keyword rule: plain lines must have fewer words than this
    pub max_keyword_words: usize,

    /// Acceptance: minimum size for a plain (non-bold) heading
    pub min_plain_heading_size: f32,

    /// Acceptance: minimum size for a plain heading ending in a period
    pub min_sentence_heading_size: f32,

    /// Bullet headings longer than this are treated as body text
    pub max_bullet_heading_chars: usize,

    /// Fallback: fully bold lines shorter than this become H3
    pub max_bold_line_chars: usize,

    /// Fallback: fully bold lines ending in a period must be shorter than this
    pub max_bold_sentence_chars: usize,

    /// Fallback: a leading bold run must have fewer words than this
    pub max_bold_run_words: usize,

    /// Fallback: a leading bold run ending in a period must be shorter than this
    pub max_bold_run_sentence_chars: usize,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the significant font size floor.
    pub fn with_significant_font_size(mut self, size: f32) -> Self {
        self.significant_font_size = size;
        self
    }

    /// Set the minimum H1/H2 and H2/H3 size gaps.
    pub fn with_level_gaps(mut self, h1_h2: f32, h2_h3: f32) -> Self {
        self.min_h1_h2_gap = h1_h2;
        self.min_h2_h3_gap = h2_h3;
        self
    }

    /// Set the font-map match tolerance.
    pub fn with_font_map_tolerance(mut self, tolerance: f32) -> Self {
        self.font_map_tolerance = tolerance;
        self
    }

    /// Set the line assembly tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the header/footer zone fraction.
    pub fn with_margin_zone(mut self, fraction: f32) -> Self {
        self.margin_zone_fraction = fraction;
        self
    }

    /// Set the title contiguity factor.
    pub fn with_title_contiguity(mut self, factor: f32) -> Self {
        self.title_contiguity_factor = factor;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            significant_font_size: SIGNIFICANT_FONT_SIZE,
            min_h1_h2_gap: MIN_H1_H2_GAP,
            min_h2_h3_gap: MIN_H2_H3_GAP,
            size_match_tolerance: SIZE_MATCH_TOLERANCE,
            font_map_tolerance: FONT_MAP_TOLERANCE,
            line_tolerance: LINE_TOLERANCE,
            title_contiguity_factor: TITLE_CONTIGUITY_FACTOR,
            margin_zone_fraction: MARGIN_ZONE_FRACTION,
            title_containment_slack: TITLE_CONTAINMENT_SLACK,
            boilerplate_small_font: BOILERPLATE_SMALL_FONT,
            banner_font_limit: BANNER_FONT_LIMIT,
            max_numbered_words: MAX_NUMBERED_WORDS,
            max_colon_label_words: MAX_COLON_LABEL_WORDS,
            max_keyword_words: MAX_KEYWORD_WORDS,
            min_plain_heading_size: MIN_PLAIN_HEADING_SIZE,
            min_sentence_heading_size: MIN_SENTENCE_HEADING_SIZE,
            max_bullet_heading_chars: MAX_BULLET_HEADING_CHARS,
            max_bold_line_chars: MAX_BOLD_LINE_CHARS,
            max_bold_sentence_chars: MAX_BOLD_SENTENCE_CHARS,
            max_bold_run_words: MAX_BOLD_RUN_WORDS,
            max_bold_run_sentence_chars: MAX_BOLD_RUN_SENTENCE_CHARS,
        }
    }
}
