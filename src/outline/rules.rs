//! Heading rule engine.
//!
//! Each heuristic is a named [`HeadingRule`] that inspects one line (plus a
//! single line of lookahead) and the state accumulated by the rules before
//! it. [`HeadingClassifier`] folds the rules left to right:
//!
//! | # | Rule | Effect |
//! |---|------|--------|
//! | 1 | [`FontMapRule`] | level from the font-level map |
//! | 2 | [`NumberingRule`] | level from `1.` / `1.2` / `A.` prefixes |
//! | 3 | [`BulletRule`] | H3 for bulleted lines |
//! | 4 | [`BoldPrefixRule`] | leading bold run ending in `:` (authoritative) |
//! | 5 | [`ColonSplitRule`] | short label before a colon (authoritative) |
//! | 6 | [`KeywordRule`] | theorem-style environments (authoritative) |
//! | 7 | [`AcceptanceRule`] | vetoes weak non-structural candidates |
//! | 8 | [`BulletLookaheadRule`] | vetoes bullets that are body text |
//! | 9 | [`BoldFallbackRule`] | accepts bold lines nothing else claimed |
//!
//! Authoritative matches skip the vetoes of steps 7 and 8.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{HeadingCandidate, HeadingLevel, Span};

use super::fonts::FontLevelMap;
use super::lines::Line;
use super::options::OutlineOptions;
use super::static_regex;

/// Prefix of a line that starts a new numbered, lettered, or bulleted item.
const NEW_ITEM_PATTERN: &str = r"^(?:(?:\d+\.)+\d*|\d+|[A-Z]|[•*-])";

/// Numbering scheme found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    /// `1`, `1.`, `1.2`, `1.2.3` followed by whitespace; depth counts the
    /// non-empty parts
    Numeric { depth: usize },
    /// A single capital letter and a dot, e.g. `A. `
    Alpha,
}

/// Per-line attributes computed once before any rule runs.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeatures {
    /// Space-joined line text
    pub text: String,
    /// Compatibility-normalized, lowercased text for keyword matching
    pub folded: String,
    pub font_size: f32,
    pub any_bold: bool,
    pub all_bold: bool,
    pub any_italic: bool,
    pub word_count: usize,
    pub page: u32,
    /// Line top of the first span
    pub top: f32,
    /// Bottom edge of the last span
    pub bottom: f32,
    pub numbering: Option<Numbering>,
    pub bullet: bool,
}

impl LineFeatures {
    pub fn ends_with_period(&self) -> bool {
        self.text.ends_with('.')
    }

    /// Whether the line carries any numbering or bullet prefix.
    pub fn has_item_prefix(&self) -> bool {
        self.numbering.is_some() || self.bullet
    }
}

/// Computes [`LineFeatures`] with precompiled prefix patterns.
pub struct FeatureExtractor {
    numeric: Regex,
    alpha: Regex,
    bullet: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            numeric: static_regex(r"^((?:\d+\.)+\d*|\d+)\s+"),
            alpha: static_regex(r"^[A-Z]\.\s+"),
            bullet: static_regex(r"^[•*-]"),
        }
    }

    pub fn extract(&self, line: &Line) -> LineFeatures {
        let text = line.text();
        let folded = text.nfkc().collect::<String>().to_lowercase();

        let numbering = if let Some(caps) = self.numeric.captures(&text) {
            let depth = caps[1].split('.').filter(|part| !part.is_empty()).count();
            Some(Numbering::Numeric { depth })
        } else if self.alpha.is_match(&text) {
            Some(Numbering::Alpha)
        } else {
            None
        };

        LineFeatures {
            word_count: text.split_whitespace().count(),
            bullet: self.bullet.is_match(&text),
            numbering,
            folded,
            font_size: line.dominant_font_size(),
            any_bold: line.any_bold(),
            all_bold: line.all_bold(),
            any_italic: line.any_italic(),
            page: line.page(),
            top: line.top(),
            bottom: line.last_span_bottom(),
            text,
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a rule may look at for one line.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub features: &'a LineFeatures,
    pub spans: &'a [Span],
    /// Features of the following line on the same page
    pub next: Option<&'a LineFeatures>,
    pub font_map: &'a FontLevelMap,
}

/// How a matching rule changes the candidate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUpdate {
    /// Leave the level untouched
    Keep,
    /// Overwrite the level
    Set(HeadingLevel),
    /// Set the level only when none is set yet
    IfUnset(HeadingLevel),
    /// Raise the level to at least this rank; a higher level is kept
    AtLeast(HeadingLevel),
}

impl LevelUpdate {
    pub fn apply(self, current: Option<HeadingLevel>) -> Option<HeadingLevel> {
        match self {
            LevelUpdate::Keep => current,
            LevelUpdate::Set(level) => Some(level),
            LevelUpdate::IfUnset(level) => current.or(Some(level)),
            LevelUpdate::AtLeast(level) => match current {
                Some(existing) if existing <= level => Some(existing),
                _ => Some(level),
            },
        }
    }
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule has nothing to say about this line
    NoMatch,
    /// The line is a heading candidate
    Match {
        level: LevelUpdate,
        /// Display text replacing the full line text
        text: Option<String>,
        /// Explicit structural markup; skips the acceptance vetoes
        authoritative: bool,
    },
    /// The line is not a heading; any level already set is kept
    Reject,
}

impl RuleOutcome {
    fn matched(level: LevelUpdate) -> Self {
        RuleOutcome::Match {
            level,
            text: None,
            authoritative: false,
        }
    }

    fn structural(level: LevelUpdate, text: Option<String>) -> Self {
        RuleOutcome::Match {
            level,
            text,
            authoritative: true,
        }
    }
}

/// State folded across the rules for one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleState {
    pub level: Option<HeadingLevel>,
    pub potential: bool,
    pub display_text: Option<String>,
    pub authoritative: bool,
    /// Names of the rules that matched, in order
    pub matched: Vec<&'static str>,
    /// Name of the last rule that rejected the line
    pub rejected_by: Option<&'static str>,
}

impl RuleState {
    fn fold(&mut self, name: &'static str, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::NoMatch => {}
            RuleOutcome::Match {
                level,
                text,
                authoritative,
            } => {
                self.potential = true;
                self.level = level.apply(self.level);
                if self.display_text.is_none() {
                    self.display_text = text;
                }
                self.authoritative |= authoritative;
                self.matched.push(name);
            }
            RuleOutcome::Reject => {
                self.potential = false;
                self.rejected_by = Some(name);
            }
        }
    }

    /// Whether the folded state accepts the line as a heading.
    pub fn is_heading(&self) -> bool {
        self.potential && self.level.is_some()
    }

    /// Text the heading should be reported with.
    pub fn text_or<'a>(&'a self, full: &'a str) -> &'a str {
        self.display_text.as_deref().unwrap_or(full)
    }
}

/// A named heading heuristic.
pub trait HeadingRule: Send + Sync {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Evaluate the rule against a line given the state so far.
    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome;
}

/// Rule 1: the dominant font size matches a font-level map entry.
pub struct FontMapRule {
    tolerance: f32,
}

impl FontMapRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            tolerance: options.font_map_tolerance,
        }
    }
}

impl HeadingRule for FontMapRule {
    fn name(&self) -> &'static str {
        "font-map"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _state: &RuleState) -> RuleOutcome {
        match input
            .font_map
            .level_for(input.features.font_size, self.tolerance)
        {
            Some(level) => RuleOutcome::matched(LevelUpdate::Set(level)),
            None => RuleOutcome::NoMatch,
        }
    }
}

/// Rule 2: numbered (`1.2 Methods`) or lettered (`A. Proofs`) lines.
pub struct NumberingRule {
    comma_after_prefix: Regex,
    max_words: usize,
}

impl NumberingRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            comma_after_prefix: static_regex(r"^(?:(?:\d+\.)+\d*|\d+|[A-Z])\s*,"),
            max_words: options.max_numbered_words,
        }
    }
}

impl HeadingRule for NumberingRule {
    fn name(&self) -> &'static str {
        "numbering"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _state: &RuleState) -> RuleOutcome {
        let features = input.features;
        let Some(numbering) = features.numbering else {
            return RuleOutcome::NoMatch;
        };

        if self.comma_after_prefix.is_match(&features.text) || features.word_count > self.max_words
        {
            return RuleOutcome::Reject;
        }

        let level = match numbering {
            Numbering::Numeric { depth } => HeadingLevel::from_depth(depth)
                .map(LevelUpdate::Set)
                .unwrap_or(LevelUpdate::Keep),
            Numbering::Alpha => LevelUpdate::Set(HeadingLevel::H1),
        };
        RuleOutcome::matched(level)
    }
}

/// Rule 3: bulleted lines default to H3.
pub struct BulletRule;

impl HeadingRule for BulletRule {
    fn name(&self) -> &'static str {
        "bullet"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _state: &RuleState) -> RuleOutcome {
        if input.features.bullet {
            RuleOutcome::matched(LevelUpdate::IfUnset(HeadingLevel::H3))
        } else {
            RuleOutcome::NoMatch
        }
    }
}

/// Rule 4: a leading run of bold spans ending in `:` followed by plain text,
/// as in "**Background:** This paper studies".
pub struct BoldPrefixRule;

impl HeadingRule for BoldPrefixRule {
    fn name(&self) -> &'static str {
        "bold-prefix-colon"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _state: &RuleState) -> RuleOutcome {
        let spans = input.spans;
        let mut prefix = String::new();

        for (idx, span) in spans.iter().enumerate() {
            if !span.is_bold {
                break;
            }
            prefix.push_str(&span.text);

            if prefix.trim().ends_with(':') {
                if spans.get(idx + 1).is_some_and(|next| next.is_bold) {
                    continue;
                }
                let level = if input.features.bullet {
                    LevelUpdate::Set(HeadingLevel::H3)
                } else {
                    LevelUpdate::AtLeast(HeadingLevel::H2)
                };
                return RuleOutcome::structural(level, Some(prefix.trim().to_string()));
            }
        }

        RuleOutcome::NoMatch
    }
}

/// Rule 5: a short label before the first colon, when nothing else fired.
pub struct ColonSplitRule {
    new_item: Regex,
    max_label_words: usize,
}

impl ColonSplitRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            new_item: static_regex(NEW_ITEM_PATTERN),
            max_label_words: options.max_colon_label_words,
        }
    }
}

impl HeadingRule for ColonSplitRule {
    fn name(&self) -> &'static str {
        "colon-split"
    }

    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome {
        if state.potential {
            return RuleOutcome::NoMatch;
        }

        let text = input.features.text.as_str();
        let Some(colon) = text.find(':') else {
            return RuleOutcome::NoMatch;
        };

        let label = text[..colon].trim();
        let rest = text[colon + 1..].trim();
        if label.is_empty()
            || label.split_whitespace().count() >= self.max_label_words
            || rest.is_empty()
            || self.new_item.is_match(rest)
        {
            return RuleOutcome::NoMatch;
        }

        RuleOutcome::structural(
            LevelUpdate::Set(HeadingLevel::H3),
            Some(format!("{}:", label)),
        )
    }
}

/// Rule 6: theorem-style environments ("Theorem 2.4", "Proof:", "Lemma").
pub struct KeywordRule {
    keyword: Regex,
    max_words: usize,
}

impl KeywordRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            keyword: static_regex(concat!(
                r"^(?:theorem|definition|remark|example|conjecture|lemma|proof)",
                r"(?:\s+\d+(?:\.\d+)*.*|\s*:.*|\s*)$",
            )),
            max_words: options.max_keyword_words,
        }
    }
}

impl HeadingRule for KeywordRule {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome {
        let features = input.features;
        if state.potential || !self.keyword.is_match(&features.folded) {
            return RuleOutcome::NoMatch;
        }

        if features.any_bold || features.any_italic || features.word_count < self.max_words {
            RuleOutcome::structural(LevelUpdate::Set(HeadingLevel::H3), None)
        } else {
            RuleOutcome::NoMatch
        }
    }
}

/// Rule 7: veto weak candidates that only a font size vouches for.
pub struct AcceptanceRule {
    min_plain_size: f32,
    min_sentence_size: f32,
}

impl AcceptanceRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            min_plain_size: options.min_plain_heading_size,
            min_sentence_size: options.min_sentence_heading_size,
        }
    }
}

impl HeadingRule for AcceptanceRule {
    fn name(&self) -> &'static str {
        "acceptance"
    }

    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome {
        if !state.potential || state.authoritative {
            return RuleOutcome::NoMatch;
        }

        let features = input.features;
        if !features.any_bold && !features.has_item_prefix() && features.font_size < self.min_plain_size
        {
            return RuleOutcome::Reject;
        }

        if features.ends_with_period()
            && features.numbering.is_none()
            && features.font_size < self.min_sentence_size
            && !features.any_bold
        {
            return RuleOutcome::Reject;
        }

        RuleOutcome::NoMatch
    }
}

/// Rule 8: a bulleted H3 that is long, or that runs straight into a plain
/// continuation line, is body text.
pub struct BulletLookaheadRule {
    new_item: Regex,
    max_chars: usize,
}

impl BulletLookaheadRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            new_item: static_regex(NEW_ITEM_PATTERN),
            max_chars: options.max_bullet_heading_chars,
        }
    }
}

impl HeadingRule for BulletLookaheadRule {
    fn name(&self) -> &'static str {
        "bullet-lookahead"
    }

    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome {
        let features = input.features;
        if !state.potential
            || state.authoritative
            || !features.bullet
            || state.level != Some(HeadingLevel::H3)
        {
            return RuleOutcome::NoMatch;
        }

        if state.text_or(&features.text).chars().count() > self.max_chars {
            return RuleOutcome::Reject;
        }

        match input.next {
            Some(next)
                if next.top - features.bottom < features.font_size
                    && !next.any_bold
                    && !self.new_item.is_match(&next.text) =>
            {
                RuleOutcome::Reject
            }
            _ => RuleOutcome::NoMatch,
        }
    }
}

/// Rule 9: bold lines, or a leading bold run, that no other rule claimed.
pub struct BoldFallbackRule {
    max_line_chars: usize,
    max_sentence_chars: usize,
    max_run_words: usize,
    max_run_sentence_chars: usize,
}

impl BoldFallbackRule {
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            max_line_chars: options.max_bold_line_chars,
            max_sentence_chars: options.max_bold_sentence_chars,
            max_run_words: options.max_bold_run_words,
            max_run_sentence_chars: options.max_bold_run_sentence_chars,
        }
    }

    fn leading_bold_run(spans: &[Span]) -> Option<String> {
        let split = spans.iter().position(|span| !span.is_bold)?;
        if split == 0 {
            return None;
        }
        let run: String = spans[..split].iter().map(|span| span.text.as_str()).collect();
        if run.is_empty() {
            None
        } else {
            Some(run)
        }
    }
}

impl HeadingRule for BoldFallbackRule {
    fn name(&self) -> &'static str {
        "bold-fallback"
    }

    fn evaluate(&self, input: &RuleInput<'_>, state: &RuleState) -> RuleOutcome {
        let features = input.features;
        if state.potential || !features.any_bold {
            return RuleOutcome::NoMatch;
        }

        let h3 = LevelUpdate::Set(HeadingLevel::H3);

        if features.all_bold {
            let length = features.text.chars().count();
            let accepted = if features.ends_with_period() {
                length < self.max_sentence_chars
            } else {
                length < self.max_line_chars
            };
            return if accepted {
                RuleOutcome::matched(h3)
            } else {
                RuleOutcome::NoMatch
            };
        }

        let Some(run) = Self::leading_bold_run(input.spans) else {
            return RuleOutcome::NoMatch;
        };

        if run.split_whitespace().count() < self.max_run_words
            && (!run.trim().ends_with('.') || run.chars().count() < self.max_run_sentence_chars)
        {
            RuleOutcome::Match {
                level: h3,
                text: Some(run.trim().to_string()),
                authoritative: false,
            }
        } else {
            RuleOutcome::NoMatch
        }
    }
}

/// The rule engine: an ordered list of [`HeadingRule`]s folded per line.
pub struct HeadingClassifier {
    extractor: FeatureExtractor,
    rules: Vec<Box<dyn HeadingRule>>,
}

impl HeadingClassifier {
    /// Classifier with the standard nine rules in precedence order.
    pub fn new(options: &OutlineOptions) -> Self {
        let rules: Vec<Box<dyn HeadingRule>> = vec![
            Box::new(FontMapRule::new(options)),
            Box::new(NumberingRule::new(options)),
            Box::new(BulletRule),
            Box::new(BoldPrefixRule),
            Box::new(ColonSplitRule::new(options)),
            Box::new(KeywordRule::new(options)),
            Box::new(AcceptanceRule::new(options)),
            Box::new(BulletLookaheadRule::new(options)),
            Box::new(BoldFallbackRule::new(options)),
        ];
        Self::with_rules(rules)
    }

    /// Classifier with a custom rule list.
    pub fn with_rules(rules: Vec<Box<dyn HeadingRule>>) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            rules,
        }
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Fold every rule over one line.
    pub fn assess(&self, input: &RuleInput<'_>) -> RuleState {
        let mut state = RuleState::default();
        for rule in &self.rules {
            let outcome = rule.evaluate(input, &state);
            state.fold(rule.name(), outcome);
        }
        state
    }

    /// Heading candidates of one page's lines, in line order.
    pub fn classify_page(&self, lines: &[Line], font_map: &FontLevelMap) -> Vec<HeadingCandidate> {
        let features: Vec<LineFeatures> = lines
            .iter()
            .map(|line| self.extractor.extract(line))
            .collect();

        let mut headings = Vec::new();
        for (idx, (line, line_features)) in lines.iter().zip(&features).enumerate() {
            if line_features.text.is_empty() {
                continue;
            }

            let input = RuleInput {
                features: line_features,
                spans: line.spans(),
                next: features.get(idx + 1),
                font_map,
            };
            let state = self.assess(&input);

            if let (true, Some(level)) = (state.is_heading(), state.level) {
                log::trace!(
                    "Heading {} {:?} on page {} via {:?}",
                    level,
                    state.text_or(&line_features.text),
                    line_features.page,
                    state.matched
                );
                headings.push(HeadingCandidate::new(
                    level,
                    state.text_or(&line_features.text),
                    line_features.page,
                ));
            }
        }
        headings
    }
}
