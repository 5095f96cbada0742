//! Font-size clustering into heading levels.
//!
//! The distinct font sizes of a document are ranked once, after the title
//! size has been detected, and the resulting [`FontLevelMap`] is consulted
//! read-only by the heading rules.

use crate::model::{HeadingLevel, Span};

use super::options::OutlineOptions;

/// Quantization key for a rounded font size.
fn size_key(size: f32) -> i64 {
    (size * 100.0).round() as i64
}

/// Distinct font sizes observed across all pages, largest first.
pub fn distinct_font_sizes(pages: &[Vec<Span>]) -> Vec<f32> {
    let mut sizes: Vec<f32> = pages
        .iter()
        .flatten()
        .map(|span| span.font_size)
        .collect();
    sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sizes.dedup_by_key(|size| size_key(*size));
    sizes
}

/// Mapping from font size to heading level.
///
/// Entries are kept in level order (H1, H2, H3) and their sizes strictly
/// decrease.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontLevelMap {
    entries: Vec<(f32, HeadingLevel)>,
}

impl FontLevelMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from distinct font sizes.
    ///
    /// `excluded` is the title's font size; any size within the match
    /// tolerance of it is never mapped.
    pub fn build(sizes: &[f32], excluded: Option<f32>, options: &OutlineOptions) -> Self {
        let mut significant: Vec<f32> = sizes
            .iter()
            .copied()
            .filter(|size| *size >= options.significant_font_size)
            .collect();
        significant.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        significant.dedup_by_key(|size| size_key(*size));

        let is_excluded = |size: f32| {
            excluded
                .map(|title| (size - title).abs() < options.size_match_tolerance)
                .unwrap_or(false)
        };

        let mut h1: Option<f32> = None;
        let mut h2: Option<f32> = None;
        let mut h3: Option<f32> = None;

        for &size in &significant {
            if is_excluded(size) {
                continue;
            }

            match (h1, h2) {
                (None, _) => h1 = Some(size),
                (Some(top), None) if top - size >= options.min_h1_h2_gap => h2 = Some(size),
                (Some(_), Some(second)) if h3.is_none() && second - size >= options.min_h2_h3_gap => {
                    h3 = Some(size)
                }
                _ => {}
            }

            if h3.is_some() {
                break;
            }
        }

        // The first non-excluded size always lands in H1, so only the lower
        // levels need a gap-free fallback.
        if let (Some(top), None) = (h1, h2) {
            h2 = significant
                .iter()
                .copied()
                .find(|&size| size < top && !is_excluded(size));
        }
        if let (Some(top), Some(second), None) = (h1, h2, h3) {
            h3 = significant
                .iter()
                .copied()
                .find(|&size| size != top && size < second && !is_excluded(size));
        }

        let entries: Vec<(f32, HeadingLevel)> = [
            (h1, HeadingLevel::H1),
            (h2, HeadingLevel::H2),
            (h3, HeadingLevel::H3),
        ]
        .into_iter()
        .filter_map(|(size, level)| size.map(|s| (s, level)))
        .collect();

        log::debug!("Font level map: {:?} (title size {:?})", entries, excluded);

        Self { entries }
    }

    /// Heading level for a line's font size, checking H1 first.
    pub fn level_for(&self, size: f32, tolerance: f32) -> Option<HeadingLevel> {
        self.entries
            .iter()
            .find(|(mapped, _)| (size - mapped).abs() <= tolerance)
            .map(|(_, level)| *level)
    }

    /// Font size mapped to a level, if any.
    pub fn size_of(&self, level: HeadingLevel) -> Option<f32> {
        self.entries
            .iter()
            .find(|(_, l)| *l == level)
            .map(|(size, _)| *size)
    }

    /// Whether a size is a key of the map.
    pub fn contains_size(&self, size: f32) -> bool {
        self.entries
            .iter()
            .any(|(mapped, _)| size_key(*mapped) == size_key(size))
    }

    /// The `(size, level)` entries in level order.
    pub fn entries(&self) -> &[(f32, HeadingLevel)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
