//! Reading-order layout of text runs.
//!
//! Converts the user-space [`TextRun`]s of one page into top-down [`Span`]s:
//! runs are split into columns, grouped into visual lines by baseline,
//! adjacent runs with the same style are merged into one span, and every span
//! carries the extents of its line.

use crate::model::{BBox, Span};

use super::content::{is_spaceless_script_char, TextRun};

/// Ascender share of the font size above the baseline.
const ASCENT: f32 = 0.8;
/// Descender share of the font size below the baseline.
const DESCENT: f32 = 0.2;
/// Runs on one line may differ in baseline by this share of their size.
const BASELINE_TOLERANCE: f32 = 0.3;

/// A run placed in top-down page coordinates.
#[derive(Debug, Clone)]
struct PlacedRun {
    run: TextRun,
    bbox: BBox,
    /// Baseline distance from the page top
    baseline: f32,
}

impl PlacedRun {
    fn place(run: TextRun, page_box: &BBox) -> Self {
        let size = run.font_size;
        let width = if run.width > 0.0 {
            run.width
        } else {
            run.text.chars().count() as f32 * size * 0.5
        };
        let x0 = run.x - page_box.x0;
        let baseline = page_box.y1 - run.baseline;
        let bbox = BBox::new(x0, baseline - size * ASCENT, x0 + width, baseline + size * DESCENT);
        Self {
            run,
            bbox,
            baseline,
        }
    }

    fn center(&self) -> f32 {
        (self.bbox.x0 + self.bbox.x1) / 2.0
    }

    fn same_style(&self, other: &PlacedRun) -> bool {
        self.run.font == other.run.font
            && (self.run.font_size - other.run.font_size).abs() < 0.01
            && self.run.is_bold == other.run.is_bold
            && self.run.is_italic == other.run.is_italic
    }
}

/// A vertical band of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
}

impl Column {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Lay out one page's runs as spans in reading order.
///
/// With `detect_columns`, a page with a clear central gutter is read column
/// by column; otherwise all runs are read top to bottom.
pub fn layout_page(runs: Vec<TextRun>, page_box: &BBox, page: u32, detect_columns: bool) -> Vec<Span> {
    let placed: Vec<PlacedRun> = runs
        .into_iter()
        .map(|run| PlacedRun::place(run, page_box))
        .collect();

    // Runs placed off the page only count at the page edge
    let page_width = page_box.width().max(0.0);
    let extents: Vec<(f32, f32)> = placed
        .iter()
        .map(|r| {
            (
                r.bbox.x0.clamp(0.0, page_width),
                r.bbox.x1.clamp(0.0, page_width),
            )
        })
        .collect();
    let columns = if detect_columns {
        find_columns(&extents)
    } else {
        Vec::new()
    };

    let mut buckets: Vec<Vec<PlacedRun>> = vec![Vec::new(); columns.len().max(1)];
    for run in placed {
        let idx = columns
            .iter()
            .position(|c| c.contains(run.bbox.x0) || c.contains(run.center()))
            .unwrap_or(0);
        buckets[idx].push(run);
    }

    buckets
        .into_iter()
        .flat_map(group_lines)
        .flat_map(|line| line_spans(line, page))
        .collect()
}

/// Group runs into lines by baseline, top to bottom.
fn group_lines(mut runs: Vec<PlacedRun>) -> Vec<Vec<PlacedRun>> {
    runs.sort_by(|a, b| {
        a.baseline
            .partial_cmp(&b.baseline)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut lines: Vec<Vec<PlacedRun>> = Vec::new();
    let mut current: Vec<PlacedRun> = Vec::new();
    let mut current_baseline = 0.0_f32;

    for run in runs {
        let tolerance = run.run.font_size * BASELINE_TOLERANCE;
        if !current.is_empty() && (run.baseline - current_baseline).abs() > tolerance {
            lines.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            current_baseline = run.baseline;
        }
        current.push(run);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    for line in &mut lines {
        line.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    lines
}

/// Whether a space belongs between two adjacent runs.
fn needs_space(prev: &PlacedRun, next: &PlacedRun) -> bool {
    let gap = next.bbox.x0 - prev.bbox.x1;
    let chars = next.run.text.chars().count();
    let avg_char_width = if chars > 0 && next.bbox.width() > 0.0 {
        next.bbox.width() / chars as f32
    } else {
        next.run.font_size * 0.5
    };

    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_last = prev.run.text.chars().last();
    let next_first = next.run.text.chars().next();
    let both_spaceless = prev_last.map_or(false, is_spaceless_script_char)
        && next_first.map_or(false, is_spaceless_script_char);
    let has_space = prev_last.map_or(false, char::is_whitespace)
        || next_first.map_or(false, char::is_whitespace);

    !both_spaceless && !has_space
}

/// Merge a line's runs into styled spans and stamp the line extents.
fn line_spans(line: Vec<PlacedRun>, page: u32) -> Vec<Span> {
    let mut merged: Vec<PlacedRun> = Vec::new();

    for run in line {
        match merged.last_mut() {
            Some(prev) if prev.same_style(&run) => {
                if needs_space(prev, &run) {
                    prev.run.text.push(' ');
                }
                prev.run.text.push_str(&run.run.text);
                prev.bbox = prev.bbox.union(&run.bbox);
            }
            _ => merged.push(run),
        }
    }

    let spans: Vec<Span> = merged
        .into_iter()
        .filter_map(|placed| {
            let text = placed.run.text.trim();
            if text.is_empty() {
                return None;
            }
            let mut span = Span::new(text, placed.run.font_size, page)
                .at(placed.bbox.x0, placed.bbox.y0, placed.bbox.x1, placed.bbox.y1);
            span.is_bold = placed.run.is_bold;
            span.is_italic = placed.run.is_italic;
            Some(span)
        })
        .collect();

    let Some(line_bbox) = spans.iter().map(|s| s.bbox).reduce(|a, b| a.union(&b)) else {
        return spans;
    };

    spans
        .into_iter()
        .map(|span| span.with_line_bbox(line_bbox))
        .collect()
}

/// Detect a two-column layout from horizontal run extents.
///
/// Looks for the widest empty vertical band between 15% and 85% of the text
/// width. Returns an empty list for single-column pages, and for extents
/// wider than the largest page a PDF can describe.
pub fn find_columns(extents: &[(f32, f32)]) -> Vec<Column> {
    const SLICE_WIDTH: f32 = 3.0;
    const MIN_PAGE_WIDTH: f32 = 250.0;
    const MAX_PAGE_WIDTH: f32 = 14_400.0;
    const MIN_CANDIDATE_GAP: f32 = 10.0;
    const MIN_GUTTER: f32 = 12.0;
    const MIN_COLUMN_WIDTH: f32 = 80.0;

    let Some(min_x) = extents.iter().map(|e| e.0).reduce(f32::min) else {
        return Vec::new();
    };
    let max_x = extents.iter().map(|e| e.1).fold(min_x, f32::max);
    let width = max_x - min_x;
    if !width.is_finite() || width < MIN_PAGE_WIDTH {
        return Vec::new();
    }
    if width > MAX_PAGE_WIDTH {
        log::debug!("Text spans {:.0}pt, skipping column detection", width);
        return Vec::new();
    }

    let slices = (width / SLICE_WIDTH) as usize + 1;
    let mut occupancy = vec![0usize; slices];
    for &(x0, x1) in extents {
        let start = ((x0 - min_x) / SLICE_WIDTH) as usize;
        let end = (((x1 - min_x) / SLICE_WIDTH) as usize).min(slices - 1);
        for slot in occupancy.iter_mut().take(end + 1).skip(start) {
            *slot += 1;
        }
    }

    // (start slice, length) of the preferred gap
    let center = slices / 2;
    let mut best: Option<(usize, usize, usize)> = None;
    let mut consider = |start: usize, len: usize| {
        let gap_width = len as f32 * SLICE_WIDTH;
        if gap_width < MIN_CANDIDATE_GAP {
            return;
        }
        let dist = (start + len / 2).abs_diff(center);
        let better = match best {
            None => true,
            Some((_, best_len, best_dist)) => {
                let best_width = best_len as f32 * SLICE_WIDTH;
                gap_width > best_width * 1.5 || (gap_width >= best_width * 0.7 && dist < best_dist)
            }
        };
        if better {
            best = Some((start, len, dist));
        }
    };

    let mut run_start = 0;
    let mut run_len = 0;
    for (i, &count) in occupancy
        .iter()
        .enumerate()
        .take(slices * 85 / 100)
        .skip(slices * 15 / 100)
    {
        if count == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
        } else if run_len > 0 {
            consider(run_start, run_len);
            run_len = 0;
        }
    }
    if run_len > 0 {
        consider(run_start, run_len);
    }

    let Some((start, len, _)) = best else {
        return Vec::new();
    };
    if (len as f32 * SLICE_WIDTH) < MIN_GUTTER {
        return Vec::new();
    }

    let gutter = min_x + (start as f32 + len as f32 / 2.0) * SLICE_WIDTH;
    if gutter - min_x < MIN_COLUMN_WIDTH || max_x - gutter < MIN_COLUMN_WIDTH {
        log::debug!("Column too narrow, treating as single column");
        return Vec::new();
    }

    let left = extents
        .iter()
        .filter(|(x0, x1)| (x0 + x1) / 2.0 < gutter)
        .count();
    let right = extents.len() - left;
    let min_runs = (extents.len() / 10).max(2);
    if left < min_runs || right < min_runs {
        log::debug!("Runs too imbalanced ({} / {}), treating as single column", left, right);
        return Vec::new();
    }

    log::debug!("Two columns split at x={:.1}", gutter);
    vec![
        Column {
            left: min_x - 10.0,
            right: gutter,
        },
        Column {
            left: gutter,
            right: max_x + 10.0,
        },
    ]
}
