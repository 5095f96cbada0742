//! Document title detection from the first page.

use crate::model::{BBox, Span, UNTITLED};

use super::options::OutlineOptions;

/// The detected title together with the geometry used to exclude it from
/// heading detection.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleInfo {
    /// Title text, or [`UNTITLED`]
    pub text: String,
    /// Largest font size on the first page
    pub font_size: Option<f32>,
    /// Union of the merged title spans
    pub bbox: Option<BBox>,
}

impl TitleInfo {
    /// No title could be found.
    pub fn untitled() -> Self {
        Self {
            text: UNTITLED.to_string(),
            font_size: None,
            bbox: None,
        }
    }

    /// Whether a title region was located on the page.
    pub fn is_detected(&self) -> bool {
        self.bbox.is_some()
    }
}

/// Detect the title from the spans of the first page.
///
/// All spans set in the page's largest font are ordered top-down and
/// merged while each one starts within `factor × font size` of the previous
/// one's bottom edge. Merging stops at the first larger gap. Byline-looking
/// results ("author", "presented at") are kept as they are.
pub fn detect_title(first_page: &[Span], options: &OutlineOptions) -> TitleInfo {
    let max_size = first_page
        .iter()
        .map(|span| span.font_size)
        .fold(0.0_f32, f32::max);

    if max_size <= 0.0 {
        return TitleInfo::untitled();
    }

    let mut candidates: Vec<&Span> = first_page
        .iter()
        .filter(|span| (span.font_size - max_size).abs() < options.size_match_tolerance)
        .collect();
    candidates.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut parts: Vec<&str> = Vec::new();
    let mut title_bbox: Option<BBox> = None;
    let mut last_bottom = 0.0_f32;

    for span in candidates {
        if let Some(bbox) = title_bbox {
            if span.bbox.y0 - last_bottom >= span.font_size * options.title_contiguity_factor {
                break;
            }
            title_bbox = Some(bbox.union(&span.bbox));
        } else {
            title_bbox = Some(span.bbox);
        }
        parts.push(span.text.as_str());
        last_bottom = span.bbox.y1;
    }

    let text = parts.join(" ").trim().to_string();
    log::debug!("Detected title {:?} at size {}", text, max_size);

    TitleInfo {
        text: if text.is_empty() {
            UNTITLED.to_string()
        } else {
            text
        },
        font_size: Some(max_size),
        bbox: title_bbox,
    }
}

/// Drop first-page spans that belong to the title region.
///
/// A span overlapping the title box is kept only when its size differs from
/// the title size and it does not itself enclose the title box.
pub fn exclude_title_region(
    first_page: Vec<Span>,
    title: &TitleInfo,
    options: &OutlineOptions,
) -> Vec<Span> {
    let (Some(title_bbox), Some(title_size)) = (title.bbox, title.font_size) else {
        return first_page;
    };

    first_page
        .into_iter()
        .filter(|span| {
            !span.bbox.intersects(&title_bbox)
                || ((span.font_size - title_size).abs() > options.size_match_tolerance
                    && !span
                        .bbox
                        .almost_contains(&title_bbox, options.title_containment_slack))
        })
        .collect()
}
