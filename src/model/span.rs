//! Positioned, font-annotated text spans.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates.
///
/// Coordinates are top-down: `y0` is the top edge and grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// A box with no area.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether the two boxes share interior area.
    pub fn intersects(&self, other: &BBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Whether `other` lies inside this box, allowing `tolerance` points of
    /// overhang on every edge.
    pub fn almost_contains(&self, other: &BBox, tolerance: f32) -> bool {
        other.x0 >= self.x0 - tolerance
            && other.y0 >= self.y0 - tolerance
            && other.x1 <= self.x1 + tolerance
            && other.y1 <= self.y1 + tolerance
    }
}

/// Round a font size to two decimals so that sizes group consistently.
pub fn round_font_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}

/// A contiguous run of text sharing one font and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Trimmed text content
    pub text: String,
    /// Font size in points, rounded to 2 decimals
    pub font_size: f32,
    /// Bold weight (font name or descriptor flag)
    pub is_bold: bool,
    /// Italic style (font name or descriptor flag)
    pub is_italic: bool,
    /// Span bounding box
    pub bbox: BBox,
    /// 1-based page number
    pub page: u32,
    /// Extents of the visual line the source placed this span on
    pub line_bbox: BBox,
}

impl Span {
    /// Create a span with a zero-sized box at the page origin.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size: round_font_size(font_size),
            is_bold: false,
            is_italic: false,
            bbox: BBox::default(),
            page,
            line_bbox: BBox::default(),
        }
    }

    /// Mark the span bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the span italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Place the span; the line extents default to the span's own box.
    pub fn at(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.bbox = BBox::new(x0, y0, x1, y1);
        self.line_bbox = self.bbox;
        self
    }

    /// Override the extents of the containing line.
    pub fn with_line_bbox(mut self, line_bbox: BBox) -> Self {
        self.line_bbox = line_bbox;
        self
    }

    pub fn line_x0(&self) -> f32 {
        self.line_bbox.x0
    }

    pub fn line_y0(&self) -> f32 {
        self.line_bbox.y0
    }

    pub fn line_x1(&self) -> f32 {
        self.line_bbox.x1
    }

    pub fn line_y1(&self) -> f32 {
        self.line_bbox.y1
    }
}
