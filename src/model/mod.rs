//! Data model shared by the span source and the outline pipeline.
//!
//! Spans are produced once by a [`crate::source::SpanSource`] and never
//! mutated afterwards. The outline types are the final output artifact.

mod outline;
mod span;

pub use outline::{HeadingCandidate, HeadingLevel, OutlineDocument, UNTITLED};
pub use span::{round_font_size, BBox, Span};
