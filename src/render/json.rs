//! JSON rendering for outlines and diagnostic span dumps.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{OutlineDocument, Span};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert an outline document to JSON.
///
/// Non-ASCII text is written literally, never `\u` escaped.
pub fn to_json(doc: &OutlineDocument, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Dump extracted spans, one array per page.
pub fn spans_to_json(pages: &[Vec<Span>], format: JsonFormat) -> Result<String> {
    serialize(pages, format)
}
