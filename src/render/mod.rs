//! Rendering of outline documents to their output formats.

mod json;

pub use json::{spans_to_json, to_json, JsonFormat};
