//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the handful of PDF operations the
//! span source needs, isolating the concrete PDF library (lopdf) from the
//! content-stream walker.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::BBox;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// FontDescriptor flag bit for italic fonts.
const FLAG_ITALIC: i64 = 1 << 6;
/// FontDescriptor flag bit for synthetic bold.
const FLAG_FORCE_BOLD: i64 = 1 << 18;

/// US Letter, used when a page tree carries no MediaBox at all.
pub const DEFAULT_PAGE_BOX: BBox = BBox {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// Font information returned by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// FontDescriptor `Flags`, 0 when absent.
    pub flags: i64,
    /// Composite (Type0) fonts use two-byte character codes.
    pub two_byte: bool,
    /// `FirstChar` of the `Widths` array.
    pub first_char: u32,
    /// Glyph widths in thousandths of text space.
    pub widths: Vec<f32>,
    /// `MissingWidth` from the descriptor, 0 when absent.
    pub missing_width: f32,
}

impl BackendFontInfo {
    /// Font info known only by name, as for the standard 14 fonts.
    pub fn named(name: &[u8], base_font: &str) -> Self {
        Self {
            name: name.to_vec(),
            base_font: base_font.to_string(),
            ..Self::default()
        }
    }

    pub fn is_bold(&self) -> bool {
        let lower = self.base_font.to_lowercase();
        lower.contains("bold")
            || lower.contains("black")
            || lower.contains("heavy")
            || self.flags & FLAG_FORCE_BOLD != 0
    }

    pub fn is_italic(&self) -> bool {
        let lower = self.base_font.to_lowercase();
        lower.contains("italic") || lower.contains("oblique") || self.flags & FLAG_ITALIC != 0
    }

    /// Width of a character code in thousandths of text space, if known.
    pub fn glyph_width(&self, code: u32) -> Option<f32> {
        code.checked_sub(self.first_char)
            .and_then(|idx| self.widths.get(idx as usize).copied())
            .filter(|w| *w > 0.0)
            .or((self.missing_width > 0.0).then_some(self.missing_width))
    }
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, font info, page geometry,
/// content stream decoding, and text decoding without exposing any concrete
/// PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the page's MediaBox in PDF user space (y grows upward).
    fn page_box(&self, page: PageId) -> Result<BBox>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend — concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Self { doc }
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Follow a single level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).and_then(|o| o.as_dict().ok())
    }

    fn number(&self, obj: &Object) -> Option<f32> {
        match self.resolve(obj)? {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Walk up the page tree to find the MediaBox array.
    fn find_media_box(&self, dict: &Dictionary, depth: usize) -> Option<BBox> {
        if let Some(values) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
        {
            let nums: Vec<f32> = values.iter().filter_map(|v| self.number(v)).collect();
            if nums.len() >= 4 {
                return Some(BBox::new(
                    nums[0].min(nums[2]),
                    nums[1].min(nums[3]),
                    nums[0].max(nums[2]),
                    nums[1].max(nums[3]),
                ));
            }
        }

        // Guard against cyclic Parent links in broken files.
        if depth > 32 {
            return None;
        }

        dict.get(b"Parent")
            .ok()
            .and_then(|parent| self.resolve_dict(parent))
            .and_then(|parent| self.find_media_box(parent, depth + 1))
    }

    fn font_info(&self, name: &[u8], font: &Dictionary) -> BackendFontInfo {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let two_byte = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|subtype| subtype == b"Type0")
            .unwrap_or(false);

        let descriptor = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d));

        let flags = descriptor
            .and_then(|d| d.get(b"Flags").ok())
            .and_then(|f| self.number(f))
            .map(|f| f as i64)
            .unwrap_or(0);

        let missing_width = descriptor
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|w| self.number(w))
            .unwrap_or(0.0);

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|f| self.number(f))
            .map(|f| f.max(0.0) as u32)
            .unwrap_or(0);

        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|w| self.resolve(w))
            .and_then(|w| w.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|v| self.number(v).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();

        BackendFontInfo {
            name: name.to_vec(),
            base_font,
            flags,
            two_byte,
            first_char,
            widths,
            missing_width,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(lopdf_fonts
            .iter()
            .map(|(name, font_dict)| self.font_info(name, font_dict))
            .collect())
    }

    fn page_box(&self, page: PageId) -> Result<BBox> {
        let page_dict = self
            .doc
            .get_dictionary(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(self.find_media_box(page_dict, 0).unwrap_or_else(|| {
            log::debug!("No MediaBox for page {:?}, assuming US Letter", page);
            DEFAULT_PAGE_BOX
        }))
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                // Unfiltered streams fail to "decompress"; use them raw
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

impl LopdfBackend {
    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Some(Object::Stream(s)) = self.resolve(obj) {
                match s.decompressed_content() {
                    Ok(data) => content.extend_from_slice(&data),
                    Err(_) => content.extend_from_slice(&s.content),
                }
                content.push(b' ');
            }
        }
        content
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x61, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Haé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(2.5)), Some(2.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_font_style_from_name() {
        assert!(BackendFontInfo::named(b"F1", "Helvetica-Bold").is_bold());
        assert!(BackendFontInfo::named(b"F1", "ABCDEF+Arial-BlackItalic").is_bold());
        assert!(BackendFontInfo::named(b"F1", "Times-Oblique").is_italic());
        assert!(!BackendFontInfo::named(b"F1", "Times-Roman").is_bold());
    }

    #[test]
    fn test_font_style_from_flags() {
        let font = BackendFontInfo {
            flags: FLAG_FORCE_BOLD | FLAG_ITALIC,
            ..BackendFontInfo::named(b"F1", "CMR10")
        };
        assert!(font.is_bold());
        assert!(font.is_italic());
    }

    #[test]
    fn test_glyph_width() {
        let font = BackendFontInfo {
            first_char: 32,
            widths: vec![250.0, 0.0, 500.0],
            missing_width: 300.0,
            ..BackendFontInfo::named(b"F1", "X")
        };
        assert_eq!(font.glyph_width(32), Some(250.0));
        // Zero width falls back to MissingWidth
        assert_eq!(font.glyph_width(33), Some(300.0));
        assert_eq!(font.glyph_width(34), Some(500.0));
        assert_eq!(font.glyph_width(10), Some(300.0));
        assert_eq!(BackendFontInfo::named(b"F1", "X").glyph_width(65), None);
    }

    #[test]
    fn test_load_garbage_fails() {
        assert!(LopdfBackend::load_bytes(b"not a pdf").is_err());
    }
}
