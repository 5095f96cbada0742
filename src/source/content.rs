//! Content-stream walker.
//!
//! Interprets the text and graphics-state operators of one page and emits a
//! [`TextRun`] per text-showing operation, positioned in PDF user space
//! (origin bottom-left, y growing upward).

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::backend::{get_number_from_value, BackendFontInfo, ContentOp, PdfValue};

/// Font size assumed before any `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;
/// Glyph width (thousandths of text space) when the font has no metrics.
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;
/// TJ adjustments larger than this (thousandths) are word gaps.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// An affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(get_number_from_value)
            .collect::<Option<_>>()?;
        Some(Self::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Length of the transformed unit y vector.
    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Text shown by one operator, in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Decoded, NFC-normalized text (not trimmed)
    pub text: String,
    /// Start of the baseline
    pub x: f32,
    pub baseline: f32,
    /// Advance along the baseline
    pub width: f32,
    /// Effective size after the text and graphics transforms
    pub font_size: f32,
    /// Font resource name
    pub font: Vec<u8>,
    pub is_bold: bool,
    pub is_italic: bool,
}

/// Graphics-state parameters saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
        }
    }
}

/// Walks the operations of one page.
pub struct ContentWalker<'a, D>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    fonts: &'a HashMap<Vec<u8>, BackendFontInfo>,
    decode: D,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    runs: Vec<TextRun>,
}

impl<'a, D> ContentWalker<'a, D>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    /// `decode(font_name, bytes)` turns shown bytes into text.
    pub fn new(fonts: &'a HashMap<Vec<u8>, BackendFontInfo>, decode: D) -> Self {
        Self {
            fonts,
            decode,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            runs: Vec::new(),
        }
    }

    /// Interpret all operations and return the text runs in stream order.
    pub fn walk(mut self, ops: &[ContentOp]) -> Vec<TextRun> {
        for op in ops {
            self.apply(op);
        }
        self.runs
    }

    fn number(op: &ContentOp, idx: usize) -> Option<f32> {
        op.operands.get(idx).and_then(get_number_from_value)
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = name.clone();
                }
                if let Some(size) = Self::number(op, 1) {
                    self.state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = Self::number(op, 0) {
                    self.state.leading = leading;
                }
            }
            "Tc" => {
                if let Some(spacing) = Self::number(op, 0) {
                    self.state.char_spacing = spacing;
                }
            }
            "Tw" => {
                if let Some(spacing) = Self::number(op, 0) {
                    self.state.word_spacing = spacing;
                }
            }
            "Tz" => {
                if let Some(scale) = Self::number(op, 0) {
                    self.state.horizontal_scale = scale / 100.0;
                }
            }
            "Td" | "TD" => {
                let tx = Self::number(op, 0).unwrap_or(0.0);
                let ty = Self::number(op, 1).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.state.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(value @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(value));
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(value @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(value));
                }
            }
            "\"" => {
                if let Some(aw) = Self::number(op, 0) {
                    self.state.word_spacing = aw;
                }
                if let Some(ac) = Self::number(op, 1) {
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(value @ PdfValue::Str(_)) = op.operands.get(2) {
                    self.show(std::slice::from_ref(value));
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Advance of a string in unscaled text space.
    fn advance(&self, font: Option<&BackendFontInfo>, bytes: &[u8]) -> f32 {
        let size = self.state.font_size;
        let two_byte = font.map_or(false, |f| f.two_byte);

        let codes: Vec<u32> = if two_byte {
            bytes
                .chunks(2)
                .map(|c| c.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
                .collect()
        } else {
            bytes.iter().map(|b| *b as u32).collect()
        };

        codes
            .iter()
            .map(|&code| {
                let width = font
                    .and_then(|f| f.glyph_width(code))
                    .unwrap_or(DEFAULT_GLYPH_WIDTH);
                let word = if !two_byte && code == 32 {
                    self.state.word_spacing
                } else {
                    0.0
                };
                (width / 1000.0 * size + self.state.char_spacing + word)
                    * self.state.horizontal_scale
            })
            .sum()
    }

    fn translate_text(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    /// Show strings and TJ adjustments as a single run.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let fonts = self.fonts;
        let font = fonts.get(&self.state.font);
        let start = self.text_matrix.multiply(&self.state.ctm);
        let mut text = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    text.push_str(&(self.decode)(&self.state.font, bytes));
                    let tx = self.advance(font, bytes);
                    self.translate_text(tx);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = get_number_from_value(item).unwrap_or(0.0);
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && text
                            .chars()
                            .last()
                            .map_or(false, |c| !c.is_whitespace() && !is_spaceless_script_char(c))
                    {
                        text.push(' ');
                    }
                    let tx = -adjustment / 1000.0
                        * self.state.font_size
                        * self.state.horizontal_scale;
                    self.translate_text(tx);
                }
                _ => {}
            }
        }

        if text.trim().is_empty() {
            return;
        }

        let end = self.text_matrix.multiply(&self.state.ctm);
        let (x, baseline) = start.apply(0.0, 0.0);
        let (end_x, _) = end.apply(0.0, 0.0);

        self.runs.push(TextRun {
            text: text.nfc().collect(),
            x: x.min(end_x),
            baseline,
            width: (end_x - x).abs(),
            font_size: self.state.font_size * start.vertical_scale(),
            font: self.state.font.clone(),
            is_bold: font.map_or(false, |f| f.is_bold()),
            is_italic: font.map_or(false, |f| f.is_italic()),
        });
    }
}

/// Scripts written without spaces between words (Chinese, Japanese).
///
/// Hangul is not included: Korean uses word spaces.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}
