//! Synthetic PDFs for integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text placed at a baseline in PDF user space.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: &'static str,
    pub x: i64,
    pub y: i64,
    pub size: i64,
    pub bold: bool,
}

pub fn line(text: &'static str, x: i64, y: i64, size: i64) -> TextLine {
    TextLine {
        text,
        x,
        y,
        size,
        bold: false,
    }
}

pub fn bold(text: &'static str, x: i64, y: i64, size: i64) -> TextLine {
    TextLine {
        bold: true,
        ..line(text, x, y, size)
    }
}

/// Build a US Letter PDF with one content stream per page.
///
/// `F1` is Helvetica and `F2` is Helvetica-Bold. The MediaBox sits on the
/// page tree root, so pages inherit it.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for text_line in lines {
            let font = if text_line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(text_line.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(text_line.x), Object::Integer(text_line.y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(text_line.text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let data = content.encode().expect("content encodes");
        let content_id = doc.add_object(Stream::new(dictionary! {}, data));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// Write a synthetic PDF to `path`.
pub fn write_pdf(path: &Path, pages: &[Vec<TextLine>]) {
    std::fs::write(path, build_pdf(pages)).expect("pdf written");
}

/// A two-page paper with a title, numbered sections, and a page footer.
pub fn paper() -> Vec<Vec<TextLine>> {
    vec![
        vec![
            bold("Sparse Edge Ideals", 72, 720, 24),
            bold("1. Introduction", 72, 640, 16),
            line("We study edge ideals of graphs.", 72, 620, 10),
            bold("1.1 Motivation", 72, 580, 13),
            line("Sparse graphs are common in practice.", 72, 560, 10),
        ],
        vec![
            bold("2. Results", 72, 700, 16),
            line("Our main theorem is stated below.", 72, 680, 10),
            line("Page 2 of 2", 280, 40, 9),
        ],
    ]
}
