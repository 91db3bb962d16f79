//! PDF serialization of an [`ExportDocument`] with `lopdf`.
//!
//! Only the standard Type1 fonts are used, so nothing is embedded. Text is
//! written with WinAnsi encoding and every line is placed on its own, long
//! lines are not re-wrapped.

use super::{Block, ExportDocument, ExportError};
use crate::RecognitionMode;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 72.0;
pub const TITLE_SIZE: f32 = 16.0;
const LINE_SPACING: f32 = 1.4;

const TITLE_FONT: &str = "F1";
const BODY_FONT: &str = "F2";

/// Fonts and sizes of an exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStyle {
    pub title_font: &'static str,
    pub body_font: &'static str,
    pub title_size: f32,
    pub body_size: f32,
}

impl PdfStyle {
    /// Formulas are set in a math-oriented face, everything else in a
    /// general-purpose one.
    pub fn for_mode(mode: RecognitionMode, body_size: f32) -> Self {
        Self {
            title_font: "Helvetica-Bold",
            body_font: if mode.is_math_oriented() {
                "Times-Italic"
            } else {
                "Helvetica"
            },
            title_size: TITLE_SIZE,
            body_size,
        }
    }
}

#[derive(Debug)]
struct PlacedLine<'a> {
    font: &'static str,
    size: f32,
    baseline: f32,
    text: &'a str,
}

/// Serialize `document` into the bytes of a PDF 1.5 file.
pub fn write_pdf(document: &ExportDocument, style: &PdfStyle) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let title_font_id = doc.add_object(type1_font(style.title_font));
    let body_font_id = doc.add_object(type1_font(style.body_font));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            TITLE_FONT => title_font_id,
            BODY_FONT => body_font_id,
        },
    });

    let blocks = document.blocks();
    let pages = layout(&blocks, style);
    let mut page_ids = Vec::with_capacity(pages.len());

    for page in &pages {
        let content: Content<Vec<Operation>> = Content {
            operations: page.iter().flat_map(show_text).collect(),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&document.title)),
        "Producer" => Object::string_literal("mathpipe"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    tracing::debug!(pages = pages.len(), size = bytes.len(), "Wrote PDF");

    Ok(bytes)
}

fn type1_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Place every block top-down, starting a new page when a line would cross
/// the bottom margin.
fn layout<'a>(blocks: &[Block<'a>], style: &PdfStyle) -> Vec<Vec<PlacedLine<'a>>> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut cursor = top;

    for block in blocks {
        let (font, size, text) = match block {
            Block::Title(text) => (TITLE_FONT, style.title_size, *text),
            Block::Text(text) => (BODY_FONT, style.body_size, *text),
            Block::Blank => (BODY_FONT, style.body_size, ""),
        };
        let leading = size * LINE_SPACING;

        if cursor - leading < MARGIN && cursor < top {
            pages.push(std::mem::take(&mut current));
            cursor = top;
        }

        current.push(PlacedLine {
            font,
            size,
            baseline: cursor - size,
            text,
        });
        cursor -= leading;
    }

    pages.push(current);
    pages
}

fn show_text(line: &PlacedLine<'_>) -> Vec<Operation> {
    if line.text.trim().is_empty() {
        return Vec::new();
    }
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![line.font.into(), line.size.into()]),
        Operation::new("Td", vec![MARGIN.into(), line.baseline.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(line.text),
                StringFormat::Literal,
            )],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Encode `text` for the WinAnsi standard fonts.
///
/// Latin-1 printable characters map to their code point, tabs become spaces
/// and anything else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x09 => b' ',
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}
