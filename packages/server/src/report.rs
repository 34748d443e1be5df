//! PDF report for one batch summary.
//!
//! Rendering happens in two steps: [`render_at`] lays the summary out as a
//! list of draw operations per page, and [`Report::to_pdf`] encodes those
//! pages with the standard Helvetica fonts. Keeping layout separate lets the
//! row budget and number formatting be checked without decoding PDF.

use chrono::{Local, NaiveDateTime};
use common::equipment::{FLOW_UNIT, PRESSURE_UNIT};
use common::format::{flow_display, pressure_display};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;

use crate::aggregate::Summary;

pub const TITLE: &str = "Chemical Equipment Report";

/// US Letter, in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_X: i64 = 50;
/// Table rows stop once the baseline would drop below this.
const BOTTOM_MARGIN: i64 = 50;
const ROW_HEIGHT: i64 = 20;

const COL_TYPE_X: i64 = 250;
const COL_FLOW_X: i64 = 400;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Black,
    Blue,
}

impl Stroke {
    fn rgb(self) -> [i64; 3] {
        match self {
            Stroke::Black => [0, 0, 0],
            Stroke::Blue => [0, 0, 1],
        }
    }
}

/// A single drawing primitive. Coordinates are PDF points from the bottom-left.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: i64,
        y: i64,
        font: Font,
        size: i64,
        text: String,
    },
    Rect {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        stroke: Stroke,
    },
    Line {
        from: (i64, i64),
        to: (i64, i64),
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    fn text(&mut self, x: i64, y: i64, font: Font, size: i64, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            font,
            size,
            text: text.into(),
        });
    }

    /// Strings drawn on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Maximum number of records listed in the table.
    pub max_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { max_rows: 20 }
    }
}

/// A laid-out report, one entry per page.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub pages: Vec<Page>,
    /// Number of records that made it into the table.
    pub rows_rendered: usize,
}

/// Lay out `summary` with the current local time as the generation stamp.
pub fn render(summary: &Summary, source_name: &str, options: ReportOptions) -> Report {
    render_at(summary, source_name, Local::now().naive_local(), options)
}

pub fn render_at(
    summary: &Summary,
    source_name: &str,
    generated_at: NaiveDateTime,
    options: ReportOptions,
) -> Report {
    let mut page = Page::default();
    let top = PAGE_HEIGHT;

    page.text(MARGIN_X, top - 50, Font::Bold, 20, TITLE);
    page.text(
        MARGIN_X,
        top - 80,
        Font::Regular,
        12,
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
    );
    page.text(
        MARGIN_X,
        top - 100,
        Font::Regular,
        12,
        format!("Source File: {source_name}"),
    );

    // Stats panel
    page.ops.push(DrawOp::Rect {
        x: MARGIN_X,
        y: top - 180,
        width: 500,
        height: 60,
        stroke: Stroke::Blue,
    });
    let avg_flow = summary
        .avg_flow
        .map(|v| flow_display(v).to_string())
        .unwrap_or_else(|| "n/a".into());
    let avg_pressure = summary
        .avg_pressure
        .map(pressure_display)
        .unwrap_or_else(|| "n/a".into());
    page.text(
        70,
        top - 140,
        Font::Regular,
        12,
        format!("Total Units: {}", summary.count),
    );
    page.text(
        200,
        top - 140,
        Font::Regular,
        12,
        format!("Avg Flowrate: {avg_flow} {FLOW_UNIT}"),
    );
    page.text(
        COL_FLOW_X,
        top - 140,
        Font::Regular,
        12,
        format!("Avg Pressure: {avg_pressure} {PRESSURE_UNIT}"),
    );

    // Table
    let mut y = top - 220;
    page.text(MARGIN_X, y, Font::Bold, 12, "Equipment Name");
    page.text(COL_TYPE_X, y, Font::Bold, 12, "Type");
    page.text(COL_FLOW_X, y, Font::Bold, 12, "Flowrate");
    page.ops.push(DrawOp::Line {
        from: (MARGIN_X, y - 5),
        to: (500, y - 5),
        stroke: Stroke::Black,
    });

    y -= 25;
    let mut rows_rendered = 0;
    for record in summary.records.iter().take(options.max_rows) {
        if y < BOTTOM_MARGIN {
            break;
        }
        page.text(MARGIN_X, y, Font::Regular, 10, record.equipment_name.as_str());
        page.text(COL_TYPE_X, y, Font::Regular, 10, record.equipment_type.as_str());
        page.text(COL_FLOW_X, y, Font::Regular, 10, record.flowrate.to_string());
        rows_rendered += 1;
        y -= ROW_HEIGHT;
    }

    Report {
        pages: vec![page],
        rows_rendered,
    }
}

impl Report {
    /// Encode as a PDF document.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(font_dictionary("Helvetica"));
        let bold = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(regular),
                "F2" => Object::Reference(bold),
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content: Content<Vec<Operation>> = Content {
                operations: page.ops.iter().flat_map(operations).collect(),
            };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(kids),
                "Count" => Object::Integer(page_count),
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ]),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(TITLE),
            "Producer" => Object::string_literal("chemviz"),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn operations(op: &DrawOp) -> Vec<Operation> {
    match op {
        DrawOp::Text {
            x,
            y,
            font,
            size,
            text,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().to_vec()),
                    Object::Integer(*size),
                ],
            ),
            Operation::new("Td", vec![Object::Integer(*x), Object::Integer(*y)]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ],
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            stroke,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("RG", rgb_operands(*stroke)),
            Operation::new(
                "re",
                vec![
                    Object::Integer(*x),
                    Object::Integer(*y),
                    Object::Integer(*width),
                    Object::Integer(*height),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
        DrawOp::Line { from, to, stroke } => vec![
            Operation::new("q", vec![]),
            Operation::new("RG", rgb_operands(*stroke)),
            Operation::new("m", vec![Object::Integer(from.0), Object::Integer(from.1)]),
            Operation::new("l", vec![Object::Integer(to.0), Object::Integer(to.1)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

fn rgb_operands(stroke: Stroke) -> Vec<Object> {
    stroke.rgb().into_iter().map(Object::Integer).collect()
}

/// Map text onto the single-byte WinAnsi encoding of the standard fonts.
/// Latin-1 code points map one-to-one; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}
