//! Single-page report document written as PDF.
//!
//! Same page as the SVG renderer: centered title, metadata block, bordered
//! table, summary figures and a signature footer. Text is set in the builtin
//! Helvetica faces, which cover ASCII only here; the rupee sign becomes
//! `Rs.` and anything else outside ASCII becomes `?`.

use log::debug;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use std::fmt::Display;

use crate::domain::models::report::{Report, ReportCell};
use crate::error::{FinCalcError, Result};
use crate::storage::traits::{DocumentRenderer, RenderedDocument};
use shared::format_amount;

/// A4 portrait, in millimetres
const PAGE_WIDTH: f32 = 210.0;
const MIN_PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const HEADER_HEIGHT: f32 = 40.0;
const ROW_HEIGHT: f32 = 8.0;
const SUMMARY_LINE: f32 = 7.0;
const CELL_PADDING: f32 = 2.5;
const FOOTER_HEIGHT: f32 = 35.0;
const PT_TO_MM: f32 = 0.3528;
/// mean Helvetica advance as a fraction of the font size
const MEAN_ADVANCE: f32 = 0.55;

fn document_error<E: Display>(err: E) -> FinCalcError {
    FinCalcError::Document(err.to_string())
}

fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Approximate rendered width in millimetres
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * MEAN_ADVANCE * PT_TO_MM
}

fn page_height(report: &Report) -> f32 {
    let needed = MARGIN * 2.0
        + HEADER_HEIGHT
        + ROW_HEIGHT * (report.rows.len() as f32 + 1.0)
        + 8.0
        + SUMMARY_LINE * report.summary.len() as f32
        + FOOTER_HEIGHT;
    MIN_PAGE_HEIGHT.max(needed)
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// Numbers hug the right border of their cell, text the left one
fn cell_align(cell: &ReportCell) -> Align {
    match cell {
        ReportCell::Text(_) => Align::Left,
        ReportCell::Count(_) | ReportCell::Amount(_) => Align::Right,
    }
}

/// Drawing surface addressed from the top edge down
struct Canvas {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    height: f32,
}

impl Canvas {
    fn point(&self, x: f32, top: f32) -> (Point, bool) {
        (Point::new(Mm(x), Mm(self.height - top)), false)
    }

    /// `top` is the baseline, measured down from the top edge
    fn text(&self, text: &str, size: f32, bold: bool, x: f32, top: f32, align: Align) {
        let text = pdf_text(text);
        let width = text_width(&text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.height - top), font);
    }

    fn rect(&self, left: f32, top: f32, width: f32, height: f32) {
        let points = vec![
            self.point(left, top),
            self.point(left + width, top),
            self.point(left + width, top + height),
            self.point(left, top + height),
        ];
        self.layer.add_line(Line { points, is_closed: true });
    }

    fn rule(&self, from_x: f32, to_x: f32, top: f32) {
        let points = vec![self.point(from_x, top), self.point(to_x, top)];
        self.layer.add_line(Line { points, is_closed: false });
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDocumentRenderer;

impl PdfDocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    fn draw_page(&self, canvas: &Canvas, report: &Report) {
        let right_edge = PAGE_WIDTH - MARGIN;
        let mut y = MARGIN + 6.0;
        canvas.text(&report.title, 18.0, true, PAGE_WIDTH / 2.0, y, Align::Center);
        y += 12.0;

        let left = [
            format!("Prepared By: {}", report.prepared_by),
            format!("Prepared For: {}", report.customer_name),
        ];
        let right = [
            format!("{}: {}", report.date_label(), report.meta.display_timestamp()),
            report.meta.location_label(),
        ];
        for (left_line, right_line) in left.iter().zip(right.iter()) {
            canvas.text(left_line, 10.0, false, MARGIN, y, Align::Left);
            canvas.text(right_line, 10.0, false, right_edge, y, Align::Right);
            y += 6.0;
        }
        y += 10.0;

        y = self.draw_table(canvas, report, y);
        y += 8.0;

        for item in &report.summary {
            let amount = format_amount(item.amount);
            let line = format!("{}: {} {}", item.label, report.currency_symbol, amount);
            canvas.text(&line, 11.0, true, right_edge, y, Align::Right);
            y += SUMMARY_LINE;
        }

        let footer_y = canvas.height - MARGIN - 14.0;
        canvas.text("Best of luck!", 11.0, false, MARGIN, footer_y, Align::Left);
        let signature_left = right_edge - 50.0;
        let signature_center = right_edge - 25.0;
        canvas.rule(signature_left, right_edge, footer_y);
        canvas.text("Signature", 9.0, false, signature_center, footer_y + 5.0, Align::Center);
        let name_y = footer_y + 10.0;
        canvas.text(&report.prepared_by, 9.0, true, signature_center, name_y, Align::Center);
    }

    /// Draw header and body rows starting at `top`, returning the y below the table
    fn draw_table(&self, canvas: &Canvas, report: &Report, top: f32) -> f32 {
        let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / report.columns.len() as f32;
        let baseline = |row_top: f32| row_top + ROW_HEIGHT / 2.0 + 1.3;

        let mut y = top;
        for (column, name) in report.columns.iter().enumerate() {
            let left = MARGIN + column_width * column as f32;
            canvas.rect(left, y, column_width, ROW_HEIGHT);
            canvas.text(name, 10.0, true, left + CELL_PADDING, baseline(y), Align::Left);
        }
        y += ROW_HEIGHT;

        for row in &report.rows {
            for (column, cell) in row.iter().enumerate().take(report.columns.len()) {
                let left = MARGIN + column_width * column as f32;
                canvas.rect(left, y, column_width, ROW_HEIGHT);
                let align = cell_align(cell);
                let x = match align {
                    Align::Right => left + column_width - CELL_PADDING,
                    _ => left + CELL_PADDING,
                };
                canvas.text(&cell.display(), 10.0, false, x, baseline(y), align);
            }
            y += ROW_HEIGHT;
        }
        y
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, report: &Report) -> Result<RenderedDocument> {
        if report.columns.is_empty() {
            return Err(FinCalcError::Document("report has no columns".to_string()));
        }
        let height = page_height(report);
        let (doc, page, layer) =
            PdfDocument::new(report.title.as_str(), Mm(PAGE_WIDTH), Mm(height), "Report");
        {
            let canvas = Canvas {
                layer: doc.get_page(page).get_layer(layer),
                regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(document_error)?,
                bold: doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(document_error)?,
                height,
            };
            self.draw_page(&canvas, report);
        }
        let bytes = doc.save_to_bytes().map_err(document_error)?;
        debug!("📄 DOCUMENT: Rendered '{}' as PDF ({} bytes)", report.title, bytes.len());
        Ok(RenderedDocument::new(bytes))
    }
}
