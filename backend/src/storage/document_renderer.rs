//! Single-page report document drawn with plotters.
//!
//! The page has a centered title, the metadata block (left: who prepared it
//! and for whom, right-aligned: capture time and location), the bordered
//! table, the summary figures and a signature footer.

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;

use crate::domain::models::report::{Report, ReportCell};
use crate::error::{FinCalcError, Result};
use crate::storage::traits::{DocumentRenderer, RenderedDocument};
use shared::format_amount;

const MARGIN: i32 = 48;
const ROW_HEIGHT: i32 = 28;
const CELL_PADDING: i32 = 8;
const FOOTER_HEIGHT: i32 = 120;
const HEADER_FILL: RGBColor = RGBColor(225, 233, 245);
const BORDER: RGBColor = RGBColor(90, 90, 90);

type Page<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn document_error<E: Display>(err: E) -> FinCalcError {
    FinCalcError::Document(err.to_string())
}

fn style(size: f64, bold: bool, anchor: HPos) -> TextStyle<'static> {
    let font_style = if bold { FontStyle::Bold } else { FontStyle::Normal };
    TextStyle::from(FontDesc::new(FontFamily::SansSerif, size, font_style))
        .pos(Pos::new(anchor, VPos::Center))
}

fn draw_text(
    page: &Page<'_>,
    text: String,
    at: (i32, i32),
    text_style: TextStyle<'static>,
) -> Result<()> {
    page.draw(&Text::new(text, at, text_style)).map_err(document_error)
}

/// Numbers hug the right border of their cell, text the left one
fn cell_anchor(cell: &ReportCell) -> HPos {
    match cell {
        ReportCell::Text(_) => HPos::Left,
        ReportCell::Count(_) | ReportCell::Amount(_) => HPos::Right,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SvgDocumentRenderer {
    width: u32,
    min_height: u32,
}

impl SvgDocumentRenderer {
    /// A4 portrait at 96 dpi
    pub fn new() -> Self {
        Self {
            width: 794,
            min_height: 1123,
        }
    }

    fn page_height(&self, report: &Report) -> u32 {
        let needed = MARGIN * 2
            + 120
            + ROW_HEIGHT * (report.rows.len() as i32 + 1)
            + 24
            + 22 * report.summary.len() as i32
            + FOOTER_HEIGHT;
        self.min_height.max(needed as u32)
    }

    fn draw_page(&self, page: &Page<'_>, report: &Report, height: i32) -> Result<()> {
        let width = self.width as i32;
        page.fill(&WHITE).map_err(document_error)?;

        let mut y = MARGIN;
        draw_text(page, report.title.clone(), (width / 2, y), style(22.0, true, HPos::Center))?;
        y += 44;

        let left = [
            format!("Prepared By: {}", report.prepared_by),
            format!("Prepared For: {}", report.customer_name),
        ];
        let right = [
            format!("{}: {}", report.date_label(), report.meta.display_timestamp()),
            report.meta.location_label(),
        ];
        for (left_line, right_line) in left.into_iter().zip(right) {
            draw_text(page, left_line, (MARGIN, y), style(13.0, false, HPos::Left))?;
            draw_text(page, right_line, (width - MARGIN, y), style(13.0, false, HPos::Right))?;
            y += 20;
        }
        y += 36;

        y = self.draw_table(page, report, y)?;
        y += 24;

        for item in &report.summary {
            let amount = format_amount(item.amount);
            let line = format!("{}: {} {}", item.label, report.currency_symbol, amount);
            draw_text(page, line, (width - MARGIN, y), style(15.0, true, HPos::Right))?;
            y += 22;
        }

        let footer_y = height - MARGIN - 48;
        let greeting_style = style(14.0, false, HPos::Left);
        draw_text(page, "Best of luck!".to_string(), (MARGIN, footer_y), greeting_style)?;
        let signature_left = width - MARGIN - 180;
        let signature_center = width - MARGIN - 90;
        page.draw(&PathElement::new(
            vec![(signature_left, footer_y), (width - MARGIN, footer_y)],
            BLACK.stroke_width(1),
        ))
        .map_err(document_error)?;
        draw_text(
            page,
            "Signature".to_string(),
            (signature_center, footer_y + 16),
            style(12.0, false, HPos::Center),
        )?;
        draw_text(
            page,
            report.prepared_by.clone(),
            (signature_center, footer_y + 34),
            style(12.0, true, HPos::Center),
        )?;
        Ok(())
    }

    /// Draw header and body rows starting at `top`, returning the y below the table
    fn draw_table(&self, page: &Page<'_>, report: &Report, top: i32) -> Result<i32> {
        let table_width = self.width as i32 - 2 * MARGIN;
        let column_width = table_width / report.columns.len() as i32;
        let cell_box = |column: usize, row_top: i32| {
            let left = MARGIN + column_width * column as i32;
            [(left, row_top), (left + column_width, row_top + ROW_HEIGHT)]
        };

        let mut y = top;
        for (column, name) in report.columns.iter().enumerate() {
            let [upper_left, lower_right] = cell_box(column, y);
            page.draw(&Rectangle::new([upper_left, lower_right], HEADER_FILL.filled()))
                .map_err(document_error)?;
            page.draw(&Rectangle::new([upper_left, lower_right], BORDER.stroke_width(1)))
                .map_err(document_error)?;
            draw_text(
                page,
                name.clone(),
                (upper_left.0 + CELL_PADDING, y + ROW_HEIGHT / 2),
                style(13.0, true, HPos::Left),
            )?;
        }
        y += ROW_HEIGHT;

        for row in &report.rows {
            for (column, cell) in row.iter().enumerate().take(report.columns.len()) {
                let [upper_left, lower_right] = cell_box(column, y);
                page.draw(&Rectangle::new([upper_left, lower_right], BORDER.stroke_width(1)))
                    .map_err(document_error)?;
                let anchor = cell_anchor(cell);
                let x = match anchor {
                    HPos::Right => lower_right.0 - CELL_PADDING,
                    _ => upper_left.0 + CELL_PADDING,
                };
                let cell_style = style(13.0, false, anchor);
                draw_text(page, cell.display(), (x, y + ROW_HEIGHT / 2), cell_style)?;
            }
            y += ROW_HEIGHT;
        }
        Ok(y)
    }
}

impl Default for SvgDocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for SvgDocumentRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, report: &Report) -> Result<RenderedDocument> {
        if report.columns.is_empty() {
            return Err(FinCalcError::Document("report has no columns".to_string()));
        }
        let height = self.page_height(report);
        let mut svg = String::new();
        {
            let page = SVGBackend::with_string(&mut svg, (self.width, height)).into_drawing_area();
            self.draw_page(&page, report, height as i32)?;
            page.present().map_err(document_error)?;
        }
        debug!("📄 DOCUMENT: Rendered '{}' ({} bytes)", report.title, svg.len());
        Ok(RenderedDocument::new(svg.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::report::{ReportKind, SummaryItem};
    use chrono::{FixedOffset, TimeZone};
    use shared::ReportMeta;

    fn sample_report(rows: usize) -> Report {
        Report {
            kind: ReportKind::Emi,
            title: "FinCalc - EMI Report".to_string(),
            prepared_by: "FinCalc".to_string(),
            customer_name: "Asha Rao".to_string(),
            currency_symbol: "Rs".to_string(),
            meta: ReportMeta {
                captured_at: FixedOffset::east_opt(330 * 60)
                    .unwrap()
                    .with_ymd_and_hms(2025, 1, 15, 10, 30, 0)
                    .unwrap(),
                timezone_label: "IST".to_string(),
                coordinates: None,
            },
            columns: vec!["Item".into(), "Value".into()],
            rows: (0..rows)
                .map(|i| {
                    vec![ReportCell::text(format!("Line {}", i)), ReportCell::Amount(8884.878867)]
                })
                .collect(),
            summary: vec![SummaryItem { label: "Monthly EMI".into(), amount: 8884.878867 }],
        }
    }

    fn render_to_string(report: &Report) -> String {
        let document = SvgDocumentRenderer::new().render(report).unwrap();
        String::from_utf8(document.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_page_contains_header_table_summary_and_footer() {
        let svg = render_to_string(&sample_report(9));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("FinCalc - EMI Report"));
        assert!(svg.contains("Prepared For: Asha Rao"));
        assert!(
            svg.contains("Date &amp; Time (IST): 2025-01-15 10:30:00")
                || svg.contains("Date & Time (IST): 2025-01-15 10:30:00")
        );
        assert!(svg.contains("Location not available"));
        assert!(svg.contains("Line 8"));
        assert!(svg.contains("8884.88"));
        assert!(svg.contains("Monthly EMI: Rs 8884.88"));
        assert!(svg.contains("Best of luck!"));
        assert!(svg.contains("Signature"));
    }

    #[test]
    fn test_page_grows_with_long_tables() {
        let renderer = SvgDocumentRenderer::new();
        assert_eq!(renderer.page_height(&sample_report(5)), 1123);
        assert!(renderer.page_height(&sample_report(60)) > 1123);
    }

    #[test]
    fn test_report_without_columns_is_rejected() {
        let mut report = sample_report(1);
        report.columns.clear();
        let err = SvgDocumentRenderer::new().render(&report).unwrap_err();
        assert!(matches!(err, FinCalcError::Document(_)));
    }
}
