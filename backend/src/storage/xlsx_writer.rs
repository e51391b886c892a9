//! Excel workbook writer.
//!
//! One sheet named after the report kind, laid out like the CSV writer:
//! metadata header and values, table header, table rows, then the summary
//! labels and amounts under the last two table columns. Header rows are
//! bold. Amounts are stored as numbers at full precision.

use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::domain::models::report::{Report, ReportCell};
use crate::error::Result;
use crate::storage::traits::SpreadsheetWriter;

fn write_cell(sheet: &mut Worksheet, row: u32, column: u16, cell: &ReportCell) -> Result<()> {
    match cell {
        ReportCell::Text(text) => sheet.write_string(row, column, text)?,
        ReportCell::Count(count) => sheet.write_number(row, column, f64::from(*count))?,
        ReportCell::Amount(amount) => sheet.write_number(row, column, *amount)?,
    };
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSpreadsheetWriter;

impl XlsxSpreadsheetWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the workbook in memory
    pub fn workbook(&self, report: &Report) -> Result<Workbook> {
        let bold = Format::new().set_bold();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(report.kind.sheet_name())?;

        let date_label = report.date_label();
        let meta_header = ["Prepared By", "Prepared For", date_label.as_str(), "Location"];
        for (column, label) in meta_header.iter().enumerate() {
            sheet.write_string_with_format(0, column as u16, *label, &bold)?;
        }
        let meta_values = [
            report.prepared_by.clone(),
            report.customer_name.clone(),
            report.meta.display_timestamp(),
            report.meta.location_label(),
        ];
        for (column, value) in meta_values.iter().enumerate() {
            sheet.write_string(1, column as u16, value)?;
        }

        for (column, name) in report.columns.iter().enumerate() {
            sheet.write_string_with_format(2, column as u16, name, &bold)?;
        }
        let mut row = 3;
        for cells in &report.rows {
            for (column, cell) in cells.iter().enumerate() {
                write_cell(sheet, row, column as u16, cell)?;
            }
            row += 1;
        }

        let label_column = report.columns.len().saturating_sub(2) as u16;
        for item in &report.summary {
            sheet.write_string_with_format(row, label_column, &item.label, &bold)?;
            sheet.write_number(row, label_column + 1, item.amount)?;
            row += 1;
        }

        Ok(workbook)
    }
}

impl SpreadsheetWriter for XlsxSpreadsheetWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write(&self, report: &Report, path: &Path) -> Result<()> {
        let mut workbook = self.workbook(report)?;
        workbook.save(path)?;
        debug!(
            "📊 SPREADSHEET: Wrote sheet '{}' with {} rows to {:?}",
            report.kind.sheet_name(),
            report.rows.len(),
            path
        );
        Ok(())
    }
}
