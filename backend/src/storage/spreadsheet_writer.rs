//! CSV spreadsheet writer.
//!
//! Layout, top to bottom:
//!
//! 1. metadata header: `Prepared By, Prepared For, Date & Time (TZ), Location`
//! 2. metadata values
//! 3. table header
//! 4. one record per table row
//! 5. summary records, label and amount under the last two table columns
//!
//! Amounts are written with full precision so totals re-derived from the
//! rows agree with the report.

use csv::WriterBuilder;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::models::report::Report;
use crate::error::Result;
use crate::storage::traits::SpreadsheetWriter;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSpreadsheetWriter;

impl CsvSpreadsheetWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the report to any sink
    pub fn write_to<W: Write>(&self, report: &Report, sink: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(sink);

        let date_label = report.date_label();
        wtr.write_record(["Prepared By", "Prepared For", date_label.as_str(), "Location"])?;
        wtr.write_record([
            report.prepared_by.clone(),
            report.customer_name.clone(),
            report.meta.display_timestamp(),
            report.meta.location_label(),
        ])?;

        wtr.write_record(&report.columns)?;
        for row in &report.rows {
            wtr.write_record(row.iter().map(|cell| cell.raw()))?;
        }

        let padding = report.columns.len().saturating_sub(2);
        for item in &report.summary {
            let mut record = vec![String::new(); padding];
            record.push(item.label.clone());
            record.push(item.amount.to_string());
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl SpreadsheetWriter for CsvSpreadsheetWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, report: &Report, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(report, BufWriter::new(file))?;
        debug!(
            "📊 SPREADSHEET: Wrote {} rows and {} summary lines to {:?}",
            report.rows.len(),
            report.summary.len(),
            path
        );
        Ok(())
    }
}
