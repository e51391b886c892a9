//! Structured, format-independent representation of an exported report.
//!
//! Renderers and writers only ever see a [`Report`]; they never look at the
//! calculator results directly.

use serde::{Deserialize, Serialize};
use shared::{format_amount, ReportMeta};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Emi,
    Cashflow,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Emi => "EMI Report",
            ReportKind::Cashflow => "Cashflow Report",
        }
    }

    /// Sheet name used by spreadsheet writers that support named sheets
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Emi => "EMI_Report",
            ReportKind::Cashflow => "Cashflow_Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Emi => write!(f, "EMI"),
            ReportKind::Cashflow => write!(f, "cashflow"),
        }
    }
}

/// One value in the report body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportCell {
    Text(String),
    Count(u32),
    /// kept at full precision, displayed with two decimals
    Amount(f64),
}

impl ReportCell {
    pub fn text<S: ToString>(s: S) -> Self {
        ReportCell::Text(s.to_string())
    }

    /// Human-facing rendering
    pub fn display(&self) -> String {
        match self {
            ReportCell::Text(s) => s.clone(),
            ReportCell::Count(n) => n.to_string(),
            ReportCell::Amount(a) => format_amount(*a),
        }
    }

    /// Machine-facing rendering, lossless for amounts
    pub fn raw(&self) -> String {
        match self {
            ReportCell::Text(s) => s.clone(),
            ReportCell::Count(n) => n.to_string(),
            ReportCell::Amount(a) => a.to_string(),
        }
    }
}

/// A headline figure shown below the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub amount: f64,
}

/// Header metadata, tabular body and summary of one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    /// e.g. "FinCalc - EMI Report"
    pub title: String,
    pub prepared_by: String,
    pub customer_name: String,
    pub currency_symbol: String,
    pub meta: ReportMeta,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub summary: Vec<SummaryItem>,
}

impl Report {
    /// `{customer}_Report_{timestamp}`, without extension
    pub fn file_stem(&self) -> String {
        format!(
            "{}_Report_{}",
            sanitize_filename(&self.customer_name),
            self.meta.file_timestamp()
        )
    }

    pub fn date_label(&self) -> String {
        format!("Date & Time ({})", self.meta.timezone_label)
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
