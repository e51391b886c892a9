//! # Storage Layer
//!
//! Writers for the export artifacts: PDF or SVG documents, xlsx or CSV
//! spreadsheets. Each format sits behind a trait from
//! [`traits`] so the export service can be tested with failing writers.

pub mod document_renderer;
pub mod pdf_renderer;
pub mod spreadsheet_writer;
pub mod traits;
pub mod xlsx_writer;

pub use document_renderer::SvgDocumentRenderer;
pub use pdf_renderer::PdfDocumentRenderer;
pub use spreadsheet_writer::CsvSpreadsheetWriter;
pub use xlsx_writer::XlsxSpreadsheetWriter;
pub use traits::{DocumentRenderer, RenderedDocument, SpreadsheetWriter};
