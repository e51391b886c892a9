//! Export service domain logic for FinCalc.
//!
//! Orchestrates one export: capture metadata once, build the report once,
//! render the document once, then write both artifacts into the output
//! directory under the same `{customer}_Report_{timestamp}` stem.

use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SpreadsheetFailurePolicy;
use crate::domain::commands::export::ExportReportCommand;
use crate::domain::models::report::Report;
use crate::domain::report_builder::ReportBuilder;
use crate::domain::report_meta_service::ReportMetaService;
use crate::error::{FinCalcError, Result};
use crate::storage::traits::{DocumentRenderer, SpreadsheetWriter};
use shared::ReportMeta;

/// Where one export ended up
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReportResult {
    pub document_path: PathBuf,
    /// `None` when the spreadsheet failed and the policy let the export continue
    pub spreadsheet_path: Option<PathBuf>,
    pub spreadsheet_error: Option<String>,
    pub meta: ReportMeta,
}

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService {
    report_builder: ReportBuilder,
    meta_service: ReportMetaService,
    document_renderer: Arc<dyn DocumentRenderer>,
    spreadsheet_writer: Arc<dyn SpreadsheetWriter>,
    output_dir: PathBuf,
    spreadsheet_failure: SpreadsheetFailurePolicy,
}

impl ExportService {
    pub fn new(
        report_builder: ReportBuilder,
        meta_service: ReportMetaService,
        document_renderer: Arc<dyn DocumentRenderer>,
        spreadsheet_writer: Arc<dyn SpreadsheetWriter>,
        output_dir: PathBuf,
        spreadsheet_failure: SpreadsheetFailurePolicy,
    ) -> Self {
        Self {
            report_builder,
            meta_service,
            document_renderer,
            spreadsheet_writer,
            output_dir,
            spreadsheet_failure,
        }
    }

    /// Export the subject of `command` as a document and a spreadsheet
    ///
    /// A document failure fails the export. A spreadsheet failure follows the
    /// configured policy; `Abort` also removes the document just written.
    pub async fn export(&self, command: ExportReportCommand<'_>) -> Result<ExportReportResult> {
        let kind = command.subject.kind();
        info!("📄 EXPORT: Exporting {} report for '{}'", kind, command.subject.customer_name());

        let meta = self.meta_service.capture().await;
        let report = self.report_builder.build(command.subject, meta);

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", self.output_dir, e);
            FinCalcError::Document(format!("cannot create {}: {}", self.output_dir.display(), e))
        })?;

        let document_path = self.write_document(&report)?;
        let (spreadsheet_path, spreadsheet_error) = match self.write_spreadsheet(&report) {
            Ok(path) => (Some(path), None),
            Err(e) => match self.spreadsheet_failure {
                SpreadsheetFailurePolicy::Abort => {
                    error!("❌ EXPORT: Spreadsheet failed, aborting export: {}", e);
                    if let Err(remove_err) = fs::remove_file(&document_path) {
                        warn!(
                            "⚠️ EXPORT: Could not remove document {:?}: {}",
                            document_path, remove_err
                        );
                    }
                    return Err(e);
                }
                SpreadsheetFailurePolicy::Continue => {
                    warn!("⚠️ EXPORT: Spreadsheet failed, document kept: {}", e);
                    (None, Some(e.to_string()))
                }
            },
        };

        info!("✅ EXPORT: Exported {} report to {:?}", kind, document_path);
        Ok(ExportReportResult {
            document_path,
            spreadsheet_path,
            spreadsheet_error,
            meta: report.meta,
        })
    }

    fn artifact_path(&self, report: &Report, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", report.file_stem(), extension))
    }

    fn write_document(&self, report: &Report) -> Result<PathBuf> {
        let path = self.artifact_path(report, self.document_renderer.extension());
        let document = self.document_renderer.render(report).map_err(|e| {
            error!("❌ EXPORT: Document rendering failed: {}", e);
            e
        })?;
        let bytes = document.save(&path).map_err(|e| {
            error!("❌ EXPORT: Failed to write document to {:?}: {}", path, e);
            FinCalcError::Document(e.to_string())
        })?;
        info!("✅ EXPORT: Document saved ({} bytes) to {:?}", bytes, path);
        Ok(path)
    }

    fn write_spreadsheet(&self, report: &Report) -> Result<PathBuf> {
        let path = self.artifact_path(report, self.spreadsheet_writer.extension());
        match self.spreadsheet_writer.write(report, &path) {
            Ok(()) => Ok(path),
            Err(e @ FinCalcError::Spreadsheet(_)) => Err(e),
            Err(e) => Err(FinCalcError::Spreadsheet(e.to_string())),
        }
    }
}

impl std::fmt::Debug for ExportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportService")
            .field("output_dir", &self.output_dir)
            .field("spreadsheet_failure", &self.spreadsheet_failure)
            .finish_non_exhaustive()
    }
}
