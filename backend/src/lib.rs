//! # FinCalc Backend
//!
//! EMI amortization, household cashflow and loan eligibility calculators,
//! with report export to a PDF document and an xlsx spreadsheet (SVG and
//! CSV on request).
//!
//! - [`domain`]: calculators, session and export orchestration
//! - [`storage`]: document renderer and spreadsheet writer
//! - [`io`]: form values, geolocation and console output
//! - [`config`]: YAML configuration
//!
//! [`Backend`] wires the services together around one [`CalculationSession`].

use log::info;
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

pub use config::AppConfig;
pub use error::{FinCalcError, Result};

use domain::commands::amortization::CalculateEmiCommand;
use domain::commands::cashflow::{CalculateCashflowCommand, CheckEligibilityCommand};
use domain::commands::export::ExportReportCommand;
use domain::models::records::{AmortizationRecord, CashflowRecord};
use domain::models::report::ReportKind;
use domain::{
    AmortizationService, CalculationSession, CashflowService, ChartService, Clock,
    ExportReportResult, ExportService, ReportBuilder, ReportMetaService, SystemClock,
};
use io::geolocation::{GeolocationService, Locator, StaticLocator, UnavailableLocator};
use shared::EligibilityResult;
use config::{DocumentFormat, SpreadsheetFormat};
use storage::{
    CsvSpreadsheetWriter, DocumentRenderer, PdfDocumentRenderer, SpreadsheetWriter,
    SvgDocumentRenderer, XlsxSpreadsheetWriter,
};

/// Collaborators an embedding can swap out
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub locator: Arc<dyn Locator>,
    pub document_renderer: Arc<dyn DocumentRenderer>,
    pub spreadsheet_writer: Arc<dyn SpreadsheetWriter>,
}

impl Collaborators {
    /// System clock, configured position (if any) and the configured formats
    pub fn from_config(config: &AppConfig) -> Self {
        let locator: Arc<dyn Locator> = match config.geolocation.coordinates() {
            Some(coordinates) => Arc::new(StaticLocator::new(coordinates)),
            None => Arc::new(UnavailableLocator),
        };
        let document_renderer: Arc<dyn DocumentRenderer> = match config.export.document_format {
            DocumentFormat::Pdf => Arc::new(PdfDocumentRenderer::new()),
            DocumentFormat::Svg => Arc::new(SvgDocumentRenderer::new()),
        };
        let spreadsheet_writer: Arc<dyn SpreadsheetWriter> =
            match config.export.spreadsheet_format {
                SpreadsheetFormat::Xlsx => Arc::new(XlsxSpreadsheetWriter::new()),
                SpreadsheetFormat::Csv => Arc::new(CsvSpreadsheetWriter::new()),
            };
        Self {
            clock: Arc::new(SystemClock),
            locator,
            document_renderer,
            spreadsheet_writer,
        }
    }
}

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub config: AppConfig,
    pub amortization_service: AmortizationService,
    pub cashflow_service: CashflowService,
    pub chart_service: ChartService,
    pub export_service: ExportService,
    session: CalculationSession,
}

impl Backend {
    /// Create a backend with the default collaborators
    ///
    /// `output_dir` overrides the configured export directory.
    pub fn new(config: AppConfig, output_dir: Option<&str>) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, output_dir, collaborators)
    }

    pub fn with_collaborators(
        config: AppConfig,
        output_dir: Option<&str>,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let meta_service = ReportMetaService::new(
            collaborators.clock,
            GeolocationService::new(collaborators.locator, config.geolocation.timeout()),
            config.report.utc_offset()?,
            config.report.timezone_label.clone(),
        );
        let output_dir = config.output_dir(output_dir);
        info!("📁 BACKEND: Reports will be written to {:?}", output_dir);

        let export_service = ExportService::new(
            ReportBuilder::new(config.report.clone()),
            meta_service,
            collaborators.document_renderer,
            collaborators.spreadsheet_writer,
            output_dir,
            config.export.spreadsheet_failure,
        );

        Ok(Backend {
            amortization_service: AmortizationService::new(),
            cashflow_service: CashflowService::new(config.eligibility.clone()),
            chart_service: ChartService::new(),
            export_service,
            session: CalculationSession::new(),
            config,
        })
    }

    pub fn session(&self) -> &CalculationSession {
        &self.session
    }

    /// Calculate and store an EMI result; on failure the previous one is kept
    pub fn calculate_emi(&mut self, command: CalculateEmiCommand) -> Result<&AmortizationRecord> {
        let record = self.amortization_service.calculate(command)?;
        Ok(self.session.store_amortization(record))
    }

    pub fn calculate_cashflow(&mut self, command: CalculateCashflowCommand) -> &CashflowRecord {
        let record = self.cashflow_service.calculate(command);
        self.session.store_cashflow(record)
    }

    /// Check a proposed installment against the last cashflow
    pub fn check_eligibility(
        &mut self,
        command: CheckEligibilityCommand,
    ) -> Result<&EligibilityResult> {
        let result = self
            .cashflow_service
            .check_eligibility(command, self.session.cashflow())?;
        Ok(self.session.store_eligibility(result))
    }

    /// Export the latest result of `kind`
    pub async fn export(&self, kind: ReportKind) -> Result<ExportReportResult> {
        let subject = self.session.report_subject(kind)?;
        self.export_service.export(ExportReportCommand { subject }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreconditionError;
    use crate::io::form::FormValues;
    use shared::CashflowBasis;

    fn create_test_backend() -> Backend {
        let dir = std::env::temp_dir().join("fincalc_lib_tests");
        Backend::new(AppConfig::default(), dir.to_str()).unwrap()
    }

    fn emi_command(loan_amount: &str) -> CalculateEmiCommand {
        CalculateEmiCommand {
            customer_name: "Asha".to_string(),
            form: FormValues::new()
                .with("loan_amount", loan_amount)
                .with("annual_rate", "12")
                .with("tenure", "12"),
        }
    }

    #[test]
    fn test_collaborators_follow_export_formats() {
        let defaults = Collaborators::from_config(&AppConfig::default());
        assert_eq!(defaults.document_renderer.extension(), "pdf");
        assert_eq!(defaults.spreadsheet_writer.extension(), "xlsx");

        let mut config = AppConfig::default();
        config.export.document_format = DocumentFormat::Svg;
        config.export.spreadsheet_format = SpreadsheetFormat::Csv;
        let plain = Collaborators::from_config(&config);
        assert_eq!(plain.document_renderer.extension(), "svg");
        assert_eq!(plain.spreadsheet_writer.extension(), "csv");
    }

    #[test]
    fn test_failed_emi_keeps_previous_result() {
        let mut backend = create_test_backend();
        backend.calculate_emi(emi_command("100000")).unwrap();
        assert!(backend.calculate_emi(emi_command("")).is_err());
        assert_eq!(backend.session().amortization().unwrap().input.principal, 100000.0);
    }

    #[test]
    fn test_eligibility_flow() {
        let mut backend = create_test_backend();
        let err = backend
            .check_eligibility(CheckEligibilityCommand {
                proposed_installment: Some("5000".into()),
            })
            .unwrap_err();
        assert!(matches!(err, FinCalcError::Precondition(PreconditionError::NoCashflow)));

        backend.calculate_cashflow(CalculateCashflowCommand {
            customer_name: String::new(),
            basis: CashflowBasis::Income,
            form: FormValues::new()
                .with("monthly_wage", "20000")
                .with("household_expense", "8000"),
        });
        let result = backend
            .check_eligibility(CheckEligibilityCommand {
                proposed_installment: Some("5000".into()),
            })
            .unwrap();
        assert!(result.is_eligible());
        assert!(backend.session().eligibility().is_some());
    }

    #[tokio::test]
    async fn test_export_requires_result() {
        let backend = create_test_backend();
        let err = backend.export(ReportKind::Cashflow).await.unwrap_err();
        assert!(matches!(
            err,
            FinCalcError::Precondition(PreconditionError::NothingToExport(ReportKind::Cashflow))
        ));
    }
}
