//! # Domain Layer
//!
//! Calculators, the calculation session and the export pipeline.
//!
//! ## Services
//!
//! - [`AmortizationService`]: EMI, total interest and broken-period figures
//! - [`CashflowService`]: monthly cashflow and loan eligibility
//! - [`ChartService`]: SVG bar charts of cashflow and eligibility figures
//! - [`ReportBuilder`]: turns a stored result into a format-independent report
//! - [`ReportMetaService`]: timestamp and position captured once per export
//! - [`ExportService`]: renders and writes the document and the spreadsheet
//!
//! Services never hold results themselves; [`CalculationSession`] owns the
//! latest record of each calculator.

pub mod amortization_service;
pub mod cashflow_service;
pub mod chart_service;
pub mod commands;
pub mod export_service;
pub mod models;
pub mod report_builder;
pub mod report_meta_service;
pub mod session;

pub use amortization_service::AmortizationService;
pub use cashflow_service::CashflowService;
pub use chart_service::ChartService;
pub use export_service::{ExportReportResult, ExportService};
pub use report_builder::ReportBuilder;
pub use report_meta_service::{Clock, FixedClock, ReportMetaService, SystemClock};
pub use session::CalculationSession;
