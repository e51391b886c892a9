//! Command types accepted by the domain services.
//!
//! Each command carries exactly what one operation needs, straight from the
//! input surface. Field parsing happens inside the services so that the
//! per-field policy lives next to the formulas.

pub mod amortization {
    use crate::io::form::FormValues;

    #[derive(Debug, Clone)]
    pub struct CalculateEmiCommand {
        pub customer_name: String,
        /// `loan_amount`, `annual_rate`, `tenure`, `broken_days`
        pub form: FormValues,
    }
}

pub mod cashflow {
    use crate::io::form::FormValues;
    use shared::CashflowBasis;

    #[derive(Debug, Clone)]
    pub struct CalculateCashflowCommand {
        pub customer_name: String,
        pub basis: CashflowBasis,
        pub form: FormValues,
    }

    #[derive(Debug, Clone)]
    pub struct CheckEligibilityCommand {
        /// Installment the customer proposes to pay, as typed
        pub proposed_installment: Option<String>,
    }
}

pub mod export {
    use crate::domain::models::records::{AmortizationRecord, CashflowRecord};
    use crate::domain::models::report::ReportKind;

    /// What a report is built from
    #[derive(Debug, Clone, Copy)]
    pub enum ReportSubject<'a> {
        Amortization(&'a AmortizationRecord),
        Cashflow(&'a CashflowRecord),
    }

    impl ReportSubject<'_> {
        pub fn kind(&self) -> ReportKind {
            match self {
                ReportSubject::Amortization(_) => ReportKind::Emi,
                ReportSubject::Cashflow(_) => ReportKind::Cashflow,
            }
        }

        pub fn customer_name(&self) -> &str {
            match self {
                ReportSubject::Amortization(record) => &record.customer_name,
                ReportSubject::Cashflow(record) => &record.customer_name,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct ExportReportCommand<'a> {
        pub subject: ReportSubject<'a>,
    }
}
