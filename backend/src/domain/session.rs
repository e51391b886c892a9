//! Per-user calculation session.
//!
//! Holds the most recent result of each calculator. A new calculation
//! replaces the previous record wholesale; a failed calculation leaves the
//! previous record untouched. Exports and eligibility checks read from here
//! instead of from ambient state.

use log::debug;
use shared::EligibilityResult;

use crate::domain::commands::export::ReportSubject;
use crate::domain::models::records::{AmortizationRecord, CashflowRecord};
use crate::domain::models::report::ReportKind;
use crate::error::{PreconditionError, Result};

#[derive(Debug, Clone, Default)]
pub struct CalculationSession {
    amortization: Option<AmortizationRecord>,
    cashflow: Option<CashflowRecord>,
    eligibility: Option<EligibilityResult>,
}

impl CalculationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_amortization(&mut self, record: AmortizationRecord) -> &AmortizationRecord {
        debug!("🗂️ SESSION: Replacing EMI result");
        self.amortization.insert(record)
    }

    /// Store a cashflow; any eligibility derived from the previous one is dropped
    pub fn store_cashflow(&mut self, record: CashflowRecord) -> &CashflowRecord {
        debug!("🗂️ SESSION: Replacing cashflow result");
        self.eligibility = None;
        self.cashflow.insert(record)
    }

    pub fn store_eligibility(&mut self, result: EligibilityResult) -> &EligibilityResult {
        self.eligibility.insert(result)
    }

    pub fn amortization(&self) -> Option<&AmortizationRecord> {
        self.amortization.as_ref()
    }

    pub fn cashflow(&self) -> Option<&CashflowRecord> {
        self.cashflow.as_ref()
    }

    pub fn eligibility(&self) -> Option<&EligibilityResult> {
        self.eligibility.as_ref()
    }

    /// The record an export of `kind` would be built from
    pub fn report_subject(&self, kind: ReportKind) -> Result<ReportSubject<'_>> {
        let subject = match kind {
            ReportKind::Emi => self.amortization().map(ReportSubject::Amortization),
            ReportKind::Cashflow => self.cashflow().map(ReportSubject::Cashflow),
        };
        Ok(subject.ok_or(PreconditionError::NothingToExport(kind))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinCalcError;
    use shared::{CashflowBasis, CashflowInput, CashflowResult, IncomeBasis};

    fn cashflow_record(name: &str) -> CashflowRecord {
        CashflowRecord {
            customer_name: name.to_string(),
            input: CashflowInput::Income(IncomeBasis::default()),
            result: CashflowResult::from_lines(CashflowBasis::Income, Vec::new()),
        }
    }

    #[test]
    fn test_new_cashflow_replaces_previous_and_clears_eligibility() {
        let mut session = CalculationSession::new();
        session.store_cashflow(cashflow_record("first"));
        session.store_eligibility(EligibilityResult::NotEligible {
            proposed_installment: 10.0,
            disposable_income: 0.0,
        });
        assert!(session.eligibility().is_some());

        session.store_cashflow(cashflow_record("second"));
        assert_eq!(session.cashflow().unwrap().customer_name, "second");
        assert!(session.eligibility().is_none());
    }

    #[test]
    fn test_report_subject_requires_result() {
        let session = CalculationSession::new();
        let err = session.report_subject(ReportKind::Emi).unwrap_err();
        assert!(matches!(
            err,
            FinCalcError::Precondition(PreconditionError::NothingToExport(ReportKind::Emi))
        ));
    }

    #[test]
    fn test_report_subject_for_cashflow() {
        let mut session = CalculationSession::new();
        session.store_cashflow(cashflow_record("Ravi"));
        let subject = session.report_subject(ReportKind::Cashflow).unwrap();
        assert_eq!(subject.kind(), ReportKind::Cashflow);
        assert_eq!(subject.customer_name(), "Ravi");
    }
}
