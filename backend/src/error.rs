//! Error type shared by every FinCalc operation.
//!
//! Validation and precondition failures are meant to be shown to the user as
//! a blocking notice. A rejected eligibility check is not an error; see
//! `shared::EligibilityResult::NotEligible`.

use std::fmt;
use thiserror::Error;

use crate::domain::models::report::ReportKind;

/// What is wrong with a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// absent or blank
    Missing,
    /// present but not a number
    NotNumeric(String),
    /// parsed but zero or negative where a positive value is required
    NotPositive,
    /// parsed but negative where zero or more is required
    Negative,
    /// parsed but above the accepted maximum
    TooLarge(u32),
    /// not one of the accepted choices
    Unsupported(String),
}

/// A rejected form field, named by its form key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: FieldProblem,
}

impl FieldIssue {
    pub fn new<S: ToString>(field: S, problem: FieldProblem) -> Self {
        Self {
            field: field.to_string(),
            problem,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            FieldProblem::Missing => write!(f, "'{}' is required", self.field),
            FieldProblem::NotNumeric(raw) => {
                write!(f, "'{}' is not a number ({:?})", self.field, raw)
            }
            FieldProblem::NotPositive => write!(f, "'{}' must be greater than zero", self.field),
            FieldProblem::Negative => write!(f, "'{}' cannot be negative", self.field),
            FieldProblem::TooLarge(max) => write!(f, "'{}' cannot exceed {}", self.field, max),
            FieldProblem::Unsupported(msg) => write!(f, "'{}': {}", self.field, msg),
        }
    }
}

/// An operation was requested before the data it needs exists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please calculate cashflow first")]
    NoCashflow,
    #[error("Enter proposed EMI")]
    MissingProposedInstallment,
    #[error("Please calculate first! (no {0} result to export)")]
    NothingToExport(ReportKind),
}

#[derive(Debug, Error)]
pub enum FinCalcError {
    #[error("Please fill all fields: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("document export failed: {0}")]
    Document(String),

    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FinCalcError {
    /// Field issues carried by a validation error, empty otherwise
    pub fn field_issues(&self) -> &[FieldIssue] {
        match self {
            FinCalcError::Validation(issues) => issues,
            _ => &[],
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for FinCalcError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        FinCalcError::Spreadsheet(err.to_string())
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, FinCalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = FinCalcError::Validation(vec![
            FieldIssue::new("loan_amount", FieldProblem::Missing),
            FieldIssue::new("tenure", FieldProblem::NotPositive),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("Please fill all fields"));
        assert!(msg.contains("'loan_amount' is required"));
        assert!(msg.contains("'tenure' must be greater than zero"));
        assert_eq!(err.field_issues().len(), 2);
    }

    #[test]
    fn test_precondition_is_transparent() {
        let err: FinCalcError = PreconditionError::NoCashflow.into();
        assert_eq!(err.to_string(), "Please calculate cashflow first");
        assert!(err.field_issues().is_empty());
    }
}
