//! EMI amortization domain logic.
//!
//! ## Formulas
//!
//! With `P` the principal, `R` the yearly rate in percent, `r = R / 12 / 100`
//! the monthly rate and `n` the number of months:
//!
//! - installment: `P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n` when `r == 0`
//! - total payable: `installment * n`
//! - total interest: `total payable - P`
//! - broken period interest: `P * R * days / (365 * 100)`
//! - per-day interest: `(P * R / 100) / 365`
//!
//! Everything is computed at full `f64` precision; rounding only happens
//! when figures are displayed.

use log::{info, warn};

use crate::domain::commands::amortization::CalculateEmiCommand;
use crate::domain::models::records::AmortizationRecord;
use crate::error::{FieldIssue, FieldProblem, FinCalcError, Result};
use crate::io::form::{whole_count, FieldPolicy, FormValues};
use shared::{AmortizationInput, AmortizationResult, DAYS_PER_YEAR, MAX_TERM_MONTHS};

pub const FIELD_LOAN_AMOUNT: &str = "loan_amount";
pub const FIELD_ANNUAL_RATE: &str = "annual_rate";
pub const FIELD_TENURE: &str = "tenure";
pub const FIELD_BROKEN_DAYS: &str = "broken_days";

/// Fixed monthly installment for a loan
///
/// Evaluated as `P * r / (1 - (1+r)^-n)`, which equals the textbook form
/// and stays finite for any `n` (it tends to `P * r` as `n` grows).
pub fn installment(principal: f64, monthly_rate: f64, term_months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return principal / term_months as f64;
    }
    let discount = (1.0 + monthly_rate).powf(-(term_months as f64));
    principal * monthly_rate / (1.0 - discount)
}

/// Simple interest for the stub period before the first installment
pub fn broken_period_interest(principal: f64, annual_rate_percent: f64, broken_days: u32) -> f64 {
    principal * annual_rate_percent * broken_days as f64 / (DAYS_PER_YEAR * 100.0)
}

pub fn per_day_interest(principal: f64, annual_rate_percent: f64) -> f64 {
    (principal * annual_rate_percent / 100.0) / DAYS_PER_YEAR
}

/// Stateless EMI calculator
#[derive(Clone, Debug, Default)]
pub struct AmortizationService;

impl AmortizationService {
    pub fn new() -> Self {
        Self
    }

    /// Parse, validate and compute, producing a record for the session
    pub fn calculate(&self, command: CalculateEmiCommand) -> Result<AmortizationRecord> {
        let input = self.parse_input(&command.form)?;
        let result = self.compute(&input);
        info!(
            "🧮 EMI: principal {:.2} at {}% for {} months -> installment {:.2}",
            input.principal, input.annual_rate_percent, input.term_months, result.installment
        );
        Ok(AmortizationRecord {
            customer_name: command.customer_name.trim().to_string(),
            input,
            result,
        })
    }

    /// Read the EMI form
    ///
    /// Principal, rate and tenure are strict-required; broken days default
    /// to zero when absent or unreadable but cannot be negative.
    pub fn parse_input(&self, form: &FormValues) -> Result<AmortizationInput> {
        let mut issues = Vec::new();
        let mut required = |field: &str| match form.number(field, FieldPolicy::Required) {
            Ok(value) => Some(value),
            Err(issue) => {
                issues.push(issue);
                None
            }
        };
        let principal = required(FIELD_LOAN_AMOUNT);
        let annual_rate_percent = required(FIELD_ANNUAL_RATE);
        let term = required(FIELD_TENURE);

        // a tenure below one whole month truncates to zero
        let term_months = match term.map(whole_count) {
            Some(0) => {
                issues.push(FieldIssue::new(FIELD_TENURE, FieldProblem::NotPositive));
                None
            }
            Some(months) if months > MAX_TERM_MONTHS => {
                issues.push(FieldIssue::new(
                    FIELD_TENURE,
                    FieldProblem::TooLarge(MAX_TERM_MONTHS),
                ));
                None
            }
            other => other,
        };

        let broken = form
            .number(FIELD_BROKEN_DAYS, FieldPolicy::ZeroDefault)
            .unwrap_or(0.0);
        if broken < 0.0 {
            issues.push(FieldIssue::new(FIELD_BROKEN_DAYS, FieldProblem::Negative));
        }

        match (principal, annual_rate_percent, term_months) {
            (Some(principal), Some(annual_rate_percent), Some(term_months))
                if issues.is_empty() =>
            {
                Ok(AmortizationInput {
                    principal,
                    annual_rate_percent,
                    term_months,
                    broken_days: whole_count(broken),
                })
            }
            _ => {
                warn!("⚠️ EMI: Rejected form with {} invalid field(s)", issues.len());
                Err(FinCalcError::Validation(issues))
            }
        }
    }

    /// Pure computation over an already validated input
    pub fn compute(&self, input: &AmortizationInput) -> AmortizationResult {
        let installment = installment(input.principal, input.monthly_rate(), input.term_months);
        let total_payable = installment * input.term_months as f64;
        AmortizationResult {
            installment,
            total_interest: total_payable - input.principal,
            total_payable,
            broken_period_interest: broken_period_interest(
                input.principal,
                input.annual_rate_percent,
                input.broken_days,
            ),
            per_day_interest: per_day_interest(input.principal, input.annual_rate_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emi_form(principal: &str, rate: &str, tenure: &str) -> FormValues {
        FormValues::new()
            .with(FIELD_LOAN_AMOUNT, principal)
            .with(FIELD_ANNUAL_RATE, rate)
            .with(FIELD_TENURE, tenure)
    }

    fn calculate(form: FormValues) -> Result<AmortizationRecord> {
        AmortizationService::new().calculate(CalculateEmiCommand {
            customer_name: " Asha Rao ".to_string(),
            form,
        })
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 0.005, "expected {:.4}, got {:.4}", expected, actual);
    }

    #[test]
    fn test_reference_scenario() {
        let form = emi_form("100000", "12", "12").with(FIELD_BROKEN_DAYS, "10");
        let record = calculate(form).unwrap();
        assert_eq!(record.customer_name, "Asha Rao");
        assert_eq!(record.input.monthly_rate(), 0.01);

        let result = &record.result;
        assert_close(result.installment, 8884.88);
        assert_close(result.total_payable, 106618.55);
        assert_close(result.total_interest, 6618.55);
        assert_close(result.broken_period_interest, 328.77);
        assert_close(result.per_day_interest, 32.88);
    }

    #[test]
    fn test_totals_are_exact_before_rounding() {
        let service = AmortizationService::new();
        let loans = [(50000.0, 9.5, 36), (1_250_000.0, 8.25, 240), (7300.0, 30.0, 6)];
        for (principal, rate, months) in loans {
            let input = AmortizationInput {
                principal,
                annual_rate_percent: rate,
                term_months: months,
                broken_days: 0,
            };
            let result = service.compute(&input);
            assert_eq!(result.total_payable, result.installment * months as f64);
            assert_eq!(result.total_interest, result.total_payable - principal);
            assert_eq!(result.broken_period_interest, 0.0);
        }
    }

    #[test]
    fn test_zero_rate_uses_limiting_case() {
        assert_eq!(installment(120000.0, 0.0, 12), 10000.0);
        let input = AmortizationInput {
            principal: 120000.0,
            annual_rate_percent: 0.0,
            term_months: 12,
            broken_days: 5,
        };
        let result = AmortizationService::new().compute(&input);
        assert_eq!(result.installment, 10000.0);
        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.broken_period_interest, 0.0);
    }

    #[test]
    fn test_zero_rate_rejected_by_validation() {
        let err = calculate(emi_form("100000", "0", "12")).unwrap_err();
        let issues = err.field_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, FIELD_ANNUAL_RATE);
        assert_eq!(issues[0].problem, FieldProblem::NotPositive);
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let err = calculate(FormValues::new().with(FIELD_TENURE, "twelve")).unwrap_err();
        let fields: Vec<_> = err.field_issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec![FIELD_LOAN_AMOUNT, FIELD_ANNUAL_RATE, FIELD_TENURE]);
    }

    #[test]
    fn test_broken_days_default_to_zero() {
        let form = emi_form("100000", "12", "12").with(FIELD_BROKEN_DAYS, "n/a");
        let record = calculate(form).unwrap();
        assert_eq!(record.input.broken_days, 0);
        assert_eq!(record.result.broken_period_interest, 0.0);

        let record = calculate(emi_form("100000", "12", "12")).unwrap();
        assert_eq!(record.input.broken_days, 0);
    }

    #[test]
    fn test_negative_broken_days_rejected() {
        let form = emi_form("100000", "12", "12").with(FIELD_BROKEN_DAYS, "-3");
        let err = calculate(form).unwrap_err();
        assert_eq!(err.field_issues()[0].problem, FieldProblem::Negative);
    }

    #[test]
    fn test_tenure_above_limit_rejected() {
        for tenure in ["1201", "100000", "3000000000"] {
            let err = calculate(emi_form("100000", "12", tenure)).unwrap_err();
            let issues = err.field_issues();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, FIELD_TENURE);
            assert_eq!(issues[0].problem, FieldProblem::TooLarge(MAX_TERM_MONTHS));
        }
        let record = calculate(emi_form("100000", "12", "1200")).unwrap();
        assert!(record.result.installment.is_finite());
    }

    #[test]
    fn test_long_terms_stay_finite() {
        // plain (1+r)^n overflows f64 long before these terms
        for months in [100_000, u32::MAX] {
            let value = installment(100000.0, 0.01, months);
            assert!(value.is_finite());
            assert!((value - 1000.0).abs() < 1e-6);
        }
        let input = AmortizationInput {
            principal: 100000.0,
            annual_rate_percent: 12.0,
            term_months: 100_000,
            broken_days: 0,
        };
        let result = AmortizationService::new().compute(&input);
        assert!(result.total_interest.is_finite() && result.total_interest > 0.0);
    }

    #[test]
    fn test_fractional_tenure_truncates() {
        let record = calculate(emi_form("100000", "12", "12.9")).unwrap();
        assert_eq!(record.input.term_months, 12);

        let err = calculate(emi_form("100000", "12", "0.5")).unwrap_err();
        assert_eq!(err.field_issues()[0].field, FIELD_TENURE);
    }
}
