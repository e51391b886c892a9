//! Household/business cashflow and loan eligibility domain logic.
//!
//! ## Key Responsibilities
//!
//! - **Cashflow**: turning declared line items into monthly inflow, outflow
//!   and disposable income
//! - **Eligibility**: solving the largest principal a proposed installment can
//!   service under the configured rate and term
//!
//! ## Business Rules
//!
//! - Every line-item field is zero-default: blank or unreadable means 0
//! - Daily figures are scaled by a 30-day month
//! - Disposable income may be negative and is never clamped
//! - An installment equal to the disposable income is still eligible

use log::{info, warn};

use crate::config::EligibilityConfig;
use crate::domain::commands::cashflow::{CalculateCashflowCommand, CheckEligibilityCommand};
use crate::domain::models::records::CashflowRecord;
use crate::error::{PreconditionError, Result};
use crate::io::form::{parse_number, FieldPolicy, FormValues};
use shared::{
    CashflowBasis, CashflowInput, CashflowLine, CashflowResult, EligibilityResult, FlowDirection,
    IncomeBasis, SalesBasis, DAYS_PER_MONTH,
};

pub const FIELD_PER_DAY_SALES: &str = "per_day_sales";
pub const FIELD_MARGIN: &str = "margin";
pub const FIELD_DIRECT_EXPENSE: &str = "direct_expense";
pub const FIELD_HOUSEHOLD_EXPENSE: &str = "household_expense";
pub const FIELD_CHILD_EXPENSE: &str = "child_expense";
pub const FIELD_ELECTRICITY_EXPENSE: &str = "electricity_expense";
pub const FIELD_INSTALLMENT: &str = "installment";
pub const FIELD_PER_DAY_WAGE: &str = "per_day_wage";
pub const FIELD_MONTHLY_WAGE: &str = "monthly_wage";
pub const FIELD_OTHER_INCOME: &str = "other_income";
pub const FIELD_INDIRECT_EXPENSE: &str = "indirect_expense";

/// Principal serviceable by `installment` over `term_months` at `monthly_rate`
///
/// Inverse of the fixed-installment formula: `E * (1 - (1+r)^-n) / r`, or
/// `E * n` when `r == 0`.
pub fn principal_for_installment(installment: f64, monthly_rate: f64, term_months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return installment * term_months as f64;
    }
    installment * (1.0 - (1.0 + monthly_rate).powf(-(term_months as f64))) / monthly_rate
}

/// Cashflow calculator plus the eligibility solve that depends on it
#[derive(Clone, Debug)]
pub struct CashflowService {
    eligibility: EligibilityConfig,
}

impl CashflowService {
    pub fn new(eligibility: EligibilityConfig) -> Self {
        Self { eligibility }
    }

    /// Compute a cashflow statement; never fails, unreadable fields count as 0
    pub fn calculate(&self, command: CalculateCashflowCommand) -> CashflowRecord {
        let input = self.parse_input(command.basis, &command.form);
        let result = self.compute(&input);
        info!(
            "💰 CASHFLOW: {} basis -> inflow {:.2}, outflow {:.2}, disposable {:.2}",
            result.basis, result.total_inflow, result.total_outflow, result.disposable_income
        );
        CashflowRecord {
            customer_name: command.customer_name.trim().to_string(),
            input,
            result,
        }
    }

    pub fn parse_input(&self, basis: CashflowBasis, form: &FormValues) -> CashflowInput {
        let value = |field: &str| form.number(field, FieldPolicy::ZeroDefault).unwrap_or(0.0);
        match basis {
            CashflowBasis::Sales => CashflowInput::Sales(SalesBasis {
                daily_sales: value(FIELD_PER_DAY_SALES),
                margin_percent: value(FIELD_MARGIN),
                direct_expense: value(FIELD_DIRECT_EXPENSE),
                household_expense: value(FIELD_HOUSEHOLD_EXPENSE),
                child_expense: value(FIELD_CHILD_EXPENSE),
                electricity_expense: value(FIELD_ELECTRICITY_EXPENSE),
                installment: value(FIELD_INSTALLMENT),
            }),
            CashflowBasis::Income => CashflowInput::Income(IncomeBasis {
                daily_wage: value(FIELD_PER_DAY_WAGE),
                monthly_wage: value(FIELD_MONTHLY_WAGE),
                household_expense: value(FIELD_HOUSEHOLD_EXPENSE),
                other_income: value(FIELD_OTHER_INCOME),
                indirect_expense: value(FIELD_INDIRECT_EXPENSE),
                installment: value(FIELD_INSTALLMENT),
            }),
        }
    }

    /// Itemise the input and derive the totals from the items
    pub fn compute(&self, input: &CashflowInput) -> CashflowResult {
        let inflow = |description: &str, amount: f64| CashflowLine {
            direction: FlowDirection::Inflow,
            description: description.to_string(),
            amount,
        };
        let outflow = |description: &str, amount: f64| CashflowLine {
            direction: FlowDirection::Outflow,
            description: description.to_string(),
            amount,
        };
        let lines = match input {
            CashflowInput::Sales(sales) => vec![
                inflow(
                    "Sales margin (30 days)",
                    sales.daily_sales * DAYS_PER_MONTH * (sales.margin_percent / 100.0),
                ),
                outflow("Direct expense", sales.direct_expense),
                outflow("Household expense", sales.household_expense),
                outflow("Child expense", sales.child_expense),
                outflow("Electricity expense", sales.electricity_expense),
                outflow("Existing EMI", sales.installment),
            ],
            CashflowInput::Income(income) => vec![
                inflow("Daily wage (30 days)", income.daily_wage * DAYS_PER_MONTH),
                inflow("Monthly wage", income.monthly_wage),
                inflow("Other income", income.other_income),
                outflow("Household expense", income.household_expense),
                outflow("Indirect expense", income.indirect_expense),
                outflow("Existing EMI", income.installment),
            ],
        };
        CashflowResult::from_lines(input.basis(), lines)
    }

    /// Largest principal the proposed installment can service
    ///
    /// Requires a cashflow computed earlier in the same session. Exceeding
    /// the disposable income is a `NotEligible` result, not an error.
    pub fn check_eligibility(
        &self,
        command: CheckEligibilityCommand,
        last_cashflow: Option<&CashflowRecord>,
    ) -> Result<EligibilityResult> {
        let cashflow = last_cashflow.ok_or(PreconditionError::NoCashflow)?;
        let proposed_installment = command
            .proposed_installment
            .as_deref()
            .and_then(parse_number)
            .filter(|value| *value > 0.0)
            .ok_or(PreconditionError::MissingProposedInstallment)?;

        let disposable_income = cashflow.result.disposable_income;
        if proposed_installment > disposable_income {
            warn!(
                "❌ ELIGIBILITY: Proposed EMI {:.2} exceeds disposable income {:.2}",
                proposed_installment, disposable_income
            );
            return Ok(EligibilityResult::NotEligible {
                proposed_installment,
                disposable_income,
            });
        }

        let monthly_rate = self.eligibility.annual_rate_percent / 12.0 / 100.0;
        let term_months = self.eligibility.term_months;
        let principal = principal_for_installment(proposed_installment, monthly_rate, term_months);
        info!(
            "✅ ELIGIBILITY: EMI {:.2} over {} months at {}% -> principal {:.2}",
            proposed_installment, term_months, self.eligibility.annual_rate_percent, principal
        );
        Ok(EligibilityResult::Eligible {
            principal,
            annual_rate_percent: self.eligibility.annual_rate_percent,
            term_months: self.eligibility.term_months,
        })
    }
}

impl Default for CashflowService {
    fn default() -> Self {
        Self::new(EligibilityConfig::default())
    }
}
