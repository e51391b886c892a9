use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days counted in one month for the cashflow projections
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Days counted in one year for simple interest
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Longest loan term accepted, in months (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Loan terms entered on the EMI form, already validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// Amount borrowed (> 0)
    pub principal: f64,
    /// Yearly interest rate as a percentage, e.g. 12.0 for 12% (> 0)
    pub annual_rate_percent: f64,
    /// Number of monthly installments (> 0)
    pub term_months: u32,
    /// Days between disbursement and the first installment period
    pub broken_days: u32,
}

impl AmortizationInput {
    /// Monthly rate as a fraction (12% yearly gives 0.01)
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 12.0 / 100.0
    }
}

/// Figures derived from an `AmortizationInput`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Fixed monthly payment
    pub installment: f64,
    pub total_interest: f64,
    /// Installment times the number of months
    pub total_payable: f64,
    /// Simple interest charged for the stub period before the first installment
    pub broken_period_interest: f64,
    pub per_day_interest: f64,
}

/// Which set of line items drives a cashflow calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowBasis {
    /// Business customers declaring daily sales and a margin
    Sales,
    /// Salaried or wage customers
    Income,
}

impl fmt::Display for CashflowBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashflowBasis::Sales => write!(f, "sales"),
            CashflowBasis::Income => write!(f, "income"),
        }
    }
}

impl FromStr for CashflowBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(CashflowBasis::Sales),
            "income" => Ok(CashflowBasis::Income),
            other => Err(format!(
                "unknown cashflow basis '{}' (expected 'sales' or 'income')",
                other
            )),
        }
    }
}

/// Sales-basis line items, all monthly except `daily_sales`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesBasis {
    pub daily_sales: f64,
    /// Gross margin on sales as a percentage
    pub margin_percent: f64,
    pub direct_expense: f64,
    pub household_expense: f64,
    pub child_expense: f64,
    pub electricity_expense: f64,
    /// Installments already being paid on existing loans
    pub installment: f64,
}

/// Income-basis line items, all monthly except `daily_wage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeBasis {
    pub daily_wage: f64,
    pub monthly_wage: f64,
    pub household_expense: f64,
    pub other_income: f64,
    pub indirect_expense: f64,
    /// Installments already being paid on existing loans
    pub installment: f64,
}

/// Declared cashflow, exactly one basis per calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum CashflowInput {
    Sales(SalesBasis),
    Income(IncomeBasis),
}

impl CashflowInput {
    pub fn basis(&self) -> CashflowBasis {
        match self {
            CashflowInput::Sales(_) => CashflowBasis::Sales,
            CashflowInput::Income(_) => CashflowBasis::Income,
        }
    }
}

/// Direction of money for a cashflow line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single monthly line item of a cashflow statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowLine {
    pub direction: FlowDirection,
    pub description: String,
    pub amount: f64,
}

/// Monthly cashflow statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowResult {
    pub basis: CashflowBasis,
    /// Line items in form order, inflows first
    pub lines: Vec<CashflowLine>,
    pub total_inflow: f64,
    pub total_outflow: f64,
    /// `total_inflow - total_outflow`, negative when expenses exceed income
    pub disposable_income: f64,
}

impl CashflowResult {
    /// Build a statement from its lines, deriving all totals
    pub fn from_lines(basis: CashflowBasis, lines: Vec<CashflowLine>) -> Self {
        let sum = |direction: FlowDirection| {
            lines
                .iter()
                .filter(|line| line.direction == direction)
                .map(|line| line.amount)
                .sum::<f64>()
        };
        let total_inflow = sum(FlowDirection::Inflow);
        let total_outflow = sum(FlowDirection::Outflow);
        Self {
            basis,
            lines,
            total_inflow,
            total_outflow,
            disposable_income: total_inflow - total_outflow,
        }
    }
}

/// Outcome of a loan eligibility check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EligibilityResult {
    /// The proposed installment fits in the disposable income
    Eligible {
        /// Largest principal serviceable at the proposed installment
        principal: f64,
        annual_rate_percent: f64,
        term_months: u32,
    },
    /// Business rejection: the proposed installment exceeds disposable income
    NotEligible {
        proposed_installment: f64,
        disposable_income: f64,
    },
}

impl EligibilityResult {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityResult::Eligible { .. })
    }
}

impl fmt::Display for EligibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityResult::Eligible { principal, .. } => write!(f, "{:.2}", principal),
            EligibilityResult::NotEligible { .. } => write!(f, "Not Eligible (EMI > Disposable)"),
        }
    }
}

/// Approximate position of the device that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.5}, Lon: {:.5}", self.latitude, self.longitude)
    }
}

/// Metadata stamped on every exported report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Capture instant in the report timezone, whole seconds
    pub captured_at: DateTime<FixedOffset>,
    /// Short name of the report timezone, e.g. "IST"
    pub timezone_label: String,
    pub coordinates: Option<Coordinates>,
}

impl ReportMeta {
    /// Timestamp used in file names: `YYYY-MM-DD_HH-MM-SS`
    pub fn file_timestamp(&self) -> String {
        self.captured_at.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    /// Timestamp shown in report headers: `YYYY-MM-DD HH:MM:SS`
    pub fn display_timestamp(&self) -> String {
        self.captured_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn location_label(&self) -> String {
        match &self.coordinates {
            Some(coordinates) => coordinates.to_string(),
            None => "Location not available".to_string(),
        }
    }
}

/// Format an amount the way every summary shows it
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_meta(coordinates: Option<Coordinates>) -> ReportMeta {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        ReportMeta {
            captured_at: ist.with_ymd_and_hms(2025, 3, 9, 7, 5, 3).unwrap(),
            timezone_label: "IST".to_string(),
            coordinates,
        }
    }

    #[test]
    fn test_cashflow_totals_from_lines() {
        let lines = vec![
            CashflowLine {
                direction: FlowDirection::Inflow,
                description: "Wage".into(),
                amount: 1000.0,
            },
            CashflowLine {
                direction: FlowDirection::Outflow,
                description: "Rent".into(),
                amount: 700.0,
            },
            CashflowLine {
                direction: FlowDirection::Outflow,
                description: "EMI".into(),
                amount: 500.0,
            },
        ];
        let result = CashflowResult::from_lines(CashflowBasis::Income, lines);
        assert_eq!(result.total_inflow, 1000.0);
        assert_eq!(result.total_outflow, 1200.0);
        assert_eq!(result.disposable_income, -200.0);
    }

    #[test]
    fn test_basis_parsing() {
        assert_eq!("Sales".parse::<CashflowBasis>(), Ok(CashflowBasis::Sales));
        assert_eq!(" income ".parse::<CashflowBasis>(), Ok(CashflowBasis::Income));
        assert!("salary".parse::<CashflowBasis>().is_err());
    }

    #[test]
    fn test_cashflow_input_is_tagged_by_basis() {
        let input = CashflowInput::Sales(SalesBasis { daily_sales: 2000.0, ..Default::default() });
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["basis"], "sales");
        assert_eq!(json["daily_sales"], 2000.0);
        let back: CashflowInput = serde_json::from_value(json).unwrap();
        assert_eq!(back.basis(), CashflowBasis::Sales);
    }

    #[test]
    fn test_report_meta_labels() {
        let meta = sample_meta(Some(Coordinates { latitude: 19.0760123, longitude: 72.8776559 }));
        assert_eq!(meta.file_timestamp(), "2025-03-09_07-05-03");
        assert_eq!(meta.display_timestamp(), "2025-03-09 07:05:03");
        assert_eq!(meta.location_label(), "Lat: 19.07601, Lon: 72.87766");

        let meta = sample_meta(None);
        assert_eq!(meta.location_label(), "Location not available");
    }

    #[test]
    fn test_eligibility_display() {
        let eligible = EligibilityResult::Eligible {
            principal: 94569.628,
            annual_rate_percent: 24.0,
            term_months: 24,
        };
        assert_eq!(eligible.to_string(), "94569.63");
        assert!(eligible.is_eligible());

        let rejected = EligibilityResult::NotEligible {
            proposed_installment: 9000.0,
            disposable_income: 5000.0,
        };
        assert_eq!(rejected.to_string(), "Not Eligible (EMI > Disposable)");
        assert!(!rejected.is_eligible());
    }
}
