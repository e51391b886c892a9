//! Plain-text result summaries for the terminal.

use shared::{format_amount, AmortizationResult, CashflowResult, EligibilityResult};

use crate::domain::ExportReportResult;

fn line(label: &str, currency: &str, amount: f64) -> String {
    format!("{:<24} {} {}", format!("{}:", label), currency, format_amount(amount))
}

pub fn amortization_summary(result: &AmortizationResult, currency: &str) -> String {
    [
        line("Monthly EMI", currency, result.installment),
        line("Total Interest", currency, result.total_interest),
        line("Total Amount", currency, result.total_payable),
        line("Broken Period Interest", currency, result.broken_period_interest),
        line("Per-day Interest", currency, result.per_day_interest),
    ]
    .join("\n")
}

pub fn cashflow_summary(result: &CashflowResult, currency: &str) -> String {
    let mut lines: Vec<String> = result
        .lines
        .iter()
        .map(|item| {
            format!(
                "  {:<8} {:<24} {}",
                item.direction.to_string(),
                item.description,
                format_amount(item.amount)
            )
        })
        .collect();
    lines.push(line("Total Inflow", currency, result.total_inflow));
    lines.push(line("Total Outflow", currency, result.total_outflow));
    lines.push(line("Disposable Income", currency, result.disposable_income));
    lines.join("\n")
}

pub fn eligibility_summary(result: &EligibilityResult, currency: &str) -> String {
    match result {
        EligibilityResult::Eligible { .. } => {
            format!("{:<24} {} {}", "Eligible Loan Amount:", currency, result)
        }
        EligibilityResult::NotEligible { .. } => {
            format!("{:<24} {}", "Eligible Loan Amount:", result)
        }
    }
}

pub fn export_summary(result: &ExportReportResult) -> String {
    let mut lines = vec![format!("Document saved to {}", result.document_path.display())];
    match (&result.spreadsheet_path, &result.spreadsheet_error) {
        (Some(path), _) => lines.push(format!("Spreadsheet saved to {}", path.display())),
        (None, Some(err)) => lines.push(format!("Spreadsheet not saved: {}", err)),
        (None, None) => {}
    }
    lines.join("\n")
}
