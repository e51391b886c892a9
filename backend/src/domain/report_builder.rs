//! Shapes a finished calculation into a [`Report`].
//!
//! The builder is pure: given the same subject and metadata it always
//! produces the same report, which is then handed to every output format.

use shared::{AmortizationInput, AmortizationResult, CashflowResult, ReportMeta};

use crate::config::ReportConfig;
use crate::domain::commands::export::ReportSubject;
use crate::domain::models::report::{Report, ReportCell, SummaryItem};

#[derive(Clone, Debug)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, subject: ReportSubject<'_>, meta: ReportMeta) -> Report {
        let kind = subject.kind();
        let customer_name = match subject.customer_name().trim() {
            "" => self.config.default_customer.clone(),
            name => name.to_string(),
        };
        let (columns, rows, summary) = match subject {
            ReportSubject::Amortization(record) => {
                self.amortization_body(&record.input, &record.result)
            }
            ReportSubject::Cashflow(record) => self.cashflow_body(&record.result),
        };
        Report {
            kind,
            title: format!("{} - {}", self.config.prepared_by, kind.title()),
            prepared_by: self.config.prepared_by.clone(),
            customer_name,
            currency_symbol: self.config.currency_symbol.clone(),
            meta,
            columns,
            rows,
            summary,
        }
    }

    fn amortization_body(
        &self,
        input: &AmortizationInput,
        result: &AmortizationResult,
    ) -> (Vec<String>, Vec<Vec<ReportCell>>, Vec<SummaryItem>) {
        let row = |label: &str, value: ReportCell| vec![ReportCell::text(label), value];
        let rows = vec![
            row("Principal", ReportCell::Amount(input.principal)),
            row("Yearly Rate (%)", ReportCell::Amount(input.annual_rate_percent)),
            row("Tenure (months)", ReportCell::Count(input.term_months)),
            row("Per-day interest", ReportCell::Amount(result.per_day_interest)),
            row("Broken period (days)", ReportCell::Count(input.broken_days)),
            row("Broken period interest", ReportCell::Amount(result.broken_period_interest)),
            row("Monthly EMI", ReportCell::Amount(result.installment)),
            row("Total Interest", ReportCell::Amount(result.total_interest)),
            row("Total Amount (Principal + Interest)", ReportCell::Amount(result.total_payable)),
        ];
        let summary = vec![
            SummaryItem {
                label: "Monthly EMI".to_string(),
                amount: result.installment,
            },
            SummaryItem {
                label: "Total Amount".to_string(),
                amount: result.total_payable,
            },
        ];
        (vec!["Item".to_string(), "Value".to_string()], rows, summary)
    }

    fn cashflow_body(
        &self,
        result: &CashflowResult,
    ) -> (Vec<String>, Vec<Vec<ReportCell>>, Vec<SummaryItem>) {
        let columns = vec![
            "Type".to_string(),
            "Description".to_string(),
            format!("Amount ({})", self.config.currency_symbol),
        ];
        let rows = result
            .lines
            .iter()
            .map(|line| {
                vec![
                    ReportCell::text(line.direction),
                    ReportCell::text(&line.description),
                    ReportCell::Amount(line.amount),
                ]
            })
            .collect();
        let summary = [
            ("Total Inflow", result.total_inflow),
            ("Total Outflow", result.total_outflow),
            ("Disposable", result.disposable_income),
        ]
        .into_iter()
        .map(|(label, amount)| SummaryItem {
            label: label.to_string(),
            amount,
        })
        .collect();
        (columns, rows, summary)
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}
