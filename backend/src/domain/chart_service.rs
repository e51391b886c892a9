//! Bar chart rendering for calculation summaries.
//!
//! Charts are rendered to standalone SVG documents with plotters. The value
//! axis always includes zero, so negative figures (e.g. a negative disposable
//! income) are drawn below the axis.

use log::debug;
use plotters::prelude::*;
use std::fmt::Display;

use crate::error::{FinCalcError, Result};
use shared::CashflowResult;

const BAR_COLOR: RGBColor = RGBColor(54, 162, 235);
const NEGATIVE_BAR_COLOR: RGBColor = RGBColor(255, 99, 132);

fn chart_error<E: Display>(err: E) -> FinCalcError {
    FinCalcError::Chart(err.to_string())
}

#[derive(Clone, Debug)]
pub struct ChartService {
    width: u32,
    height: u32,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            width: 640,
            height: 400,
        }
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render one bar per label, returning the SVG document
    pub fn render_bar_chart(&self, labels: &[&str], values: &[f64], title: &str) -> Result<String> {
        if labels.is_empty() || labels.len() != values.len() {
            return Err(FinCalcError::Chart(format!(
                "expected one value per label, got {} labels and {} values",
                labels.len(),
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(FinCalcError::Chart(format!("cannot plot non-finite value {}", bad)));
        }
        let (y_min, y_max) = value_axis(values);

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(16)
                .x_label_area_size(36)
                .y_label_area_size(72)
                .build_cartesian_2d((0..labels.len()).into_segmented(), y_min..y_max)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len() + 1)
                .x_label_formatter(&|segment| match segment {
                    SegmentValue::CenterOf(i) => {
                        labels.get(*i).map(|l| l.to_string()).unwrap_or_default()
                    }
                    _ => String::new(),
                })
                .y_label_formatter(&|value| format!("{:.0}", value))
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(values.iter().enumerate().map(|(i, value)| {
                    let color = if *value < 0.0 { NEGATIVE_BAR_COLOR } else { BAR_COLOR };
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                        color.mix(0.8).filled(),
                    );
                    bar.set_margin(0, 0, 12, 12);
                    bar
                }))
                .map_err(chart_error)?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(SegmentValue::Exact(0), 0.0), (SegmentValue::Last, 0.0)],
                    BLACK.stroke_width(1),
                )))
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        debug!("📊 CHART: Rendered '{}' with {} bars ({} bytes)", title, labels.len(), svg.len());
        Ok(svg)
    }

    /// Inflow, outflow and disposable income side by side
    pub fn render_cashflow_chart(&self, cashflow: &CashflowResult) -> Result<String> {
        self.render_bar_chart(
            &["Inflow", "Outflow", "Disposable Income"],
            &[cashflow.total_inflow, cashflow.total_outflow, cashflow.disposable_income],
            "Cashflow Summary",
        )
    }

    /// Disposable income against the installment on offer
    pub fn render_eligibility_chart(
        &self,
        disposable_income: f64,
        proposed_installment: f64,
    ) -> Result<String> {
        self.render_bar_chart(
            &["Disposable Income", "EMI Offered"],
            &[disposable_income, proposed_installment],
            "Loan Eligibility",
        )
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Value range padded by 10%, always containing zero and never empty
fn value_axis(values: &[f64]) -> (f64, f64) {
    let low = values.iter().cloned().fold(0.0_f64, f64::min);
    let high = values.iter().cloned().fold(0.0_f64, f64::max);
    if low == high {
        (0.0, 1.0)
    } else {
        (low * 1.1, high * 1.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CashflowBasis, CashflowLine, FlowDirection};

    #[test]
    fn test_value_axis_contains_zero() {
        let (low, high) = value_axis(&[100.0, 50.0]);
        assert_eq!(low, 0.0);
        assert!(high > 100.0);
        let (low, high) = value_axis(&[-200.0, 100.0]);
        assert!(low < -200.0 && high > 100.0);
        assert_eq!(value_axis(&[0.0, 0.0]), (0.0, 1.0));
    }

    #[test]
    fn test_render_cashflow_chart() {
        let cashflow = CashflowResult::from_lines(
            CashflowBasis::Income,
            vec![
                CashflowLine {
                    direction: FlowDirection::Inflow,
                    description: "Wage".into(),
                    amount: 8000.0,
                },
                CashflowLine {
                    direction: FlowDirection::Outflow,
                    description: "Rent".into(),
                    amount: 9500.0,
                },
            ],
        );
        let svg = ChartService::new().render_cashflow_chart(&cashflow).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Cashflow Summary"));
    }

    #[test]
    fn test_render_eligibility_chart() {
        let svg = ChartService::with_size(320, 240)
            .render_eligibility_chart(12000.0, 5000.0)
            .unwrap();
        assert!(svg.contains("Loan Eligibility"));
    }

    #[test]
    fn test_mismatched_series_rejected() {
        let err = ChartService::new().render_bar_chart(&["a", "b"], &[1.0], "bad").unwrap_err();
        assert!(matches!(err, FinCalcError::Chart(_)));
        assert!(ChartService::new().render_bar_chart(&[], &[], "empty").is_err());
        assert!(ChartService::new().render_bar_chart(&["nan"], &[f64::NAN], "nan").is_err());
    }
}
