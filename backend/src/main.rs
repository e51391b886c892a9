use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use fincalc::domain::commands::amortization::CalculateEmiCommand;
use fincalc::domain::commands::cashflow::{CalculateCashflowCommand, CheckEligibilityCommand};
use fincalc::domain::models::report::ReportKind;
use fincalc::domain::ExportReportResult;
use fincalc::error::{FieldIssue, FieldProblem, FinCalcError};
use fincalc::io::console;
use fincalc::io::form::{parse_number, FormValues};
use fincalc::{AppConfig, Backend};
use shared::{CashflowBasis, EligibilityResult};

const FIELD_CUSTOMER_NAME: &str = "customer_name";
const FIELD_BASIS: &str = "basis";
const FIELD_PROPOSED_INSTALLMENT: &str = "proposed_installment";

#[derive(Parser, Debug)]
#[command(name = "fincalc", version, about = "EMI, cashflow and loan eligibility calculator")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for exported reports (default: Documents)
    #[arg(long = "output-dir", global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// EMI, total interest and broken-period interest
    Emi(EmiArgs),
    /// Monthly cashflow and, optionally, loan eligibility
    Cashflow(CashflowArgs),
}

#[derive(Args, Debug)]
struct FormArgs {
    /// YAML map of field name to value
    #[arg(long)]
    form: Option<PathBuf>,

    /// Set a single field, overriding the form file
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    #[arg(long)]
    customer: Option<String>,

    /// Write the report document and spreadsheet
    #[arg(long)]
    export: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EmiArgs {
    #[command(flatten)]
    form: FormArgs,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BasisArg {
    Sales,
    Income,
}

impl From<BasisArg> for CashflowBasis {
    fn from(basis: BasisArg) -> Self {
        match basis {
            BasisArg::Sales => CashflowBasis::Sales,
            BasisArg::Income => CashflowBasis::Income,
        }
    }
}

#[derive(Args, Debug)]
struct CashflowArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Line items to use (default: the form's `basis`, else sales)
    #[arg(long, value_enum)]
    basis: Option<BasisArg>,

    /// Installment to check eligibility for
    #[arg(long = "proposed-installment")]
    proposed_installment: Option<String>,

    /// Write the cashflow bar chart (SVG) here
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Write the eligibility bar chart (SVG) here
    #[arg(long = "eligibility-chart")]
    eligibility_chart: Option<PathBuf>,
}

impl FormArgs {
    fn load_form(&self) -> Result<FormValues> {
        let mut form = match &self.form {
            Some(path) => FormValues::load(path)
                .with_context(|| format!("reading form {}", path.display()))?,
            None => FormValues::new(),
        };
        form.apply_assignments(self.set.as_slice())?;
        Ok(form)
    }

    fn customer_name(&self, form: &FormValues) -> String {
        self.customer
            .clone()
            .or_else(|| form.text(FIELD_CUSTOMER_NAME))
            .unwrap_or_default()
    }
}

fn resolve_basis(flag: Option<BasisArg>, form: &FormValues) -> Result<CashflowBasis, FinCalcError> {
    if let Some(basis) = flag {
        return Ok(basis.into());
    }
    match form.text(FIELD_BASIS) {
        Some(raw) => raw
            .parse()
            .map_err(|msg| {
                let issue = FieldIssue::new(FIELD_BASIS, FieldProblem::Unsupported(msg));
                FinCalcError::Validation(vec![issue])
            }),
        None => Ok(CashflowBasis::Sales),
    }
}

fn write_chart(path: &Path, svg: &str) -> Result<()> {
    fs::write(path, svg).with_context(|| format!("writing chart {}", path.display()))?;
    info!("📊 CHART: Saved to {:?}", path);
    Ok(())
}

fn export_json(result: &ExportReportResult) -> serde_json::Value {
    serde_json::json!({
        "document_path": result.document_path,
        "spreadsheet_path": result.spreadsheet_path,
        "spreadsheet_error": result.spreadsheet_error,
        "captured_at": result.meta.display_timestamp(),
        "location": result.meta.location_label(),
    })
}

async fn run_emi(backend: &mut Backend, args: EmiArgs) -> Result<()> {
    let form = args.form.load_form()?;
    let customer_name = args.form.customer_name(&form);
    let record = backend.calculate_emi(CalculateEmiCommand { customer_name, form })?.clone();

    let export = if args.form.export {
        Some(backend.export(ReportKind::Emi).await?)
    } else {
        None
    };

    if args.form.json {
        let output = serde_json::json!({
            "emi": record,
            "export": export.as_ref().map(export_json),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let currency = &backend.config.report.currency_symbol;
        println!("{}", console::amortization_summary(&record.result, currency));
        if let Some(export) = &export {
            println!("{}", console::export_summary(export));
        }
    }
    Ok(())
}

async fn run_cashflow(backend: &mut Backend, args: CashflowArgs) -> Result<()> {
    let form = args.form.load_form()?;
    let customer_name = args.form.customer_name(&form);
    let basis = resolve_basis(args.basis, &form)?;
    let proposed_installment = args
        .proposed_installment
        .clone()
        .or_else(|| form.text(FIELD_PROPOSED_INSTALLMENT));

    let record = backend
        .calculate_cashflow(CalculateCashflowCommand { customer_name, basis, form })
        .clone();

    if let Some(path) = &args.chart {
        write_chart(path, &backend.chart_service.render_cashflow_chart(&record.result)?)?;
    }

    // eligibility is only checked when asked for
    let eligibility: Option<EligibilityResult> = match &proposed_installment {
        Some(_) => Some(
            backend
                .check_eligibility(CheckEligibilityCommand {
                    proposed_installment: proposed_installment.clone(),
                })?
                .clone(),
        ),
        None => None,
    };

    if let Some(path) = &args.eligibility_chart {
        let offered = proposed_installment
            .as_deref()
            .and_then(parse_number)
            .context("--eligibility-chart needs a proposed installment")?;
        let svg = backend
            .chart_service
            .render_eligibility_chart(record.result.disposable_income, offered)?;
        write_chart(path, &svg)?;
    }

    let export = if args.form.export {
        Some(backend.export(ReportKind::Cashflow).await?)
    } else {
        None
    };

    if args.form.json {
        let output = serde_json::json!({
            "cashflow": record,
            "eligibility": eligibility,
            "export": export.as_ref().map(export_json),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let currency = &backend.config.report.currency_symbol;
        println!("{}", console::cashflow_summary(&record.result, currency));
        if let Some(eligibility) = &eligibility {
            println!("{}", console::eligibility_summary(eligibility, currency));
        }
        if let Some(export) = &export {
            println!("{}", console::export_summary(export));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut backend = Backend::new(config, cli.output_dir.as_deref())?;

    match cli.command {
        Command::Emi(args) => run_emi(&mut backend, args).await,
        Command::Cashflow(args) => run_cashflow(&mut backend, args).await,
    }
}
