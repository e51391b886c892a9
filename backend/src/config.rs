//! # Configuration
//!
//! FinCalc reads an optional YAML file. Every section and every key has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ## YAML Format
//!
//! ```yaml
//! eligibility:
//!   annual_rate_percent: 24.0
//!   term_months: 24
//! report:
//!   prepared_by: "FinCalc"
//!   default_customer: "Customer"
//!   utc_offset_minutes: 330
//!   timezone_label: "IST"
//!   currency_symbol: "₹"
//!   output_dir: "~/Documents/reports"
//! geolocation:
//!   timeout_secs: 8
//!   latitude: 19.07
//!   longitude: 72.87
//! export:
//!   document_format: pdf            # or: svg
//!   spreadsheet_format: xlsx        # or: csv
//!   spreadsheet_failure: continue   # or: abort
//! ```

use chrono::FixedOffset;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FinCalcError, Result};
use shared::{Coordinates, MAX_TERM_MONTHS};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub eligibility: EligibilityConfig,
    pub report: ReportConfig,
    pub geolocation: GeolocationConfig,
    pub export: ExportConfig,
}

/// Loan terms assumed when solving for the eligible principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    pub annual_rate_percent: f64,
    pub term_months: u32,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            annual_rate_percent: 24.0,
            term_months: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Name printed in the "Prepared by" header and the signature
    pub prepared_by: String,
    /// Customer name used when the form leaves it blank
    pub default_customer: String,
    /// Fixed offset of the report timezone, in minutes east of UTC
    pub utc_offset_minutes: i32,
    pub timezone_label: String,
    pub currency_symbol: String,
    /// Where artifacts are written; the documents directory when unset
    pub output_dir: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            prepared_by: "FinCalc".to_string(),
            default_customer: "Customer".to_string(),
            utc_offset_minutes: 330,
            timezone_label: "IST".to_string(),
            currency_symbol: "₹".to_string(),
            output_dir: None,
        }
    }
}

impl ReportConfig {
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            FinCalcError::InvalidConfig(format!(
                "report.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Upper bound on a position lookup before it is abandoned
    pub timeout_secs: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            latitude: None,
            longitude: None,
        }
    }
}

impl GeolocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured position, only when both halves are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }
}

/// What an export does when the spreadsheet cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadsheetFailurePolicy {
    /// log a warning, keep the document, report the failure in the result
    #[default]
    Continue,
    /// fail the whole export and remove the document already written
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Svg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadsheetFormat {
    #[default]
    Xlsx,
    Csv,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub document_format: DocumentFormat,
    pub spreadsheet_format: SpreadsheetFormat,
    pub spreadsheet_failure: SpreadsheetFailurePolicy,
}

impl AppConfig {
    /// Load from `path`, or return the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let yaml_content = fs::read_to_string(path)?;
                let config = Self::from_yaml(&yaml_content)?;
                info!("⚙️ CONFIG: Loaded configuration from {:?}", path);
                config
            }
            None => {
                debug!("⚙️ CONFIG: No configuration file, using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    fn validate(&self) -> Result<()> {
        self.report.utc_offset()?;
        let rate = self.eligibility.annual_rate_percent;
        if rate.is_nan() || rate < 0.0 {
            return Err(FinCalcError::InvalidConfig(format!(
                "eligibility.annual_rate_percent must be zero or more, got {}",
                self.eligibility.annual_rate_percent
            )));
        }
        if self.eligibility.term_months == 0 {
            return Err(FinCalcError::InvalidConfig(
                "eligibility.term_months must be greater than zero".to_string(),
            ));
        }
        if self.eligibility.term_months > MAX_TERM_MONTHS {
            return Err(FinCalcError::InvalidConfig(format!(
                "eligibility.term_months cannot exceed {}, got {}",
                MAX_TERM_MONTHS, self.eligibility.term_months
            )));
        }
        Ok(())
    }

    /// Directory for exported artifacts
    ///
    /// `override_dir` (e.g. from the command line) wins over the configured
    /// directory. Without either, fall back to the documents folder, then
    /// the home folder, then the current directory.
    pub fn output_dir(&self, override_dir: Option<&str>) -> PathBuf {
        let requested = override_dir
            .map(str::to_string)
            .or_else(|| self.report.output_dir.clone())
            .filter(|path| !path.trim().is_empty());
        match requested {
            Some(path) => PathBuf::from(sanitize_path(&path)),
            None => dirs::document_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Basic path sanitization to handle common user input issues
pub fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.trim().to_string();

    if cleaned.len() >= 2
        && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
    {
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    cleaned = cleaned.replace("\\ ", " ");

    while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
        cleaned.pop();
    }

    if cleaned.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                cleaned = home.to_string_lossy().to_string();
            } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.eligibility.annual_rate_percent, 24.0);
        assert_eq!(config.eligibility.term_months, 24);
        assert_eq!(config.report.utc_offset_minutes, 330);
        assert_eq!(config.geolocation.timeout(), Duration::from_secs(8));
        assert_eq!(config.export.spreadsheet_failure, SpreadsheetFailurePolicy::Continue);
        assert!(config.geolocation.coordinates().is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
eligibility:
  term_months: 36
export:
  spreadsheet_failure: abort
geolocation:
  latitude: 12.5
  longitude: 77.25
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.eligibility.term_months, 36);
        assert_eq!(config.eligibility.annual_rate_percent, 24.0);
        assert_eq!(config.report.prepared_by, "FinCalc");
        assert_eq!(config.export.spreadsheet_failure, SpreadsheetFailurePolicy::Abort);
        assert_eq!(
            config.geolocation.coordinates(),
            Some(Coordinates { latitude: 12.5, longitude: 77.25 })
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let mut config = AppConfig::default();
        config.report.utc_offset_minutes = 24 * 60;
        assert!(matches!(config.validate(), Err(FinCalcError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut config = AppConfig::default();
        config.eligibility.term_months = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_term_above_limit_rejected() {
        let mut config = AppConfig::default();
        config.eligibility.term_months = MAX_TERM_MONTHS;
        assert!(config.validate().is_ok());
        config.eligibility.term_months = MAX_TERM_MONTHS + 1;
        assert!(matches!(config.validate(), Err(FinCalcError::InvalidConfig(_))));
    }

    #[test]
    fn test_export_formats() {
        let config = AppConfig::default();
        assert_eq!(config.export.document_format, DocumentFormat::Pdf);
        assert_eq!(config.export.spreadsheet_format, SpreadsheetFormat::Xlsx);

        let yaml = "export:\n  document_format: svg\n  spreadsheet_format: csv\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.export.document_format, DocumentFormat::Svg);
        assert_eq!(config.export.spreadsheet_format, SpreadsheetFormat::Csv);
        assert!(AppConfig::from_yaml("export:\n  document_format: docx\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fincalc.yaml");
        fs::write(&path, "report:\n  prepared_by: \"Branch 12\"\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.report.prepared_by, "Branch 12");
    }

    #[test]
    fn test_sanitize_path() {
        let home_dir = dirs::home_dir().unwrap().to_string_lossy().to_string();
        let expected_reports = PathBuf::from(&home_dir)
            .join("reports")
            .to_string_lossy()
            .to_string();

        assert_eq!(sanitize_path("\"~/reports\""), expected_reports);
        assert_eq!(sanitize_path("'~/reports'"), expected_reports);
        assert_eq!(sanitize_path("  /path/to/dir  "), "/path/to/dir");
        assert_eq!(sanitize_path("/path\\ to\\ dir"), "/path to dir");
        assert_eq!(sanitize_path("/path/to/dir/"), "/path/to/dir");
        assert_eq!(sanitize_path("/"), "/");
    }

    #[test]
    fn test_output_dir_override_wins() {
        let mut config = AppConfig::default();
        config.report.output_dir = Some("/configured".to_string());
        assert_eq!(config.output_dir(Some("/cli/")), PathBuf::from("/cli"));
        assert_eq!(config.output_dir(None), PathBuf::from("/configured"));
    }
}
