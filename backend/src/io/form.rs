//! Raw form values and the per-field parsing policy.
//!
//! A form is a flat map from field key to the text the user typed. Each
//! calculator states, field by field, whether a value is required
//! ([`FieldPolicy::Required`]) or silently treated as zero when absent or
//! unreadable ([`FieldPolicy::ZeroDefault`]).

use log::debug;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{FieldIssue, FieldProblem, FinCalcError, Result};

/// How a numeric field reacts to missing or unreadable input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// must be present, numeric and strictly positive
    Required,
    /// absent or non-numeric reads as 0
    ZeroDefault,
}

/// Field values as entered, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for tests and callers embedding the library
    pub fn with<K: ToString, V: ToString>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<K: ToString, V: ToString>(&mut self, key: K, value: V) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed text of a field, `None` when absent or blank
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Read a numeric field under the given policy
    pub fn number(&self, key: &str, policy: FieldPolicy) -> std::result::Result<f64, FieldIssue> {
        let raw = self.text(key);
        match policy {
            FieldPolicy::Required => {
                let raw = raw.ok_or_else(|| FieldIssue::new(key, FieldProblem::Missing))?;
                let value = parse_number(&raw)
                    .ok_or_else(|| FieldIssue::new(key, FieldProblem::NotNumeric(raw.clone())))?;
                if value > 0.0 {
                    Ok(value)
                } else {
                    Err(FieldIssue::new(key, FieldProblem::NotPositive))
                }
            }
            FieldPolicy::ZeroDefault => Ok(raw.as_deref().and_then(parse_number).unwrap_or(0.0)),
        }
    }

    /// Parse a YAML mapping of field name to scalar value
    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let mut form = Self::new();
        if yaml_content.trim().is_empty() {
            return Ok(form);
        }
        let map: BTreeMap<String, Value> = serde_yaml::from_str(yaml_content)?;
        let mut issues = Vec::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => form.set(key, s),
                Value::Number(n) => form.set(key, n),
                Value::Bool(b) => form.set(key, b),
                _ => issues.push(FieldIssue::new(
                    key,
                    FieldProblem::Unsupported("expected a single value".to_string()),
                )),
            }
        }
        if issues.is_empty() {
            Ok(form)
        } else {
            Err(FinCalcError::Validation(issues))
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let form = Self::from_yaml(&contents)?;
        debug!("📝 FORM: Loaded {} fields from {:?}", form.len(), path);
        Ok(form)
    }

    /// Apply `key=value` assignments on top of the current values
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<()> {
        let mut issues = Vec::new();
        for assignment in assignments {
            match assignment.as_ref().split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => self.set(key.trim(), value.trim()),
                _ => issues.push(FieldIssue::new(
                    assignment.as_ref(),
                    FieldProblem::Unsupported("expected key=value".to_string()),
                )),
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(FinCalcError::Validation(issues))
        }
    }
}

/// Parse user-typed numeric text
///
/// Surrounding whitespace and `,` digit-group separators are ignored.
/// Infinite and NaN values are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Truncate a parsed value to a whole count, as `parseInt` would read it
pub fn whole_count(value: f64) -> u32 {
    value.trunc().clamp(0.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1,00,000 "), Some(100000.0));
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_required_policy() {
        let form = FormValues::new()
            .with("ok", "250")
            .with("blank", "   ")
            .with("word", "ten")
            .with("zero", "0")
            .with("negative", "-1");
        assert_eq!(form.number("ok", FieldPolicy::Required), Ok(250.0));
        assert_eq!(
            form.number("missing", FieldPolicy::Required).unwrap_err().problem,
            FieldProblem::Missing
        );
        assert_eq!(
            form.number("blank", FieldPolicy::Required).unwrap_err().problem,
            FieldProblem::Missing
        );
        assert_eq!(
            form.number("word", FieldPolicy::Required).unwrap_err().problem,
            FieldProblem::NotNumeric("ten".to_string())
        );
        assert_eq!(
            form.number("zero", FieldPolicy::Required).unwrap_err().problem,
            FieldProblem::NotPositive
        );
        assert_eq!(
            form.number("negative", FieldPolicy::Required).unwrap_err().problem,
            FieldProblem::NotPositive
        );
    }

    #[test]
    fn test_zero_default_policy() {
        let form = FormValues::new()
            .with("word", "ten")
            .with("value", "42.5")
            .with("negative", "-7");
        assert_eq!(form.number("missing", FieldPolicy::ZeroDefault), Ok(0.0));
        assert_eq!(form.number("word", FieldPolicy::ZeroDefault), Ok(0.0));
        assert_eq!(form.number("value", FieldPolicy::ZeroDefault), Ok(42.5));
        assert_eq!(form.number("negative", FieldPolicy::ZeroDefault), Ok(-7.0));
    }

    #[test]
    fn test_whole_count_truncates() {
        assert_eq!(whole_count(12.9), 12);
        assert_eq!(whole_count(0.4), 0);
        assert_eq!(whole_count(-3.0), 0);
    }

    #[test]
    fn test_from_yaml_accepts_scalars() {
        let yaml =
            "loan_amount: 100000\nannual_rate: \"12\"\ncustomer_name: Asha Rao\nbroken_days: ~\n";
        let form = FormValues::from_yaml(yaml).unwrap();
        assert_eq!(form.get("loan_amount"), Some("100000"));
        assert_eq!(form.get("annual_rate"), Some("12"));
        assert_eq!(form.text("customer_name"), Some("Asha Rao".to_string()));
        assert_eq!(form.get("broken_days"), None);
    }

    #[test]
    fn test_from_yaml_rejects_nested_values() {
        let err = FormValues::from_yaml("tenure:\n  - 12\n").unwrap_err();
        assert_eq!(err.field_issues()[0].field, "tenure");
    }

    #[test]
    fn test_apply_assignments() {
        let mut form = FormValues::new().with("tenure", "12");
        form.apply_assignments(&["tenure=24", " margin = 15 "]).unwrap();
        assert_eq!(form.get("tenure"), Some("24"));
        assert_eq!(form.get("margin"), Some("15"));

        let err = form.apply_assignments(&["nonsense"]).unwrap_err();
        assert_eq!(err.field_issues().len(), 1);
    }
}
