//! Unvalidated form state

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::{ChurnError, Result};
use crate::types::{CustomerFeatureRecord, FeatureName};

/// Raw values as typed by the user or read from an input file.
///
/// Keys are typed column names, so a misnamed column cannot be stored; a
/// column that was never entered is simply absent. Iteration follows schema
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCustomerInput {
    values: BTreeMap<FeatureName, String>,
}

impl RawCustomerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any previous one
    pub fn set(&mut self, name: FeatureName, value: impl Into<String>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    /// Chainable variant of [`RawCustomerInput::set`]
    pub fn with(mut self, name: FeatureName, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: FeatureName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    pub fn remove(&mut self, name: FeatureName) -> Option<String> {
        self.values.remove(&name)
    }

    pub fn contains(&self, name: FeatureName) -> bool {
        self.values.contains_key(&name)
    }

    /// Number of columns with a value
    pub fn answered(&self) -> usize {
        self.values.len()
    }

    /// Parse a JSON object keyed by column names.
    ///
    /// Strings and numbers are accepted as values, `null` counts as absent.
    /// Keys must match a column name exactly. Unknown keys and other value
    /// types fail with a validation error naming the key.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = match value {
            Value::Object(object) => object,
            _ => {
                return Err(ChurnError::validation(
                    "<record>",
                    "expected a JSON object keyed by feature name",
                ))
            }
        };

        let mut input = Self::new();
        for (key, value) in object {
            let name = FeatureName::ALL
                .iter()
                .copied()
                .find(|f| f.as_str() == key)
                .ok_or_else(|| ChurnError::validation(key.as_str(), "unknown feature name"))?;
            match value {
                Value::Null => {}
                Value::String(s) => {
                    input.set(name, s);
                }
                Value::Number(n) => {
                    input.set(name, n.to_string());
                }
                other => {
                    return Err(ChurnError::validation(
                        key.as_str(),
                        format!("expected a string or number, got {}", other),
                    ))
                }
            }
        }
        debug!(columns = input.answered(), "raw input parsed");
        Ok(input)
    }

    /// Reference customer: a new month-to-month fiber subscriber.
    pub fn example() -> Self {
        Self::new()
            .with(FeatureName::Gender, "Female")
            .with(FeatureName::SeniorCitizen, "0")
            .with(FeatureName::Partner, "Yes")
            .with(FeatureName::Dependents, "No")
            .with(FeatureName::Tenure, "1")
            .with(FeatureName::PhoneService, "Yes")
            .with(FeatureName::MultipleLines, "No")
            .with(FeatureName::InternetService, "Fiber optic")
            .with(FeatureName::OnlineSecurity, "No")
            .with(FeatureName::OnlineBackup, "No")
            .with(FeatureName::DeviceProtection, "No")
            .with(FeatureName::TechSupport, "No")
            .with(FeatureName::StreamingTV, "No")
            .with(FeatureName::StreamingMovies, "No")
            .with(FeatureName::Contract, "Month-to-month")
            .with(FeatureName::PaperlessBilling, "Yes")
            .with(FeatureName::PaymentMethod, "Electronic check")
            .with(FeatureName::MonthlyCharges, "70.5")
            .with(FeatureName::TotalCharges, "70.5")
    }
}

impl From<&CustomerFeatureRecord> for RawCustomerInput {
    fn from(record: &CustomerFeatureRecord) -> Self {
        let mut input = Self::new();
        for (name, value) in record.fields() {
            input.set(name, value.category());
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut input = RawCustomerInput::new();
        input.set(FeatureName::Tenure, "12");
        assert_eq!(input.get(FeatureName::Tenure), Some("12"));
        assert!(!input.contains(FeatureName::Gender));
        assert_eq!(input.answered(), 1);
    }

    #[test]
    fn test_from_json_accepts_numbers_and_strings() {
        let input =
            RawCustomerInput::from_json_str(r#"{"tenure": 5, "gender": "Male", "Partner": null}"#)
                .unwrap();
        assert_eq!(input.get(FeatureName::Tenure), Some("5"));
        assert_eq!(input.get(FeatureName::Gender), Some("Male"));
        assert!(!input.contains(FeatureName::Partner));
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let err = RawCustomerInput::from_json_str(r#"{"Tenure": 5}"#).unwrap_err();
        assert_eq!(err.field(), Some("Tenure"));
    }

    #[test]
    fn test_from_json_rejects_padded_key() {
        let err = RawCustomerInput::from_json_str(r#"{" tenure ": 5}"#).unwrap_err();
        assert_eq!(err.field(), Some(" tenure "));

        let err =
            RawCustomerInput::from_json_str(r#"{"tenure": 5, "tenure ": 70}"#).unwrap_err();
        assert_eq!(err.field(), Some("tenure "));
    }

    #[test]
    fn test_from_json_rejects_bool_value() {
        let err = RawCustomerInput::from_json_str(r#"{"Partner": true}"#).unwrap_err();
        assert_eq!(err.field(), Some("Partner"));
    }

    #[test]
    fn test_from_json_rejects_array() {
        let err = RawCustomerInput::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ChurnError::Validation { .. }));
    }

    #[test]
    fn test_example_is_complete() {
        assert_eq!(RawCustomerInput::example().answered(), 19);
    }
}
