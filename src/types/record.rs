//! The single-row feature record handed to the classifier

use serde::Serialize;
use std::fmt;

use super::features::{
    AddonService, Contract, FeatureName, Gender, InternetService, MultipleLines, PaymentMethod,
    SeniorCitizen, YesNo, FEATURE_COUNT,
};

/// One value of the model input row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Text(&'static str),
    Integer(i64),
    Decimal(f64),
}

impl FeatureValue {
    /// Numeric view, for scaled columns
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Text(_) => None,
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Decimal(v) => Some(*v),
        }
    }

    /// Category view, for one-hot columns. Integers render as their code.
    pub fn category(&self) -> String {
        match self {
            FeatureValue::Text(s) => s.to_string(),
            FeatureValue::Integer(v) => v.to_string(),
            FeatureValue::Decimal(v) => v.to_string(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::Integer(v) => write!(f, "{}", v),
            FeatureValue::Decimal(v) => write!(f, "{:.2}", v),
        }
    }
}

/// One customer's attributes, shaped exactly like the model's input schema.
///
/// Only [`crate::validation::FeatureRecordBuilder`] constructs records, so a
/// value of this type always satisfies every domain and the dependent-service
/// policy. It is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerFeatureRecord {
    #[serde(rename = "gender")]
    pub(crate) gender: Gender,
    #[serde(rename = "SeniorCitizen")]
    pub(crate) senior_citizen: SeniorCitizen,
    #[serde(rename = "Partner")]
    pub(crate) partner: YesNo,
    #[serde(rename = "Dependents")]
    pub(crate) dependents: YesNo,
    #[serde(rename = "tenure")]
    pub(crate) tenure: u32,
    #[serde(rename = "PhoneService")]
    pub(crate) phone_service: YesNo,
    #[serde(rename = "MultipleLines")]
    pub(crate) multiple_lines: MultipleLines,
    #[serde(rename = "InternetService")]
    pub(crate) internet_service: InternetService,
    #[serde(rename = "OnlineSecurity")]
    pub(crate) online_security: AddonService,
    #[serde(rename = "OnlineBackup")]
    pub(crate) online_backup: AddonService,
    #[serde(rename = "DeviceProtection")]
    pub(crate) device_protection: AddonService,
    #[serde(rename = "TechSupport")]
    pub(crate) tech_support: AddonService,
    #[serde(rename = "StreamingTV")]
    pub(crate) streaming_tv: AddonService,
    #[serde(rename = "StreamingMovies")]
    pub(crate) streaming_movies: AddonService,
    #[serde(rename = "Contract")]
    pub(crate) contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub(crate) paperless_billing: YesNo,
    #[serde(rename = "PaymentMethod")]
    pub(crate) payment_method: PaymentMethod,
    #[serde(rename = "MonthlyCharges")]
    pub(crate) monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub(crate) total_charges: f64,
}

impl CustomerFeatureRecord {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn senior_citizen(&self) -> SeniorCitizen {
        self.senior_citizen
    }

    pub fn partner(&self) -> YesNo {
        self.partner
    }

    pub fn dependents(&self) -> YesNo {
        self.dependents
    }

    /// Months with the company
    pub fn tenure(&self) -> u32 {
        self.tenure
    }

    pub fn phone_service(&self) -> YesNo {
        self.phone_service
    }

    pub fn multiple_lines(&self) -> MultipleLines {
        self.multiple_lines
    }

    pub fn internet_service(&self) -> InternetService {
        self.internet_service
    }

    /// Answer for one of the six internet add-ons, `None` for other columns
    pub fn addon(&self, name: FeatureName) -> Option<AddonService> {
        match name {
            FeatureName::OnlineSecurity => Some(self.online_security),
            FeatureName::OnlineBackup => Some(self.online_backup),
            FeatureName::DeviceProtection => Some(self.device_protection),
            FeatureName::TechSupport => Some(self.tech_support),
            FeatureName::StreamingTV => Some(self.streaming_tv),
            FeatureName::StreamingMovies => Some(self.streaming_movies),
            _ => None,
        }
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn paperless_billing(&self) -> YesNo {
        self.paperless_billing
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn monthly_charges(&self) -> f64 {
        self.monthly_charges
    }

    pub fn total_charges(&self) -> f64 {
        self.total_charges
    }

    /// Value of a single column
    pub fn get(&self, name: FeatureName) -> FeatureValue {
        match name {
            FeatureName::Gender => FeatureValue::Text(self.gender.as_str()),
            FeatureName::SeniorCitizen => {
                FeatureValue::Integer(i64::from(self.senior_citizen.code()))
            }
            FeatureName::Partner => FeatureValue::Text(self.partner.as_str()),
            FeatureName::Dependents => FeatureValue::Text(self.dependents.as_str()),
            FeatureName::Tenure => FeatureValue::Integer(i64::from(self.tenure)),
            FeatureName::PhoneService => FeatureValue::Text(self.phone_service.as_str()),
            FeatureName::MultipleLines => FeatureValue::Text(self.multiple_lines.as_str()),
            FeatureName::InternetService => FeatureValue::Text(self.internet_service.as_str()),
            FeatureName::OnlineSecurity => FeatureValue::Text(self.online_security.as_str()),
            FeatureName::OnlineBackup => FeatureValue::Text(self.online_backup.as_str()),
            FeatureName::DeviceProtection => FeatureValue::Text(self.device_protection.as_str()),
            FeatureName::TechSupport => FeatureValue::Text(self.tech_support.as_str()),
            FeatureName::StreamingTV => FeatureValue::Text(self.streaming_tv.as_str()),
            FeatureName::StreamingMovies => FeatureValue::Text(self.streaming_movies.as_str()),
            FeatureName::Contract => FeatureValue::Text(self.contract.as_str()),
            FeatureName::PaperlessBilling => FeatureValue::Text(self.paperless_billing.as_str()),
            FeatureName::PaymentMethod => FeatureValue::Text(self.payment_method.as_str()),
            FeatureName::MonthlyCharges => FeatureValue::Decimal(self.monthly_charges),
            FeatureName::TotalCharges => FeatureValue::Decimal(self.total_charges),
        }
    }

    /// Every column with its value, in schema order
    pub fn fields(&self) -> [(FeatureName, FeatureValue); FEATURE_COUNT] {
        let mut out = [(FeatureName::Gender, FeatureValue::Integer(0)); FEATURE_COUNT];
        for (slot, name) in out.iter_mut().zip(FeatureName::ALL) {
            *slot = (*name, self.get(*name));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FeatureRecordBuilder, RawCustomerInput};

    fn record() -> CustomerFeatureRecord {
        FeatureRecordBuilder::new()
            .build(&RawCustomerInput::example())
            .unwrap()
    }

    #[test]
    fn test_fields_follow_schema_order() {
        let fields = record().fields();
        let names: Vec<_> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FeatureName::ALL.to_vec());
    }

    #[test]
    fn test_serialized_keys_match_feature_names() {
        let value = serde_json::to_value(record()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), FEATURE_COUNT);
        for name in FeatureName::ALL {
            assert!(object.contains_key(name.as_str()), "missing {}", name);
        }
        assert_eq!(object["SeniorCitizen"], serde_json::json!(0));
        assert_eq!(object["InternetService"], serde_json::json!("Fiber optic"));
    }

    #[test]
    fn test_get_numeric_and_text() {
        let record = record();
        assert_eq!(record.get(FeatureName::Tenure), FeatureValue::Integer(1));
        assert_eq!(record.get(FeatureName::MonthlyCharges).as_f64(), Some(70.5));
        assert_eq!(record.get(FeatureName::Contract).category(), "Month-to-month");
        assert_eq!(record.get(FeatureName::SeniorCitizen).category(), "0");
    }

    #[test]
    fn test_addon_lookup() {
        let record = record();
        assert_eq!(record.addon(FeatureName::TechSupport), Some(AddonService::No));
        assert_eq!(record.addon(FeatureName::Contract), None);
    }
}
