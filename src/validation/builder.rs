//! Feature record builder
//!
//! Turns raw form values into a [`CustomerFeatureRecord`]. Every column is
//! checked against its domain in schema order and the first violation is
//! reported by column name. Add-on columns are forced to their "no service"
//! value when the parent service is absent.

use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::debug;

use crate::errors::{ChurnError, Result};
use crate::types::{
    AddonService, CustomerFeatureRecord, FeatureName, InternetService, MultipleLines, YesNo,
};
use crate::validation::types::RawCustomerInput;

/// Accepted tenure in months
pub const TENURE_RANGE: RangeInclusive<i64> = 0..=72;

/// Accepted monthly charges
pub const MONTHLY_CHARGES_RANGE: RangeInclusive<f64> = 0.0..=200.0;

/// Accepted total charges
pub const TOTAL_CHARGES_RANGE: RangeInclusive<f64> = 0.0..=10000.0;

/// Builds validated feature records from raw input
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureRecordBuilder;

impl FeatureRecordBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Validate `raw` and assemble the record the classifier expects.
    pub fn build(&self, raw: &RawCustomerInput) -> Result<CustomerFeatureRecord> {
        let gender = parse_choice(raw, FeatureName::Gender)?;
        let senior_citizen = parse_choice(raw, FeatureName::SeniorCitizen)?;
        let partner = parse_choice(raw, FeatureName::Partner)?;
        let dependents = parse_choice(raw, FeatureName::Dependents)?;
        let tenure = parse_tenure(raw)?;

        let phone_service: YesNo = parse_choice(raw, FeatureName::PhoneService)?;
        let multiple_lines = match phone_service {
            YesNo::No => {
                note_override(
                    raw,
                    FeatureName::MultipleLines,
                    MultipleLines::NoPhoneService.as_str(),
                );
                MultipleLines::NoPhoneService
            }
            YesNo::Yes => {
                let value: MultipleLines = parse_choice(raw, FeatureName::MultipleLines)?;
                if value == MultipleLines::NoPhoneService {
                    return Err(ChurnError::validation(
                        FeatureName::MultipleLines.as_str(),
                        "'No phone service' requires PhoneService = No",
                    ));
                }
                value
            }
        };

        let internet_service: InternetService = parse_choice(raw, FeatureName::InternetService)?;
        let addon = |name: FeatureName| -> Result<AddonService> {
            if internet_service == InternetService::No {
                note_override(raw, name, AddonService::NoInternetService.as_str());
                return Ok(AddonService::NoInternetService);
            }
            let value: AddonService = parse_choice(raw, name)?;
            if value == AddonService::NoInternetService {
                return Err(ChurnError::validation(
                    name.as_str(),
                    "'No internet service' requires InternetService = No",
                ));
            }
            Ok(value)
        };
        let online_security = addon(FeatureName::OnlineSecurity)?;
        let online_backup = addon(FeatureName::OnlineBackup)?;
        let device_protection = addon(FeatureName::DeviceProtection)?;
        let tech_support = addon(FeatureName::TechSupport)?;
        let streaming_tv = addon(FeatureName::StreamingTV)?;
        let streaming_movies = addon(FeatureName::StreamingMovies)?;

        let contract = parse_choice(raw, FeatureName::Contract)?;
        let paperless_billing = parse_choice(raw, FeatureName::PaperlessBilling)?;
        let payment_method = parse_choice(raw, FeatureName::PaymentMethod)?;
        let monthly_charges =
            parse_decimal(raw, FeatureName::MonthlyCharges, &MONTHLY_CHARGES_RANGE)?;
        let total_charges = parse_decimal(raw, FeatureName::TotalCharges, &TOTAL_CHARGES_RANGE)?;

        Ok(CustomerFeatureRecord {
            gender,
            senior_citizen,
            partner,
            dependents,
            tenure,
            phone_service,
            multiple_lines,
            internet_service,
            online_security,
            online_backup,
            device_protection,
            tech_support,
            streaming_tv,
            streaming_movies,
            contract,
            paperless_billing,
            payment_method,
            monthly_charges,
            total_charges,
        })
    }

    /// Check one value against its column domain, ignoring cross-column rules.
    pub fn check_value(&self, name: FeatureName, value: &str) -> Result<()> {
        use crate::types::{Contract, Gender, PaymentMethod, SeniorCitizen};

        let single = RawCustomerInput::new().with(name, value);
        match name {
            FeatureName::Gender => parse_choice::<Gender>(&single, name).map(|_| ()),
            FeatureName::SeniorCitizen => parse_choice::<SeniorCitizen>(&single, name).map(|_| ()),
            FeatureName::Partner
            | FeatureName::Dependents
            | FeatureName::PhoneService
            | FeatureName::PaperlessBilling => parse_choice::<YesNo>(&single, name).map(|_| ()),
            FeatureName::Tenure => parse_tenure(&single).map(|_| ()),
            FeatureName::MultipleLines => parse_choice::<MultipleLines>(&single, name).map(|_| ()),
            FeatureName::InternetService => {
                parse_choice::<InternetService>(&single, name).map(|_| ())
            }
            FeatureName::OnlineSecurity
            | FeatureName::OnlineBackup
            | FeatureName::DeviceProtection
            | FeatureName::TechSupport
            | FeatureName::StreamingTV
            | FeatureName::StreamingMovies => {
                parse_choice::<AddonService>(&single, name).map(|_| ())
            }
            FeatureName::Contract => parse_choice::<Contract>(&single, name).map(|_| ()),
            FeatureName::PaymentMethod => parse_choice::<PaymentMethod>(&single, name).map(|_| ()),
            FeatureName::MonthlyCharges => {
                parse_decimal(&single, name, &MONTHLY_CHARGES_RANGE).map(|_| ())
            }
            FeatureName::TotalCharges => {
                parse_decimal(&single, name, &TOTAL_CHARGES_RANGE).map(|_| ())
            }
        }
    }
}

/// Human-readable domain of a column, as listed by `churncast schema`
pub fn describe_domain(name: FeatureName) -> String {
    use crate::types::{Contract, Gender, PaymentMethod};

    let choices = |options: Vec<&str>| {
        options
            .iter()
            .map(|o| format!("\"{}\"", o))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    match name {
        FeatureName::Gender => choices(Gender::choices()),
        FeatureName::SeniorCitizen => "0 | 1".to_string(),
        FeatureName::Partner
        | FeatureName::Dependents
        | FeatureName::PhoneService
        | FeatureName::PaperlessBilling => choices(YesNo::choices()),
        FeatureName::Tenure => format!(
            "integer {}..={} (months)",
            TENURE_RANGE.start(),
            TENURE_RANGE.end()
        ),
        FeatureName::MultipleLines => format!(
            "{} (\"No phone service\" iff PhoneService = No)",
            choices(MultipleLines::choices())
        ),
        FeatureName::InternetService => choices(InternetService::choices()),
        FeatureName::OnlineSecurity
        | FeatureName::OnlineBackup
        | FeatureName::DeviceProtection
        | FeatureName::TechSupport
        | FeatureName::StreamingTV
        | FeatureName::StreamingMovies => format!(
            "{} (\"No internet service\" iff InternetService = No)",
            choices(AddonService::choices())
        ),
        FeatureName::Contract => choices(Contract::choices()),
        FeatureName::PaymentMethod => choices(PaymentMethod::choices()),
        FeatureName::MonthlyCharges => format!(
            "decimal {:.1}..={:.1}",
            MONTHLY_CHARGES_RANGE.start(),
            MONTHLY_CHARGES_RANGE.end()
        ),
        FeatureName::TotalCharges => format!(
            "decimal {:.1}..={:.1}",
            TOTAL_CHARGES_RANGE.start(),
            TOTAL_CHARGES_RANGE.end()
        ),
    }
}

fn required(raw: &RawCustomerInput, name: FeatureName) -> Result<&str> {
    match raw.get(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ChurnError::validation(name.as_str(), "value is missing")),
    }
}

fn parse_choice<T>(raw: &RawCustomerInput, name: FeatureName) -> Result<T>
where
    T: FromStr<Err = String>,
{
    required(raw, name)?
        .parse()
        .map_err(|reason: String| ChurnError::validation(name.as_str(), reason))
}

fn parse_tenure(raw: &RawCustomerInput) -> Result<u32> {
    let name = FeatureName::Tenure;
    let text = required(raw, name)?;
    let months: i64 = text.parse().map_err(|_| {
        ChurnError::validation(name.as_str(), format!("'{}' is not a whole number of months", text))
    })?;
    if !TENURE_RANGE.contains(&months) {
        return Err(ChurnError::validation(
            name.as_str(),
            format!(
                "{} is outside {}..={}",
                months,
                TENURE_RANGE.start(),
                TENURE_RANGE.end()
            ),
        ));
    }
    Ok(months as u32)
}

fn parse_decimal(
    raw: &RawCustomerInput,
    name: FeatureName,
    range: &RangeInclusive<f64>,
) -> Result<f64> {
    let text = required(raw, name)?;
    let amount: f64 = text
        .parse()
        .map_err(|_| ChurnError::validation(name.as_str(), format!("'{}' is not a number", text)))?;
    if !amount.is_finite() || !range.contains(&amount) {
        return Err(ChurnError::validation(
            name.as_str(),
            format!("{} is outside {:.1}..={:.1}", text, range.start(), range.end()),
        ));
    }
    Ok((amount * 100.0).round() / 100.0)
}

fn note_override(raw: &RawCustomerInput, name: FeatureName, forced: &str) {
    if let Some(entered) = raw.get(name) {
        if entered.trim() != forced {
            debug!(feature = %name, entered, forced, "dependent feature overridden");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeatureValue, Gender, PaymentMethod};

    fn example() -> RawCustomerInput {
        RawCustomerInput::example()
    }

    fn field_of(result: Result<CustomerFeatureRecord>) -> String {
        result.unwrap_err().field().unwrap_or_default().to_string()
    }

    #[test]
    fn test_build_example() {
        let record = FeatureRecordBuilder::new().build(&example()).unwrap();
        assert_eq!(record.gender(), Gender::Female);
        assert_eq!(record.tenure(), 1);
        assert_eq!(record.internet_service(), InternetService::FiberOptic);
        assert_eq!(record.payment_method(), PaymentMethod::ElectronicCheck);
        assert_eq!(record.monthly_charges(), 70.5);
    }

    #[test]
    fn test_tenure_bounds() {
        let builder = FeatureRecordBuilder::new();
        for months in ["0", "72"] {
            let raw = example().with(FeatureName::Tenure, months);
            assert!(builder.build(&raw).is_ok(), "tenure {} rejected", months);
        }
        for months in ["73", "-1"] {
            let raw = example().with(FeatureName::Tenure, months);
            assert_eq!(field_of(builder.build(&raw)), "tenure");
        }
    }

    #[test]
    fn test_tenure_must_be_whole() {
        let raw = example().with(FeatureName::Tenure, "1.5");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "tenure");
    }

    #[test]
    fn test_missing_field_named() {
        let mut raw = example();
        raw.remove(FeatureName::Contract);
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "Contract");
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let raw = example().with(FeatureName::Partner, "  ");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "Partner");
    }

    #[test]
    fn test_unknown_category_named() {
        let raw = example().with(FeatureName::PaymentMethod, "Cash");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "PaymentMethod");
    }

    #[test]
    fn test_first_violation_in_schema_order() {
        let raw = example()
            .with(FeatureName::TotalCharges, "-5")
            .with(FeatureName::Gender, "Other");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "gender");
    }

    #[test]
    fn test_charges_bounds() {
        let builder = FeatureRecordBuilder::new();
        assert!(builder.build(&example().with(FeatureName::MonthlyCharges, "200")).is_ok());
        assert_eq!(
            field_of(builder.build(&example().with(FeatureName::MonthlyCharges, "200.01"))),
            "MonthlyCharges"
        );
        assert_eq!(
            field_of(builder.build(&example().with(FeatureName::TotalCharges, "NaN"))),
            "TotalCharges"
        );
        assert_eq!(
            field_of(builder.build(&example().with(FeatureName::TotalCharges, "inf"))),
            "TotalCharges"
        );
    }

    #[test]
    fn test_charges_rounded_to_cents() {
        let raw = example().with(FeatureName::MonthlyCharges, "70.456");
        let record = FeatureRecordBuilder::new().build(&raw).unwrap();
        assert_eq!(record.monthly_charges(), 70.46);
    }

    #[test]
    fn test_senior_citizen_label_accepted() {
        let raw = example().with(FeatureName::SeniorCitizen, "Yes");
        let record = FeatureRecordBuilder::new().build(&raw).unwrap();
        assert_eq!(record.get(FeatureName::SeniorCitizen), FeatureValue::Integer(1));
    }

    #[test]
    fn test_no_internet_forces_addons() {
        let raw = example()
            .with(FeatureName::InternetService, "No")
            .with(FeatureName::OnlineSecurity, "Yes")
            .with(FeatureName::StreamingTV, "Yes");
        let record = FeatureRecordBuilder::new().build(&raw).unwrap();
        for name in FeatureName::INTERNET_ADDONS {
            assert_eq!(record.addon(name), Some(AddonService::NoInternetService));
        }
    }

    #[test]
    fn test_no_internet_addons_may_be_absent() {
        let mut raw = example().with(FeatureName::InternetService, "No");
        for name in FeatureName::INTERNET_ADDONS {
            raw.remove(name);
        }
        assert!(FeatureRecordBuilder::new().build(&raw).is_ok());
    }

    #[test]
    fn test_internet_keeps_user_addons() {
        let raw = example()
            .with(FeatureName::InternetService, "DSL")
            .with(FeatureName::TechSupport, "Yes");
        let record = FeatureRecordBuilder::new().build(&raw).unwrap();
        assert_eq!(record.addon(FeatureName::TechSupport), Some(AddonService::Yes));
        assert_eq!(record.addon(FeatureName::OnlineBackup), Some(AddonService::No));
    }

    #[test]
    fn test_no_internet_service_value_needs_no_internet() {
        let raw = example().with(FeatureName::DeviceProtection, "No internet service");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "DeviceProtection");
    }

    #[test]
    fn test_no_phone_forces_multiple_lines() {
        let raw = example()
            .with(FeatureName::PhoneService, "No")
            .with(FeatureName::MultipleLines, "Yes");
        let record = FeatureRecordBuilder::new().build(&raw).unwrap();
        assert_eq!(record.multiple_lines(), MultipleLines::NoPhoneService);
    }

    #[test]
    fn test_no_phone_service_value_needs_no_phone() {
        let raw = example().with(FeatureName::MultipleLines, "No phone service");
        assert_eq!(field_of(FeatureRecordBuilder::new().build(&raw)), "MultipleLines");
    }

    #[test]
    fn test_describe_domain() {
        assert_eq!(describe_domain(FeatureName::Tenure), "integer 0..=72 (months)");
        assert!(describe_domain(FeatureName::InternetService).contains("\"Fiber optic\""));
        assert_eq!(describe_domain(FeatureName::TotalCharges), "decimal 0.0..=10000.0");
    }

    #[test]
    fn test_check_value() {
        let builder = FeatureRecordBuilder::new();
        assert!(builder.check_value(FeatureName::Tenure, "72").is_ok());
        assert!(builder.check_value(FeatureName::Tenure, "73").is_err());
        assert!(builder.check_value(FeatureName::StreamingTV, "No internet service").is_ok());
        assert!(builder.check_value(FeatureName::Contract, "Weekly").is_err());
        assert!(builder.check_value(FeatureName::SeniorCitizen, "1").is_ok());
    }
}
