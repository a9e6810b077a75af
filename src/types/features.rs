//! Categorical feature domains
//!
//! Every categorical column of the model input is a closed enum whose
//! serialized form is the exact string the trained pipeline was fitted on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declare a closed categorical domain with its wire strings.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:tt),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All members in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire string expected by the model
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Wire strings of every member
            pub fn choices() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        "'{}' is not one of: {}",
                        other,
                        Self::choices().join(", ")
                    )),
                }
            }
        }
    };
}

categorical! {
    /// Model input column names, in schema order
    FeatureName {
        Gender => "gender",
        SeniorCitizen => "SeniorCitizen",
        Partner => "Partner",
        Dependents => "Dependents",
        Tenure => "tenure",
        PhoneService => "PhoneService",
        MultipleLines => "MultipleLines",
        InternetService => "InternetService",
        OnlineSecurity => "OnlineSecurity",
        OnlineBackup => "OnlineBackup",
        DeviceProtection => "DeviceProtection",
        TechSupport => "TechSupport",
        StreamingTV => "StreamingTV",
        StreamingMovies => "StreamingMovies",
        Contract => "Contract",
        PaperlessBilling => "PaperlessBilling",
        PaymentMethod => "PaymentMethod",
        MonthlyCharges => "MonthlyCharges",
        TotalCharges => "TotalCharges",
    }
}

/// Number of columns in the model input
pub const FEATURE_COUNT: usize = 19;

impl FeatureName {
    /// The six add-on services that only exist with an internet subscription
    pub const INTERNET_ADDONS: [FeatureName; 6] = [
        FeatureName::OnlineSecurity,
        FeatureName::OnlineBackup,
        FeatureName::DeviceProtection,
        FeatureName::TechSupport,
        FeatureName::StreamingTV,
        FeatureName::StreamingMovies,
    ];

    /// Whether the column holds a number rather than a category
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FeatureName::Tenure | FeatureName::MonthlyCharges | FeatureName::TotalCharges
        )
    }
}

categorical! {
    Gender {
        Male => "Male",
        Female => "Female",
    }
}

categorical! {
    /// Plain yes/no answer used by Partner, Dependents, PhoneService and PaperlessBilling
    YesNo {
        Yes => "Yes",
        No => "No",
    }
}

categorical! {
    MultipleLines {
        Yes => "Yes",
        No => "No",
        NoPhoneService => "No phone service",
    }
}

categorical! {
    InternetService {
        Dsl => "DSL",
        FiberOptic => "Fiber optic",
        No => "No",
    }
}

categorical! {
    /// Answer for each internet add-on (security, backup, streaming...)
    AddonService {
        Yes => "Yes",
        No => "No",
        NoInternetService => "No internet service",
    }
}

categorical! {
    Contract {
        MonthToMonth => "Month-to-month",
        OneYear => "One year",
        TwoYear => "Two year",
    }
}

categorical! {
    PaymentMethod {
        ElectronicCheck => "Electronic check",
        MailedCheck => "Mailed check",
        BankTransfer => "Bank transfer (automatic)",
        CreditCard => "Credit card (automatic)",
    }
}

/// Senior citizen flag, encoded as 0/1 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeniorCitizen {
    No,
    Yes,
}

impl SeniorCitizen {
    pub const ALL: &'static [SeniorCitizen] = &[SeniorCitizen::No, SeniorCitizen::Yes];

    /// Integer code expected by the model
    pub fn code(&self) -> u8 {
        match self {
            SeniorCitizen::No => 0,
            SeniorCitizen::Yes => 1,
        }
    }

    /// Human label shown by the form
    pub fn label(&self) -> &'static str {
        match self {
            SeniorCitizen::No => "No",
            SeniorCitizen::Yes => "Yes",
        }
    }
}

impl From<SeniorCitizen> for u8 {
    fn from(value: SeniorCitizen) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for SeniorCitizen {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(SeniorCitizen::No),
            1 => Ok(SeniorCitizen::Yes),
            other => Err(format!("'{}' is not one of: 0, 1", other)),
        }
    }
}

impl fmt::Display for SeniorCitizen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SeniorCitizen {
    type Err = String;

    /// Accepts the wire codes and the Yes/No labels the form displays
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "0" | "No" => Ok(SeniorCitizen::No),
            "1" | "Yes" => Ok(SeniorCitizen::Yes),
            other => Err(format!("'{}' is not one of: 0, 1", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_in_schema_order() {
        assert_eq!(FeatureName::ALL.len(), FEATURE_COUNT);
        assert_eq!(FeatureName::ALL[0].as_str(), "gender");
        assert_eq!(FeatureName::ALL[4].as_str(), "tenure");
        assert_eq!(FeatureName::ALL[18].as_str(), "TotalCharges");
    }

    #[test]
    fn test_parse_exact_wire_value() {
        assert_eq!("Fiber optic".parse::<InternetService>(), Ok(InternetService::FiberOptic));
        assert_eq!(
            " Bank transfer (automatic) ".parse::<PaymentMethod>(),
            Ok(PaymentMethod::BankTransfer)
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "fiber optic".parse::<InternetService>().unwrap_err();
        assert!(err.contains("DSL, Fiber optic, No"));
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&AddonService::NoInternetService).unwrap();
        assert_eq!(json, "\"No internet service\"");
        let back: Contract = serde_json::from_str("\"Two year\"").unwrap();
        assert_eq!(back, Contract::TwoYear);
    }

    #[test]
    fn test_senior_citizen_codes() {
        assert_eq!(serde_json::to_string(&SeniorCitizen::Yes).unwrap(), "1");
        assert_eq!("No".parse::<SeniorCitizen>(), Ok(SeniorCitizen::No));
        assert_eq!("1".parse::<SeniorCitizen>(), Ok(SeniorCitizen::Yes));
        assert!("2".parse::<SeniorCitizen>().is_err());
        assert!(serde_json::from_str::<SeniorCitizen>("2").is_err());
    }

    #[test]
    fn test_numeric_columns() {
        let numeric: Vec<_> = FeatureName::ALL.iter().filter(|f| f.is_numeric()).collect();
        assert_eq!(numeric.len(), 3);
    }
}
