//! Type definitions module
//!
//! Feature domains and the fixed-schema record the classifier consumes.

pub mod features;
pub mod record;

// Re-export commonly used types
pub use features::{
    AddonService, Contract, FeatureName, Gender, InternetService, MultipleLines, PaymentMethod,
    SeniorCitizen, YesNo, FEATURE_COUNT,
};
pub use record::{CustomerFeatureRecord, FeatureValue};
