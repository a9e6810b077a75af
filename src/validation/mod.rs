//! Feature record validation
//! Turns raw form state into a record that satisfies the model input contract

pub mod builder;
pub mod types;

pub use builder::{
    describe_domain, FeatureRecordBuilder, MONTHLY_CHARGES_RANGE, TENURE_RANGE, TOTAL_CHARGES_RANGE,
};
pub use types::RawCustomerInput;
