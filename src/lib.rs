//! churncast - Customer churn prediction form
//!
//! Collects a telecom customer's account and service details, assembles them
//! into the 19-feature record a trained classifier expects, and reports the
//! predicted outcome with its confidence.
//!
//! # Architecture
//!
//! - **types / validation**: the feature-record contract and its builder
//! - **inference**: the classifier boundary and the logistic pipeline
//! - **render / repl**: verdict formatting and the interactive form
//! - **cli / doctor**: arguments, configuration and setup checks

pub mod errors;
pub mod types;
pub mod validation;
pub mod inference;
pub mod render;
pub mod repl;

pub mod cli;
pub mod doctor;

// Re-export commonly used types
pub use errors::{ChurnError, Result};
pub use inference::{ChurnClassifier, ChurnLabel, LogisticPipeline, Prediction};
pub use render::{PredictionReport, RenderedResult};
pub use types::{CustomerFeatureRecord, FeatureName};
pub use validation::{FeatureRecordBuilder, RawCustomerInput};
