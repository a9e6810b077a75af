//! Inference boundary
//!
//! The core only depends on [`ChurnClassifier`]: a class label and a
//! two-element probability vector for one record. How the model encodes and
//! scales features is its own business.

pub mod logistic;

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::types::CustomerFeatureRecord;

pub use logistic::{LogisticPipeline, ModelArtifact};

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    /// Class 0
    Stay,
    /// Class 1
    Churn,
}

impl ChurnLabel {
    /// Class index used by `predict_proba`
    pub fn index(&self) -> usize {
        match self {
            ChurnLabel::Stay => 0,
            ChurnLabel::Churn => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Stay => "stay",
            ChurnLabel::Churn => "churn",
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ChurnLabel,
    /// `[p_stay, p_churn]`
    pub probabilities: [f64; 2],
}

impl Prediction {
    pub fn new(label: ChurnLabel, probabilities: [f64; 2]) -> Self {
        Self {
            label,
            probabilities,
        }
    }

    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.label.index()]
    }

    pub fn churn_probability(&self) -> f64 {
        self.probabilities[ChurnLabel::Churn.index()]
    }
}

/// A trained binary churn classifier.
///
/// Implementations are loaded once and only read afterwards.
pub trait ChurnClassifier {
    /// Predicted class for one record
    fn predict(&self, record: &CustomerFeatureRecord) -> ChurnLabel;

    /// `[p_stay, p_churn]`, summing to 1
    fn predict_proba(&self, record: &CustomerFeatureRecord) -> [f64; 2];

    /// Label and probabilities together
    fn classify(&self, record: &CustomerFeatureRecord) -> Prediction {
        let prediction = Prediction::new(self.predict(record), self.predict_proba(record));
        debug!(
            label = %prediction.label,
            p_stay = prediction.probabilities[0],
            p_churn = prediction.probabilities[1],
            "record classified"
        );
        prediction
    }
}
