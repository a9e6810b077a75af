//! Result rendering
//!
//! Converts a [`Prediction`] into what the user sees: a verdict and the
//! confidence of that verdict. Terminal styling lives in
//! [`crate::repl::DisplayManager`]; this module stays pure so the wording and
//! percentages can be tested directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::inference::{ChurnLabel, Prediction};
use crate::types::CustomerFeatureRecord;

/// Verdict ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub label: ChurnLabel,
    /// "stay" or "churn"
    pub verdict: &'static str,
    /// Probability of the predicted class, in [0, 1]
    pub confidence: f64,
    /// Probability of the churn class, whatever was predicted
    pub churn_probability: f64,
}

impl RenderedResult {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        Self {
            label: prediction.label,
            verdict: prediction.label.as_str(),
            confidence: prediction.confidence().clamp(0.0, 1.0),
            churn_probability: prediction.churn_probability().clamp(0.0, 1.0),
        }
    }

    /// Confidence as a two-decimal percentage, e.g. "80.00%"
    pub fn confidence_percent(&self) -> String {
        format_percent(self.confidence)
    }

    pub fn churn_percent(&self) -> String {
        format_percent(self.churn_probability)
    }

    /// One-line headline for the verdict
    pub fn headline(&self) -> String {
        format!("This customer is likely to {}.", self.verdict)
    }

    /// Plain-text summary used when colours are off
    pub fn summary(&self) -> String {
        format!(
            "{} Confidence: {} (churn probability {})",
            self.headline(),
            self.confidence_percent(),
            self.churn_percent()
        )
    }
}

fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Machine-readable prediction report
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport<'a> {
    pub verdict: &'static str,
    pub label: usize,
    pub confidence: f64,
    pub probabilities: [f64; 2],
    pub record: &'a CustomerFeatureRecord,
    pub predicted_at: DateTime<Utc>,
}

impl<'a> PredictionReport<'a> {
    pub fn new(record: &'a CustomerFeatureRecord, prediction: &Prediction) -> Self {
        Self {
            verdict: prediction.label.as_str(),
            label: prediction.label.index(),
            confidence: prediction.confidence(),
            probabilities: prediction.probabilities,
            record,
            predicted_at: Utc::now(),
        }
    }
}
