//! Logistic regression pipeline loaded from a JSON artifact
//!
//! The artifact mirrors a fitted preprocessing + classifier pipeline:
//! standard-scaled numeric columns first, then one-hot categorical columns,
//! one coefficient per expanded column, and an intercept. Categories the
//! encoder never saw contribute nothing, like `handle_unknown = "ignore"`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::{ChurnClassifier, ChurnLabel};
use crate::errors::{ChurnError, Result};
use crate::types::{CustomerFeatureRecord, FeatureName, FEATURE_COUNT};

fn default_threshold() -> f64 {
    0.5
}

/// Standard scaler parameters for one numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    pub feature: FeatureName,
    pub mean: f64,
    pub scale: f64,
}

/// One-hot encoder categories for one categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub feature: FeatureName,
    pub categories: Vec<String>,
}

/// Serialized form of the trained pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Debug, Clone)]
enum Column {
    Scaled {
        feature: FeatureName,
        mean: f64,
        scale: f64,
        weight: f64,
    },
    OneHot {
        feature: FeatureName,
        weights: Vec<(String, f64)>,
    },
}

/// Ready-to-use classifier built from a [`ModelArtifact`]
#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    name: String,
    columns: Vec<Column>,
    intercept: f64,
    threshold: f64,
}

impl LogisticPipeline {
    /// Load and check the artifact at `path`.
    ///
    /// Any failure (missing file, bad JSON, inconsistent shape) is reported as
    /// [`ChurnError::ModelUnavailable`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                "file not found".to_string()
            } else {
                e.to_string()
            };
            ChurnError::model_unavailable(path, reason)
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&contents)
            .map_err(|e| ChurnError::model_unavailable(path, format!("invalid artifact: {}", e)))?;

        let pipeline = Self::from_artifact(artifact)
            .map_err(|reason| ChurnError::model_unavailable(path, reason))?;

        info!(
            path = %path.display(),
            model = %pipeline.name,
            columns = pipeline.expanded_width(),
            "model loaded"
        );
        Ok(pipeline)
    }

    /// Check an artifact's shape and prepare it for scoring.
    pub fn from_artifact(artifact: ModelArtifact) -> std::result::Result<Self, String> {
        let mut seen = HashSet::new();
        for feature in artifact
            .numeric
            .iter()
            .map(|c| c.feature)
            .chain(artifact.categorical.iter().map(|c| c.feature))
        {
            if !seen.insert(feature) {
                return Err(format!("feature '{}' is encoded twice", feature));
            }
        }
        if seen.len() != FEATURE_COUNT {
            let missing: Vec<_> = FeatureName::ALL
                .iter()
                .filter(|f| !seen.contains(*f))
                .map(|f| f.as_str())
                .collect();
            return Err(format!("features not encoded: {}", missing.join(", ")));
        }

        let width = artifact.numeric.len()
            + artifact
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>();
        if artifact.coefficients.len() != width {
            return Err(format!(
                "expected {} coefficients for the encoded columns, found {}",
                width,
                artifact.coefficients.len()
            ));
        }
        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(format!("threshold {} is outside 0..=1", artifact.threshold));
        }

        let mut weights = artifact.coefficients.into_iter();
        let mut columns = Vec::with_capacity(FEATURE_COUNT);

        for numeric in artifact.numeric {
            if !numeric.feature.is_numeric() && numeric.feature != FeatureName::SeniorCitizen {
                return Err(format!("feature '{}' is not numeric", numeric.feature));
            }
            if !numeric.scale.is_finite() || numeric.scale == 0.0 {
                return Err(format!("feature '{}' has a zero scale", numeric.feature));
            }
            columns.push(Column::Scaled {
                feature: numeric.feature,
                mean: numeric.mean,
                scale: numeric.scale,
                weight: weights.next().unwrap_or_default(),
            });
        }

        for categorical in artifact.categorical {
            if categorical.feature.is_numeric() {
                return Err(format!("feature '{}' is not categorical", categorical.feature));
            }
            let weights = categorical
                .categories
                .into_iter()
                .map(|category| (category, weights.next().unwrap_or_default()))
                .collect();
            columns.push(Column::OneHot {
                feature: categorical.feature,
                weights,
            });
        }

        Ok(Self {
            name: artifact.name.unwrap_or_else(|| "logistic".to_string()),
            columns,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of columns after one-hot expansion
    pub fn expanded_width(&self) -> usize {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Scaled { .. } => 1,
                Column::OneHot { weights, .. } => weights.len(),
            })
            .sum()
    }

    /// Linear score before the sigmoid
    pub fn decision_function(&self, record: &CustomerFeatureRecord) -> f64 {
        self.columns.iter().fold(self.intercept, |acc, column| match column {
            Column::Scaled {
                feature,
                mean,
                scale,
                weight,
            } => {
                let x = record.get(*feature).as_f64().unwrap_or(*mean);
                acc + weight * (x - mean) / scale
            }
            Column::OneHot { feature, weights } => {
                let category = record.get(*feature).category();
                acc + weights
                    .iter()
                    .find(|(c, _)| *c == category)
                    .map(|(_, w)| *w)
                    .unwrap_or(0.0)
            }
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ChurnClassifier for LogisticPipeline {
    fn predict(&self, record: &CustomerFeatureRecord) -> ChurnLabel {
        if self.predict_proba(record)[1] >= self.threshold {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }

    fn predict_proba(&self, record: &CustomerFeatureRecord) -> [f64; 2] {
        let p_churn = sigmoid(self.decision_function(record));
        [1.0 - p_churn, p_churn]
    }
}
