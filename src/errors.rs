//! Error types for churncast
//!
//! Two failure kinds belong to the prediction path: an unavailable model
//! artifact and a feature record that breaks the input contract. The rest
//! cover configuration and terminal plumbing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for churncast
#[derive(Error, Debug)]
pub enum ChurnError {
    /// The trained model artifact could not be located or loaded
    #[error("Model unavailable at {}: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// A feature is missing, misnamed or outside its declared domain
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Terminal input errors
    #[error("Input error: {0}")]
    InputError(String),

    /// The user pressed Ctrl-C while a form was open
    #[error("Input interrupted")]
    Interrupted,

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ChurnError {
    /// Build a validation error for a named feature
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ChurnError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a model-unavailable error for an artifact path
    pub fn model_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ChurnError::ModelUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            ChurnError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for churncast operations
pub type Result<T> = std::result::Result<T, ChurnError>;
