//! Doctor command for setup diagnostics
//!
//! Checks the configuration, the model artifact and the history location
//! before a session is started.

use colored::*;
use std::path::{Path, PathBuf};

use crate::cli::Config;
use crate::inference::{ChurnClassifier, LogisticPipeline};
use crate::validation::{FeatureRecordBuilder, RawCustomerInput};

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
    model_path: PathBuf,
}

impl Doctor {
    /// Create a new doctor instance
    pub fn new(config: Config, model_path: PathBuf) -> Self {
        Self { config, model_path }
    }

    /// Run all health checks
    pub fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![self.check_config(), self.check_model_present()];

        let model = match LogisticPipeline::load(&self.model_path) {
            Ok(model) => {
                checks.push(HealthCheck::new("Model loads", HealthStatus::Pass));
                Some(model)
            }
            Err(e) => {
                checks.push(HealthCheck::new(
                    "Model loads",
                    HealthStatus::Fail(e.to_string()),
                ));
                None
            }
        };

        checks.push(Self::check_reference_prediction(model.as_ref()));
        checks.push(self.check_history_dir());
        checks
    }

    /// Check 1: configuration values are usable
    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: model artifact exists
    fn check_model_present(&self) -> HealthCheck {
        let status = if self.model_path.is_file() {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail(format!(
                "Model file not found. Please ensure '{}' exists.",
                self.model_path.display()
            ))
        };
        HealthCheck::new("Model artifact", status)
    }

    /// Check 4: the reference customer classifies to a distribution
    fn check_reference_prediction(model: Option<&LogisticPipeline>) -> HealthCheck {
        let name = "Reference prediction";
        let model = match model {
            Some(model) => model,
            None => return HealthCheck::new(name, HealthStatus::Warn("skipped".to_string())),
        };

        let record = match FeatureRecordBuilder::new().build(&RawCustomerInput::example()) {
            Ok(record) => record,
            Err(e) => return HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        };

        let [stay, churn] = model.predict_proba(&record);
        let status = if stay.is_finite() && churn.is_finite() && ((stay + churn) - 1.0).abs() < 1e-9
        {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail(format!(
                "probabilities [{}, {}] do not sum to 1",
                stay, churn
            ))
        };
        HealthCheck::new(name, status)
    }

    /// Check 5: history directory is writable
    fn check_history_dir(&self) -> HealthCheck {
        let name = "History";
        let path = match self.config.history_path() {
            Some(path) => path,
            None => return HealthCheck::new(name, HealthStatus::Pass),
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let status = if !dir.exists() {
            HealthStatus::Warn(format!("{} will be created on first save", dir.display()))
        } else if dir
            .metadata()
            .map(|m| m.permissions().readonly())
            .unwrap_or(true)
        {
            HealthStatus::Warn(format!("{} is not writable; history is not kept", dir.display()))
        } else {
            HealthStatus::Pass
        };
        HealthCheck::new(name, status)
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "churncast diagnostics".bold().cyan());
        println!("{:<22} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };

            println!("{:<22} {}", check.name, message);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks
            .iter()
            .any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn status_of<'a>(checks: &'a [HealthCheck], name: &str) -> &'a HealthStatus {
        &checks.iter().find(|c| c.name == name).unwrap().status
    }

    #[test]
    fn test_health_status_equality() {
        assert_eq!(HealthStatus::Pass, HealthStatus::Pass);
        assert_eq!(
            HealthStatus::Warn("test".to_string()),
            HealthStatus::Warn("test".to_string())
        );
        assert_ne!(
            HealthStatus::Fail("test".to_string()),
            HealthStatus::Warn("test".to_string())
        );
    }

    #[test]
    fn test_overall_status_pass() {
        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&checks));
    }

    #[test]
    fn test_overall_status_fail() {
        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Fail("error".to_string())),
        ];
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_missing_model_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.form.history_file = None;
        let doctor = Doctor::new(config, temp_dir.path().join("absent.json"));

        let checks = doctor.run_diagnostics();
        assert_eq!(checks.len(), 5);
        assert_eq!(status_of(&checks, "Configuration"), &HealthStatus::Pass);
        assert!(matches!(status_of(&checks, "Model artifact"), HealthStatus::Fail(_)));
        assert!(matches!(status_of(&checks, "Model loads"), HealthStatus::Fail(_)));
        assert!(matches!(
            status_of(&checks, "Reference prediction"),
            HealthStatus::Warn(_)
        ));
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_bundled_model_passes() {
        let mut config = Config::default();
        config.form.history_file = None;
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/logistic_model.json");
        let checks = Doctor::new(config, path).run_diagnostics();

        Doctor::display_results(&checks);
        assert!(Doctor::overall_status(&checks));
        assert_eq!(status_of(&checks, "Reference prediction"), &HealthStatus::Pass);
    }

    #[test]
    fn test_history_dir_missing_warns() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.form.history_file = Some(
            temp_dir
                .path()
                .join("later")
                .join("history")
                .to_string_lossy()
                .into_owned(),
        );
        let doctor = Doctor::new(config, temp_dir.path().join("absent.json"));
        assert!(matches!(doctor.check_history_dir().status, HealthStatus::Warn(_)));
    }
}
