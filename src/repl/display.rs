//! Display manager for the terminal form
//!
//! Section headers, messages and the prediction verdict with its confidence
//! bar.

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::inference::ChurnLabel;
use crate::render::RenderedResult;
use crate::types::{CustomerFeatureRecord, FeatureName};
use crate::validation::builder::describe_domain;

/// Display manager for the form UI
pub struct DisplayManager {
    show_confidence_bar: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        DisplayManager {
            show_confidence_bar: true,
        }
    }

    /// Enable or disable the confidence bar under each verdict
    pub fn with_confidence_bar(mut self, enabled: bool) -> Self {
        self.show_confidence_bar = enabled;
        self
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, layout: &str) {
        let width = 64;
        let title = format!("  churncast {} - Customer Churn Prediction", version);
        let info = format!("  Model: {} | Layout: {}", model, layout);

        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Enter the customer's details. Press {} to accept a default, {} to quit.\n",
            "Enter".green(),
            "Ctrl-D".green()
        );
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }

    /// Display the verdict, its confidence and the churn probability
    pub fn show_result(&self, result: &RenderedResult) {
        self.show_section("Prediction Result");
        let headline = result.headline();
        match result.label {
            ChurnLabel::Churn => println!("{} {}", "●".red().bold(), headline.red().bold()),
            ChurnLabel::Stay => println!("{} {}", "●".green().bold(), headline.green().bold()),
        }
        println!(
            "  {:<22} {}",
            "Confidence:",
            result.confidence_percent().bold()
        );
        println!(
            "  {:<22} {}",
            "Probability of churn:",
            result.churn_percent().dimmed()
        );

        if self.show_confidence_bar {
            self.confidence_bar(result).abandon();
        }
        println!();
    }

    /// Bar filled to the confidence of the verdict
    pub fn confidence_bar(&self, result: &RenderedResult) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
        let template = match result.label {
            ChurnLabel::Churn => "  [{bar:40.red/white}] {pos}%",
            ChurnLabel::Stay => "  [{bar:40.green/white}] {pos}%",
        };
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(style.progress_chars("█▉░"));
        }
        pb.set_position((result.confidence * 100.0).round() as u64);
        pb
    }

    /// Print the feature contract as a table
    pub fn show_schema(&self) {
        self.show_section("Model input schema");
        for (i, name) in FeatureName::ALL.iter().enumerate() {
            println!(
                "  {:>2}. {:<18} {}",
                i + 1,
                name.as_str().green(),
                describe_domain(*name)
            );
        }
        println!();
    }

    /// Print a built record column by column
    pub fn show_record(&self, record: &CustomerFeatureRecord) {
        self.show_section("Customer record");
        for (name, value) in record.fields() {
            println!("  {:<18} {}", name.as_str().dimmed(), value);
        }
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
