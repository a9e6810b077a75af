//! Interactive prediction session
//!
//! Each round is one atomic step: fill the form, classify the record, show
//! the verdict. Nothing carries over between rounds except the classifier,
//! which is read-only.

pub mod display;
pub mod form;
pub mod input;

use tracing::info;

use crate::errors::{ChurnError, Result};
use crate::inference::ChurnClassifier;
use crate::render::RenderedResult;

pub use crate::repl::display::DisplayManager;
pub use crate::repl::form::{CustomerForm, FieldKind, FieldSpec, FormLayout, Section};
pub use crate::repl::input::{InputHandler, LineSource, ScriptedInput};

/// REPL session coordinator
pub struct ReplSession<'m, I: LineSource> {
    classifier: &'m dyn ChurnClassifier,
    form: CustomerForm,
    input: I,
    display: DisplayManager,
    completed: usize,
}

impl<'m, I: LineSource> ReplSession<'m, I> {
    pub fn new(classifier: &'m dyn ChurnClassifier, layout: FormLayout, input: I) -> Self {
        ReplSession {
            classifier,
            form: CustomerForm::new(layout),
            input,
            display: DisplayManager::new(),
            completed: 0,
        }
    }

    /// Replace the display manager (e.g. to hide the confidence bar)
    pub fn with_display(mut self, display: DisplayManager) -> Self {
        self.display = display;
        self
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str, model: &str) {
        self.display
            .show_banner(version, model, self.form.layout().as_str());
    }

    /// Fill the form once and classify the result.
    ///
    /// Returns `Ok(None)` when input ends before the form is complete.
    pub fn predict_once(&mut self) -> Result<Option<RenderedResult>> {
        let record = match self.form.fill(&mut self.input, &self.display)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let prediction = self.classifier.classify(&record);
        let rendered = RenderedResult::from_prediction(&prediction);
        self.display.show_result(&rendered);
        self.completed += 1;

        info!(
            verdict = rendered.verdict,
            confidence = rendered.confidence,
            "prediction rendered"
        );
        Ok(Some(rendered))
    }

    /// Ask whether to run another prediction
    fn ask_again(&mut self) -> Result<bool> {
        match self.input.read_line("Run another prediction? [y/N]: ") {
            Ok(Some(answer)) => Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes")),
            Ok(None) | Err(ChurnError::Interrupted) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Run rounds until the user stops.
    ///
    /// Ctrl-C cancels the current form; Ctrl-D or a "no" ends the session.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.predict_once() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(ChurnError::Interrupted) => {
                    self.display.show_warning("Form cancelled");
                }
                Err(err) => return Err(err),
            }

            if !self.ask_again()? {
                break;
            }
        }

        self.input.save()?;
        self.display.show_info(&format!(
            "{} prediction(s) made. Goodbye!",
            self.completed
        ));
        Ok(())
    }

    /// Predictions completed in this session
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Get display manager
    pub fn display(&self) -> &DisplayManager {
        &self.display
    }

    /// Input source, e.g. to inspect scripted prompts
    pub fn input(&self) -> &I {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{ChurnLabel, Prediction};
    use crate::types::{CustomerFeatureRecord, FEATURE_COUNT};

    struct Fixed(Prediction);

    impl ChurnClassifier for Fixed {
        fn predict(&self, _: &CustomerFeatureRecord) -> ChurnLabel {
            self.0.label
        }

        fn predict_proba(&self, _: &CustomerFeatureRecord) -> [f64; 2] {
            self.0.probabilities
        }
    }

    fn answers(rounds: usize, again: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for round in 0..rounds {
            lines.extend(std::iter::repeat(String::new()).take(FEATURE_COUNT));
            if round + 1 < rounds {
                lines.push(again.to_string());
            }
        }
        lines
    }

    fn session(
        model: &Fixed,
        lines: Vec<String>,
    ) -> ReplSession<'_, ScriptedInput> {
        ReplSession::new(model, FormLayout::Sidebar, ScriptedInput::new(lines))
            .with_display(DisplayManager::new().with_confidence_bar(false))
    }

    #[test]
    fn test_predict_once_renders_verdict() {
        let model = Fixed(Prediction::new(ChurnLabel::Churn, [0.2, 0.8]));
        let mut session = session(&model, answers(1, "n"));
        let rendered = session.predict_once().unwrap().unwrap();
        assert_eq!(rendered.verdict, "churn");
        assert_eq!(rendered.confidence_percent(), "80.00%");
        assert_eq!(session.completed(), 1);
    }

    #[test]
    fn test_run_multiple_rounds() {
        let model = Fixed(Prediction::new(ChurnLabel::Stay, [0.9, 0.1]));
        let mut session = session(&model, answers(3, "y"));
        session.run().unwrap();
        assert_eq!(session.completed(), 3);
    }

    #[test]
    fn test_run_stops_on_no() {
        let model = Fixed(Prediction::new(ChurnLabel::Stay, [0.9, 0.1]));
        let mut lines = answers(2, "n");
        lines.truncate(FEATURE_COUNT + 1);
        let mut session = session(&model, lines);
        session.run().unwrap();
        assert_eq!(session.completed(), 1);
        assert_eq!(session.input().remaining(), 0);
    }

    #[test]
    fn test_run_ends_on_empty_input() {
        let model = Fixed(Prediction::new(ChurnLabel::Stay, [0.9, 0.1]));
        let mut session = session(&model, Vec::new());
        session.run().unwrap();
        assert_eq!(session.completed(), 0);
    }
}
