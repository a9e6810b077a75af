//! Input handling for the interactive form
//!
//! [`InputHandler`] wraps rustyline for terminals; [`ScriptedInput`] replays
//! canned answers so the form can run without a terminal.

use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::errors::{ChurnError, Result};

/// Source of answer lines for the form
pub trait LineSource {
    /// Read one line after showing `prompt`.
    ///
    /// Returns:
    /// - Ok(Some(line)) for normal input (trimmed)
    /// - Ok(None) for end of input (Ctrl-D)
    /// - Err(ChurnError::Interrupted) on Ctrl-C
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Persist anything worth keeping across runs
    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Readline-backed terminal input with optional persistent history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;

        Ok(InputHandler {
            editor,
            history_path: None,
        })
    }

    /// Create input handler with persistent history
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;

        // Missing or unreadable history is not worth failing over
        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
        })
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path).map_err(readline_error)?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

impl LineSource for InputHandler {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(Some(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Err(ChurnError::Interrupted),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(readline_error(err)),
        }
    }

    fn save(&mut self) -> Result<()> {
        self.save_history()
    }
}

fn readline_error(err: ReadlineError) -> ChurnError {
    ChurnError::InputError(format!("Readline error: {}", err))
}

/// Replays a fixed list of answers, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().map(|l| l.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_input_handler_creation() {
        let handler = InputHandler::new();
        assert!(handler.is_ok());
    }

    #[test]
    fn test_history_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let history_path = temp_dir.path().join("nested").join("history");

        {
            let mut handler = InputHandler::with_history(history_path.clone()).unwrap();
            let _ = handler.editor.add_history_entry("Fiber optic");
            let _ = handler.editor.add_history_entry("Two year");
            handler.save().unwrap();
        }

        assert!(history_path.exists());

        let handler = InputHandler::with_history(history_path).unwrap();
        assert_eq!(handler.history_len(), 2);
    }

    #[test]
    fn test_save_without_history_path() {
        let mut handler = InputHandler::new().unwrap();
        assert!(handler.save().is_ok());
    }

    #[test]
    fn test_scripted_input_replays_then_ends() {
        let mut input = ScriptedInput::new(["  Male ", ""]);
        assert_eq!(input.read_line("a: ").unwrap(), Some("Male".to_string()));
        assert_eq!(input.read_line("b: ").unwrap(), Some(String::new()));
        assert_eq!(input.read_line("c: ").unwrap(), None);
        assert_eq!(input.prompts(), &["a: ", "b: ", "c: "]);
        assert_eq!(input.remaining(), 0);
    }
}
