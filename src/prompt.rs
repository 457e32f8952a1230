//! Interactive prompts.
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use crate::error::PromptError;

/// Maps a prompt to a string answer.
pub trait Prompter {
    /// Ask `text`, offering `default` when given.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Failed`] if no answer could be read.
    fn ask(&self, text: &str, default: Option<&str>) -> Result<String, PromptError>;
}

/// [`Prompter`] reading answers from the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, text: &str, default: Option<&str>) -> Result<String, PromptError> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(text)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(|e| PromptError::Failed {
            prompt: text.to_string(),
            message: e.to_string(),
        })
    }
}
