//! Prompt assembly.
//!
//! The prompt is a single string: optional business context, a blank line,
//! then the user's text and the assistant's name as a speaker cue. Earlier
//! turns are not included.

use crate::config::WidgetConfig;

/// Builds prompts for one assistant identity and context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder<'a> {
    context: &'a str,
    assistant_name: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Creates a builder from explicit parts.
    pub fn new(context: &'a str, assistant_name: &'a str) -> Self {
        Self {
            context,
            assistant_name,
        }
    }

    /// Creates a builder from a resolved configuration.
    pub fn from_config(config: &'a WidgetConfig) -> Self {
        Self::new(&config.context_data, &config.assistant_name)
    }

    /// Assembles the prompt for `user_text`.
    pub fn build(&self, user_text: &str) -> String {
        build_prompt(self.context, self.assistant_name, user_text)
    }
}

/// Assembles a prompt from its parts.
///
/// Empty context contributes nothing. The result never ends with whitespace
/// unless `assistant_name` does.
pub fn build_prompt(context: &str, assistant_name: &str, user_text: &str) -> String {
    let mut prompt = String::with_capacity(
        context.len() + assistant_name.len() + user_text.len() + 12,
    );
    if !context.is_empty() {
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }
    prompt.push_str("User: ");
    prompt.push_str(user_text);
    prompt.push('\n');
    prompt.push_str(assistant_name);
    prompt.push(':');
    prompt
}
