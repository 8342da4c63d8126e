use std::collections::HashMap;

use regex::Regex;

use crate::RagError;

/// Template the retrieved context and the question are rendered into.
pub const ANSWER_TEMPLATE: &str = "You are a helpful assistant. Use the following context to answer.\n\nContext:\n{{context}}\n\nQuestion: {{question}}";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(ANSWER_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Replaces every `{{ name }}` placeholder; unknown names render empty.
    /// Substituted values are not scanned again.
    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String, RagError> {
        let pattern = Regex::new(r"\{\{\s*(\w+)\s*\}\}")
            .map_err(|e| RagError::Prompt(e.to_string()))?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }

    pub fn render_answer(&self, context: &[String], question: &str) -> Result<String, RagError> {
        let vars = HashMap::from([
            ("context", format_context(context)),
            ("question", question.to_string()),
        ]);
        self.render(&vars)
    }
}

/// One `- ` prefixed line per retrieved snippet.
pub fn format_context(context: &[String]) -> String {
    context
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
