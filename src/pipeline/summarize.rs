// * Summarization Pipeline
// * prompt -> chat format -> tokens (length L) -> generate -> drop first L -> decode

use crate::config::constants::{SYSTEM_INSTRUCTION, USER_PREAMBLE};
use crate::model::{Capability, ChatPrompt, GenerationConfig, GenerationError};
use crate::refinery::BoundedInput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain-text model output with the echoed prompt removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary(String);

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed system instruction plus one user turn embedding the text
pub fn summary_prompt(text: &str) -> ChatPrompt {
    ChatPrompt::new()
        .with_system(SYSTEM_INSTRUCTION)
        .with_user(format!("{}\n\n{}", USER_PREAMBLE, text))
}

/// Summarizes bounded text with a loaded capability.
///
/// A missing capability fails with `ModelUnavailable` before anything is tokenized.
/// Only tokens past the prompt length are decoded, special tokens stripped.
pub fn summarize(
    text: &BoundedInput,
    capability: Option<&Capability>,
    config: &GenerationConfig,
) -> Result<Summary, GenerationError> {
    let capability = capability.ok_or(GenerationError::ModelUnavailable)?;

    let prompt = summary_prompt(text.as_str());
    let rendered = capability.template().render(&prompt, true);

    let prompt_ids = capability
        .tokenizer()
        .encode(&rendered)
        .map_err(GenerationError::Tokenize)?;
    let prompt_len = prompt_ids.len();

    tracing::info!(
        model = capability.model_id(),
        device = capability.device(),
        prompt_tokens = prompt_len,
        max_new_tokens = config.max_new_tokens,
        "Generating summary"
    );

    let output = capability.generate(&prompt_ids, config)?;
    if output.len() < prompt_len {
        return Err(GenerationError::PromptNotEchoed {
            prompt_len,
            output_len: output.len(),
        });
    }

    let continuation = &output[prompt_len..];
    let decoded = capability
        .tokenizer()
        .decode(continuation, true)
        .map_err(GenerationError::Decode)?;

    tracing::debug!(new_tokens = continuation.len(), chars = decoded.chars().count(), "Summary decoded");
    Ok(Summary::new(decoded.trim()))
}
