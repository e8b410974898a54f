// * Chat prompts and the formatting rule that serializes them for a given model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// An ordered system/user exchange awaiting a model reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub messages: Vec<ChatMessage>,
}

impl ChatPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(content));
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(content));
        self
    }
}

/// Model-specific convention for turning a chat into one input string
pub trait ChatTemplate: Send + Sync {
    /// Serializes the prompt; with `add_generation_prompt` the string ends at the
    /// point where the assistant's reply should begin.
    fn render(&self, prompt: &ChatPrompt, add_generation_prompt: bool) -> String;
}

/// ChatML, as used by the Qwen2 family
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatMlTemplate;

impl ChatMlTemplate {
    pub const IM_START: &'static str = "<|im_start|>";
    pub const IM_END: &'static str = "<|im_end|>";
}

impl ChatTemplate for ChatMlTemplate {
    fn render(&self, prompt: &ChatPrompt, add_generation_prompt: bool) -> String {
        let mut out = String::new();
        for message in &prompt.messages {
            out.push_str(Self::IM_START);
            out.push_str(message.role.as_str());
            out.push('\n');
            out.push_str(&message.content);
            out.push_str(Self::IM_END);
            out.push('\n');
        }
        if add_generation_prompt {
            out.push_str(Self::IM_START);
            out.push_str(ChatRole::Assistant.as_str());
            out.push('\n');
        }
        out
    }
}
