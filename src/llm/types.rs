//! Chat completion request and message types

use serde::Deserialize;
use serde::Serialize;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters and messages for one completion
///
/// `model` is filled in by the service when left `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// The system + user exchange every caller in this crate sends
    pub fn exchange(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: None,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            max_tokens,
        }
    }

    /// A single user message with no system framing
    pub fn prompt(user: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: None,
            messages: vec![ChatMessage::user(user)],
            temperature,
            max_tokens,
        }
    }

    /// Content of the first user message
    #[must_use]
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Content of the first system message
    #[must_use]
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// Completion text plus the reasoning trace some models return next to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub content: String,
    pub reasoning: Option<String>,
}
