//! LLM completion service boundary

pub mod client;
pub mod prompts;
pub mod types;

use async_trait::async_trait;

pub use client::LlmService;
pub use prompts::PromptTemplate;
pub use types::ChatMessage;
pub use types::Completion;
pub use types::CompletionRequest;
pub use types::Role;

use crate::errors::Result;

/// Anything that turns role-tagged messages into one text completion
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion. No retries are attempted.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Like [`complete`](Self::complete), keeping any reasoning trace the
    /// model returns alongside the answer
    async fn complete_with_reasoning(&self, request: CompletionRequest) -> Result<Completion> {
        Ok(Completion {
            content: self.complete(request).await?,
            reasoning: None,
        })
    }

    /// Model identifier used when a request does not name one
    fn model(&self) -> &str;
}
