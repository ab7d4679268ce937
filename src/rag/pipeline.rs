//! Complete idea pipeline: Extract topic -> Retrieve -> Prompt -> Generate -> Format

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::dataset::Dataset;
use crate::errors::IdeaSparkError;
use crate::errors::Result;
use crate::llm::prompts::ProjectPrompts;
use crate::llm::prompts::IDEA_SYSTEM_PROMPT;
use crate::llm::prompts::PLAN_SYSTEM_PROMPT;
use crate::llm::prompts::TOPIC_SYSTEM_PROMPT;
use crate::llm::CompletionRequest;
use crate::llm::CompletionService;
use crate::models::Mode;
use crate::rag::display::format_for_display;
use crate::rag::assemble_context;
use crate::rag::Retriever;
use crate::rag::SearchResult;

/// Past projects shown to the model as context
pub const RETRIEVAL_COUNT: usize = 5;
/// Idea write-ups requested per generation
pub const IDEA_COUNT: usize = 3;
/// Similar projects returned by a generate request that names no count
pub const DEFAULT_SIMILAR_COUNT: usize = 5;
/// Reply used by the chat flow when idea generation fails
pub const IDEA_ERROR_PLACEHOLDER: &str = "Error generating ideas.";

const CREATIVE_TEMPERATURE: f32 = 0.7;
const IDEA_MAX_TOKENS: u32 = 900;
const PLAN_MAX_TOKENS: u32 = 500;
const TOPIC_TEMPERATURE: f32 = 0.0;
const TOPIC_MAX_TOKENS: u32 = 10;

/// Idea and plan generation service
pub struct IdeaService {
    retriever: Retriever,
    llm: Arc<dyn CompletionService>,
}

impl IdeaService {
    /// Create a new idea service over a loaded dataset
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, llm: Arc<dyn CompletionService>) -> Self {
        Self {
            retriever: Retriever::new(dataset),
            llm,
        }
    }

    /// Generate formatted project ideas for `topic`
    ///
    /// # Errors
    /// - LLM generation errors (API failures, timeouts, malformed responses)
    /// - Prompt rendering errors
    pub async fn generate_ideas(&self, topic: &str) -> Result<String> {
        info!("Generating ideas for topic: {}", topic);

        let relevant = self.retriever.matching(topic, RETRIEVAL_COUNT);
        debug!("Retrieved {} context projects", relevant.len());

        let prompt = self.build_idea_prompt(topic, &relevant)?;
        let request = CompletionRequest::exchange(
            IDEA_SYSTEM_PROMPT,
            prompt,
            CREATIVE_TEMPERATURE,
            IDEA_MAX_TOKENS,
        );

        let raw = self.llm.complete(request).await?;
        Ok(format_for_display(&raw))
    }

    /// Generate a formatted step-by-step plan for `topic`
    ///
    /// # Errors
    /// - LLM generation errors (API failures, timeouts, malformed responses)
    pub async fn generate_execution_plan(&self, topic: &str) -> Result<String> {
        info!("Generating execution plan for: {}", topic);

        let prompt = ProjectPrompts::execution_plan().render(&vars([("topic", topic)]))?;
        let request = CompletionRequest::exchange(
            PLAN_SYSTEM_PROMPT,
            prompt,
            CREATIVE_TEMPERATURE,
            PLAN_MAX_TOKENS,
        );

        let raw = self.llm.complete(request).await?;
        Ok(format_for_display(&raw))
    }

    /// Top `top_k` similar past projects, backfilled to the requested count
    #[must_use]
    pub fn rank_similar(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        self.retriever.rank(query, top_k)
    }

    /// Ask the model for 2-3 lowercase keywords describing `text`
    ///
    /// # Errors
    /// - LLM errors, or an empty completion
    pub async fn try_extract_topic(&self, text: &str) -> Result<String> {
        let prompt = ProjectPrompts::topic_extraction().render(&vars([("input", text)]))?;
        let request = CompletionRequest::exchange(
            TOPIC_SYSTEM_PROMPT,
            prompt,
            TOPIC_TEMPERATURE,
            TOPIC_MAX_TOKENS,
        );

        let topic = self.llm.complete(request).await?.trim().to_lowercase();
        if topic.is_empty() {
            return Err(IdeaSparkError::LlmError(
                "Topic extraction returned an empty completion".to_string(),
            ));
        }
        Ok(topic)
    }

    /// Extracted topic, or `text` unchanged when extraction fails
    pub async fn extract_topic(&self, text: &str) -> String {
        match self.try_extract_topic(text).await {
            Ok(topic) => {
                debug!("Extracted topic '{}' from '{}'", topic, text);
                topic
            }
            Err(e) => {
                warn!("Topic extraction failed, using raw input: {}", e);
                text.to_string()
            }
        }
    }

    /// Handle a generate request: clean the query, then plan or ideate
    ///
    /// # Errors
    /// - `InvalidInput` for a blank category, before any external call
    /// - LLM generation errors from the idea or plan call
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateOutcome> {
        let raw_query = require_text(&request.category, "No category provided")?;
        let query = self.extract_topic(raw_query).await;

        match request.mode {
            Mode::Execution => {
                let plan = self.generate_execution_plan(&query).await?;
                Ok(GenerateOutcome::Execution { query, plan })
            }
            Mode::Ideation => {
                let count = request.count.unwrap_or(DEFAULT_SIMILAR_COUNT);
                let similar = self.rank_similar(&query, count);
                let ideas = vec![self.generate_ideas(&query).await?];
                Ok(GenerateOutcome::Ideation {
                    query,
                    similar,
                    ideas,
                })
            }
        }
    }

    /// Conversational flow that degrades instead of failing
    ///
    /// # Errors
    /// - `InvalidInput` for a blank message; nothing else is propagated
    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        let message = require_text(message, "No message provided")?;

        let topic = self.extract_topic(message).await;
        let similar = self.rank_similar(&topic, RETRIEVAL_COUNT);

        let response = match self.generate_ideas(&topic).await {
            Ok(ideas) => ideas,
            Err(e) => {
                warn!("Idea generation failed in chat flow: {}", e);
                IDEA_ERROR_PLACEHOLDER.to_string()
            }
        };

        Ok(ChatReply {
            topic,
            similar,
            response,
        })
    }

    /// Build the with-context prompt when there are examples, otherwise the fallback
    fn build_idea_prompt(&self, topic: &str, relevant: &[SearchResult]) -> Result<String> {
        let idea_count = IDEA_COUNT.to_string();
        if relevant.is_empty() {
            return ProjectPrompts::ideas_fallback().render(&vars([
                ("idea_count", idea_count.as_str()),
                ("topic", topic),
            ]));
        }

        let context = assemble_context(relevant);
        ProjectPrompts::ideas_with_context().render(&vars([
            ("context", context.as_str()),
            ("idea_count", idea_count.as_str()),
            ("topic", topic),
        ]))
    }

    /// Get retriever reference
    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Model used for completions
    #[must_use]
    pub fn model(&self) -> &str {
        self.llm.model()
    }
}

fn vars<'a, const N: usize>(pairs: [(&'a str, &str); N]) -> HashMap<&'a str, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect()
}

pub(crate) fn require_text<'a>(text: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IdeaSparkError::InvalidInput(message.to_string()));
    }
    Ok(trimmed)
}

/// Generate request configuration
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub category: String,
    pub count: Option<usize>,
    pub mode: Mode,
}

/// Result of a generate request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GenerateOutcome {
    Ideation {
        query: String,
        similar: Vec<SearchResult>,
        ideas: Vec<String>,
    },
    Execution {
        query: String,
        plan: String,
    },
}

/// Result of a chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub topic: String,
    pub similar: Vec<SearchResult>,
    pub response: String,
}
