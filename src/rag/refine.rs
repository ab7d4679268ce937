//! Two-stage chatbot: a reasoning model drafts, a second model polishes

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::IdeaSparkError;
use crate::errors::Result;
use crate::llm::prompts::ProjectPrompts;
use crate::llm::prompts::TUTOR_SYSTEM_PROMPT;
use crate::llm::CompletionRequest;
use crate::llm::CompletionService;
use crate::llm::LlmService;
use crate::rag::pipeline::require_text;

const DRAFT_MAX_TOKENS: u32 = 2048;
const POLISH_MAX_TOKENS: u32 = 1024;
// Provider default; reasoning models ignore it
const REFINE_TEMPERATURE: f32 = 1.0;

/// Draft, its reasoning trace, and the polished reply
#[derive(Debug, Clone, Serialize)]
pub struct RefinedReply {
    pub reasoning: Option<String>,
    pub draft: String,
    pub reply: String,
}

pub struct RefineService {
    drafter: Arc<dyn CompletionService>,
    polisher: Arc<dyn CompletionService>,
}

impl RefineService {
    #[must_use]
    pub fn new(drafter: Arc<dyn CompletionService>, polisher: Arc<dyn CompletionService>) -> Self {
        Self { drafter, polisher }
    }

    /// Build both clients from `[refine]`, or `None` when the section is absent
    ///
    /// # Errors
    /// - HTTP client build errors
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(refine) = &config.refine else {
            return Ok(None);
        };
        let timeout = Duration::from_secs(config.llm_timeout_secs());

        let drafter = LlmService::with_parts(
            refine.draft_endpoint.as_str(),
            refine.draft_key(),
            refine.draft_model.as_str(),
            timeout,
        )?;
        let polisher = LlmService::with_parts(
            config.llm_endpoint(),
            config.llm_key(),
            refine.polish_model.as_str(),
            timeout,
        )?;
        info!(
            "Refine flow enabled: draft={} polish={}",
            refine.draft_model, refine.polish_model
        );

        Ok(Some(Self::new(Arc::new(drafter), Arc::new(polisher))))
    }

    /// Draft a reply to `message`, then polish it into one structured idea
    ///
    /// # Errors
    /// - `InvalidInput` for a blank message, before any external call
    /// - `LlmError` when either stage fails or returns no content
    pub async fn refine(&self, message: &str) -> Result<RefinedReply> {
        let message = require_text(message, "No message provided")?;

        let draft = self
            .drafter
            .complete_with_reasoning(CompletionRequest::prompt(
                message,
                REFINE_TEMPERATURE,
                DRAFT_MAX_TOKENS,
            ))
            .await?;
        if draft.content.trim().is_empty() {
            return Err(IdeaSparkError::LlmError(
                "Draft model returned no content".to_string(),
            ));
        }
        debug!("Draft received ({} chars)", draft.content.len());

        let values = HashMap::from([("draft", draft.content.clone())]);
        let prompt = ProjectPrompts::refine_draft().render(&values)?;
        let reply = self
            .polisher
            .complete(CompletionRequest::exchange(
                TUTOR_SYSTEM_PROMPT,
                prompt,
                REFINE_TEMPERATURE,
                POLISH_MAX_TOKENS,
            ))
            .await?
            .trim()
            .to_string();
        if reply.is_empty() {
            return Err(IdeaSparkError::LlmError(
                "Polish model returned no content".to_string(),
            ));
        }

        Ok(RefinedReply {
            reasoning: draft.reasoning,
            draft: draft.content,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::Completion;

    /// Returns one fixed completion and records each request
    struct Canned {
        completion: Option<Completion>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl Canned {
        fn reply(content: &str, reasoning: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                completion: Some(Completion {
                    content: content.to_string(),
                    reasoning: reasoning.map(str::to_string),
                }),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                completion: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for Canned {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            Ok(self.complete_with_reasoning(request).await?.content)
        }

        async fn complete_with_reasoning(&self, request: CompletionRequest) -> Result<Completion> {
            self.requests.lock().unwrap().push(request);
            self.completion
                .clone()
                .ok_or_else(|| IdeaSparkError::LlmError("unreachable".to_string()))
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn test_refine_drafts_then_polishes() {
        let drafter = Canned::reply("Try a solar kite.", Some("kites are cheap"));
        let polisher = Canned::reply("  Project Title: Sun Kite\n", None);
        let service = RefineService::new(drafter.clone(), polisher.clone());

        let reply = service.refine("  kite ideas ").await.unwrap();
        assert_eq!(reply.draft, "Try a solar kite.");
        assert_eq!(reply.reasoning.as_deref(), Some("kites are cheap"));
        assert_eq!(reply.reply, "Project Title: Sun Kite");

        let draft_request = &drafter.requests()[0];
        assert_eq!(draft_request.messages.len(), 1);
        assert_eq!(draft_request.user_content(), Some("kite ideas"));
        assert_eq!(draft_request.max_tokens, 2048);

        let polish_request = &polisher.requests()[0];
        assert_eq!(polish_request.system_content(), Some(TUTOR_SYSTEM_PROMPT));
        assert_eq!(polish_request.max_tokens, 1024);
        assert!(polish_request
            .user_content()
            .unwrap()
            .contains("\"\"\"\nTry a solar kite.\n\"\"\""));
    }

    #[tokio::test]
    async fn test_refine_rejects_blank_message_without_calls() {
        let drafter = Canned::reply("x", None);
        let polisher = Canned::reply("y", None);
        let service = RefineService::new(drafter.clone(), polisher.clone());

        let err = service.refine(" \n").await.unwrap_err();
        assert!(matches!(err, IdeaSparkError::InvalidInput(_)));
        assert!(drafter.requests().is_empty());
        assert!(polisher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refine_empty_draft_skips_polish() {
        let polisher = Canned::reply("y", None);
        let service = RefineService::new(Canned::reply("   ", None), polisher.clone());

        let err = service.refine("kites").await.unwrap_err();
        assert!(format!("{err}").contains("Draft model returned no content"));
        assert!(polisher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refine_empty_polish_is_an_error() {
        let service = RefineService::new(Canned::reply("draft", None), Canned::reply("\n", None));
        let err = service.refine("kites").await.unwrap_err();
        assert!(format!("{err}").contains("Polish model returned no content"));
    }

    #[tokio::test]
    async fn test_refine_propagates_draft_failure() {
        let service = RefineService::new(Canned::down(), Canned::reply("y", None));
        let err = service.refine("kites").await.unwrap_err();
        assert!(matches!(err, IdeaSparkError::LlmError(_)));
    }

    #[test]
    fn test_from_config_without_section_is_none() {
        assert!(RefineService::from_config(&AppConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_from_config_with_section() {
        let mut config = AppConfig::default();
        config.refine = Some(crate::config::RefineConfig::default());
        assert!(RefineService::from_config(&config).unwrap().is_some());
    }
}
