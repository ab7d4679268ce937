//! OpenAI-compatible chat completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::IdeaSparkError;
use crate::errors::Result;
use crate::llm::Completion;
use crate::llm::CompletionRequest;
use crate::llm::CompletionService;

/// Client for a `/chat/completions` endpoint
#[derive(Clone)]
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

impl LlmService {
    /// Create a new LLM service from configuration
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(config: &AppConfig) -> Result<Self> {
        let api_key = config.llm_key();
        if api_key.is_none() {
            warn!("No LLM API key configured; requests will be sent without authorization");
        }

        Self::with_parts(
            config.llm_endpoint(),
            api_key,
            config.llm_model(),
            Duration::from_secs(config.llm_timeout_secs()),
        )
    }

    /// Create a service from explicit connection details
    ///
    /// # Errors
    /// - HTTP client build errors
    pub fn with_parts(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdeaSparkError::LlmError(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
        })
    }

    /// Full URL of the completions resource
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    async fn send(&self, request: &CompletionRequest) -> Result<Completion> {
        let mut builder = self.client.post(self.completions_url()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| IdeaSparkError::LlmError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdeaSparkError::LlmError(format!("API error {status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IdeaSparkError::LlmError(format!("Cannot read response: {e}")))?;
        parse_completion(&body)
    }
}

/// First choice's text and its `reasoning_content`, when present
///
/// # Errors
/// - `LlmError` for malformed JSON or a response without content
pub fn parse_completion(body: &str) -> Result<Completion> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| IdeaSparkError::LlmError(format!("Malformed completion response: {e}")))?;

    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| IdeaSparkError::LlmError("Completion response had no choices".to_string()))?;

    let content = message
        .content
        .ok_or_else(|| IdeaSparkError::LlmError("Completion response had no content".to_string()))?;

    Ok(Completion {
        content,
        reasoning: message.reasoning_content,
    })
}

#[async_trait]
impl CompletionService for LlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        Ok(self.complete_with_reasoning(request).await?.content)
    }

    async fn complete_with_reasoning(&self, mut request: CompletionRequest) -> Result<Completion> {
        if request.model.is_none() {
            request.model = Some(self.model.clone());
        }
        debug!(
            "Sending completion request: model={:?} temperature={} max_tokens={}",
            request.model, request.temperature, request.max_tokens
        );
        self.send(&request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(endpoint: &str) -> LlmService {
        LlmService::with_parts(endpoint, None, "gpt-3.5-turbo", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_completions_url_joins_cleanly() {
        assert_eq!(
            service("https://api.openai.com/v1").completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            service("http://localhost:11434/v1/").completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_completion_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"water recycling"}},{"message":{"content":"other"}}]}"#;
        assert_eq!(parse_completion(body).unwrap().content, "water recycling");
    }

    #[test]
    fn test_parse_completion_keeps_reasoning() {
        let body = r#"{"choices":[{"message":{"content":"draft","reasoning_content":"think first"}}]}"#;
        let completion = parse_completion(body).unwrap();
        assert_eq!(completion.content, "draft");
        assert_eq!(completion.reasoning.as_deref(), Some("think first"));

        let plain = parse_completion(r#"{"choices":[{"message":{"content":"x"}}]}"#).unwrap();
        assert_eq!(plain.reasoning, None);
    }

    #[test]
    fn test_parse_completion_no_choices() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, IdeaSparkError::LlmError(_)));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let err = parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, IdeaSparkError::LlmError(_)));
    }

    #[test]
    fn test_parse_completion_malformed() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(format!("{err}").contains("Malformed"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let service = service("http://127.0.0.1:9/v1");
        let request = CompletionRequest::exchange("sys", "hi", 0.0, 10);
        let err = service.complete(request).await.unwrap_err();
        assert!(matches!(err, IdeaSparkError::LlmError(_)));
    }

    #[test]
    fn test_model_accessor() {
        assert_eq!(service("http://x").model(), "gpt-3.5-turbo");
    }
}
