//! API request and response types

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::IdeaSparkError;
use crate::models::Mode;
use crate::rag::pipeline::DEFAULT_SIMILAR_COUNT;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error response carrying an HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<IdeaSparkError> for ApiError {
    fn from(err: IdeaSparkError) -> Self {
        let status = match &err {
            IdeaSparkError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            IdeaSparkError::LlmError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match err {
            IdeaSparkError::InvalidInput(message) => message,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// JSON body extractor that ignores `content-type` and reports bad bodies
/// inside the [`ApiResponse`] envelope
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        serde_json::from_slice(&bytes).map(ApiJson).map_err(|e| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"))
        })
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub projects: usize,
    pub model: String,
    /// Whether `/api/chatbot/refine` is configured
    pub refine: bool,
}

/// Generate request
#[derive(Debug, Deserialize)]
pub struct GenerateApiRequest {
    #[serde(default)]
    pub category: String,
    /// Accepts a number or numeric string; anything else means the default
    #[serde(default)]
    pub count: Option<serde_json::Value>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl GenerateApiRequest {
    /// Requested similar-project count, defaulting on missing or unparsable values
    #[must_use]
    pub fn count(&self) -> usize {
        let parsed = match &self.count {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_SIMILAR_COUNT)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
            .as_deref()
            .map(Mode::parse_lenient)
            .unwrap_or_default()
    }
}

/// Chatbot request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Similar-projects request
#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_SIMILAR_COUNT
}

/// Topic extraction request
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    #[serde(default)]
    pub text: String,
}

/// Draft-and-polish chatbot request
#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub message: String,
}

/// Topic extraction response
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicResponse {
    pub topic: String,
}
