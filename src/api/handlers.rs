//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::ApiError;
use crate::api::types::ApiJson;
use crate::api::types::ApiResponse;
use crate::api::types::ApiResult;
use crate::api::types::ChatRequest;
use crate::api::types::GenerateApiRequest;
use crate::api::types::HealthResponse;
use crate::api::types::RefineRequest;
use crate::api::types::SimilarRequest;
use crate::api::types::TopicRequest;
use crate::api::types::TopicResponse;
use crate::errors::IdeaSparkError;
use crate::rag::ChatReply;
use crate::rag::GenerateOutcome;
use crate::rag::GenerateRequest;
use crate::rag::IdeaService;
use crate::rag::RefineService;
use crate::rag::RefinedReply;
use crate::rag::SearchResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IdeaService>,
    /// Present only when `[refine]` is configured
    pub refiner: Option<Arc<RefineService>>,
}

impl AppState {
    pub fn new(service: Arc<IdeaService>, refiner: Option<Arc<RefineService>>) -> Self {
        Self { service, refiner }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        projects: state.service.retriever().dataset().len(),
        model: state.service.model().to_string(),
        refine: state.refiner.is_some(),
    }))
}

/// Generate ideas or an execution plan (POST /api/generate)
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateApiRequest>,
) -> ApiResult<GenerateOutcome> {
    info!("POST /api/generate: {}", req.category);

    let request = GenerateRequest {
        count: Some(req.count()),
        mode: req.mode(),
        category: req.category,
    };

    match state.service.generate(request).await {
        Ok(outcome) => Ok(Json(ApiResponse::success(outcome))),
        Err(e) => {
            error!("Error processing generate request: {}", e);
            Err(e.into())
        }
    }
}

/// Conversational idea request (POST /api/chatbot)
pub async fn chatbot(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> ApiResult<ChatReply> {
    info!("POST /api/chatbot: {}", req.message);

    let reply = state.service.chat(&req.message).await?;
    Ok(Json(ApiResponse::success(reply)))
}

/// Rank past projects against a query (POST /api/similar)
pub async fn similar(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SimilarRequest>,
) -> ApiResult<Vec<SearchResult>> {
    info!("POST /api/similar: {} (top_k={})", req.query, req.top_k);

    Ok(Json(ApiResponse::success(
        state.service.rank_similar(&req.query, req.top_k),
    )))
}

/// Extract 2-3 topic keywords (POST /api/topic)
pub async fn topic(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TopicRequest>,
) -> ApiResult<TopicResponse> {
    info!("POST /api/topic: {}", req.text);

    if req.text.trim().is_empty() {
        return Err(IdeaSparkError::InvalidInput("No text provided".to_string()).into());
    }

    let topic = state.service.extract_topic(&req.text).await;
    Ok(Json(ApiResponse::success(TopicResponse { topic })))
}

/// Draft with a reasoning model, then polish (POST /api/chatbot/refine)
pub async fn refine(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefineRequest>,
) -> ApiResult<RefinedReply> {
    info!("POST /api/chatbot/refine: {}", req.message);

    let Some(refiner) = state.refiner.as_ref() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Refine flow is not configured",
        ));
    };

    match refiner.refine(&req.message).await {
        Ok(reply) => Ok(Json(ApiResponse::success(reply))),
        Err(e) => {
            error!("Chatbot refine error: {}", e);
            Err(e.into())
        }
    }
}
