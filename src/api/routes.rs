//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Generation endpoints
        .route("/generate", post(handlers::generate))
        .route("/chatbot", post(handlers::chatbot))
        .route("/chatbot/refine", post(handlers::refine))
        // Retrieval endpoints
        .route("/similar", post(handlers::similar))
        .route("/topic", post(handlers::topic))
        .with_state(state)
}
