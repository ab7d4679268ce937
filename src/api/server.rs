//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::config::ServerConfig;
use crate::dataset::Dataset;
use crate::llm::LlmService;
use crate::rag::IdeaService;
use crate::rag::RefineService;
use crate::Result;

/// Assemble the application router with middleware layers
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let mut app = Router::new().nest("/api", routes::api_routes(state));

    if let Some(dir) = &server.static_dir {
        info!("📁 Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app = app
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if server.enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
///
/// The dataset is loaded before binding; a dataset without title or
/// description columns aborts startup.
pub async fn serve_api(config: &AppConfig, host: String, port: u16) -> Result<()> {
    info!("🚀 Starting IdeaSpark API server...");

    // Initialize services
    let dataset = Arc::new(Dataset::load(
        config.dataset_path(),
        config.column_patterns(),
    )?);
    let llm_service = Arc::new(LlmService::new(config)?);
    let service = Arc::new(IdeaService::new(dataset, llm_service));

    let refiner = RefineService::from_config(config)?.map(Arc::new);

    let state = AppState::new(service, refiner);
    let app = build_app(state, &config.server);

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health    - Health check");
    info!("  POST /api/generate  - Ideas or execution plan for a category");
    info!("  POST /api/chatbot   - Conversational idea generation");
    info!("  POST /api/chatbot/refine - Draft-and-polish chatbot (needs [refine])");
    info!("  POST /api/similar   - Rank past projects");
    info!("  POST /api/topic     - Extract topic keywords");

    axum::serve(listener, app).await?;

    Ok(())
}
