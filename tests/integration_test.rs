use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use ideaspark::api::build_app;
use ideaspark::api::AppState;
use ideaspark::config::ServerConfig;
use ideaspark::dataset::ColumnPatterns;
use ideaspark::dataset::Dataset;
use ideaspark::llm::CompletionRequest;
use ideaspark::llm::CompletionService;
use ideaspark::rag::IdeaService;
use ideaspark::rag::RefineService;
use ideaspark::IdeaSparkError;
use ideaspark::Result;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

const PROJECTS_CSV: &str = "\
Project Title,Short Description,Category
Solar Cooker,a device to cook with sun,Energy
Water Filter,cheap home filtration,Environment
Smart Dustbin,sensor lid that opens automatically,Robotics
";

/// Replies in order; an exhausted script fails every further call
struct ScriptedCompletion {
    replies: Mutex<Vec<Result<String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Err(IdeaSparkError::LlmError("connection refused".to_string()))
        } else {
            replies.remove(0)
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn service(llm: Arc<ScriptedCompletion>) -> Arc<IdeaService> {
    let dataset = Dataset::from_reader(PROJECTS_CSV.as_bytes(), &ColumnPatterns::default())
        .expect("fixture dataset loads");
    Arc::new(IdeaService::new(Arc::new(dataset), llm))
}

fn app(llm: Arc<ScriptedCompletion>) -> Router {
    build_app(AppState::new(service(llm), None), &ServerConfig::default())
}

fn app_with_refine(drafter: Arc<ScriptedCompletion>, polisher: Arc<ScriptedCompletion>) -> Router {
    let refiner = Arc::new(RefineService::new(drafter, polisher));
    build_app(
        AppState::new(service(ScriptedCompletion::new(vec![])), Some(refiner)),
        &ServerConfig::default(),
    )
}

async fn send_raw(app: Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let response = app(ScriptedCompletion::new(vec![]))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["projects"], 3);
    assert_eq!(body["data"]["model"], "scripted");
    assert_eq!(body["data"]["refine"], false);
}

#[tokio::test]
async fn test_generate_ideation() {
    let llm = ScriptedCompletion::new(vec![
        Ok("solar".to_string()),
        Ok("Project Title: <Sun> Oven".to_string()),
    ]);
    let (status, body) = post(
        app(llm.clone()),
        "/api/generate",
        json!({"category": "Solar things", "count": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["mode"], "ideation");
    assert_eq!(data["query"], "solar");
    assert_eq!(data["similar"].as_array().unwrap().len(), 2);
    assert_eq!(data["similar"][0]["record"]["title"], "Solar Cooker");
    assert_eq!(data["similar"][0]["match_type"], "keyword");
    assert_eq!(data["similar"][1]["match_type"], "backfill");
    assert_eq!(
        data["ideas"][0],
        "<pre style=\"white-space: pre-wrap; font-size: 1rem;\">Project Title: &lt;Sun&gt; Oven</pre>"
    );
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_generate_execution() {
    let llm = ScriptedCompletion::new(vec![Ok("dustbin".to_string()), Ok("1. Step".to_string())]);
    let (status, body) = post(
        app(llm),
        "/api/generate",
        json!({"category": "Smart dustbin", "mode": "execution"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mode"], "execution");
    assert!(body["data"]["plan"].as_str().unwrap().contains("1. Step"));
}

#[tokio::test]
async fn test_generate_llm_failure_is_bad_gateway() {
    let llm = ScriptedCompletion::new(vec![]);
    let (status, body) = post(app(llm), "/api/generate", json!({"category": "solar"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_chatbot_rejects_blank_message() {
    let llm = ScriptedCompletion::new(vec![]);
    let (status, body) = post(app(llm.clone()), "/api/chatbot", json!({"message": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No message provided");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_chatbot_degrades_when_service_down() {
    let llm = ScriptedCompletion::new(vec![]);
    let (status, body) = post(
        app(llm),
        "/api/chatbot",
        json!({"message": "Water Projects"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["topic"], "Water Projects");
    assert_eq!(body["data"]["response"], "Error generating ideas.");
    assert_eq!(body["data"]["similar"][0]["record"]["title"], "Water Filter");
}

#[tokio::test]
async fn test_similar_empty_query_returns_dataset_prefix() {
    let (status, body) = post(
        app(ScriptedCompletion::new(vec![])),
        "/api/similar",
        json!({"query": "", "top_k": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["record"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Solar Cooker", "Water Filter"]);
}

#[tokio::test]
async fn test_topic_fallback_returns_input() {
    let (status, body) = post(
        app(ScriptedCompletion::new(vec![])),
        "/api/topic",
        json!({"text": "Eco-Friendly TECH"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["topic"], "Eco-Friendly TECH");
}

#[tokio::test]
async fn test_topic_success() {
    let (_, body) = post(
        app(ScriptedCompletion::new(vec![Ok("Eco-Friendly Technology".to_string())])),
        "/api/topic",
        json!({"text": "Give me some cool ideas about eco-friendly tech"}),
    )
    .await;

    assert_eq!(body["data"]["topic"], "eco-friendly technology");
}

#[test]
fn test_dataset_without_title_column_fails_startup() {
    let err = Dataset::from_reader(
        "Name,Description\nKite,wind toy\n".as_bytes(),
        &ColumnPatterns::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IdeaSparkError::DatasetError(_)));
}

#[test]
fn test_bundled_dataset_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/projects_db.csv");
    let dataset = Dataset::load(&path, &ColumnPatterns::default()).unwrap();
    assert_eq!(dataset.len(), 10);
    assert!(dataset.categories().contains(&"Robotics"));
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let (status, body) = send_raw(
        app(ScriptedCompletion::new(vec![])),
        "/api/similar",
        None,
        r#"{"query": "water", "top_k": 1}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["record"]["title"], "Water Filter");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let llm = ScriptedCompletion::new(vec![]);
    let (status, body) = send_raw(
        app(llm.clone()),
        "/api/generate",
        Some("application/json"),
        "{not json",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_negative_top_k_uses_error_envelope() {
    let (status, body) = post(
        app(ScriptedCompletion::new(vec![])),
        "/api/similar",
        json!({"query": "solar", "top_k": -1}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_refine_not_configured() {
    let (status, body) = post(
        app(ScriptedCompletion::new(vec![])),
        "/api/chatbot/refine",
        json!({"message": "kites"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Refine flow is not configured");
}

#[tokio::test]
async fn test_refine_drafts_and_polishes() {
    let drafter = ScriptedCompletion::new(vec![Ok("Fly a solar kite".to_string())]);
    let polisher = ScriptedCompletion::new(vec![Ok("Project Title: Sun Kite".to_string())]);
    let (status, body) = post(
        app_with_refine(drafter.clone(), polisher.clone()),
        "/api/chatbot/refine",
        json!({"message": "kite project"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["draft"], "Fly a solar kite");
    assert_eq!(body["data"]["reply"], "Project Title: Sun Kite");
    assert!(body["data"]["reasoning"].is_null());
    assert_eq!(drafter.call_count(), 1);
    assert_eq!(polisher.call_count(), 1);
}

#[tokio::test]
async fn test_refine_blank_message_is_bad_request() {
    let drafter = ScriptedCompletion::new(vec![]);
    let (status, _) = post(
        app_with_refine(drafter.clone(), ScriptedCompletion::new(vec![])),
        "/api/chatbot/refine",
        json!({"message": "  "}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(drafter.call_count(), 0);
}
