//! Axum router configuration with middleware.
//!
//! Shortlist routes live under `/api/v1/`; the health report is also served
//! at `/health` for load balancers. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/shortlist", post(handlers::shortlist::create_shortlist))
        .route("/shortlist/{id}", get(handlers::shortlist::get_shortlist))
        .route("/history", get(handlers::history::list_history))
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use shortlist_core::llm::box_provider::BoxLlmProvider;
    use shortlist_core::llm::provider::LlmProvider;
    use shortlist_infra::store::ShortlistStore;
    use shortlist_types::config::AppConfig;
    use shortlist_types::health::HealthCheck;
    use shortlist_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    use super::*;

    /// Provider that fails every call with a fixed error.
    struct FailingProvider(fn() -> LlmError);

    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err((self.0)())
        }

        async fn health(&self) -> HealthCheck {
            HealthCheck::failed("GROQ_API_KEY format looks invalid")
        }
    }

    async fn test_app(provider: Option<BoxLlmProvider>) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortlistStore::connect(None, dir.path()).await.unwrap();
        let state = AppState::from_parts(
            store,
            provider,
            AppConfig::default(),
            dir.path().to_path_buf(),
        );
        (build_router(state), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn post_json(body: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/shortlist")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            builder = builder.header("x-session-id", session);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(session) = session {
            builder = builder.header("x-session-id", session);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn valid_body() -> String {
        json!({
            "need": "CRM for a 20-person sales team",
            "requirements": ["Email sync", "Pipeline reports"],
            "weights": { "Email sync": 9 },
            "excludedVendors": ["Pipedrive"]
        })
        .to_string()
    }

    fn first_error_code(body: &Value) -> &str {
        body["errors"][0]["code"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_short_need_is_rejected() {
        let (app, _dir) = test_app(None).await;
        let (status, body) = send(&app, post_json(r#"{"need":"CRM"}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(first_error_code(&json_body(&body)), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_too_many_requirements_is_rejected() {
        let (app, _dir) = test_app(None).await;
        let requirements: Vec<String> = (0..11).map(|i| format!("Requirement {i}")).collect();
        let body = json!({ "need": "Project tracking tool", "requirements": requirements });
        let (status, body) = send(&app, post_json(&body.to_string(), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json_body(&body);
        assert_eq!(first_error_code(&body), "VALIDATION_ERROR");
        assert_eq!(body["errors"][0]["message"], "Maximum 10 requirements allowed.");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (app, _dir) = test_app(None).await;
        let (status, body) = send(&app, post_json("{not json", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(first_error_code(&json_body(&body)), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_create_then_fetch_returns_same_result() {
        let (app, _dir) = test_app(None).await;
        let (status, body) = send(&app, post_json(&valid_body(), Some("alice"))).await;
        assert_eq!(status, StatusCode::OK);

        let created = json_body(&body);
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["result"]["vendors"].as_array().unwrap().len(), 5);
        assert_eq!(created["_links"]["self"], format!("/api/v1/shortlist/{id}"));

        let (status, body) = send(&app, get(&format!("/api/v1/shortlist/{id}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        let fetched = json_body(&body);
        assert_eq!(fetched["data"]["id"], id.as_str());
        assert_eq!(fetched["data"]["sessionId"], "alice");
        assert_eq!(fetched["data"]["results"], created["data"]["result"]);
    }

    #[tokio::test]
    async fn test_markdown_download() {
        let (app, _dir) = test_app(None).await;
        let (_, body) = send(&app, post_json(&valid_body(), None)).await;
        let id = json_body(&body)["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/shortlist/{id}?format=markdown"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/markdown; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"shortlist-{}.md\"", &id[..8])
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let markdown = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(markdown.starts_with("# Vendor Shortlist Report"));
        assert!(markdown.contains("CRM for a 20-person sales team"));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let (app, _dir) = test_app(None).await;

        let unknown = format!("/api/v1/shortlist/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, get(&unknown, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = json_body(&body);
        assert_eq!(first_error_code(&body), "SHORTLIST_NOT_FOUND");
        assert!(uuid::Uuid::parse_str(body["meta"]["request_id"].as_str().unwrap()).is_ok());

        let (status, _) = send(&app, get("/api/v1/shortlist/not-a-uuid", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_session() {
        let (app, _dir) = test_app(None).await;
        for _ in 0..2 {
            send(&app, post_json(&valid_body(), Some("alice"))).await;
        }
        send(&app, post_json(&valid_body(), Some("bob"))).await;

        let (status, body) = send(&app, get("/api/v1/history", Some("alice"))).await;
        assert_eq!(status, StatusCode::OK);
        let history = json_body(&body);
        let entries = history["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e["sessionId"] == "alice"));

        let (_, body) = send(&app, get("/api/v1/history", None)).await;
        assert!(json_body(&body)["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_static_mode() {
        let (app, _dir) = test_app(None).await;

        for uri in ["/health", "/api/v1/health"] {
            let (status, body) = send(&app, get(uri, None)).await;
            assert_eq!(status, StatusCode::OK);
            let report = json_body(&body);
            assert_eq!(report["status"], "healthy");
            assert_eq!(report["checks"]["db"]["healthy"], true);
            assert!(report.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn test_health_degraded_when_llm_unhealthy() {
        let provider = BoxLlmProvider::new(FailingProvider(|| LlmError::AuthenticationFailed));
        let (app, _dir) = test_app(Some(provider)).await;

        let (status, body) = send(&app, get("/health", None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(&body)["status"], "degraded");
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_service_unavailable() {
        let provider = BoxLlmProvider::new(FailingProvider(|| LlmError::AuthenticationFailed));
        let (app, _dir) = test_app(Some(provider)).await;

        let (status, body) = send(&app, post_json(&valid_body(), None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(first_error_code(&json_body(&body)), "LLM_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_internal_error() {
        let provider = BoxLlmProvider::new(FailingProvider(|| {
            LlmError::InvalidResponse("The model response was not valid JSON. Please try again.".into())
        }));
        let (app, _dir) = test_app(Some(provider)).await;

        let (status, body) = send(&app, post_json(&valid_body(), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(first_error_code(&json_body(&body)), "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_rate_limit_falls_back_to_static() {
        let provider = BoxLlmProvider::new(FailingProvider(|| LlmError::RateLimited {
            retry_after_ms: None,
        }));
        let (app, _dir) = test_app(Some(provider)).await;

        let (status, body) = send(&app, post_json(&valid_body(), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["data"]["result"]["quotaExhausted"], true);
    }
}
