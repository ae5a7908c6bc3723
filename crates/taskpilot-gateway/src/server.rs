// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, auth middleware, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use taskpilot_agent::ChatOrchestrator;
use taskpilot_core::{AuthAdapter, StorageAdapter, TaskpilotError};

use crate::auth::auth_middleware;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Runs chat turns.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Read access for the conversation listing and history endpoints.
    pub storage: Arc<dyn StorageAdapter>,
}

/// Gateway server configuration (mirrors GatewayConfig from taskpilot-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the gateway router.
///
/// `/health` is public; everything under `/v1` requires a valid bearer
/// token resolved through the auth adapter.
pub fn router(state: GatewayState, auth: Arc<dyn AuthAdapter>) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_health));

    let api_routes = Router::new()
        .route("/v1/users/{user_id}/chat", post(handlers::post_chat))
        .route(
            "/v1/users/{user_id}/conversations",
            get(handlers::get_conversations),
        )
        .route(
            "/v1/users/{user_id}/conversations/{conversation_id}/messages",
            get(handlers::get_messages),
        )
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until the listener fails.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    auth: Arc<dyn AuthAdapter>,
) -> Result<(), TaskpilotError> {
    let app = router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TaskpilotError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| TaskpilotError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use taskpilot_config::model::StorageConfig;
    use taskpilot_storage::SqliteStorage;
    use taskpilot_tasks::TaskStore;
    use taskpilot_test_utils::MockProvider;
    use taskpilot_tools::{ToolRegistry, register_builtins};
    use tower::ServiceExt;

    use crate::auth::HmacAuth;

    const SECRET: &str = "gateway-test-secret";

    async fn test_router(provider: MockProvider) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("gateway.db");
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        }));
        storage.initialize().await.unwrap();

        let store = Arc::new(TaskStore::new(storage.clone()));
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, store);

        let orchestrator = Arc::new(ChatOrchestrator::new(
            Arc::new(provider),
            storage.clone(),
            registry,
            "mock-model".to_string(),
            512,
        ));

        let state = GatewayState {
            orchestrator,
            storage,
        };
        let auth: Arc<dyn AuthAdapter> = Arc::new(HmacAuth::new(Some(SECRET.to_string())));
        (router(state, auth), dir)
    }

    fn bearer(user_id: &str) -> String {
        format!("Bearer {}", HmacAuth::issue_token(SECRET, user_id).unwrap())
    }

    fn chat_request(user_id: &str, token_user: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/v1/users/{user_id}/chat"))
            .header(header::AUTHORIZATION, bearer(token_user))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_requires_no_auth() {
        let (app, _dir) = test_router(MockProvider::new()).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn chat_without_token_is_unauthorized() {
        let (app, _dir) = test_router(MockProvider::new()).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/users/alice/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn chat_turn_returns_reply_and_conversation_id() {
        let provider = MockProvider::with_responses(vec![MockProvider::text_response(
            "Hello! What can I do for you?",
        )]);
        let (app, _dir) = test_router(provider).await;

        let response = app
            .oneshot(chat_request(
                "alice",
                "alice",
                serde_json::json!({"message": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["reply"], "Hello! What can I do for you?");
        assert!(json["conversation_id"].is_string());
    }

    #[tokio::test]
    async fn path_user_mismatch_is_forbidden() {
        let (app, _dir) = test_router(MockProvider::new()).await;

        let response = app
            .oneshot(chat_request(
                "bob",
                "alice",
                serde_json::json!({"message": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The body never echoes the mismatch details.
        let json = body_json(response).await;
        assert_eq!(json["error"], "forbidden");
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let (app, _dir) = test_router(MockProvider::new()).await;

        let response = app
            .oneshot(chat_request(
                "alice",
                "alice",
                serde_json::json!({"message": "hi", "conversation_id": "missing"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn provider_failure_is_an_opaque_bad_gateway() {
        let provider = MockProvider::new();
        provider.fail_with("upstream key leaked in panic").await;
        let (app, _dir) = test_router(provider).await;

        let response = app
            .oneshot(chat_request(
                "alice",
                "alice",
                serde_json::json!({"message": "hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(!error.contains("leaked"));
        assert!(error.contains("try again"));
    }

    #[tokio::test]
    async fn conversation_listing_and_history_round_trip() {
        let provider = MockProvider::with_responses(vec![MockProvider::text_response("hello")]);
        let (app, _dir) = test_router(provider).await;

        let response = app
            .clone()
            .oneshot(chat_request(
                "alice",
                "alice",
                serde_json::json!({"message": "hi"}),
            ))
            .await
            .unwrap();
        let conversation_id = body_json(response).await["conversation_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/users/alice/conversations")
                    .header(header::AUTHORIZATION, bearer("alice"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["conversations"].as_array().unwrap().len(), 1);
        assert_eq!(json["conversations"][0]["id"], conversation_id.as_str());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/v1/users/alice/conversations/{conversation_id}/messages"
                    ))
                    .header(header::AUTHORIZATION, bearer("alice"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn foreign_history_is_not_found() {
        let provider = MockProvider::with_responses(vec![MockProvider::text_response("hello")]);
        let (app, _dir) = test_router(provider).await;

        let response = app
            .clone()
            .oneshot(chat_request(
                "alice",
                "alice",
                serde_json::json!({"message": "hi"}),
            ))
            .await
            .unwrap();
        let conversation_id = body_json(response).await["conversation_id"]
            .as_str()
            .unwrap()
            .to_string();

        // Bob authenticates as himself but asks for Alice's thread id
        // under his own path; it must look like it does not exist.
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/v1/users/bob/conversations/{conversation_id}/messages"
                    ))
                    .header(header::AUTHORIZATION, bearer("bob"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
