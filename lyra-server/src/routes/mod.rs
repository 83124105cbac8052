//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional OpenAPI document (disable with `LYRA_ENABLE_OPENAPI=false`)
//! - Banner and liveness routes at the root
//! - `/api` routes for health, config, chat, memory and skills
//! - A JSON 404 for everything else

mod chat;
pub mod doc;
mod health;
mod memory;
mod skills;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::error::{ServerError, ROUTE_NOT_FOUND};
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .merge(chat::router())
        .merge(memory::router())
        .merge(skills::router());

    let mut app = Router::new()
        .merge(health::root_router())
        .nest("/api", api_router);

    if state.config.enable_openapi {
        app = app.merge(doc::router());
    }

    app.fallback(not_found)
        // Chat messages have no length limit.
        .layer(DefaultBodyLimit::disable())
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

async fn not_found() -> ServerError {
    ServerError::NotFound(ROUTE_NOT_FOUND.to_owned())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Config, Variant};
    use crate::entities::AnyStore;
    use crate::services::responder::{GREETING_REPLY, REPEATED_REPLY};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app_with(config: Config) -> Router {
        let store = AnyStore::open(config.database_url.as_deref()).await.unwrap();
        build(Arc::new(AppState::new(config, store)))
    }

    async fn app() -> Router {
        app_with(Config::default()).await
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send(app: &Router, content: &str) -> Value {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/chat/message",
            Some(json!({ "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn health_and_config() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy", "environment": "vercel" }));

        let (_, body) = call(&app, Method::GET, "/api/config", None).await;
        assert_eq!(
            body,
            json!({ "version": "1.0.0", "is_production": false, "deployment_region": "unknown" })
        );

        let (_, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = app().await;
        for uri in ["/api/nope", "/nope", "/api"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({ "detail": "The requested API endpoint was not found" }));
        }
    }

    #[tokio::test]
    async fn message_round_trip_through_history() {
        let app = app().await;
        let reply = send(&app, "Hello there").await;
        assert_eq!(reply["sender"], "lyra");
        assert_eq!(reply["content"], GREETING_REPLY);
        assert!(reply["id"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(reply["timestamp"].as_str().is_some());

        let (status, history) = call(&app, Method::GET, "/api/chat/history", None).await;
        assert_eq!(status, StatusCode::OK);
        let messages = history["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["sender"], "user");
        assert_eq!(messages[0]["content"], "Hello there");
        assert_eq!(messages[1], reply);
    }

    #[tokio::test]
    async fn missing_content_is_treated_as_empty() {
        let app = app().await;
        let (status, reply) = call(&app, Method::POST, "/api/chat/message", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["content"], "I'm here! How can I help you today?");
    }

    #[tokio::test]
    async fn message_larger_than_default_body_limit_is_accepted() {
        let app = app().await;
        let content = "x".repeat(3 * 1024 * 1024);
        let reply = send(&app, &content).await;
        assert!(reply["content"].as_str().is_some_and(|c| c.contains(&content)));

        let (_, history) = call(&app, Method::GET, "/api/chat/history", None).await;
        let messages = history["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], content.as_str());
    }

    #[tokio::test]
    async fn repeated_question_over_http() {
        let app = app().await;
        send(&app, "What's the weather?").await;
        let second = send(&app, "What's the weather?").await;
        assert_eq!(second["content"], REPEATED_REPLY);
    }

    #[tokio::test]
    async fn clear_history() {
        let app = app().await;
        send(&app, "one").await;
        send(&app, "two").await;
        for _ in 0..2 {
            let (status, body) = call(&app, Method::DELETE, "/api/chat/history", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "status": "success", "message": "Chat history cleared" }));
        }
        let (_, history) = call(&app, Method::GET, "/api/chat/history", None).await;
        assert_eq!(history, json!({ "messages": [] }));
    }

    #[tokio::test]
    async fn memory_defaults_and_listing() {
        let app = app().await;
        let (status, created) = call(&app, Method::POST, "/api/memory", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["title"], "New Memory");
        assert_eq!(created["content"], "");
        assert_eq!(created["type"], "conversation");

        let (_, custom) = call(
            &app,
            Method::POST,
            "/api/memory",
            Some(json!({ "title": "Trip", "content": "Pack socks", "type": "task" })),
        )
        .await;
        assert_eq!(custom["type"], "task");

        let (_, listed) = call(&app, Method::GET, "/api/memory", None).await;
        let memories = listed["memories"].as_array().unwrap();
        assert_eq!(memories.len(), 2);
        assert_eq!(memories[0], created);
        assert_eq!(memories[1], custom);
    }

    #[tokio::test]
    async fn skills_are_fixed() {
        let app = app().await;
        send(&app, "anything").await;
        for _ in 0..2 {
            let (_, body) = call(&app, Method::GET, "/api/skills", None).await;
            let skills = body["skills"].as_array().unwrap();
            assert_eq!(skills.len(), 4);
            assert_eq!(
                skills[0],
                json!({ "id": "web_search", "name": "Web Search", "icon": "🔍", "active": true })
            );
            assert_eq!(skills[2]["active"], false);
        }
    }

    #[tokio::test]
    async fn simple_variant_over_sqlite() {
        let config = Config {
            variant: Variant::Simple,
            database_url: Some("sqlite::memory:".to_owned()),
            ..Config::default()
        };
        let app = app_with(config).await;
        let reply = send(&app, "hello").await;
        assert_eq!(reply["content"], "You said: **hello**\n\nI can help you with that! 😊");
        assert!(reply["id"].as_str().is_some_and(|id| id.starts_with("lyra-")));

        let (_, history) = call(&app, Method::GET, "/api/chat/history", None).await;
        assert_eq!(history["messages"].as_array().unwrap().len(), 2);

        let (_, created) = call(&app, Method::POST, "/api/memory", Some(json!({}))).await;
        assert!(created["id"].as_str().is_some_and(|id| id.starts_with("mem-")));
    }

    #[tokio::test]
    async fn openapi_document_toggle() {
        let (status, doc) = call(&app().await, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/chat/message"].is_object());

        let config = Config {
            enable_openapi: false,
            ..Config::default()
        };
        let (status, _) = call(&app_with(config).await, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn trace_id_is_echoed() {
        let app = app().await;
        let id = "5f3c1c1e-2d1b-4f0e-9a4e-0d6b8f6f2a11";
        let request = Request::builder()
            .uri("/api/skills")
            .header(trace::X_TRACE_ID, id)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[trace::X_TRACE_ID], id);
    }

    #[tokio::test]
    async fn cors_preflight_allows_vercel_subdomain() {
        let app = app().await;
        let origin = "https://lyra-preview-123.vercel.app";
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat/message")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat/message")
            .header(header::ORIGIN, "https://evil.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
