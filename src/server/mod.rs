//! HTTP server exposing the generation pipeline
//!
//! Commands go through the `/api/invoke` proxy; `/health` and `/api/version`
//! are plain GET endpoints.

mod proxy;
pub mod routes;
pub mod state;

pub use proxy::{invoke_handler, InvokeError, InvokeRequest, InvokeResponse};
pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Version information for the server
#[derive(serde::Serialize)]
struct VersionInfo {
    name: String,
    version: String,
}

/// Build the CORS layer: restricted to the given origins, or permissive
fn cors_layer(cors_origins: Option<&[String]>) -> CorsLayer {
    match cors_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        }
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]),
    }
}

/// Build the application router
pub fn build_router(state: ServerAppState, cors_origins: Option<&[String]>) -> Router {
    Router::new()
        .route("/api/invoke", post(proxy::invoke_handler))
        .route("/health", get(health_handler))
        .route("/api/version", get(version_handler))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the HTTP server until shutdown is requested
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Option<Vec<String>>,
) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let cors_display = match &cors_origins {
        Some(origins) if !origins.is_empty() => origins.join(", "),
        _ => "*".to_string(),
    };

    println!("\nsectiongen server v{}", env!("CARGO_PKG_VERSION"));
    println!("  Server URL:       http://{}:{}", bind, port);
    println!("  Default provider: {}", state.service.default_provider());
    println!("  CORS origins:     {}", cors_display);
    println!("  Endpoints:");
    println!("    POST /api/invoke   - Command proxy");
    println!("    GET  /api/version  - Server version info");
    println!("    GET  /health       - Health check\n");

    let shutdown_state = state.shutdown_state.clone();
    let app = build_router(state, cors_origins.as_deref());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("[server] Listening on http://{}", addr);

    let shutdown_signal = async move {
        shutdown_state.wait().await;
        log::info!("[server] Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::errors::GenerationError;
    use crate::file_storage::{MemorySectionStore, SectionStore};
    use crate::generation::{GenerationService, Prompt};
    use crate::models::ProviderId;
    use crate::providers::{ProviderSelector, SectionProvider};
    use crate::shutdown::ShutdownState;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const VALID: &str = r#"[{"title":"Hero","content":"Welcome"},{"title":"About","content":"Story"},{"title":"Contact","content":"Email us"}]"#;

    struct FixedProvider {
        id: ProviderId,
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl SectionProvider for FixedProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn generate(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(GenerationError::unavailable(
                    self.id,
                    Some(500),
                    "backend down".to_string(),
                )),
            }
        }

        async fn list_models(&self) -> Vec<String> {
            vec!["model-a".to_string()]
        }
    }

    fn test_state(local_reply: Option<&'static str>) -> (ServerAppState, Arc<MemorySectionStore>) {
        let store = Arc::new(MemorySectionStore::new());
        let selector = ProviderSelector::new(
            Arc::new(FixedProvider {
                id: ProviderId::Hosted,
                reply: Some(VALID),
            }),
            Arc::new(FixedProvider {
                id: ProviderId::Local,
                reply: local_reply,
            }),
            ProviderId::Hosted,
        );
        let service = GenerationService::new(selector, store.clone());
        let state = ServerAppState::new(AppConfig::default(), service, ShutdownState::new());
        (state, store)
    }

    async fn invoke(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/invoke")
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
        let (state, _) = test_state(Some(VALID));
        let response = build_router(state, None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_sections_command() {
        let (state, store) = test_state(Some(VALID));
        let (status, body) = invoke(
            build_router(state, None),
            json!({"cmd": "generate_sections", "args": {"idea": "  bakery  "}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["idea"], "bakery");
        assert_eq!(body["data"]["provider"], "hosted");
        assert_eq!(body["data"]["sections"][2]["title"], "Contact");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_idea_is_bad_request() {
        let (state, store) = test_state(Some(VALID));
        let (status, body) = invoke(
            build_router(state, None),
            json!({"cmd": "generate_sections", "args": {"idea": "   "}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Website idea is required");
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_idea_is_bad_request() {
        let (state, _) = test_state(Some(VALID));
        let (status, _) = invoke(
            build_router(state, None),
            json!({"cmd": "generate_sections", "args": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let (state, store) = test_state(None);
        let (status, body) = invoke(
            build_router(state, None),
            json!({"cmd": "generate_sections", "args": {"idea": "gym", "provider": "local"}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("provider_unavailable"));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_sections_lists_saved() {
        let (state, _) = test_state(Some(VALID));
        let app = build_router(state, None);

        invoke(
            app.clone(),
            json!({"cmd": "generate_sections", "args": {"idea": "florist"}}),
        )
        .await;
        let (status, body) = invoke(app, json!({"cmd": "get_sections"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["idea"], "florist");
    }

    #[tokio::test]
    async fn test_default_provider_and_models() {
        let (state, _) = test_state(Some(VALID));
        let app = build_router(state, None);

        let (_, body) = invoke(app.clone(), json!({"cmd": "get_default_provider"})).await;
        assert_eq!(body["data"]["provider"], "hosted");

        let (_, body) = invoke(
            app.clone(),
            json!({"cmd": "get_available_models", "args": {"provider": "local"}}),
        )
        .await;
        assert_eq!(body["data"], json!(["model-a"]));

        let (_, body) = invoke(app, json!({"cmd": "get_providers"})).await;
        let providers = body["data"].as_array().unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0]["isDefault"], true);
        assert_eq!(providers[1]["baseUrl"], "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_provider_token_commands_write_secrets_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secrets.toml");
        let (state, _) = test_state(Some(VALID));
        let app = build_router(state.with_secrets_path(&path), None);

        let (status, body) = invoke(
            app.clone(),
            json!({
                "cmd": "set_provider_token",
                "args": {"provider": "openai", "token": " sk-abc "}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let secrets = crate::config::SecretsConfig::load_from(&path).unwrap();
        assert_eq!(secrets.get_token(ProviderId::Hosted), Some("sk-abc"));
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let (_, body) = invoke(
            app,
            json!({"cmd": "delete_provider_token", "args": {"provider": "hosted"}}),
        )
        .await;
        assert_eq!(body["data"]["deleted"], true);
        let secrets = crate::config::SecretsConfig::load_from(&path).unwrap();
        assert!(secrets.get_token(ProviderId::Hosted).is_none());
    }

    #[tokio::test]
    async fn test_provider_token_rejects_bad_arguments() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secrets.toml");
        let (state, _) = test_state(Some(VALID));
        let app = build_router(state.with_secrets_path(&path), None);

        let (status, body) = invoke(
            app.clone(),
            json!({"cmd": "set_provider_token", "args": {"provider": "azure", "token": "x"}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown provider: azure");

        let (status, _) = invoke(
            app,
            json!({"cmd": "set_provider_token", "args": {"provider": "hosted", "token": "  "}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (state, _) = test_state(Some(VALID));
        let (status, body) = invoke(build_router(state, None), json!({"cmd": "drop_tables"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown command: drop_tables");
    }
}
