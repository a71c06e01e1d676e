//! HTTP/WebSocket server for the dashboard page
//!
//! Serves the server-rendered page, its embedded assets, the command proxy
//! the page talks to, and a WebSocket that pushes state changes.

mod events;
mod page;
mod proxy;
pub mod routes;
pub mod state;
mod static_files;

pub use events::{EventBroadcaster, ServerEvent};
pub use page::PageRenderer;
pub use proxy::invoke_handler;
pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
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
    version: String,
    name: String,
}

/// Build the router with all routes and layers
pub fn build_router(state: ServerAppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE, ACCEPT])
    } else {
        let allowed_origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE, ACCEPT])
    };

    Router::new()
        .route("/", get(page::index_handler))
        .route("/static/*path", get(static_files::serve_static))
        .route("/api/invoke", post(proxy::invoke_handler))
        .route("/ws/events", get(events::ws_handler))
        .route("/health", get(health_handler))
        .route("/api/version", get(version_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP/WebSocket server until shutdown is requested
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: &[String],
) -> Result<(), String> {
    let shutdown_state = state.shutdown_state.clone();
    let (model, has_credential) = {
        let assistant = state.lock_assistant()?;
        (assistant.model().to_string(), assistant.has_credential())
    };
    let app = build_router(state, cors_origins);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let cors_display = if cors_origins.is_empty() {
        "*".to_string()
    } else {
        cors_origins.join(", ")
    };
    let assistant_display = if has_credential {
        model
    } else {
        format!("{} (no API key)", model)
    };

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                        InfraInsight                          ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║                                                              ║");
    println!("║  Dashboard: http://{:<42}║", addr);
    println!("║  Assistant: {:<49}║", assistant_display);
    println!("║  CORS Origins: {:<46}║", cors_display);
    println!("║                                                              ║");
    println!("║  Endpoints:                                                  ║");
    println!("║    GET  /                - Dashboard page                    ║");
    println!("║    POST /api/invoke      - Command proxy                     ║");
    println!("║    GET  /ws/events       - WebSocket events                  ║");
    println!("║    GET  /health          - Health check                      ║");
    println!("║                                                              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown_state.wait_for_shutdown().await })
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint
async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        assert_eq!(health_handler().await, "OK");
    }

    #[tokio::test]
    async fn test_version_handler() {
        let Json(info) = version_handler().await;
        assert_eq!(info.name, "infra-insight");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn test_build_router_with_origins() {
        let state = test_support::test_state(None);
        let _router = build_router(state, &["http://localhost:5173".to_string()]);
    }

    #[tokio::test]
    async fn test_router_serves_page_and_commands() {
        use axum::body::{to_bytes, Body};
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let app = build_router(test_support::test_state(None), &[]);

        let page = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("InfraInsight"));

        let invoke = app
            .clone()
            .oneshot(
                Request::post("/api/invoke")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cmd":"select_scenario","args":{"scenario":"kubernetes"}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(invoke.status(), StatusCode::OK);
        let body = to_bytes(invoke.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], "kubernetes");

        let asset = app
            .oneshot(Request::get("/static/dashboard.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(asset.status(), StatusCode::OK);
    }
}
