//! # HTTP Server
//!
//! Binds the explain API, the health check and the PNG renderer behind a
//! CORS layer so a page on another origin can call it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::routes::{explain_routes, health_routes, AppState};
use crate::config::ServiceConfig;
use crate::explain::ExplainService;
use crate::llm::{prompt, CompletionClient, OpenAiClient};
use crate::viz::fonts;

pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Server backed by the OpenAI chat-completions API.
    pub fn new(config: ServiceConfig) -> Self {
        let client: Arc<dyn CompletionClient> =
            Arc::new(OpenAiClient::new(config.completion.clone()));
        Self::with_client(config, client)
    }

    pub fn with_client(config: ServiceConfig, client: Arc<dyn CompletionClient>) -> Self {
        let system_prompt = prompt::load_system_prompt(config.system_prompt_path.as_deref());
        let state = AppState {
            service: Arc::new(ExplainService::new(client, system_prompt)),
            font: fonts::load_font().map(Arc::new),
        };
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", explain_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> std::io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {e}", self.config.socket_addr()),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, model = %self.config.completion.model, "AstroLens explain service listening");
        info!("  POST /api/ask     - explain a concept");
        info!("  GET  /api/viz.png - render a visualization");
        info!("  GET  /health      - health check");

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::service::tests::StubCompletion;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::with_client(ServiceConfig::with_port(8080), StubCompletion::replying("{}"));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let config = ServiceConfig {
            cors_origins: vec!["http://localhost:5173".to_string(), "not a header\n".to_string()],
            ..ServiceConfig::default()
        };
        let router = HttpServer::with_client(config, StubCompletion::replying("{}")).router();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/ask")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_full_router_serves_explanations() {
        let router = HttpServer::with_client(
            ServiceConfig::default(),
            StubCompletion::replying(r#"{"beginner":"b","visualization":{"type":"orbit"}}"#),
        )
        .router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"concept":"orbits"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
