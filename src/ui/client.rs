use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use crate::explain::{ExplainRequest, ExplainResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx from the explain service; carries the status text.
    #[error("Server error: {0}")]
    Status(String),

    #[error("{0}")]
    Network(#[from] reqwest::Error),
}

/// The controller's only way to reach the explain service.
pub trait ExplainClient {
    fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ClientError>;
}

/// Blocking HTTP client for `POST /api/ask`. No timeout: a hung service
/// keeps the caller waiting.
pub struct HttpExplainClient {
    client: Client,
    endpoint: String,
}

impl HttpExplainClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ExplainClient for HttpExplainClient {
    fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ClientError> {
        debug!(endpoint = %self.endpoint, "posting explain request");
        let response = self.client.post(&self.endpoint).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(ClientError::Status(reason));
        }

        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn call(server: &MockServer, request: ExplainRequest) -> Result<ExplainResponse, ClientError> {
        let endpoint = format!("{}/api/ask", server.uri());
        tokio::task::spawn_blocking(move || HttpExplainClient::new(endpoint)?.explain(&request))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_posts_snake_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ask"))
            .and(body_json(json!({ "concept": "comets", "prefer_image_source": "nasa" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "beginner": "Dirty snowballs.",
                "visualization": { "type": "orbit" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = call(&server, ExplainRequest::new("comets", Some("nasa".into())))
            .await
            .unwrap();
        assert_eq!(response.beginner, "Dirty snowballs.");
        assert_eq!(response.visualization.viz_type, "orbit");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_success_carries_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;

        let err = call(&server, ExplainRequest::new("comets", None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: Internal Server Error");
    }

    #[test]
    fn test_unreachable_service_is_network_error() {
        let client = HttpExplainClient::new("http://127.0.0.1:1/api/ask").unwrap();
        let result = client.explain(&ExplainRequest::new("comets", None));
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
