use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::llm::{CompletionClient, CompletionError};

const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Where the bearer token comes from.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// `OPENAI_API_KEY`, read on every call.
    Env,
    Fixed(Option<String>),
}

impl ApiKeySource {
    fn resolve(&self) -> Option<String> {
        match self {
            ApiKeySource::Env => std::env::var(API_KEY_VAR).ok(),
            ApiKeySource::Fixed(key) => key.clone(),
        }
    }
}

/// Chat-completions client. The API key is looked up on every call, so the
/// service can start without credentials.
pub struct OpenAiClient {
    client: Client,
    config: CompletionConfig,
    api_key: ApiKeySource,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key: ApiKeySource::Env,
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.with_api_key_source(ApiKeySource::Fixed(Some(api_key.into())))
    }

    pub fn with_api_key_source(mut self, source: ApiKeySource) -> Self {
        self.api_key = source;
        self
    }

    fn api_key(&self) -> Result<String, CompletionError> {
        self.api_key
            .resolve()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CompletionError::MissingApiKey)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let api_key = self.api_key()?;

        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });
        debug!(model = %self.config.model, user_len = user.len(), "sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let value: Value = response.json().await?;
        let output = extract_output_text(&value).ok_or(CompletionError::MissingContent)?;
        Ok(output.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn extract_output_text(value: &Value) -> Option<String> {
    value
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(CompletionConfig {
            api_base: server.uri(),
            ..CompletionConfig::default()
        })
        .with_api_key("test-key")
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini", "max_tokens": 800 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  {\"beginner\":\"b\"}\n" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).complete("system", "user").await.unwrap();
        assert_eq!(text, "{\"beginner\":\"b\"}");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("system", "user").await.unwrap_err();
        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "odd" })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("system", "user").await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingContent));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for source in [ApiKeySource::Fixed(None), ApiKeySource::Fixed(Some("  ".to_string()))] {
            let client = OpenAiClient::new(CompletionConfig {
                api_base: server.uri(),
                ..CompletionConfig::default()
            })
            .with_api_key_source(source);
            let err = client.complete("system", "user").await.unwrap_err();
            assert!(matches!(err, CompletionError::MissingApiKey));
        }
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = OpenAiClient::new(CompletionConfig {
            api_base: "http://localhost:9/v1/".to_string(),
            ..CompletionConfig::default()
        });
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_extract_output_text() {
        let value = json!({ "choices": [{ "message": { "content": "hello" } }] });
        assert_eq!(extract_output_text(&value).as_deref(), Some("hello"));
        assert_eq!(extract_output_text(&json!({ "choices": [] })), None);
    }
}
