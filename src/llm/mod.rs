pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::{ApiKeySource, OpenAiClient};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("missing output text from completion API response")]
    MissingContent,
}

/// The one outbound dependency of the explain service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;

    fn model(&self) -> &str;
}
