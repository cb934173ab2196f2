use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::ExplainError;
use crate::explain::model::{ExplainRequest, Explanation};
use crate::explain::{parser, validator};
use crate::llm::{prompt, CompletionClient};

/// Stateless explain handler: validate, prompt, complete, interpret.
pub struct ExplainService {
    client: Arc<dyn CompletionClient>,
    system_prompt: String,
}

impl ExplainService {
    pub fn new(client: Arc<dyn CompletionClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn with_default_prompt(client: Arc<dyn CompletionClient>) -> Self {
        Self::new(client, prompt::DEFAULT_SYSTEM_PROMPT)
    }

    pub async fn explain(&self, request: &ExplainRequest) -> Result<Explanation, ExplainError> {
        let valid = validator::validate_request(request)?;
        info!(concept = valid.concept, model = self.client.model(), "explaining concept");

        let user = prompt::build_user_prompt(valid.concept, valid.prefer_image_source);
        let raw = self
            .client
            .complete(&self.system_prompt, &user)
            .await
            .map_err(|err| {
                error!(error = %err, "completion request failed");
                ExplainError::UpstreamFailure(err)
            })?;

        let explanation = parser::interpret_completion(&raw);
        if explanation.is_degraded() {
            warn!(concept = valid.concept, "serving degraded explanation");
        }
        Ok(explanation)
    }
}
