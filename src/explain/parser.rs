use serde_json::Value;
use tracing::warn;

use crate::error::ExplainError;
use crate::explain::model::{ExplainResponse, Explanation};
use crate::explain::validator;

/// Extracts the JSON object from a completion and checks its shape.
///
/// The model is asked for bare JSON but frequently wraps it in a code fence
/// or a sentence of prose, so only the text between the first `{` and the
/// last `}` is parsed. A reply already in wire shape is returned as is;
/// a partial one is rebuilt with placeholders for the missing fields.
pub(crate) fn parse_completion(raw: &str) -> Result<Value, ExplainError> {
    let cleaned = raw.trim();

    let cleaned = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => {
            return Err(ExplainError::UpstreamMalformedResponse(format!(
                "no JSON object found in completion: {}",
                snippet(cleaned)
            )))
        }
    };

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        ExplainError::UpstreamMalformedResponse(format!(
            "JSON parse error: {} | content snippet: {}",
            e,
            snippet(cleaned)
        ))
    })?;

    let response = validator::validate_explanation(&value)?;
    if validator::is_complete(&value) {
        return Ok(value);
    }
    serde_json::to_value(response)
        .map_err(|e| ExplainError::UpstreamMalformedResponse(format!("cannot normalize completion: {e}")))
}

/// Never fails: a reply that cannot be used becomes a degraded response
/// carrying the raw text.
pub fn interpret_completion(raw: &str) -> Explanation {
    match parse_completion(raw) {
        Ok(value) => Explanation::Model(value),
        Err(err) => {
            warn!(error = %err, "completion unusable, returning degraded explanation");
            Explanation::Degraded(ExplainResponse::degraded(raw))
        }
    }
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(100) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
