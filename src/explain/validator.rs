use serde::Deserialize;
use serde_json::Value;

use crate::error::ExplainError;
use crate::explain::model::{ExplainRequest, ExplainResponse};

/// A request that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest<'a> {
    pub concept: &'a str,
    pub prefer_image_source: Option<&'a str>,
}

pub fn validate_request(request: &ExplainRequest) -> Result<ValidRequest<'_>, ExplainError> {
    let concept = request
        .concept
        .as_deref()
        .ok_or_else(|| ExplainError::InvalidRequest("concept is required".to_string()))?
        .trim();
    if concept.is_empty() {
        return Err(ExplainError::InvalidRequest(
            "concept must not be empty".to_string(),
        ));
    }

    let prefer_image_source = request
        .prefer_image_source
        .as_deref()
        .map(str::trim)
        .filter(|source| !source.is_empty());

    Ok(ValidRequest {
        concept,
        prefer_image_source,
    })
}

const NARRATIVE_KEYS: [&str; 4] = ["beginner", "intermediate", "advanced", "applications"];

/// A model reply is usable when it is an object carrying at least one
/// narrative field and every known field has a type [`ExplainResponse`]
/// accepts. The returned response never claims to be degraded.
pub fn validate_explanation(value: &Value) -> Result<ExplainResponse, ExplainError> {
    let object = value.as_object().ok_or_else(|| {
        ExplainError::UpstreamMalformedResponse("completion is not a JSON object".to_string())
    })?;
    if !NARRATIVE_KEYS.iter().any(|key| object.contains_key(*key)) {
        return Err(ExplainError::UpstreamMalformedResponse(
            "completion has none of beginner, intermediate, advanced, applications".to_string(),
        ));
    }

    let mut response = ExplainResponse::deserialize(value).map_err(|e| {
        ExplainError::UpstreamMalformedResponse(format!("completion does not match schema: {e}"))
    })?;
    response.degraded = false;
    Ok(response)
}

/// True when `value` already has the exact wire shape of a response, so it
/// can be forwarded byte for byte. Extra keys are allowed; `degraded` is not,
/// only the service sets that flag.
pub fn is_complete(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let narrative_ok = NARRATIVE_KEYS
        .iter()
        .all(|key| object.get(*key).is_some_and(Value::is_string));
    let viz_ok = object
        .get("visualization")
        .and_then(|viz| viz.get("type"))
        .is_some_and(Value::is_string);
    let image_ok = object
        .get("image_url")
        .map_or(true, |url| url.is_string() || url.is_null());

    narrative_ok && viz_ok && image_ok && !object.contains_key("degraded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::model::PLACEHOLDER;
    use serde_json::json;

    #[test]
    fn test_missing_concept_rejected() {
        let err = validate_request(&ExplainRequest::default()).unwrap_err();
        assert!(matches!(err, ExplainError::InvalidRequest(_)));
    }

    #[test]
    fn test_blank_concept_rejected() {
        let err = validate_request(&ExplainRequest::new("   ", None)).unwrap_err();
        assert_eq!(err.to_string(), "concept must not be empty");
    }

    #[test]
    fn test_concept_is_trimmed() {
        let request = ExplainRequest::new("  neutron stars \n", Some(" ".to_string()));
        let valid = validate_request(&request).unwrap();
        assert_eq!(valid.concept, "neutron stars");
        assert_eq!(valid.prefer_image_source, None);
    }

    #[test]
    fn test_array_reply_rejected() {
        assert!(validate_explanation(&json!(["beginner"])).is_err());
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        assert!(validate_explanation(&json!({ "beginner": "b", "visualization": 7 })).is_err());
        assert!(validate_explanation(&json!({ "advanced": { "text": "x" } })).is_err());
    }

    #[test]
    fn test_object_without_narrative_rejected() {
        assert!(validate_explanation(&json!({})).is_err());
        assert!(validate_explanation(&json!({ "answer": "Neutron stars are dense." })).is_err());
    }

    #[test]
    fn test_partial_object_accepted_with_placeholders() {
        let response = validate_explanation(&json!({ "beginner": "Stars are hot." })).unwrap();
        assert_eq!(response.beginner, "Stars are hot.");
        assert_eq!(response.advanced, PLACEHOLDER);
        assert!(!is_complete(&json!({ "beginner": "Stars are hot." })));
    }

    #[test]
    fn test_model_cannot_claim_degraded() {
        let value = json!({ "beginner": "b", "degraded": true });
        assert!(!validate_explanation(&value).unwrap().degraded);

        let full = json!({
            "beginner": "b", "intermediate": "i", "advanced": "a", "applications": "x",
            "visualization": { "type": "orbit" }
        });
        assert!(is_complete(&full));
        let mut flagged = full.clone();
        flagged["degraded"] = json!(true);
        assert!(!is_complete(&flagged));
    }

    #[test]
    fn test_list_applications_is_not_complete() {
        let value = json!({
            "beginner": "b", "intermediate": "i", "advanced": "a", "applications": ["GPS"],
            "visualization": { "type": "orbit" }
        });
        assert!(validate_explanation(&value).is_ok());
        assert!(!is_complete(&value));
    }
}
