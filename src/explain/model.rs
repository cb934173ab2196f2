use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown in place of any narrative field the model left out.
pub const PLACEHOLDER: &str = "—";

/// Tag used when the model's reply could not be interpreted.
pub const FALLBACK_VIZ_TAG: &str = "generic";

/// Narrative text used for a degraded response when the model returned nothing.
pub const PARSE_ERROR_MARKER: &str = "Parse error";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(
        default,
        alias = "preferImageSource",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefer_image_source: Option<String>,
}

impl ExplainRequest {
    pub fn new(concept: impl Into<String>, prefer_image_source: Option<String>) -> Self {
        Self {
            concept: Some(concept.into()),
            prefer_image_source,
        }
    }
}

/// Structured explanation as produced by the model (or synthesized from a
/// reply that could not be parsed).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExplainResponse {
    #[serde(default = "placeholder", deserialize_with = "narrative")]
    pub beginner: String,
    #[serde(default = "placeholder", deserialize_with = "narrative")]
    pub intermediate: String,
    #[serde(default = "placeholder", deserialize_with = "narrative")]
    pub advanced: String,
    #[serde(default = "placeholder", deserialize_with = "narrative")]
    pub applications: String,
    #[serde(default, deserialize_with = "visualization")]
    pub visualization: Visualization,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Set only on responses synthesized from an unparseable reply.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

impl ExplainResponse {
    /// Every narrative field carries the raw reply so nothing the model said
    /// is lost, while the shape stays intact for the client.
    pub fn degraded(raw: &str) -> Self {
        let text = if raw.trim().is_empty() {
            PARSE_ERROR_MARKER.to_string()
        } else {
            raw.to_string()
        };
        Self {
            beginner: text.clone(),
            intermediate: text.clone(),
            advanced: text.clone(),
            applications: text,
            visualization: Visualization::fallback(),
            image_url: None,
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Visualization {
    #[serde(rename = "type", default = "fallback_tag")]
    pub viz_type: String,
}

impl Visualization {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { viz_type: tag.into() }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_VIZ_TAG)
    }
}

impl Default for Visualization {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Explanation produced by the service for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    /// The model's JSON object, byte-for-byte in field order.
    Model(Value),
    /// Synthesized because the model's reply could not be used.
    Degraded(ExplainResponse),
}

impl Explanation {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Explanation::Degraded(_))
    }
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

fn fallback_tag() -> String {
    FALLBACK_VIZ_TAG.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

// Models regularly answer `applications` with a list; a list of strings is
// joined one item per line, null falls back to the placeholder.
#[derive(Deserialize)]
#[serde(untagged)]
enum NarrativeRepr {
    Text(String),
    Lines(Vec<String>),
    Null(()),
}

fn narrative<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NarrativeRepr::deserialize(deserializer)? {
        NarrativeRepr::Text(text) => text,
        NarrativeRepr::Lines(lines) => lines.join("\n"),
        NarrativeRepr::Null(()) => placeholder(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VisualizationRepr {
    Object(Visualization),
    Tag(String),
    Null(()),
}

fn visualization<'de, D>(deserializer: D) -> Result<Visualization, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match VisualizationRepr::deserialize(deserializer)? {
        VisualizationRepr::Object(viz) => viz,
        VisualizationRepr::Tag(tag) => Visualization::new(tag),
        VisualizationRepr::Null(()) => Visualization::fallback(),
    })
}
