//! Runtime configuration for the explain service and the terminal client.

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/ask";

/// Parameters of the outbound completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 5000, where the page expects the API)
    pub port: u16,

    /// CORS allowed origins; empty means any origin
    pub cors_origins: Vec<String>,

    pub completion: CompletionConfig,

    /// Overrides the built-in system prompt when set
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            completion: CompletionConfig::default(),
            system_prompt_path: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the terminal explainer.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub endpoint: String,
    pub image_source: Option<String>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub output: PathBuf,
    pub window: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            image_source: None,
            canvas_width: 640,
            canvas_height: 360,
            output: PathBuf::from("astrolens.png"),
            window: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.completion.model, "gpt-4o-mini");
    }

    #[test]
    fn test_socket_addr() {
        let config = ServiceConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_ui_defaults_point_at_local_service() {
        let config = UiConfig::default();
        assert_eq!(config.endpoint, "http://localhost:5000/api/ask");
        assert!(!config.window);
    }
}
