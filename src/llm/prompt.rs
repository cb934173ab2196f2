use std::path::Path;

use tracing::{debug, warn};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are AstroLens, an astrophysics and space explainer. \
Respond with a single JSON object only (no markdown, no commentary) with keys: \
beginner, intermediate, advanced, applications, \
visualization (object with {type}, where type is one of orbit, wave, lifecycle, generic), \
and optionally image_url. \
Every value except visualization and image_url is a plain string.";

const FALLBACK_PROMPT_PATH: &str = "prompts/system.txt";

/// Reads the system prompt from `path`, then `prompts/system.txt`, then
/// falls back to the built-in prompt.
pub fn load_system_prompt(path: Option<&Path>) -> String {
    if let Some(path) = path {
        match std::fs::read_to_string(path) {
            Ok(prompt) if !prompt.trim().is_empty() => return prompt,
            Ok(_) => warn!(path = %path.display(), "system prompt file is empty, ignoring"),
            Err(err) => warn!(path = %path.display(), error = %err, "cannot read system prompt"),
        }
    }
    match std::fs::read_to_string(FALLBACK_PROMPT_PATH) {
        Ok(prompt) if !prompt.trim().is_empty() => {
            debug!(path = FALLBACK_PROMPT_PATH, "using system prompt from file");
            prompt
        }
        _ => DEFAULT_SYSTEM_PROMPT.to_string(),
    }
}

pub fn build_user_prompt(concept: &str, prefer_image_source: Option<&str>) -> String {
    match prefer_image_source {
        Some(source) => format!("Explain the concept: {concept}. Prefer image source: {source}"),
        None => format!("Explain the concept: {concept}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_user_prompt_embeds_concept_literally() {
        let prompt = build_user_prompt("Roche limit", Some("NASA"));
        assert_eq!(prompt, "Explain the concept: Roche limit. Prefer image source: NASA");
        assert_eq!(build_user_prompt("Roche limit", None), "Explain the concept: Roche limit.");
    }

    #[test]
    fn test_default_prompt_names_all_keys() {
        for key in ["beginner", "intermediate", "advanced", "applications", "visualization", "image_url"] {
            assert!(DEFAULT_SYSTEM_PROMPT.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_prompt_file_overrides_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Answer like a planetarium guide.").unwrap();
        assert_eq!(load_system_prompt(Some(file.path())), "Answer like a planetarium guide.");
    }

    #[test]
    fn test_missing_prompt_file_falls_back() {
        let prompt = load_system_prompt(Some(Path::new("/nonexistent/astrolens/prompt.txt")));
        assert!(!prompt.is_empty());
    }
}
