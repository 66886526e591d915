use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let parsed: ConsoleConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.model.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.model.model, DEFAULT_MODEL);
        assert_eq!(parsed.model.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(parsed.model.timeout_ms, None);
    }

    #[test]
    fn model_section_overrides_defaults() {
        let input = r#"
[model]
base_url = "http://127.0.0.1:8080"
model = "gemini-2.5-pro"
timeout_ms = 45000
"#;
        let parsed: ConsoleConfig = toml::from_str(input).unwrap();
        assert_eq!(parsed.model.base_url, "http://127.0.0.1:8080");
        assert_eq!(parsed.model.model, "gemini-2.5-pro");
        assert_eq!(parsed.model.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(parsed.model.timeout_ms, Some(45000));
    }
}
