use anyhow::Context;
pub(crate) use protocol::config::ConsoleConfig;
use protocol::config::{ModelConfig, FALLBACK_API_KEY_ENV};
use std::path::Path;

fn validate_console_config(config: &ConsoleConfig) -> anyhow::Result<()> {
    let model = &config.model;
    let base_url = model.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!("model.base_url must start with http:// or https://");
    }
    if model.model.trim().is_empty() {
        anyhow::bail!("model.model must not be empty");
    }
    if model.api_key_env.trim().is_empty() {
        anyhow::bail!("model.api_key_env must name an environment variable");
    }
    if model.timeout_ms == Some(0) {
        anyhow::bail!("model.timeout_ms must be greater than zero");
    }
    Ok(())
}

/// Reads the TOML config. A missing file means "all defaults".
pub(crate) fn load_console_config(path: &Path) -> anyhow::Result<ConsoleConfig> {
    if !path.exists() {
        tracing::warn!(config = %path.display(), "config file not found, using defaults");
        return Ok(ConsoleConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ConsoleConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_console_config(&config)?;
    Ok(config)
}

/// Looks up the credential in the configured variable, then in `API_KEY`.
pub(crate) fn resolve_api_key<F>(model: &ModelConfig, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [model.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
