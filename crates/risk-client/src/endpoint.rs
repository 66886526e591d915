use reqwest::Url;

use crate::error::RiskError;

/// Resolves `{base}/v1beta/models/{model}:generateContent`. A path prefix on
/// the base (a proxy mount point, say) is preserved.
pub fn generate_content_url(base_url: &str, model: &str) -> Result<Url, RiskError> {
    let model = model.trim();
    if model.is_empty() {
        return Err(RiskError::upstream("model name is empty"));
    }
    let mut url = Url::parse(base_url.trim())
        .map_err(|err| RiskError::upstream(format!("invalid base url {base_url:?}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RiskError::upstream(format!(
            "unsupported base url scheme {}",
            url.scheme()
        )));
    }
    let mount = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{mount}/v1beta/models/{model}:generateContent"));
    url.set_query(None);
    Ok(url)
}
