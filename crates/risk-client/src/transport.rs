use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::RiskError;
use crate::endpoint::generate_content_url;
use crate::schema::RESPONSE_MIME_TYPE;

const USER_AGENT: &str = "logirisk-console";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Everything one generateContent call needs.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub api_key: String,
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    pub response_schema: Value,
}

/// Sends one request to the generative model and returns the raw text of
/// its answer.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, RiskError>;
}

#[async_trait]
impl<T: ModelTransport + ?Sized> ModelTransport for Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, RiskError> {
        (**self).generate(request).await
    }
}

pub struct GeminiTransport {
    base_url: String,
    timeout: Option<Duration>,
    http_client: Client,
}

impl GeminiTransport {
    pub fn new(base_url: impl Into<String>, timeout_ms: Option<u64>) -> Self {
        let http_client = match build_http_client() {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(error = %err, "reqwest build failed, falling back to default client");
                Client::new()
            }
        };
        Self {
            base_url: base_url.into(),
            timeout: timeout_ms.map(Duration::from_millis),
            http_client,
        }
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, RiskError> {
        let url = generate_content_url(&self.base_url, &request.model)?;
        let body = request_body(request);
        tracing::debug!(
            url = %url,
            model = %request.model,
            api_key_len = request.api_key.len(),
            prompt_len = request.prompt.len(),
            "generate request start"
        );

        let mut builder = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &request.api_key)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(
                is_timeout = err.is_timeout(),
                is_connect = err.is_connect(),
                error = %err,
                "generate request failed"
            );
            RiskError::upstream(format!("request failed: {err}"))
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RiskError::upstream(format!("read body failed: {err}")))?;
        tracing::info!(
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            body_len = text.len(),
            "generate response"
        );
        if !status.is_success() {
            let preview: String = text.chars().take(512).collect();
            return Err(RiskError::upstream(format!(
                "model request failed status={status} body={preview}"
            )));
        }
        extract_candidate_text(&text)
    }
}

fn request_body(request: &GenerateRequest) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": request.system_instruction }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "generationConfig": {
            "responseMimeType": RESPONSE_MIME_TYPE,
            "responseSchema": request.response_schema,
        }
    })
}

/// Concatenates the text parts of the first candidate.
pub fn extract_candidate_text(body: &str) -> Result<String, RiskError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| RiskError::upstream(format!("response is not json: {err}")))?;
    let text: String = value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = value
            .pointer("/promptFeedback/blockReason")
            .or_else(|| value.pointer("/candidates/0/finishReason"))
            .and_then(Value::as_str)
            .unwrap_or("none");
        return Err(RiskError::upstream(format!(
            "no response from model (reason={reason})"
        )));
    }
    Ok(text)
}

fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().redirect(Policy::none()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<(String, Option<String>, Value)>>>);

    async fn fake_generate(
        Path(target): Path<String>,
        State(recorded): State<Recorded>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        recorded
            .0
            .lock()
            .unwrap()
            .push((target, key.clone(), body));
        if key.as_deref() != Some("test-key") {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": { "message": "API key not valid" } })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "```json\n{\"riskScore\":" }, { "text": " 5}\n```" }]
                    },
                    "finishReason": "STOP"
                }]
            })),
        )
    }

    async fn spawn_fake_model() -> (String, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/v1beta/models/:target", post(fake_generate))
            .with_state(recorded.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), recorded)
    }

    fn request(api_key: &str) -> GenerateRequest {
        GenerateRequest {
            api_key: api_key.to_string(),
            model: "gemini-test".to_string(),
            system_instruction: "be precise".to_string(),
            prompt: "Analyze the following shipping route".to_string(),
            response_schema: json!({ "type": "OBJECT" }),
        }
    }

    #[tokio::test]
    async fn posts_generate_content_and_joins_parts() {
        let (base_url, recorded) = spawn_fake_model().await;
        let transport = GeminiTransport::new(format!("{base_url}/"), Some(5_000));
        let text = transport.generate(&request("test-key")).await.unwrap();
        assert_eq!(text, "```json\n{\"riskScore\": 5}\n```");

        let calls = recorded.0.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (target, key, body) = &calls[0];
        assert_eq!(target, "gemini-test:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be precise");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Analyze the following shipping route"
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let (base_url, _recorded) = spawn_fake_model().await;
        let transport = GeminiTransport::new(base_url, None);
        let err = transport.generate(&request("wrong-key")).await.unwrap_err();
        match err {
            RiskError::Upstream(message) => assert!(message.contains("403")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = GeminiTransport::new(format!("http://{addr}"), Some(2_000));
        let err = transport.generate(&request("test-key")).await.unwrap_err();
        assert!(matches!(err, RiskError::Upstream(_)));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = extract_candidate_text(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn html_error_page_is_not_json() {
        let err = extract_candidate_text("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, RiskError::Upstream(_)));
    }
}
