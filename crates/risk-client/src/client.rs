use protocol::{AnalysisResult, RouteInput};
use uuid::Uuid;

use crate::clean::strip_code_fence;
use crate::error::RiskError;
use crate::prompt::{build_prompt, system_instruction};
use crate::schema::response_schema;
use crate::transport::{GenerateRequest, ModelTransport};

#[derive(Debug, Clone)]
pub struct RiskClientSettings {
    pub api_key: Option<String>,
    pub model: String,
}

impl RiskClientSettings {
    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Turns a submitted route into one model call and parses the verdict.
/// Holds no per-request state; every `analyze` call is independent.
pub struct RouteRiskClient<T> {
    settings: RiskClientSettings,
    transport: T,
}

impl<T: ModelTransport> RouteRiskClient<T> {
    pub fn new(settings: RiskClientSettings, transport: T) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub async fn analyze(&self, input: &RouteInput) -> Result<AnalysisResult, RiskError> {
        let api_key = self.settings.credential().ok_or(RiskError::Configuration)?;
        input.validate()?;

        let analysis_id = Uuid::new_v4();
        tracing::info!(
            analysis_id = %analysis_id,
            route = %input.route_label(),
            mode = %input.transport_mode,
            role = %input.user_role,
            model = %self.settings.model,
            "route analysis start"
        );
        let request = GenerateRequest {
            api_key: api_key.to_string(),
            model: self.settings.model.clone(),
            system_instruction: system_instruction(),
            prompt: build_prompt(input),
            response_schema: response_schema(),
        };
        let raw = match self.transport.generate(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(analysis_id = %analysis_id, error = %err, "route analysis failed");
                return Err(err);
            }
        };
        let result = parse_analysis(&raw).map_err(|err| {
            tracing::warn!(
                analysis_id = %analysis_id,
                error = %err,
                raw_len = raw.len(),
                "model response rejected"
            );
            err
        })?;
        tracing::info!(
            analysis_id = %analysis_id,
            risk_score = result.risk_score,
            risk_level = %result.risk_level,
            alternatives = result.alternatives.len(),
            "route analysis complete"
        );
        Ok(result)
    }
}

/// Parses model text into a result. Accepts whatever the document says as
/// long as every field is present and typed correctly.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, RiskError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned)
        .map_err(|err| RiskError::upstream(format!("response does not match schema: {err}")))
}
