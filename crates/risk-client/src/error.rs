use protocol::InvalidField;
use thiserror::Error;

pub const UPSTREAM_USER_MESSAGE: &str = "Failed to analyze route. Please try again.";

#[derive(Debug, Error)]
pub enum RiskError {
    /// No credential configured. Raised before any network activity.
    #[error("API key is missing. Please check your environment configuration.")]
    Configuration,
    #[error("invalid route input: {0}")]
    InvalidInput(#[from] InvalidField),
    /// Transport failure, non-JSON body, or a document that does not match
    /// the result schema.
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl RiskError {
    pub fn upstream(message: impl Into<String>) -> Self {
        RiskError::Upstream(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            RiskError::Configuration => "configuration_error",
            RiskError::InvalidInput(_) => "invalid_input",
            RiskError::Upstream(_) => "upstream_error",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(self, RiskError::Upstream(_))
    }

    /// Message shown to the user. Upstream detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            RiskError::Upstream(_) => UPSTREAM_USER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
