mod clean;
mod client;
pub mod dashboard;
mod endpoint;
mod error;
pub mod prompt;
pub mod schema;
pub mod session;
mod transport;

pub use clean::strip_code_fence;
pub use client::{parse_analysis, RiskClientSettings, RouteRiskClient};
pub use error::{RiskError, UPSTREAM_USER_MESSAGE};
pub use transport::{extract_candidate_text, GeminiTransport, GenerateRequest, ModelTransport};
