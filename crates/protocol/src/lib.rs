use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub mod config;

const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportMode {
    #[serde(rename = "Sea Freight")]
    Sea,
    #[serde(rename = "Air Freight")]
    Air,
    #[serde(rename = "Land/Rail")]
    Land,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Sea => "Sea Freight",
            TransportMode::Air => "Air Freight",
            TransportMode::Land => "Land/Rail",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "Importer/Exporter")]
    ImporterExporter,
    #[serde(rename = "Logistics Manager")]
    LogisticsManager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::ImporterExporter => "Importer/Exporter",
            UserRole::LogisticsManager => "Logistics Manager",
        }
    }

    /// Language register the model is asked to use for this persona.
    pub fn tone(&self) -> &'static str {
        match self {
            UserRole::ImporterExporter => "Simple, clear, business-focused.",
            UserRole::LogisticsManager => "Technical, detailed, scenario-based.",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl RiskTrend {
    pub const ALL: [RiskTrend; 3] = [
        RiskTrend::Increasing,
        RiskTrend::Stable,
        RiskTrend::Decreasing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTrend::Increasing => "Increasing",
            RiskTrend::Stable => "Stable",
            RiskTrend::Decreasing => "Decreasing",
        }
    }
}

impl fmt::Display for RiskTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Route fields submitted from the form. Never mutated after submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteInput {
    pub origin_country: String,
    pub origin_port: String,
    pub dest_country: String,
    pub dest_port: String,
    pub transport_mode: TransportMode,
    pub cargo_type: String,
    pub shipment_date: String,
    pub user_role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidField {}

impl RouteInput {
    /// Checks the fields the form marks as required. Reports the first
    /// offending field by its wire name.
    pub fn validate(&self) -> Result<(), InvalidField> {
        let required = [
            ("originCountry", &self.origin_country),
            ("originPort", &self.origin_port),
            ("destCountry", &self.dest_country),
            ("destPort", &self.dest_port),
            ("cargoType", &self.cargo_type),
            ("shipmentDate", &self.shipment_date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(InvalidField {
                    field,
                    reason: "must not be empty",
                });
            }
        }
        if !iso_date_regex().is_match(self.shipment_date.trim()) {
            return Err(InvalidField {
                field: "shipmentDate",
                reason: "must be an ISO date (YYYY-MM-DD)",
            });
        }
        Ok(())
    }

    pub fn route_label(&self) -> String {
        format!(
            "{} ({}) -> {} ({})",
            self.origin_country, self.origin_port, self.dest_country, self.dest_port
        )
    }
}

fn iso_date_regex() -> &'static Regex {
    static ISO_DATE: OnceLock<Regex> = OnceLock::new();
    ISO_DATE.get_or_init(|| Regex::new(ISO_DATE_PATTERN).expect("iso date pattern"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRoute {
    pub name: String,
    pub cost_impact: String,
    pub time_impact: String,
    pub risk_level: RiskLevel,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedOption {
    pub name: String,
    pub reason: String,
}

/// Model verdict for one route. Built only by deserializing the model's
/// JSON document; ranges and cardinalities are taken as delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub risk_score: i64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub delay_probability: i64,
    pub risk_trend: RiskTrend,
    pub alternatives: Vec<AlternativeRoute>,
    pub recommended_option: RecommendedOption,
    pub actionable_insights: Vec<String>,
    pub plain_language_explanation: String,
    pub executive_summary: String,
}
