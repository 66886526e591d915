use protocol::{RiskLevel, RiskTrend};
use serde_json::{json, Value};

pub const RESPONSE_MIME_TYPE: &str = "application/json";

pub const REQUIRED_FIELDS: [&str; 10] = [
    "riskScore",
    "riskLevel",
    "riskFactors",
    "delayProbability",
    "riskTrend",
    "alternatives",
    "recommendedOption",
    "actionableInsights",
    "plainLanguageExplanation",
    "executiveSummary",
];

/// `responseSchema` for generateContent, in the OpenAPI subset the model
/// accepts. Mirrors `protocol::AnalysisResult` field for field.
pub fn response_schema() -> Value {
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(RiskLevel::as_str).collect();
    let trends: Vec<&str> = RiskTrend::ALL.iter().map(RiskTrend::as_str).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "riskScore": { "type": "INTEGER", "description": "Risk score from 1 to 10" },
            "riskLevel": { "type": "STRING", "enum": levels },
            "riskFactors": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 3,
                "maxItems": 5,
                "description": "List of 3-5 key risk factors"
            },
            "delayProbability": { "type": "INTEGER", "description": "Probability percentage 0-100" },
            "riskTrend": { "type": "STRING", "enum": trends },
            "alternatives": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "costImpact": { "type": "STRING", "description": "e.g. '+15%' or 'Lower'" },
                        "timeImpact": { "type": "STRING", "description": "e.g. '+2 days' or 'Faster'" },
                        "riskLevel": { "type": "STRING", "enum": levels },
                        "description": { "type": "STRING" }
                    },
                    "required": ["name", "costImpact", "timeImpact", "riskLevel", "description"]
                },
                "minItems": 3,
                "maxItems": 3,
                "description": "3 alternative routes or strategies"
            },
            "recommendedOption": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "reason": { "type": "STRING" }
                },
                "required": ["name", "reason"]
            },
            "actionableInsights": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 3,
                "maxItems": 4,
                "description": "3-4 specific actions the user should take"
            },
            "plainLanguageExplanation": { "type": "STRING", "description": "Role-adapted explanation" },
            "executiveSummary": { "type": "STRING", "description": "Brief high-level summary" }
        },
        "required": REQUIRED_FIELDS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_property_is_required() {
        let schema = response_schema();
        let properties = schema["properties"].as_object().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        assert_eq!(properties.len(), REQUIRED_FIELDS.len());
        for field in REQUIRED_FIELDS {
            assert!(properties.contains_key(field), "schema missing {field}");
        }
    }

    #[test]
    fn enums_match_wire_strings() {
        let schema = response_schema();
        assert_eq!(
            schema["properties"]["riskLevel"]["enum"],
            json!(["Low", "Medium", "High"])
        );
        assert_eq!(
            schema["properties"]["riskTrend"]["enum"],
            json!(["Increasing", "Stable", "Decreasing"])
        );
        assert_eq!(
            schema["properties"]["alternatives"]["items"]["properties"]["riskLevel"]["enum"],
            json!(["Low", "Medium", "High"])
        );
    }

    #[test]
    fn array_cardinalities_are_declared() {
        let props = &response_schema()["properties"];
        assert_eq!(props["riskFactors"]["minItems"], 3);
        assert_eq!(props["riskFactors"]["maxItems"], 5);
        assert_eq!(props["alternatives"]["minItems"], 3);
        assert_eq!(props["alternatives"]["maxItems"], 3);
        assert_eq!(props["actionableInsights"]["minItems"], 3);
        assert_eq!(props["actionableInsights"]["maxItems"], 4);
    }
}
