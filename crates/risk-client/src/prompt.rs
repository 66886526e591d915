use protocol::{RouteInput, UserRole};

pub const RISK_DIMENSIONS: [&str; 5] = [
    "Port congestion",
    "Weather/Seasonality",
    "Customs/Regulatory issues",
    "Geopolitics",
    "Cost volatility",
];

pub fn system_instruction() -> String {
    let mut text = String::from(
        "You are the intelligence engine of a Smart Route & Risk Prediction Platform.\n\
         Your goal is to analyze logistics routes, predict risks, and offer actionable advice.\n\n\
         You must adapt your language complexity based on the User Role:\n",
    );
    for role in [UserRole::ImporterExporter, UserRole::LogisticsManager] {
        text.push_str(&format!("- {}: {}\n", role.as_str(), role.tone()));
    }
    text.push_str("\nAssess risks based on:\n");
    for dimension in RISK_DIMENSIONS {
        text.push_str(&format!("- {dimension}\n"));
    }
    text.push_str("\nProvide a realistic, data-informed simulation.");
    text
}

pub fn build_prompt(input: &RouteInput) -> String {
    format!(
        "Analyze the following shipping route:\n\
         - Origin: {} ({})\n\
         - Destination: {} ({})\n\
         - Mode: {}\n\
         - Cargo: {}\n\
         - Date: {}\n\
         - User Role: {}\n\n\
         Provide the output in strict JSON format matching the schema provided.",
        input.origin_country,
        input.origin_port,
        input.dest_country,
        input.dest_port,
        input.transport_mode,
        input.cargo_type,
        input.shipment_date,
        input.user_role,
    )
}
