use std::fmt::Write as _;

use protocol::{AnalysisResult, RiskLevel, RiskTrend, RouteInput};
use serde::Serialize;

const GAUGE_SCALE: i64 = 10;

pub fn risk_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "#10b981",
        RiskLevel::Medium => "#f59e0b",
        RiskLevel::High => "#ef4444",
    }
}

pub fn trend_arrow(trend: RiskTrend) -> &'static str {
    match trend {
        RiskTrend::Increasing => "↑",
        RiskTrend::Stable => "→",
        RiskTrend::Decreasing => "↓",
    }
}

/// Risk/safety split of the 10-point score. Out-of-range scores are pinned
/// to the gauge ends for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskGauge {
    pub risk: i64,
    pub safety: i64,
}

impl RiskGauge {
    pub fn from_score(score: i64) -> Self {
        let risk = score.clamp(0, GAUGE_SCALE);
        Self {
            risk,
            safety: GAUGE_SCALE - risk,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub route_label: String,
    pub route: RouteInput,
    pub gauge: RiskGauge,
    pub risk_color: &'static str,
    pub trend_arrow: &'static str,
    pub result: AnalysisResult,
}

impl DashboardView {
    pub fn new(route: &RouteInput, result: &AnalysisResult) -> Self {
        Self {
            route_label: route.route_label(),
            route: route.clone(),
            gauge: RiskGauge::from_score(result.risk_score),
            risk_color: risk_color(result.risk_level),
            trend_arrow: trend_arrow(result.risk_trend),
            result: result.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let result = &self.result;
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.route_label);
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            self.route.transport_mode,
            self.route.cargo_type,
            self.route.shipment_date,
            self.route.user_role
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Risk score:        {}/10 ({} Risk) [{}{}]",
            result.risk_score,
            result.risk_level,
            "#".repeat(self.gauge.risk as usize),
            ".".repeat(self.gauge.safety as usize)
        );
        let _ = writeln!(out, "Delay probability: {}%", result.delay_probability);
        let _ = writeln!(out, "Risk trend:        {} {}", self.trend_arrow, result.risk_trend);

        push_paragraph(&mut out, "Executive summary", &result.executive_summary);
        push_paragraph(&mut out, "Explanation", &result.plain_language_explanation);
        push_list(&mut out, "Identified risks", &result.risk_factors);
        push_list(&mut out, "Actionable insights", &result.actionable_insights);

        let _ = writeln!(out);
        let _ = writeln!(out, "Recommended: {}", result.recommended_option.name);
        let _ = writeln!(out, "  {}", result.recommended_option.reason);

        if !result.alternatives.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Alternatives:");
            let name_width = result
                .alternatives
                .iter()
                .map(|alt| alt.name.chars().count())
                .max()
                .unwrap_or(0)
                .max("Strategy".len());
            let _ = writeln!(
                out,
                "  {:<name_width$}  {:<10}  {:<10}  {:<6}",
                "Strategy", "Cost", "Time", "Risk"
            );
            for alt in &result.alternatives {
                let _ = writeln!(
                    out,
                    "  {:<name_width$}  {:<10}  {:<10}  {:<6}",
                    alt.name, alt.cost_impact, alt.time_impact, alt.risk_level
                );
                let _ = writeln!(out, "    {}", alt.description);
            }
        }
        out
    }
}

fn push_paragraph(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}:");
    let _ = writeln!(out, "  {body}");
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{AlternativeRoute, RecommendedOption, TransportMode, UserRole};

    fn route() -> RouteInput {
        RouteInput {
            origin_country: "Brazil".to_string(),
            origin_port: "Santos".to_string(),
            dest_country: "Spain".to_string(),
            dest_port: "Valencia".to_string(),
            transport_mode: TransportMode::Sea,
            cargo_type: "Coffee".to_string(),
            shipment_date: "2025-08-20".to_string(),
            user_role: UserRole::ImporterExporter,
        }
    }

    fn result(score: i64) -> AnalysisResult {
        AnalysisResult {
            risk_score: score,
            risk_level: RiskLevel::Medium,
            risk_factors: vec!["Canal draft limits".to_string(), "Strike notice".to_string()],
            delay_probability: 40,
            risk_trend: RiskTrend::Decreasing,
            alternatives: vec![AlternativeRoute {
                name: "Transship via Algeciras".to_string(),
                cost_impact: "+5%".to_string(),
                time_impact: "+2 days".to_string(),
                risk_level: RiskLevel::Low,
                description: "Hub with spare berth capacity.".to_string(),
            }],
            recommended_option: RecommendedOption {
                name: "Transship via Algeciras".to_string(),
                reason: "Avoids strike window.".to_string(),
            },
            actionable_insights: vec!["Lock in freight rate".to_string()],
            plain_language_explanation: "Some delay is likely.".to_string(),
            executive_summary: "Medium risk, improving.".to_string(),
        }
    }

    #[test]
    fn gauge_splits_ten_points() {
        assert_eq!(RiskGauge::from_score(7), RiskGauge { risk: 7, safety: 3 });
        assert_eq!(RiskGauge::from_score(12), RiskGauge { risk: 10, safety: 0 });
        assert_eq!(RiskGauge::from_score(-1), RiskGauge { risk: 0, safety: 10 });
    }

    #[test]
    fn view_carries_colour_and_trend() {
        let view = DashboardView::new(&route(), &result(5));
        assert_eq!(view.route_label, "Brazil (Santos) -> Spain (Valencia)");
        assert_eq!(view.risk_color, "#f59e0b");
        assert_eq!(view.trend_arrow, "↓");
        assert_eq!(risk_color(RiskLevel::High), "#ef4444");
        assert_eq!(risk_color(RiskLevel::Low), "#10b981");
    }

    #[test]
    fn text_dashboard_lists_every_section() {
        let text = DashboardView::new(&route(), &result(5)).render_text();
        assert!(text.starts_with("Brazil (Santos) -> Spain (Valencia)\n"));
        assert!(text.contains("5/10 (Medium Risk) [#####.....]"));
        assert!(text.contains("Delay probability: 40%"));
        assert!(text.contains("↓ Decreasing"));
        assert!(text.contains("  - Strike notice"));
        assert!(text.contains("  - Lock in freight rate"));
        assert!(text.contains("Recommended: Transship via Algeciras"));
        assert!(text.contains("+2 days"));
        assert!(text.contains("Hub with spare berth capacity."));
    }

    #[test]
    fn score_is_printed_as_delivered() {
        let text = DashboardView::new(&route(), &result(14)).render_text();
        assert!(text.contains("14/10"));
        assert!(text.contains("[##########]"));
    }
}
