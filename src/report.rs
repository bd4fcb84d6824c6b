use crate::benchmarking::BenchmarkComparison;
use crate::compliance::ComplianceAssessment;
use crate::error::Result;
use crate::forecasting::RevenueForecast;
use crate::llm::{Narrative, PromptKind};
use crate::metrics::MetricsBundle;
use crate::risk::{RiskAssessment, RiskLevel};
use crate::working_capital::WorkingCapitalAdvice;
use crate::AnalysisOutcome;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    FinancialHealth,
    Creditworthiness,
    Investor,
    Compliance,
    Analysis,
    Forecast,
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ReportType::FinancialHealth => "financial_health",
            ReportType::Creditworthiness => "creditworthiness",
            ReportType::Investor => "investor",
            ReportType::Compliance => "compliance",
            ReportType::Analysis => "analysis",
            ReportType::Forecast => "forecast",
        };
        f.write_str(tag)
    }
}

impl From<PromptKind> for ReportType {
    fn from(kind: PromptKind) -> Self {
        match kind {
            PromptKind::FinancialHealth => ReportType::FinancialHealth,
            PromptKind::Creditworthiness => ReportType::Creditworthiness,
            PromptKind::Investor => ReportType::Investor,
        }
    }
}

/// Snapshot handed to the persistence layer. Built once per request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub user_id: u64,
    pub report_type: ReportType,
    pub summary: Option<String>,
    pub metrics: Value,
    pub ai_insights: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct AnalysisInsights<'a> {
    risk: &'a RiskAssessment,
    credit_score: i32,
    credit_risk_band: RiskLevel,
    benchmark: &'a BenchmarkComparison,
    working_capital_suggestions: &'a WorkingCapitalAdvice,
}

pub struct ReportAssembler;

impl ReportAssembler {
    pub fn analysis_report(user_id: u64, outcome: &AnalysisOutcome) -> Result<Report> {
        let insights = AnalysisInsights {
            risk: &outcome.risk,
            credit_score: outcome.credit_score,
            credit_risk_band: outcome.credit_risk_band,
            benchmark: &outcome.benchmark,
            working_capital_suggestions: &outcome.working_capital_suggestions,
        };

        Ok(Report {
            user_id,
            report_type: ReportType::Analysis,
            summary: Some("Financial metrics and risk assessment".to_string()),
            metrics: serde_json::to_value(outcome.metrics)?,
            ai_insights: Some(serde_json::to_value(insights)?),
            created_at: Utc::now(),
        })
    }

    pub fn forecast_report(user_id: u64, forecast: &RevenueForecast) -> Result<Report> {
        Ok(Report {
            user_id,
            report_type: ReportType::Forecast,
            summary: Some("Revenue forecast based on historical trends".to_string()),
            metrics: serde_json::to_value(forecast)?,
            ai_insights: None,
            created_at: Utc::now(),
        })
    }

    pub fn compliance_report(
        user_id: u64,
        total_revenue: Decimal,
        total_tax_paid: Decimal,
        assessment: &ComplianceAssessment,
    ) -> Result<Report> {
        Ok(Report {
            user_id,
            report_type: ReportType::Compliance,
            summary: Some("GST compliance check against reported revenue".to_string()),
            metrics: json!({
                "total_revenue": total_revenue.to_f64().unwrap_or_default(),
                "total_tax_paid": total_tax_paid.to_f64().unwrap_or_default(),
            }),
            ai_insights: Some(serde_json::to_value(assessment)?),
            created_at: Utc::now(),
        })
    }

    /// Wraps an LLM narrative under the report type matching the prompt that
    /// produced it. The raw provider payload is not persisted.
    pub fn narrative_report(
        user_id: u64,
        kind: PromptKind,
        metrics: &MetricsBundle,
        narrative: &Narrative,
    ) -> Result<Report> {
        let summary = match kind {
            PromptKind::FinancialHealth => "AI financial health insights",
            PromptKind::Creditworthiness => "AI creditworthiness assessment",
            PromptKind::Investor => "AI investor summary",
        };

        Ok(Report {
            user_id,
            report_type: ReportType::from(kind),
            summary: Some(summary.to_string()),
            metrics: serde_json::to_value(metrics)?,
            ai_insights: Some(json!({ "insights": narrative.text })),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarking::BenchmarkTable;
    use crate::compliance::assess_compliance;
    use crate::llm::FallbackReason;
    use crate::schema::FinancialRecord;
    use crate::HealthAnalyzer;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn records() -> Vec<FinancialRecord> {
        (1..=3)
            .map(|month| FinancialRecord {
                revenue: dec!(1000) * Decimal::from(month),
                expenses: dec!(900),
                loan_obligations: dec!(2000),
                ..FinancialRecord::empty(NaiveDate::from_ymd_opt(2024, month, 28).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_analysis_report_shape() {
        let analyzer = HealthAnalyzer::new(BenchmarkTable::default());
        let outcome = analyzer.analyze(&records(), "retail");
        let report = ReportAssembler::analysis_report(7, &outcome).unwrap();

        assert_eq!(report.user_id, 7);
        assert_eq!(report.report_type, ReportType::Analysis);
        assert_eq!(
            report.summary.as_deref(),
            Some("Financial metrics and risk assessment")
        );
        assert_eq!(report.metrics["total_revenue"], json!(6000.0));

        let insights = report.ai_insights.unwrap();
        assert_eq!(insights["risk"]["risk_level"], "High");
        assert_eq!(insights["credit_score"], 650);
        assert_eq!(insights["benchmark"]["benchmark"], "Industry data not available");
        assert!(insights["working_capital_suggestions"]["debt"].is_string());
    }

    #[test]
    fn test_forecast_report_shape() {
        let forecast = crate::forecasting::forecast_revenue(&records(), 1);
        let report = ReportAssembler::forecast_report(1, &forecast).unwrap();

        assert_eq!(report.report_type, ReportType::Forecast);
        assert_eq!(report.metrics, json!({"month_1": 2000.0}));
        assert!(report.ai_insights.is_none());
    }

    #[test]
    fn test_compliance_report_shape() {
        let assessment = assess_compliance(dec!(100000), dec!(18000));
        let report =
            ReportAssembler::compliance_report(3, dec!(100000), dec!(18000), &assessment).unwrap();

        assert_eq!(report.report_type.to_string(), "compliance");
        assert_eq!(report.metrics["total_tax_paid"], json!(18000.0));
        assert_eq!(report.ai_insights.unwrap()["status"], "Compliant");
    }

    #[test]
    fn test_narrative_reports_only_use_narrative_types() {
        let narrative = Narrative::fallback(FallbackReason::Timeout);
        let cases = [
            (PromptKind::FinancialHealth, ReportType::FinancialHealth, "AI financial health insights"),
            (PromptKind::Creditworthiness, ReportType::Creditworthiness, "AI creditworthiness assessment"),
            (PromptKind::Investor, ReportType::Investor, "AI investor summary"),
        ];

        for (kind, report_type, summary) in cases {
            let report =
                ReportAssembler::narrative_report(1, kind, &MetricsBundle::default(), &narrative)
                    .unwrap();
            assert_eq!(report.report_type, report_type);
            assert_eq!(report.summary.as_deref(), Some(summary));
        }
    }

    #[test]
    fn test_narrative_report_keeps_text_only() {
        let narrative = Narrative {
            text: "Cash flow is tight.".to_string(),
            raw: Some(json!({"id": "gen-1"})),
            fallback: None,
        };
        let report = ReportAssembler::narrative_report(
            9,
            PromptKind::Investor,
            &MetricsBundle::default(),
            &narrative,
        )
        .unwrap();

        assert_eq!(report.ai_insights, Some(json!({"insights": "Cash flow is tight."})));
        assert_eq!(report.summary.as_deref(), Some("AI investor summary"));
        assert_eq!(report.report_type, ReportType::Investor);

        let degraded = Narrative::fallback(FallbackReason::MissingCredential);
        let report = ReportAssembler::narrative_report(
            9,
            PromptKind::FinancialHealth,
            &MetricsBundle::default(),
            &degraded,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(report.report_type).unwrap(),
            json!("financial_health")
        );
    }
}
