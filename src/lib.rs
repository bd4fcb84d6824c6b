//! # SME Financial Health
//!
//! A library for turning uploaded SME financial records into health metrics,
//! rule-based assessments and, optionally, an LLM-written narrative.
//!
//! ## Core Concepts
//!
//! - **Normalization**: Arbitrary spreadsheet rows are resolved to a canonical [`FinancialRecord`]
//!   before any rule sees them
//! - **Metrics**: A fixed [`MetricsBundle`] (revenue, expenses, profit, margin, working capital,
//!   debt-to-revenue) reduced from the full record set
//! - **Assessments**: Independent rule engines over the bundle (risk, credit score, compliance,
//!   benchmarking, working-capital advice) plus a simple revenue forecast
//! - **Degradation**: Insufficient input yields placeholders or empty results, never errors;
//!   zero denominators resolve to 0
//! - **Narration**: Pre-computed metrics formatted into prompts for an external text generator,
//!   with a fixed fallback sentence on any failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use sme_financial_health::*;
//! use serde_json::json;
//!
//! let rows: Vec<RawRow> = vec![
//!     serde_json::from_value(json!({
//!         "Record Date": "2024-01-31",
//!         "Revenue": 120000,
//!         "Expenses": 95000,
//!         "Tax Paid": 21600,
//!     }))
//!     .unwrap(),
//! ];
//!
//! let records = normalize(&rows).unwrap();
//! let analyzer = HealthAnalyzer::new(BenchmarkTable::builtin());
//! let outcome = analyzer.analyze(&records, "retail");
//! let report = ReportAssembler::analysis_report(42, &outcome).unwrap();
//! ```

pub mod benchmarking;
pub mod bookkeeping;
pub mod compliance;
pub mod config;
pub mod error;
pub mod forecasting;
pub mod ingestion;
pub mod llm;
pub mod metrics;
pub mod report;
pub mod risk;
pub mod schema;
pub mod utils;
pub mod working_capital;

pub use benchmarking::{BenchmarkComparison, BenchmarkStanding, BenchmarkTable};
pub use bookkeeping::{
    categorize_expense, detect_duplicates, reconcile, LedgerEntry, ReconciliationSummary,
};
pub use compliance::{assess_compliance, ComplianceAssessment, ComplianceStatus};
pub use config::NarrationConfig;
pub use error::{HealthError, Result};
pub use forecasting::{forecast_revenue, ForecastPoint, RevenueForecast, DEFAULT_FORECAST_MONTHS};
pub use ingestion::{normalize, normalize_with_source};
pub use llm::{Language, Narrative, Narrator, TextGenerator};
pub use metrics::{compute_metrics, total_tax_paid, MetricsBundle};
pub use report::{Report, ReportAssembler, ReportType};
pub use risk::{assess_risk, credit_risk_band, credit_score, RiskAssessment, RiskFactor, RiskLevel};
pub use schema::*;
pub use utils::{format_currency, round_money, round_ratio, safe_ratio};
pub use working_capital::{advise_working_capital, AdviceTopic, WorkingCapitalAdvice};

use log::info;
use serde::Serialize;

/// Everything the deterministic pipeline derives for one business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub metrics: MetricsBundle,
    pub risk: RiskAssessment,
    pub credit_score: i32,
    pub credit_risk_band: RiskLevel,
    pub benchmark: BenchmarkComparison,
    pub working_capital_suggestions: WorkingCapitalAdvice,
}

/// Runs the metrics-and-assessment pipeline against an injected benchmark
/// table. Stateless apart from the table; safe to share across threads.
pub struct HealthAnalyzer {
    benchmarks: BenchmarkTable,
}

impl HealthAnalyzer {
    pub fn new(benchmarks: BenchmarkTable) -> Self {
        Self { benchmarks }
    }

    pub fn benchmarks(&self) -> &BenchmarkTable {
        &self.benchmarks
    }

    pub fn analyze(&self, records: &[FinancialRecord], industry: &str) -> AnalysisOutcome {
        info!(
            "Analyzing {} financial records (industry: '{}')",
            records.len(),
            industry
        );

        let metrics = compute_metrics(records);

        AnalysisOutcome {
            risk: assess_risk(&metrics),
            credit_score: credit_score(&metrics),
            credit_risk_band: credit_risk_band(&metrics),
            benchmark: self.benchmarks.compare(&metrics, industry),
            working_capital_suggestions: advise_working_capital(&metrics),
            metrics,
        }
    }

    pub fn assess_compliance(&self, records: &[FinancialRecord]) -> ComplianceAssessment {
        let metrics = compute_metrics(records);
        assess_compliance(metrics.total_revenue, total_tax_paid(records))
    }

    /// Forecasts from records in any order; a date-sorted copy is used.
    pub fn forecast(&self, records: &[FinancialRecord], months: u32) -> RevenueForecast {
        let mut ordered = records.to_vec();
        ordered.sort_by_key(|record| record.record_date);
        forecast_revenue(&ordered, months)
    }
}

impl Default for HealthAnalyzer {
    fn default() -> Self {
        Self::new(BenchmarkTable::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(month: u32, revenue: Decimal, expenses: Decimal) -> FinancialRecord {
        FinancialRecord {
            revenue,
            expenses,
            ..FinancialRecord::empty(NaiveDate::from_ymd_opt(2024, month, 1).unwrap())
        }
    }

    #[test]
    fn test_empty_history_analysis() {
        let analyzer = HealthAnalyzer::new(BenchmarkTable::default());
        let outcome = analyzer.analyze(&[], "");

        assert_eq!(outcome.metrics, MetricsBundle::default());
        // Zero margin trips the margin rules even with no data.
        assert_eq!(outcome.risk.risk_level, RiskLevel::Medium);
        assert_eq!(outcome.credit_score, 700);
        assert_eq!(outcome.benchmark, BenchmarkComparison::Unavailable);
        assert_eq!(
            outcome.working_capital_suggestions.keys().copied().collect::<Vec<_>>(),
            vec![AdviceTopic::Margin]
        );
    }

    #[test]
    fn test_default_analyzer_uses_bundled_benchmarks() {
        let analyzer = HealthAnalyzer::default();
        assert!(analyzer.benchmarks().industry("retail").is_some());
        assert!(analyzer
            .analyze(&[record(1, dec!(100), dec!(50))], "Retail")
            .benchmark
            .is_available());

        let bare = HealthAnalyzer::new(BenchmarkTable::default());
        assert!(bare.benchmarks().is_empty());
    }

    #[test]
    fn test_forecast_sorts_by_date() {
        let analyzer = HealthAnalyzer::default();
        let shuffled = vec![
            record(4, dec!(130), dec!(0)),
            record(1, dec!(100), dec!(0)),
            record(3, dec!(120), dec!(0)),
            record(2, dec!(110), dec!(0)),
        ];

        let forecast = analyzer.forecast(&shuffled, 2);
        assert_eq!(forecast.get("month_1"), Some(dec!(120)));
        assert_eq!(forecast.get("month_2"), Some(dec!(122.4)));
    }

    #[test]
    fn test_compliance_uses_tax_totals() {
        let mut a = record(1, dec!(60000), dec!(0));
        a.tax_paid = dec!(6000);
        let mut b = record(2, dec!(40000), dec!(0));
        b.tax_paid = dec!(6600);

        let analyzer = HealthAnalyzer::default();
        let result = analyzer.assess_compliance(&[a, b]);
        assert_eq!(result.status, ComplianceStatus::PartiallyCompliant);
    }
}
