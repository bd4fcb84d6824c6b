use crate::metrics::MetricsBundle;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BASE_CREDIT_SCORE: i32 = 750;
pub const MIN_CREDIT_SCORE: i32 = 300;

const RISK_MARGIN_FLOOR: Decimal = dec!(0.05);
const RISK_DEBT_CEILING: Decimal = dec!(0.6);

const CREDIT_MARGIN_FLOOR: Decimal = dec!(0.1);
const CREDIT_DEBT_CEILING: Decimal = dec!(0.5);
const MARGIN_PENALTY: i32 = 50;
const DEBT_PENALTY: i32 = 100;
const LIQUIDITY_PENALTY: i32 = 100;

const BAND_MEDIUM_DEBT: Decimal = dec!(0.3);
const BAND_HIGH_DEBT: Decimal = dec!(0.6);

/// Severity ladder. Ordering follows severity so `max` escalates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "Low profit margin")]
    LowProfitMargin,
    #[serde(rename = "High debt exposure")]
    HighDebtExposure,
    #[serde(rename = "Negative working capital")]
    NegativeWorkingCapital,
}

impl RiskFactor {
    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::LowProfitMargin => "Low profit margin",
            RiskFactor::HighDebtExposure => "High debt exposure",
            RiskFactor::NegativeWorkingCapital => "Negative working capital",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Triggered rules in evaluation order.
    pub reasons: Vec<RiskFactor>,
}

impl RiskAssessment {
    fn escalate(&mut self, level: RiskLevel, reason: RiskFactor) {
        self.risk_level = self.risk_level.max(level);
        self.reasons.push(reason);
    }
}

pub fn assess_risk(metrics: &MetricsBundle) -> RiskAssessment {
    let mut assessment = RiskAssessment::default();

    if metrics.profit_margin < RISK_MARGIN_FLOOR {
        assessment.escalate(RiskLevel::Medium, RiskFactor::LowProfitMargin);
    }

    if metrics.debt_to_revenue > RISK_DEBT_CEILING {
        assessment.escalate(RiskLevel::High, RiskFactor::HighDebtExposure);
    }

    if metrics.working_capital < Decimal::ZERO {
        assessment.escalate(RiskLevel::High, RiskFactor::NegativeWorkingCapital);
    }

    debug!(
        "Risk assessed as {} ({} rules fired)",
        assessment.risk_level,
        assessment.reasons.len()
    );
    assessment
}

/// Rule-based credit score in `[300, 750]`. Deductions are independent.
pub fn credit_score(metrics: &MetricsBundle) -> i32 {
    let mut score = BASE_CREDIT_SCORE;

    if metrics.profit_margin < CREDIT_MARGIN_FLOOR {
        score -= MARGIN_PENALTY;
    }
    if metrics.debt_to_revenue > CREDIT_DEBT_CEILING {
        score -= DEBT_PENALTY;
    }
    if metrics.working_capital < Decimal::ZERO {
        score -= LIQUIDITY_PENALTY;
    }

    score.max(MIN_CREDIT_SCORE)
}

/// Lender-facing risk band driven by leverage alone.
pub fn credit_risk_band(metrics: &MetricsBundle) -> RiskLevel {
    if metrics.debt_to_revenue > BAND_HIGH_DEBT {
        RiskLevel::High
    } else if metrics.debt_to_revenue > BAND_MEDIUM_DEBT {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
