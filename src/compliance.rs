use crate::risk::RiskLevel;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Flat GST baseline applied to revenue to approximate the expected liability.
pub const GST_BASELINE_RATE: Decimal = dec!(0.18);

const COMPLIANT_SHARE: Decimal = dec!(0.9);
const PARTIAL_SHARE: Decimal = dec!(0.7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Compliant,
    #[serde(rename = "Partially Compliant")]
    PartiallyCompliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub status: ComplianceStatus,
    pub risk: RiskLevel,
    pub note: String,
}

impl ComplianceAssessment {
    fn new(status: ComplianceStatus, risk: RiskLevel, note: &str) -> Self {
        Self {
            status,
            risk,
            note: note.to_string(),
        }
    }
}

/// Compares GST actually paid against 18% of revenue.
///
/// With zero revenue the expected tax is zero, so any non-negative payment
/// classifies as compliant.
pub fn assess_compliance(revenue: Decimal, tax_paid: Decimal) -> ComplianceAssessment {
    let expected_tax = revenue.saturating_mul(GST_BASELINE_RATE);
    debug!("Expected GST {} against {} paid", expected_tax, tax_paid);

    if tax_paid >= expected_tax.saturating_mul(COMPLIANT_SHARE) {
        return ComplianceAssessment::new(
            ComplianceStatus::Compliant,
            RiskLevel::Low,
            "Tax payments align with reported revenue",
        );
    }

    if tax_paid >= expected_tax.saturating_mul(PARTIAL_SHARE) {
        return ComplianceAssessment::new(
            ComplianceStatus::PartiallyCompliant,
            RiskLevel::Medium,
            "Possible under-reporting of GST",
        );
    }

    ComplianceAssessment::new(
        ComplianceStatus::NonCompliant,
        RiskLevel::High,
        "Significant mismatch between revenue and GST paid",
    )
}
