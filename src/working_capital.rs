use crate::metrics::MetricsBundle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEBT_CEILING: Decimal = dec!(0.5);
const MARGIN_FLOOR: Decimal = dec!(0.1);

const LIQUIDITY_ADVICE: &str = "Working capital is negative. Focus on faster collections \
     and negotiate longer payment terms with suppliers.";
const DEBT_ADVICE: &str = "High debt burden detected. Avoid new loans and prioritize \
     repayment of high-interest credit.";
const MARGIN_ADVICE: &str = "Low profit margin. Review operating expenses and supplier contracts.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceTopic {
    Liquidity,
    Debt,
    Margin,
}

/// Advice keyed by topic; only triggered topics are present.
pub type WorkingCapitalAdvice = BTreeMap<AdviceTopic, String>;

pub fn advise_working_capital(metrics: &MetricsBundle) -> WorkingCapitalAdvice {
    let mut suggestions = WorkingCapitalAdvice::new();

    if metrics.working_capital < Decimal::ZERO {
        suggestions.insert(AdviceTopic::Liquidity, LIQUIDITY_ADVICE.to_string());
    }

    if metrics.debt_to_revenue > DEBT_CEILING {
        suggestions.insert(AdviceTopic::Debt, DEBT_ADVICE.to_string());
    }

    if metrics.profit_margin < MARGIN_FLOOR {
        suggestions.insert(AdviceTopic::Margin, MARGIN_ADVICE.to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(margin: Decimal, debt: Decimal, working_capital: Decimal) -> MetricsBundle {
        MetricsBundle {
            profit_margin: margin,
            debt_to_revenue: debt,
            working_capital,
            ..MetricsBundle::default()
        }
    }

    #[test]
    fn test_healthy_metrics_get_no_advice() {
        assert!(advise_working_capital(&bundle(dec!(0.1), dec!(0.5), dec!(0))).is_empty());
    }

    #[test]
    fn test_each_topic_fires_independently() {
        let advice = advise_working_capital(&bundle(dec!(0.2), dec!(0.2), dec!(-1)));
        assert_eq!(advice.keys().copied().collect::<Vec<_>>(), vec![AdviceTopic::Liquidity]);

        let advice = advise_working_capital(&bundle(dec!(0.2), dec!(0.51), dec!(1)));
        assert_eq!(advice.keys().copied().collect::<Vec<_>>(), vec![AdviceTopic::Debt]);

        let advice = advise_working_capital(&bundle(dec!(0.09), dec!(0.2), dec!(1)));
        assert_eq!(advice.keys().copied().collect::<Vec<_>>(), vec![AdviceTopic::Margin]);
    }

    #[test]
    fn test_all_topics_serialize_by_name() {
        let advice = advise_working_capital(&bundle(dec!(-0.3), dec!(1.2), dec!(-500)));
        assert_eq!(advice.len(), 3);

        let json = serde_json::to_value(&advice).unwrap();
        assert!(json["liquidity"].as_str().unwrap().starts_with("Working capital is negative."));
        assert!(json["debt"].as_str().unwrap().starts_with("High debt burden detected."));
        assert_eq!(
            json["margin"],
            "Low profit margin. Review operating expenses and supplier contracts."
        );
    }
}
