use crate::error::{HealthError, Result};
use crate::metrics::MetricsBundle;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_BENCHMARKS: &str = include_str!("../data/industry_benchmarks.json");

pub const UNAVAILABLE_MESSAGE: &str = "Industry data not available";

/// Per-industry reference values, keyed by lowercase industry name and then by
/// metric name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    industries: BTreeMap<String, BTreeMap<String, Decimal>>,
}

impl BenchmarkTable {
    pub fn new(industries: BTreeMap<String, BTreeMap<String, Decimal>>) -> Self {
        Self {
            industries: industries
                .into_iter()
                .map(|(industry, row)| (industry_key(&industry), row))
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let industries: BTreeMap<String, BTreeMap<String, Decimal>> = serde_json::from_str(json)
            .map_err(|e| HealthError::InvalidBenchmarkTable(e.to_string()))?;
        Ok(Self::new(industries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The reference table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_BENCHMARKS).unwrap_or_else(|e| {
            warn!("Bundled benchmark table failed to load: {}", e);
            Self::default()
        })
    }

    pub fn industry(&self, industry: &str) -> Option<&BTreeMap<String, Decimal>> {
        self.industries.get(&industry_key(industry))
    }

    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.industries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    /// Positions each benchmarked metric above or below the industry value.
    /// Unknown industries yield [`BenchmarkComparison::Unavailable`]; benchmark
    /// metrics the bundle does not carry are skipped.
    pub fn compare(&self, metrics: &MetricsBundle, industry: &str) -> BenchmarkComparison {
        let Some(reference) = self.industry(industry) else {
            debug!("No benchmark row for industry '{}'", industry);
            return BenchmarkComparison::Unavailable;
        };

        let standings = reference
            .iter()
            .filter_map(|(metric, benchmark)| {
                let actual = metrics.get(metric)?;
                let standing = if actual >= *benchmark {
                    BenchmarkStanding::Above
                } else {
                    BenchmarkStanding::Below
                };
                Some((metric.clone(), standing))
            })
            .collect();

        BenchmarkComparison::Compared(standings)
    }
}

fn industry_key(industry: &str) -> String {
    industry.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkStanding {
    Above,
    Below,
}

impl BenchmarkStanding {
    pub fn label(&self) -> &'static str {
        match self {
            BenchmarkStanding::Above => "Above industry average",
            BenchmarkStanding::Below => "Below industry average",
        }
    }
}

impl Serialize for BenchmarkStanding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchmarkComparison {
    /// No reference row exists for the requested industry.
    Unavailable,
    Compared(BTreeMap<String, BenchmarkStanding>),
}

impl BenchmarkComparison {
    pub fn standing(&self, metric: &str) -> Option<BenchmarkStanding> {
        match self {
            BenchmarkComparison::Unavailable => None,
            BenchmarkComparison::Compared(standings) => standings.get(metric).copied(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BenchmarkComparison::Compared(_))
    }
}

impl Serialize for BenchmarkComparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BenchmarkComparison::Unavailable => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("benchmark", UNAVAILABLE_MESSAGE)?;
                map.end()
            }
            BenchmarkComparison::Compared(standings) => standings.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn table() -> BenchmarkTable {
        BenchmarkTable::from_json_str(
            r#"{
                "Retail": {"profit_margin": 0.06, "debt_to_revenue": 0.35, "inventory_turnover": 4.0}
            }"#,
        )
        .unwrap()
    }

    fn bundle() -> MetricsBundle {
        MetricsBundle {
            profit_margin: dec!(0.06),
            debt_to_revenue: dec!(0.2),
            ..MetricsBundle::default()
        }
    }

    #[test]
    fn test_compare_known_industry_case_insensitive() {
        let result = table().compare(&bundle(), "RETAIL");
        assert_eq!(result.standing("profit_margin"), Some(BenchmarkStanding::Above));
        assert_eq!(result.standing("debt_to_revenue"), Some(BenchmarkStanding::Below));
        assert_eq!(result.standing("inventory_turnover"), None);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "debt_to_revenue": "Below industry average",
                "profit_margin": "Above industry average"
            })
        );
    }

    #[test]
    fn test_unknown_industry_is_placeholder() {
        let table = table();
        for industry in ["bakery", "", "   "] {
            let result = table.compare(&bundle(), industry);
            assert_eq!(result, BenchmarkComparison::Unavailable);
            assert!(!result.is_available());
        }

        assert_eq!(
            serde_json::to_value(BenchmarkComparison::Unavailable).unwrap(),
            serde_json::json!({"benchmark": "Industry data not available"})
        );
    }

    #[test]
    fn test_empty_table_never_fails() {
        let result = BenchmarkTable::default().compare(&bundle(), "retail");
        assert_eq!(result, BenchmarkComparison::Unavailable);
    }

    #[test]
    fn test_malformed_table_is_rejected() {
        let err = BenchmarkTable::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, HealthError::InvalidBenchmarkTable(_)));
    }

    #[test]
    fn test_builtin_table_loads() {
        let table = BenchmarkTable::builtin();
        assert!(!table.is_empty());
        assert!(table.industry("Retail").is_some());
        assert!(table.industries().all(|name| name == name.to_lowercase()));
    }
}
