//! Placeholder revenue projection.
//!
//! This is a smoothed trend, not a validated statistical model: the last
//! 3-period moving average of revenue is grown by a fixed 2% per month.

use crate::schema::FinancialRecord;
use crate::utils::round_money;
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const DEFAULT_FORECAST_MONTHS: u32 = 6;
pub const ROLLING_WINDOW: usize = 3;
pub const MONTHLY_GROWTH: Decimal = dec!(0.02);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastPoint {
    /// 1-based month offset from the last recorded period.
    pub month: u32,
    pub revenue: Decimal,
}

impl ForecastPoint {
    pub fn label(&self) -> String {
        format!("month_{}", self.month)
    }
}

/// Projected revenue for `month_1..month_N`, in month order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevenueForecast {
    points: Vec<ForecastPoint>,
}

impl RevenueForecast {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Looks up a projection by its `month_N` label.
    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.points
            .iter()
            .find(|point| point.label() == label)
            .map(|point| point.revenue)
    }
}

impl Serialize for RevenueForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.points.len()))?;
        for point in &self.points {
            map.serialize_entry(&point.label(), &point.revenue.to_f64().unwrap_or_default())?;
        }
        map.end()
    }
}

/// Projects revenue `months` ahead from records already sorted by
/// `record_date` ascending. Fewer than three records yields an empty forecast.
pub fn forecast_revenue(ordered_records: &[FinancialRecord], months: u32) -> RevenueForecast {
    if ordered_records.len() < ROLLING_WINDOW {
        debug!(
            "Forecast skipped: {} records, need at least {}",
            ordered_records.len(),
            ROLLING_WINDOW
        );
        return RevenueForecast::default();
    }

    let window = &ordered_records[ordered_records.len() - ROLLING_WINDOW..];
    let anchor = window
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.revenue))
        / Decimal::from(ROLLING_WINDOW);

    let points = (1..=months)
        .map(|month| {
            let growth = Decimal::ONE + MONTHLY_GROWTH * Decimal::from(month - 1);
            ForecastPoint {
                month,
                revenue: round_money(anchor.saturating_mul(growth)),
            }
        })
        .collect();

    RevenueForecast { points }
}
