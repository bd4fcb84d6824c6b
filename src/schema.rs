use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One uploaded row before normalization: arbitrary column names mapped to
/// whatever cell values the file decoder produced.
pub type RawRow = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    #[default]
    #[schemars(description = "Rows ingested from a user-uploaded CSV/XLSX/PDF export")]
    Upload,

    #[schemars(description = "Rows pulled from a connected bank account feed")]
    Banking,

    #[schemars(description = "Rows derived from GST return filings")]
    Gst,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RecordSource::Upload => "upload",
            RecordSource::Banking => "banking",
            RecordSource::Gst => "gst",
        };
        f.write_str(tag)
    }
}

/// A single reporting-period entry for one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialRecord {
    #[schemars(description = "The reporting date this row belongs to")]
    pub record_date: NaiveDate,

    #[serde(default)]
    pub revenue: Decimal,

    #[serde(default)]
    pub expenses: Decimal,

    #[schemars(description = "Profit as reported on the row. Metrics recompute profit from revenue and expenses instead of reading this.")]
    #[serde(default)]
    pub profit: Decimal,

    #[serde(default)]
    pub accounts_receivable: Decimal,

    #[serde(default)]
    pub accounts_payable: Decimal,

    #[schemars(description = "Closing inventory value. Absent when the export has no inventory column or the cell is blank.")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_value: Option<Decimal>,

    #[serde(default)]
    pub loan_obligations: Decimal,

    #[serde(default)]
    pub tax_paid: Decimal,

    #[serde(default)]
    pub source: RecordSource,
}

impl FinancialRecord {
    /// A record dated `record_date` with every amount at zero.
    pub fn empty(record_date: NaiveDate) -> Self {
        Self {
            record_date,
            revenue: Decimal::ZERO,
            expenses: Decimal::ZERO,
            profit: Decimal::ZERO,
            accounts_receivable: Decimal::ZERO,
            accounts_payable: Decimal::ZERO,
            inventory_value: None,
            loan_obligations: Decimal::ZERO,
            tax_paid: Decimal::ZERO,
            source: RecordSource::Upload,
        }
    }

    pub fn inventory_or_zero(&self) -> Decimal {
        self.inventory_value.unwrap_or(Decimal::ZERO)
    }
}

/// JSON schema describing the canonical record shape, for documenting the
/// columns an upload may carry.
pub fn record_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FinancialRecord);
    serde_json::to_value(schema).unwrap_or_default()
}
