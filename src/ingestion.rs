use crate::error::{HealthError, Result};
use crate::schema::{FinancialRecord, RawRow, RecordSource};
use crate::utils::parse_record_date;
use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const DATE_COLUMN: &str = "record_date";

/// Canonical form of an uploaded column header: trimmed, lowercased, spaces
/// replaced with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Re-keys row `idx` by normalized column names. Two headers that normalize
/// to the same name (`" Revenue"` and `"revenue"`) are rejected.
pub fn normalize_row(idx: usize, row: &RawRow) -> Result<BTreeMap<String, Value>> {
    let mut normalized = BTreeMap::new();
    for (key, value) in row {
        let column = normalize_column_name(key);
        if normalized.insert(column.clone(), value.clone()).is_some() {
            return Err(HealthError::DuplicateColumn { row: idx, column });
        }
    }
    Ok(normalized)
}

/// Normalizes uploaded rows into financial records tagged as `upload`.
pub fn normalize(rows: &[RawRow]) -> Result<Vec<FinancialRecord>> {
    normalize_with_source(rows, RecordSource::Upload)
}

/// Normalizes rows into financial records, rejecting the whole batch on the
/// first malformed row.
pub fn normalize_with_source(
    rows: &[RawRow],
    source: RecordSource,
) -> Result<Vec<FinancialRecord>> {
    let normalized = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| normalize_row(idx, row))
        .collect::<Result<Vec<_>>>()?;

    if !normalized.iter().any(|row| row.contains_key(DATE_COLUMN)) {
        return Err(HealthError::MissingDateColumn);
    }

    let records = normalized
        .iter()
        .enumerate()
        .map(|(idx, row)| record_from_row(idx, row, source))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Normalized {} {} rows into financial records",
        records.len(),
        source
    );

    Ok(records)
}

fn record_from_row(
    idx: usize,
    row: &BTreeMap<String, Value>,
    source: RecordSource,
) -> Result<FinancialRecord> {
    let record_date = parse_date_cell(idx, row.get(DATE_COLUMN))?;
    let amount = |column: &str| -> Result<Decimal> {
        Ok(parse_amount_cell(idx, column, row.get(column))?.unwrap_or(Decimal::ZERO))
    };

    let record = FinancialRecord {
        record_date,
        revenue: amount("revenue")?,
        expenses: amount("expenses")?,
        profit: amount("profit")?,
        accounts_receivable: amount("accounts_receivable")?,
        accounts_payable: amount("accounts_payable")?,
        inventory_value: parse_amount_cell(idx, "inventory_value", row.get("inventory_value"))?,
        loan_obligations: amount("loan_obligations")?,
        tax_paid: amount("tax_paid")?,
        source,
    };

    debug!("Row {} -> record dated {}", idx, record.record_date);
    Ok(record)
}

fn parse_date_cell(idx: usize, cell: Option<&Value>) -> Result<chrono::NaiveDate> {
    let invalid = |value: String| HealthError::InvalidDate { row: idx, value };

    match cell {
        Some(Value::String(text)) => parse_record_date(text).ok_or_else(|| invalid(text.clone())),
        Some(Value::Null) | None => Err(invalid("<missing>".to_string())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

/// Returns `None` for absent, null, or blank cells.
fn parse_amount_cell(idx: usize, column: &str, cell: Option<&Value>) -> Result<Option<Decimal>> {
    let invalid = |value: String| HealthError::InvalidAmount {
        row: idx,
        column: column.to_string(),
        value,
    };

    match cell {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .map(Some)
            .map_err(|_| invalid(number.to_string())),
        Some(Value::String(text)) => {
            let cleaned: String = text
                .trim()
                .trim_start_matches('₹')
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();

            if cleaned.is_empty() {
                return Ok(None);
            }

            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .map(Some)
                .map_err(|_| invalid(text.clone()))
        }
        Some(other) => Err(invalid(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Record Date "), "record_date");
        assert_eq!(normalize_column_name("Accounts Receivable"), "accounts_receivable");
        assert_eq!(normalize_column_name("TAX_PAID"), "tax_paid");
    }

    #[test]
    fn test_missing_date_column_rejects_batch() {
        let rows = vec![row(json!({"Revenue": 100, "Expenses": 50}))];
        let err = normalize(&rows).unwrap_err();
        assert!(matches!(err, HealthError::MissingDateColumn));
        assert!(err.is_validation());

        assert!(matches!(normalize(&[]), Err(HealthError::MissingDateColumn)));
    }

    #[test]
    fn test_heterogeneous_headers_resolve_to_record() {
        let rows = vec![row(json!({
            "Record Date": "2024-01-31",
            " REVENUE ": 120000,
            "Expenses": "95,000.50",
            "Accounts Receivable": 15000,
            "accounts payable": 9000,
            "Loan Obligations": "₹40,000",
            "Tax Paid": 21600,
            "Notes": "ignored"
        }))];

        let records = normalize(&rows).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.record_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(record.revenue, dec!(120000));
        assert_eq!(record.expenses, dec!(95000.50));
        assert_eq!(record.profit, Decimal::ZERO);
        assert_eq!(record.accounts_receivable, dec!(15000));
        assert_eq!(record.accounts_payable, dec!(9000));
        assert_eq!(record.inventory_value, None);
        assert_eq!(record.loan_obligations, dec!(40000));
        assert_eq!(record.tax_paid, dec!(21600));
        assert_eq!(record.source, RecordSource::Upload);
    }

    #[test]
    fn test_inventory_zero_is_distinct_from_absent() {
        let rows = vec![
            row(json!({"record_date": "2024-01-31", "inventory_value": 0})),
            row(json!({"record_date": "2024-02-29", "inventory_value": null})),
            row(json!({"record_date": "2024-03-31", "inventory_value": ""})),
        ];

        let records = normalize(&rows).unwrap();
        assert_eq!(records[0].inventory_value, Some(Decimal::ZERO));
        assert_eq!(records[1].inventory_value, None);
        assert_eq!(records[2].inventory_value, None);
    }

    #[test]
    fn test_rows_keep_file_order_without_dedup() {
        let rows = vec![
            row(json!({"record_date": "2024-03-31", "revenue": 10})),
            row(json!({"record_date": "2024-01-31", "revenue": -5})),
            row(json!({"record_date": "2024-03-31", "revenue": 10})),
        ];

        let records = normalize(&rows).unwrap();
        let revenues: Vec<Decimal> = records.iter().map(|r| r.revenue).collect();
        assert_eq!(revenues, vec![dec!(10), dec!(-5), dec!(10)]);
        assert_eq!(records[1].record_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_unparseable_cells_reject_batch() {
        let rows = vec![
            row(json!({"record_date": "2024-01-31", "revenue": 10})),
            row(json!({"record_date": "2024-02-29", "revenue": "lots"})),
        ];
        match normalize(&rows) {
            Err(HealthError::InvalidAmount { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "revenue");
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }

        let rows = vec![row(json!({"record_date": "not a date"}))];
        assert!(matches!(
            normalize(&rows),
            Err(HealthError::InvalidDate { row: 0, .. })
        ));
    }

    #[test]
    fn test_colliding_headers_reject_batch() {
        let rows = vec![
            row(json!({"record_date": "2024-01-31", "revenue": 10})),
            row(json!({"record_date": "2024-02-29", " Revenue": 10, "revenue": 20})),
        ];
        let err = normalize(&rows).unwrap_err();
        assert!(err.is_validation());
        match err {
            HealthError::DuplicateColumn { row, column } => {
                assert_eq!(row, 1);
                assert_eq!(column, "revenue");
            }
            other => panic!("expected DuplicateColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_alternate_source_tag() {
        let rows = vec![row(json!({"record_date": "2024-01-31", "tax_paid": 1800}))];
        let records = normalize_with_source(&rows, RecordSource::Gst).unwrap();
        assert_eq!(records[0].source, RecordSource::Gst);
    }
}
