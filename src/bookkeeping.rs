use crate::schema::FinancialRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Keyword rules checked in order; the first category with a matching keyword
/// wins.
const EXPENSE_RULES: [(&str, &[&str]); 6] = [
    ("rent", &["rent", "lease"]),
    ("salary", &["salary", "wages", "payroll"]),
    ("utilities", &["electricity", "water", "internet", "phone"]),
    ("marketing", &["ads", "marketing", "promotion"]),
    ("logistics", &["shipping", "courier", "transport"]),
    ("office", &["stationery", "supplies"]),
];

pub const UNCATEGORIZED: &str = "uncategorized";
pub const OTHER: &str = "other";

/// Buckets a free-text expense description. A missing description is
/// `uncategorized`; an unmatched one is `other`.
pub fn categorize_expense(description: Option<&str>) -> &'static str {
    let Some(description) = description else {
        return UNCATEGORIZED;
    };
    let description = description.to_lowercase();

    EXPENSE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| description.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER)
}

/// Indices of records repeating an earlier `(record_date, revenue, expenses)`
/// combination. The first occurrence is not reported.
pub fn detect_duplicates(records: &[FinancialRecord]) -> Vec<usize> {
    let mut seen = HashSet::new();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            !seen.insert((
                record.record_date,
                record.revenue.normalize(),
                record.expenses.normalize(),
            ))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// A dated amount from either the bank statement or the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub record_date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub bank_transactions: usize,
    pub book_entries: usize,
    pub matched: usize,
    pub unmatched_bank: usize,
    pub unmatched_books: usize,
}

/// Joins bank transactions to book entries on `(record_date, amount)`.
///
/// `matched` counts joined pairs, so repeated keys on both sides multiply.
/// Unmatched counts never go below zero.
pub fn reconcile(bank: &[LedgerEntry], books: &[LedgerEntry]) -> ReconciliationSummary {
    let mut book_counts: BTreeMap<(NaiveDate, Decimal), usize> = BTreeMap::new();
    for entry in books {
        *book_counts
            .entry((entry.record_date, entry.amount.normalize()))
            .or_default() += 1;
    }

    let matched = bank
        .iter()
        .map(|entry| {
            book_counts
                .get(&(entry.record_date, entry.amount.normalize()))
                .copied()
                .unwrap_or(0)
        })
        .sum();

    ReconciliationSummary {
        bank_transactions: bank.len(),
        book_entries: books.len(),
        matched,
        unmatched_bank: bank.len().saturating_sub(matched),
        unmatched_books: books.len().saturating_sub(matched),
    }
}
