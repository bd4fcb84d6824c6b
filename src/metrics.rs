use crate::schema::FinancialRecord;
use crate::utils::{round_money, safe_ratio};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Names accepted by [`MetricsBundle::get`], in serialization order.
pub const METRIC_NAMES: [&str; 6] = [
    "total_revenue",
    "total_expenses",
    "profit",
    "profit_margin",
    "working_capital",
    "debt_to_revenue",
];

/// Headline figures derived from a business's full set of records.
///
/// Monetary totals carry 2 decimal places and ratios 4. Ratios are 0 when
/// revenue is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsBundle {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_margin: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub working_capital: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub debt_to_revenue: Decimal,
}

impl MetricsBundle {
    /// Looks a metric up by its serialized name.
    pub fn get(&self, name: &str) -> Option<Decimal> {
        match name {
            "total_revenue" => Some(self.total_revenue),
            "total_expenses" => Some(self.total_expenses),
            "profit" => Some(self.profit),
            "profit_margin" => Some(self.profit_margin),
            "working_capital" => Some(self.working_capital),
            "debt_to_revenue" => Some(self.debt_to_revenue),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Totals {
    revenue: Decimal,
    expenses: Decimal,
    receivables: Decimal,
    payables: Decimal,
    inventory: Decimal,
    loans: Decimal,
}

/// Reduces records to a [`MetricsBundle`]. An empty slice yields the all-zero
/// bundle.
pub fn compute_metrics(records: &[FinancialRecord]) -> MetricsBundle {
    if records.is_empty() {
        return MetricsBundle::default();
    }

    // Sums saturate at the Decimal range instead of panicking.
    let totals = records.iter().fold(Totals::default(), |acc, record| Totals {
        revenue: acc.revenue.saturating_add(record.revenue),
        expenses: acc.expenses.saturating_add(record.expenses),
        receivables: acc.receivables.saturating_add(record.accounts_receivable),
        payables: acc.payables.saturating_add(record.accounts_payable),
        inventory: acc.inventory.saturating_add(record.inventory_or_zero()),
        loans: acc.loans.saturating_add(record.loan_obligations),
    });

    let total_revenue = round_money(totals.revenue);
    let total_expenses = round_money(totals.expenses);
    let profit = total_revenue.saturating_sub(total_expenses);

    let bundle = MetricsBundle {
        total_revenue,
        total_expenses,
        profit,
        profit_margin: safe_ratio(profit, total_revenue),
        working_capital: round_money(
            totals
                .receivables
                .saturating_add(totals.inventory)
                .saturating_sub(totals.payables),
        ),
        debt_to_revenue: safe_ratio(totals.loans, total_revenue),
    };

    debug!(
        "Computed metrics over {} records: revenue={}, margin={}, working_capital={}, debt_to_revenue={}",
        records.len(),
        bundle.total_revenue,
        bundle.profit_margin,
        bundle.working_capital,
        bundle.debt_to_revenue
    );

    bundle
}

/// Sum of `tax_paid` across records, rounded to 2 decimal places. Saturates
/// at the Decimal range.
pub fn total_tax_paid(records: &[FinancialRecord]) -> Decimal {
    round_money(
        records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.tax_paid)),
    )
}
