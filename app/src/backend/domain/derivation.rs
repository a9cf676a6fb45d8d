//! Transaction derivation.
//!
//! Pure functions that turn the stored fields of one transaction into the
//! figures the ledger table, the clipboard copy and the CSV file all show.
//! Every presentation goes through [`derive`], so the three views agree on
//! every number.
//!
//! Unit cost is rounded to a whole local-currency unit before it is
//! multiplied by the quantity. Sale prices and aggregates are never rounded.

use shared::{DerivedFigures, LedgerRow, Transaction};

use super::country_policy::resolve_config;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `round(cost_foreign * exchange_rate)`, 0 for non-finite input
pub fn unit_local_cost(cost_foreign: f64, exchange_rate: f64) -> f64 {
    finite_or_zero((finite_or_zero(cost_foreign) * finite_or_zero(exchange_rate)).round())
}

/// Margin on the sale price as a whole percentage; 0 when nothing was charged
pub fn profit_margin_percent(unit_profit: f64, price_sold: f64) -> f64 {
    if price_sold > 0.0 {
        finite_or_zero((unit_profit / price_sold * 100.0).round())
    } else {
        0.0
    }
}

/// Suggested sale price from the selling reference rate
pub fn suggested_price(cost_foreign: f64, selling_rate: f64) -> Option<f64> {
    let cost = finite_or_zero(cost_foreign);
    let rate = finite_or_zero(selling_rate);
    if cost > 0.0 && rate > 0.0 {
        Some((cost * rate).round())
    } else {
        None
    }
}

/// Compute the derived figures of a single transaction
pub fn derive(transaction: &Transaction) -> DerivedFigures {
    let quantity = f64::from(transaction.quantity.max(1));
    let price_sold = finite_or_zero(transaction.price_sold);

    let unit_local_cost = unit_local_cost(transaction.cost_foreign, transaction.exchange_rate);
    let unit_profit = price_sold - unit_local_cost;
    let total_sales = price_sold * quantity;
    let total_cost = unit_local_cost * quantity;

    DerivedFigures {
        unit_local_cost,
        unit_profit,
        total_sales,
        total_cost,
        total_profit: total_sales - total_cost,
        profit_margin_percent: profit_margin_percent(unit_profit, price_sold),
    }
}

/// Build the table row for a transaction
pub fn ledger_row(transaction: &Transaction) -> LedgerRow {
    let config = resolve_config(transaction.country);
    LedgerRow {
        transaction: transaction.clone(),
        country: config.country,
        country_label: config.label.to_string(),
        currency_symbol: config.currency_symbol.to_string(),
        derived: derive(transaction),
    }
}

/// Shortest decimal form of a number: `20`, `0.2`, `-5`
pub fn format_number(value: f64) -> String {
    let value = finite_or_zero(value);
    // avoid "-0"
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
