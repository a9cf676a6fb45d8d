//! Ledger aggregation.
//!
//! Folds the derived figures of every transaction into [`SummaryStats`]. The
//! fold is a plain sum, so it does not depend on ledger order and is simply
//! recomputed from scratch whenever the ledger is read.

use shared::{SummaryStats, Transaction};

use super::derivation::derive;

/// Aggregate statistics for a sequence of transactions
pub fn aggregate(transactions: &[Transaction]) -> SummaryStats {
    transactions
        .iter()
        .fold(SummaryStats::default(), |mut stats, transaction| {
            let derived = derive(transaction);
            stats.total_sales += derived.total_sales;
            stats.total_cost += derived.total_cost;
            stats.total_profit += derived.total_profit;
            stats.item_count += u64::from(transaction.quantity.max(1));
            stats
        })
}
