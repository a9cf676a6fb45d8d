//! Ledger store.
//!
//! Owns the ordered list of transactions (insertion order is the order the
//! user entered them) and keeps the persisted copy in step: the ledger is
//! loaded once at start and written back in full after every mutation.
//!
//! Persistence failures never undo or block a mutation. The in-memory ledger
//! stays authoritative and the failure is logged.

use chrono::Utc;
use shared::{LedgerRow, SummaryStats, Transaction};
use tracing::{error, info};
use uuid::Uuid;

use super::derivation::ledger_row;
use super::summary_service::aggregate;
use crate::backend::storage::LedgerRepository;

/// Generate a transaction id: `tx-<epoch_millis>-<8 hex chars>`
pub fn generate_transaction_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("tx-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

pub struct LedgerStore {
    repository: LedgerRepository,
    transactions: Vec<Transaction>,
}

impl LedgerStore {
    /// Load the persisted ledger; absent or unreadable data gives an empty ledger
    pub fn load(repository: LedgerRepository) -> Self {
        let transactions = repository.load_transactions();
        Self {
            repository,
            transactions,
        }
    }

    /// Append a transaction, assigning a fresh id when it has none or a duplicate one
    pub fn add(&mut self, mut transaction: Transaction) -> Transaction {
        if transaction.id.trim().is_empty() || self.contains(&transaction.id) {
            transaction.id = loop {
                let candidate = generate_transaction_id();
                if !self.contains(&candidate) {
                    break candidate;
                }
            };
        }

        info!(
            "➕ Adding transaction {} ({} x{})",
            transaction.id, transaction.item_name, transaction.quantity
        );
        self.transactions.push(transaction.clone());
        self.persist();
        transaction
    }

    /// Remove the transaction with the given id. Returns false if there was none.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;

        if removed {
            info!("🗑️ Removed transaction {}", id);
        } else {
            info!("Transaction {} not found, nothing removed", id);
        }
        self.persist();
        removed
    }

    /// Drop every transaction. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.transactions.len();
        self.transactions.clear();
        info!("🧹 Cleared ledger ({} transactions)", count);
        self.persist();
        count
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn summary(&self) -> SummaryStats {
        aggregate(&self.transactions)
    }

    /// Table rows, newest entry first
    pub fn rows(&self) -> Vec<LedgerRow> {
        self.transactions.iter().rev().map(ledger_row).collect()
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save_transactions(&self.transactions) {
            error!("❌ Failed to save ledger ({} transactions): {}", self.transactions.len(), e);
        }
    }
}
