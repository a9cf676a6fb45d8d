use anyhow::Result;
use shared::Transaction;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::storage::traits::KeyValueStorage;

/// Key holding the whole ledger as a JSON array
pub const LEDGER_KEY: &str = "daigou_transactions";

/// Reads and writes the persisted ledger
#[derive(Clone)]
pub struct LedgerRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl LedgerRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted ledger in insertion order.
    ///
    /// Missing or unreadable data is treated as an empty ledger; the failure
    /// is logged, never returned.
    pub fn load_transactions(&self) -> Vec<Transaction> {
        let raw = match self.storage.get(LEDGER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No stored ledger found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read stored ledger, starting empty: {}", e);
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Stored ledger is not valid, starting empty: {}", e);
                return Vec::new();
            }
        };

        // A damaged record costs only itself, not its neighbours
        let total = records.len();
        let transactions: Vec<Transaction> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(transaction) => Some(transaction),
                Err(e) => {
                    warn!("Skipping unreadable ledger record #{}: {}", index, e);
                    None
                }
            })
            .collect();

        info!("📒 Loaded {} of {} stored transactions", transactions.len(), total);
        transactions
    }

    /// Persist the full ledger, replacing whatever was stored
    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string(transactions)?;
        self.storage.put(LEDGER_KEY, &json)
    }
}
