//! # Storage Module
//!
//! Persistence for the ledger. The ledger is small and single-user, so a
//! key-value store is all it needs: the transaction list lives under one key
//! as a JSON array, the last used exchange rate under another.
//!
//! ## Layout
//!
//! ```text
//! <data dir>/
//! ├── config.yaml                  (optional, see `config`)
//! ├── daigou_transactions.json
//! └── daigou_default_rate.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place. Readers treat
//! anything absent or unparsable as "no data".

pub mod file;
pub mod memory;
pub mod repositories;
pub mod traits;

pub use file::FileConnection;
pub use memory::MemoryStorage;
pub use repositories::{LedgerRepository, SettingsRepository, DEFAULT_RATE_KEY, LEDGER_KEY};
pub use traits::KeyValueStorage;
