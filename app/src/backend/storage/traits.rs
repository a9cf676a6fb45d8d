//! # Storage Traits
//!
//! The ledger only needs a durable key-value store: one entry holds the whole
//! transaction list, another the last used exchange rate. This trait lets the
//! domain layer work against the file-backed store in production and an
//! in-memory store in tests.

use anyhow::Result;

/// Durable string storage addressed by a fixed key
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, `None` if nothing was ever stored
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
