pub mod ledger_repository;
pub mod settings_repository;

pub use ledger_repository::{LedgerRepository, LEDGER_KEY};
pub use settings_repository::{SettingsRepository, DEFAULT_RATE_KEY};
