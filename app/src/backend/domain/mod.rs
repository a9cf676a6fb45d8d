//! # Domain Module
//!
//! Business rules of the ledger, independent of storage and transport.
//!
//! ## Module Organization
//!
//! - **country_policy**: default rates, labels and currency symbols per country
//! - **derivation**: per-transaction cost and profit figures
//! - **summary_service**: aggregate statistics over the ledger
//! - **ledger_service**: the ledger store (add, remove, clear, load, persist)
//! - **entry_form**: form pre-fill, suggested price, validation
//! - **confirmation**: request/confirm/cancel for destructive actions
//! - **export_service**: clipboard and CSV renderings
//! - **analysis_service**: external text-generation analysis of the ledger
//!
//! ## Business Rules
//!
//! - Unit cost is `round(cost × rate)`, rounded once per unit before quantity
//! - A missing country is Japan everywhere
//! - Customer and item names are required to add an entry
//! - Every view of a transaction uses the same derivation

pub mod analysis_service;
pub mod confirmation;
pub mod country_policy;
pub mod derivation;
pub mod entry_form;
pub mod export_service;
pub mod ledger_service;
pub mod summary_service;

pub use analysis_service::{AnalysisService, GeminiGenerator, TextGenerator};
pub use confirmation::ConfirmationFlow;
pub use country_policy::{all_country_configs, country_config, resolve_config, CountryConfig};
pub use derivation::{derive, ledger_row};
pub use export_service::ExportService;
pub use ledger_service::LedgerStore;
pub use summary_service::aggregate;
