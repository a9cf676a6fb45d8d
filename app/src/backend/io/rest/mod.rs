//! # REST API Interface Layer
//!
//! HTTP endpoints for the daigou ledger, mounted under `/api`.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: one handler per operation the UI performs
//! - **Error Handling**: validation failures become 400 with readable messages
//! - **Serialization**: JSON request/response handling
//! - **Logging**: every request is logged with its route
//!
//! Handlers only translate. Locks on the shared state are short and never
//! held across an `.await`.

pub mod analysis_apis;
pub mod confirmation_apis;
pub mod country_apis;
pub mod entry_form_apis;
pub mod export_apis;
pub mod transaction_apis;

pub use analysis_apis::analyze_ledger;
pub use confirmation_apis::{
    cancel_pending, confirm_pending, get_confirmation, request_clear, request_delete,
};
pub use country_apis::list_countries;
pub use entry_form_apis::{get_form_defaults, preview_transaction};
pub use transaction_apis::{create_transaction, get_summary, list_transactions};

use chrono::{Local, NaiveDate};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Lock shared state. A panic in another handler must not take the ledger
/// down with it, so a poisoned lock is recovered.
pub(crate) fn lock_state<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering poisoned state lock");
        poisoned.into_inner()
    })
}

/// Local calendar date used for new entries and export filenames
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
