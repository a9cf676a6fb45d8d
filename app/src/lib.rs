//! Daigou ledger: records purchase-and-resale transactions, derives costs and
//! profits per country exchange rate, and serves them over a local HTTP API.

pub mod backend;

pub use backend::{create_router, initialize_backend, AppState};
