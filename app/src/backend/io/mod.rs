//! # IO Module
//!
//! Adapter layer between the ledger UI and the domain logic.
//!
//! Requests arrive as JSON over a localhost REST API, are translated into
//! domain calls, and the results are returned as the DTOs from the `shared`
//! crate. No business rules live here.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum
//! - **Serialization**: Serde JSON
//! - **State Management**: `AppState` through Axum's `State` extractor
//! - **Error Handling**: `(StatusCode, String)` responses

pub mod rest;

pub use rest::*;
