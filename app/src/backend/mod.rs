//! # Backend Module
//!
//! Everything behind the ledger UI: the business rules, persistence and the
//! local HTTP API the UI talks to.
//!
//! ## Architecture
//!
//! ```text
//! UI (browser page)
//!     ↓
//! IO Layer (REST handlers)
//!     ↓
//! Domain Layer (derivation, ledger store, export, analysis)
//!     ↓
//! Storage Layer (key-value JSON files)
//! ```
//!
//! The ledger store and the confirmation flow live behind plain mutexes.
//! Handlers take the confirmation lock before the ledger lock and never hold
//! either across an `.await`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::config::AppConfig;
use crate::backend::domain::{AnalysisService, ConfirmationFlow, ExportService, LedgerStore};
use crate::backend::storage::{FileConnection, KeyValueStorage, LedgerRepository, SettingsRepository};

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<LedgerStore>>,
    pub confirmation: Arc<Mutex<ConfirmationFlow>>,
    pub settings: SettingsRepository,
    pub export_service: ExportService,
    pub analysis_service: AnalysisService,
}

impl AppState {
    /// Load the ledger from `storage` and wire up the services
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        export_service: ExportService,
        analysis_service: AnalysisService,
    ) -> Self {
        let ledger = LedgerStore::load(LedgerRepository::new(storage.clone()));
        info!("Loaded ledger with {} transactions", ledger.len());

        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            confirmation: Arc::new(Mutex::new(ConfirmationFlow::new())),
            settings: SettingsRepository::new(storage),
            export_service,
            analysis_service,
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig, data_dir: &Path) -> Result<AppState> {
    info!("Setting up storage in {:?}", data_dir);
    let connection = FileConnection::new(data_dir)?;

    info!("Setting up domain model");
    let export_service = ExportService::with_default_directory(config.export_directory.clone());
    let analysis_service =
        AnalysisService::from_api_key(config.gemini_api_key.as_deref(), &config.gemini_model);

    info!("Setting up application state");
    Ok(AppState::new(
        Arc::new(connection),
        export_service,
        analysis_service,
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/countries", get(io::list_countries))
        .route(
            "/transactions",
            get(io::list_transactions).post(io::create_transaction),
        )
        .route("/transactions/preview", post(io::preview_transaction))
        .route("/transactions/clear-request", post(io::request_clear))
        .route("/transactions/:id/delete-request", post(io::request_delete))
        .route("/summary", get(io::get_summary))
        .route("/form/defaults", get(io::get_form_defaults))
        .route("/confirmation", get(io::get_confirmation))
        .route("/confirmation/confirm", post(io::confirm_pending))
        .route("/confirmation/cancel", post(io::cancel_pending))
        .nest("/export", io::export_apis::router())
        .route("/analysis", post(io::analyze_ledger));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
