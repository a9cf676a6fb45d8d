//! # REST API for Data Export
//!
//! Clipboard text, CSV download and CSV written straight to a directory.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ExportToPathRequest, ExportToPathResponse, Transaction};
use tracing::{info, warn};

use super::{lock_state, today};
use crate::backend::AppState;

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clipboard", get(export_clipboard))
        .route("/csv", get(export_csv))
        .route("/path", post(export_to_path))
}

fn snapshot(state: &AppState) -> Vec<Transaction> {
    lock_state(&state.ledger).transactions().to_vec()
}

/// RFC 5987 encoding so the Chinese file name survives the header
fn content_disposition(filename: &str) -> HeaderValue {
    let value = format!(
        "attachment; filename=\"export.csv\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|e| {
        warn!("Invalid content disposition for {}: {}", filename, e);
        HeaderValue::from_static("attachment")
    })
}

/// Tab-separated ledger text for pasting into a spreadsheet
pub async fn export_clipboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/clipboard");
    let transactions = snapshot(&state);
    let text = state.export_service.render_clipboard(&transactions);
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        text,
    )
}

/// CSV file download
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");
    let transactions = snapshot(&state);
    let export = state
        .export_service
        .export_transactions_csv(&transactions, today());
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, content_disposition(&export.filename)),
        ],
        export.content,
    )
}

/// Write the CSV into a directory on disk
pub async fn export_to_path(
    State(state): State<AppState>,
    Json(request): Json<ExportToPathRequest>,
) -> Json<ExportToPathResponse> {
    info!("POST /api/export/path - request: {:?}", request);
    let transactions = snapshot(&state);
    Json(
        state
            .export_service
            .export_to_path(request, &transactions, today()),
    )
}
