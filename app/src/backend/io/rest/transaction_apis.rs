//! # REST API for Transactions
//!
//! Endpoints for listing the ledger, adding an entry and reading the totals.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{CreateTransactionResponse, EntryFormState, LedgerResponse, SummaryStats};
use tracing::{error, info, warn};

use super::{lock_state, today};
use crate::backend::domain::entry_form;
use crate::backend::AppState;

/// Ledger rows, newest first, with the summary
pub async fn list_transactions(State(state): State<AppState>) -> Json<LedgerResponse> {
    info!("GET /api/transactions");
    let ledger = lock_state(&state.ledger);
    Json(LedgerResponse {
        rows: ledger.rows(),
        summary: ledger.summary(),
    })
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryStats> {
    info!("GET /api/summary");
    Json(lock_state(&state.ledger).summary())
}

/// Add a transaction from the entry form
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(form): Json<EntryFormState>,
) -> Response {
    info!("POST /api/transactions - form: {:?}", form);

    let today = today();
    let transaction = match entry_form::to_transaction(&form, today) {
        Ok(transaction) => transaction,
        Err(validation) => {
            let messages = validation.messages();
            warn!("Rejected entry: {:?}", messages);
            return (StatusCode::BAD_REQUEST, messages.join("\n")).into_response();
        }
    };

    let (transaction, summary) = {
        let mut ledger = lock_state(&state.ledger);
        let added = ledger.add(transaction);
        (added, ledger.summary())
    };

    if transaction.exchange_rate > 0.0 {
        if let Err(e) = state.settings.save_default_rate(transaction.exchange_rate) {
            error!("Failed to remember default rate: {}", e);
        }
    }

    let response = CreateTransactionResponse {
        next_form: entry_form::next_form(&form, today),
        transaction,
        summary,
    };
    (StatusCode::CREATED, Json(response)).into_response()
}
