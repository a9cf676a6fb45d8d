//! # REST API for Confirmations
//!
//! Delete and clear are two-step: a request records the intent, then the UI
//! confirms or cancels it.

use axum::{
    extract::{Path, State},
    response::Json,
};
use shared::{ConfirmActionResponse, ConfirmationResponse};
use tracing::info;

use super::lock_state;
use crate::backend::domain::ConfirmationFlow;
use crate::backend::AppState;

fn confirmation_response(flow: &ConfirmationFlow) -> ConfirmationResponse {
    ConfirmationResponse {
        pending: flow.pending().clone(),
        message: flow.prompt(),
    }
}

pub async fn get_confirmation(State(state): State<AppState>) -> Json<ConfirmationResponse> {
    info!("GET /api/confirmation");
    Json(confirmation_response(&lock_state(&state.confirmation)))
}

/// Ask to delete one transaction
pub async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ConfirmationResponse> {
    info!("POST /api/transactions/{}/delete-request", id);
    let mut flow = lock_state(&state.confirmation);
    flow.request_delete(id);
    Json(confirmation_response(&flow))
}

/// Ask to clear the whole ledger
pub async fn request_clear(State(state): State<AppState>) -> Json<ConfirmationResponse> {
    info!("POST /api/transactions/clear-request");
    let mut flow = lock_state(&state.confirmation);
    flow.request_clear();
    Json(confirmation_response(&flow))
}

/// Apply whatever is pending
pub async fn confirm_pending(State(state): State<AppState>) -> Json<ConfirmActionResponse> {
    info!("POST /api/confirmation/confirm");
    let mut flow = lock_state(&state.confirmation);
    let mut ledger = lock_state(&state.ledger);
    let applied = flow.confirm(&mut ledger);
    Json(ConfirmActionResponse {
        applied,
        summary: ledger.summary(),
    })
}

pub async fn cancel_pending(State(state): State<AppState>) -> Json<ConfirmationResponse> {
    info!("POST /api/confirmation/cancel");
    let mut flow = lock_state(&state.confirmation);
    flow.cancel();
    Json(confirmation_response(&flow))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{entry, TestApp};
    use axum::http::{Method, StatusCode};
    use shared::{
        ConfirmActionResponse, ConfirmationResponse, CreateTransactionResponse, LedgerResponse,
        PendingAction,
    };

    async fn add(app: &TestApp, customer: &str) -> String {
        let (_, value) = app
            .send_json(Method::POST, "/api/transactions", Some(entry(customer, "面膜")))
            .await;
        let created: CreateTransactionResponse = serde_json::from_value(value).unwrap();
        created.transaction.id
    }

    async fn ledger(app: &TestApp) -> LedgerResponse {
        let (_, value) = app.send_json(Method::GET, "/api/transactions", None).await;
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let app = TestApp::new();
        let first = add(&app, "小王").await;
        add(&app, "小李").await;

        let uri = format!("/api/transactions/{}/delete-request", first);
        let (status, value) = app.send_json(Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let pending: ConfirmationResponse = serde_json::from_value(value).unwrap();
        assert_eq!(pending.pending, PendingAction::Delete(first.clone()));
        assert!(pending.message.is_some());
        assert_eq!(ledger(&app).await.rows.len(), 2);

        let (_, value) = app
            .send_json(Method::POST, "/api/confirmation/confirm", None)
            .await;
        let confirmed: ConfirmActionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(confirmed.applied, PendingAction::Delete(first));
        assert_eq!(confirmed.summary.item_count, 2);

        let remaining = ledger(&app).await;
        assert_eq!(remaining.rows.len(), 1);
        assert_eq!(remaining.rows[0].transaction.customer_name, "小李");
    }

    #[tokio::test]
    async fn test_cancel_clear_keeps_ledger() {
        let app = TestApp::new();
        add(&app, "小王").await;

        app.send(Method::POST, "/api/transactions/clear-request", None)
            .await;
        let (_, value) = app.send_json(Method::GET, "/api/confirmation", None).await;
        let pending: ConfirmationResponse = serde_json::from_value(value).unwrap();
        assert_eq!(pending.pending, PendingAction::ClearAll);

        let (_, value) = app
            .send_json(Method::POST, "/api/confirmation/cancel", None)
            .await;
        let cancelled: ConfirmationResponse = serde_json::from_value(value).unwrap();
        assert_eq!(cancelled.pending, PendingAction::None);
        assert_eq!(cancelled.message, None);

        let (_, value) = app
            .send_json(Method::POST, "/api/confirmation/confirm", None)
            .await;
        let confirmed: ConfirmActionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(confirmed.applied, PendingAction::None);
        assert_eq!(ledger(&app).await.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_clear_empties_ledger() {
        let app = TestApp::new();
        add(&app, "小王").await;
        add(&app, "小李").await;

        app.send(Method::POST, "/api/transactions/clear-request", None)
            .await;
        let (_, value) = app
            .send_json(Method::POST, "/api/confirmation/confirm", None)
            .await;
        let confirmed: ConfirmActionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(confirmed.applied, PendingAction::ClearAll);
        assert_eq!(confirmed.summary.item_count, 0);
        assert_eq!(confirmed.summary.total_profit, 0.0);
        assert!(ledger(&app).await.rows.is_empty());
    }
}
