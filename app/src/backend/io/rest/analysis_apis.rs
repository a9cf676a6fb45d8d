//! # REST API for Ledger Analysis

use axum::{extract::State, response::Json};
use shared::AnalysisResponse;
use tracing::info;

use super::lock_state;
use crate::backend::AppState;

/// Send a snapshot of the ledger for analysis. Always answers 200; the status
/// field says whether the text is an analysis or a fixed notice.
pub async fn analyze_ledger(State(state): State<AppState>) -> Json<AnalysisResponse> {
    info!("POST /api/analysis");
    let transactions = lock_state(&state.ledger).transactions().to_vec();
    Json(state.analysis_service.analyze(&transactions).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{entry, TestApp};
    use crate::backend::domain::analysis_service::{AnalysisError, MISSING_CREDENTIAL_MESSAGE};
    use crate::backend::domain::TextGenerator;
    use async_trait::async_trait;
    use axum::http::{Method, StatusCode};
    use shared::{AnalysisResponse, AnalysisStatus};
    use std::sync::Arc;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            Ok(format!("收到 {} 行", prompt.lines().filter(|l| l.starts_with("- ")).count()))
        }
    }

    #[tokio::test]
    async fn test_analysis_without_key() {
        let app = TestApp::new();
        app.send(Method::POST, "/api/transactions", Some(entry("小王", "面膜")))
            .await;

        let (status, value) = app.send_json(Method::POST, "/api/analysis", None).await;
        assert_eq!(status, StatusCode::OK);
        let response: AnalysisResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.status, AnalysisStatus::MissingCredential);
        assert_eq!(response.text, MISSING_CREDENTIAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_analysis_with_generator() {
        let app = TestApp::with_generator(Some(Arc::new(EchoGenerator)));
        app.send(Method::POST, "/api/transactions", Some(entry("小王", "面膜")))
            .await;
        app.send(Method::POST, "/api/transactions", Some(entry("小李", "口红")))
            .await;

        let (_, value) = app.send_json(Method::POST, "/api/analysis", None).await;
        let response: AnalysisResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.status, AnalysisStatus::Completed);
        assert_eq!(response.text, "收到 2 行");
    }
}
