//! Ledger analysis via an external text-generation service.
//!
//! A compact per-transaction summary is sent as context to a generative
//! model and the answer is shown as-is. The ledger never depends on the
//! outcome: a missing key refuses the request up front, and any failure of
//! the call turns into a fixed message. Only one request runs at a time.

use async_trait::async_trait;
use serde_json::json;
use shared::{AnalysisResponse, AnalysisStatus, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::country_policy::resolve_config;
use super::derivation::{derive, format_number};
use super::summary_service::aggregate;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "请先配置 API Key";
pub const ANALYSIS_FAILED_MESSAGE: &str = "分析失败，请稍后再试。";
pub const ANALYSIS_BUSY_MESSAGE: &str = "分析进行中，请稍候";
pub const NO_DATA_MESSAGE: &str = "暂无交易记录可供分析";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("empty response from model {0}")]
    EmptyResponse(String),
}

// Request URLs never reach logs through a wrapped error.
impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Network(err.without_url())
    }
}

/// Something that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Google Gemini `generateContent` over REST
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string(),
            model: model.to_string(),
        }
    }

    /// The `generateContent` call; the key travels in a header, not the URL
    fn build_request(&self, prompt: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/models/{}:generateContent", GEMINI_BASE_URL, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        self.client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let resp = self.build_request(prompt).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp.json().await?;
        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AnalysisError::EmptyResponse(self.model.clone()))
    }
}

/// One line per transaction plus the ledger totals, wrapped in the request
pub fn build_analysis_prompt(transactions: &[Transaction]) -> String {
    let mut prompt = String::from(
        "你是一位经验丰富的代购生意顾问。以下是我的代购交易记录\
         （国家 | 商品 | 数量 | 单件成本 | 成本汇率 | 售价 | 利润）：\n",
    );

    for transaction in transactions {
        let config = resolve_config(transaction.country);
        let derived = derive(transaction);
        prompt.push_str(&format!(
            "- {} | {} | {} | {}{} | {} | {} | {}\n",
            config.label,
            transaction.item_name,
            transaction.quantity,
            config.currency_symbol,
            format_number(transaction.cost_foreign),
            format_number(transaction.exchange_rate),
            format_number(transaction.price_sold),
            format_number(derived.total_profit),
        ));
    }

    let summary = aggregate(transactions);
    prompt.push_str(&format!(
        "汇总：总销售额 {}，总成本 {}，总利润 {}，商品件数 {}。\n",
        format_number(summary.total_sales),
        format_number(summary.total_cost),
        format_number(summary.total_profit),
        summary.item_count,
    ));
    prompt.push_str("请分析利润情况，指出利润最高和最低的商品，并给出三条简短的经营建议。");
    prompt
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct AnalysisService {
    generator: Option<Arc<dyn TextGenerator>>,
    busy: Arc<AtomicBool>,
}

impl AnalysisService {
    /// `None` means no credential is configured and every request is refused
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Gemini-backed service when a key is available
    pub fn from_api_key(api_key: Option<&str>, model: &str) -> Self {
        let generator = api_key
            .filter(|key| !key.trim().is_empty())
            .map(|key| Arc::new(GeminiGenerator::new(key, model)) as Arc<dyn TextGenerator>);
        if generator.is_none() {
            info!("No Gemini API key configured, analysis disabled");
        }
        Self::new(generator)
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Analyse a snapshot of the ledger
    pub async fn analyze(&self, transactions: &[Transaction]) -> AnalysisResponse {
        let Some(generator) = &self.generator else {
            return response(AnalysisStatus::MissingCredential, MISSING_CREDENTIAL_MESSAGE);
        };

        if transactions.is_empty() {
            return response(AnalysisStatus::NoData, NO_DATA_MESSAGE);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Analysis already running, request rejected");
            return response(AnalysisStatus::Busy, ANALYSIS_BUSY_MESSAGE);
        }
        let _guard = BusyGuard(&self.busy);

        info!("🤖 Requesting analysis of {} transactions", transactions.len());
        let prompt = build_analysis_prompt(transactions);
        match generator.generate(&prompt).await {
            Ok(text) => response(AnalysisStatus::Completed, &text),
            Err(e) => {
                error!("❌ Analysis failed: {}", e);
                response(AnalysisStatus::Failed, ANALYSIS_FAILED_MESSAGE)
            }
        }
    }
}

fn response(status: AnalysisStatus, text: &str) -> AnalysisResponse {
    AnalysisResponse {
        status,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Country;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct CannedGenerator {
        calls: AtomicUsize,
        answer: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("面膜"));
            match &self.answer {
                Some(answer) => Ok(answer.clone()),
                None => Err(AnalysisError::Api {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    struct BlockingGenerator {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl TextGenerator for BlockingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok("done".to_string())
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![Transaction {
            id: "a".to_string(),
            country: Some(Country::Kr),
            customer_name: "小王".to_string(),
            item_name: "面膜".to_string(),
            quantity: 2,
            cost_foreign: 1000.0,
            exchange_rate: 0.02,
            selling_exchange_rate: Some(0.035),
            price_sold: 30.0,
            date: "2024-05-01".to_string(),
        }]
    }

    #[test]
    fn test_gemini_key_sent_as_header() {
        let generator = GeminiGenerator::new(" 'SECRET123' ", "gemini-1.5-flash");
        let request = generator.build_request("你好").build().unwrap();

        assert!(request
            .url()
            .as_str()
            .ends_with("/models/gemini-1.5-flash:generateContent"));
        assert!(!request.url().as_str().contains("SECRET123"));
        assert_eq!(request.headers()[API_KEY_HEADER], "SECRET123");
    }

    #[tokio::test]
    async fn test_network_error_hides_url() {
        let err = reqwest::Client::new()
            .post("http://127.0.0.1:9/v1beta/models/m:generateContent?key=SECRET123")
            .send()
            .await
            .unwrap_err();

        let rendered = AnalysisError::from(err).to_string();
        assert!(rendered.starts_with("network error"));
        assert!(!rendered.contains("SECRET123"));
        assert!(!rendered.contains("127.0.0.1"));
    }

    #[test]
    fn test_prompt_contains_derived_profit() {
        let prompt = build_analysis_prompt(&ledger());
        assert!(prompt.contains("- 韩国 | 面膜 | 2 | ₩1000 | 0.02 | 30 | 20\n"));
        assert!(prompt.contains("总利润 20"));
        assert!(!prompt.contains("小王"));
    }

    #[tokio::test]
    async fn test_missing_credential_refuses() {
        let service = AnalysisService::from_api_key(Some("  "), "gemini-1.5-flash");
        assert!(!service.is_configured());

        let result = service.analyze(&ledger()).await;
        assert_eq!(result.status, AnalysisStatus::MissingCredential);
        assert_eq!(result.text, MISSING_CREDENTIAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_completed_analysis() {
        let generator = Arc::new(CannedGenerator {
            calls: AtomicUsize::new(0),
            answer: Some("利润不错".to_string()),
        });
        let service = AnalysisService::new(Some(generator.clone()));

        let result = service.analyze(&ledger()).await;
        assert_eq!(result.status, AnalysisStatus::Completed);
        assert_eq!(result.text, "利润不错");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_failure_degrades_to_fixed_text() {
        let generator = Arc::new(CannedGenerator {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let service = AnalysisService::new(Some(generator));

        let result = service.analyze(&ledger()).await;
        assert_eq!(result.status, AnalysisStatus::Failed);
        assert_eq!(result.text, ANALYSIS_FAILED_MESSAGE);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_empty_ledger_is_not_sent() {
        let generator = Arc::new(CannedGenerator {
            calls: AtomicUsize::new(0),
            answer: Some("x".to_string()),
        });
        let service = AnalysisService::new(Some(generator.clone()));

        let result = service.analyze(&[]).await;
        assert_eq!(result.status, AnalysisStatus::NoData);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_request_rejected_while_busy() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let service = AnalysisService::new(Some(Arc::new(BlockingGenerator {
            started: started.clone(),
            release: release.clone(),
        })));

        let first = {
            let service = service.clone();
            tokio::spawn(async move {
                let transactions = ledger();
                service.analyze(&transactions).await
            })
        };

        started.notified().await;
        assert!(service.is_busy());
        let second = service.analyze(&ledger()).await;
        assert_eq!(second.status, AnalysisStatus::Busy);

        release.notify_one();
        let first = first.await.unwrap();
        assert_eq!(first.status, AnalysisStatus::Completed);
        assert!(!service.is_busy());
    }
}
