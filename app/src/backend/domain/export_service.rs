//! Export service domain logic for the ledger.
//!
//! Two renderings of the same derived data:
//! - clipboard text: tab-separated, newest first, ready to paste into a spreadsheet
//! - CSV file: comma-separated, oldest first, text fields quoted, UTF-8 BOM in front
//!
//! Both go through [`derive`], so they agree with the ledger table on every figure.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use shared::{ExportDataResponse, ExportToPathRequest, ExportToPathResponse, Transaction};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

use super::country_policy::resolve_config;
use super::derivation::{derive, format_number};

/// Fixed prefix of the exported file name
pub const EXPORT_FILENAME_PREFIX: &str = "代购账本";

const CLIPBOARD_HEADER: [&str; 11] = [
    "日期", "国家", "客户", "商品", "数量", "外币成本", "成本汇率", "售价汇率", "人民币成本", "售价", "总利润",
];

const CSV_HEADER: [&str; 12] = [
    "日期", "国家", "客户", "商品", "数量", "外币成本", "成本汇率", "售价汇率", "人民币成本", "售价", "单件利润", "总利润",
];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Format a stored `YYYY-MM-DD` date the way a zh-CN locale shows it: `2024/5/1`.
/// Anything that is not a date is passed through unchanged.
pub fn localized_date(date: &str) -> String {
    let trimmed = date.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(parsed) => format!("{}/{}/{}", parsed.year(), parsed.month(), parsed.day()),
        Err(_) => date.to_string(),
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Export service that renders and writes ledger exports
#[derive(Clone, Default)]
pub struct ExportService {
    default_directory: Option<PathBuf>,
}

impl ExportService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `directory` when an export to path does not name one
    pub fn with_default_directory(directory: Option<PathBuf>) -> Self {
        Self {
            default_directory: directory,
        }
    }

    /// Tab-separated clipboard text, newest first
    pub fn render_clipboard(&self, transactions: &[Transaction]) -> String {
        let mut lines = Vec::with_capacity(transactions.len() + 1);
        lines.push(CLIPBOARD_HEADER.join("\t"));

        for transaction in transactions.iter().rev() {
            let config = resolve_config(transaction.country);
            let derived = derive(transaction);
            let selling_rate = transaction
                .selling_exchange_rate
                .map(format_number)
                .unwrap_or_else(|| "-".to_string());

            let row = [
                localized_date(&transaction.date),
                config.label.to_string(),
                transaction.customer_name.clone(),
                transaction.item_name.clone(),
                transaction.quantity.to_string(),
                format!("{}{}", config.currency_symbol, format_number(transaction.cost_foreign)),
                format_number(transaction.exchange_rate),
                selling_rate,
                format!("${}", format_number(derived.unit_local_cost)),
                format!("${}", format_number(transaction.price_sold)),
                format!("${}", format_number(derived.total_profit)),
            ];
            lines.push(row.join("\t"));
        }

        lines.join("\n")
    }

    /// Comma-separated file content, oldest first, with a leading byte-order mark
    pub fn render_csv(&self, transactions: &[Transaction]) -> String {
        let mut csv_content = String::new();
        csv_content.push(BYTE_ORDER_MARK);
        csv_content.push_str(&CSV_HEADER.join(","));
        csv_content.push('\n');

        for transaction in transactions {
            let config = resolve_config(transaction.country);
            let derived = derive(transaction);

            let row = [
                quote(&transaction.date),
                quote(config.label),
                quote(&transaction.customer_name),
                quote(&transaction.item_name),
                transaction.quantity.to_string(),
                format_number(transaction.cost_foreign),
                format_number(transaction.exchange_rate),
                transaction
                    .selling_exchange_rate
                    .map(format_number)
                    .unwrap_or_default(),
                format_number(derived.unit_local_cost),
                format_number(transaction.price_sold),
                format_number(derived.unit_profit),
                format_number(derived.total_profit),
            ];
            csv_content.push_str(&row.join(","));
            csv_content.push('\n');
        }

        csv_content
    }

    /// `代购账本_<YYYY-MM-DD>.csv`
    pub fn export_filename(&self, today: NaiveDate) -> String {
        format!("{}_{}.csv", EXPORT_FILENAME_PREFIX, today.format("%Y-%m-%d"))
    }

    /// Build the CSV export for download
    pub fn export_transactions_csv(
        &self,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> ExportDataResponse {
        info!("📄 EXPORT: Exporting {} transactions as CSV", transactions.len());

        let response = ExportDataResponse {
            content: self.render_csv(transactions),
            filename: self.export_filename(today),
            transaction_count: transactions.len(),
        };

        info!(
            "✅ EXPORT: Generated CSV content ({} bytes) with filename: {}",
            response.content.len(),
            response.filename
        );
        response
    }

    /// Write the CSV export into a directory. Failures come back in the response.
    pub fn export_to_path(
        &self,
        request: ExportToPathRequest,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> ExportToPathResponse {
        info!("📁 EXPORT: Exporting to path - custom_path: {:?}", request.custom_path);

        let export = self.export_transactions_csv(transactions, today);

        let export_dir = match self.resolve_export_directory(request.custom_path.as_deref()) {
            Ok(dir) => dir,
            Err(e) => {
                error!("❌ EXPORT: Could not determine export directory: {}", e);
                return ExportToPathResponse {
                    success: false,
                    message: "Failed to determine export directory".to_string(),
                    file_path: String::new(),
                    transaction_count: 0,
                };
            }
        };

        let file_path = export_dir.join(&export.filename);

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            return ExportToPathResponse {
                success: false,
                message: format!("Failed to create export directory: {}", e),
                file_path: export_dir.to_string_lossy().to_string(),
                transaction_count: 0,
            };
        }

        match fs::write(&file_path, &export.content) {
            Ok(_) => {
                let file_path_str = file_path.to_string_lossy().to_string();
                info!(
                    "✅ EXPORT: Successfully exported {} transactions to: {}",
                    export.transaction_count, file_path_str
                );
                ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    transaction_count: export.transaction_count,
                }
            }
            Err(e) => {
                error!("❌ EXPORT: Failed to write export file to {:?}: {}", file_path, e);
                ExportToPathResponse {
                    success: false,
                    message: format!("Failed to write export file: {}", e),
                    file_path: file_path.to_string_lossy().to_string(),
                    transaction_count: 0,
                }
            }
        }
    }

    fn resolve_export_directory(&self, custom_path: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = custom_path.filter(|p| !p.trim().is_empty()) {
            return Ok(clean_export_path(path));
        }
        if let Some(dir) = &self.default_directory {
            return Ok(dir.clone());
        }
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("no documents or home directory"))
    }
}

/// Tidy a directory pasted by the user: strip quotes and trailing separators,
/// then expand a leading `~` to the home directory.
fn clean_export_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| trimmed.strip_prefix(*q)?.strip_suffix(*q))
        .map(str::trim)
        .unwrap_or(trimmed);
    let unescaped = unquoted.replace("\\ ", " ");

    let mut cleaned = unescaped.trim_end_matches(['/', '\\']);
    if cleaned.is_empty() && !unescaped.is_empty() {
        // A bare root keeps its separator
        cleaned = &unescaped[..1];
    }

    // `~user` is left alone
    match (cleaned.strip_prefix('~'), dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => home.join(&rest[1..]),
        _ => PathBuf::from(cleaned),
    }
}
