use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ports::payment_gateway::PaymentStatus;

/// 書籍追加リクエスト（POST /books）
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
}

/// 貸出・返却リクエスト（POST /loans, POST /loans/return）
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub patron_id: String,
    pub book_id: i64,
}

/// 延滞料金決済リクエスト（POST /payments)
#[derive(Debug, Deserialize)]
pub struct PayFeesRequest {
    pub patron_id: String,
    pub book_id: i64,
}

/// 返金リクエスト（POST /refunds）
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Decimal,
}

/// 書籍一覧のクエリパラメータ
///
/// 両方指定された場合は検索、未指定の場合は全件を返す。
#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub search_term: Option<String>,
    pub search_type: Option<String>,
}

/// メッセージのみのレスポンス
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 決済ステータス照会のレスポンス
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PaymentStatus> for PaymentStatusResponse {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed { checked_at } => Self {
                status: "completed",
                timestamp: Some(checked_at),
                message: None,
            },
            PaymentStatus::NotFound { message } => Self {
                status: "not_found",
                timestamp: None,
                message: Some(message),
            },
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}
