use crate::application::lending::{CatalogError, LendingError, SettlementError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingError),
    Settlement(SettlementError),
    Catalog(CatalogError),
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        ApiError::Settlement(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Lending(err) => lending_response(err),
            ApiError::Settlement(err) => settlement_response(err),
            ApiError::Catalog(err) => catalog_response(err),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

fn lending_response(err: &LendingError) -> (StatusCode, &'static str, String) {
    match err {
        // 400 Bad Request - 入力バリデーション
        LendingError::InvalidPatronId => {
            (StatusCode::BAD_REQUEST, "INVALID_PATRON_ID", err.to_string())
        }

        // 404 Not Found - リソースが存在しない
        LendingError::BookNotFound => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", err.to_string()),

        // 422 Unprocessable Entity - ビジネスルール違反
        LendingError::BookUnavailable => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "BOOK_UNAVAILABLE",
            err.to_string(),
        ),
        LendingError::BorrowLimitExceeded => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "BORROW_LIMIT_EXCEEDED",
            err.to_string(),
        ),
        LendingError::NotBorrowed => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "NOT_BORROWED",
            err.to_string(),
        ),

        // 500 Internal Server Error - ストレージ障害
        // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        LendingError::Storage => {
            tracing::error!("catalog store mutation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", err.to_string())
        }
        LendingError::StoreError(e) => {
            tracing::error!("catalog store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "A database error occurred.".to_string(),
            )
        }
    }
}

fn settlement_response(err: &SettlementError) -> (StatusCode, &'static str, String) {
    match err {
        SettlementError::InvalidPatronId => {
            (StatusCode::BAD_REQUEST, "INVALID_PATRON_ID", err.to_string())
        }
        SettlementError::InvalidTransactionId => (
            StatusCode::BAD_REQUEST,
            "INVALID_TRANSACTION_ID",
            err.to_string(),
        ),
        SettlementError::BookNotFound => {
            (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", err.to_string())
        }
        SettlementError::NoLateFees => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "NO_LATE_FEES",
            err.to_string(),
        ),
        SettlementError::RefundAmountNotPositive | SettlementError::RefundAmountExceedsMaximum => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_REFUND_AMOUNT",
            err.to_string(),
        ),

        // 402 Payment Required - ゲートウェイによる拒否
        SettlementError::PaymentDeclined(_) => {
            (StatusCode::PAYMENT_REQUIRED, "PAYMENT_DECLINED", err.to_string())
        }
        SettlementError::RefundDeclined(_) => {
            (StatusCode::PAYMENT_REQUIRED, "REFUND_DECLINED", err.to_string())
        }

        SettlementError::PaymentProcessing(e) => {
            tracing::error!("payment gateway failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PAYMENT_PROCESSING_ERROR",
                "Payment processing error".to_string(),
            )
        }
        SettlementError::Lending(e) => lending_response(e),
    }
}

fn catalog_response(err: &CatalogError) -> (StatusCode, &'static str, String) {
    match err {
        // 400 Bad Request - 入力バリデーション
        CatalogError::TitleRequired
        | CatalogError::TitleTooLong
        | CatalogError::AuthorRequired
        | CatalogError::AuthorTooLong
        | CatalogError::IsbnWrongLength
        | CatalogError::IsbnNotNumeric
        | CatalogError::InvalidCopyCount => {
            (StatusCode::BAD_REQUEST, "INVALID_BOOK", err.to_string())
        }

        // 422 Unprocessable Entity - ISBN重複
        CatalogError::DuplicateIsbn => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DUPLICATE_ISBN",
            err.to_string(),
        ),

        CatalogError::Storage => {
            tracing::error!("catalog store mutation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", err.to_string())
        }
        CatalogError::StoreError(e) => {
            tracing::error!("catalog store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "A database error occurred.".to_string(),
            )
        }
    }
}
