use crate::application::lending::{
    ServiceDependencies, add_book_to_catalog, borrow_book, calculate_late_fee, get_patron_status,
    list_catalog, pay_late_fees, refund_late_fee_payment, return_book, search_catalog,
};
use crate::domain::FeeResult;
use crate::domain::value_objects::BookId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::error::ApiError;
use super::types::{
    AddBookRequest, ListBooksQuery, LoanRequest, MessageResponse, PayFeesRequest,
    PaymentStatusResponse, RefundRequest,
};
use crate::application::lending::{
    BorrowReceipt, PatronStatusReport, ReturnReceipt, SettlementReceipt,
};
use crate::ports::catalog_store::Book;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub deps: ServiceDependencies,
}

// ============================================================================
// カタログ
// ============================================================================

/// POST /books - 書籍をカタログに追加
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message =
        add_book_to_catalog(&state.deps, &req.title, &req.author, &req.isbn, req.total_copies)
            .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(message))))
}

/// GET /books - カタログの一覧・検索
///
/// クエリパラメータ:
/// - search_term + search_type（title | author | isbn）で検索
/// - 未指定の場合は全件を返す
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = match (&query.search_term, &query.search_type) {
        (Some(term), Some(kind)) => search_catalog(&state.deps, term, kind).await?,
        _ => list_catalog(&state.deps).await?,
    };
    Ok(Json(books))
}

// ============================================================================
// 貸出・返却
// ============================================================================

/// POST /loans - 書籍を借りる
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanRequest>,
) -> Result<(StatusCode, Json<BorrowReceipt>), ApiError> {
    let receipt = borrow_book(
        &state.deps,
        &req.patron_id,
        BookId::new(req.book_id),
        chrono::Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /loans/return - 書籍を返却する
///
/// 受領書には延滞日数と料金が参考情報として含まれる（徴収はしない）。
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanRequest>,
) -> Result<Json<ReturnReceipt>, ApiError> {
    let receipt = return_book(
        &state.deps,
        &req.patron_id,
        BookId::new(req.book_id),
        chrono::Utc::now(),
    )
    .await?;
    Ok(Json(receipt))
}

// ============================================================================
// 料金・決済
// ============================================================================

/// GET /patrons/:patron_id/fees/:book_id - 延滞料金を照会
pub async fn get_late_fee(
    State(state): State<Arc<AppState>>,
    Path((patron_id, book_id)): Path<(String, i64)>,
) -> Result<Json<FeeResult>, ApiError> {
    let fee = calculate_late_fee(
        &state.deps,
        &patron_id,
        BookId::new(book_id),
        chrono::Utc::now(),
    )
    .await?;
    Ok(Json(fee))
}

/// GET /patrons/:patron_id/status - 利用者ステータスレポート
pub async fn patron_status(
    State(state): State<Arc<AppState>>,
    Path(patron_id): Path<String>,
) -> Result<Json<PatronStatusReport>, ApiError> {
    let report = get_patron_status(&state.deps, &patron_id, chrono::Utc::now()).await?;
    Ok(Json(report))
}

/// POST /payments - 延滞料金を決済
pub async fn pay_fees(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PayFeesRequest>,
) -> Result<Json<SettlementReceipt>, ApiError> {
    let receipt = pay_late_fees(
        &state.deps,
        &req.patron_id,
        BookId::new(req.book_id),
        chrono::Utc::now(),
    )
    .await?;
    Ok(Json(receipt))
}

/// POST /refunds - 決済を返金
pub async fn refund_fees(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefundRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = refund_late_fee_payment(&state.deps, &req.transaction_id, req.amount).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// GET /payments/:transaction_id - 決済ステータスを照会
pub async fn payment_status(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let status = state
        .deps
        .payment_gateway
        .verify_payment_status(&transaction_id)
        .await
        .map_err(crate::application::lending::SettlementError::PaymentProcessing)?;
    Ok(Json(PaymentStatusResponse::from(status)))
}
