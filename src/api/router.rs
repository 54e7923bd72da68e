use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, create_loan, get_late_fee, list_books, pay_fees, patron_status,
    payment_status, refund_fees, return_loan,
};

/// Creates the API router with all lending-ledger endpoints
///
/// Catalog:
/// - POST /books - Add a book to the catalog
/// - GET /books - List or search the catalog
///
/// Lending:
/// - POST /loans - Borrow a book
/// - POST /loans/return - Return a book
///
/// Fees and settlement:
/// - GET /patrons/:patron_id/fees/:book_id - Quote the late fee
/// - GET /patrons/:patron_id/status - Patron status report
/// - POST /payments - Pay late fees through the gateway
/// - POST /refunds - Refund a late-fee payment
/// - GET /payments/:transaction_id - Verify a payment
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/books", post(add_book).get(list_books))
        // Lending
        .route("/loans", post(create_loan))
        .route("/loans/return", post(return_loan))
        // Fees and settlement
        .route("/patrons/:patron_id/fees/:book_id", get(get_late_fee))
        .route("/patrons/:patron_id/status", get(patron_status))
        .route("/payments", post(pay_fees))
        .route("/payments/:transaction_id", get(payment_status))
        .route("/refunds", post(refund_fees))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
