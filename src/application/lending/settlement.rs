use crate::domain::value_objects::{BookId, PatronId, TransactionId};
use crate::domain::{FeeResult, MAX_LATE_FEE};
use crate::ports::payment_gateway::{PaymentDecision, RefundDecision};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::SettlementError;
use super::fee_service::calculate_late_fee;
use super::lending_service::ServiceDependencies;

/// 決済成功の受領書
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReceipt {
    pub transaction_id: TransactionId,
    pub fee: FeeResult,
    pub message: String,
}

/// 延滞料金を決済する
///
/// ビジネスルール：
/// - 利用者IDが不正な場合、ゲートウェイは呼び出されない
/// - 料金が0の場合、ゲートウェイは呼び出されない
/// - ゲートウェイの呼び出しはちょうど1回（リトライなし）
/// - ゲートウェイの拒否は通常の失敗、予期しない障害は
///   「決済処理エラー」としてここで捕捉される
pub async fn pay_late_fees(
    deps: &ServiceDependencies,
    patron_id: &str,
    book_id: BookId,
    now: DateTime<Utc>,
) -> Result<SettlementReceipt, SettlementError> {
    // 1. 利用者IDのバリデーション（ゲートウェイ呼び出しより先）
    let patron = PatronId::parse(patron_id).map_err(|_| SettlementError::InvalidPatronId)?;

    // 2. 料金の計算。0なら決済すべきものがない
    let fee = calculate_late_fee(deps, patron_id, book_id, now).await?;
    if fee.fee_amount.is_zero() {
        return Err(SettlementError::NoLateFees);
    }

    // 3. 明細用の書籍タイトルを解決
    let book = deps
        .catalog_store
        .get_book_by_id(book_id)
        .await
        .map_err(|e| SettlementError::Lending(super::errors::LendingError::StoreError(e)))?
        .ok_or(SettlementError::BookNotFound)?;

    let description = format!("Late fees for '{}'", book.title);

    // 4. ゲートウェイをちょうど1回呼び出す
    let decision = deps
        .payment_gateway
        .process_payment(patron.as_str(), fee.fee_amount, &description)
        .await;

    match decision {
        Ok(PaymentDecision::Approved {
            transaction_id,
            message,
        }) => {
            tracing::info!(patron_id = %patron, %transaction_id, amount = %fee.fee_amount, "late fee settled");
            Ok(SettlementReceipt {
                message: format!("Payment successful! {}", message),
                transaction_id,
                fee,
            })
        }
        Ok(PaymentDecision::Declined { message }) => {
            tracing::warn!(patron_id = %patron, "payment declined: {}", message);
            Err(SettlementError::PaymentDeclined(message))
        }
        Err(e) => {
            tracing::error!(patron_id = %patron, error = %e, "payment gateway failure");
            Err(SettlementError::PaymentProcessing(e))
        }
    }
}

/// 延滞料金の決済を返金する
///
/// ビジネスルール：
/// - トランザクションIDの形式が不正な場合、ゲートウェイは呼び出されない
/// - 金額は0より大きく、延滞料金の上限（15.00）以下であること
/// - ゲートウェイへの委譲はちょうど1回
///
/// 元の決済額との照合は行わない（ゲートウェイはレジを持たない）。
pub async fn refund_late_fee_payment(
    deps: &ServiceDependencies,
    transaction_id: &str,
    amount: Decimal,
) -> Result<String, SettlementError> {
    // 1. トランザクションIDのバリデーション
    let transaction =
        TransactionId::parse(transaction_id).map_err(|_| SettlementError::InvalidTransactionId)?;

    // 2. 金額のバリデーション
    if amount <= Decimal::ZERO {
        return Err(SettlementError::RefundAmountNotPositive);
    }
    if amount > MAX_LATE_FEE {
        return Err(SettlementError::RefundAmountExceedsMaximum);
    }

    // 3. ゲートウェイに委譲し、結果をそのまま伝える
    let decision = deps
        .payment_gateway
        .refund_payment(transaction.as_str(), amount)
        .await;

    match decision {
        Ok(RefundDecision::Approved { message }) => {
            tracing::info!(transaction_id = %transaction, %amount, "late fee refunded");
            Ok(message)
        }
        Ok(RefundDecision::Declined { message }) => {
            tracing::warn!(transaction_id = %transaction, "refund declined: {}", message);
            Err(SettlementError::RefundDeclined(message))
        }
        Err(e) => {
            tracing::error!(transaction_id = %transaction, error = %e, "payment gateway failure");
            Err(SettlementError::PaymentProcessing(e))
        }
    }
}
