use crate::domain::value_objects::PatronId;
use crate::domain::{assess_fee, overdue_days};
use crate::ports::catalog_store::{BorrowHistoryEntry, BorrowedBook};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::LendingError;
use super::lending_service::ServiceDependencies;

/// 利用者ステータスレポート
///
/// 読み取り専用の合成ビュー。貸出中の一覧、発生中の延滞料金合計、
/// および全貸出履歴（新しい順）を含む。
#[derive(Debug, Clone, Serialize)]
pub struct PatronStatusReport {
    pub patron_id: PatronId,
    pub borrowed_count: usize,
    pub currently_borrowed: Vec<BorrowedBook>,
    /// 貸出中の各書籍の延滞料金の合計（小数点以下2桁）
    pub total_late_fees: Decimal,
    /// borrow_dateの降順（新しい順）
    pub borrowing_history: Vec<BorrowHistoryEntry>,
}

/// 利用者のステータスレポートを取得する
///
/// 貸出中の各レコードについて料金計算を行い、合計する。
/// 副作用なし。
pub async fn get_patron_status(
    deps: &ServiceDependencies,
    patron_id: &str,
    now: DateTime<Utc>,
) -> Result<PatronStatusReport, LendingError> {
    let patron = PatronId::parse(patron_id).map_err(|_| LendingError::InvalidPatronId)?;

    let currently_borrowed = deps
        .catalog_store
        .get_patron_borrowed_books(&patron)
        .await
        .map_err(LendingError::StoreError)?;

    let total_late_fees: Decimal = currently_borrowed
        .iter()
        .filter(|b| overdue_days(b.due_date, now) > 0)
        .map(|b| assess_fee(b.due_date, now).fee_amount)
        .sum::<Decimal>()
        .round_dp(2);

    let borrowing_history = deps
        .catalog_store
        .get_patron_borrow_history(&patron)
        .await
        .map_err(LendingError::StoreError)?;

    Ok(PatronStatusReport {
        patron_id: patron,
        borrowed_count: currently_borrowed.len(),
        currently_borrowed,
        total_late_fees,
        borrowing_history,
    })
}
