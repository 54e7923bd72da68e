use crate::domain::value_objects::{BookId, PatronId};
use crate::domain::{FeeResult, assess_fee};
use chrono::{DateTime, Utc};

use super::errors::LendingError;
use super::lending_service::ServiceDependencies;

/// 延滞料金を計算する
///
/// 副作用なし。呼び出し時点のストア状態と入力から決定的に求まる。
/// ドメイン上の失敗（不正な利用者ID、貸出中レコードなし）は
/// `FeeResult`のステータスで表現され、エラーにはならない。
///
/// # エラー
/// カタログストアポートのI/Oエラーのみ
pub async fn calculate_late_fee(
    deps: &ServiceDependencies,
    patron_id: &str,
    book_id: BookId,
    now: DateTime<Utc>,
) -> Result<FeeResult, LendingError> {
    // 利用者IDのバリデーション（ストアアクセスより先）
    let Ok(patron) = PatronId::parse(patron_id) else {
        return Ok(FeeResult::invalid_patron());
    };

    // 貸出中レコードの確認（返却済みもここで弾かれる）
    let borrowed = deps
        .catalog_store
        .get_patron_borrowed_books(&patron)
        .await
        .map_err(LendingError::StoreError)?;

    let Some(record) = borrowed.iter().find(|b| b.book_id == book_id) else {
        return Ok(FeeResult::no_active_record());
    };

    Ok(assess_fee(record.due_date, now))
}
