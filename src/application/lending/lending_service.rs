use crate::domain::value_objects::{BookId, PatronId};
use crate::domain::{FeeResult, FeeStatus, assess_fee};
use crate::ports::catalog_store::CatalogStore;
use crate::ports::payment_gateway::PaymentGateway;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::errors::LendingError;

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 利用者1人あたりの最大貸出冊数
pub const MAX_ACTIVE_BORROWS: usize = 5;

/// サービスの依存関係
///
/// 関数型の原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog_store: Arc<dyn CatalogStore>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
}

/// 貸出成功の受領書
#[derive(Debug, Clone, Serialize)]
pub struct BorrowReceipt {
    pub book_id: BookId,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub message: String,
}

/// 返却成功の受領書
///
/// 料金は参考情報であり、ここでは徴収されない。
#[derive(Debug, Clone, Serialize)]
pub struct ReturnReceipt {
    pub book_id: BookId,
    pub title: String,
    pub fee: FeeResult,
    pub message: String,
}

/// 書籍を借りる
///
/// ビジネスルール：
/// - 利用者IDは数字6文字であること
/// - 書籍が存在し、貸出可能な在庫があること
/// - 利用者の貸出中冊数が5冊未満であること
/// - 返却期限は貸出日 + 14日
///
/// 貸出レコードの挿入とavailable_copiesの減算は、ストアの
/// 1つのトランザクション境界で実行される。
pub async fn borrow_book(
    deps: &ServiceDependencies,
    patron_id: &str,
    book_id: BookId,
    now: DateTime<Utc>,
) -> Result<BorrowReceipt, LendingError> {
    // 1. 利用者IDのバリデーション（ストアアクセスより先）
    let patron = PatronId::parse(patron_id).map_err(|_| LendingError::InvalidPatronId)?;

    // 2. 書籍の存在と在庫の確認
    let book = deps
        .catalog_store
        .get_book_by_id(book_id)
        .await
        .map_err(LendingError::StoreError)?
        .ok_or(LendingError::BookNotFound)?;

    if book.available_copies == 0 {
        return Err(LendingError::BookUnavailable);
    }

    // 3. 貸出上限の確認（5冊まで）
    let current_borrowed = deps
        .catalog_store
        .get_patron_borrow_count(&patron)
        .await
        .map_err(LendingError::StoreError)?;

    if current_borrowed >= MAX_ACTIVE_BORROWS {
        return Err(LendingError::BorrowLimitExceeded);
    }

    // 4. 貸出を記録（レコード挿入 + 在庫減算を1トランザクションで）
    let due_date = now + Duration::days(LOAN_PERIOD_DAYS);
    let committed = deps
        .catalog_store
        .record_borrow(&patron, book_id, now, due_date)
        .await
        .map_err(LendingError::StoreError)?;

    if !committed {
        return Err(LendingError::Storage);
    }

    tracing::info!(patron_id = %patron, %book_id, %due_date, "book borrowed");

    Ok(BorrowReceipt {
        book_id,
        message: format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            book.title,
            due_date.format("%Y-%m-%d")
        ),
        title: book.title,
        due_date,
    })
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 利用者IDは数字6文字であること
/// - この利用者が貸出中のレコードが存在すること
/// - 延滞していても返却は受け付ける（料金は参考情報として報告）
///
/// 料金はレコードを閉じる前の期限から算出する。閉じた後に
/// 再計算すると貸出中レコードが見つからず、常に0になってしまう。
pub async fn return_book(
    deps: &ServiceDependencies,
    patron_id: &str,
    book_id: BookId,
    now: DateTime<Utc>,
) -> Result<ReturnReceipt, LendingError> {
    // 1. 利用者IDのバリデーション
    let patron = PatronId::parse(patron_id).map_err(|_| LendingError::InvalidPatronId)?;

    // 2. 書籍の存在確認
    let book = deps
        .catalog_store
        .get_book_by_id(book_id)
        .await
        .map_err(LendingError::StoreError)?
        .ok_or(LendingError::BookNotFound)?;

    // 3. 貸出中レコードの確認
    let borrowed = deps
        .catalog_store
        .get_patron_borrowed_books(&patron)
        .await
        .map_err(LendingError::StoreError)?;

    let record = borrowed
        .iter()
        .find(|b| b.book_id == book_id)
        .ok_or(LendingError::NotBorrowed)?;

    let fee = assess_fee(record.due_date, now);

    // 4. 返却を記録（return_date設定 + 在庫加算を1トランザクションで）
    let committed = deps
        .catalog_store
        .record_return(&patron, book_id, now)
        .await
        .map_err(LendingError::StoreError)?;

    if !committed {
        return Err(LendingError::Storage);
    }

    tracing::info!(patron_id = %patron, %book_id, days_overdue = fee.days_overdue, "book returned");

    let message = if fee.status == FeeStatus::Calculated {
        format!(
            "Book: \"{}\" returned successfully. Late by: {} day(s). Fee: ${:.2}.",
            book.title, fee.days_overdue, fee.fee_amount
        )
    } else {
        format!("Book: \"{}\" returned successfully. No late fees.", book.title)
    };

    Ok(ReturnReceipt {
        book_id,
        title: book.title,
        fee,
        message,
    })
}
