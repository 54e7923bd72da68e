use chrono::{DateTime, Duration, Utc};
use lending_ledger::adapters::memory::InMemoryCatalogStore;
use lending_ledger::adapters::mock::MockPaymentGateway;
use lending_ledger::application::lending::{
    CatalogError, LOAN_PERIOD_DAYS, LendingError, ServiceDependencies, add_book_to_catalog,
    borrow_book, calculate_late_fee, get_patron_status, return_book,
};
use lending_ledger::domain::FeeStatus;
use lending_ledger::domain::value_objects::{BookId, Isbn, PatronId};
use lending_ledger::ports::catalog_store::{
    Book, BorrowHistoryEntry, BorrowedBook, CatalogStore, Result as StoreResult, SearchKind,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

// ============================================================================
// テストヘルパー
// ============================================================================

/// インメモリストアとモックゲートウェイで依存関係を組み立てる
fn setup_deps() -> (ServiceDependencies, Arc<InMemoryCatalogStore>) {
    let catalog_store = Arc::new(InMemoryCatalogStore::new());
    let deps = ServiceDependencies {
        catalog_store: catalog_store.clone(),
        payment_gateway: Arc::new(MockPaymentGateway::new()),
    };
    (deps, catalog_store)
}

/// 書籍を追加してIDを返す
async fn seed_book(deps: &ServiceDependencies, title: &str, isbn: &str, copies: u32) -> BookId {
    add_book_to_catalog(deps, title, "Test Author", isbn, copies)
        .await
        .expect("failed to seed book");
    let isbn = Isbn::parse(isbn).unwrap();
    deps.catalog_store
        .get_book_by_isbn(&isbn)
        .await
        .unwrap()
        .expect("seeded book not found")
        .id
}

async fn available_copies(deps: &ServiceDependencies, book_id: BookId) -> u32 {
    deps.catalog_store
        .get_book_by_id(book_id)
        .await
        .unwrap()
        .unwrap()
        .available_copies
}

// ============================================================================
// 貸出のテスト
// ============================================================================

#[tokio::test]
async fn test_borrow_book_success_decrements_available_copies() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;
    let now = Utc::now();

    let result = borrow_book(&deps, "100001", book_id, now).await;

    assert!(result.is_ok());
    let receipt = result.unwrap();
    assert_eq!(receipt.due_date, now + Duration::days(LOAN_PERIOD_DAYS));
    assert!(receipt.message.contains("Successfully borrowed \"1984\""));
    assert_eq!(available_copies(&deps, book_id).await, 2);
}

#[tokio::test]
async fn test_borrow_book_invalid_patron_id() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;

    for bad_id in ["ABC123", "12345", "1234567", ""] {
        let result = borrow_book(&deps, bad_id, book_id, Utc::now()).await;
        assert!(matches!(result, Err(LendingError::InvalidPatronId)));
    }

    // バリデーションで弾かれた呼び出しはストアを変更しない
    assert_eq!(available_copies(&deps, book_id).await, 3);
}

#[tokio::test]
async fn test_borrow_book_not_found() {
    let (deps, _) = setup_deps();

    let result = borrow_book(&deps, "100001", BookId::new(999), Utc::now()).await;

    assert!(matches!(result, Err(LendingError::BookNotFound)));
}

#[tokio::test]
async fn test_borrow_book_unavailable_when_no_copies_left() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "Rare Book", "1111111111111", 1).await;

    borrow_book(&deps, "100001", book_id, Utc::now()).await.unwrap();
    let result = borrow_book(&deps, "100002", book_id, Utc::now()).await;

    assert!(matches!(result, Err(LendingError::BookUnavailable)));
    assert_eq!(available_copies(&deps, book_id).await, 0);
}

#[tokio::test]
async fn test_borrow_limit_refused_at_five_active_loans() {
    let (deps, _) = setup_deps();
    let now = Utc::now();

    // 6冊の書籍を用意
    let mut book_ids = Vec::new();
    for i in 0..6 {
        let isbn = format!("900000000000{}", i);
        book_ids.push(seed_book(&deps, &format!("Book {}", i), &isbn, 1).await);
    }

    // 4冊借りている利用者は5冊目を借りられる
    for book_id in &book_ids[..4] {
        borrow_book(&deps, "100001", *book_id, now).await.unwrap();
    }
    let fifth = borrow_book(&deps, "100001", book_ids[4], now).await;
    assert!(fifth.is_ok());

    // 5冊借りている利用者は6冊目を拒否される
    let sixth = borrow_book(&deps, "100001", book_ids[5], now).await;
    assert!(matches!(sixth, Err(LendingError::BorrowLimitExceeded)));

    // 拒否された貸出は在庫を変更しない
    assert_eq!(available_copies(&deps, book_ids[5]).await, 1);
}

// ============================================================================
// 返却のテスト
// ============================================================================

#[tokio::test]
async fn test_return_restores_available_copies() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;
    let now = Utc::now();

    borrow_book(&deps, "100001", book_id, now).await.unwrap();
    assert_eq!(available_copies(&deps, book_id).await, 2);

    // 同日返却：延滞なし
    let result = return_book(&deps, "100001", book_id, now).await;

    assert!(result.is_ok());
    let receipt = result.unwrap();
    assert_eq!(receipt.fee.fee_amount, Decimal::ZERO);
    assert_eq!(receipt.fee.days_overdue, 0);
    assert!(receipt.message.contains("No late fees"));
    // 貸出前の在庫に戻る
    assert_eq!(available_copies(&deps, book_id).await, 3);
}

#[tokio::test]
async fn test_return_fails_when_not_borrowed() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;
    let now = Utc::now();

    borrow_book(&deps, "100001", book_id, now).await.unwrap();
    return_book(&deps, "100001", book_id, now).await.unwrap();

    // 2回目の返却は失敗
    let result = return_book(&deps, "100001", book_id, now).await;
    assert!(matches!(result, Err(LendingError::NotBorrowed)));

    // 在庫は二重に増えない
    assert_eq!(available_copies(&deps, book_id).await, 3);
}

#[tokio::test]
async fn test_return_overdue_reports_fee_in_message() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;

    // 20日前に借りた：期限は6日前
    let borrowed_at = Utc::now() - Duration::days(20);
    borrow_book(&deps, "100001", book_id, borrowed_at).await.unwrap();

    let result = return_book(&deps, "100001", book_id, Utc::now()).await;

    assert!(result.is_ok());
    let receipt = result.unwrap();
    assert_eq!(receipt.fee.days_overdue, 6);
    assert_eq!(receipt.fee.fee_amount, dec!(3.00));
    assert_eq!(receipt.fee.status, FeeStatus::Calculated);
    assert!(receipt.message.contains("Late by: 6 day(s)"));
    assert!(receipt.message.contains("Fee: $3.00"));
}

// ============================================================================
// 料金計算のテスト
// ============================================================================

#[tokio::test]
async fn test_calculate_late_fee_invalid_patron() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;

    let fee = calculate_late_fee(&deps, "bad", book_id, Utc::now()).await.unwrap();

    assert_eq!(fee.status, FeeStatus::InvalidPatron);
    assert_eq!(fee.fee_amount, Decimal::ZERO);
    assert_eq!(fee.days_overdue, 0);
}

#[tokio::test]
async fn test_calculate_late_fee_no_active_record() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;

    // 借りていない
    let fee = calculate_late_fee(&deps, "100001", book_id, Utc::now()).await.unwrap();
    assert_eq!(fee.status, FeeStatus::NoActiveRecord);

    // 返却済みも同じステータスになる
    let now = Utc::now();
    borrow_book(&deps, "100001", book_id, now).await.unwrap();
    return_book(&deps, "100001", book_id, now).await.unwrap();
    let fee = calculate_late_fee(&deps, "100001", book_id, Utc::now()).await.unwrap();
    assert_eq!(fee.status, FeeStatus::NoActiveRecord);
    assert_eq!(fee.fee_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_calculate_late_fee_not_overdue() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;
    let now = Utc::now();

    borrow_book(&deps, "100001", book_id, now).await.unwrap();
    let fee = calculate_late_fee(&deps, "100001", book_id, now).await.unwrap();

    assert_eq!(fee.status, FeeStatus::NotOverdue);
    assert_eq!(fee.fee_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_calculate_late_fee_overdue_tiers() {
    let (deps, _) = setup_deps();
    let book_id = seed_book(&deps, "1984", "1234567890123", 3).await;
    let now = Utc::now();

    // 期限の10日後：7日×0.50 + 3日×1.00 = 6.50
    borrow_book(&deps, "100001", book_id, now - Duration::days(LOAN_PERIOD_DAYS + 10))
        .await
        .unwrap();

    let fee = calculate_late_fee(&deps, "100001", book_id, now).await.unwrap();

    assert_eq!(fee.status, FeeStatus::Calculated);
    assert_eq!(fee.days_overdue, 10);
    assert_eq!(fee.fee_amount, dec!(6.50));
}

// ============================================================================
// ステータスレポートのテスト
// ============================================================================

#[tokio::test]
async fn test_patron_status_report() {
    let (deps, _) = setup_deps();
    let now = Utc::now();

    let overdue_book = seed_book(&deps, "Old Loan", "2222222222222", 2).await;
    let fresh_book = seed_book(&deps, "New Loan", "3333333333333", 2).await;
    let returned_book = seed_book(&deps, "Done", "4444444444444", 2).await;

    // 30日前の貸出：期限の16日後 → 3.50 + 9.00 = 12.50
    borrow_book(&deps, "100001", overdue_book, now - Duration::days(30)).await.unwrap();
    // 返却済みの貸出は履歴にだけ残る
    borrow_book(&deps, "100001", returned_book, now - Duration::days(10)).await.unwrap();
    return_book(&deps, "100001", returned_book, now - Duration::days(5)).await.unwrap();
    // 当日の貸出：延滞なし
    borrow_book(&deps, "100001", fresh_book, now).await.unwrap();

    let report = get_patron_status(&deps, "100001", now).await.unwrap();

    assert_eq!(report.borrowed_count, 2);
    assert_eq!(report.currently_borrowed.len(), 2);
    assert_eq!(report.total_late_fees, dec!(12.50));

    // 履歴は全貸出を含み、新しい順に並ぶ
    assert_eq!(report.borrowing_history.len(), 3);
    assert_eq!(report.borrowing_history[0].book_id, fresh_book);
    assert_eq!(report.borrowing_history[1].book_id, returned_book);
    assert_eq!(report.borrowing_history[2].book_id, overdue_book);
    assert!(report.borrowing_history[1].return_date.is_some());
}

#[tokio::test]
async fn test_patron_status_invalid_patron_id() {
    let (deps, _) = setup_deps();

    let result = get_patron_status(&deps, "not-an-id", Utc::now()).await;

    assert!(matches!(result, Err(LendingError::InvalidPatronId)));
}

// ============================================================================
// ストレージ障害のテスト
// ============================================================================

/// ミューテータが常にfalseを返すストア
///
/// 読み取りは内部のインメモリストアに委譲し、書き込みだけが
/// ストレージ障害として失敗する。
struct FailingWriteStore {
    inner: InMemoryCatalogStore,
}

#[async_trait::async_trait]
impl CatalogStore for FailingWriteStore {
    async fn get_book_by_id(&self, book_id: BookId) -> StoreResult<Option<Book>> {
        self.inner.get_book_by_id(book_id).await
    }

    async fn get_book_by_isbn(&self, isbn: &Isbn) -> StoreResult<Option<Book>> {
        self.inner.get_book_by_isbn(isbn).await
    }

    async fn get_all_books(&self) -> StoreResult<Vec<Book>> {
        self.inner.get_all_books().await
    }

    async fn search_books(&self, kind: SearchKind, term: &str) -> StoreResult<Vec<Book>> {
        self.inner.search_books(kind, term).await
    }

    async fn insert_book(
        &self,
        _title: &str,
        _author: &str,
        _isbn: &Isbn,
        _total_copies: u32,
        _available_copies: u32,
    ) -> StoreResult<bool> {
        Ok(false)
    }

    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> StoreResult<usize> {
        self.inner.get_patron_borrow_count(patron_id).await
    }

    async fn get_patron_borrowed_books(
        &self,
        patron_id: &PatronId,
    ) -> StoreResult<Vec<BorrowedBook>> {
        self.inner.get_patron_borrowed_books(patron_id).await
    }

    async fn get_patron_borrow_history(
        &self,
        patron_id: &PatronId,
    ) -> StoreResult<Vec<BorrowHistoryEntry>> {
        self.inner.get_patron_borrow_history(patron_id).await
    }

    async fn record_borrow(
        &self,
        _patron_id: &PatronId,
        _book_id: BookId,
        _borrow_date: DateTime<Utc>,
        _due_date: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Ok(false)
    }

    async fn record_return(
        &self,
        _patron_id: &PatronId,
        _book_id: BookId,
        _return_date: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Ok(false)
    }
}

/// 障害ストアの依存関係を組み立てる
///
/// 内部ストアに書籍を1冊用意し、エンジンの事前チェックを
/// 通過した先でミューテータが失敗する状態を作る。
async fn setup_failing_deps() -> (ServiceDependencies, BookId) {
    let inner = InMemoryCatalogStore::new();
    let isbn = Isbn::parse("1234567890123").unwrap();
    inner
        .insert_book("1984", "George Orwell", &isbn, 3, 3)
        .await
        .unwrap();
    let book_id = inner.get_book_by_isbn(&isbn).await.unwrap().unwrap().id;

    let deps = ServiceDependencies {
        catalog_store: Arc::new(FailingWriteStore { inner }),
        payment_gateway: Arc::new(MockPaymentGateway::new()),
    };
    (deps, book_id)
}

#[tokio::test]
async fn test_borrow_book_storage_failure() {
    let (deps, book_id) = setup_failing_deps().await;

    let result = borrow_book(&deps, "100001", book_id, Utc::now()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, LendingError::Storage));
    assert_eq!(err.to_string(), "A database error occurred.");
}

#[tokio::test]
async fn test_return_book_storage_failure() {
    let inner = InMemoryCatalogStore::new();
    let isbn = Isbn::parse("1234567890123").unwrap();
    inner
        .insert_book("1984", "George Orwell", &isbn, 3, 3)
        .await
        .unwrap();
    let book_id = inner.get_book_by_isbn(&isbn).await.unwrap().unwrap().id;

    // 内部ストアに貸出中レコードを用意してから障害ストアで包む
    let patron = PatronId::parse("100001").unwrap();
    let now = Utc::now();
    inner
        .record_borrow(&patron, book_id, now, now + Duration::days(LOAN_PERIOD_DAYS))
        .await
        .unwrap();

    let deps = ServiceDependencies {
        catalog_store: Arc::new(FailingWriteStore { inner }),
        payment_gateway: Arc::new(MockPaymentGateway::new()),
    };

    let result = return_book(&deps, "100001", book_id, now).await;

    assert!(matches!(result, Err(LendingError::Storage)));
}

#[tokio::test]
async fn test_add_book_storage_failure() {
    let deps = ServiceDependencies {
        catalog_store: Arc::new(FailingWriteStore {
            inner: InMemoryCatalogStore::new(),
        }),
        payment_gateway: Arc::new(MockPaymentGateway::new()),
    };

    let result = add_book_to_catalog(&deps, "1984", "George Orwell", "1234567890123", 3).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CatalogError::Storage));
    assert_eq!(err.to_string(), "A database error occurred.");
}
