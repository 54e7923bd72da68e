use thiserror::Error;

/// 貸出エンジンのエラー
#[derive(Debug, Error)]
pub enum LendingError {
    /// 利用者IDが不正
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatronId,

    /// 書籍が存在しない
    #[error("Book not found.")]
    BookNotFound,

    /// 貸出可能な在庫がない
    #[error("This book is currently not available.")]
    BookUnavailable,

    /// 貸出上限（5冊）に達している
    #[error("You have reached the maximum borrowing limit of 5 books.")]
    BorrowLimitExceeded,

    /// この利用者はこの書籍を借りていない
    #[error("This book is not borrowed by this patron.")]
    NotBorrowed,

    /// ミューテータがfalseを返した（ストレージ障害）
    #[error("A database error occurred.")]
    Storage,

    /// カタログストアポートのエラー
    #[error("Catalog store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 料金決済のエラー
#[derive(Debug, Error)]
pub enum SettlementError {
    /// 利用者IDが不正
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatronId,

    /// 支払うべき延滞料金がない
    #[error("No late fees due for this patron and book.")]
    NoLateFees,

    /// 書籍が存在しない
    #[error("Book not found.")]
    BookNotFound,

    /// トランザクションIDの形式が不正
    #[error("Invalid transaction ID format.")]
    InvalidTransactionId,

    /// 返金額が正でない
    #[error("Refund amount must be greater than 0.")]
    RefundAmountNotPositive,

    /// 返金額が延滞料金の上限を超えている
    #[error("Refund amount exceeds maximum late fee.")]
    RefundAmountExceedsMaximum,

    /// ゲートウェイが決済を拒否した
    #[error("Payment failed: {0}")]
    PaymentDeclined(String),

    /// ゲートウェイが返金を拒否した
    #[error("Refund failed: {0}")]
    RefundDeclined(String),

    /// ゲートウェイの予期しない障害
    ///
    /// ポートのErrチャネルはここで捕捉され、呼び出し側へ伝播しない。
    #[error("Payment processing error")]
    PaymentProcessing(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 料金計算で発生した貸出エンジンのエラー
    #[error(transparent)]
    Lending(#[from] LendingError),
}

/// カタログ管理のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Title is required.")]
    TitleRequired,

    #[error("Title must be less than 200 characters.")]
    TitleTooLong,

    #[error("Author is required.")]
    AuthorRequired,

    #[error("Author must be less than 100 characters.")]
    AuthorTooLong,

    #[error("ISBN must be exactly 13 digits.")]
    IsbnWrongLength,

    #[error("ISBN must include only digits.")]
    IsbnNotNumeric,

    #[error("Total copies must be a positive integer.")]
    InvalidCopyCount,

    #[error("A book with this ISBN already exists.")]
    DuplicateIsbn,

    /// ミューテータがfalseを返した（ストレージ障害）
    #[error("A database error occurred.")]
    Storage,

    /// カタログストアポートのエラー
    #[error("Catalog store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}
