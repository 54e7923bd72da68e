use crate::domain::value_objects::{BookId, Isbn, PatronId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍レコード
///
/// 不変条件：0 <= available_copies <= total_copies。
/// available_copiesは貸出で1減り、返却で1増える。
/// 貸出エンジンのストア呼び出しによってのみ変更される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub total_copies: u32,
    pub available_copies: u32,
}

/// 貸出中レコード（書籍フィールド結合済み）
///
/// return_dateがNoneのレコードのみを対象とするビュー。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowedBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// 貸出履歴エントリ（書籍フィールド結合済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowHistoryEntry {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// カタログ検索の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// タイトルの部分一致（大文字小文字を区別しない）
    Title,
    /// 著者の部分一致（大文字小文字を区別しない）
    Author,
    /// ISBNの完全一致
    Isbn,
}

impl std::str::FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "title" => Ok(SearchKind::Title),
            "author" => Ok(SearchKind::Author),
            "isbn" => Ok(SearchKind::Isbn),
            _ => Err(format!("Invalid search kind: {}", s)),
        }
    }
}

/// カタログストアポート
///
/// 貸出コンテキストと永続化層の境界を維持する。
/// boolを返すミューテータは失敗を`false`で通知する（例外は投げない）。
/// 呼び出し側はこれを確認し、ストレージエラーの結果に変換する責務を負う。
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// IDで書籍を取得する
    async fn get_book_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// ISBNで書籍を取得する
    ///
    /// ISBN重複チェックに使用される。
    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;

    /// カタログの全書籍を取得する
    async fn get_all_books(&self) -> Result<Vec<Book>>;

    /// カタログを検索する
    ///
    /// タイトル・著者は大文字小文字を区別しない部分一致、ISBNは完全一致。
    async fn search_books(&self, kind: SearchKind, term: &str) -> Result<Vec<Book>>;

    /// 書籍を追加する
    ///
    /// 成功時はtrue、ストレージ障害時はfalseを返す。
    async fn insert_book(
        &self,
        title: &str,
        author: &str,
        isbn: &Isbn,
        total_copies: u32,
        available_copies: u32,
    ) -> Result<bool>;

    /// 利用者の貸出中冊数を取得する
    ///
    /// 貸出上限（利用者ごと最大5冊）の確認に使用される。
    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> Result<usize>;

    /// 利用者の貸出中の書籍を取得する
    ///
    /// return_dateがnullのレコードのみ、書籍フィールドを結合して返す。
    async fn get_patron_borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<BorrowedBook>>;

    /// 利用者の全貸出履歴を取得する
    ///
    /// borrow_dateの降順（新しい順）で返す。
    async fn get_patron_borrow_history(
        &self,
        patron_id: &PatronId,
    ) -> Result<Vec<BorrowHistoryEntry>>;

    /// 貸出を記録する
    ///
    /// 貸出レコードの挿入とavailable_copiesの減算を1つの
    /// トランザクション境界で実行する。部分的な書き込みは残さない。
    /// 成功時はtrue、ストレージ障害時はfalseを返す。
    async fn record_borrow(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Result<bool>;

    /// 返却を記録する
    ///
    /// 貸出レコードのreturn_date設定とavailable_copiesの加算を
    /// 1つのトランザクション境界で実行する。
    /// 成功時はtrue、ストレージ障害時はfalseを返す。
    async fn record_return(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        return_date: DateTime<Utc>,
    ) -> Result<bool>;
}
