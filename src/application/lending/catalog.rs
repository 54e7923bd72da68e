use crate::domain::errors::IsbnError;
use crate::domain::value_objects::Isbn;
use crate::ports::catalog_store::{Book, SearchKind};

use super::errors::CatalogError;
use super::lending_service::ServiceDependencies;

/// タイトルの最大文字数
const MAX_TITLE_LEN: usize = 200;

/// 著者名の最大文字数
const MAX_AUTHOR_LEN: usize = 100;

/// 書籍をカタログに追加する
///
/// バリデーション：
/// - タイトルは必須、200文字以下（前後の空白は除去）
/// - 著者は必須、100文字以下
/// - ISBNは数字13文字、カタログ内で一意
/// - 冊数は1以上
///
/// 成功時、available_copies = total_copiesで挿入される。
pub async fn add_book_to_catalog(
    deps: &ServiceDependencies,
    title: &str,
    author: &str,
    isbn: &str,
    total_copies: u32,
) -> Result<String, CatalogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CatalogError::TitleTooLong);
    }

    let author = author.trim();
    if author.is_empty() {
        return Err(CatalogError::AuthorRequired);
    }
    if author.chars().count() > MAX_AUTHOR_LEN {
        return Err(CatalogError::AuthorTooLong);
    }

    let isbn = Isbn::parse(isbn).map_err(|e| match e {
        IsbnError::WrongLength => CatalogError::IsbnWrongLength,
        IsbnError::NotNumeric => CatalogError::IsbnNotNumeric,
    })?;

    if total_copies == 0 {
        return Err(CatalogError::InvalidCopyCount);
    }

    // ISBN重複チェック
    let existing = deps
        .catalog_store
        .get_book_by_isbn(&isbn)
        .await
        .map_err(CatalogError::StoreError)?;
    if existing.is_some() {
        return Err(CatalogError::DuplicateIsbn);
    }

    let inserted = deps
        .catalog_store
        .insert_book(title, author, &isbn, total_copies, total_copies)
        .await
        .map_err(CatalogError::StoreError)?;

    if !inserted {
        return Err(CatalogError::Storage);
    }

    tracing::info!(%isbn, title, "book added to catalog");

    Ok(format!(
        "Book \"{}\" has been successfully added to the catalog.",
        title
    ))
}

/// カタログを検索する
///
/// 空白のみの検索語や不明な検索種別は空の結果を返す（エラーにしない）。
pub async fn search_catalog(
    deps: &ServiceDependencies,
    term: &str,
    kind: &str,
) -> Result<Vec<Book>, CatalogError> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let Ok(kind) = kind.trim().to_lowercase().parse::<SearchKind>() else {
        return Ok(Vec::new());
    };

    deps.catalog_store
        .search_books(kind, term)
        .await
        .map_err(CatalogError::StoreError)
}

/// カタログの全書籍を取得する
pub async fn list_catalog(deps: &ServiceDependencies) -> Result<Vec<Book>, CatalogError> {
    deps.catalog_store
        .get_all_books()
        .await
        .map_err(CatalogError::StoreError)
}
