use crate::domain::value_objects::{BookId, Isbn, PatronId};
use crate::ports::catalog_store::{
    Book, BorrowHistoryEntry, BorrowedBook, CatalogStore, Result, SearchKind,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// 貸出レコード（ストア内部表現）
///
/// return_dateがNoneのレコードが「貸出中」を意味する。
#[derive(Debug, Clone)]
struct BorrowRecord {
    patron_id: PatronId,
    book_id: BookId,
    borrow_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    books: Vec<Book>,
    records: Vec<BorrowRecord>,
    next_book_id: i64,
}

/// In-memory implementation of CatalogStore
///
/// Holds books and borrow records behind a single mutex. Each mutating
/// operation commits under one lock guard, so the record write and the
/// availability-counter write of a borrow or return can never be observed
/// half-applied.
pub struct InMemoryCatalogStore {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState {
                books: Vec::new(),
                records: Vec::new(),
                next_book_id: 1,
            }),
        }
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_book_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state.books.iter().find(|b| b.id == book_id).cloned())
    }

    async fn get_book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state.books.iter().find(|b| &b.isbn == isbn).cloned())
    }

    async fn get_all_books(&self) -> Result<Vec<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state.books.clone())
    }

    async fn search_books(&self, kind: SearchKind, term: &str) -> Result<Vec<Book>> {
        let state = self.state.lock().unwrap();
        let needle = term.to_lowercase();
        let matches = state
            .books
            .iter()
            .filter(|b| match kind {
                SearchKind::Title => b.title.to_lowercase().contains(&needle),
                SearchKind::Author => b.author.to_lowercase().contains(&needle),
                SearchKind::Isbn => b.isbn.as_str() == term,
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn insert_book(
        &self,
        title: &str,
        author: &str,
        isbn: &Isbn,
        total_copies: u32,
        available_copies: u32,
    ) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let id = BookId::new(state.next_book_id);
        state.next_book_id += 1;
        state.books.push(Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.clone(),
            total_copies,
            available_copies,
        });
        Ok(true)
    }

    async fn get_patron_borrow_count(&self, patron_id: &PatronId) -> Result<usize> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| &r.patron_id == patron_id && r.return_date.is_none())
            .count())
    }

    async fn get_patron_borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<BorrowedBook>> {
        let state = self.state.lock().unwrap();
        let borrowed = state
            .records
            .iter()
            .filter(|r| &r.patron_id == patron_id && r.return_date.is_none())
            .filter_map(|r| {
                state.books.iter().find(|b| b.id == r.book_id).map(|b| BorrowedBook {
                    book_id: r.book_id,
                    title: b.title.clone(),
                    author: b.author.clone(),
                    borrow_date: r.borrow_date,
                    due_date: r.due_date,
                })
            })
            .collect();
        Ok(borrowed)
    }

    async fn get_patron_borrow_history(
        &self,
        patron_id: &PatronId,
    ) -> Result<Vec<BorrowHistoryEntry>> {
        let state = self.state.lock().unwrap();
        let mut history: Vec<BorrowHistoryEntry> = state
            .records
            .iter()
            .filter(|r| &r.patron_id == patron_id)
            .filter_map(|r| {
                state.books.iter().find(|b| b.id == r.book_id).map(|b| BorrowHistoryEntry {
                    book_id: r.book_id,
                    title: b.title.clone(),
                    author: b.author.clone(),
                    borrow_date: r.borrow_date,
                    due_date: r.due_date,
                    return_date: r.return_date,
                })
            })
            .collect();
        // 新しい順
        history.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date));
        Ok(history)
    }

    async fn record_borrow(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(book) = state.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(false);
        };
        if book.available_copies == 0 {
            // カウンタを負にするくらいなら書き込み自体を拒否する
            return Ok(false);
        }
        book.available_copies -= 1;
        state.records.push(BorrowRecord {
            patron_id: patron_id.clone(),
            book_id,
            borrow_date,
            due_date,
            return_date: None,
        });
        Ok(true)
    }

    async fn record_return(
        &self,
        patron_id: &PatronId,
        book_id: BookId,
        return_date: DateTime<Utc>,
    ) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        // 書籍を先に解決してから書き込む。途中で失敗して
        // 閉じたレコードだけが残ることはない
        if !state.books.iter().any(|b| b.id == book_id) {
            return Ok(false);
        }
        let Some(record) = state
            .records
            .iter_mut()
            .find(|r| &r.patron_id == patron_id && r.book_id == book_id && r.return_date.is_none())
        else {
            return Ok(false);
        };
        record.return_date = Some(return_date);
        if let Some(book) = state.books.iter_mut().find(|b| b.id == book_id) {
            // total_copiesを超えては増やさない
            book.available_copies = (book.available_copies + 1).min(book.total_copies);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn seed_store() -> (InMemoryCatalogStore, BookId, PatronId) {
        let store = InMemoryCatalogStore::new();
        let isbn = Isbn::parse("1234567890123").unwrap();
        store
            .insert_book("1984", "George Orwell", &isbn, 1, 1)
            .await
            .unwrap();
        let book_id = store.get_book_by_isbn(&isbn).await.unwrap().unwrap().id;
        let patron = PatronId::parse("100001").unwrap();
        (store, book_id, patron)
    }

    #[tokio::test]
    async fn test_record_return_unknown_book_writes_nothing() {
        let (store, book_id, patron) = seed_store().await;
        let now = Utc::now();
        store
            .record_borrow(&patron, book_id, now, now + Duration::days(14))
            .await
            .unwrap();

        // 存在しない書籍の返却は拒否され、レコードは閉じられない
        let committed = store.record_return(&patron, BookId::new(999), now).await.unwrap();

        assert!(!committed);
        assert_eq!(store.get_patron_borrow_count(&patron).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_return_closes_record_and_restores_copies() {
        let (store, book_id, patron) = seed_store().await;
        let now = Utc::now();
        store
            .record_borrow(&patron, book_id, now, now + Duration::days(14))
            .await
            .unwrap();

        let committed = store.record_return(&patron, book_id, now).await.unwrap();

        assert!(committed);
        assert_eq!(store.get_patron_borrow_count(&patron).await.unwrap(), 0);
        let book = store.get_book_by_id(book_id).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
    }
}
