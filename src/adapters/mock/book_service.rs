use crate::domain::value_objects::{Book, Isbn};
use crate::ports::book_service::{BookService as BookServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// BookServiceのインメモリ実装
///
/// 書籍を登録することで状態を持ったテストをサポート。
#[derive(Default)]
pub struct BookService {
    books: Mutex<HashMap<Isbn, Book>>,
}

impl BookService {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用に書籍を登録
    pub fn add_book(&self, book: Book) {
        self.books.lock().unwrap().insert(book.isbn.clone(), book);
    }
}

#[async_trait]
impl BookServiceTrait for BookService {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        Ok(self.books.lock().unwrap().get(isbn).cloned())
    }
}
