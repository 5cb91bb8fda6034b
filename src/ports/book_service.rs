use crate::domain::value_objects::{Book, Isbn};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍ルックアップポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストはISBNで解決したスナップショットのみを受け取る。
#[async_trait]
pub trait BookService: Send + Sync {
    /// ISBNで書籍を探す
    ///
    /// 見つからない場合は`None`。貸出作成時の存在確認に使用される。
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;
}
