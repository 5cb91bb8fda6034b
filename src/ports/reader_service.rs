use crate::domain::value_objects::{ReaderDetails, ReaderNumber};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 読者ルックアップポート
///
/// 貸出コンテキストと読者コンテキストの境界を維持する。
#[async_trait]
pub trait ReaderService: Send + Sync {
    /// 読者番号で読者を探す
    ///
    /// 貸出作成時の存在確認に使用される。
    async fn find_by_reader_number(
        &self,
        reader_number: &ReaderNumber,
    ) -> Result<Option<ReaderDetails>>;

    /// ユーザー名で読者を探す
    ///
    /// 読者が自分自身の貸出を参照するフローで使用される。
    async fn find_by_username(&self, username: &str) -> Result<Option<ReaderDetails>>;
}
