use crate::domain::lending::Lending;
use crate::domain::value_objects::{Isbn, LendingNumber, ReaderNumber};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 保存のエラー
#[derive(Debug, Error)]
pub enum SaveError {
    /// 格納されているversionと連続しない書き込み
    #[error("conflicting write: attempted version {attempted}, stored version {actual}")]
    VersionConflict { attempted: u64, actual: u64 },
    /// ストレージ自体の失敗
    #[error(transparent)]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// ページ指定（1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(number: usize, limit: usize) -> Self {
        Self {
            number: number.max(1),
            limit,
        }
    }

    /// 先頭から読み飛ばす件数
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// 貸出検索の絞り込み条件
///
/// `None`のフィールドは絞り込みに使われない。
/// 日付範囲は`start_date`（貸出開始日）に対して両端を含む。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LendingSearchFilters {
    pub reader_number: Option<ReaderNumber>,
    pub isbn: Option<Isbn>,
    pub returned: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// 貸出ストレージポート
///
/// 永続化技術はこのcoreの関心外であり、インターフェースのみを定義する。
/// 読み取り操作はread-committedで十分であり、書き込みとの同時実行で
/// 特定のスナップショットの観測は保証しない。
#[async_trait]
pub trait LendingRepository: Send + Sync {
    /// ビジネスキー（貸出番号）で貸出を探す
    async fn find_by_lending_number(
        &self,
        lending_number: &LendingNumber,
    ) -> Result<Option<Lending>>;

    /// 読者の未返却の貸出をすべて取得する
    ///
    /// 貸出資格の判定（延滞・冊数上限）に使用される。
    async fn list_outstanding_by_reader_number(
        &self,
        reader_number: &ReaderNumber,
    ) -> Result<Vec<Lending>>;

    /// 読者とISBNの組み合わせで貸出を取得する（返却済みを含む）
    async fn list_by_reader_number_and_isbn(
        &self,
        reader_number: &ReaderNumber,
        isbn: &Isbn,
    ) -> Result<Vec<Lending>>;

    /// 指定した年に作成された貸出の件数
    ///
    /// 連番の採番（count + 1）に使用される。削除は行われないため
    /// 連番が再利用されることはない。
    async fn count_from_year(&self, year: i32) -> Result<u32>;

    /// 貸出を保存する（compare-and-swap）
    ///
    /// 新規は貸出番号が未使用の場合のみINSERT。既存への書き込みは
    /// `version == 格納されているversion + 1` の場合のみUPDATEし、
    /// それ以外は`SaveError::VersionConflict`で拒否して何も変更しない。
    /// 楽観的並行性制御の最終的な強制点はこの操作であり、読み込み後に
    /// 別の書き込みが割り込んだ場合は負けた側がここで検出される。
    async fn save(&self, lending: Lending) -> std::result::Result<Lending, SaveError>;

    /// 延滞中の貸出を取得する
    ///
    /// `as_of`時点で未返却かつ期限超過の貸出を、延滞が長い順に返す。
    async fn get_overdue(&self, page: Page, as_of: NaiveDate) -> Result<Vec<Lending>>;

    /// 条件で貸出を検索する
    async fn search_lendings(
        &self,
        page: Page,
        filters: LendingSearchFilters,
    ) -> Result<Vec<Lending>>;

    /// 返却済み貸出の平均貸出日数
    ///
    /// `(returned_date - start_date)`の日数の平均。
    /// 返却済みの貸出が1件もない場合は`None`。
    async fn get_average_duration(&self) -> Result<Option<f64>>;

    /// 指定ISBNの返却済み貸出の平均貸出日数
    async fn get_avg_lending_duration_by_isbn(&self, isbn: &Isbn) -> Result<Option<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_first_page_of_ten() {
        let page = Page::default();
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_page_clamps_number_to_one() {
        assert_eq!(Page::new(0, 10).number, 1);
    }
}
