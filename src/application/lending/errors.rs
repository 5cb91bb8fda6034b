use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
///
/// spec上の分類：NotFound / Forbidden / AlreadyReturned /
/// VersionConflict / InvalidArgument と、ポート層の失敗のラップ。
#[derive(Debug, Error)]
pub enum LendingApplicationError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 読者が存在しない
    #[error("Reader not found")]
    ReaderNotFound,

    /// 貸出が見つからない
    #[error("Lending not found")]
    LendingNotFound,

    /// 読者が延滞中の貸出を持っている（資格ルール違反）
    #[error("Reader has book(s) past their due date")]
    ReaderHasOverdueLending,

    /// 読者が既に上限（3冊）まで借りている（資格ルール違反）
    #[error("Reader has three books outstanding already")]
    LendingLimitReached,

    /// 既に返却済みの貸出への返却要求
    #[error("Book already returned")]
    LendingAlreadyReturned,

    /// 楽観的並行性制御の検証に失敗。呼び出し側は再読込して再試行する
    #[error("Lending was modified concurrently (expected version {expected}, actual {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    /// 評価が0〜10の範囲外
    #[error("Rating must be between 0 and {max}, got {value}", max = crate::domain::Rating::MAX)]
    InvalidRating { value: u8 },

    /// コメントが1024文字を超えている
    #[error("Commentary must not exceed {} characters", crate::domain::Commentary::MAX_CHARS)]
    InvalidCommentary,

    /// 貸出番号が`"{year}/{sequence}"`形式でない
    #[error("Invalid lending number: {0}")]
    InvalidLendingNumber(String),

    /// 日付文字列が解析できない
    #[error("Expected format is YYYY-MM-DD")]
    InvalidDateFormat,

    /// ドメイン層のエラー
    #[error("Domain error: {0}")]
    DomainError(String),

    /// LendingRepositoryのエラー
    #[error("Lending repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BookServiceのエラー
    #[error("Book service error")]
    BookServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ReaderServiceのエラー
    #[error("Reader service error")]
    ReaderServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingApplicationError>;
