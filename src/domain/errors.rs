use super::LendingNumberError;

/// 貸出作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateLendingError {
    /// 貸出番号が不正（連番が1未満など）
    InvalidLendingNumber(LendingNumberError),
}

impl From<LendingNumberError> for CreateLendingError {
    fn from(err: LendingNumberError) -> Self {
        CreateLendingError::InvalidLendingNumber(err)
    }
}

/// 返却遷移のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLendingError {
    /// 既に返却済み（Returnedは終端状態）
    AlreadyReturned,
    /// 楽観的並行性制御の検証に失敗（観測したversionが古い）
    VersionConflict { expected: u64, actual: u64 },
}
