use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 貸出ID - 貸出管理コンテキストの集約ID（サロゲートキー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LendingId(Uuid);

impl LendingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LendingId {
    fn default() -> Self {
        Self::new()
    }
}

/// ISBN - カタログ管理コンテキストへの参照キー
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 読者番号 - 読者管理コンテキストへの参照キー
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReaderNumber(String);

impl ReaderNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReaderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出番号のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingNumberError {
    /// 連番は1以上でなければならない
    SequenceMustBePositive,
    /// `"{year}/{sequence}"` 形式でない
    MalformedLendingNumber,
}

/// 貸出番号 - `(年, 連番)` の複合ビジネスキー
///
/// `"{year}/{sequence}"` として表示される。システム全体で一意であり、
/// 連番は暦年ごとに1から単調に採番される。
///
/// 不変条件：連番は1以上。作成後は不変。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LendingNumber {
    year: i32,
    sequence: u32,
}

impl LendingNumber {
    pub fn new(year: i32, sequence: u32) -> Result<Self, LendingNumberError> {
        if sequence == 0 {
            return Err(LendingNumberError::SequenceMustBePositive);
        }
        Ok(Self { year, sequence })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl std::fmt::Display for LendingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.year, self.sequence)
    }
}

impl std::str::FromStr for LendingNumber {
    type Err = LendingNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, sequence) = s
            .split_once('/')
            .ok_or(LendingNumberError::MalformedLendingNumber)?;
        let year: i32 = year
            .parse()
            .map_err(|_| LendingNumberError::MalformedLendingNumber)?;
        let sequence: u32 = sequence
            .parse()
            .map_err(|_| LendingNumberError::MalformedLendingNumber)?;
        Self::new(year, sequence)
    }
}

/// 評価のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// 0〜10の範囲外
    OutOfRange(u8),
}

/// 評価（0〜10）
///
/// 返却時にのみ、一度だけ設定できる。
/// 型システムで範囲制約を強制し、不正な値（11以上）を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 10;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(RatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

/// コメントのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryError {
    /// 1024文字を超えている
    TooLong(usize),
}

/// 返却時コメント（最大1024文字）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary(String);

impl Commentary {
    pub const MAX_CHARS: usize = 1024;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Commentary {
    type Error = CommentaryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(CommentaryError::TooLong(chars));
        }
        Ok(Self(value))
    }
}

/// 書籍 - カタログコンテキストから解決されたスナップショット
///
/// 貸出集約が所有する参照。作成後は不変。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
}

impl Book {
    pub fn new(isbn: Isbn, title: impl Into<String>) -> Self {
        Self {
            isbn,
            title: title.into(),
        }
    }
}

/// 読者詳細 - 読者コンテキストから解決されたスナップショット
///
/// 貸出集約が所有する参照。作成後は不変。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderDetails {
    pub reader_number: ReaderNumber,
    pub name: String,
}

impl ReaderDetails {
    pub fn new(reader_number: ReaderNumber, name: impl Into<String>) -> Self {
        Self {
            reader_number,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // TDD: LendingNumber のテスト
    #[test]
    fn test_lending_number_display() {
        let n = LendingNumber::new(2024, 7).unwrap();
        assert_eq!(n.to_string(), "2024/7");
    }

    #[test]
    fn test_lending_number_rejects_zero_sequence() {
        let result = LendingNumber::new(2024, 0);
        assert_eq!(
            result.unwrap_err(),
            LendingNumberError::SequenceMustBePositive
        );
    }

    #[test]
    fn test_lending_number_parse_roundtrip() {
        let parsed: LendingNumber = "2024/15".parse().unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.sequence(), 15);
    }

    #[test]
    fn test_lending_number_parse_rejects_malformed() {
        assert!("2024-15".parse::<LendingNumber>().is_err());
        assert!("abc/1".parse::<LendingNumber>().is_err());
        assert!("2024/".parse::<LendingNumber>().is_err());
        assert!("2024/0".parse::<LendingNumber>().is_err());
    }

    #[test]
    fn test_lending_number_serde_roundtrip() {
        let n = LendingNumber::new(2025, 3).unwrap();
        let json = serde_json::to_string(&n).unwrap();
        let back: LendingNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }

    // TDD: Rating のテスト
    #[test]
    fn test_rating_accepts_bounds() {
        assert_eq!(Rating::try_from(0).unwrap().value(), 0);
        assert_eq!(Rating::try_from(10).unwrap().value(), 10);
    }

    #[test]
    fn test_rating_rejects_above_ten() {
        assert_eq!(
            Rating::try_from(11).unwrap_err(),
            RatingError::OutOfRange(11)
        );
    }

    // TDD: Commentary のテスト
    #[test]
    fn test_commentary_accepts_max_length() {
        let result = Commentary::try_from("x".repeat(1024));
        assert!(result.is_ok());
    }

    #[test]
    fn test_commentary_rejects_over_max_length() {
        let result = Commentary::try_from("x".repeat(1025));
        assert_eq!(result.unwrap_err(), CommentaryError::TooLong(1025));
    }

    // ID value objects のテスト
    #[test]
    fn test_lending_id_creation() {
        let id1 = LendingId::new();
        let id2 = LendingId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_lending_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LendingId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }
}
