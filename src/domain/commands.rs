use serde::{Deserialize, Serialize};

/// コマンド：貸出を作成する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLending {
    pub isbn: String,
    pub reader_number: String,
}

/// コマンド：貸出を返却済みにする
///
/// `expected_version` は呼び出し側が最後に観測したversion。
/// 現在値と一致しない場合、遷移は拒否される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLendingReturned {
    pub lending_number: String,
    pub expected_version: u64,
    pub commentary: Option<String>,
    pub rating: Option<u8>,
}

/// クエリ：貸出を検索する
///
/// 日付は `YYYY-MM-DD` 形式の文字列で受け取り、アプリケーション層で
/// 検証・解析される。範囲は`start_date`に対して両端を含む。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLendings {
    pub reader_number: Option<String>,
    pub isbn: Option<String>,
    pub returned: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
