/// 貸出ポリシー設定
///
/// 2つの値は貸出の作成時にのみ読み取られ、集約に取り込まれる。
/// 実行中に設定を変えても既存の貸出の期限・罰金日額は変わらない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingConfig {
    /// 貸出期間（開始日に加算する日数）
    pub lending_duration_in_days: u32,
    /// 罰金の日額（セント）
    pub fine_value_per_day_in_cents: u32,
}

impl LendingConfig {
    pub const DEFAULT_LENDING_DURATION_IN_DAYS: u32 = 14;
    pub const DEFAULT_FINE_VALUE_PER_DAY_IN_CENTS: u32 = 50;

    /// 環境変数から設定を読み込む
    ///
    /// `LENDING_DURATION_IN_DAYS` / `FINE_VALUE_PER_DAY_IN_CENTS`。
    /// 未設定または数値として解析できない場合はデフォルト値になる。
    pub fn from_env() -> Self {
        Self {
            lending_duration_in_days: env_u32(
                "LENDING_DURATION_IN_DAYS",
                Self::DEFAULT_LENDING_DURATION_IN_DAYS,
            ),
            fine_value_per_day_in_cents: env_u32(
                "FINE_VALUE_PER_DAY_IN_CENTS",
                Self::DEFAULT_FINE_VALUE_PER_DAY_IN_CENTS,
            ),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            lending_duration_in_days: Self::DEFAULT_LENDING_DURATION_IN_DAYS,
            fine_value_per_day_in_cents: Self::DEFAULT_FINE_VALUE_PER_DAY_IN_CENTS,
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
