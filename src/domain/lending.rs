use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    Book, Commentary, CreateLendingError, LendingId, LendingNumber, Rating, ReaderDetails,
    ReturnLendingError, fine,
};

/// Lending集約 - 1人の読者への1冊の書籍の貸出
///
/// 登録日、返却予定日、実際の返却日を保持する。
/// 返却時には任意のコメントと評価（0〜10）を一度だけ受け付ける。
/// 罰金の日額は作成時点の設定値を取り込み、以後再計算しない
/// （後からの設定変更が既存の貸出に波及しないため）。
///
/// 不変条件：
/// - `limit_date == start_date + 貸出期間`
/// - `returned_date` は無いか、`start_date` 以降
/// - `rating` / `commentary` は返却済みの場合のみ存在する
/// - `version` は成功した遷移ごとに厳密に増加する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lending {
    // 識別子
    pub lending_id: LendingId,
    pub lending_number: LendingNumber,

    // 他コンテキストへの所有参照（作成後は不変）
    pub book: Book,
    pub reader_details: ReaderDetails,

    // 貸出管理の責務
    pub start_date: NaiveDate,
    pub limit_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,

    // 作成時点で固定される罰金日額（セント）
    pub fine_value_per_day_in_cents: u32,

    // 返却遷移で一度だけ設定される
    pub commentary: Option<Commentary>,
    pub rating: Option<Rating>,

    // 楽観的並行性制御のバージョン
    pub version: u64,
}

impl Lending {
    /// 未返却（Outstanding）か
    pub fn is_outstanding(&self) -> bool {
        self.returned_date.is_none()
    }

    /// 返却済み（Returned、終端状態）か
    pub fn is_returned(&self) -> bool {
        self.returned_date.is_some()
    }
}

/// 純粋関数：新しい貸出を作成する
///
/// ビジネスルール：
/// - `start_date` は今日
/// - `limit_date` は `start_date + lending_duration_in_days`
/// - 貸出番号は今日の年と渡された連番から組み立てる
/// - 初期状態はOutstanding、versionは1
///
/// 副作用なし。新しいLendingを返す。
pub fn create_lending(
    book: Book,
    reader_details: ReaderDetails,
    sequence: u32,
    today: NaiveDate,
    lending_duration_in_days: u32,
    fine_value_per_day_in_cents: u32,
) -> Result<Lending, CreateLendingError> {
    let lending_number = LendingNumber::new(today.year(), sequence)?;

    Ok(Lending {
        lending_id: LendingId::new(),
        lending_number,
        book,
        reader_details,
        start_date: today,
        limit_date: today + Duration::days(i64::from(lending_duration_in_days)),
        returned_date: None,
        fine_value_per_day_in_cents,
        commentary: None,
        rating: None,
        version: 1,
    })
}

/// 純粋関数：履歴レコードから貸出を再構築する
///
/// データ移行・初期投入専用のファクトリ。通常の作成経路は
/// `create_lending`であり、この関数をリクエスト処理で使ってはならない。
/// `returned_date` と `rating` を持つ過去の貸出をそのまま表現できる。
pub fn bootstrap_lending(
    book: Book,
    reader_details: ReaderDetails,
    year: i32,
    sequence: u32,
    start_date: NaiveDate,
    returned_date: Option<NaiveDate>,
    lending_duration_in_days: u32,
    fine_value_per_day_in_cents: u32,
    rating: Option<Rating>,
) -> Result<Lending, CreateLendingError> {
    let lending_number = LendingNumber::new(year, sequence)?;

    Ok(Lending {
        lending_id: LendingId::new(),
        lending_number,
        book,
        reader_details,
        start_date,
        limit_date: start_date + Duration::days(i64::from(lending_duration_in_days)),
        returned_date,
        fine_value_per_day_in_cents,
        commentary: None,
        rating,
        version: 1,
    })
}

/// 純粋関数：書籍を返却済みにする（保護された遷移）
///
/// ビジネスルール：
/// - Returnedは終端状態。二度目の返却は`AlreadyReturned`
/// - 観測したversionが現在値と一致しない場合は`VersionConflict`で拒否し、
///   何も変更しない（リトライは呼び出し側の責務）
/// - 成功時：`returned_date = returned_on`、コメントと評価を設定し、
///   versionを1増やす
///
/// 副作用なし。新しいLendingを返す。入力は失敗時も成功時も変更されない。
pub fn set_returned(
    lending: &Lending,
    returned_on: NaiveDate,
    expected_version: u64,
    commentary: Option<Commentary>,
    rating: Option<Rating>,
) -> Result<Lending, ReturnLendingError> {
    if lending.is_returned() {
        return Err(ReturnLendingError::AlreadyReturned);
    }

    if lending.version != expected_version {
        return Err(ReturnLendingError::VersionConflict {
            expected: expected_version,
            actual: lending.version,
        });
    }

    Ok(Lending {
        returned_date: Some(returned_on),
        commentary,
        rating,
        version: lending.version + 1,
        ..lending.clone()
    })
}

/// 純粋関数：延滞日数
///
/// 返却済みなら返却日、未返却なら`as_of`（今日）を比較日として
/// `fine`モジュールの暦日計算に委譲する。
pub fn days_delayed(lending: &Lending, as_of: NaiveDate) -> i64 {
    fine::days_delayed(lending.limit_date, lending.returned_date, as_of)
}

/// 純粋関数：返却期限までの残日数
///
/// 返却済み、または既に期限を過ぎている場合は`None`
/// （延滞後は`days_overdue`側の射影に切り替わる）。
pub fn days_until_return(lending: &Lending, as_of: NaiveDate) -> Option<i64> {
    if lending.is_returned() {
        return None;
    }
    let remaining = lending.limit_date.signed_duration_since(as_of).num_days();
    if remaining < 0 { None } else { Some(remaining) }
}

/// 純粋関数：延滞日数の射影
///
/// 延滞しているときだけ`Some`。
pub fn days_overdue(lending: &Lending, as_of: NaiveDate) -> Option<i64> {
    let days = days_delayed(lending, as_of);
    if days > 0 { Some(days) } else { None }
}

/// 純粋関数：罰金額（セント）の射影
///
/// 延滞しているときだけ`Some`。金額は作成時に固定された日額で計算する。
pub fn fine_value_in_cents(lending: &Lending, as_of: NaiveDate) -> Option<i64> {
    fine::assess(
        lending.limit_date,
        lending.returned_date,
        as_of,
        lending.fine_value_per_day_in_cents,
    )
    .map(|fine| fine.value_in_cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Isbn, ReaderNumber};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book() -> Book {
        Book::new(Isbn::new("9782826012092"), "O Principezinho")
    }

    fn reader() -> ReaderDetails {
        ReaderDetails::new(ReaderNumber::new("2024/1"), "Joana Mendes")
    }

    // TDD: create_lending() のテスト
    #[test]
    fn test_create_lending_sets_limit_date_from_duration() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 15, 50).unwrap();

        assert_eq!(lending.start_date, today);
        assert_eq!(lending.limit_date, today + Duration::days(15));
        assert!(lending.is_outstanding());
        assert_eq!(lending.version, 1);
        assert_eq!(lending.fine_value_per_day_in_cents, 50);
        assert!(lending.commentary.is_none());
        assert!(lending.rating.is_none());
    }

    #[test]
    fn test_create_lending_builds_number_from_current_year() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 7, today, 14, 50).unwrap();
        assert_eq!(lending.lending_number.to_string(), "2024/7");
    }

    #[test]
    fn test_create_lending_rejects_zero_sequence() {
        let today = date(2024, 3, 1);
        let result = create_lending(book(), reader(), 0, today, 14, 50);
        assert!(matches!(
            result.unwrap_err(),
            CreateLendingError::InvalidLendingNumber(_)
        ));
    }

    // TDD: set_returned() のテスト
    #[test]
    fn test_set_returned_success() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();
        let returned_on = today + Duration::days(7);

        let commentary = Commentary::try_from("Great read".to_string()).unwrap();
        let rating = Rating::try_from(8).unwrap();
        let returned = set_returned(
            &lending,
            returned_on,
            lending.version,
            Some(commentary.clone()),
            Some(rating),
        )
        .unwrap();

        assert_eq!(returned.returned_date, Some(returned_on));
        assert_eq!(returned.commentary, Some(commentary));
        assert_eq!(returned.rating, Some(rating));
        assert_eq!(returned.version, lending.version + 1);
        // ビジネスキーと参照は変わらない
        assert_eq!(returned.lending_number, lending.lending_number);
        assert_eq!(returned.book, lending.book);
        assert_eq!(returned.limit_date, lending.limit_date);
    }

    #[test]
    fn test_set_returned_rating_is_optional() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();

        let returned =
            set_returned(&lending, today + Duration::days(3), lending.version, None, None)
                .unwrap();

        assert!(returned.is_returned());
        assert!(returned.rating.is_none());
        assert!(returned.commentary.is_none());
    }

    #[test]
    fn test_set_returned_fails_when_already_returned() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();
        let returned =
            set_returned(&lending, today + Duration::days(3), lending.version, None, None)
                .unwrap();

        // versionが正しくても二度目の返却は失敗する
        let result = set_returned(
            &returned,
            today + Duration::days(4),
            returned.version,
            None,
            None,
        );
        assert_eq!(result.unwrap_err(), ReturnLendingError::AlreadyReturned);
    }

    #[test]
    fn test_set_returned_fails_with_stale_version() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();

        let result = set_returned(&lending, today + Duration::days(3), 99, None, None);
        assert_eq!(
            result.unwrap_err(),
            ReturnLendingError::VersionConflict {
                expected: 99,
                actual: 1
            }
        );
        // 入力は一切変更されていない
        assert!(lending.is_outstanding());
        assert!(lending.commentary.is_none());
        assert!(lending.rating.is_none());
        assert_eq!(lending.version, 1);
    }

    // TDD: 射影のテスト
    #[test]
    fn test_days_until_return_before_limit() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();

        assert_eq!(days_until_return(&lending, today), Some(14));
        assert_eq!(days_until_return(&lending, today + Duration::days(14)), Some(0));
    }

    #[test]
    fn test_days_until_return_disappears_once_overdue() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();

        let as_of = today + Duration::days(15);
        assert_eq!(days_until_return(&lending, as_of), None);
        assert_eq!(days_overdue(&lending, as_of), Some(1));
    }

    #[test]
    fn test_days_until_return_disappears_once_returned() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();
        let returned =
            set_returned(&lending, today + Duration::days(3), lending.version, None, None)
                .unwrap();

        assert_eq!(days_until_return(&returned, today + Duration::days(5)), None);
    }

    #[test]
    fn test_days_delayed_zero_when_returned_on_limit_date() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 14, 50).unwrap();
        let returned =
            set_returned(&lending, lending.limit_date, lending.version, None, None).unwrap();

        let much_later = today + Duration::days(60);
        assert_eq!(days_delayed(&returned, much_later), 0);
        assert_eq!(fine_value_in_cents(&returned, much_later), None);
    }

    #[test]
    fn test_fine_present_iff_delayed() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 15, 50).unwrap();
        let returned_on = today + Duration::days(20);
        let returned =
            set_returned(&lending, returned_on, lending.version, None, None).unwrap();

        // 期限はD+15、返却はD+20 → 5日延滞、罰金5×50=250セント
        assert_eq!(days_delayed(&returned, returned_on), 5);
        assert_eq!(days_overdue(&returned, returned_on), Some(5));
        assert_eq!(fine_value_in_cents(&returned, returned_on), Some(250));
    }

    #[test]
    fn test_fine_uses_rate_captured_at_creation() {
        let today = date(2024, 3, 1);
        let lending = create_lending(book(), reader(), 1, today, 10, 25).unwrap();
        let as_of = today + Duration::days(12);

        // 日額25セントで2日延滞
        assert_eq!(fine_value_in_cents(&lending, as_of), Some(50));
    }

    // TDD: bootstrap_lending() のテスト
    #[test]
    fn test_bootstrap_lending_reconstructs_historical_record() {
        let start = date(2023, 6, 1);
        let returned = date(2023, 6, 10);
        let lending = bootstrap_lending(
            book(),
            reader(),
            2023,
            42,
            start,
            Some(returned),
            14,
            50,
            Some(Rating::try_from(9).unwrap()),
        )
        .unwrap();

        assert_eq!(lending.lending_number.to_string(), "2023/42");
        assert_eq!(lending.start_date, start);
        assert_eq!(lending.limit_date, start + Duration::days(14));
        assert_eq!(lending.returned_date, Some(returned));
        assert!(lending.is_returned());
    }
}
