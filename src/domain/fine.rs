use chrono::NaiveDate;

/// 罰金 - 延滞日数とそれに対する金額（セント）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fine {
    pub days_delayed: i64,
    pub value_in_cents: i64,
}

/// 純粋関数：延滞日数を算出する
///
/// 比較日は `returned_date` があればその日、なければ `as_of`（今日）。
/// 暦日単位で数え、経過時間ではない。期限日ちょうどの返却は延滞0日。
/// 負になる場合（期限前）は0に丸める。
pub fn days_delayed(
    limit_date: NaiveDate,
    returned_date: Option<NaiveDate>,
    as_of: NaiveDate,
) -> i64 {
    let comparison_date = returned_date.unwrap_or(as_of);
    comparison_date.signed_duration_since(limit_date).num_days().max(0)
}

/// 純粋関数：罰金を査定する
///
/// 延滞日数が0なら罰金なし（`None`）。
/// それ以外は `延滞日数 × 日額（セント）` を返す。
///
/// 副作用なし。同じ入力に対して常に同じ結果を返す。
pub fn assess(
    limit_date: NaiveDate,
    returned_date: Option<NaiveDate>,
    as_of: NaiveDate,
    fine_value_per_day_in_cents: u32,
) -> Option<Fine> {
    let days = days_delayed(limit_date, returned_date, as_of);
    if days == 0 {
        return None;
    }
    Some(Fine {
        days_delayed: days,
        value_in_cents: days * i64::from(fine_value_per_day_in_cents),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // TDD: days_delayed() のテスト
    #[test]
    fn test_days_delayed_zero_when_returned_on_limit_date() {
        let limit = date(2024, 3, 15);
        assert_eq!(days_delayed(limit, Some(limit), limit), 0);
    }

    #[test]
    fn test_days_delayed_one_the_day_after_limit() {
        let limit = date(2024, 3, 15);
        let returned = limit + Duration::days(1);
        assert_eq!(days_delayed(limit, Some(returned), returned), 1);
    }

    #[test]
    fn test_days_delayed_zero_before_limit() {
        let limit = date(2024, 3, 15);
        let returned = limit - Duration::days(3);
        assert_eq!(days_delayed(limit, Some(returned), returned), 0);
    }

    #[test]
    fn test_days_delayed_uses_as_of_when_outstanding() {
        let limit = date(2024, 3, 15);
        let as_of = limit + Duration::days(5);
        assert_eq!(days_delayed(limit, None, as_of), 5);
    }

    #[test]
    fn test_days_delayed_prefers_returned_date_over_as_of() {
        // 返却済みなら「今日」がいくら進んでも延滞日数は変わらない
        let limit = date(2024, 3, 15);
        let returned = limit + Duration::days(2);
        let much_later = limit + Duration::days(100);
        assert_eq!(days_delayed(limit, Some(returned), much_later), 2);
    }

    // TDD: assess() のテスト
    #[test]
    fn test_assess_no_fine_without_delay() {
        let limit = date(2024, 3, 15);
        assert_eq!(assess(limit, Some(limit), limit, 50), None);
    }

    #[test]
    fn test_assess_multiplies_days_by_daily_rate() {
        let limit = date(2024, 3, 15);
        let returned = limit + Duration::days(5);
        let fine = assess(limit, Some(returned), returned, 50).unwrap();
        assert_eq!(fine.days_delayed, 5);
        assert_eq!(fine.value_in_cents, 250);
    }

    #[test]
    fn test_assess_is_referentially_transparent() {
        let limit = date(2024, 3, 15);
        let as_of = limit + Duration::days(3);
        let first = assess(limit, None, as_of, 25);
        let second = assess(limit, None, as_of, 25);
        assert_eq!(first, second);
    }
}
