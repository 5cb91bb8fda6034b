use chrono::NaiveDate;

use crate::domain::lending::{self, Lending};

use super::errors::{LendingApplicationError, Result};

/// 読者1人あたりの未返却の最大冊数
pub const MAX_OUTSTANDING_LENDINGS: usize = 3;

/// 純粋関数：読者が新しい貸出を開始できるか判定する
///
/// ビジネスルール：
/// - 延滞中の貸出が1件でもあれば冊数に関係なく不可
///   （延滞はより具体的・緊急な拒否理由であり、上限チェックに優先する）
/// - 未返却が3冊に達していれば不可
///
/// `outstanding`は読者の未返却の貸出（returned_date == None）のみを
/// 含むことを呼び出し側が保証する。
pub fn check_eligibility(outstanding: &[Lending], as_of: NaiveDate) -> Result<()> {
    if outstanding
        .iter()
        .any(|l| lending::days_delayed(l, as_of) > 0)
    {
        return Err(LendingApplicationError::ReaderHasOverdueLending);
    }

    if outstanding.len() >= MAX_OUTSTANDING_LENDINGS {
        return Err(LendingApplicationError::LendingLimitReached);
    }

    Ok(())
}
