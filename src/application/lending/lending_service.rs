use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::sync::Arc;

use crate::config::LendingConfig;
use crate::domain::commands::{CreateLending, SearchLendings, SetLendingReturned};
use crate::domain::lending::{self, Lending};
use crate::domain::{Commentary, Isbn, LendingNumber, Rating, ReaderNumber, ReturnLendingError};
use crate::ports::{
    BookService, LendingRepository, LendingSearchFilters, Page, ReaderService, SaveError,
};

use super::eligibility::check_eligibility;
use super::errors::{LendingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub lending_repository: Arc<dyn LendingRepository>,
    pub book_service: Arc<dyn BookService>,
    pub reader_service: Arc<dyn ReaderService>,
    pub config: LendingConfig,
}

/// 検索のデフォルト窓：今日までの直近10日間
const DEFAULT_SEARCH_WINDOW_DAYS: i64 = 10;

/// 貸出を作成する
///
/// ビジネスルール：
/// - 書籍と読者が存在すること
/// - 読者に延滞中の貸出がないこと（冊数に優先してチェック）
/// - 読者の未返却が3冊未満であること
/// - 連番は「今年の貸出件数 + 1」。年ごとに単調で、再利用されない
///
/// 貸出期間と罰金日額は作成時点の設定から取り込まれ、以後の設定変更は
/// この貸出に波及しない。
///
/// # 戻り値
/// 保存された貸出集約
pub async fn create_lending(
    deps: &ServiceDependencies,
    cmd: CreateLending,
) -> Result<Lending> {
    let isbn = Isbn::new(cmd.isbn);
    let reader_number = ReaderNumber::new(cmd.reader_number);

    // 1. 書籍と読者の存在確認
    let book = deps
        .book_service
        .find_by_isbn(&isbn)
        .await
        .map_err(LendingApplicationError::BookServiceError)?
        .ok_or(LendingApplicationError::BookNotFound)?;

    let reader = deps
        .reader_service
        .find_by_reader_number(&reader_number)
        .await
        .map_err(LendingApplicationError::ReaderServiceError)?
        .ok_or(LendingApplicationError::ReaderNotFound)?;

    let today = Utc::now().date_naive();

    // 2. 貸出資格の判定
    let outstanding = deps
        .lending_repository
        .list_outstanding_by_reader_number(&reader_number)
        .await
        .map_err(LendingApplicationError::RepositoryError)?;

    if let Err(denial) = check_eligibility(&outstanding, today) {
        tracing::warn!(
            reader_number = %reader_number,
            reason = %denial,
            "lending denied"
        );
        return Err(denial);
    }

    // 3. 今年の連番を採番
    let sequence = deps
        .lending_repository
        .count_from_year(today.year())
        .await
        .map_err(LendingApplicationError::RepositoryError)?
        + 1;

    // 4. ドメイン層の純粋関数で集約を構築
    let lending = lending::create_lending(
        book,
        reader,
        sequence,
        today,
        deps.config.lending_duration_in_days,
        deps.config.fine_value_per_day_in_cents,
    )
    .map_err(|e| LendingApplicationError::DomainError(format!("{e:?}")))?;

    tracing::info!(
        lending_number = %lending.lending_number,
        limit_date = %lending.limit_date,
        "lending created"
    );

    // 5. 保存
    deps.lending_repository
        .save(lending)
        .await
        .map_err(|e| LendingApplicationError::RepositoryError(Box::new(e)))
}

/// 貸出を返却済みにする
///
/// ビジネスルール：
/// - 評価（0〜10）とコメント（最大1024文字）は遷移を試みる前に検証する
/// - 返却済みへの再返却は`LendingAlreadyReturned`
/// - 観測versionが古ければ`VersionConflict`。途中状態は残らない
/// - versionの最終検証は保存時のcompare-and-swap。読み込み後に別の返却が
///   割り込んだ場合、負けた側は`VersionConflict`を受け取る
///
/// # 戻り値
/// 保存された返却済みの貸出集約
pub async fn set_returned(
    deps: &ServiceDependencies,
    cmd: SetLendingReturned,
) -> Result<Lending> {
    let lending_number: LendingNumber = cmd
        .lending_number
        .parse()
        .map_err(|e| LendingApplicationError::InvalidLendingNumber(format!("{e:?}")))?;

    // 遷移前の入力検証
    let rating = cmd
        .rating
        .map(Rating::try_from)
        .transpose()
        .map_err(|_| LendingApplicationError::InvalidRating {
            value: cmd.rating.unwrap_or_default(),
        })?;
    let commentary = cmd
        .commentary
        .map(Commentary::try_from)
        .transpose()
        .map_err(|_| LendingApplicationError::InvalidCommentary)?;

    let lending = deps
        .lending_repository
        .find_by_lending_number(&lending_number)
        .await
        .map_err(LendingApplicationError::RepositoryError)?
        .ok_or(LendingApplicationError::LendingNotFound)?;

    let today = Utc::now().date_naive();

    let returned =
        lending::set_returned(&lending, today, cmd.expected_version, commentary, rating)
            .map_err(|e| match e {
                ReturnLendingError::AlreadyReturned => {
                    LendingApplicationError::LendingAlreadyReturned
                }
                ReturnLendingError::VersionConflict { expected, actual } => {
                    LendingApplicationError::VersionConflict { expected, actual }
                }
            })?;

    tracing::info!(
        lending_number = %returned.lending_number,
        days_delayed = lending::days_delayed(&returned, today),
        "lending returned"
    );

    deps.lending_repository
        .save(returned)
        .await
        .map_err(|e| match e {
            SaveError::VersionConflict { actual, .. } => {
                LendingApplicationError::VersionConflict {
                    expected: cmd.expected_version,
                    actual,
                }
            }
            SaveError::Storage(source) => LendingApplicationError::RepositoryError(source),
        })
}

/// ビジネスキーで貸出を取得する
pub async fn find_by_lending_number(
    deps: &ServiceDependencies,
    lending_number: &str,
) -> Result<Option<Lending>> {
    let lending_number: LendingNumber = lending_number
        .parse()
        .map_err(|e| LendingApplicationError::InvalidLendingNumber(format!("{e:?}")))?;

    deps.lending_repository
        .find_by_lending_number(&lending_number)
        .await
        .map_err(LendingApplicationError::RepositoryError)
}

/// 延滞中の貸出を取得する
///
/// ページ未指定時は`(1, 10)`。
pub async fn get_overdue(
    deps: &ServiceDependencies,
    page: Option<Page>,
) -> Result<Vec<Lending>> {
    let page = page.unwrap_or_default();
    let today = Utc::now().date_naive();

    deps.lending_repository
        .get_overdue(page, today)
        .await
        .map_err(LendingApplicationError::RepositoryError)
}

/// 条件で貸出を検索する
///
/// 日付は`YYYY-MM-DD`でなければならず、それ以外は
/// `InvalidDateFormat`（"Expected format is YYYY-MM-DD"）。
/// クエリ未指定時は「今日までの直近10日間」が検索窓になる。
pub async fn search_lendings(
    deps: &ServiceDependencies,
    page: Option<Page>,
    query: Option<SearchLendings>,
) -> Result<Vec<Lending>> {
    let page = page.unwrap_or_default();
    let today = Utc::now().date_naive();

    let query = query.unwrap_or_else(|| SearchLendings {
        start_date: Some((today - Duration::days(DEFAULT_SEARCH_WINDOW_DAYS)).to_string()),
        ..SearchLendings::default()
    });

    let filters = LendingSearchFilters {
        reader_number: query.reader_number.map(ReaderNumber::new),
        isbn: query.isbn.map(Isbn::new),
        returned: query.returned,
        start_date: query.start_date.as_deref().map(parse_date).transpose()?,
        end_date: query.end_date.as_deref().map(parse_date).transpose()?,
    };

    deps.lending_repository
        .search_lendings(page, filters)
        .await
        .map_err(LendingApplicationError::RepositoryError)
}

/// 読者とISBNの組み合わせで貸出を取得する
///
/// `returned`を指定した場合、返却済みフラグが一致するものだけに絞り込む。
pub async fn list_by_reader_number_and_isbn(
    deps: &ServiceDependencies,
    reader_number: &str,
    isbn: &str,
    returned: Option<bool>,
) -> Result<Vec<Lending>> {
    let reader_number = ReaderNumber::new(reader_number);
    let isbn = Isbn::new(isbn);

    let mut lendings = deps
        .lending_repository
        .list_by_reader_number_and_isbn(&reader_number, &isbn)
        .await
        .map_err(LendingApplicationError::RepositoryError)?;

    if let Some(returned) = returned {
        lendings.retain(|l| l.is_returned() == returned);
    }

    Ok(lendings)
}

/// ユーザー名から読者を解決して貸出を取得する
///
/// 読者が自分自身の貸出を参照するフロー。
pub async fn list_by_username_and_isbn(
    deps: &ServiceDependencies,
    username: &str,
    isbn: &str,
    returned: Option<bool>,
) -> Result<Vec<Lending>> {
    let reader = deps
        .reader_service
        .find_by_username(username)
        .await
        .map_err(LendingApplicationError::ReaderServiceError)?
        .ok_or(LendingApplicationError::ReaderNotFound)?;

    list_by_reader_number_and_isbn(deps, reader.reader_number.value(), isbn, returned).await
}

/// 返却済み貸出の平均貸出日数
///
/// `(returned_date - start_date)`の日数の平均を小数第1位に丸める
/// （四捨五入、round-half-up）。返却済みが1件もない場合は0.0。
pub async fn get_average_duration(deps: &ServiceDependencies) -> Result<f64> {
    let avg = deps
        .lending_repository
        .get_average_duration()
        .await
        .map_err(LendingApplicationError::RepositoryError)?
        .unwrap_or(0.0);

    Ok(round_one_decimal(avg))
}

/// 指定ISBNの返却済み貸出の平均貸出日数
pub async fn get_avg_lending_duration_by_isbn(
    deps: &ServiceDependencies,
    isbn: &str,
) -> Result<f64> {
    let avg = deps
        .lending_repository
        .get_avg_lending_duration_by_isbn(&Isbn::new(isbn))
        .await
        .map_err(LendingApplicationError::RepositoryError)?
        .unwrap_or(0.0);

    Ok(round_one_decimal(avg))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let date: NaiveDate = s
        .parse()
        .map_err(|_| LendingApplicationError::InvalidDateFormat)?;
    // chronoの解析は桁数や符号に寛容なので、`YYYY-MM-DD`の正規形と
    // 往復一致する入力だけを受け付ける
    if date.to_string() != s {
        return Err(LendingApplicationError::InvalidDateFormat);
    }
    Ok(date)
}

/// 小数第1位への丸め（round-half-up）
///
/// `f64::round`はゼロから遠ざかる丸めであり、貸出日数は非負なので
/// half-upと一致する。
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
