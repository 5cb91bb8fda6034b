use crate::domain::lending::{self, Lending};
use crate::domain::value_objects::{Isbn, LendingNumber, ReaderNumber};
use crate::ports::lending_repository::{
    LendingRepository as LendingRepositoryTrait, LendingSearchFilters, Page, Result, SaveError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// LendingRepositoryのインメモリ実装
///
/// 貸出番号をキーにし、書き込みはmutexの下でversionを
/// compare-and-swapする。テストおよび組込み用途向けで、永続化はしない。
#[derive(Default)]
pub struct LendingRepository {
    lendings: Mutex<HashMap<LendingNumber, Lending>>,
}

impl LendingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_of(mut lendings: Vec<Lending>, page: Page) -> Vec<Lending> {
        if page.offset() >= lendings.len() {
            return Vec::new();
        }
        lendings.drain(..page.offset());
        lendings.truncate(page.limit);
        lendings
    }
}

#[async_trait]
impl LendingRepositoryTrait for LendingRepository {
    async fn find_by_lending_number(
        &self,
        lending_number: &LendingNumber,
    ) -> Result<Option<Lending>> {
        Ok(self.lendings.lock().unwrap().get(lending_number).cloned())
    }

    async fn list_outstanding_by_reader_number(
        &self,
        reader_number: &ReaderNumber,
    ) -> Result<Vec<Lending>> {
        let lendings = self.lendings.lock().unwrap();
        Ok(lendings
            .values()
            .filter(|l| l.is_outstanding() && l.reader_details.reader_number == *reader_number)
            .cloned()
            .collect())
    }

    async fn list_by_reader_number_and_isbn(
        &self,
        reader_number: &ReaderNumber,
        isbn: &Isbn,
    ) -> Result<Vec<Lending>> {
        let lendings = self.lendings.lock().unwrap();
        Ok(lendings
            .values()
            .filter(|l| {
                l.reader_details.reader_number == *reader_number && l.book.isbn == *isbn
            })
            .cloned()
            .collect())
    }

    async fn count_from_year(&self, year: i32) -> Result<u32> {
        let lendings = self.lendings.lock().unwrap();
        Ok(lendings
            .keys()
            .filter(|number| number.year() == year)
            .count() as u32)
    }

    async fn save(&self, lending: Lending) -> std::result::Result<Lending, SaveError> {
        let mut lendings = self.lendings.lock().unwrap();
        if let Some(stored) = lendings.get(&lending.lending_number) {
            if lending.version != stored.version + 1 {
                return Err(SaveError::VersionConflict {
                    attempted: lending.version,
                    actual: stored.version,
                });
            }
        }
        lendings.insert(lending.lending_number, lending.clone());
        Ok(lending)
    }

    async fn get_overdue(&self, page: Page, as_of: NaiveDate) -> Result<Vec<Lending>> {
        let lendings = self.lendings.lock().unwrap();
        let mut overdue: Vec<Lending> = lendings
            .values()
            .filter(|l| l.is_outstanding() && lending::days_delayed(l, as_of) > 0)
            .cloned()
            .collect();
        // 延滞が長いもの（期限が古いもの）から
        overdue.sort_by_key(|l| l.limit_date);
        Ok(Self::page_of(overdue, page))
    }

    async fn search_lendings(
        &self,
        page: Page,
        filters: LendingSearchFilters,
    ) -> Result<Vec<Lending>> {
        let lendings = self.lendings.lock().unwrap();
        let mut matched: Vec<Lending> = lendings
            .values()
            .filter(|l| {
                filters
                    .reader_number
                    .as_ref()
                    .is_none_or(|n| l.reader_details.reader_number == *n)
                    && filters.isbn.as_ref().is_none_or(|i| l.book.isbn == *i)
                    && filters.returned.is_none_or(|r| l.is_returned() == r)
                    && filters.start_date.is_none_or(|d| l.start_date >= d)
                    && filters.end_date.is_none_or(|d| l.start_date <= d)
            })
            .cloned()
            .collect();
        // 新しい貸出から
        matched.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(Self::page_of(matched, page))
    }

    async fn get_average_duration(&self) -> Result<Option<f64>> {
        let lendings = self.lendings.lock().unwrap();
        Ok(average_duration_of(lendings.values()))
    }

    async fn get_avg_lending_duration_by_isbn(&self, isbn: &Isbn) -> Result<Option<f64>> {
        let lendings = self.lendings.lock().unwrap();
        Ok(average_duration_of(
            lendings.values().filter(|l| l.book.isbn == *isbn),
        ))
    }
}

/// 返却済み貸出の`(returned_date - start_date)`日数の平均
fn average_duration_of<'a>(lendings: impl Iterator<Item = &'a Lending>) -> Option<f64> {
    let durations: Vec<i64> = lendings
        .filter_map(|l| {
            l.returned_date
                .map(|returned| returned.signed_duration_since(l.start_date).num_days())
        })
        .collect();

    if durations.is_empty() {
        return None;
    }
    Some(durations.iter().sum::<i64>() as f64 / durations.len() as f64)
}
