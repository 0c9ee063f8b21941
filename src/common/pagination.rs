// src/common/pagination.rs

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
// Maior página cujo offset ainda cabe em i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: &PageParams, total_count: i64) -> Self {
        let page_size = params.page_size();
        Self {
            items,
            page: params.page(),
            page_size,
            total_count,
            total_pages: (total_count + page_size - 1) / page_size,
        }
    }
}

// Converte datas do calendário em limites [início, fim) em UTC.
// O dia final entra inteiro no intervalo.
pub fn day_bounds(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = start.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|d| d.and_utc());
    let until = end
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc());
    (from, until)
}

/// Período padrão dos relatórios: último mês até hoje.
pub fn default_report_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| {
        today.checked_sub_months(Months::new(1)).unwrap_or(today)
    });
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped_and_page_starts_at_one() {
        let params = PageParams { page: Some(0), page_size: Some(500) };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PageParams { page: Some(3), page_size: None };
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let params = PageParams { page: Some(i64::MAX), page_size: Some(MAX_PAGE_SIZE) };
        assert_eq!(params.page(), MAX_PAGE);
        assert!(params.offset() >= 0);

        let params = PageParams { page: Some(i64::MAX), page_size: Some(20) };
        assert_eq!(params.offset(), (MAX_PAGE - 1) * 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PageParams::default();
        let page: Page<u8> = Page::new(vec![], &params, 41);
        assert_eq!(page.total_pages, 3);

        let empty: Page<u8> = Page::new(vec![], &params, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn end_day_is_inclusive() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (from, until) = day_bounds(Some(day), Some(day));

        assert_eq!(from.unwrap().to_rfc3339(), "2025-03-31T00:00:00+00:00");
        assert_eq!(until.unwrap().to_rfc3339(), "2025-04-01T00:00:00+00:00");
        assert_eq!(day_bounds(None, None), (None, None));
    }

    #[test]
    fn report_range_defaults_to_last_month() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (start, end) = default_report_range(None, None, today);

        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(end, today);
    }
}
