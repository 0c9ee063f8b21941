// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        finance_repo::ExpenseFilter, DashboardRepository, FinanceRepository, InventoryRepository,
        OperationsRepository,
    },
    models::dashboard::{Dashboard, MonthlyAmount, MonthlyTotalRow},
};

pub const RECENT_LIMIT: i64 = 5;
pub const TOP_ITEMS_LIMIT: i64 = 5;
pub const CHART_MONTHS: u32 = 6;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    operations_repo: OperationsRepository,
    finance_repo: FinanceRepository,
    inventory_repo: InventoryRepository,
}

impl DashboardService {
    pub fn new(
        repo: DashboardRepository,
        operations_repo: OperationsRepository,
        finance_repo: FinanceRepository,
        inventory_repo: InventoryRepository,
    ) -> Self {
        Self { repo, operations_repo, finance_repo, inventory_repo }
    }

    pub async fn get_dashboard(&self, business_id: Uuid) -> Result<Dashboard, AppError> {
        let today = Utc::now().date_naive();
        let first_month = first_chart_month(today, CHART_MONTHS);
        let since = month_start(first_month);

        let no_filter = ExpenseFilter::default();

        let (totals, recent_orders, recent_expenses, revenue_rows, expense_rows, top_items, low_stock) = tokio::try_join!(
            self.repo.get_totals(business_id),
            self.operations_repo.list_orders(business_id, Some(RECENT_LIMIT)),
            self.finance_repo.list_expenses(business_id, &no_filter, RECENT_LIMIT, 0),
            self.repo.monthly_revenue(business_id, since),
            self.repo.monthly_expenses(business_id, since),
            self.repo.top_items(business_id, TOP_ITEMS_LIMIT),
            self.inventory_repo.list_levels(business_id, None, true, Some(RECENT_LIMIT)),
        )?;

        Ok(Dashboard {
            totals,
            recent_orders,
            recent_expenses,
            monthly_revenue: densify_months(&revenue_rows, today, CHART_MONTHS),
            monthly_expenses: densify_months(&expense_rows, today, CHART_MONTHS),
            top_items,
            low_stock,
        })
    }
}

// Primeiro dia do mês mais antigo da janela (o mês atual conta)
fn first_chart_month(today: NaiveDate, months: u32) -> NaiveDate {
    let current = today.with_day(1).unwrap_or(today);
    current
        .checked_sub_months(Months::new(months.saturating_sub(1)))
        .unwrap_or(current)
}

fn month_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// Série mensal contínua terminando no mês de `today`.
/// Meses sem linha no SQL entram com zero.
pub fn densify_months(rows: &[MonthlyTotalRow], today: NaiveDate, months: u32) -> Vec<MonthlyAmount> {
    let totals: HashMap<(i32, u32), Decimal> = rows
        .iter()
        .filter_map(|r| u32::try_from(r.month).ok().map(|m| ((r.year, m), r.total)))
        .collect();

    let first = first_chart_month(today, months);

    (0..months)
        .filter_map(|offset| first.checked_add_months(Months::new(offset)))
        .map(|day| {
            let key = (day.year(), day.month());
            MonthlyAmount {
                label: day.format("%b %Y").to_string(),
                year: key.0,
                month: key.1,
                amount: totals.get(&key).copied().unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: i32, total: i64) -> MonthlyTotalRow {
        MonthlyTotalRow { year, month, total: Decimal::from(total) }
    }

    #[test]
    fn fills_missing_months_with_zero() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let rows = vec![row(2024, 11, 300), row(2025, 3, 50)];

        let series = densify_months(&rows, today, 6);

        let labels: Vec<&str> = series.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025"]
        );
        assert_eq!(series[0].amount, Decimal::ZERO);
        assert_eq!(series[1].amount, Decimal::from(300));
        assert_eq!(series[5].amount, Decimal::from(50));
    }

    #[test]
    fn window_starts_on_the_first_of_the_month() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        assert_eq!(
            first_chart_month(today, 6),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
    }
}
