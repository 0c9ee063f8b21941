// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardTotals, MonthlyTotalRow, TopItemEntry},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo geral (um único SELECT = mesmo snapshot para todos os números)
    pub async fn get_totals(&self, business_id: Uuid) -> Result<DashboardTotals, AppError> {
        let mut totals = sqlx::query_as::<_, DashboardTotals>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders
                  WHERE business_id = $1 AND is_deleted = FALSE AND is_completed = TRUE) AS total_revenue,
                (SELECT COALESCE(SUM(amount), 0) FROM expenses
                  WHERE business_id = $1 AND is_deleted = FALSE) AS total_expenses,
                (SELECT COUNT(*) FROM orders
                  WHERE business_id = $1 AND is_deleted = FALSE) AS order_count,
                (SELECT COUNT(*) FROM customers
                  WHERE business_id = $1) AS customer_count,
                (SELECT COUNT(*) FROM items
                  WHERE business_id = $1 AND is_deleted = FALSE) AS item_count,
                (SELECT COUNT(*) FROM branches
                  WHERE business_id = $1 AND is_deleted = FALSE) AS branch_count
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        totals.net_profit = totals.total_revenue - totals.total_expenses;
        Ok(totals)
    }

    // 2. Receita mensal (pedidos concluídos) desde `since`
    pub async fn monthly_revenue(&self, business_id: Uuid, since: DateTime<Utc>) -> Result<Vec<MonthlyTotalRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyTotalRow>(
            r#"
            SELECT EXTRACT(YEAR FROM ordered_at)::int AS year,
                   EXTRACT(MONTH FROM ordered_at)::int AS month,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM orders
            WHERE business_id = $1
              AND is_deleted = FALSE
              AND is_completed = TRUE
              AND ordered_at >= $2
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(business_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn monthly_expenses(&self, business_id: Uuid, since: DateTime<Utc>) -> Result<Vec<MonthlyTotalRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyTotalRow>(
            r#"
            SELECT EXTRACT(YEAR FROM expense_date)::int AS year,
                   EXTRACT(MONTH FROM expense_date)::int AS month,
                   COALESCE(SUM(amount), 0) AS total
            FROM expenses
            WHERE business_id = $1
              AND is_deleted = FALSE
              AND expense_date >= $2
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(business_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // 3. Mais vendidos por quantidade
    pub async fn top_items(&self, business_id: Uuid, limit: i64) -> Result<Vec<TopItemEntry>, AppError> {
        let rows = sqlx::query_as::<_, TopItemEntry>(
            r#"
            SELECT i.id AS item_id,
                   i.name AS item_name,
                   SUM(oi.quantity)::bigint AS total_quantity,
                   COALESCE(SUM(oi.total_price), 0) AS total_revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN items i ON i.id = oi.item_id
            WHERE o.business_id = $1 AND o.is_deleted = FALSE
            GROUP BY i.id, i.name
            ORDER BY total_quantity DESC, i.name ASC
            LIMIT $2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
