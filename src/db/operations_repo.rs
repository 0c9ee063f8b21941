// src/db/operations_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::operations::{Order, OrderItemView, OrderLine, OrderSummary},
};

const ORDER_COLUMNS: &str = "id, business_id, branch_id, customer_id, user_id, order_name, \
    ordered_at, total_amount, is_completed, is_deleted, created_at, updated_at";

// Campos do cabeçalho que o usuário pode alterar (o total nunca vem do cliente)
pub struct OrderHeader<'a> {
    pub branch_id: Uuid,
    pub customer_id: Uuid,
    pub order_name: &'a str,
    pub ordered_at: DateTime<Utc>,
    pub is_completed: bool,
}

#[derive(Clone)]
pub struct OperationsRepository {
    pool: PgPool,
}

impl OperationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (participa da transação do serviço)
    // =========================================================================

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        user_id: Uuid,
        header: &OrderHeader<'_>,
        total_amount: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (
                business_id, branch_id, customer_id, user_id,
                order_name, ordered_at, total_amount, is_completed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(header.branch_id)
        .bind(header.customer_id)
        .bind(user_id)
        .bind(header.order_name)
        .bind(header.ordered_at)
        .bind(total_amount)
        .bind(header.is_completed)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    // Grava todas as linhas num único INSERT via UNNEST
    pub async fn insert_order_lines<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item_ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
        let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();
        let unit_prices: Vec<Decimal> = lines.iter().map(|l| l.unit_price).collect();
        let total_prices: Vec<Decimal> = lines.iter().map(|l| l.total_price).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO order_items (order_id, item_id, quantity, unit_price, total_price)
            SELECT $1, t.item_id, t.quantity, t.unit_price, t.total_price
            FROM UNNEST($2::uuid[], $3::int4[], $4::numeric[], $5::numeric[])
                AS t(item_id, quantity, unit_price, total_price)
            "#,
        )
        .bind(order_id)
        .bind(item_ids)
        .bind(quantities)
        .bind(unit_prices)
        .bind(total_prices)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Pedidos ativos, mais recentes primeiro
    pub async fn list_orders(&self, business_id: Uuid, limit: Option<i64>) -> Result<Vec<OrderSummary>, AppError> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.order_name, o.ordered_at, o.total_amount, o.is_completed,
                   o.branch_id, b.name AS branch_name,
                   o.customer_id, c.full_name AS customer_name
            FROM orders o
            JOIN branches b ON b.id = o.branch_id
            LEFT JOIN customers c ON c.id = o.customer_id
            WHERE o.business_id = $1 AND o.is_deleted = FALSE
            ORDER BY o.ordered_at DESC
            LIMIT $2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_order(&self, business_id: Uuid, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(order_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    // (nome da filial, nome do cliente)
    pub async fn order_labels(&self, order_id: Uuid) -> Result<(String, Option<String>), AppError> {
        let labels = sqlx::query_as::<_, (String, Option<String>)>(
            r#"
            SELECT b.name, c.full_name
            FROM orders o
            JOIN branches b ON b.id = o.branch_id
            LEFT JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(labels)
    }

    pub async fn list_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItemView>, AppError> {
        let items = sqlx::query_as::<_, OrderItemView>(
            r#"
            SELECT oi.id, oi.item_id, i.name AS item_name, i.sku,
                   oi.quantity, oi.unit_price, oi.total_price
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = $1
            ORDER BY i.name ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn amount_paid(&self, order_id: Uuid) -> Result<Decimal, AppError> {
        let paid: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE order_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(paid)
    }

    // =========================================================================
    //  ALTERAÇÃO DO CABEÇALHO / EXCLUSÃO
    // =========================================================================

    pub async fn update_order_header(
        &self,
        business_id: Uuid,
        order_id: Uuid,
        header: &OrderHeader<'_>,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET branch_id = $3, customer_id = $4, order_name = $5,
                ordered_at = $6, is_completed = $7, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(business_id)
        .bind(header.branch_id)
        .bind(header.customer_id)
        .bind(header.order_name)
        .bind(header.ordered_at)
        .bind(header.is_completed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    pub async fn soft_delete_order(&self, business_id: Uuid, order_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(order_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
