// src/db/finance_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::on_unique_violation, error::AppError},
    models::finance::{Expense, ExpenseCategory, Payment, PaymentView},
};

const PAYMENT_COLUMNS: &str =
    "p.id, p.order_id, p.method, p.amount, p.paid_at, p.is_deleted, p.created_at, p.updated_at";
const EXPENSE_COLUMNS: &str = "id, business_id, branch_id, category, amount, expense_date, \
    payment_method, description, is_deleted, created_at, updated_at";

// Filtro das listagens de despesas
#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub branch_id: Option<Uuid>,
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

pub struct ExpenseFields<'a> {
    pub branch_id: Uuid,
    pub category: Option<&'a str>,
    pub amount: Decimal,
    pub expense_date: DateTime<Utc>,
    pub payment_method: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PAGAMENTOS (escopo via pedido -> empresa)
    // =========================================================================

    pub async fn count_payments(
        &self,
        business_id: Uuid,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            WHERE o.business_id = $1
              AND p.is_deleted = FALSE AND o.is_deleted = FALSE
              AND ($2::timestamptz IS NULL OR p.paid_at >= $2)
              AND ($3::timestamptz IS NULL OR p.paid_at < $3)
            "#,
        )
        .bind(business_id)
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_payments(
        &self,
        business_id: Uuid,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentView>, AppError> {
        let payments = sqlx::query_as::<_, PaymentView>(
            r#"
            SELECT p.id, p.order_id, o.order_name, p.method, p.amount, p.paid_at
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            WHERE o.business_id = $1
              AND p.is_deleted = FALSE AND o.is_deleted = FALSE
              AND ($2::timestamptz IS NULL OR p.paid_at >= $2)
              AND ($3::timestamptz IS NULL OR p.paid_at < $3)
            ORDER BY p.paid_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(business_id)
        .bind(from)
        .bind(until)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    pub async fn find_payment(&self, business_id: Uuid, payment_id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            WHERE p.id = $1 AND o.business_id = $2 AND p.is_deleted = FALSE AND o.is_deleted = FALSE
            "#
        ))
        .bind(payment_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    pub async fn create_payment(&self, order_id: Uuid, method: &str, amount: Decimal) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (order_id, method, amount, paid_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, order_id, method, amount, paid_at, is_deleted, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(method)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(payment)
    }

    // A data do pagamento é renovada na edição
    pub async fn update_payment(
        &self,
        business_id: Uuid,
        payment_id: Uuid,
        order_id: Uuid,
        method: &str,
        amount: Decimal,
    ) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments p
            SET order_id = $3, method = $4, amount = $5, paid_at = NOW(), updated_at = NOW()
            FROM orders o
            WHERE p.id = $1 AND o.id = p.order_id AND o.business_id = $2 AND p.is_deleted = FALSE AND o.is_deleted = FALSE
            RETURNING p.id, p.order_id, p.method, p.amount, p.paid_at, p.is_deleted, p.created_at, p.updated_at
            "#,
        )
        .bind(payment_id)
        .bind(business_id)
        .bind(order_id)
        .bind(method)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    pub async fn soft_delete_payment(&self, business_id: Uuid, payment_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE payments p
            SET is_deleted = TRUE, updated_at = NOW()
            FROM orders o
            WHERE p.id = $1 AND o.id = p.order_id AND o.business_id = $2 AND p.is_deleted = FALSE AND o.is_deleted = FALSE
            "#,
        )
        .bind(payment_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  DESPESAS
    // =========================================================================

    pub async fn count_expenses(&self, business_id: Uuid, filter: &ExpenseFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM expenses
            WHERE business_id = $1
              AND is_deleted = FALSE
              AND ($2::uuid IS NULL OR branch_id = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::timestamptz IS NULL OR expense_date >= $4)
              AND ($5::timestamptz IS NULL OR expense_date < $5)
            "#,
        )
        .bind(business_id)
        .bind(filter.branch_id)
        .bind(filter.category.as_deref())
        .bind(filter.from)
        .bind(filter.until)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_expenses(
        &self,
        business_id: Uuid,
        filter: &ExpenseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>, AppError> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE business_id = $1
              AND is_deleted = FALSE
              AND ($2::uuid IS NULL OR branch_id = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::timestamptz IS NULL OR expense_date >= $4)
              AND ($5::timestamptz IS NULL OR expense_date < $5)
            ORDER BY expense_date DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(business_id)
        .bind(filter.branch_id)
        .bind(filter.category.as_deref())
        .bind(filter.from)
        .bind(filter.until)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    pub async fn find_expense(&self, business_id: Uuid, expense_id: Uuid) -> Result<Option<Expense>, AppError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(expense_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn create_expense(&self, business_id: Uuid, fields: &ExpenseFields<'_>) -> Result<Expense, AppError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (
                business_id, branch_id, category, amount, expense_date, payment_method, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(fields.branch_id)
        .bind(fields.category)
        .bind(fields.amount)
        .bind(fields.expense_date)
        .bind(fields.payment_method)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        business_id: Uuid,
        expense_id: Uuid,
        fields: &ExpenseFields<'_>,
    ) -> Result<Option<Expense>, AppError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
            SET branch_id = $3, category = $4, amount = $5, expense_date = $6,
                payment_method = $7, description = $8, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(expense_id)
        .bind(business_id)
        .bind(fields.branch_id)
        .bind(fields.category)
        .bind(fields.amount)
        .bind(fields.expense_date)
        .bind(fields.payment_method)
        .bind(fields.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn soft_delete_expense(&self, business_id: Uuid, expense_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(expense_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  CATEGORIAS DE DESPESA
    // =========================================================================

    pub async fn list_expense_categories(&self, business_id: Uuid) -> Result<Vec<ExpenseCategory>, AppError> {
        let categories = sqlx::query_as::<_, ExpenseCategory>(
            r#"
            SELECT id, business_id, name, kind, created_at
            FROM expense_categories
            WHERE business_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create_expense_category(
        &self,
        business_id: Uuid,
        name: &str,
        kind: Option<&str>,
    ) -> Result<ExpenseCategory, AppError> {
        sqlx::query_as::<_, ExpenseCategory>(
            r#"
            INSERT INTO expense_categories (business_id, name, kind)
            VALUES ($1, $2, $3)
            RETURNING id, business_id, name, kind, created_at
            "#,
        )
        .bind(business_id)
        .bind(name)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, "uq_expense_categories_business_name", AppError::ExpenseCategoryAlreadyExists)
        })
    }
}
