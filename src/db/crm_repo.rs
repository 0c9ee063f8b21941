// src/db/crm_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::on_unique_violation, error::AppError},
    models::crm::Customer,
};

const CUSTOMER_COLUMNS: &str =
    "id, business_id, branch_id, full_name, email, phone, created_at, updated_at";

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_customers(&self, business_id: Uuid) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE business_id = $1
            ORDER BY full_name ASC
            "#
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn find_customer(&self, business_id: Uuid, customer_id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND business_id = $2"
        ))
        .bind(customer_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    /// Verifica e-mail duplicado na empresa, ignorando `exclude_id` (edição)
    pub async fn email_in_use(
        &self,
        business_id: Uuid,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM customers
                WHERE business_id = $1
                  AND LOWER(email) = LOWER($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(business_id)
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_customer(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        full_name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (business_id, branch_id, full_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(branch_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        // Corrida entre a checagem e o INSERT cai aqui
        .map_err(|e| on_unique_violation(e, "uq_customers_business_email", AppError::CustomerEmailAlreadyExists))
    }

    pub async fn update_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        branch_id: Uuid,
        full_name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET branch_id = $3, full_name = $4, email = $5, phone = $6, updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(business_id)
        .bind(branch_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, "uq_customers_business_email", AppError::CustomerEmailAlreadyExists))
    }

    // Exclusão física. Não apaga enquanto houver pedido ativo do cliente
    // (a checagem vai no mesmo comando do DELETE).
    pub async fn delete_customer(&self, business_id: Uuid, customer_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM customers c
            WHERE c.id = $1 AND c.business_id = $2
              AND NOT EXISTS (
                  SELECT 1 FROM orders o
                  WHERE o.customer_id = c.id AND o.is_deleted = FALSE
              )
            "#,
        )
        .bind(customer_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
