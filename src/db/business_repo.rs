// src/db/business_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        business::{Branch, Business},
        inventory::InventoryLevelView,
    },
};

const BUSINESS_COLUMNS: &str =
    "id, user_id, name, industry, timezone, status, is_deleted, created_at, updated_at";
const BRANCH_COLUMNS: &str =
    "id, business_id, name, address, phone, is_deleted, created_at, updated_at";

// Empresas e filiais. Toda consulta de empresa filtra por user_id;
// filiais são sempre acessadas dentro de uma empresa já verificada.
#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub async fn list_businesses(&self, user_id: Uuid, deleted: bool) -> Result<Vec<Business>, AppError> {
        let businesses = sqlx::query_as::<_, Business>(&format!(
            r#"
            SELECT {BUSINESS_COLUMNS}
            FROM businesses
            WHERE user_id = $1 AND is_deleted = $2
            ORDER BY name ASC
            "#
        ))
        .bind(user_id)
        .bind(deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(businesses)
    }

    /// Empresa ativa do usuário (None se não existir, for de outro usuário ou estiver excluída)
    pub async fn find_business(&self, user_id: Uuid, business_id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(&format!(
            r#"
            SELECT {BUSINESS_COLUMNS}
            FROM businesses
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(business_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(business)
    }

    pub async fn create_business(
        &self,
        user_id: Uuid,
        name: &str,
        industry: Option<&str>,
        timezone: &str,
        status: &str,
    ) -> Result<Business, AppError> {
        let business = sqlx::query_as::<_, Business>(&format!(
            r#"
            INSERT INTO businesses (user_id, name, industry, timezone, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BUSINESS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(industry)
        .bind(timezone)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(business)
    }

    pub async fn update_business(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        name: &str,
        industry: Option<&str>,
        timezone: &str,
        status: &str,
    ) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(&format!(
            r#"
            UPDATE businesses
            SET name = $3, industry = $4, timezone = $5, status = $6, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            RETURNING {BUSINESS_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(user_id)
        .bind(name)
        .bind(industry)
        .bind(timezone)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(business)
    }

    /// Marca/desmarca a exclusão lógica. Retorna false se nada mudou.
    pub async fn set_business_deleted(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        deleted: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET is_deleted = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = NOT $3
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(deleted)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  FILIAIS
    // =========================================================================

    pub async fn list_branches(&self, business_id: Uuid, deleted: bool) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(&format!(
            r#"
            SELECT {BRANCH_COLUMNS}
            FROM branches
            WHERE business_id = $1 AND is_deleted = $2
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .bind(deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(branches)
    }

    pub async fn find_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>(&format!(
            r#"
            SELECT {BRANCH_COLUMNS}
            FROM branches
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(branch_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(branch)
    }

    pub async fn count_branch_items(&self, branch_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM items WHERE branch_id = $1 AND is_deleted = FALSE",
        )
        .bind(branch_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn branch_inventory(&self, branch_id: Uuid) -> Result<Vec<InventoryLevelView>, AppError> {
        let rows = sqlx::query_as::<_, InventoryLevelView>(
            r#"
            SELECT l.branch_id, b.name AS branch_name, l.item_id, i.name AS item_name, i.sku,
                   l.quantity, l.min_stock_level, l.last_update
            FROM inventory_levels l
            JOIN branches b ON b.id = l.branch_id
            JOIN items i ON i.id = l.item_id
            WHERE l.branch_id = $1 AND i.is_deleted = FALSE
            ORDER BY i.name ASC
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_branch(
        &self,
        business_id: Uuid,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Branch, AppError> {
        let branch = sqlx::query_as::<_, Branch>(&format!(
            r#"
            INSERT INTO branches (business_id, name, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {BRANCH_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(branch)
    }

    // `target_business_id` permite mover a filial para outra empresa do mesmo dono
    pub async fn update_branch(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        target_business_id: Uuid,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>(&format!(
            r#"
            UPDATE branches
            SET business_id = $3, name = $4, address = $5, phone = $6, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            RETURNING {BRANCH_COLUMNS}
            "#
        ))
        .bind(branch_id)
        .bind(business_id)
        .bind(target_business_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(branch)
    }

    pub async fn set_branch_deleted(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        deleted: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE branches
            SET is_deleted = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = NOT $3
            "#,
        )
        .bind(branch_id)
        .bind(business_id)
        .bind(deleted)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
