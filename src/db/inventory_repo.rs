// src/db/inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{on_unique_violation, MAX_STOCK_QUANTITY},
        error::AppError,
    },
    models::{
        inventory::{InventoryLevel, InventoryLevelView, Item, ItemCategory},
        operations::CatalogPrice,
    },
};

const CATEGORY_COLUMNS: &str = "id, business_id, name, is_archived, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, business_id, branch_id, category_id, name, sku, cost_price, \
    sell_price, duration_minutes, description, is_deleted, created_at, updated_at";

// Campos editáveis de um item
pub struct ItemFields<'a> {
    pub branch_id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: &'a str,
    pub sku: &'a str,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    pub duration_minutes: Option<i32>,
    pub description: Option<&'a str>,
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(
        &self,
        business_id: Uuid,
        archived: bool,
        search: Option<&str>,
    ) -> Result<Vec<ItemCategory>, AppError> {
        let categories = sqlx::query_as::<_, ItemCategory>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM item_categories
            WHERE business_id = $1
              AND is_archived = $2
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .bind(archived)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_category(&self, business_id: Uuid, category_id: Uuid) -> Result<Option<ItemCategory>, AppError> {
        let category = sqlx::query_as::<_, ItemCategory>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM item_categories
            WHERE id = $1 AND business_id = $2 AND is_archived = FALSE
            "#
        ))
        .bind(category_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn create_category(&self, business_id: Uuid, name: &str) -> Result<ItemCategory, AppError> {
        sqlx::query_as::<_, ItemCategory>(&format!(
            r#"
            INSERT INTO item_categories (business_id, name)
            VALUES ($1, $2)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, "uq_item_categories_business_name", AppError::CategoryNameAlreadyExists)
        })
    }

    pub async fn update_category(
        &self,
        business_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> Result<Option<ItemCategory>, AppError> {
        sqlx::query_as::<_, ItemCategory>(&format!(
            r#"
            UPDATE item_categories
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_archived = FALSE
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(business_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, "uq_item_categories_business_name", AppError::CategoryNameAlreadyExists)
        })
    }

    pub async fn set_category_archived(
        &self,
        business_id: Uuid,
        category_id: Uuid,
        archived: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE item_categories
            SET is_archived = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_archived = NOT $3
            "#,
        )
        .bind(category_id)
        .bind(business_id)
        .bind(archived)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    /// Busca por nome ou SKU quando `search` vem preenchido
    pub async fn list_items(
        &self,
        business_id: Uuid,
        deleted: bool,
        branch_id: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE business_id = $1
              AND is_deleted = $2
              AND ($3::uuid IS NULL OR branch_id = $3)
              AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%' OR sku ILIKE '%' || $4 || '%')
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .bind(deleted)
        .bind(branch_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find_item(&self, business_id: Uuid, item_id: Uuid) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(item_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn create_item(&self, business_id: Uuid, fields: &ItemFields<'_>) -> Result<Item, AppError> {
        sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (
                business_id, branch_id, category_id, name, sku,
                cost_price, sell_price, duration_minutes, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(fields.branch_id)
        .bind(fields.category_id)
        .bind(fields.name)
        .bind(fields.sku)
        .bind(fields.cost_price)
        .bind(fields.sell_price)
        .bind(fields.duration_minutes)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, "uq_items_business_sku", AppError::SkuAlreadyExists))
    }

    pub async fn update_item(
        &self,
        business_id: Uuid,
        item_id: Uuid,
        fields: &ItemFields<'_>,
    ) -> Result<Option<Item>, AppError> {
        sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items
            SET branch_id = $3, category_id = $4, name = $5, sku = $6,
                cost_price = $7, sell_price = $8, duration_minutes = $9,
                description = $10, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(business_id)
        .bind(fields.branch_id)
        .bind(fields.category_id)
        .bind(fields.name)
        .bind(fields.sku)
        .bind(fields.cost_price)
        .bind(fields.sell_price)
        .bind(fields.duration_minutes)
        .bind(fields.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, "uq_items_business_sku", AppError::SkuAlreadyExists))
    }

    pub async fn set_item_deleted(&self, business_id: Uuid, item_id: Uuid, deleted: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET is_deleted = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = NOT $3
            "#,
        )
        .bind(item_id)
        .bind(business_id)
        .bind(deleted)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Preços de venda dos itens ativos da empresa dentre os pedidos.
    /// Itens excluídos ou de outra empresa simplesmente não voltam.
    pub async fn catalog_prices(&self, business_id: Uuid, item_ids: &[Uuid]) -> Result<Vec<CatalogPrice>, AppError> {
        let prices = sqlx::query_as::<_, CatalogPrice>(
            r#"
            SELECT id, sell_price
            FROM items
            WHERE business_id = $1 AND is_deleted = FALSE AND id = ANY($2)
            "#,
        )
        .bind(business_id)
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(prices)
    }

    /// Quantos dos ids informados são itens ativos da empresa
    pub async fn count_active_items(&self, business_id: Uuid, item_ids: &[Uuid]) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT id)
            FROM items
            WHERE business_id = $1 AND is_deleted = FALSE AND id = ANY($2)
            "#,
        )
        .bind(business_id)
        .bind(item_ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // =========================================================================
    //  ESTOQUE POR FILIAL
    // =========================================================================

    pub async fn list_levels(
        &self,
        business_id: Uuid,
        branch_id: Option<Uuid>,
        low_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<InventoryLevelView>, AppError> {
        let rows = sqlx::query_as::<_, InventoryLevelView>(
            r#"
            SELECT l.branch_id, b.name AS branch_name, l.item_id, i.name AS item_name, i.sku,
                   l.quantity, l.min_stock_level, l.last_update
            FROM inventory_levels l
            JOIN branches b ON b.id = l.branch_id
            JOIN items i ON i.id = l.item_id
            WHERE b.business_id = $1
              AND b.is_deleted = FALSE
              AND i.is_deleted = FALSE
              AND ($2::uuid IS NULL OR l.branch_id = $2)
              AND (NOT $3 OR l.quantity < l.min_stock_level)
            ORDER BY CASE WHEN $3 THEN l.quantity END ASC, b.name ASC, i.name ASC
            LIMIT $4
            "#,
        )
        .bind(business_id)
        .bind(branch_id)
        .bind(low_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn upsert_level(
        &self,
        branch_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        min_stock_level: i32,
    ) -> Result<InventoryLevel, AppError> {
        let level = sqlx::query_as::<_, InventoryLevel>(
            r#"
            INSERT INTO inventory_levels (branch_id, item_id, quantity, min_stock_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (branch_id, item_id)
            DO UPDATE SET quantity = EXCLUDED.quantity,
                          min_stock_level = EXCLUDED.min_stock_level,
                          last_update = NOW()
            RETURNING id, branch_id, item_id, quantity, min_stock_level, last_update
            "#,
        )
        .bind(branch_id)
        .bind(item_id)
        .bind(quantity)
        .bind(min_stock_level)
        .fetch_one(&self.pool)
        .await?;
        Ok(level)
    }

    /// Soma `delta` ao estoque. Retorna None quando o saldo ficaria negativo.
    // None: a saída deixaria o estoque negativo, ou a entrada passaria de MAX_STOCK_QUANTITY
    pub async fn adjust_level(&self, branch_id: Uuid, item_id: Uuid, delta: i32) -> Result<Option<InventoryLevel>, AppError> {
        // Entrada cria a linha se preciso; saída só mexe em linha existente
        let query = if delta >= 0 {
            sqlx::query_as::<_, InventoryLevel>(
                r#"
                INSERT INTO inventory_levels (branch_id, item_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (branch_id, item_id)
                DO UPDATE SET quantity = inventory_levels.quantity + EXCLUDED.quantity,
                              last_update = NOW()
                WHERE inventory_levels.quantity::BIGINT + EXCLUDED.quantity <= $4
                RETURNING id, branch_id, item_id, quantity, min_stock_level, last_update
                "#,
            )
            .bind(branch_id)
            .bind(item_id)
            .bind(delta)
            .bind(i64::from(MAX_STOCK_QUANTITY))
        } else {
            sqlx::query_as::<_, InventoryLevel>(
                r#"
                UPDATE inventory_levels
                SET quantity = quantity + $3, last_update = NOW()
                WHERE branch_id = $1 AND item_id = $2 AND quantity + $3 >= 0
                RETURNING id, branch_id, item_id, quantity, min_stock_level, last_update
                "#,
            )
            .bind(branch_id)
            .bind(item_id)
            .bind(delta)
        };

        let level = query.fetch_optional(&self.pool).await?;
        Ok(level)
    }
}
