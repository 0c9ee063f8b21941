// src/db/procurement_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::procurement::{Supplier, SupplierItemView},
};

const SUPPLIER_COLUMNS: &str =
    "id, business_id, name, email, phone, is_deleted, created_at, updated_at";

// Item fornecido a gravar
#[derive(Debug, Clone, Copy)]
pub struct SupplierItemInput<'a> {
    pub item_id: Uuid,
    pub purchase_price: Decimal,
    pub payment_method: &'a str,
}

#[derive(Clone)]
pub struct ProcurementRepository {
    pool: PgPool,
}

impl ProcurementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_suppliers(&self, business_id: Uuid, deleted: bool) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS}
            FROM suppliers
            WHERE business_id = $1 AND is_deleted = $2
            ORDER BY name ASC
            "#
        ))
        .bind(business_id)
        .bind(deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    pub async fn find_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS}
            FROM suppliers
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            "#
        ))
        .bind(supplier_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    // Itens de vários fornecedores de uma vez (evita N+1 na listagem)
    pub async fn list_supplier_items(&self, supplier_ids: &[Uuid]) -> Result<Vec<SupplierItemView>, AppError> {
        let items = sqlx::query_as::<_, SupplierItemView>(
            r#"
            SELECT si.id, si.supplier_id, si.item_id, i.name AS item_name,
                   si.purchase_price, si.payment_method
            FROM supplier_items si
            JOIN items i ON i.id = si.item_id
            WHERE si.supplier_id = ANY($1)
            ORDER BY i.name ASC
            "#,
        )
        .bind(supplier_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn insert_supplier<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (business_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(business_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(executor)
        .await?;
        Ok(supplier)
    }

    pub async fn update_supplier<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        supplier_id: Uuid,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET name = $3, email = $4, phone = $5, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = FALSE
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(supplier_id)
        .bind(business_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_optional(executor)
        .await?;
        Ok(supplier)
    }

    pub async fn clear_supplier_items<'e, E>(&self, executor: E, supplier_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM supplier_items WHERE supplier_id = $1")
            .bind(supplier_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_supplier_items<'e, E>(
        &self,
        executor: E,
        supplier_id: Uuid,
        items: &[SupplierItemInput<'_>],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item_ids: Vec<Uuid> = items.iter().map(|i| i.item_id).collect();
        let prices: Vec<Decimal> = items.iter().map(|i| i.purchase_price).collect();
        let methods: Vec<String> = items.iter().map(|i| i.payment_method.to_string()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO supplier_items (supplier_id, item_id, purchase_price, payment_method)
            SELECT $1, t.item_id, t.purchase_price, t.payment_method
            FROM UNNEST($2::uuid[], $3::numeric[], $4::text[])
                AS t(item_id, purchase_price, payment_method)
            "#,
        )
        .bind(supplier_id)
        .bind(item_ids)
        .bind(prices)
        .bind(methods)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_supplier_deleted(
        &self,
        business_id: Uuid,
        supplier_id: Uuid,
        deleted: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET is_deleted = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND is_deleted = NOT $3
            "#,
        )
        .bind(supplier_id)
        .bind(business_id)
        .bind(deleted)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
