// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategory {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto ou serviço (serviços usam duration_minutes)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: String,
    pub sku: String,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub min_stock_level: i32,
    pub last_update: DateTime<Utc>,
}

// Linha de estoque com os nomes, para listagens e alertas
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevelView {
    pub branch_id: Uuid,
    pub branch_name: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub sku: String,
    pub quantity: i32,
    pub min_stock_level: i32,
    pub last_update: DateTime<Utc>,
}
