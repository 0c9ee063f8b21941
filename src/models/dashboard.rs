// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    finance::Expense,
    inventory::InventoryLevelView,
    operations::OrderSummary,
};

// 1. Cards do topo
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    #[sqlx(skip)]
    pub net_profit: Decimal,
    pub order_count: i64,
    pub customer_count: i64,
    pub item_count: i64,
    pub branch_count: i64,
}

// 2. Agregado mensal cru, como vem do SQL
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyTotalRow {
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
}

// Ponto da série mensal (meses sem movimento entram com zero)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
}

// 3. Mais vendidos
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopItemEntry {
    pub item_id: Uuid,
    pub item_name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub recent_orders: Vec<OrderSummary>,
    pub recent_expenses: Vec<Expense>,
    pub monthly_revenue: Vec<MonthlyAmount>,
    pub monthly_expenses: Vec<MonthlyAmount>,
    pub top_items: Vec<TopItemEntry>,
    pub low_stock: Vec<InventoryLevelView>,
}
