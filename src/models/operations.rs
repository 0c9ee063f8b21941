// src/models/operations.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Pedido (cabeçalho)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub user_id: Uuid,
    pub order_name: String,
    pub ordered_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub is_completed: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem de pedidos
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_name: String,
    pub ordered_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub is_completed: bool,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

// Pedido completo: cabeçalho + itens + situação do pagamento
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub header: Order,
    pub branch_name: String,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItemView>,
    pub amount_paid: Decimal,
    pub balance: Decimal,
}

// ---
// Montagem das linhas
// ---

// Linha pedida pelo cliente. Quantidade <= 0 é aceita aqui e descartada na montagem.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub item_id: Uuid,
    #[validate(range(max = 100000, message = "Quantity cannot exceed 100000."))]
    pub quantity: i32,
}

// Preço de venda vigente de um item ativo da empresa
#[derive(Debug, Clone, FromRow)]
pub struct CatalogPrice {
    pub id: Uuid,
    pub sell_price: Decimal,
}

// Linha já precificada, pronta para gravar
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
