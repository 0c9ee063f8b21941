// src/handlers/operations.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, business::BusinessContext, i18n::Locale},
    models::operations::{Order, OrderDetail, OrderLineRequest, OrderSummary},
    services::operation_service::{NewOrder, OrderChanges},
};

// =============================================================================
//  PEDIDOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, max = 100, message = "Order name is required (max 100 characters)."))]
    #[schema(example = "Table 4")]
    pub order_name: String,
    pub branch_id: Uuid,
    pub customer_id: Uuid,
    /// Padrão: agora
    pub ordered_at: Option<DateTime<Utc>>,
    // Quantidades <= 0 e itens fora do catálogo são ignorados pelo serviço
    #[validate(nested)]
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

// O total não é aceito do cliente: vem sempre das linhas gravadas
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    #[validate(length(min = 1, max = 100, message = "Order name is required (max 100 characters)."))]
    pub order_name: String,
    pub branch_id: Uuid,
    pub customer_id: Uuid,
    pub ordered_at: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Pedidos, mais recentes primeiro", body = Vec<OrderSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .operation_service
        .list_orders(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Pedido com itens e saldo", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .operation_service
        .get_order_detail(business.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Pedido criado", body = OrderDetail),
        (status = 400, description = "Pedido sem itens válidos"),
        (status = 404, description = "Filial ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    business: BusinessContext,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let new_order = NewOrder {
        order_name: &payload.order_name,
        branch_id: payload.branch_id,
        customer_id: payload.customer_id,
        ordered_at: payload.ordered_at,
        lines: &payload.lines,
    };

    let detail = app_state
        .operation_service
        .create_order(business.id, user.id, &new_order)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// PUT /api/orders/{id}
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Pedido atualizado", body = Order),
        (status = 404, description = "Pedido, filial ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let changes = OrderChanges {
        order_name: &payload.order_name,
        branch_id: payload.branch_id,
        customer_id: payload.customer_id,
        ordered_at: payload.ordered_at,
        is_completed: payload.is_completed,
    };

    let order = app_state
        .operation_service
        .update_order(business.id, order_id, &changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// DELETE /api/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 204, description = "Pedido excluído"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .operation_service
        .delete_order(business.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  RECIBO
// =============================================================================

// GET /api/orders/{id}/receipt
#[utoipa::path(
    get,
    path = "/api/orders/{id}/receipt",
    tag = "Orders",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Recibo em PDF", content_type = "application/pdf"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn order_receipt(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let detail = app_state
        .operation_service
        .get_order_detail(business.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .order_receipt_pdf(business.name, detail)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"receipt_{}.pdf\"", order_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(quantity: i32) -> CreateOrderPayload {
        CreateOrderPayload {
            order_name: "Table 4".to_string(),
            branch_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            ordered_at: None,
            lines: vec![OrderLineRequest { item_id: Uuid::new_v4(), quantity }],
        }
    }

    #[test]
    fn line_quantities_are_bounded_above_only() {
        // <= 0 passa: a linha é descartada na montagem do pedido
        assert!(payload(0).validate().is_ok());
        assert!(payload(100_000).validate().is_ok());

        let errors = payload(100_001).validate().unwrap_err();
        assert!(errors.errors().contains_key("lines"));
    }
}
