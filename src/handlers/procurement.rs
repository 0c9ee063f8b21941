// src/handlers/procurement.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::procurement_repo::SupplierItemInput,
    handlers::validate_not_negative,
    middleware::{business::BusinessContext, i18n::Locale},
    models::procurement::SupplierWithItems,
    services::procurement_service::SupplierInput,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierItemPayload {
    pub item_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 3.2)]
    pub purchase_price: Decimal,

    #[validate(length(min = 1, max = 50, message = "Payment method is required."))]
    #[schema(example = "Bank transfer")]
    pub payment_method: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    #[schema(example = "Acme Foods")]
    pub name: String,

    #[validate(email(message = "The e-mail provided is invalid."))]
    pub email: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    // Na edição, substitui o conjunto inteiro
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<SupplierItemPayload>,
}

impl SupplierPayload {
    fn input(&self) -> SupplierInput<'_> {
        SupplierInput {
            name: &self.name,
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
            items: self
                .items
                .iter()
                .map(|i| SupplierItemInput {
                    item_id: i.item_id,
                    purchase_price: i.purchase_price,
                    payment_method: &i.payment_method,
                })
                .collect(),
        }
    }
}

// GET /api/suppliers
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Fornecedores com seus itens", body = Vec<SupplierWithItems>)),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .procurement_service
        .list_suppliers(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(suppliers)))
}

// GET /api/suppliers/archived
#[utoipa::path(
    get,
    path = "/api/suppliers/archived",
    tag = "Suppliers",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Fornecedores excluídos", body = Vec<SupplierWithItems>)),
    security(("api_jwt" = []))
)]
pub async fn list_archived_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .procurement_service
        .list_archived_suppliers(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(suppliers)))
}

// GET /api/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 200, description = "Fornecedor", body = SupplierWithItems),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .procurement_service
        .get_supplier(business.id, supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplier)))
}

// POST /api/suppliers
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = SupplierPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Fornecedor criado", body = SupplierWithItems),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .procurement_service
        .create_supplier(business.id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /api/suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    request_body = SupplierPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = SupplierWithItems),
        (status = 404, description = "Fornecedor ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(supplier_id): Path<Uuid>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .procurement_service
        .update_supplier(business.id, supplier_id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplier)))
}

// DELETE /api/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 204, description = "Fornecedor excluído"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .procurement_service
        .delete_supplier(business.id, supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/suppliers/{id}/restore
#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/restore",
    tag = "Suppliers",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 204, description = "Fornecedor restaurado"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .procurement_service
        .restore_supplier(business.id, supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
