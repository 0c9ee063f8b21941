// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{business::BusinessContext, i18n::Locale},
    models::crm::Customer,
    services::crm_service::CustomerInput,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub branch_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Full name is required (max 100 characters)."))]
    #[schema(example = "Maria Souza")]
    pub full_name: String,

    #[validate(email(message = "The e-mail provided is invalid."))]
    #[schema(example = "maria@example.com")]
    pub email: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

impl CustomerPayload {
    fn input(&self) -> CustomerInput<'_> {
        CustomerInput {
            branch_id: self.branch_id,
            full_name: &self.full_name,
            email: &self.email,
            phone: self.phone.as_deref(),
        }
    }
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "CRM",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Clientes da empresa", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .crm_service
        .list_customers(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "CRM",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .get_customer(business.id, customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "CRM",
    request_body = CustomerPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .create_customer(business.id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "CRM",
    request_body = CustomerPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "E-mail já cadastrado na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .update_customer(business.id, customer_id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "CRM",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente possui pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_customer(business.id, customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
