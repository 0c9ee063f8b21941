// src/handlers/business.rs

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
    middleware::{auth::AuthenticatedUser, business::BusinessContext, i18n::Locale},
    models::business::{Branch, BranchDetail, Business},
    services::business_service::{BranchInput, BusinessInput},
};

// =============================================================================
//  EMPRESAS (escopo = usuário autenticado)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    #[schema(example = "Corner Bakery")]
    pub name: String,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "America/Sao_Paulo")]
    pub timezone: Option<String>,
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "Active")]
    pub status: Option<String>,
}

impl BusinessPayload {
    fn input(&self) -> BusinessInput<'_> {
        BusinessInput {
            name: &self.name,
            industry: self.industry.as_deref(),
            timezone: self.timezone.as_deref(),
            status: self.status.as_deref(),
        }
    }
}

// GET /api/businesses
#[utoipa::path(
    get,
    path = "/api/businesses",
    tag = "Businesses",
    responses((status = 200, description = "Empresas do usuário", body = Vec<Business>)),
    security(("api_jwt" = []))
)]
pub async fn list_businesses(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let businesses = app_state
        .business_service
        .list_businesses(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(businesses)))
}

// GET /api/businesses/archived
#[utoipa::path(
    get,
    path = "/api/businesses/archived",
    tag = "Businesses",
    responses((status = 200, description = "Empresas excluídas", body = Vec<Business>)),
    security(("api_jwt" = []))
)]
pub async fn list_archived_businesses(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let businesses = app_state
        .business_service
        .list_archived_businesses(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(businesses)))
}

// GET /api/businesses/{id}
#[utoipa::path(
    get,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = Business),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .business_service
        .get_business(user.id, business_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(business)))
}

// POST /api/businesses
#[utoipa::path(
    post,
    path = "/api/businesses",
    tag = "Businesses",
    request_body = BusinessPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Business),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let business = app_state
        .business_service
        .create_business(user.id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(business)))
}

// PUT /api/businesses/{id}
#[utoipa::path(
    put,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    request_body = BusinessPayload,
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa atualizada", body = Business),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
    Json(payload): Json<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let business = app_state
        .business_service
        .update_business(user.id, business_id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(business)))
}

// DELETE /api/businesses/{id}
#[utoipa::path(
    delete,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 204, description = "Empresa excluída"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .business_service
        .delete_business(user.id, business_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/businesses/{id}/restore
#[utoipa::path(
    post,
    path = "/api/businesses/{id}/restore",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 204, description = "Empresa restaurada"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .business_service
        .restore_business(user.id, business_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  FILIAIS (escopo = x-business-id)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    #[schema(example = "Downtown")]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// Na edição: move a filial para outra empresa do mesmo usuário
    pub business_id: Option<Uuid>,
}

impl BranchPayload {
    fn input(&self) -> BranchInput<'_> {
        BranchInput {
            name: &self.name,
            address: self.address.as_deref(),
            phone: self.phone.as_deref(),
        }
    }
}

// GET /api/branches
#[utoipa::path(
    get,
    path = "/api/branches",
    tag = "Branches",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Filiais da empresa", body = Vec<Branch>)),
    security(("api_jwt" = []))
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let branches = app_state
        .business_service
        .list_branches(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branches)))
}

// GET /api/branches/archived
#[utoipa::path(
    get,
    path = "/api/branches/archived",
    tag = "Branches",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Filiais excluídas", body = Vec<Branch>)),
    security(("api_jwt" = []))
)]
pub async fn list_archived_branches(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let branches = app_state
        .business_service
        .list_archived_branches(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branches)))
}

// GET /api/branches/{id}
#[utoipa::path(
    get,
    path = "/api/branches/{id}",
    tag = "Branches",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 200, description = "Filial com itens e estoque", body = BranchDetail),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .business_service
        .get_branch_detail(business.id, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/branches
#[utoipa::path(
    post,
    path = "/api/branches",
    tag = "Branches",
    request_body = BranchPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Filial criada", body = Branch),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<BranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .business_service
        .create_branch(business.id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(branch)))
}

// PUT /api/branches/{id}
#[utoipa::path(
    put,
    path = "/api/branches/{id}",
    tag = "Branches",
    request_body = BranchPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 200, description = "Filial atualizada", body = Branch),
        (status = 404, description = "Filial ou empresa de destino não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    business: BusinessContext,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<BranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .business_service
        .update_branch(user.id, business.id, branch_id, payload.business_id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branch)))
}

// DELETE /api/branches/{id}
#[utoipa::path(
    delete,
    path = "/api/branches/{id}",
    tag = "Branches",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 204, description = "Filial excluída"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .business_service
        .delete_branch(business.id, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/branches/{id}/restore
#[utoipa::path(
    post,
    path = "/api/branches/{id}/restore",
    tag = "Branches",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da filial")
    ),
    responses(
        (status = 204, description = "Filial restaurada"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .business_service
        .restore_branch(business.id, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
