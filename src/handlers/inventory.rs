// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::inventory_repo::ItemFields,
    handlers::validate_not_negative,
    middleware::{business::BusinessContext, i18n::Locale},
    models::inventory::{InventoryLevel, InventoryLevelView, Item, ItemCategory},
};

// =============================================================================
//  ÁREA 1: CATEGORIAS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Busca por nome
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    #[schema(example = "Beverages")]
    pub name: String,
}

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        SearchQuery
    ),
    responses((status = 200, description = "Categorias ativas", body = Vec<ItemCategory>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .inventory_service
        .list_categories(business.id, query.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// GET /api/categories/archived
#[utoipa::path(
    get,
    path = "/api/categories/archived",
    tag = "Inventory",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Categorias arquivadas", body = Vec<ItemCategory>)),
    security(("api_jwt" = []))
)]
pub async fn list_archived_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .inventory_service
        .list_archived_categories(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 200, description = "Categoria", body = ItemCategory),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let category = app_state
        .inventory_service
        .get_category(business.id, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Inventory",
    request_body = CategoryPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Categoria criada", body = ItemCategory),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .inventory_service
        .create_category(business.id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /api/categories/{id}
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Inventory",
    request_body = CategoryPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 200, description = "Categoria atualizada", body = ItemCategory),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .inventory_service
        .update_category(business.id, category_id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// DELETE /api/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 204, description = "Categoria arquivada"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn archive_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .archive_category(business.id, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/categories/{id}/restore
#[utoipa::path(
    post,
    path = "/api/categories/{id}/restore",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 204, description = "Categoria restaurada"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .restore_category(business.id, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: ITENS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ItemQuery {
    pub branch_id: Option<Uuid>,
    /// Busca por nome ou SKU
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub branch_id: Option<Uuid>,
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "SKU is required (max 50 characters)."))]
    #[schema(example = "CAF-001")]
    pub sku: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 4.5)]
    pub cost_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 9.9)]
    pub sell_price: Decimal,

    /// Duração em minutos (serviços)
    #[validate(range(min = 0, message = "Duration cannot be negative."))]
    pub duration_minutes: Option<i32>,

    pub description: Option<String>,
}

impl ItemPayload {
    fn fields(&self) -> ItemFields<'_> {
        ItemFields {
            branch_id: self.branch_id,
            category_id: self.category_id,
            name: &self.name,
            sku: &self.sku,
            cost_price: self.cost_price,
            sell_price: self.sell_price,
            duration_minutes: self.duration_minutes,
            description: self.description.as_deref(),
        }
    }
}

// GET /api/items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ItemQuery
    ),
    responses((status = 200, description = "Itens ativos", body = Vec<Item>)),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(query): Query<ItemQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_items(business.id, query.branch_id, query.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// GET /api/items/archived
#[utoipa::path(
    get,
    path = "/api/items/archived",
    tag = "Inventory",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Itens excluídos", body = Vec<Item>)),
    security(("api_jwt" = []))
)]
pub async fn list_archived_items(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_archived_items(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// GET /api/items/{id}
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Item", body = Item),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .inventory_service
        .get_item(business.id, item_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// POST /api/items
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Inventory",
    request_body = ItemPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Item criado", body = Item),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Categoria ou filial não encontrada"),
        (status = 409, description = "SKU já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .inventory_service
        .create_item(business.id, &payload.fields())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/items/{id}
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    tag = "Inventory",
    request_body = ItemPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Item atualizado", body = Item),
        (status = 404, description = "Item não encontrado"),
        (status = 409, description = "SKU já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .inventory_service
        .update_item(business.id, item_id, &payload.fields())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/items/{id}
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 204, description = "Item excluído"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_item(business.id, item_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/items/{id}/restore
#[utoipa::path(
    post,
    path = "/api/items/{id}/restore",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 204, description = "Item restaurado"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_item(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .restore_item(business.id, item_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: ESTOQUE POR FILIAL
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockPayload {
    pub branch_id: Uuid,
    pub item_id: Uuid,
    #[validate(range(min = 0, max = 1000000000, message = "Quantity must be between 0 and 1000000000."))]
    pub quantity: i32,
    #[validate(range(min = 0, max = 1000000000, message = "Minimum stock level must be between 0 and 1000000000."))]
    #[serde(default)]
    pub min_stock_level: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    pub branch_id: Uuid,
    pub item_id: Uuid,
    /// Positivo soma, negativo retira
    #[validate(range(min = -1000000, max = 1000000, message = "Adjustment must be between -1000000 and 1000000."))]
    #[schema(example = -2)]
    pub delta: i32,
}

// GET /api/inventory
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        StockQuery
    ),
    responses((status = 200, description = "Estoque por filial", body = Vec<InventoryLevelView>)),
    security(("api_jwt" = []))
)]
pub async fn list_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let levels = app_state
        .inventory_service
        .list_stock(business.id, query.branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(levels)))
}

// GET /api/inventory/low-stock
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    tag = "Inventory",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        LowStockQuery
    ),
    responses((status = 200, description = "Itens abaixo do estoque mínimo", body = Vec<InventoryLevelView>)),
    security(("api_jwt" = []))
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let levels = app_state
        .inventory_service
        .list_low_stock(business.id, query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(levels)))
}

// PUT /api/inventory
#[utoipa::path(
    put,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = SetStockPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 200, description = "Estoque definido", body = InventoryLevel),
        (status = 404, description = "Filial ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_stock_level(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<SetStockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let level = app_state
        .inventory_service
        .set_stock_level(
            business.id,
            payload.branch_id,
            payload.item_id,
            payload.quantity,
            payload.min_stock_level,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(level)))
}

// POST /api/inventory/adjust
#[utoipa::path(
    post,
    path = "/api/inventory/adjust",
    tag = "Inventory",
    request_body = AdjustStockPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 200, description = "Estoque ajustado", body = InventoryLevel),
        (status = 400, description = "Estoque ficaria negativo ou acima do limite"),
        (status = 404, description = "Filial ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let level = app_state
        .inventory_service
        .adjust_stock(business.id, payload.branch_id, payload.item_id, payload.delta)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_payloads_reject_out_of_range_quantities() {
        let adjust = |delta| AdjustStockPayload {
            branch_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            delta,
        };
        assert!(adjust(-1_000_000).validate().is_ok());
        assert!(adjust(1_000_001).validate().is_err());
        assert!(adjust(i32::MIN).validate().is_err());

        let set = SetStockPayload {
            branch_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity: i32::MAX,
            min_stock_level: 0,
        };
        assert!(set.validate().is_err());
    }
}
