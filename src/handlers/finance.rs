// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::{Page, PageParams},
    },
    config::AppState,
    handlers::validate_positive,
    middleware::{business::BusinessContext, i18n::Locale},
    models::finance::{Expense, ExpenseCategory, Payment, PaymentView},
    services::finance_service::{ExpenseInput, ExpenseQuery},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// =============================================================================
//  ÁREA 1: PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub order_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Payment method is required."))]
    #[schema(example = "Card")]
    pub method: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 25.0)]
    pub amount: Decimal,
}

// GET /api/payments
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        PageParams,
        DateRangeQuery
    ),
    responses((status = 200, description = "Pagamentos paginados", body = Page<PaymentView>)),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(page): Query<PageParams>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .finance_service
        .list_payments(business.id, &page, range.start_date, range.end_date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payments)))
}

// GET /api/payments/{id}
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pagamento")
    ),
    responses(
        (status = 200, description = "Pagamento", body = Payment),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state
        .finance_service
        .get_payment(business.id, payment_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payment)))
}

// POST /api/payments
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Finance",
    request_body = PaymentPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Pagamento registrado", body = Payment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<PaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .finance_service
        .create_payment(business.id, payload.order_id, &payload.method, payload.amount)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// PUT /api/payments/{id}
#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    tag = "Finance",
    request_body = PaymentPayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pagamento")
    ),
    responses(
        (status = 200, description = "Pagamento atualizado", body = Payment),
        (status = 404, description = "Pagamento ou pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<PaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .finance_service
        .update_payment(business.id, payment_id, payload.order_id, &payload.method, payload.amount)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payment)))
}

// DELETE /api/payments/{id}
#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID do pagamento")
    ),
    responses(
        (status = 204, description = "Pagamento excluído"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_payment(business.id, payment_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: DESPESAS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseFilterQuery {
    pub branch_id: Option<Uuid>,
    /// Texto exato da categoria
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub branch_id: Uuid,

    #[validate(length(max = 100))]
    #[schema(example = "Rent")]
    pub category: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 1200.0)]
    pub amount: Decimal,

    /// Padrão: agora
    pub expense_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 50, message = "Payment method is required."))]
    pub payment_method: String,

    pub description: Option<String>,
}

impl ExpensePayload {
    fn input(&self) -> ExpenseInput<'_> {
        ExpenseInput {
            branch_id: self.branch_id,
            category: self.category.as_deref(),
            amount: self.amount,
            expense_date: self.expense_date,
            payment_method: &self.payment_method,
            description: self.description.as_deref(),
        }
    }
}

// GET /api/expenses
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        PageParams,
        ExpenseFilterQuery
    ),
    responses((status = 200, description = "Despesas paginadas", body = Page<Expense>)),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Query(page): Query<PageParams>,
    Query(filter): Query<ExpenseFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ExpenseQuery {
        branch_id: filter.branch_id,
        category: filter.category,
        start_date: filter.start_date,
        end_date: filter.end_date,
    };

    let expenses = app_state
        .finance_service
        .list_expenses(business.id, &page, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(expenses)))
}

// GET /api/expenses/{id}
#[utoipa::path(
    get,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da despesa")
    ),
    responses(
        (status = 200, description = "Despesa", body = Expense),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(expense_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = app_state
        .finance_service
        .get_expense(business.id, expense_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(expense)))
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Finance",
    request_body = ExpensePayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Despesa criada", body = Expense),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let expense = app_state
        .finance_service
        .create_expense(business.id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// PUT /api/expenses/{id}
#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    tag = "Finance",
    request_body = ExpensePayload,
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da despesa")
    ),
    responses(
        (status = 200, description = "Despesa atualizada", body = Expense),
        (status = 404, description = "Despesa ou filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let expense = app_state
        .finance_service
        .update_expense(business.id, expense_id, &payload.input())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(expense)))
}

// DELETE /api/expenses/{id}
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa"),
        ("id" = Uuid, Path, description = "ID da despesa")
    ),
    responses(
        (status = 204, description = "Despesa excluída"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Path(expense_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_expense(business.id, expense_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: CATEGORIAS DE DESPESA
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExpenseCategoryPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)."))]
    #[schema(example = "Utilities")]
    pub name: String,
    /// Ex.: "fixed", "variable"
    #[validate(length(max = 50))]
    pub kind: Option<String>,
}

// GET /api/expense-categories
#[utoipa::path(
    get,
    path = "/api/expense-categories",
    tag = "Finance",
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses((status = 200, description = "Categorias de despesa", body = Vec<ExpenseCategory>)),
    security(("api_jwt" = []))
)]
pub async fn list_expense_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .finance_service
        .list_expense_categories(business.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/expense-categories
#[utoipa::path(
    post,
    path = "/api/expense-categories",
    tag = "Finance",
    request_body = ExpenseCategoryPayload,
    params(("x-business-id" = Uuid, Header, description = "ID da empresa")),
    responses(
        (status = 201, description = "Categoria criada", body = ExpenseCategory),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense_category(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
    Json(payload): Json<ExpenseCategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .finance_service
        .create_expense_category(business.id, &payload.name, payload.kind.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}
