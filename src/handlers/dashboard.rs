// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid; // Para o Swagger params

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{business::BusinessContext, i18n::Locale},
    models::dashboard::Dashboard,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais, séries mensais, mais vendidos e alertas de estoque", body = Dashboard),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Empresa não encontrada")
    ),
    params(
        ("x-business-id" = Uuid, Header, description = "ID da empresa")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    business: BusinessContext,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .get_dashboard(business.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(dashboard)))
}
