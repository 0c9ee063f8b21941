// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::report::Report,
    services::report_service::{ReportParams, XLSX_CONTENT_TYPE},
};

// Sem businessId o relatório consolida todas as empresas do usuário
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub business_id: Option<Uuid>,
    /// Padrão: hoje menos um mês
    pub start_date: Option<NaiveDate>,
    /// Padrão: hoje
    pub end_date: Option<NaiveDate>,
    /// summary | sales | expenses | inventory | customers | suppliers | full
    pub report_type: Option<String>,
}

impl ReportQuery {
    fn params(&self) -> ReportParams<'_> {
        ReportParams {
            business_id: self.business_id,
            start_date: self.start_date,
            end_date: self.end_date,
            report_type: self.report_type.as_deref(),
        }
    }
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório consolidado", body = Report),
        (status = 400, description = "Tipo ou período inválido"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = &app_state.report_service;

    let filter = service
        .resolve_filter(user.id, &query.params())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = service
        .build_report(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/export
#[utoipa::path(
    get,
    path = "/api/reports/export",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Planilha .xlsx", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Tipo ou período inválido"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let service = &app_state.report_service;

    let filter = service
        .resolve_filter(user.id, &query.params())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (file_name, bytes) = service
        .export_xlsx(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}
