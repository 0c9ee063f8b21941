// src/middleware/business.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::authenticate, i18n::Locale},
    models::auth::User,
};

// O nome do nosso cabeçalho HTTP customizado
pub const BUSINESS_ID_HEADER: &str = "x-business-id";

// Empresa selecionada pelo cabeçalho, já verificada como sendo do usuário
#[derive(Debug, Clone)]
pub struct BusinessContext {
    pub id: Uuid,
    pub name: String,
}

// Autentica e resolve o escopo da empresa numa só passada.
// Empresa de outro usuário ou excluída responde como inexistente.
pub async fn business_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let (user, business) = resolve_scope(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(business);
    Ok(next.run(request).await)
}

async fn resolve_scope(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<(User, BusinessContext), AppError> {
    let user = authenticate(app_state, headers).await?;
    let business_id = parse_business_header(headers)?;

    let business = app_state
        .business_service
        .get_business(user.id, business_id)
        .await?;

    Ok((user, BusinessContext { id: business.id, name: business.name }))
}

pub fn parse_business_header(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(BUSINESS_ID_HEADER)
        .ok_or(AppError::BusinessHeaderMissing)?;

    let value_str = value.to_str().map_err(|_| AppError::BusinessHeaderInvalid)?;

    Uuid::parse_str(value_str.trim()).map_err(|_| AppError::BusinessHeaderInvalid)
}

impl FromRequestParts<AppState> for BusinessContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BusinessContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::BusinessHeaderMissing
                    .to_api_error(&Locale::from_headers(&parts.headers), &state.i18n_store)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn rejects_missing_or_malformed_header() {
        let mut headers = HeaderMap::new();
        assert!(matches!(parse_business_header(&headers), Err(AppError::BusinessHeaderMissing)));

        headers.insert(BUSINESS_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(parse_business_header(&headers), Err(AppError::BusinessHeaderInvalid)));

        let id = Uuid::new_v4();
        headers.insert(BUSINESS_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(parse_business_header(&headers).unwrap(), id);
    }
}
