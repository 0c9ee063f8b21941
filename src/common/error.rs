use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro de domínio. Os serviços e repositórios só conhecem este tipo;
// a conversão para HTTP acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Senha atual incorreta")]
    CurrentPasswordInvalid,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Escopo da empresa (x-business-id) ---
    #[error("Cabeçalho x-business-id ausente")]
    BusinessHeaderMissing,

    #[error("Cabeçalho x-business-id inválido")]
    BusinessHeaderInvalid,

    #[error("Empresa não encontrada")]
    BusinessNotFound,

    // --- Recursos ---
    #[error("Filial não encontrada")]
    BranchNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    #[error("Despesa não encontrada")]
    ExpenseNotFound,

    #[error("Fornecedor não encontrado")]
    SupplierNotFound,

    // --- Conflitos ---
    #[error("SKU já existe")]
    SkuAlreadyExists,

    #[error("Categoria já existe")]
    CategoryNameAlreadyExists,

    #[error("E-mail de cliente já existe")]
    CustomerEmailAlreadyExists,

    #[error("Categoria de despesa já existe")]
    ExpenseCategoryAlreadyExists,

    #[error("Cliente possui pedidos")]
    CustomerHasOrders,

    // --- Regras de negócio ---
    #[error("Pedido sem itens")]
    OrderWithoutItems,

    #[error("Nenhum item válido no pedido")]
    NoValidOrderItems,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Estoque acima do limite")]
    StockLimitExceeded,

    #[error("Total do pedido acima do limite")]
    OrderTotalTooLarge,

    #[error("Tipo de relatório inválido: {0}")]
    InvalidReportType(String),

    #[error("Período inválido")]
    InvalidDateRange,

    // --- Infraestrutura ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro ao gerar planilha: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Erro ao gerar documento: {0}")]
    DocumentError(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),
}

// Resposta de erro que sai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BusinessHeaderMissing
            | AppError::BusinessHeaderInvalid
            | AppError::CurrentPasswordInvalid
            | AppError::OrderWithoutItems
            | AppError::NoValidOrderItems
            | AppError::InsufficientStock
            | AppError::StockLimitExceeded
            | AppError::OrderTotalTooLarge
            | AppError::InvalidReportType(_)
            | AppError::InvalidDateRange => StatusCode::BAD_REQUEST,

            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,

            AppError::UserNotFound
            | AppError::BusinessNotFound
            | AppError::BranchNotFound
            | AppError::CategoryNotFound
            | AppError::ItemNotFound
            | AppError::CustomerNotFound
            | AppError::OrderNotFound
            | AppError::PaymentNotFound
            | AppError::ExpenseNotFound
            | AppError::SupplierNotFound => StatusCode::NOT_FOUND,

            AppError::EmailAlreadyExists
            | AppError::SkuAlreadyExists
            | AppError::CategoryNameAlreadyExists
            | AppError::CustomerEmailAlreadyExists
            | AppError::ExpenseCategoryAlreadyExists
            | AppError::CustomerHasOrders => StatusCode::CONFLICT,

            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Chave da mensagem no I18nStore
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::EmailAlreadyExists => "auth.email_exists",
            AppError::InvalidCredentials => "auth.invalid_credentials",
            AppError::CurrentPasswordInvalid => "auth.current_password_invalid",
            AppError::InvalidToken => "auth.invalid_token",
            AppError::UserNotFound => "auth.user_not_found",
            AppError::BusinessHeaderMissing => "business.header_missing",
            AppError::BusinessHeaderInvalid => "business.header_invalid",
            AppError::BusinessNotFound => "business.not_found",
            AppError::BranchNotFound => "branch.not_found",
            AppError::CategoryNotFound => "category.not_found",
            AppError::ItemNotFound => "item.not_found",
            AppError::CustomerNotFound => "customer.not_found",
            AppError::OrderNotFound => "order.not_found",
            AppError::PaymentNotFound => "payment.not_found",
            AppError::ExpenseNotFound => "expense.not_found",
            AppError::SupplierNotFound => "supplier.not_found",
            AppError::SkuAlreadyExists => "item.sku_exists",
            AppError::CategoryNameAlreadyExists => "category.name_exists",
            AppError::CustomerEmailAlreadyExists => "customer.email_exists",
            AppError::ExpenseCategoryAlreadyExists => "expense_category.name_exists",
            AppError::CustomerHasOrders => "customer.has_orders",
            AppError::OrderWithoutItems => "order.without_items",
            AppError::NoValidOrderItems => "order.no_valid_items",
            AppError::InsufficientStock => "inventory.insufficient_stock",
            AppError::StockLimitExceeded => "inventory.stock_limit",
            AppError::OrderTotalTooLarge => "order.total_too_large",
            AppError::InvalidReportType(_) => "report.invalid_type",
            AppError::InvalidDateRange => "report.invalid_date_range",
            AppError::DatabaseError(sqlx::Error::RowNotFound) => "error.not_found",
            _ => "error.internal",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let message = store.translate(&locale.0, self.message_key());

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        ApiError { status, message, details }
    }
}

// Campo -> lista de mensagens (ou o código do validador, se não houver mensagem)
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    json!(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::load()
    }

    #[test]
    fn maps_domain_errors_to_http_status() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::CustomerHasOrders.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::NoValidOrderItems.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OrderNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("Name is required.".into());
        errors.add("name", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "Name is required.");
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("connection string leaked"));
        let api = err.to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("leaked"));
    }

    #[test]
    fn message_follows_request_locale() {
        let en = AppError::OrderNotFound.to_api_error(&Locale("en".into()), &store());
        let pt = AppError::OrderNotFound.to_api_error(&Locale("pt".into()), &store());

        assert_ne!(en.message, pt.message);
        assert_eq!(pt.message, "Pedido não encontrado.");
    }
}
