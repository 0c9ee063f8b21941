// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, business::business_guard};

// Monta o router completo: rotas públicas, rotas do usuário e rotas da empresa
pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Só exigem o token (não dependem de empresa selecionada)
    let user_routes = Router::new()
        .route(
            "/api/users/me",
            get(handlers::auth::get_me).put(handlers::auth::update_me),
        )
        .route("/api/users/me/password", put(handlers::auth::change_password))
        .route("/api/users/me/email", put(handlers::auth::change_email))
        .route(
            "/api/businesses",
            get(handlers::business::list_businesses).post(handlers::business::create_business),
        )
        .route(
            "/api/businesses/archived",
            get(handlers::business::list_archived_businesses),
        )
        .route(
            "/api/businesses/{id}",
            get(handlers::business::get_business)
                .put(handlers::business::update_business)
                .delete(handlers::business::delete_business),
        )
        .route(
            "/api/businesses/{id}/restore",
            post(handlers::business::restore_business),
        )
        .route("/api/reports", get(handlers::reports::get_report))
        .route("/api/reports/export", get(handlers::reports::export_report))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Token + x-business-id
    let business_routes = Router::new()
        // --- Filiais ---
        .route(
            "/api/branches",
            get(handlers::business::list_branches).post(handlers::business::create_branch),
        )
        .route("/api/branches/archived", get(handlers::business::list_archived_branches))
        .route(
            "/api/branches/{id}",
            get(handlers::business::get_branch)
                .put(handlers::business::update_branch)
                .delete(handlers::business::delete_branch),
        )
        .route("/api/branches/{id}/restore", post(handlers::business::restore_branch))
        // --- Catálogo ---
        .route(
            "/api/categories",
            get(handlers::inventory::list_categories).post(handlers::inventory::create_category),
        )
        .route("/api/categories/archived", get(handlers::inventory::list_archived_categories))
        .route(
            "/api/categories/{id}",
            get(handlers::inventory::get_category)
                .put(handlers::inventory::update_category)
                .delete(handlers::inventory::archive_category),
        )
        .route("/api/categories/{id}/restore", post(handlers::inventory::restore_category))
        .route(
            "/api/items",
            get(handlers::inventory::list_items).post(handlers::inventory::create_item),
        )
        .route("/api/items/archived", get(handlers::inventory::list_archived_items))
        .route(
            "/api/items/{id}",
            get(handlers::inventory::get_item)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        .route("/api/items/{id}/restore", post(handlers::inventory::restore_item))
        // --- Estoque ---
        .route(
            "/api/inventory",
            get(handlers::inventory::list_stock).put(handlers::inventory::set_stock_level),
        )
        .route("/api/inventory/low-stock", get(handlers::inventory::list_low_stock))
        .route("/api/inventory/adjust", post(handlers::inventory::adjust_stock))
        // --- Clientes ---
        .route(
            "/api/customers",
            get(handlers::crm::list_customers).post(handlers::crm::create_customer),
        )
        .route(
            "/api/customers/{id}",
            get(handlers::crm::get_customer)
                .put(handlers::crm::update_customer)
                .delete(handlers::crm::delete_customer),
        )
        // --- Pedidos ---
        .route(
            "/api/orders",
            get(handlers::operations::list_orders).post(handlers::operations::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(handlers::operations::get_order)
                .put(handlers::operations::update_order)
                .delete(handlers::operations::delete_order),
        )
        .route("/api/orders/{id}/receipt", get(handlers::operations::order_receipt))
        // --- Financeiro ---
        .route(
            "/api/payments",
            get(handlers::finance::list_payments).post(handlers::finance::create_payment),
        )
        .route(
            "/api/payments/{id}",
            get(handlers::finance::get_payment)
                .put(handlers::finance::update_payment)
                .delete(handlers::finance::delete_payment),
        )
        .route(
            "/api/expenses",
            get(handlers::finance::list_expenses).post(handlers::finance::create_expense),
        )
        .route(
            "/api/expenses/{id}",
            get(handlers::finance::get_expense)
                .put(handlers::finance::update_expense)
                .delete(handlers::finance::delete_expense),
        )
        .route(
            "/api/expense-categories",
            get(handlers::finance::list_expense_categories)
                .post(handlers::finance::create_expense_category),
        )
        // --- Fornecedores ---
        .route(
            "/api/suppliers",
            get(handlers::procurement::list_suppliers).post(handlers::procurement::create_supplier),
        )
        .route("/api/suppliers/archived", get(handlers::procurement::list_archived_suppliers))
        .route(
            "/api/suppliers/{id}",
            get(handlers::procurement::get_supplier)
                .put(handlers::procurement::update_supplier)
                .delete(handlers::procurement::delete_supplier),
        )
        .route("/api/suppliers/{id}/restore", post(handlers::procurement::restore_supplier))
        // --- Dashboard ---
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            business_guard,
        ));

    let swagger = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(business_routes)
        .merge(swagger)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
