// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,
        handlers::auth::change_password,
        handlers::auth::change_email,

        // --- Businesses ---
        handlers::business::list_businesses,
        handlers::business::list_archived_businesses,
        handlers::business::get_business,
        handlers::business::create_business,
        handlers::business::update_business,
        handlers::business::delete_business,
        handlers::business::restore_business,

        // --- Branches ---
        handlers::business::list_branches,
        handlers::business::list_archived_branches,
        handlers::business::get_branch,
        handlers::business::create_branch,
        handlers::business::update_branch,
        handlers::business::delete_branch,
        handlers::business::restore_branch,

        // --- INVENTORY ---
        handlers::inventory::list_categories,
        handlers::inventory::list_archived_categories,
        handlers::inventory::get_category,
        handlers::inventory::create_category,
        handlers::inventory::update_category,
        handlers::inventory::archive_category,
        handlers::inventory::restore_category,
        handlers::inventory::list_items,
        handlers::inventory::list_archived_items,
        handlers::inventory::get_item,
        handlers::inventory::create_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,
        handlers::inventory::restore_item,
        handlers::inventory::list_stock,
        handlers::inventory::list_low_stock,
        handlers::inventory::set_stock_level,
        handlers::inventory::adjust_stock,

        // --- CRM ---
        handlers::crm::list_customers,
        handlers::crm::get_customer,
        handlers::crm::create_customer,
        handlers::crm::update_customer,
        handlers::crm::delete_customer,

        // --- OPERATIONS ---
        handlers::operations::list_orders,
        handlers::operations::get_order,
        handlers::operations::create_order,
        handlers::operations::update_order,
        handlers::operations::delete_order,
        handlers::operations::order_receipt,

        // --- FINANCE ---
        handlers::finance::list_payments,
        handlers::finance::get_payment,
        handlers::finance::create_payment,
        handlers::finance::update_payment,
        handlers::finance::delete_payment,
        handlers::finance::list_expenses,
        handlers::finance::get_expense,
        handlers::finance::create_expense,
        handlers::finance::update_expense,
        handlers::finance::delete_expense,
        handlers::finance::list_expense_categories,
        handlers::finance::create_expense_category,

        // --- Suppliers ---
        handlers::procurement::list_suppliers,
        handlers::procurement::list_archived_suppliers,
        handlers::procurement::get_supplier,
        handlers::procurement::create_supplier,
        handlers::procurement::update_supplier,
        handlers::procurement::delete_supplier,
        handlers::procurement::restore_supplier,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Reports ---
        handlers::reports::get_report,
        handlers::reports::export_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::ChangePasswordPayload,
            models::auth::ChangeEmailPayload,
            models::auth::AuthResponse,

            // --- Businesses ---
            models::business::Business,
            models::business::Branch,
            models::business::BranchDetail,
            handlers::business::BusinessPayload,
            handlers::business::BranchPayload,

            // --- Inventory ---
            models::inventory::ItemCategory,
            models::inventory::Item,
            models::inventory::InventoryLevel,
            models::inventory::InventoryLevelView,
            handlers::inventory::CategoryPayload,
            handlers::inventory::ItemPayload,
            handlers::inventory::SetStockPayload,
            handlers::inventory::AdjustStockPayload,

            // --- CRM ---
            models::crm::Customer,
            handlers::crm::CustomerPayload,

            // --- Operations ---
            models::operations::Order,
            models::operations::OrderSummary,
            models::operations::OrderItem,
            models::operations::OrderItemView,
            models::operations::OrderDetail,
            models::operations::OrderLineRequest,
            handlers::operations::CreateOrderPayload,
            handlers::operations::UpdateOrderPayload,

            // --- FINANCE ---
            models::finance::Payment,
            models::finance::PaymentView,
            models::finance::Expense,
            models::finance::ExpenseCategory,
            handlers::finance::PaymentPayload,
            handlers::finance::ExpensePayload,
            handlers::finance::ExpenseCategoryPayload,

            // --- Suppliers ---
            models::procurement::Supplier,
            models::procurement::SupplierItemView,
            models::procurement::SupplierWithItems,
            handlers::procurement::SupplierPayload,
            handlers::procurement::SupplierItemPayload,

            // --- DASHBOARD ---
            models::dashboard::Dashboard,
            models::dashboard::DashboardTotals,
            models::dashboard::MonthlyAmount,
            models::dashboard::TopItemEntry,

            // --- Reports ---
            models::report::ReportType,
            models::report::Report,
            models::report::ReportTotals,
            models::report::BusinessPerformance,
            models::report::CategoryExpense,
            models::report::TopCustomerEntry,
            models::report::SupplierSummaryEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Businesses", description = "Empresas do usuário"),
        (name = "Branches", description = "Filiais da empresa selecionada"),
        (name = "Inventory", description = "Categorias, Itens e Estoque por filial"),
        (name = "CRM", description = "Clientes"),
        (name = "Orders", description = "Pedidos e Recibos"),
        (name = "Finance", description = "Pagamentos e Despesas"),
        (name = "Suppliers", description = "Fornecedores e seus itens"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Reports", description = "Relatórios consolidados e exportação .xlsx")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group_and_the_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/auth/login",
            "/api/businesses/{id}/restore",
            "/api/inventory/adjust",
            "/api/orders/{id}/receipt",
            "/api/expense-categories",
            "/api/reports/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
