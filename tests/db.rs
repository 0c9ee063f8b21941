// tests/db.rs
//
// Testes contra um Postgres real (testcontainers). Cada teste sobe o seu
// próprio container, roda as migrações e monta o AppState em cima dele.
// Precisa de Docker disponível.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt},
};
use tower::ServiceExt;
use uuid::Uuid;

use prism_backend::{
    common::{db_utils::MAX_STOCK_QUANTITY, error::AppError, pagination::PageParams},
    config::{AppConfig, AppState},
    db::inventory_repo::ItemFields,
    models::{auth::User, business::Business, business::Branch, crm::Customer, inventory::Item, operations::OrderLineRequest},
    services::{
        business_service::{BranchInput, BusinessInput},
        crm_service::CustomerInput,
        operation_service::NewOrder,
    },
};

struct TestDb {
    // Mantém o container vivo até o fim do teste
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
    state: AppState,
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        database_url,
        jwt_secret: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 5,
        jwt_expiration_days: 7,
        fonts_dir: "./fonts".to_string(),
    }
}

async fn setup() -> anyhow::Result<TestDb> {
    let container = Postgres::default().with_tag("16-alpine").start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new().max_connections(5).connect(&database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::with_pool(pool.clone(), &test_config(database_url));
    Ok(TestDb { _container: container, pool, state })
}

// ---
// Dados de apoio
// ---

struct Shop {
    user: User,
    token: String,
    business: Business,
    branch: Branch,
}

async fn shop(state: &AppState, email: &str) -> anyhow::Result<Shop> {
    let auth = &state.auth_service;
    let token = auth.register_user("Ana", "Souza", email, "secret1").await?;
    let user = auth.validate_token(&token).await?;

    let business = state
        .business_service
        .create_business(
            user.id,
            &BusinessInput { name: "Café Central", industry: None, timezone: None, status: None },
        )
        .await?;
    let branch = state
        .business_service
        .create_branch(business.id, &BranchInput { name: "Centro", address: None, phone: None })
        .await?;

    Ok(Shop { user, token, business, branch })
}

async fn item(state: &AppState, shop: &Shop, sku: &str, sell_price: &str) -> anyhow::Result<Item> {
    let category = match state
        .inventory_service
        .list_categories(shop.business.id, None)
        .await?
        .into_iter()
        .next()
    {
        Some(c) => c,
        None => state.inventory_service.create_category(shop.business.id, "Bebidas").await?,
    };

    let item = state
        .inventory_service
        .create_item(
            shop.business.id,
            &ItemFields {
                branch_id: Some(shop.branch.id),
                category_id: category.id,
                name: sku,
                sku,
                cost_price: Decimal::ONE,
                sell_price: sell_price.parse()?,
                duration_minutes: None,
                description: None,
            },
        )
        .await?;
    Ok(item)
}

async fn customer(state: &AppState, shop: &Shop) -> anyhow::Result<Customer> {
    let customer = state
        .crm_service
        .create_customer(
            shop.business.id,
            &CustomerInput {
                branch_id: shop.branch.id,
                full_name: "Bruno Lima",
                email: "bruno@example.com",
                phone: None,
            },
        )
        .await?;
    Ok(customer)
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

// ---
// Pedidos
// ---

#[tokio::test]
async fn order_total_is_persisted_as_the_sum_of_its_lines() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let shop = shop(state, "ana@example.com").await?;
    let coffee = item(state, &shop, "COF-1", "4.50").await?;
    let cake = item(state, &shop, "CAK-1", "12.00").await?;
    let buyer = customer(state, &shop).await?;

    let lines = [
        OrderLineRequest { item_id: coffee.id, quantity: 3 },
        OrderLineRequest { item_id: cake.id, quantity: 1 },
        OrderLineRequest { item_id: cake.id, quantity: 0 },
        OrderLineRequest { item_id: Uuid::new_v4(), quantity: 2 },
    ];
    let detail = state
        .operation_service
        .create_order(
            shop.business.id,
            shop.user.id,
            &NewOrder {
                order_name: "Mesa 4",
                branch_id: shop.branch.id,
                customer_id: buyer.id,
                ordered_at: None,
                lines: &lines,
            },
        )
        .await?;

    assert_eq!(detail.header.business_id, shop.business.id);
    assert_eq!(detail.header.user_id, shop.user.id);
    assert!(detail.header.is_completed);
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.header.total_amount, dec("25.50"));
    assert_eq!(detail.balance, dec("25.50"));

    let (stored_total, line_sum): (Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT o.total_amount, (SELECT SUM(total_price) FROM order_items WHERE order_id = o.id)
        FROM orders o WHERE o.id = $1
        "#,
    )
    .bind(detail.header.id)
    .fetch_one(&db.pool)
    .await?;
    assert_eq!(stored_total, line_sum);
    assert_eq!(stored_total, dec("25.50"));

    Ok(())
}

#[tokio::test]
async fn payments_of_deleted_orders_leave_the_payment_screens() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let shop = shop(state, "ana@example.com").await?;
    let coffee = item(state, &shop, "COF-1", "4.50").await?;
    let buyer = customer(state, &shop).await?;

    let lines = [OrderLineRequest { item_id: coffee.id, quantity: 2 }];
    let order = state
        .operation_service
        .create_order(
            shop.business.id,
            shop.user.id,
            &NewOrder {
                order_name: "Balcão",
                branch_id: shop.branch.id,
                customer_id: buyer.id,
                ordered_at: None,
                lines: &lines,
            },
        )
        .await?;
    let payment = state
        .finance_service
        .create_payment(shop.business.id, order.header.id, "Card", dec("9.00"))
        .await?;

    let page = state
        .finance_service
        .list_payments(shop.business.id, &PageParams::default(), None, None)
        .await?;
    assert_eq!(page.total_count, 1);

    state.operation_service.delete_order(shop.business.id, order.header.id).await?;

    let page = state
        .finance_service
        .list_payments(shop.business.id, &PageParams::default(), None, None)
        .await?;
    assert_eq!(page.total_count, 0);
    assert!(page.items.is_empty());
    assert!(matches!(
        state.finance_service.get_payment(shop.business.id, payment.id).await,
        Err(AppError::PaymentNotFound)
    ));

    Ok(())
}

// ---
// Escopo por empresa e exclusão lógica
// ---

#[tokio::test]
async fn rows_are_scoped_to_the_business_that_created_them() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let ana = shop(state, "ana@example.com").await?;
    let caio = shop(state, "caio@example.com").await?;
    let coffee = item(state, &ana, "COF-1", "4.50").await?;

    assert_eq!(coffee.business_id, ana.business.id);
    assert!(matches!(
        state.inventory_service.get_item(caio.business.id, coffee.id).await,
        Err(AppError::ItemNotFound)
    ));
    assert!(state.inventory_service.list_items(caio.business.id, None, None).await?.is_empty());
    assert!(matches!(
        state.business_service.get_business(caio.user.id, ana.business.id).await,
        Err(AppError::BusinessNotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn soft_deleted_items_and_branches_move_to_archived_and_come_back() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let shop = shop(state, "ana@example.com").await?;
    let coffee = item(state, &shop, "COF-1", "4.50").await?;
    let business_id = shop.business.id;

    // --- Itens ---
    state.inventory_service.delete_item(business_id, coffee.id).await?;

    assert!(state.inventory_service.list_items(business_id, None, None).await?.is_empty());
    let archived = state.inventory_service.list_archived_items(business_id).await?;
    assert_eq!(archived.iter().map(|i| i.id).collect::<Vec<_>>(), vec![coffee.id]);
    assert!(matches!(
        state.inventory_service.get_item(business_id, coffee.id).await,
        Err(AppError::ItemNotFound)
    ));
    let dashboard = state.dashboard_service.get_dashboard(business_id).await?;
    assert_eq!(dashboard.totals.item_count, 0);

    state.inventory_service.restore_item(business_id, coffee.id).await?;

    assert_eq!(state.inventory_service.list_items(business_id, None, None).await?.len(), 1);
    assert!(state.inventory_service.list_archived_items(business_id).await?.is_empty());
    let dashboard = state.dashboard_service.get_dashboard(business_id).await?;
    assert_eq!(dashboard.totals.item_count, 1);

    // --- Filiais ---
    state.business_service.delete_branch(business_id, shop.branch.id).await?;

    assert!(state.business_service.list_branches(business_id).await?.is_empty());
    let archived = state.business_service.list_archived_branches(business_id).await?;
    assert_eq!(archived.len(), 1);
    assert_eq!(state.dashboard_service.get_dashboard(business_id).await?.totals.branch_count, 0);

    state.business_service.restore_branch(business_id, shop.branch.id).await?;

    let branches = state.business_service.list_branches(business_id).await?;
    assert_eq!(branches.iter().map(|b| b.id).collect::<Vec<_>>(), vec![shop.branch.id]);
    assert!(state.business_service.list_archived_branches(business_id).await?.is_empty());

    Ok(())
}

// ---
// Clientes e estoque
// ---

#[tokio::test]
async fn customer_with_live_orders_cannot_be_deleted() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let shop = shop(state, "ana@example.com").await?;
    let coffee = item(state, &shop, "COF-1", "4.50").await?;
    let buyer = customer(state, &shop).await?;

    let lines = [OrderLineRequest { item_id: coffee.id, quantity: 1 }];
    let order = state
        .operation_service
        .create_order(
            shop.business.id,
            shop.user.id,
            &NewOrder {
                order_name: "Mesa 1",
                branch_id: shop.branch.id,
                customer_id: buyer.id,
                ordered_at: None,
                lines: &lines,
            },
        )
        .await?;

    let refused = state.crm_service.delete_customer(shop.business.id, buyer.id).await;
    assert!(matches!(refused, Err(AppError::CustomerHasOrders)));
    assert!(state.crm_service.get_customer(shop.business.id, buyer.id).await.is_ok());

    // Pedido excluído não segura mais o cliente
    state.operation_service.delete_order(shop.business.id, order.header.id).await?;
    state.crm_service.delete_customer(shop.business.id, buyer.id).await?;

    assert!(matches!(
        state.crm_service.get_customer(shop.business.id, buyer.id).await,
        Err(AppError::CustomerNotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn stock_adjustments_outside_the_limits_leave_the_level_unchanged() -> anyhow::Result<()> {
    let db = setup().await?;
    let state = &db.state;
    let shop = shop(state, "ana@example.com").await?;
    let coffee = item(state, &shop, "COF-1", "4.50").await?;
    let inventory = &state.inventory_service;
    let business_id = shop.business.id;

    inventory.set_stock_level(business_id, shop.branch.id, coffee.id, 5, 2).await?;

    let result = inventory.adjust_stock(business_id, shop.branch.id, coffee.id, -6).await;
    assert!(matches!(result, Err(AppError::InsufficientStock)));

    let levels = inventory.list_stock(business_id, Some(shop.branch.id)).await?;
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].quantity, 5);

    let level = inventory.adjust_stock(business_id, shop.branch.id, coffee.id, -5).await?;
    assert_eq!(level.quantity, 0);

    inventory
        .set_stock_level(business_id, shop.branch.id, coffee.id, MAX_STOCK_QUANTITY, 0)
        .await?;
    let result = inventory.adjust_stock(business_id, shop.branch.id, coffee.id, 1).await;
    assert!(matches!(result, Err(AppError::StockLimitExceeded)));

    let levels = inventory.list_stock(business_id, Some(shop.branch.id)).await?;
    assert_eq!(levels[0].quantity, MAX_STOCK_QUANTITY);

    Ok(())
}

// ---
// Guarda de empresa pelo router
// ---

#[tokio::test]
async fn business_header_of_another_user_answers_not_found() -> anyhow::Result<()> {
    let db = setup().await?;
    let ana = shop(&db.state, "ana@example.com").await?;
    let caio = shop(&db.state, "caio@example.com").await?;
    let app = prism_backend::build_router(db.state.clone());

    let request = |token: &str, business_id: Uuid| {
        Request::get("/api/dashboard")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header("x-business-id", business_id.to_string())
            .body(Body::empty())
    };

    let own = app.clone().oneshot(request(&ana.token, ana.business.id)?).await?;
    assert_eq!(own.status(), StatusCode::OK);

    let foreign = app.clone().oneshot(request(&caio.token, ana.business.id)?).await?;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    // Empresa excluída responde como inexistente, mesmo para o dono
    db.state.business_service.delete_business(ana.user.id, ana.business.id).await?;
    let deleted = app.oneshot(request(&ana.token, ana.business.id)?).await?;
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);

    Ok(())
}
