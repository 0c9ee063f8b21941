// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        BusinessRepository, CrmRepository, DashboardRepository, FinanceRepository,
        InventoryRepository, OperationsRepository, ProcurementRepository, ReportRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, business_service::BusinessService, crm_service::CrmService,
        dashboard_service::DashboardService, document_service::DocumentService,
        finance_service::FinanceService, inventory_service::InventoryService,
        operation_service::OperationService, procurement_service::ProcurementService,
        report_service::ReportService,
    },
};

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub jwt_expiration_days: i64,
    pub fonts_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            jwt_expiration_days: parse_var("JWT_EXPIRATION_DAYS", 7)?,
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} tem um valor inválido: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub business_service: BusinessService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub operation_service: OperationService,
    pub finance_service: FinanceService,
    pub procurement_service: ProcurementService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let crm_repo = CrmRepository::new(db_pool.clone());
        let operations_repo = OperationsRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let procurement_repo = ProcurementRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            config.jwt_expiration_days,
        );
        let business_service = BusinessService::new(business_repo.clone());
        let inventory_service = InventoryService::new(inventory_repo.clone(), business_repo.clone());
        let crm_service = CrmService::new(crm_repo.clone(), business_repo.clone());
        let operation_service = OperationService::new(
            operations_repo.clone(),
            inventory_repo.clone(),
            business_repo.clone(),
            crm_repo,
            db_pool.clone(),
        );
        let finance_service = FinanceService::new(
            finance_repo.clone(),
            operations_repo.clone(),
            business_repo.clone(),
        );
        let procurement_service =
            ProcurementService::new(procurement_repo, inventory_repo.clone(), db_pool.clone());
        let dashboard_service = DashboardService::new(
            dashboard_repo,
            operations_repo,
            finance_repo,
            inventory_repo,
        );
        let report_service = ReportService::new(report_repo, business_repo);
        let document_service = DocumentService::new(config.fonts_dir.clone());

        Self {
            db_pool,
            i18n_store: I18nStore::load(),
            auth_service,
            business_service,
            inventory_service,
            crm_service,
            operation_service,
            finance_service,
            procurement_service,
            dashboard_service,
            report_service,
            document_service,
        }
    }
}
