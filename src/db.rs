pub mod business_repo;
pub mod crm_repo;
pub mod dashboard_repo;
pub mod finance_repo;
pub mod inventory_repo;
pub mod operations_repo;
pub mod procurement_repo;
pub mod report_repo;
pub mod user_repo;

pub use business_repo::BusinessRepository;
pub use crm_repo::CrmRepository;
pub use dashboard_repo::DashboardRepository;
pub use finance_repo::FinanceRepository;
pub use inventory_repo::InventoryRepository;
pub use operations_repo::OperationsRepository;
pub use procurement_repo::ProcurementRepository;
pub use report_repo::ReportRepository;
pub use user_repo::UserRepository;
