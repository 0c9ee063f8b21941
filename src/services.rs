pub mod auth;
pub mod business_service;
pub mod crm_service;
pub mod dashboard_service;
pub mod document_service;
pub mod finance_service;
pub mod inventory_service;
pub mod operation_service;
pub mod procurement_service;
pub mod report_service;
