pub mod auth;
pub mod business;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod procurement;
pub mod report;
