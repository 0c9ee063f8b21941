pub mod auth;
pub mod business;
pub mod i18n;
