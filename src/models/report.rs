// src/models/report.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::TopItemEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Summary,
    Sales,
    Expenses,
    Inventory,
    Customers,
    Suppliers,
    Full,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Summary => "summary",
            ReportType::Sales => "sales",
            ReportType::Expenses => "expenses",
            ReportType::Inventory => "inventory",
            ReportType::Customers => "customers",
            ReportType::Suppliers => "suppliers",
            ReportType::Full => "full",
        }
    }

    // `full` inclui todas as seções
    pub fn includes(&self, section: ReportType) -> bool {
        *self == ReportType::Full || *self == section
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(ReportType::Summary),
            "sales" => Ok(ReportType::Sales),
            "expenses" => Ok(ReportType::Expenses),
            "inventory" => Ok(ReportType::Inventory),
            "customers" => Ok(ReportType::Customers),
            "suppliers" => Ok(ReportType::Suppliers),
            "full" => Ok(ReportType::Full),
            other => Err(AppError::InvalidReportType(other.to_string())),
        }
    }
}

// Filtro já resolvido (datas padrão aplicadas, empresa verificada)
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub user_id: Uuid,
    pub business_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub report_type: ReportType,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub total_payments: Decimal,
    pub order_count: i64,
    pub payment_count: i64,
    pub average_order_value: Decimal,
}

// Números crus do período, como vêm do SQL
#[derive(Debug, Clone, FromRow)]
pub struct ReportTotalsRow {
    pub total_revenue: Decimal,
    pub order_count: i64,
    pub total_expenses: Decimal,
    pub total_payments: Decimal,
    pub payment_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPerformance {
    pub business_id: Uuid,
    pub business_name: String,
    pub order_count: i64,
    pub revenue: Decimal,
    pub expenses: Decimal,
    #[sqlx(skip)]
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpense {
    pub category: String,
    pub total: Decimal,
    pub expense_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomerEntry {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSummaryEntry {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub item_count: i64,
    pub average_purchase_price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub business_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub report_type: ReportType,
    pub totals: ReportTotals,
    pub business_performance: Vec<BusinessPerformance>,
    pub expenses_by_category: Vec<CategoryExpense>,
    pub top_items: Vec<TopItemEntry>,
    pub top_customers: Vec<TopCustomerEntry>,
    pub supplier_summary: Vec<SupplierSummaryEntry>,
}

// ---
// Linhas das abas da planilha
// ---

#[derive(Debug, Clone, FromRow)]
pub struct OrderExportRow {
    pub order_name: String,
    pub ordered_at: DateTime<Utc>,
    pub business_name: String,
    pub branch_name: String,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub is_completed: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemExportRow {
    pub order_name: String,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct PaymentExportRow {
    pub order_name: String,
    pub method: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExpenseExportRow {
    pub expense_date: DateTime<Utc>,
    pub business_name: String,
    pub branch_name: String,
    pub category: Option<String>,
    pub payment_method: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BusinessExportRow {
    pub name: String,
    pub industry: Option<String>,
    pub timezone: String,
    pub status: String,
    pub branch_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct BranchExportRow {
    pub business_name: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ItemExportRow {
    pub business_name: String,
    pub category_name: String,
    pub name: String,
    pub sku: String,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryExportRow {
    pub business_name: String,
    pub name: String,
    pub item_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerExportRow {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub branch_name: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct SupplierExportRow {
    pub business_name: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub item_name: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub payment_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_type_case_insensitively() {
        assert_eq!("Sales".parse::<ReportType>().unwrap(), ReportType::Sales);
        assert_eq!(" full ".parse::<ReportType>().unwrap(), ReportType::Full);
        assert!(matches!(
            "weekly".parse::<ReportType>(),
            Err(AppError::InvalidReportType(t)) if t == "weekly"
        ));
    }

    #[test]
    fn full_includes_every_section() {
        assert!(ReportType::Full.includes(ReportType::Suppliers));
        assert!(ReportType::Sales.includes(ReportType::Sales));
        assert!(!ReportType::Summary.includes(ReportType::Sales));
    }
}
