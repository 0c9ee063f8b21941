// src/services/report_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_xlsxwriter::{Format, Workbook};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{day_bounds, default_report_range},
    },
    db::{BusinessRepository, ReportRepository},
    models::report::{Report, ReportFilter, ReportTotals, ReportTotalsRow, ReportType},
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// Parâmetros crus da requisição
#[derive(Debug, Default)]
pub struct ReportParams<'a> {
    pub business_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub report_type: Option<&'a str>,
}

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
    business_repo: BusinessRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository, business_repo: BusinessRepository) -> Self {
        Self { repo, business_repo }
    }

    /// Aplica os padrões, valida o período e confere a posse da empresa.
    pub async fn resolve_filter(&self, user_id: Uuid, params: &ReportParams<'_>) -> Result<ReportFilter, AppError> {
        let filter = build_filter(user_id, params, Utc::now().date_naive())?;

        if let Some(business_id) = filter.business_id {
            self.business_repo
                .find_business(user_id, business_id)
                .await?
                .ok_or(AppError::BusinessNotFound)?;
        }

        Ok(filter)
    }

    pub async fn build_report(&self, filter: &ReportFilter) -> Result<Report, AppError> {
        let (totals, mut business_performance, expenses_by_category, top_items, top_customers, supplier_summary) = tokio::try_join!(
            self.repo.totals(filter),
            self.repo.business_performance(filter),
            self.repo.expenses_by_category(filter),
            self.repo.top_items(filter),
            self.repo.top_customers(filter),
            self.repo.supplier_summary(filter),
        )?;

        for perf in &mut business_performance {
            perf.average_order_value = average(perf.revenue, perf.order_count);
        }

        Ok(Report {
            business_id: filter.business_id,
            start_date: filter.start_date,
            end_date: filter.end_date,
            report_type: filter.report_type,
            totals: summarize(&totals),
            business_performance,
            expenses_by_category,
            top_items,
            top_customers,
            supplier_summary,
        })
    }

    /// Gera a planilha do relatório. Devolve (nome do arquivo, bytes).
    pub async fn export_xlsx(&self, filter: &ReportFilter) -> Result<(String, Vec<u8>), AppError> {
        let report = self.build_report(filter).await?;
        let kind = filter.report_type;

        let mut sheets = vec![summary_sheet(&report)];

        if kind.includes(ReportType::Sales) {
            let (orders, order_items, payments) = tokio::try_join!(
                self.repo.export_orders(filter),
                self.repo.export_order_items(filter),
                self.repo.export_payments(filter),
            )?;

            sheets.push(Sheet::new(
                "Orders",
                &["Order", "Date", "Business", "Branch", "Customer", "Total", "Completed"],
                orders.into_iter().map(|o| {
                    vec![
                        Cell::text(o.order_name),
                        Cell::date(o.ordered_at),
                        Cell::text(o.business_name),
                        Cell::text(o.branch_name),
                        Cell::text(o.customer_name),
                        Cell::money(o.total_amount),
                        Cell::text(if o.is_completed { "Yes" } else { "No" }),
                    ]
                }),
            ));
            sheets.push(Sheet::new(
                "Order Items",
                &["Order", "Item", "Quantity", "Unit Price", "Total"],
                order_items.into_iter().map(|i| {
                    vec![
                        Cell::text(i.order_name),
                        Cell::text(i.item_name),
                        Cell::Number(f64::from(i.quantity)),
                        Cell::money(i.unit_price),
                        Cell::money(i.total_price),
                    ]
                }),
            ));
            sheets.push(Sheet::new(
                "Payments",
                &["Order", "Method", "Amount", "Paid At"],
                payments.into_iter().map(|p| {
                    vec![
                        Cell::text(p.order_name),
                        Cell::text(p.method),
                        Cell::money(p.amount),
                        Cell::date(p.paid_at),
                    ]
                }),
            ));
        }

        if kind.includes(ReportType::Expenses) {
            let expenses = self.repo.export_expenses(filter).await?;
            sheets.push(Sheet::new(
                "Expenses",
                &["Date", "Business", "Branch", "Category", "Payment Method", "Amount", "Description"],
                expenses.into_iter().map(|e| {
                    vec![
                        Cell::date(e.expense_date),
                        Cell::text(e.business_name),
                        Cell::text(e.branch_name),
                        Cell::optional(e.category),
                        Cell::text(e.payment_method),
                        Cell::money(e.amount),
                        Cell::optional(e.description),
                    ]
                }),
            ));
        }

        if kind.includes(ReportType::Inventory) {
            let (items, categories, branches) = tokio::try_join!(
                self.repo.export_items(filter),
                self.repo.export_categories(filter),
                self.repo.export_branches(filter),
            )?;

            sheets.push(Sheet::new(
                "Items",
                &["Business", "Category", "Name", "SKU", "Cost Price", "Sell Price", "Stock"],
                items.into_iter().map(|i| {
                    vec![
                        Cell::text(i.business_name),
                        Cell::text(i.category_name),
                        Cell::text(i.name),
                        Cell::text(i.sku),
                        Cell::money(i.cost_price),
                        Cell::money(i.sell_price),
                        Cell::count(i.stock_quantity),
                    ]
                }),
            ));
            sheets.push(Sheet::new(
                "Categories",
                &["Business", "Name", "Items"],
                categories.into_iter().map(|c| {
                    vec![Cell::text(c.business_name), Cell::text(c.name), Cell::count(c.item_count)]
                }),
            ));
            sheets.push(Sheet::new(
                "Branches",
                &["Business", "Name", "Address", "Phone"],
                branches.into_iter().map(|b| {
                    vec![
                        Cell::text(b.business_name),
                        Cell::text(b.name),
                        Cell::optional(b.address),
                        Cell::optional(b.phone),
                    ]
                }),
            ));
        }

        if kind.includes(ReportType::Customers) {
            let customers = self.repo.export_customers(filter).await?;
            sheets.push(Sheet::new(
                "Customers",
                &["Name", "Email", "Phone", "Branch", "Orders", "Total Spent"],
                customers.into_iter().map(|c| {
                    vec![
                        Cell::text(c.full_name),
                        Cell::text(c.email),
                        Cell::optional(c.phone),
                        Cell::text(c.branch_name),
                        Cell::count(c.order_count),
                        Cell::money(c.total_spent),
                    ]
                }),
            ));
        }

        if kind.includes(ReportType::Suppliers) {
            let suppliers = self.repo.export_suppliers(filter).await?;
            sheets.push(Sheet::new(
                "Suppliers",
                &["Business", "Name", "Email", "Phone", "Item", "Purchase Price", "Payment Method"],
                suppliers.into_iter().map(|s| {
                    vec![
                        Cell::text(s.business_name),
                        Cell::text(s.name),
                        Cell::optional(s.email),
                        Cell::optional(s.phone),
                        Cell::optional(s.item_name),
                        s.purchase_price.map(Cell::money).unwrap_or(Cell::Empty),
                        Cell::optional(s.payment_method),
                    ]
                }),
            ));
            sheets.push(Sheet::new(
                "Supplier Summary",
                &["Supplier", "Items", "Average Purchase Price"],
                report.supplier_summary.iter().map(|s| {
                    vec![
                        Cell::text(s.supplier_name.clone()),
                        Cell::count(s.item_count),
                        Cell::money(s.average_purchase_price),
                    ]
                }),
            ));
        }

        if kind == ReportType::Full {
            let businesses = self.repo.export_businesses(filter).await?;
            sheets.push(Sheet::new(
                "Businesses",
                &["Name", "Industry", "Timezone", "Status", "Branches"],
                businesses.into_iter().map(|b| {
                    vec![
                        Cell::text(b.name),
                        Cell::optional(b.industry),
                        Cell::text(b.timezone),
                        Cell::text(b.status),
                        Cell::count(b.branch_count),
                    ]
                }),
            ));
        }

        let bytes = render_workbook(&sheets)?;
        tracing::info!("📊 Relatório {} exportado ({} abas, {} bytes)", kind, sheets.len(), bytes.len());

        Ok((export_file_name(filter), bytes))
    }
}

// =========================================================================
//  FUNÇÕES PURAS
// =========================================================================

fn build_filter(user_id: Uuid, params: &ReportParams<'_>, today: NaiveDate) -> Result<ReportFilter, AppError> {
    let report_type = match params.report_type.filter(|t| !t.trim().is_empty()) {
        Some(raw) => raw.parse()?,
        None => ReportType::Summary,
    };

    let (start_date, end_date) = default_report_range(params.start_date, params.end_date, today);
    if start_date > end_date {
        return Err(AppError::InvalidDateRange);
    }

    let (from, until) = day_bounds(Some(start_date), Some(end_date));

    Ok(ReportFilter {
        user_id,
        business_id: params.business_id,
        start_date,
        end_date,
        from: from.ok_or(AppError::InvalidDateRange)?,
        until: until.ok_or(AppError::InvalidDateRange)?,
        report_type,
    })
}

fn average(total: Decimal, count: i64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

pub fn summarize(row: &ReportTotalsRow) -> ReportTotals {
    ReportTotals {
        total_revenue: row.total_revenue,
        total_expenses: row.total_expenses,
        net_profit: row.total_revenue - row.total_expenses,
        total_payments: row.total_payments,
        order_count: row.order_count,
        payment_count: row.payment_count,
        average_order_value: average(row.total_revenue, row.order_count),
    }
}

pub fn export_file_name(filter: &ReportFilter) -> String {
    format!(
        "report_{}_{}_{}.xlsx",
        filter.report_type, filter.start_date, filter.end_date
    )
}

// ---
// Planilha
// ---

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn optional(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Empty)
    }

    fn money(value: Decimal) -> Self {
        Cell::Number(value.to_f64().unwrap_or_default())
    }

    fn count(value: i64) -> Self {
        Cell::Number(value as f64)
    }

    fn date(value: DateTime<Utc>) -> Self {
        Cell::Text(value.format("%Y-%m-%d %H:%M").to_string())
    }
}

pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(
        name: &'static str,
        headers: &[&'static str],
        rows: impl IntoIterator<Item = Vec<Cell>>,
    ) -> Self {
        Self {
            name,
            headers: headers.to_vec(),
            rows: rows.into_iter().collect(),
        }
    }
}

fn summary_sheet(report: &Report) -> Sheet {
    let t = &report.totals;
    let scope = report
        .business_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "All businesses".to_string());

    let mut rows = vec![
        vec![Cell::text("Report Type"), Cell::text(report.report_type.as_str())],
        vec![Cell::text("Business"), Cell::text(scope)],
        vec![Cell::text("Start Date"), Cell::text(report.start_date.to_string())],
        vec![Cell::text("End Date"), Cell::text(report.end_date.to_string())],
        vec![Cell::text("Total Revenue"), Cell::money(t.total_revenue)],
        vec![Cell::text("Total Expenses"), Cell::money(t.total_expenses)],
        vec![Cell::text("Net Profit"), Cell::money(t.net_profit)],
        vec![Cell::text("Total Payments"), Cell::money(t.total_payments)],
        vec![Cell::text("Orders"), Cell::count(t.order_count)],
        vec![Cell::text("Payments"), Cell::count(t.payment_count)],
        vec![Cell::text("Average Order Value"), Cell::money(t.average_order_value)],
    ];

    // Desempenho por empresa logo abaixo dos totais
    if !report.business_performance.is_empty() {
        rows.push(vec![]);
        rows.push(vec![
            Cell::text("Business"),
            Cell::text("Orders"),
            Cell::text("Revenue"),
            Cell::text("Expenses"),
            Cell::text("Average Order Value"),
        ]);
        for perf in &report.business_performance {
            rows.push(vec![
                Cell::text(perf.business_name.clone()),
                Cell::count(perf.order_count),
                Cell::money(perf.revenue),
                Cell::money(perf.expenses),
                Cell::money(perf.average_order_value),
            ]);
        }
    }

    Sheet::new("Summary", &["Metric", "Value"], rows)
}

/// Escreve as abas num .xlsx em memória.
pub fn render_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
            worksheet.set_column_width(col as u16, 18)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let row_idx = (r + 1) as u32;
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_idx, c as u16, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_idx, c as u16, *number)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals_row(revenue: i64, orders: i64) -> ReportTotalsRow {
        ReportTotalsRow {
            total_revenue: Decimal::from(revenue),
            order_count: orders,
            total_expenses: Decimal::from(40),
            total_payments: Decimal::ZERO,
            payment_count: 0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    #[test]
    fn average_order_value_is_zero_without_orders() {
        let totals = summarize(&totals_row(0, 0));

        assert_eq!(totals.average_order_value, Decimal::ZERO);
        assert_eq!(totals.net_profit, Decimal::from(-40));
    }

    #[test]
    fn average_order_value_divides_revenue_by_orders() {
        let totals = summarize(&totals_row(100, 3));

        assert_eq!(totals.average_order_value, Decimal::new(3333, 2));
    }

    #[test]
    fn filter_defaults_to_last_month_summary() {
        let filter = build_filter(Uuid::nil(), &ReportParams::default(), today()).unwrap();

        assert_eq!(filter.report_type, ReportType::Summary);
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(filter.end_date, today());
        assert_eq!(export_file_name(&filter), "report_summary_2025-02-28_2025-03-31.xlsx");
    }

    #[test]
    fn filter_rejects_inverted_range_and_unknown_type() {
        let inverted = ReportParams {
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(Uuid::nil(), &inverted, today()),
            Err(AppError::InvalidDateRange)
        ));

        let unknown = ReportParams { report_type: Some("weekly"), ..Default::default() };
        assert!(matches!(
            build_filter(Uuid::nil(), &unknown, today()),
            Err(AppError::InvalidReportType(_))
        ));
    }

    #[test]
    fn renders_a_zip_based_workbook() {
        let sheets = vec![
            Sheet::new("Summary", &["Metric", "Value"], vec![vec![Cell::text("Orders"), Cell::count(2)]]),
            Sheet::new("Orders", &["Order", "Total"], vec![vec![Cell::text("A-1"), Cell::Empty]]),
        ];

        let bytes = render_workbook(&sheets).unwrap();

        assert!(bytes.starts_with(b"PK"));
    }
}
