// src/db/report_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        dashboard::TopItemEntry,
        report::{
            BranchExportRow, BusinessExportRow, BusinessPerformance, CategoryExportRow,
            CategoryExpense, CustomerExportRow, ExpenseExportRow, ItemExportRow,
            OrderExportRow, OrderItemExportRow, PaymentExportRow, ReportFilter,
            ReportTotalsRow, SupplierExportRow, SupplierSummaryEntry, TopCustomerEntry,
        },
    },
};

// Escopo comum a todas as consultas: empresas ativas do usuário,
// opcionalmente restritas a uma só. $1 = user_id, $2 = business_id.
const SCOPE: &str = "b.user_id = $1 AND b.is_deleted = FALSE AND ($2::uuid IS NULL OR b.id = $2)";

const REPORT_TOP_LIMIT: i64 = 10;

// Relatórios consolidados. Período em $3 (inclusive) e $4 (exclusivo).
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn totals(&self, f: &ReportFilter) -> Result<ReportTotalsRow, AppError> {
        let row = sqlx::query_as::<_, ReportTotalsRow>(&format!(
            r#"
            SELECT
                (SELECT COALESCE(SUM(o.total_amount), 0)
                   FROM orders o JOIN businesses b ON b.id = o.business_id
                  WHERE {SCOPE} AND o.is_deleted = FALSE AND o.is_completed = TRUE
                    AND o.ordered_at >= $3 AND o.ordered_at < $4) AS total_revenue,
                (SELECT COUNT(*)
                   FROM orders o JOIN businesses b ON b.id = o.business_id
                  WHERE {SCOPE} AND o.is_deleted = FALSE AND o.is_completed = TRUE
                    AND o.ordered_at >= $3 AND o.ordered_at < $4) AS order_count,
                (SELECT COALESCE(SUM(e.amount), 0)
                   FROM expenses e JOIN businesses b ON b.id = e.business_id
                  WHERE {SCOPE} AND e.is_deleted = FALSE
                    AND e.expense_date >= $3 AND e.expense_date < $4) AS total_expenses,
                (SELECT COALESCE(SUM(p.amount), 0)
                   FROM payments p
                   JOIN orders o ON o.id = p.order_id
                   JOIN businesses b ON b.id = o.business_id
                  WHERE {SCOPE} AND p.is_deleted = FALSE AND o.is_deleted = FALSE
                    AND p.paid_at >= $3 AND p.paid_at < $4) AS total_payments,
                (SELECT COUNT(*)
                   FROM payments p
                   JOIN orders o ON o.id = p.order_id
                   JOIN businesses b ON b.id = o.business_id
                  WHERE {SCOPE} AND p.is_deleted = FALSE AND o.is_deleted = FALSE
                    AND p.paid_at >= $3 AND p.paid_at < $4) AS payment_count
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn business_performance(&self, f: &ReportFilter) -> Result<Vec<BusinessPerformance>, AppError> {
        let rows = sqlx::query_as::<_, BusinessPerformance>(&format!(
            r#"
            SELECT b.id AS business_id,
                   b.name AS business_name,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total_amount), 0) AS revenue,
                   COALESCE((
                       SELECT SUM(e.amount) FROM expenses e
                        WHERE e.business_id = b.id AND e.is_deleted = FALSE
                          AND e.expense_date >= $3 AND e.expense_date < $4
                   ), 0) AS expenses
            FROM businesses b
            LEFT JOIN orders o
                   ON o.business_id = b.id
                  AND o.is_deleted = FALSE
                  AND o.is_completed = TRUE
                  AND o.ordered_at >= $3 AND o.ordered_at < $4
            WHERE {SCOPE}
            GROUP BY b.id, b.name
            ORDER BY revenue DESC, b.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn expenses_by_category(&self, f: &ReportFilter) -> Result<Vec<CategoryExpense>, AppError> {
        let rows = sqlx::query_as::<_, CategoryExpense>(&format!(
            r#"
            SELECT COALESCE(e.category, 'Uncategorized') AS category,
                   COALESCE(SUM(e.amount), 0) AS total,
                   COUNT(*) AS expense_count
            FROM expenses e
            JOIN businesses b ON b.id = e.business_id
            WHERE {SCOPE} AND e.is_deleted = FALSE
              AND e.expense_date >= $3 AND e.expense_date < $4
            GROUP BY 1
            ORDER BY total DESC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn top_items(&self, f: &ReportFilter) -> Result<Vec<TopItemEntry>, AppError> {
        let rows = sqlx::query_as::<_, TopItemEntry>(&format!(
            r#"
            SELECT i.id AS item_id,
                   i.name AS item_name,
                   SUM(oi.quantity)::bigint AS total_quantity,
                   COALESCE(SUM(oi.total_price), 0) AS total_revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN items i ON i.id = oi.item_id
            JOIN businesses b ON b.id = o.business_id
            WHERE {SCOPE} AND o.is_deleted = FALSE
              AND o.ordered_at >= $3 AND o.ordered_at < $4
            GROUP BY i.id, i.name
            ORDER BY total_quantity DESC, i.name ASC
            LIMIT $5
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .bind(REPORT_TOP_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn top_customers(&self, f: &ReportFilter) -> Result<Vec<TopCustomerEntry>, AppError> {
        let rows = sqlx::query_as::<_, TopCustomerEntry>(&format!(
            r#"
            SELECT c.id AS customer_id,
                   c.full_name AS customer_name,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total_amount), 0) AS total_spent
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            JOIN businesses b ON b.id = o.business_id
            WHERE {SCOPE} AND o.is_deleted = FALSE
              AND o.ordered_at >= $3 AND o.ordered_at < $4
            GROUP BY c.id, c.full_name
            ORDER BY total_spent DESC, c.full_name ASC
            LIMIT $5
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .bind(REPORT_TOP_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn supplier_summary(&self, f: &ReportFilter) -> Result<Vec<SupplierSummaryEntry>, AppError> {
        let rows = sqlx::query_as::<_, SupplierSummaryEntry>(&format!(
            r#"
            SELECT s.id AS supplier_id,
                   s.name AS supplier_name,
                   COUNT(si.id) AS item_count,
                   COALESCE(AVG(si.purchase_price), 0)::numeric(12, 2) AS average_purchase_price
            FROM suppliers s
            JOIN businesses b ON b.id = s.business_id
            LEFT JOIN supplier_items si ON si.supplier_id = s.id
            WHERE {SCOPE} AND s.is_deleted = FALSE
            GROUP BY s.id, s.name
            ORDER BY s.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    //  LINHAS DA PLANILHA
    // =========================================================================

    pub async fn export_orders(&self, f: &ReportFilter) -> Result<Vec<OrderExportRow>, AppError> {
        let rows = sqlx::query_as::<_, OrderExportRow>(&format!(
            r#"
            SELECT o.order_name, o.ordered_at, b.name AS business_name, br.name AS branch_name,
                   COALESCE(c.full_name, '') AS customer_name, o.total_amount, o.is_completed
            FROM orders o
            JOIN businesses b ON b.id = o.business_id
            JOIN branches br ON br.id = o.branch_id
            LEFT JOIN customers c ON c.id = o.customer_id
            WHERE {SCOPE} AND o.is_deleted = FALSE
              AND o.ordered_at >= $3 AND o.ordered_at < $4
            ORDER BY o.ordered_at DESC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_order_items(&self, f: &ReportFilter) -> Result<Vec<OrderItemExportRow>, AppError> {
        let rows = sqlx::query_as::<_, OrderItemExportRow>(&format!(
            r#"
            SELECT o.order_name, i.name AS item_name, oi.quantity, oi.unit_price, oi.total_price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN items i ON i.id = oi.item_id
            JOIN businesses b ON b.id = o.business_id
            WHERE {SCOPE} AND o.is_deleted = FALSE
              AND o.ordered_at >= $3 AND o.ordered_at < $4
            ORDER BY o.ordered_at DESC, i.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_payments(&self, f: &ReportFilter) -> Result<Vec<PaymentExportRow>, AppError> {
        let rows = sqlx::query_as::<_, PaymentExportRow>(&format!(
            r#"
            SELECT o.order_name, p.method, p.amount, p.paid_at
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            JOIN businesses b ON b.id = o.business_id
            WHERE {SCOPE} AND p.is_deleted = FALSE AND o.is_deleted = FALSE
              AND p.paid_at >= $3 AND p.paid_at < $4
            ORDER BY p.paid_at DESC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_expenses(&self, f: &ReportFilter) -> Result<Vec<ExpenseExportRow>, AppError> {
        let rows = sqlx::query_as::<_, ExpenseExportRow>(&format!(
            r#"
            SELECT e.expense_date, b.name AS business_name, br.name AS branch_name,
                   e.category, e.payment_method, e.amount, e.description
            FROM expenses e
            JOIN businesses b ON b.id = e.business_id
            JOIN branches br ON br.id = e.branch_id
            WHERE {SCOPE} AND e.is_deleted = FALSE
              AND e.expense_date >= $3 AND e.expense_date < $4
            ORDER BY e.expense_date DESC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_businesses(&self, f: &ReportFilter) -> Result<Vec<BusinessExportRow>, AppError> {
        let rows = sqlx::query_as::<_, BusinessExportRow>(&format!(
            r#"
            SELECT b.name, b.industry, b.timezone, b.status,
                   (SELECT COUNT(*) FROM branches br
                     WHERE br.business_id = b.id AND br.is_deleted = FALSE) AS branch_count
            FROM businesses b
            WHERE {SCOPE}
            ORDER BY b.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_branches(&self, f: &ReportFilter) -> Result<Vec<BranchExportRow>, AppError> {
        let rows = sqlx::query_as::<_, BranchExportRow>(&format!(
            r#"
            SELECT b.name AS business_name, br.name, br.address, br.phone
            FROM branches br
            JOIN businesses b ON b.id = br.business_id
            WHERE {SCOPE} AND br.is_deleted = FALSE
            ORDER BY b.name ASC, br.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_items(&self, f: &ReportFilter) -> Result<Vec<ItemExportRow>, AppError> {
        let rows = sqlx::query_as::<_, ItemExportRow>(&format!(
            r#"
            SELECT b.name AS business_name, c.name AS category_name, i.name, i.sku,
                   i.cost_price, i.sell_price,
                   COALESCE((SELECT SUM(l.quantity) FROM inventory_levels l
                              WHERE l.item_id = i.id), 0)::bigint AS stock_quantity
            FROM items i
            JOIN businesses b ON b.id = i.business_id
            JOIN item_categories c ON c.id = i.category_id
            WHERE {SCOPE} AND i.is_deleted = FALSE
            ORDER BY b.name ASC, i.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_categories(&self, f: &ReportFilter) -> Result<Vec<CategoryExportRow>, AppError> {
        let rows = sqlx::query_as::<_, CategoryExportRow>(&format!(
            r#"
            SELECT b.name AS business_name, c.name,
                   (SELECT COUNT(*) FROM items i
                     WHERE i.category_id = c.id AND i.is_deleted = FALSE) AS item_count
            FROM item_categories c
            JOIN businesses b ON b.id = c.business_id
            WHERE {SCOPE} AND c.is_archived = FALSE
            ORDER BY b.name ASC, c.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_customers(&self, f: &ReportFilter) -> Result<Vec<CustomerExportRow>, AppError> {
        let rows = sqlx::query_as::<_, CustomerExportRow>(&format!(
            r#"
            SELECT c.full_name, c.email, c.phone, br.name AS branch_name,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total_amount), 0) AS total_spent
            FROM customers c
            JOIN businesses b ON b.id = c.business_id
            JOIN branches br ON br.id = c.branch_id
            LEFT JOIN orders o
                   ON o.customer_id = c.id
                  AND o.is_deleted = FALSE
                  AND o.ordered_at >= $3 AND o.ordered_at < $4
            WHERE {SCOPE}
            GROUP BY c.id, c.full_name, c.email, c.phone, br.name
            ORDER BY c.full_name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .bind(f.from)
        .bind(f.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Uma linha por (fornecedor, item); fornecedor sem itens aparece uma vez
    pub async fn export_suppliers(&self, f: &ReportFilter) -> Result<Vec<SupplierExportRow>, AppError> {
        let rows = sqlx::query_as::<_, SupplierExportRow>(&format!(
            r#"
            SELECT b.name AS business_name, s.name, s.email, s.phone,
                   i.name AS item_name, si.purchase_price, si.payment_method
            FROM suppliers s
            JOIN businesses b ON b.id = s.business_id
            LEFT JOIN supplier_items si ON si.supplier_id = s.id
            LEFT JOIN items i ON i.id = si.item_id
            WHERE {SCOPE} AND s.is_deleted = FALSE
            ORDER BY s.name ASC, i.name ASC
            "#
        ))
        .bind(f.user_id)
        .bind(f.business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
