// src/services/finance_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{day_bounds, Page, PageParams},
    },
    db::{
        finance_repo::{ExpenseFields, ExpenseFilter},
        BusinessRepository, FinanceRepository, OperationsRepository,
    },
    models::finance::{Expense, ExpenseCategory, Payment, PaymentView},
};

pub struct ExpenseInput<'a> {
    pub branch_id: Uuid,
    pub category: Option<&'a str>,
    pub amount: Decimal,
    pub expense_date: Option<chrono::DateTime<Utc>>,
    pub payment_method: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct ExpenseQuery {
    pub branch_id: Option<Uuid>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    operations_repo: OperationsRepository,
    business_repo: BusinessRepository,
}

impl FinanceService {
    pub fn new(
        repo: FinanceRepository,
        operations_repo: OperationsRepository,
        business_repo: BusinessRepository,
    ) -> Self {
        Self { repo, operations_repo, business_repo }
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn list_payments(
        &self,
        business_id: Uuid,
        page: &PageParams,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Page<PaymentView>, AppError> {
        let (from, until) = day_bounds(start_date, end_date);

        let total = self.repo.count_payments(business_id, from, until).await?;
        let items = self
            .repo
            .list_payments(business_id, from, until, page.page_size(), page.offset())
            .await?;

        Ok(Page::new(items, page, total))
    }

    pub async fn get_payment(&self, business_id: Uuid, payment_id: Uuid) -> Result<Payment, AppError> {
        self.repo
            .find_payment(business_id, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    pub async fn create_payment(
        &self,
        business_id: Uuid,
        order_id: Uuid,
        method: &str,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        self.require_order(business_id, order_id).await?;

        let payment = self.repo.create_payment(order_id, method.trim(), amount).await?;
        tracing::info!("💰 Pagamento {} de {} registrado no pedido {}", payment.id, amount, order_id);
        Ok(payment)
    }

    pub async fn update_payment(
        &self,
        business_id: Uuid,
        payment_id: Uuid,
        order_id: Uuid,
        method: &str,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        self.require_order(business_id, order_id).await?;

        self.repo
            .update_payment(business_id, payment_id, order_id, method.trim(), amount)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    pub async fn delete_payment(&self, business_id: Uuid, payment_id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_payment(business_id, payment_id).await? {
            return Err(AppError::PaymentNotFound);
        }
        Ok(())
    }

    async fn require_order(&self, business_id: Uuid, order_id: Uuid) -> Result<(), AppError> {
        self.operations_repo
            .find_order(business_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        Ok(())
    }

    // =========================================================================
    //  DESPESAS
    // =========================================================================

    pub async fn list_expenses(
        &self,
        business_id: Uuid,
        page: &PageParams,
        query: &ExpenseQuery,
    ) -> Result<Page<Expense>, AppError> {
        let (from, until) = day_bounds(query.start_date, query.end_date);
        let filter = ExpenseFilter {
            branch_id: query.branch_id,
            category: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            from,
            until,
        };

        let total = self.repo.count_expenses(business_id, &filter).await?;
        let items = self
            .repo
            .list_expenses(business_id, &filter, page.page_size(), page.offset())
            .await?;

        Ok(Page::new(items, page, total))
    }

    pub async fn get_expense(&self, business_id: Uuid, expense_id: Uuid) -> Result<Expense, AppError> {
        self.repo
            .find_expense(business_id, expense_id)
            .await?
            .ok_or(AppError::ExpenseNotFound)
    }

    pub async fn create_expense(&self, business_id: Uuid, input: &ExpenseInput<'_>) -> Result<Expense, AppError> {
        self.require_branch(business_id, input.branch_id).await?;

        let fields = expense_fields(input, Utc::now());
        self.repo.create_expense(business_id, &fields).await
    }

    pub async fn update_expense(
        &self,
        business_id: Uuid,
        expense_id: Uuid,
        input: &ExpenseInput<'_>,
    ) -> Result<Expense, AppError> {
        let current = self.get_expense(business_id, expense_id).await?;
        self.require_branch(business_id, input.branch_id).await?;

        let fields = expense_fields(input, current.expense_date);
        self.repo
            .update_expense(business_id, expense_id, &fields)
            .await?
            .ok_or(AppError::ExpenseNotFound)
    }

    pub async fn delete_expense(&self, business_id: Uuid, expense_id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_expense(business_id, expense_id).await? {
            return Err(AppError::ExpenseNotFound);
        }
        Ok(())
    }

    async fn require_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<(), AppError> {
        self.business_repo
            .find_branch(business_id, branch_id)
            .await?
            .ok_or(AppError::BranchNotFound)?;
        Ok(())
    }

    // =========================================================================
    //  CATEGORIAS DE DESPESA
    // =========================================================================

    pub async fn list_expense_categories(&self, business_id: Uuid) -> Result<Vec<ExpenseCategory>, AppError> {
        self.repo.list_expense_categories(business_id).await
    }

    pub async fn create_expense_category(
        &self,
        business_id: Uuid,
        name: &str,
        kind: Option<&str>,
    ) -> Result<ExpenseCategory, AppError> {
        self.repo.create_expense_category(business_id, name.trim(), kind).await
    }
}

// Sem data informada, vale `fallback_date`
fn expense_fields<'a>(input: &ExpenseInput<'a>, fallback_date: chrono::DateTime<Utc>) -> ExpenseFields<'a> {
    ExpenseFields {
        branch_id: input.branch_id,
        category: input.category.map(str::trim).filter(|c| !c.is_empty()),
        amount: input.amount,
        expense_date: input.expense_date.unwrap_or(fallback_date),
        payment_method: input.payment_method.trim(),
        description: input.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expense_date_falls_back_and_blank_category_is_dropped() {
        let fallback = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let input = ExpenseInput {
            branch_id: Uuid::new_v4(),
            category: Some("   "),
            amount: Decimal::new(1999, 2),
            expense_date: None,
            payment_method: " Cash ",
            description: None,
        };

        let fields = expense_fields(&input, fallback);

        assert_eq!(fields.expense_date, fallback);
        assert_eq!(fields.category, None);
        assert_eq!(fields.payment_method, "Cash");
    }
}
