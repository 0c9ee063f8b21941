// src/services/operation_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::MAX_AMOUNT, error::AppError},
    db::{
        operations_repo::OrderHeader, BusinessRepository, CrmRepository, InventoryRepository,
        OperationsRepository,
    },
    models::operations::{CatalogPrice, Order, OrderDetail, OrderLine, OrderLineRequest, OrderSummary},
};

pub struct NewOrder<'a> {
    pub order_name: &'a str,
    pub branch_id: Uuid,
    pub customer_id: Uuid,
    pub ordered_at: Option<DateTime<Utc>>,
    pub lines: &'a [OrderLineRequest],
}

pub struct OrderChanges<'a> {
    pub order_name: &'a str,
    pub branch_id: Uuid,
    pub customer_id: Uuid,
    pub ordered_at: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

#[derive(Clone)]
pub struct OperationService {
    repo: OperationsRepository,
    inventory_repo: InventoryRepository,
    business_repo: BusinessRepository,
    crm_repo: CrmRepository,
    pool: PgPool,
}

impl OperationService {
    pub fn new(
        repo: OperationsRepository,
        inventory_repo: InventoryRepository,
        business_repo: BusinessRepository,
        crm_repo: CrmRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, inventory_repo, business_repo, crm_repo, pool }
    }

    pub async fn list_orders(&self, business_id: Uuid) -> Result<Vec<OrderSummary>, AppError> {
        self.repo.list_orders(business_id, None).await
    }

    pub async fn get_order(&self, business_id: Uuid, order_id: Uuid) -> Result<Order, AppError> {
        self.repo
            .find_order(business_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)
    }

    pub async fn get_order_detail(&self, business_id: Uuid, order_id: Uuid) -> Result<OrderDetail, AppError> {
        let header = self.get_order(business_id, order_id).await?;
        let (branch_name, customer_name) = self.repo.order_labels(header.id).await?;
        let items = self.repo.list_order_items(header.id).await?;
        let amount_paid = self.repo.amount_paid(header.id).await?;
        let balance = header.total_amount - amount_paid;

        Ok(OrderDetail { header, branch_name, customer_name, items, amount_paid, balance })
    }

    /// Cria o pedido com os preços atuais do catálogo.
    /// Cabeçalho e linhas são gravados na mesma transação.
    pub async fn create_order(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        new_order: &NewOrder<'_>,
    ) -> Result<OrderDetail, AppError> {
        if new_order.lines.is_empty() {
            return Err(AppError::OrderWithoutItems);
        }

        self.check_parties(business_id, new_order.branch_id, new_order.customer_id).await?;

        let item_ids: Vec<Uuid> = new_order.lines.iter().map(|l| l.item_id).collect();
        let catalog = self.inventory_repo.catalog_prices(business_id, &item_ids).await?;
        let lines = build_order_lines(new_order.lines, &catalog)?;
        let total_amount = order_total(&lines);

        let header = OrderHeader {
            branch_id: new_order.branch_id,
            customer_id: new_order.customer_id,
            order_name: new_order.order_name.trim(),
            ordered_at: new_order.ordered_at.unwrap_or_else(Utc::now),
            is_completed: true,
        };

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .insert_order(&mut *tx, business_id, user_id, &header, total_amount)
            .await?;
        self.repo.insert_order_lines(&mut *tx, order.id, &lines).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(
            "🧾 Pedido {} criado com {} itens, total {}",
            order.id,
            lines.len(),
            order.total_amount
        );

        self.get_order_detail(business_id, order.id).await
    }

    // O total não muda aqui: ele só vem das linhas gravadas na criação
    pub async fn update_order(
        &self,
        business_id: Uuid,
        order_id: Uuid,
        changes: &OrderChanges<'_>,
    ) -> Result<Order, AppError> {
        let current = self.get_order(business_id, order_id).await?;
        self.check_parties(business_id, changes.branch_id, changes.customer_id).await?;

        let header = OrderHeader {
            branch_id: changes.branch_id,
            customer_id: changes.customer_id,
            order_name: changes.order_name.trim(),
            ordered_at: changes.ordered_at.unwrap_or(current.ordered_at),
            is_completed: changes.is_completed.unwrap_or(current.is_completed),
        };

        self.repo
            .update_order_header(business_id, order_id, &header)
            .await?
            .ok_or(AppError::OrderNotFound)
    }

    pub async fn delete_order(&self, business_id: Uuid, order_id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_order(business_id, order_id).await? {
            return Err(AppError::OrderNotFound);
        }
        Ok(())
    }

    // Filial e cliente precisam pertencer à empresa do pedido
    async fn check_parties(&self, business_id: Uuid, branch_id: Uuid, customer_id: Uuid) -> Result<(), AppError> {
        self.business_repo
            .find_branch(business_id, branch_id)
            .await?
            .ok_or(AppError::BranchNotFound)?;

        self.crm_repo
            .find_customer(business_id, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        Ok(())
    }
}

/// Monta as linhas do pedido a partir do que foi pedido e do catálogo vigente.
///
/// Linhas com quantidade <= 0 e itens fora do catálogo (excluídos ou de outra
/// empresa) são descartadas. Cada linha congela o preço de venda atual.
/// Um total acima do que a coluna comporta é recusado.
pub fn build_order_lines(
    requested: &[OrderLineRequest],
    catalog: &[CatalogPrice],
) -> Result<Vec<OrderLine>, AppError> {
    if requested.is_empty() {
        return Err(AppError::OrderWithoutItems);
    }

    let prices: HashMap<Uuid, Decimal> = catalog.iter().map(|c| (c.id, c.sell_price)).collect();

    let lines: Vec<OrderLine> = requested
        .iter()
        .filter(|line| line.quantity > 0)
        .filter_map(|line| {
            prices.get(&line.item_id).map(|&unit_price| OrderLine {
                item_id: line.item_id,
                quantity: line.quantity,
                unit_price,
                total_price: unit_price * Decimal::from(line.quantity),
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(AppError::NoValidOrderItems);
    }
    // As linhas e o total precisam caber nas colunas NUMERIC(12, 2)
    if order_total(&lines) > MAX_AMOUNT {
        return Err(AppError::OrderTotalTooLarge);
    }
    Ok(lines)
}

pub fn order_total(lines: &[OrderLine]) -> Decimal {
    lines.iter().map(|l| l.total_price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    fn line(item_id: Uuid, quantity: i32) -> OrderLineRequest {
        OrderLineRequest { item_id, quantity }
    }

    #[test]
    fn prices_each_line_from_catalog() {
        let coffee = Uuid::new_v4();
        let cake = Uuid::new_v4();
        let catalog = vec![
            CatalogPrice { id: coffee, sell_price: dec("4.50") },
            CatalogPrice { id: cake, sell_price: dec("12.00") },
        ];

        let lines = build_order_lines(&[line(coffee, 3), line(cake, 1)], &catalog).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].unit_price, dec("4.50"));
        assert_eq!(lines[0].total_price, dec("13.50"));
        assert_eq!(order_total(&lines), dec("25.50"));
    }

    #[test]
    fn skips_non_positive_quantities_and_unknown_items() {
        let coffee = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let catalog = vec![CatalogPrice { id: coffee, sell_price: dec("4.50") }];

        let lines = build_order_lines(
            &[line(coffee, 0), line(coffee, -2), line(deleted, 5), line(coffee, 2)],
            &catalog,
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(order_total(&lines), dec("9.00"));
    }

    #[test]
    fn rejects_empty_and_all_invalid_requests() {
        let coffee = Uuid::new_v4();
        let catalog = vec![CatalogPrice { id: coffee, sell_price: dec("4.50") }];

        assert!(matches!(build_order_lines(&[], &catalog), Err(AppError::OrderWithoutItems)));
        assert!(matches!(
            build_order_lines(&[line(coffee, 0), line(Uuid::new_v4(), 3)], &catalog),
            Err(AppError::NoValidOrderItems)
        ));
    }

    #[test]
    fn rejects_totals_beyond_the_column_limit() {
        let yacht = Uuid::new_v4();
        let catalog = vec![CatalogPrice { id: yacht, sell_price: dec("9999999999.99") }];

        assert!(build_order_lines(&[line(yacht, 1)], &catalog).is_ok());
        assert!(matches!(
            build_order_lines(&[line(yacht, 2)], &catalog),
            Err(AppError::OrderTotalTooLarge)
        ));
        assert!(matches!(
            build_order_lines(&[line(yacht, 1), line(yacht, 1)], &catalog),
            Err(AppError::OrderTotalTooLarge)
        ));
    }
}
