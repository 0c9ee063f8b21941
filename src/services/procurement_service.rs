// src/services/procurement_service.rs

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{procurement_repo::SupplierItemInput, InventoryRepository, ProcurementRepository},
    models::procurement::{Supplier, SupplierItemView, SupplierWithItems},
};

pub struct SupplierInput<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub items: Vec<SupplierItemInput<'a>>,
}

#[derive(Clone)]
pub struct ProcurementService {
    repo: ProcurementRepository,
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl ProcurementService {
    pub fn new(repo: ProcurementRepository, inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self { repo, inventory_repo, pool }
    }

    pub async fn list_suppliers(&self, business_id: Uuid) -> Result<Vec<SupplierWithItems>, AppError> {
        let suppliers = self.repo.list_suppliers(business_id, false).await?;
        self.attach_items(suppliers).await
    }

    pub async fn list_archived_suppliers(&self, business_id: Uuid) -> Result<Vec<SupplierWithItems>, AppError> {
        let suppliers = self.repo.list_suppliers(business_id, true).await?;
        self.attach_items(suppliers).await
    }

    pub async fn get_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> Result<SupplierWithItems, AppError> {
        let supplier = self
            .repo
            .find_supplier(business_id, supplier_id)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        let mut with_items = self.attach_items(vec![supplier]).await?;
        with_items.pop().ok_or(AppError::SupplierNotFound)
    }

    pub async fn create_supplier(
        &self,
        business_id: Uuid,
        input: &SupplierInput<'_>,
    ) -> Result<SupplierWithItems, AppError> {
        let items = distinct_items(&input.items);
        self.check_items(business_id, &items).await?;

        let mut tx = self.pool.begin().await?;

        let supplier = self
            .repo
            .insert_supplier(&mut *tx, business_id, input.name.trim(), input.email, input.phone)
            .await?;
        if !items.is_empty() {
            self.repo.insert_supplier_items(&mut *tx, supplier.id, &items).await?;
        }

        tx.commit().await?;

        tracing::info!("🚚 Fornecedor {} criado com {} itens", supplier.id, items.len());
        self.get_supplier(business_id, supplier.id).await
    }

    /// Atualiza o cabeçalho e substitui o conjunto de itens fornecidos.
    pub async fn update_supplier(
        &self,
        business_id: Uuid,
        supplier_id: Uuid,
        input: &SupplierInput<'_>,
    ) -> Result<SupplierWithItems, AppError> {
        let items = distinct_items(&input.items);
        self.check_items(business_id, &items).await?;

        let mut tx = self.pool.begin().await?;

        self.repo
            .update_supplier(&mut *tx, business_id, supplier_id, input.name.trim(), input.email, input.phone)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        self.repo.clear_supplier_items(&mut *tx, supplier_id).await?;
        if !items.is_empty() {
            self.repo.insert_supplier_items(&mut *tx, supplier_id, &items).await?;
        }

        tx.commit().await?;

        self.get_supplier(business_id, supplier_id).await
    }

    pub async fn delete_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_supplier_deleted(business_id, supplier_id, true).await? {
            return Err(AppError::SupplierNotFound);
        }
        Ok(())
    }

    pub async fn restore_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_supplier_deleted(business_id, supplier_id, false).await? {
            return Err(AppError::SupplierNotFound);
        }
        Ok(())
    }

    // Todo item fornecido precisa ser um item ativo da empresa
    async fn check_items(&self, business_id: Uuid, items: &[SupplierItemInput<'_>]) -> Result<(), AppError> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = items.iter().map(|i| i.item_id).collect();
        let found = self.inventory_repo.count_active_items(business_id, &ids).await?;
        if found != ids.len() as i64 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }

    async fn attach_items(&self, suppliers: Vec<Supplier>) -> Result<Vec<SupplierWithItems>, AppError> {
        let ids: Vec<Uuid> = suppliers.iter().map(|s| s.id).collect();
        let items = self.repo.list_supplier_items(&ids).await?;
        Ok(group_items(suppliers, items))
    }
}

// Um item aparece uma vez por fornecedor; vale a primeira ocorrência
fn distinct_items<'a>(items: &[SupplierItemInput<'a>]) -> Vec<SupplierItemInput<'a>> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| seen.insert(i.item_id))
        .copied()
        .collect()
}

// Distribui os itens entre os fornecedores, mantendo a ordem de ambos
fn group_items(suppliers: Vec<Supplier>, items: Vec<SupplierItemView>) -> Vec<SupplierWithItems> {
    let mut by_supplier: HashMap<Uuid, Vec<SupplierItemView>> = HashMap::new();
    for item in items {
        by_supplier.entry(item.supplier_id).or_default().push(item);
    }

    suppliers
        .into_iter()
        .map(|supplier| {
            let items = by_supplier.remove(&supplier.id).unwrap_or_default();
            SupplierWithItems { supplier, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn supplier(name: &str) -> Supplier {
        Supplier {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            name: name.to_string(),
            email: None,
            phone: None,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn supplied(supplier_id: Uuid, item_name: &str) -> SupplierItemView {
        SupplierItemView {
            id: Uuid::new_v4(),
            supplier_id,
            item_id: Uuid::new_v4(),
            item_name: item_name.to_string(),
            purchase_price: Decimal::ONE,
            payment_method: "Cash".to_string(),
        }
    }

    #[test]
    fn groups_items_under_their_supplier() {
        let acme = supplier("Acme");
        let globex = supplier("Globex");
        let items = vec![supplied(acme.id, "Bolts"), supplied(acme.id, "Nuts")];

        let grouped = group_items(vec![acme, globex], items);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].items.len(), 2);
        assert!(grouped[1].items.is_empty());
    }

    #[test]
    fn repeated_items_keep_the_first_entry() {
        let id = Uuid::new_v4();
        let items = vec![
            SupplierItemInput { item_id: id, purchase_price: Decimal::ONE, payment_method: "Cash" },
            SupplierItemInput { item_id: id, purchase_price: Decimal::TWO, payment_method: "Card" },
        ];

        let distinct = distinct_items(&items);

        assert_eq!(distinct.len(), 1);
        assert_eq!(distinct[0].payment_method, "Cash");
    }
}
