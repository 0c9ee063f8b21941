// src/services/inventory_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{inventory_repo::ItemFields, BusinessRepository, InventoryRepository},
    models::inventory::{InventoryLevel, InventoryLevelView, Item, ItemCategory},
};

pub const LOW_STOCK_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct InventoryService {
    repo: InventoryRepository,
    business_repo: BusinessRepository,
}

impl InventoryService {
    pub fn new(repo: InventoryRepository, business_repo: BusinessRepository) -> Self {
        Self { repo, business_repo }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self, business_id: Uuid, search: Option<&str>) -> Result<Vec<ItemCategory>, AppError> {
        self.repo.list_categories(business_id, false, normalize_search(search)).await
    }

    pub async fn list_archived_categories(&self, business_id: Uuid) -> Result<Vec<ItemCategory>, AppError> {
        self.repo.list_categories(business_id, true, None).await
    }

    pub async fn get_category(&self, business_id: Uuid, category_id: Uuid) -> Result<ItemCategory, AppError> {
        self.repo
            .find_category(business_id, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn create_category(&self, business_id: Uuid, name: &str) -> Result<ItemCategory, AppError> {
        self.repo.create_category(business_id, name.trim()).await
    }

    pub async fn update_category(&self, business_id: Uuid, category_id: Uuid, name: &str) -> Result<ItemCategory, AppError> {
        self.repo
            .update_category(business_id, category_id, name.trim())
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn archive_category(&self, business_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_category_archived(business_id, category_id, true).await? {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    pub async fn restore_category(&self, business_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_category_archived(business_id, category_id, false).await? {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items(
        &self,
        business_id: Uuid,
        branch_id: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<Vec<Item>, AppError> {
        self.repo
            .list_items(business_id, false, branch_id, normalize_search(search))
            .await
    }

    pub async fn list_archived_items(&self, business_id: Uuid) -> Result<Vec<Item>, AppError> {
        self.repo.list_items(business_id, true, None, None).await
    }

    pub async fn get_item(&self, business_id: Uuid, item_id: Uuid) -> Result<Item, AppError> {
        self.repo
            .find_item(business_id, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn create_item(&self, business_id: Uuid, fields: &ItemFields<'_>) -> Result<Item, AppError> {
        self.check_item_refs(business_id, fields).await?;
        let item = self.repo.create_item(business_id, fields).await?;

        tracing::info!("📦 Item {} ({}) criado na empresa {}", item.id, item.sku, business_id);
        Ok(item)
    }

    pub async fn update_item(&self, business_id: Uuid, item_id: Uuid, fields: &ItemFields<'_>) -> Result<Item, AppError> {
        self.check_item_refs(business_id, fields).await?;
        self.repo
            .update_item(business_id, item_id, fields)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn delete_item(&self, business_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_item_deleted(business_id, item_id, true).await? {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }

    pub async fn restore_item(&self, business_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_item_deleted(business_id, item_id, false).await? {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }

    // Categoria e filial precisam ser da mesma empresa
    async fn check_item_refs(&self, business_id: Uuid, fields: &ItemFields<'_>) -> Result<(), AppError> {
        self.get_category(business_id, fields.category_id).await?;

        if let Some(branch_id) = fields.branch_id {
            self.require_branch(business_id, branch_id).await?;
        }
        Ok(())
    }

    // =========================================================================
    //  ESTOQUE
    // =========================================================================

    pub async fn list_stock(&self, business_id: Uuid, branch_id: Option<Uuid>) -> Result<Vec<InventoryLevelView>, AppError> {
        self.repo.list_levels(business_id, branch_id, false, None).await
    }

    pub async fn list_low_stock(&self, business_id: Uuid, limit: Option<i64>) -> Result<Vec<InventoryLevelView>, AppError> {
        let limit = limit.unwrap_or(LOW_STOCK_LIMIT).clamp(1, LOW_STOCK_LIMIT);
        self.repo.list_levels(business_id, None, true, Some(limit)).await
    }

    pub async fn set_stock_level(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        min_stock_level: i32,
    ) -> Result<InventoryLevel, AppError> {
        self.require_branch(business_id, branch_id).await?;
        self.get_item(business_id, item_id).await?;

        self.repo.upsert_level(branch_id, item_id, quantity, min_stock_level).await
    }

    pub async fn adjust_stock(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        item_id: Uuid,
        delta: i32,
    ) -> Result<InventoryLevel, AppError> {
        self.require_branch(business_id, branch_id).await?;
        self.get_item(business_id, item_id).await?;

        let level = self
            .repo
            .adjust_level(branch_id, item_id, delta)
            .await?
            .ok_or(if delta >= 0 {
                AppError::StockLimitExceeded
            } else {
                AppError::InsufficientStock
            })?;

        tracing::info!("📊 Estoque do item {} na filial {} ajustado em {}", item_id, branch_id, delta);
        Ok(level)
    }

    async fn require_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<(), AppError> {
        self.business_repo
            .find_branch(business_id, branch_id)
            .await?
            .ok_or(AppError::BranchNotFound)?;
        Ok(())
    }
}

// Busca vazia = sem filtro
fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some(" cof ")), Some("cof"));
    }
}
