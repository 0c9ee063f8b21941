// src/services/business_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BusinessRepository,
    models::business::{Branch, BranchDetail, Business},
};

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_STATUS: &str = "Active";

pub struct BusinessInput<'a> {
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub timezone: Option<&'a str>,
    pub status: Option<&'a str>,
}

pub struct BranchInput<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
}

#[derive(Clone)]
pub struct BusinessService {
    repo: BusinessRepository,
}

impl BusinessService {
    pub fn new(repo: BusinessRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub async fn list_businesses(&self, user_id: Uuid) -> Result<Vec<Business>, AppError> {
        self.repo.list_businesses(user_id, false).await
    }

    pub async fn list_archived_businesses(&self, user_id: Uuid) -> Result<Vec<Business>, AppError> {
        self.repo.list_businesses(user_id, true).await
    }

    /// Também é a checagem de posse usada pelo business_guard
    pub async fn get_business(&self, user_id: Uuid, business_id: Uuid) -> Result<Business, AppError> {
        self.repo
            .find_business(user_id, business_id)
            .await?
            .ok_or(AppError::BusinessNotFound)
    }

    pub async fn create_business(&self, user_id: Uuid, input: &BusinessInput<'_>) -> Result<Business, AppError> {
        let business = self
            .repo
            .create_business(
                user_id,
                input.name.trim(),
                input.industry,
                input.timezone.unwrap_or(DEFAULT_TIMEZONE),
                input.status.unwrap_or(DEFAULT_STATUS),
            )
            .await?;

        tracing::info!("🏢 Empresa {} criada para o usuário {}", business.id, user_id);
        Ok(business)
    }

    pub async fn update_business(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        input: &BusinessInput<'_>,
    ) -> Result<Business, AppError> {
        self.repo
            .update_business(
                user_id,
                business_id,
                input.name.trim(),
                input.industry,
                input.timezone.unwrap_or(DEFAULT_TIMEZONE),
                input.status.unwrap_or(DEFAULT_STATUS),
            )
            .await?
            .ok_or(AppError::BusinessNotFound)
    }

    pub async fn delete_business(&self, user_id: Uuid, business_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_business_deleted(user_id, business_id, true).await? {
            return Err(AppError::BusinessNotFound);
        }
        Ok(())
    }

    pub async fn restore_business(&self, user_id: Uuid, business_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_business_deleted(user_id, business_id, false).await? {
            return Err(AppError::BusinessNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  FILIAIS
    // =========================================================================

    pub async fn list_branches(&self, business_id: Uuid) -> Result<Vec<Branch>, AppError> {
        self.repo.list_branches(business_id, false).await
    }

    pub async fn list_archived_branches(&self, business_id: Uuid) -> Result<Vec<Branch>, AppError> {
        self.repo.list_branches(business_id, true).await
    }

    pub async fn get_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<Branch, AppError> {
        self.repo
            .find_branch(business_id, branch_id)
            .await?
            .ok_or(AppError::BranchNotFound)
    }

    pub async fn get_branch_detail(&self, business_id: Uuid, branch_id: Uuid) -> Result<BranchDetail, AppError> {
        let branch = self.get_branch(business_id, branch_id).await?;
        let item_count = self.repo.count_branch_items(branch.id).await?;
        let inventory = self.repo.branch_inventory(branch.id).await?;

        Ok(BranchDetail { branch, item_count, inventory })
    }

    pub async fn create_branch(&self, business_id: Uuid, input: &BranchInput<'_>) -> Result<Branch, AppError> {
        self.repo
            .create_branch(business_id, input.name.trim(), input.address, input.phone)
            .await
    }

    /// `move_to` só é aceito se a empresa de destino também for do usuário
    pub async fn update_branch(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        branch_id: Uuid,
        move_to: Option<Uuid>,
        input: &BranchInput<'_>,
    ) -> Result<Branch, AppError> {
        let target = match move_to {
            Some(target) if target != business_id => self.get_business(user_id, target).await?.id,
            _ => business_id,
        };

        self.repo
            .update_branch(business_id, branch_id, target, input.name.trim(), input.address, input.phone)
            .await?
            .ok_or(AppError::BranchNotFound)
    }

    pub async fn delete_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_branch_deleted(business_id, branch_id, true).await? {
            return Err(AppError::BranchNotFound);
        }
        Ok(())
    }

    pub async fn restore_branch(&self, business_id: Uuid, branch_id: Uuid) -> Result<(), AppError> {
        if !self.repo.set_branch_deleted(business_id, branch_id, false).await? {
            return Err(AppError::BranchNotFound);
        }
        Ok(())
    }
}
