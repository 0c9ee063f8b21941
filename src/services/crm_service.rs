// src/services/crm_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, CrmRepository},
    models::crm::Customer,
};

pub struct CustomerInput<'a> {
    pub branch_id: Uuid,
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    business_repo: BusinessRepository,
}

impl CrmService {
    pub fn new(repo: CrmRepository, business_repo: BusinessRepository) -> Self {
        Self { repo, business_repo }
    }

    pub async fn list_customers(&self, business_id: Uuid) -> Result<Vec<Customer>, AppError> {
        self.repo.list_customers(business_id).await
    }

    pub async fn get_customer(&self, business_id: Uuid, customer_id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_customer(business_id, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn create_customer(&self, business_id: Uuid, input: &CustomerInput<'_>) -> Result<Customer, AppError> {
        self.check_input(business_id, None, input).await?;

        self.repo
            .create_customer(
                business_id,
                input.branch_id,
                input.full_name.trim(),
                input.email.trim(),
                input.phone,
            )
            .await
    }

    pub async fn update_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        input: &CustomerInput<'_>,
    ) -> Result<Customer, AppError> {
        self.check_input(business_id, Some(customer_id), input).await?;

        self.repo
            .update_customer(
                business_id,
                customer_id,
                input.branch_id,
                input.full_name.trim(),
                input.email.trim(),
                input.phone,
            )
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    /// Exclusão física, recusada enquanto houver pedidos ativos do cliente
    pub async fn delete_customer(&self, business_id: Uuid, customer_id: Uuid) -> Result<(), AppError> {
        let customer = self.get_customer(business_id, customer_id).await?;

        if !self.repo.delete_customer(business_id, customer.id).await? {
            return Err(AppError::CustomerHasOrders);
        }

        tracing::info!("🗑️ Cliente {} removido da empresa {}", customer.id, business_id);
        Ok(())
    }

    async fn check_input(
        &self,
        business_id: Uuid,
        exclude_id: Option<Uuid>,
        input: &CustomerInput<'_>,
    ) -> Result<(), AppError> {
        self.business_repo
            .find_branch(business_id, input.branch_id)
            .await?
            .ok_or(AppError::BranchNotFound)?;

        if self.repo.email_in_use(business_id, input.email.trim(), exclude_id).await? {
            return Err(AppError::CustomerEmailAlreadyExists);
        }
        Ok(())
    }
}
