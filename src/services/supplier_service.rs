// src/services/supplier_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::supplier::{
        CreateSupplierProductPayload, SupplierProduct, SupplierProductFilter,
        SupplierProductListing, UpdateSupplierProductPayload,
    },
};

#[derive(Clone)]
pub struct SupplierService {
    supplier_repo: SupplierRepository,
}

impl SupplierService {
    pub fn new(supplier_repo: SupplierRepository) -> Self {
        Self { supplier_repo }
    }

    pub async fn create(
        &self,
        supplier_id: Uuid,
        payload: &CreateSupplierProductPayload,
    ) -> Result<SupplierProduct, AppError> {
        let product = self.supplier_repo.create(supplier_id, payload).await?;
        tracing::info!("🧪 Insumo {} cadastrado pelo fornecedor {}", product.id, supplier_id);
        Ok(product)
    }

    pub async fn list(&self, filter: &SupplierProductFilter) -> Result<Vec<SupplierProductListing>, AppError> {
        self.supplier_repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<SupplierProductListing, AppError> {
        self.supplier_repo
            .find_listing(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado"))
    }

    pub async fn update(
        &self,
        id: Uuid,
        supplier_id: Uuid,
        payload: &UpdateSupplierProductPayload,
    ) -> Result<SupplierProduct, AppError> {
        self.supplier_repo
            .update(id, supplier_id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado"))
    }

    pub async fn list_mine(&self, supplier_id: Uuid) -> Result<Vec<SupplierProduct>, AppError> {
        self.supplier_repo.list_by_supplier(supplier_id).await
    }
}
